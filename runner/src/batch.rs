use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use api_server::Store;
use asteroid_dodger_core::GameConfig;
use rayon::prelude::*;
use serde::Serialize;

use crate::pilots::create_pilot;
use crate::runner::{run_pilot, RunBoard, RunMetrics, RunOptions};
use crate::util::write_json;

pub struct BatchConfig<'a> {
    pub pilots: Vec<String>,
    pub seeds: Vec<u32>,
    pub max_frames: u64,
    pub step: Duration,
    pub config: GameConfig,
    /// Every run submits under this name when a store is attached.
    pub player: Option<String>,
    pub store: Option<&'a Store>,
    pub jobs: Option<usize>,
    /// Writes `summary.json` here when set.
    pub out_dir: Option<PathBuf>,
}

#[derive(Clone, Debug, Serialize)]
pub struct PilotRanking {
    pub pilot: String,
    pub runs: usize,
    pub mean_score: f64,
    pub best_score: i64,
    pub best_seed: u32,
    pub mean_frames: f64,
    pub survived_runs: usize,
}

#[derive(Clone, Debug, Serialize)]
pub struct BatchReport {
    pub run_count: usize,
    pub jobs: Option<usize>,
    pub max_frames: u64,
    pub step_ms: u64,
    pub rankings: Vec<PilotRanking>,
    pub runs: Vec<RunMetrics>,
}

pub fn resolve_pilots(input: Option<&str>) -> Result<Vec<String>> {
    let Some(input) = input else {
        return Ok(crate::pilots::pilot_ids()
            .into_iter()
            .map(str::to_string)
            .collect());
    };
    let mut pilots = Vec::new();
    for token in input.split(',').map(str::trim).filter(|t| !t.is_empty()) {
        if create_pilot(token).is_none() {
            return Err(anyhow!("unknown pilot '{token}'"));
        }
        if !pilots.iter().any(|p| p == token) {
            pilots.push(token.to_string());
        }
    }
    if pilots.is_empty() {
        return Err(anyhow!("no pilots parsed from --pilots"));
    }
    Ok(pilots)
}

pub fn run_batch(config: BatchConfig<'_>) -> Result<BatchReport> {
    if config.seeds.is_empty() {
        return Err(anyhow!("batch requires at least one seed"));
    }
    if config.pilots.is_empty() {
        return Err(anyhow!("batch requires at least one pilot"));
    }
    if config.jobs == Some(0) {
        return Err(anyhow!("batch --jobs must be >= 1 when provided"));
    }

    let run_jobs: Vec<(String, u32)> = config
        .pilots
        .iter()
        .flat_map(|pilot| config.seeds.iter().map(move |seed| (pilot.clone(), *seed)))
        .collect();

    let board = match config.store {
        Some(store) => RunBoard::Store(store),
        None => RunBoard::Offline,
    };
    let run_one = |(pilot, seed): &(String, u32)| -> Result<RunMetrics> {
        let options = RunOptions {
            pilot: pilot.clone(),
            seed: *seed,
            max_frames: config.max_frames,
            step: config.step,
            config: config.config.clone(),
            player: config.player.clone(),
            render_every: None,
        };
        let artifact = run_pilot(&options, board)
            .with_context(|| format!("batch run failed for pilot={pilot} seed={seed:#x}"))?;
        Ok(artifact.metrics)
    };

    let run_results: Vec<Result<RunMetrics>> = if let Some(jobs) = config.jobs {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(jobs)
            .build()
            .context("failed to build rayon threadpool")?;
        pool.install(|| run_jobs.par_iter().map(run_one).collect())
    } else {
        run_jobs.par_iter().map(run_one).collect()
    };
    let runs = run_results.into_iter().collect::<Result<Vec<_>>>()?;

    let mut grouped: BTreeMap<&str, Vec<&RunMetrics>> = BTreeMap::new();
    for run in &runs {
        grouped.entry(run.pilot.as_str()).or_default().push(run);
    }
    let mut rankings: Vec<PilotRanking> = grouped
        .into_iter()
        .filter_map(|(pilot, pilot_runs)| rank(pilot, &pilot_runs))
        .collect();
    rankings.sort_by(|a, b| {
        b.mean_score
            .total_cmp(&a.mean_score)
            .then_with(|| a.pilot.cmp(&b.pilot))
    });

    let report = BatchReport {
        run_count: runs.len(),
        jobs: config.jobs,
        max_frames: config.max_frames,
        step_ms: config.step.as_millis() as u64,
        rankings,
        runs,
    };

    if let Some(out_dir) = &config.out_dir {
        write_json(&out_dir.join("summary.json"), &report)?;
    }
    tracing::info!(runs = report.run_count, "batch finished");
    Ok(report)
}

fn rank(pilot: &str, runs: &[&RunMetrics]) -> Option<PilotRanking> {
    let best = runs
        .iter()
        .max_by(|a, b| a.final_score.cmp(&b.final_score).then(b.seed.cmp(&a.seed)))?;
    let count = runs.len() as f64;
    Some(PilotRanking {
        pilot: pilot.to_string(),
        runs: runs.len(),
        mean_score: runs.iter().map(|r| r.final_score as f64).sum::<f64>() / count,
        best_score: best.final_score,
        best_seed: best.seed,
        mean_frames: runs.iter().map(|r| r.frame_count as f64).sum::<f64>() / count,
        survived_runs: runs.iter().filter(|r| !r.game_over).count(),
    })
}
