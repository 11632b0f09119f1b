use std::path::PathBuf;
use std::time::Duration;

use anyhow::{anyhow, Result};
use api_server::Store;
use clap::{Args, Parser, Subcommand};
use dodger_runner::batch::{resolve_pilots, run_batch, BatchConfig};
use dodger_runner::pilots::describe_pilots;
use dodger_runner::runner::{
    read_input_log, replay, run_pilot, write_input_log, InputLog, RunBoard, RunOptions,
};
use dodger_runner::util::{load_game_config, parse_seed, parse_seed_csv, seed_range, seed_to_hex};

#[derive(Parser, Debug)]
#[command(name = "dodger-runner")]
#[command(about = "Headless asteroid dodger runs driven by scripted pilots")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Session settings shared by every command that simulates.
#[derive(Args, Debug)]
struct SimArgs {
    /// JSON file with game tunables; missing keys keep their defaults
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long)]
    width: Option<f64>,
    #[arg(long)]
    height: Option<f64>,
    /// Simulated milliseconds between frames
    #[arg(long, default_value_t = 16)]
    step_ms: u64,
    #[arg(long, default_value_t = 36_000)]
    max_frames: u64,
    /// Player name to submit finished runs under
    #[arg(long)]
    player: Option<String>,
    /// Persist scores into `{data_dir}/dodger.db` instead of running offline
    #[arg(long)]
    data_dir: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List available pilots
    ListPilots,
    /// Play one session and report its metrics
    Play {
        #[arg(long, default_value = "navigator")]
        pilot: String,
        #[arg(long, default_value = "0")]
        seed: String,
        #[command(flatten)]
        sim: SimArgs,
        /// Print an ASCII frame every N frames
        #[arg(long)]
        render_every: Option<u64>,
        /// Write the recorded input log here
        #[arg(long)]
        output: Option<PathBuf>,
        /// Print metrics as JSON instead of key=value lines
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Re-simulate a recorded input log
    Replay {
        #[arg(long)]
        input: PathBuf,
    },
    /// Run many pilot/seed pairs in parallel
    Batch {
        #[arg(long)]
        pilots: Option<String>,
        #[arg(long)]
        seeds: Option<String>,
        #[arg(long, default_value = "0")]
        seed_start: String,
        #[arg(long, default_value_t = 12)]
        seed_count: u32,
        #[command(flatten)]
        sim: SimArgs,
        #[arg(long)]
        jobs: Option<usize>,
        #[arg(long)]
        out_dir: Option<PathBuf>,
    },
}

impl SimArgs {
    fn open_store(&self) -> Result<Option<Store>> {
        self.data_dir
            .as_deref()
            .map(|dir| Store::open(dir).map_err(|err| anyhow!("{err}")))
            .transpose()
    }

    fn step(&self) -> Result<Duration> {
        if self.step_ms == 0 {
            return Err(anyhow!("--step-ms must be >= 1"));
        }
        Ok(Duration::from_millis(self.step_ms))
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::filter::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .init();

    match Cli::parse().command {
        Commands::ListPilots => {
            for (id, description) in describe_pilots() {
                println!("{id:12} {description}");
            }
        }
        Commands::Play {
            pilot,
            seed,
            sim,
            render_every,
            output,
            json,
        } => {
            let options = RunOptions {
                pilot,
                seed: parse_seed(&seed)?,
                max_frames: sim.max_frames,
                step: sim.step()?,
                config: load_game_config(sim.config.as_deref(), sim.width, sim.height)?,
                player: sim.player.clone(),
                render_every,
            };
            let store = sim.open_store()?;
            let board = store.as_ref().map_or(RunBoard::Offline, RunBoard::Store);
            let artifact = run_pilot(&options, board)?;

            for screen in &artifact.screens {
                println!("{screen}");
            }
            if let Some(path) = &output {
                write_input_log(path, &InputLog::from_run(&options, &artifact))?;
            }

            let metrics = &artifact.metrics;
            if json {
                println!("{}", serde_json::to_string_pretty(metrics)?);
            } else {
                println!("pilot={}", metrics.pilot);
                println!("seed={}", seed_to_hex(metrics.seed));
                println!("frames={}", metrics.frame_count);
                println!("elapsed_s={:.3}", metrics.elapsed_s);
                println!("score={}", metrics.final_score);
                println!("high_score_at_start={}", metrics.high_score_at_start);
                println!("game_over={}", metrics.game_over);
                println!("spawned={}", metrics.asteroids_spawned);
                if let Some(score) = metrics.submitted_score {
                    println!("submitted={score}");
                }
                if let Some(path) = &output {
                    println!("output={}", path.display());
                }
            }
        }
        Commands::Replay { input } => {
            let log = read_input_log(&input)?;
            let result = replay(&log)?;
            println!("input={}", input.display());
            println!("seed={}", seed_to_hex(log.seed));
            println!("frames={}", result.frame_count);
            println!("elapsed_s={:.3}", result.elapsed_s);
            println!("score={}", result.final_score);
            println!("game_over={}", result.game_over);
        }
        Commands::Batch {
            pilots,
            seeds,
            seed_start,
            seed_count,
            sim,
            jobs,
            out_dir,
        } => {
            let seeds = match seeds.as_deref() {
                Some(csv) => parse_seed_csv(csv)?,
                None => seed_range(parse_seed(&seed_start)?, seed_count),
            };
            let store = sim.open_store()?;
            let report = run_batch(BatchConfig {
                pilots: resolve_pilots(pilots.as_deref())?,
                seeds,
                max_frames: sim.max_frames,
                step: sim.step()?,
                config: load_game_config(sim.config.as_deref(), sim.width, sim.height)?,
                player: sim.player.clone(),
                store: store.as_ref(),
                jobs,
                out_dir: out_dir.clone(),
            })?;

            println!("runs={}", report.run_count);
            println!(
                "jobs={}",
                report
                    .jobs
                    .map(|value| value.to_string())
                    .unwrap_or_else(|| "auto".to_string())
            );
            if let Some(dir) = &out_dir {
                println!("out_dir={}", dir.display());
            }
            println!("rankings:");
            for (index, ranking) in report.rankings.iter().enumerate() {
                println!(
                    "{:>2}. {:12} mean_score={:.2} best={} (seed {}) mean_frames={:.0} survived={}/{}",
                    index + 1,
                    ranking.pilot,
                    ranking.mean_score,
                    ranking.best_score,
                    seed_to_hex(ranking.best_seed),
                    ranking.mean_frames,
                    ranking.survived_runs,
                    ranking.runs,
                );
            }
        }
    }

    Ok(())
}
