use anyhow::{anyhow, Context, Result};
use asteroid_dodger_core::GameConfig;
use std::fs;
use std::path::Path;

pub fn parse_seed(seed: &str) -> Result<u32> {
    let s = seed.trim();
    if s.is_empty() {
        return Err(anyhow!("empty seed"));
    }
    if let Some(hex) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        u32::from_str_radix(hex, 16).with_context(|| format!("invalid hex seed: {s}"))
    } else {
        s.parse::<u32>()
            .with_context(|| format!("invalid decimal seed: {s}"))
    }
}

pub fn seed_to_hex(seed: u32) -> String {
    format!("0x{seed:08x}")
}

pub fn parse_seed_csv(input: &str) -> Result<Vec<u32>> {
    let seeds = input
        .split(',')
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(parse_seed)
        .collect::<Result<Vec<_>>>()?;
    if seeds.is_empty() {
        return Err(anyhow!("no seeds parsed from --seeds"));
    }
    Ok(seeds)
}

/// `count` consecutive seeds starting at `start`, wrapping at `u32::MAX`.
pub fn seed_range(start: u32, count: u32) -> Vec<u32> {
    (0..count).map(|offset| start.wrapping_add(offset)).collect()
}

/// Game tunables from an optional JSON file, with canvas overrides applied
/// last. Missing keys keep their defaults.
pub fn load_game_config(
    path: Option<&Path>,
    width: Option<f64>,
    height: Option<f64>,
) -> Result<GameConfig> {
    let mut config = match path {
        Some(path) => {
            let data = fs::read_to_string(path)
                .with_context(|| format!("failed reading game config {}", path.display()))?;
            serde_json::from_str::<GameConfig>(&data)
                .with_context(|| format!("invalid game config {}", path.display()))?
        }
        None => GameConfig::default(),
    };
    if let Some(width) = width {
        config.canvas_width = width;
    }
    if let Some(height) = height {
        config.canvas_height = height;
    }
    config
        .validate()
        .map_err(|err| anyhow!("game config rejected: {err}"))?;
    Ok(config)
}

pub fn write_json<T: serde::Serialize>(path: &Path, value: &T) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed creating {}", parent.display()))?;
        }
    }
    let encoded = serde_json::to_vec_pretty(value)?;
    fs::write(path, encoded).with_context(|| format!("failed writing {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seeds_parse_in_hex_and_decimal() {
        assert_eq!(parse_seed("0xDEADBEEF").unwrap(), 0xDEAD_BEEF);
        assert_eq!(parse_seed(" 42 ").unwrap(), 42);
        assert!(parse_seed("").is_err());
        assert!(parse_seed("0xZZ").is_err());
        assert_eq!(parse_seed_csv("1, 0x2,,3").unwrap(), vec![1, 2, 3]);
        assert!(parse_seed_csv(" , ").is_err());
    }

    #[test]
    fn seed_range_wraps() {
        assert_eq!(seed_range(u32::MAX, 2), vec![u32::MAX, 0]);
        assert_eq!(seed_to_hex(0xBEEF), "0x0000beef");
    }

    #[test]
    fn partial_config_files_keep_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("game.json");
        fs::write(&path, r#"{"ship_speed": 5.0}"#).unwrap();

        let config = load_game_config(Some(&path), Some(1024.0), None).unwrap();
        assert_eq!(config.ship_speed, 5.0);
        assert_eq!(config.canvas_width, 1024.0);
        assert_eq!(config.canvas_height, GameConfig::default().canvas_height);
    }

    #[test]
    fn canvases_too_small_for_asteroids_are_rejected() {
        assert!(load_game_config(None, None, Some(30.0)).is_err());
    }
}
