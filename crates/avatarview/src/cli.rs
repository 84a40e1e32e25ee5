use std::path::PathBuf;

use clap::Parser;
use renderer::GpuPowerPreference;

#[derive(Parser, Debug)]
#[command(
    name = "avatarview",
    author,
    version,
    about = "Particle avatar preview",
    arg_required_else_help = true
)]
pub struct Cli {
    /// Path to the avatar image; every pixel becomes one particle.
    #[arg(value_name = "IMAGE")]
    pub avatar: PathBuf,

    /// Override the window size (e.g. `640x480`).
    #[arg(long, value_name = "WIDTHxHEIGHT", value_parser = parse_size)]
    pub size: Option<(u32, u32)>,

    /// Cap the frame rate; without it every refresh the host grants renders.
    #[arg(long, value_name = "FPS")]
    pub fps: Option<f32>,

    /// Seed the particle RNG for reproducible velocity/color sequences.
    #[arg(long, value_name = "SEED", env = "AVATARVIEW_SEED")]
    pub seed: Option<u64>,

    /// GPU adapter preference: `low` (battery-friendly) or `high`.
    #[arg(
        long,
        value_name = "POWER",
        value_parser = parse_gpu_power,
        default_value = "high"
    )]
    pub gpu_power: GpuPowerPreference,

    /// Title of the preview window.
    #[arg(long, value_name = "TITLE")]
    pub title: Option<String>,
}

pub fn parse() -> Cli {
    Cli::parse()
}

pub fn parse_size(value: &str) -> Result<(u32, u32), String> {
    let (w, h) = value
        .split_once(['x', 'X'])
        .ok_or_else(|| "expected WIDTHxHEIGHT".to_string())?;
    let width = w
        .trim()
        .parse::<u32>()
        .map_err(|_| "invalid width in window size".to_string())?;
    let height = h
        .trim()
        .parse::<u32>()
        .map_err(|_| "invalid height in window size".to_string())?;
    if width == 0 || height == 0 {
        return Err("window dimensions must be greater than zero".into());
    }
    Ok((width, height))
}

pub fn parse_gpu_power(value: &str) -> Result<GpuPowerPreference, String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err("GPU power preference must not be empty".to_string());
    }

    let normalized = trimmed.to_ascii_lowercase();
    match normalized.as_str() {
        "low" | "battery" | "integrated" => Ok(GpuPowerPreference::Low),
        "high" | "performance" | "discrete" => Ok(GpuPowerPreference::High),
        other => Err(format!(
            "unknown GPU power preference '{other}'; expected low or high"
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_size_variants() {
        assert_eq!(parse_size("640x480").unwrap(), (640, 480));
        assert_eq!(parse_size("1920X1080").unwrap(), (1920, 1080));
        assert!(parse_size("640").is_err());
        assert!(parse_size("0x480").is_err());
        assert!(parse_size("640xabc").is_err());
    }

    #[test]
    fn parses_gpu_power_variants() {
        assert_eq!(parse_gpu_power("low").unwrap(), GpuPowerPreference::Low);
        assert_eq!(parse_gpu_power("HIGH").unwrap(), GpuPowerPreference::High);
        assert_eq!(
            parse_gpu_power("battery").unwrap(),
            GpuPowerPreference::Low
        );
        assert!(parse_gpu_power("medium").is_err());
        assert!(parse_gpu_power("").is_err());
    }

    #[test]
    fn cli_accepts_minimal_invocation() {
        let cli = Cli::try_parse_from(["avatarview", "avatar.png"]).expect("parse");
        assert_eq!(cli.avatar, PathBuf::from("avatar.png"));
        assert_eq!(cli.gpu_power, GpuPowerPreference::High);
        assert!(cli.size.is_none());
        assert!(cli.fps.is_none());
    }
}
