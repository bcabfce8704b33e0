use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use bevy::prelude::{Vec2, Vec3};
use bevy_ecs::prelude::Resource;
use clap::Parser;
use fleet::{VesselPart, VesselTuning};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

#[derive(Parser, Debug, Resource, Clone)]
#[command(name = "skyfleet-server", about = "Headless skyfleet match runner")]
pub struct Args {
    /// Match configuration (TOML). Missing files fall back to defaults.
    #[arg(long, default_value = "server.toml")]
    pub config: PathBuf,
    /// Stop after this many frames, overriding the config.
    #[arg(long)]
    pub frames: Option<u64>,
    /// RNG seed, overriding the config.
    #[arg(long)]
    pub seed: Option<u64>,
    /// Write the final match report here as TOML.
    #[arg(long)]
    pub report: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Simulation rate. Every frame advances by exactly `1 / tick_hz`.
    pub tick_hz: f32,
    /// Pace frames against the wall clock instead of running flat out.
    pub realtime: bool,
    pub max_frames: Option<u64>,
    pub seed: u64,
    /// Log a status line every N frames (0 disables).
    pub log_every: u64,
    pub camera: CameraConfig,
    pub vessels: Vec<VesselConfig>,
    /// Where the sandbox player stands, if there is one.
    pub player: Option<Vec3>,
    pub script: ScriptConfig,
    pub tuning: VesselTuning,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            tick_hz: 60.0,
            realtime: false,
            max_frames: Some(3600),
            seed: 0,
            log_every: 600,
            camera: CameraConfig::default(),
            vessels: vec![
                VesselConfig {
                    facing_left: false,
                    origin: Vec3::new(-300.0, 0.0, 0.0),
                    opponents: Some([1, 1]),
                },
                VesselConfig {
                    facing_left: true,
                    origin: Vec3::new(300.0, 40.0, 0.0),
                    opponents: Some([0, 0]),
                },
            ],
            player: None,
            script: ScriptConfig::default(),
            tuning: VesselTuning::default(),
        }
    }
}

impl Config {
    /// Apply command-line overrides.
    pub fn with_args(mut self, args: &Args) -> Self {
        if let Some(frames) = args.frames {
            self.max_frames = Some(frames);
        }
        if let Some(seed) = args.seed {
            self.seed = seed;
        }
        self
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub center: Vec2,
    pub half_extents: Vec2,
    /// Window size in pixels used to interpret scripted mouse positions.
    pub viewport: Vec2,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            center: Vec2::ZERO,
            half_extents: Vec2::new(640.0, 360.0),
            viewport: Vec2::new(1280.0, 720.0),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VesselConfig {
    #[serde(default)]
    pub facing_left: bool,
    pub origin: Vec3,
    /// Spawn indices of the two vessels the autopilot hunts. `None` leaves
    /// the vessel uncontrolled.
    #[serde(default)]
    pub opponents: Option<[u32; 2]>,
}

/// Scripted inputs and events, keyed by frame number.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ScriptConfig {
    /// Frames on which the control action fires.
    pub toggles: Vec<u64>,
    pub held: Vec<HeldInput>,
    pub damage: Vec<ScriptedDamage>,
}

/// Inputs held over the half-open frame range `[from, to)`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct HeldInput {
    pub from: u64,
    pub to: u64,
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
    pub fire: bool,
    /// Mouse position in pixels while the window is active.
    pub mouse: Option<Vec2>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScriptedDamage {
    pub frame: u64,
    pub vessel: u32,
    pub part: VesselPart,
    pub amount: f32,
}

pub fn load_config(path: &Path) -> Result<Config> {
    if !path.exists() {
        warn!(path = %path.display(), "config file not found, using defaults");
        return Ok(Config::default());
    }
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading config {}", path.display()))?;
    let cfg = parse_config(&text).with_context(|| format!("parsing config {}", path.display()))?;
    info!(path = %path.display(), vessels = cfg.vessels.len(), "config loaded");
    Ok(cfg)
}

pub fn parse_config(text: &str) -> Result<Config> {
    let cfg: Config = toml::from_str(text)?;
    if !(cfg.tick_hz.is_finite() && cfg.tick_hz > 0.0) {
        anyhow::bail!("tick_hz must be positive, got {}", cfg.tick_hz);
    }
    Ok(cfg)
}

#[cfg(test)]
mod tests {
    use super::*;
    use fleet::BalloonTier;

    #[test]
    fn empty_file_gives_defaults() {
        let cfg = parse_config("").expect("parse");
        assert_eq!(cfg.tick_hz, 60.0);
        assert_eq!(cfg.vessels.len(), 2);
        assert_eq!(cfg.tuning.hull_health, 150.0);
    }

    #[test]
    fn parses_vessels_script_and_tuning_overrides() {
        let text = r#"
            seed = 17
            max_frames = 90
            player = [2.0, 5.0, 0.0]

            [[vessels]]
            facing_left = true
            origin = [0.0, 0.0, 0.0]

            [[vessels]]
            origin = [400.0, 0.0, 0.0]
            opponents = [0, 0]

            [script]
            toggles = [3]

            [[script.held]]
            from = 10
            to = 20
            right = true
            mouse = [100.0, 200.0]

            [[script.damage]]
            frame = 5
            vessel = 0
            part = { Balloon = "Small" }
            amount = 15.0

            [tuning]
            hull_health = 80.0

            [tuning.cannon]
            reload = 1.0
        "#;
        let cfg = parse_config(text).expect("parse");
        assert_eq!(cfg.seed, 17);
        assert_eq!(cfg.max_frames, Some(90));
        assert_eq!(cfg.player, Some(Vec3::new(2.0, 5.0, 0.0)));
        assert_eq!(cfg.vessels.len(), 2);
        assert!(cfg.vessels[0].facing_left);
        assert_eq!(cfg.vessels[1].opponents, Some([0, 0]));
        assert_eq!(cfg.script.held[0].mouse, Some(Vec2::new(100.0, 200.0)));
        assert_eq!(cfg.script.damage[0].part, VesselPart::Balloon(BalloonTier::Small));
        assert_eq!(cfg.tuning.hull_health, 80.0);
        assert_eq!(cfg.tuning.cannon.reload, 1.0);
        // Untouched tuning keeps its defaults.
        assert_eq!(cfg.tuning.cannon.power, 400.0);
    }

    #[test]
    fn rejects_non_positive_tick_rate() {
        assert!(parse_config("tick_hz = 0.0").is_err());
    }

    #[test]
    fn args_override_frames_and_seed() {
        let args = Args::parse_from([
            "skyfleet-server",
            "--config",
            "x.toml",
            "--frames",
            "5",
            "--seed",
            "9",
        ]);
        assert_eq!(args.config, PathBuf::from("x.toml"));
        assert_eq!(args.report, None);
        let cfg = Config::default().with_args(&args);
        assert_eq!(cfg.max_frames, Some(5));
        assert_eq!(cfg.seed, 9);
    }
}
