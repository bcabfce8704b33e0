//! Headless match runner: drives a sandbox [`fleet::Fleet`] from a Bevy app.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use bevy::app::ScheduleRunnerPlugin;
use bevy::prelude::*;
use bevy_ecs::prelude::{EventWriter, Res, ResMut, Resource};
use fleet::sandbox::SandboxFleet;
use fleet::{BalloonTier, CameraView, ControlMode, FrameInfo, FrameInput, VesselId};
use parking_lot::Mutex;
use serde::Serialize;
use tracing::{debug, info};

mod config;
pub use config::{
    load_config, parse_config, Args, CameraConfig, Config, HeldInput, ScriptConfig,
    ScriptedDamage, VesselConfig,
};

/// The running match.
#[derive(Resource)]
pub struct Match {
    pub fleet: SandboxFleet,
    pub camera: CameraView,
}

/// Frame counter and the fixed step every frame uses.
#[derive(Resource, Debug, Clone, Copy)]
pub struct MatchClock {
    pub frame: u64,
    pub step: FrameInfo,
    pub max_frames: Option<u64>,
    pub log_every: u64,
}

/// Scripted inputs replayed frame by frame.
#[derive(Resource, Debug, Clone, Default)]
pub struct MatchScript(pub ScriptConfig);

impl MatchScript {
    pub fn input_at(&self, frame: u64) -> FrameInput {
        let mut input = FrameInput {
            toggle_control: self.0.toggles.contains(&frame),
            ..Default::default()
        };
        for held in self.0.held.iter().filter(|h| (h.from..h.to).contains(&frame)) {
            input.up |= held.up;
            input.down |= held.down;
            input.left |= held.left;
            input.right |= held.right;
            input.fire |= held.fire;
            if let Some(mouse) = held.mouse {
                input.mouse_position = mouse;
            }
        }
        input
    }

    pub fn damage_at(&self, frame: u64) -> impl Iterator<Item = &ScriptedDamage> {
        self.0.damage.iter().filter(move |d| d.frame == frame)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VesselReport {
    pub id: u32,
    pub mode: String,
    pub hull_position: Option<[f32; 3]>,
    pub total_health: i32,
    pub hull_health: f32,
    pub attached: [bool; 3],
    pub projectiles: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchReport {
    pub frames: u64,
    pub vessels: Vec<VesselReport>,
}

impl MatchReport {
    pub fn capture(game: &Match, frames: u64) -> Self {
        let scene = game.fleet.scene();
        let vessels = game
            .fleet
            .vessels()
            .iter()
            .map(|v| VesselReport {
                id: v.id().0,
                mode: mode_name(v.control_mode()).to_string(),
                hull_position: v.hull_position(scene).map(|p| p.to_array()),
                total_health: v.total_health(),
                hull_health: v.hull_health(),
                attached: v.attached(),
                projectiles: v.projectiles().len(),
            })
            .collect();
        Self { frames, vessels }
    }

    pub fn to_toml(&self) -> Result<String> {
        toml::to_string(self).context("serializing match report")
    }
}

/// Shared slot the final report is written to, readable after `App::run` returns.
#[derive(Resource, Clone, Default)]
pub struct MatchReportSink(pub Arc<Mutex<Option<MatchReport>>>);

impl MatchReportSink {
    pub fn take(&self) -> Option<MatchReport> {
        self.0.lock().take()
    }
}

fn mode_name(mode: ControlMode) -> &'static str {
    match mode {
        ControlMode::Uncontrolled => "uncontrolled",
        ControlMode::Player => "player",
        ControlMode::Autonomous => "autonomous",
    }
}

/// Spawn the configured vessels, the player and arm every autopilot.
pub fn build_match(cfg: &Config) -> Result<Match> {
    let mut fleet = SandboxFleet::sandbox(cfg.tuning.clone(), cfg.seed);
    for (index, vessel) in cfg.vessels.iter().enumerate() {
        let id = fleet
            .spawn_vessel(vessel.facing_left, vessel.origin)
            .with_context(|| format!("spawning vessel {index}"))?;
        debug!(?id, origin = ?vessel.origin, "vessel spawned");
    }
    for (index, vessel) in cfg.vessels.iter().enumerate() {
        if let Some([a, b]) = vessel.opponents {
            fleet
                .set_autonomous(VesselId(index as u32), true, [VesselId(a), VesselId(b)])
                .with_context(|| format!("arming autopilot of vessel {index}"))?;
        }
    }
    if let Some(position) = cfg.player {
        fleet.spawn_player(position);
    }
    let camera = CameraView::orthographic(
        cfg.camera.center,
        cfg.camera.half_extents,
        cfg.camera.viewport,
    );
    Ok(Match { fleet, camera })
}

pub fn build_server_app(cfg: Config) -> Result<App> {
    let game = build_match(&cfg)?;
    let step = FrameInfo::fixed(cfg.tick_hz);
    let wait = if cfg.realtime {
        Duration::from_secs_f32(step.delta_seconds)
    } else {
        Duration::ZERO
    };

    let mut app = App::new();
    app.add_plugins(MinimalPlugins.set(ScheduleRunnerPlugin::run_loop(wait)))
        .insert_resource(game)
        .insert_resource(MatchClock {
            frame: 0,
            step,
            max_frames: cfg.max_frames,
            log_every: cfg.log_every,
        })
        .insert_resource(MatchScript(cfg.script.clone()))
        .init_resource::<MatchReportSink>()
        .add_systems(Update, (step_match, log_match_state, stop_after_frames).chain());

    info!(
        vessels = cfg.vessels.len(),
        tick_hz = cfg.tick_hz,
        seed = cfg.seed,
        "match ready"
    );
    Ok(app)
}

/// Advance the fleet by one fixed frame.
pub fn step_match(mut game: ResMut<Match>, mut clock: ResMut<MatchClock>, script: Res<MatchScript>) {
    let frame = clock.frame;
    let game = &mut *game;
    for hit in script.damage_at(frame) {
        if let Err(err) = game.fleet.damage(VesselId(hit.vessel), hit.part, hit.amount) {
            debug!(%err, frame, "scripted damage skipped");
        }
    }
    let input = script.input_at(frame);
    game.fleet.advance(&clock.step, &input, &game.camera);
    clock.frame += 1;
}

pub fn log_match_state(game: Res<Match>, clock: Res<MatchClock>) {
    if clock.log_every == 0 || clock.frame % clock.log_every != 0 {
        return;
    }
    let scene = game.fleet.scene();
    for vessel in game.fleet.vessels() {
        info!(
            frame = clock.frame,
            vessel = vessel.id().0,
            mode = mode_name(vessel.control_mode()),
            hull = ?vessel.hull_position(scene),
            health = vessel.total_health(),
            big = vessel.is_attached(BalloonTier::Big),
            mid = vessel.is_attached(BalloonTier::Mid),
            small = vessel.is_attached(BalloonTier::Small),
            "vessel status"
        );
    }
}

pub fn stop_after_frames(
    game: Res<Match>,
    clock: Res<MatchClock>,
    sink: Res<MatchReportSink>,
    mut exit: EventWriter<AppExit>,
) {
    let Some(max) = clock.max_frames else {
        return;
    };
    if clock.frame < max {
        return;
    }
    let report = MatchReport::capture(&game, clock.frame);
    info!(frames = report.frames, "match finished");
    *sink.0.lock() = Some(report);
    exit.write(AppExit::Success);
}
