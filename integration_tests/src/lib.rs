#[cfg(test)]
mod integration {
    use std::time::Duration;

    use anyhow::Result;
    use bevy_app::App;
    use bevy_time::Time;
    use fleet::{BalloonTier, PhysicsWorld, VesselPart};
    use server::{
        build_server_app, parse_config, Config, Match, MatchClock, MatchReport, ScriptConfig,
        ScriptedDamage,
    };
    use tracing::info;

    const FAST_DT: f32 = 1.0 / 240.0;
    const SLOW_DT: f32 = 1.0 / 20.0;

    const DUEL: &str = r#"
        seed = 21
        log_every = 0

        [[vessels]]
        facing_left = false
        origin = [-300.0, 0.0, 0.0]
        opponents = [1, 1]

        [[vessels]]
        facing_left = true
        origin = [300.0, 40.0, 0.0]
        opponents = [0, 0]
    "#;

    fn init_tracing() {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .try_init();
    }

    fn advance_app(app: &mut App, dt: f32) {
        if let Some(mut time) = app.world_mut().get_resource_mut::<Time>() {
            time.advance_by(Duration::from_secs_f32(dt));
        }
        app.update();
    }

    fn report(app: &App) -> MatchReport {
        let game = app.world().resource::<Match>();
        let frame = app.world().resource::<MatchClock>().frame;
        MatchReport::capture(game, frame)
    }

    fn duel() -> Result<Config> {
        let mut cfg = parse_config(DUEL)?;
        cfg.max_frames = None;
        Ok(cfg)
    }

    #[test]
    fn wall_clock_does_not_leak_into_the_simulation() -> Result<()> {
        init_tracing();
        let mut fast = build_server_app(duel()?)?;
        let mut slow = build_server_app(duel()?)?;
        for _ in 0..600 {
            advance_app(&mut fast, FAST_DT);
            advance_app(&mut slow, SLOW_DT);
        }
        let (a, b) = (report(&fast), report(&slow));
        assert_eq!(a.frames, 600);
        assert_eq!(a, b, "frame-stepped matches must not depend on real time");
        Ok(())
    }

    #[test]
    fn autopilots_close_in_and_trade_fire() -> Result<()> {
        init_tracing();
        let mut app = build_server_app(duel()?)?;
        let start = report(&app);
        for _ in 0..1200 {
            advance_app(&mut app, FAST_DT);
        }
        let end = report(&app);

        let gap = |r: &MatchReport| {
            let a = r.vessels[0].hull_position.map(|p| p[0]).unwrap_or_default();
            let b = r.vessels[1].hull_position.map(|p| p[0]).unwrap_or_default();
            b - a
        };
        info!(start = gap(&start), end = gap(&end), "duel gap");
        assert!(gap(&end) < gap(&start) - 50.0, "vessels should close in");
        for vessel in &end.vessels {
            assert_eq!(vessel.mode, "autonomous");
            assert!(vessel.projectiles > 0, "vessel {} never fired", vessel.id);
        }
        Ok(())
    }

    #[test]
    fn sunk_hull_cascades_once_through_the_app() -> Result<()> {
        init_tracing();
        let mut cfg = duel()?;
        cfg.vessels[0].opponents = None;
        cfg.vessels[1].opponents = None;
        cfg.script = ScriptConfig {
            damage: vec![
                ScriptedDamage {
                    frame: 10,
                    vessel: 1,
                    part: VesselPart::Hull,
                    amount: 150.0,
                },
                ScriptedDamage {
                    frame: 30,
                    vessel: 1,
                    part: VesselPart::Balloon(BalloonTier::Big),
                    amount: 50.0,
                },
            ],
            ..Default::default()
        };
        let mut app = build_server_app(cfg)?;

        for _ in 0..10 {
            advance_app(&mut app, FAST_DT);
        }
        let (big, anchor) = {
            let game = app.world().resource::<Match>();
            let ship = &game.fleet.vessels()[1];
            assert_eq!(ship.attached(), [true, true, true]);
            let body = ship.balloon_body(BalloonTier::Big).expect("balloon body");
            (body, game.fleet.physics().body_position(body).expect("position"))
        };

        for _ in 0..120 {
            advance_app(&mut app, FAST_DT);
        }
        let game = app.world().resource::<Match>();
        assert_eq!(game.fleet.vessels()[1].attached(), [false, false, false]);
        assert_eq!(game.fleet.vessels()[0].attached(), [true, true, true]);

        let stats = game.fleet.physics().stats();
        assert_eq!(stats.released_joints, 3, "one release per balloon");
        assert_eq!(stats.double_releases, 0);

        let drifted = game.fleet.physics().body_position(big).expect("position");
        assert!(
            drifted.y > anchor.y + 10.0,
            "freed balloon floats away: {anchor:?} -> {drifted:?}"
        );
        Ok(())
    }
}
