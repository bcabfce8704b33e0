use bevy_math::Vec3;
use fleet::sandbox::SandboxFleet;
use fleet::{
    BalloonTier, BodyHandle, CameraView, FrameInfo, FrameInput, PhysicsWorld, ProjectileId,
    VesselId, VesselPart, VesselTuning,
};

fn one_ship() -> (SandboxFleet, VesselId) {
    let mut fleet = SandboxFleet::sandbox(VesselTuning::default(), 7);
    let id = fleet.spawn_vessel(true, Vec3::new(0.0, 100.0, 0.0)).expect("spawn");
    (fleet, id)
}

fn run(fleet: &mut SandboxFleet, frames: usize) {
    let frame = FrameInfo::fixed(60.0);
    let camera = CameraView::default();
    for _ in 0..frames {
        fleet.advance(&frame, &FrameInput::default(), &camera);
    }
}

#[test]
fn fresh_vessel_has_full_health_and_all_joints() {
    let (fleet, id) = one_ship();
    let ship = fleet.vessel(id).expect("vessel");
    assert_eq!(ship.attached(), [true, true, true]);
    assert_eq!(ship.total_health(), 125, "(150 + 50 + 35 + 15) / 2");
    assert!((ship.hull_health() - 100.0).abs() < 1e-4);
    assert!((ship.balloon_health(BalloonTier::Big) - 100.0).abs() < 1e-4);
    assert!((ship.balloon_health(BalloonTier::Mid) - 100.0).abs() < 1e-4);
    assert!((ship.balloon_health(BalloonTier::Small) - 100.0).abs() < 1e-4);
    for tier in BalloonTier::ALL {
        let tint = ship.balloon_tint(tier).expect("tint after setup");
        assert!(
            (190.0 / 256.0..220.0 / 256.0).contains(&tint.r),
            "{tier:?} tint {tint:?} should be near white"
        );
        assert!(tint.r == tint.g && tint.g == tint.b, "balloons are grey: {tint:?}");
    }
    // Three balloon joints and the control-zone joint.
    assert_eq!(fleet.physics().stats().joints_created, 4);
    assert_eq!(fleet.physics().active_joints(), 4);
    // Hull, three balloons, control zone, turret base and barrel.
    assert_eq!(fleet.physics().live_bodies(), 7);
}

#[test]
fn destroyed_small_balloon_is_cut_loose_once() {
    let (mut fleet, id) = one_ship();
    fleet.damage(id, VesselPart::Balloon(BalloonTier::Small), 15.0).expect("damage");
    run(&mut fleet, 1);

    let ship = fleet.vessel(id).expect("vessel");
    assert_eq!(ship.attached(), [true, true, false]);
    assert_eq!(fleet.physics().stats().released_joints, 1);

    // More damage and more frames never release it again.
    fleet.damage(id, VesselPart::Balloon(BalloonTier::Small), 10.0).expect("damage");
    run(&mut fleet, 30);
    assert_eq!(fleet.physics().stats().released_joints, 1);
    assert_eq!(fleet.physics().stats().double_releases, 0);
}

#[test]
fn sunk_hull_releases_every_balloon() {
    let (mut fleet, id) = one_ship();
    fleet.damage(id, VesselPart::Hull, 150.0).expect("damage");
    run(&mut fleet, 1);

    let ship = fleet.vessel(id).expect("vessel");
    assert_eq!(ship.attached(), [false, false, false], "hull at zero cuts all balloons");
    assert_eq!(fleet.physics().stats().released_joints, 3);

    // Balloons that were already depleted do not get a second release.
    fleet.damage(id, VesselPart::Balloon(BalloonTier::Big), 60.0).expect("damage");
    run(&mut fleet, 10);
    assert_eq!(fleet.physics().stats().released_joints, 3);
    assert_eq!(fleet.physics().stats().double_releases, 0);
    // The control-zone joint stays.
    assert_eq!(fleet.physics().active_joints(), 1);
}

#[test]
fn released_balloon_drifts_upward() {
    let (mut fleet, id) = one_ship();
    let body = fleet
        .vessel(id)
        .and_then(|s| s.balloon_body(BalloonTier::Mid))
        .expect("balloon body");
    let start = fleet.physics().body_position(body).expect("position");

    fleet.damage(id, VesselPart::Balloon(BalloonTier::Mid), 35.0).expect("damage");
    run(&mut fleet, 120);

    let end = fleet.physics().body_position(body).expect("position");
    assert!(end.y > start.y + 10.0, "lift keeps acting on a cut balloon: {start:?} -> {end:?}");
}

#[test]
fn damage_has_no_floor_and_total_truncates() {
    let (mut fleet, id) = one_ship();
    fleet.damage(id, VesselPart::Hull, 151.0).expect("damage");
    fleet.damage(id, VesselPart::Balloon(BalloonTier::Big), 0.5).expect("damage");
    let ship = fleet.vessel(id).expect("vessel");
    assert_eq!(ship.health().get(VesselPart::Hull), -1.0);
    // (-1 + 49.5 + 35 + 15) = 98.5 -> 98 -> 49
    assert_eq!(ship.total_health(), 49);
}

#[test]
fn each_projectile_deals_damage_once() {
    let (mut fleet, id) = one_ship();
    let shot = fleet.fire(id).expect("fire");
    let ship = fleet.vessel_mut(id).expect("vessel");
    assert_eq!(ship.claim_hit(shot), Some(4.0));
    assert_eq!(ship.claim_hit(shot), None, "an inactive projectile never hits again");
    assert!(!ship.projectiles()[0].is_active());
}

/// Shooter facing left at the origin, target hull just left of its turret.
fn firing_range() -> (SandboxFleet, VesselId, VesselId) {
    let mut fleet = SandboxFleet::sandbox(VesselTuning::default(), 13);
    let shooter = fleet.spawn_vessel(true, Vec3::ZERO).expect("spawn shooter");
    let target = fleet.spawn_vessel(false, Vec3::new(-80.0, 10.0, 0.0)).expect("spawn target");
    (fleet, shooter, target)
}

fn projectile_body(fleet: &SandboxFleet, shooter: VesselId, shot: ProjectileId) -> BodyHandle {
    fleet
        .vessel(shooter)
        .and_then(|s| s.projectiles().iter().find(|p| p.id == shot))
        .map(|p| p.body)
        .expect("projectile still live")
}

/// Pull a projectile clear of everything, then drop it back onto `position`
/// so the physics world reports a fresh overlap.
fn reenter(fleet: &mut SandboxFleet, body: BodyHandle, position: Vec3) {
    fleet.physics_mut().set_body_position(body, Vec3::new(0.0, 500.0, 0.0));
    run(fleet, 2);
    fleet.physics_mut().set_body_position(body, position);
    run(fleet, 3);
}

fn health(fleet: &SandboxFleet, id: VesselId, part: VesselPart) -> f32 {
    fleet.vessel(id).map(|s| s.health().get(part)).expect("vessel")
}

#[test]
fn projectile_impact_damages_the_struck_hull_once() {
    let (mut fleet, shooter, target) = firing_range();
    let damage = VesselTuning::default().cannon.damage;

    let shot = fleet.fire(shooter).expect("fire");
    run(&mut fleet, 20);
    assert_eq!(health(&fleet, target, VesselPart::Hull), 150.0 - damage);
    assert_eq!(fleet.vessel(shooter).map(|s| s.total_health()), Some(125), "shooter untouched");
    for tier in BalloonTier::ALL {
        assert_eq!(
            health(&fleet, target, VesselPart::Balloon(tier)),
            VesselTuning::default().balloon(tier).health,
            "{tier:?} balloon was not in the line of fire"
        );
    }

    let body = projectile_body(&fleet, shooter, shot);
    let hull = fleet.hull_positions().get(target).expect("target hull");
    reenter(&mut fleet, body, hull);
    assert_eq!(
        health(&fleet, target, VesselPart::Hull),
        150.0 - damage,
        "a spent projectile overlapping the hull again deals nothing"
    );
}

#[test]
fn projectile_impact_on_a_balloon_hits_that_tier() {
    let (mut fleet, shooter, target) = firing_range();
    let damage = VesselTuning::default().cannon.damage;
    let mid = VesselPart::Balloon(BalloonTier::Mid);
    let balloon = fleet
        .vessel(target)
        .and_then(|s| s.balloon_body(BalloonTier::Mid))
        .expect("mid balloon");

    let shot = fleet.fire(shooter).expect("fire");
    let body = projectile_body(&fleet, shooter, shot);
    let centre = fleet.physics().body_position(balloon).expect("balloon position");
    fleet.physics_mut().set_body_position(body, centre);
    run(&mut fleet, 3);

    assert_eq!(health(&fleet, target, mid), 35.0 - damage);
    assert_eq!(health(&fleet, target, VesselPart::Hull), 150.0);
    assert_eq!(health(&fleet, target, VesselPart::Balloon(BalloonTier::Big)), 50.0);
    assert_eq!(health(&fleet, target, VesselPart::Balloon(BalloonTier::Small)), 15.0);

    let centre = fleet.physics().body_position(balloon).expect("balloon position");
    reenter(&mut fleet, body, centre);
    assert_eq!(health(&fleet, target, mid), 35.0 - damage, "no second hit from the same shot");
    assert_eq!(fleet.vessel(target).map(|s| s.attached()), Some([true, true, true]));
}

#[test]
fn reset_health_keeps_released_balloons_released() {
    let (mut fleet, id) = one_ship();
    fleet.damage(id, VesselPart::Balloon(BalloonTier::Small), 15.0).expect("damage");
    fleet.damage(id, VesselPart::Hull, 20.0).expect("damage");
    run(&mut fleet, 1);

    let ship = fleet.vessel_mut(id).expect("vessel");
    ship.reset_health();
    assert_eq!(ship.total_health(), 125);
    assert_eq!(ship.attached(), [true, true, false]);
    run(&mut fleet, 5);
    assert_eq!(fleet.physics().stats().released_joints, 1);
}

#[test]
fn unknown_vessel_is_an_error() {
    let (mut fleet, _) = one_ship();
    let missing = VesselId(9);
    assert!(fleet.damage(missing, VesselPart::Hull, 1.0).is_err());
    assert!(fleet.fire(missing).is_err());
    assert!(fleet.vessel(missing).is_none());
}

#[test]
fn teardown_releases_remaining_joints_and_bodies() {
    let (mut fleet, id) = one_ship();
    fleet.damage(id, VesselPart::Balloon(BalloonTier::Big), 50.0).expect("damage");
    run(&mut fleet, 1);
    fleet.fire(id).expect("fire");
    fleet.teardown();

    let stats = fleet.physics().stats();
    // Big was released by gameplay, mid/small/zone by teardown.
    assert_eq!(stats.released_joints, 4);
    assert_eq!(stats.double_releases, 0);
    assert_eq!(fleet.physics().live_bodies(), 0);
    assert!(fleet.scene().is_empty());
}
