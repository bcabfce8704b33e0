use bevy_math::{Quat, Vec3};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info};

use super::aim::{aim_at_ndc, clamp_player_aim};
use super::autopilot::{proximity_heuristic, Autopilot};
use super::health::{BalloonTier, Health, VesselPart};
use super::motion::{gravity_offset, FloatingBob, Momentum};
use super::projectile::{launch, Projectile};
use super::tuning::VesselTuning;
use super::HullPositions;
use crate::cloth::ClothSurface;
use crate::collab::{
    AxisLocks, BodyDesc, BodyHandle, ClothSimulation, ClothSolver, ColliderDesc, ColliderTag,
    ForceMode, JointHandle, PhysicsWorld, ProjectileId, Shape, VesselId,
};
use crate::error::FleetError;
use crate::input::{CameraView, FrameInfo, FrameInput};
use crate::math::{pixels_to_ndc, world_to_ndc, Rgba};
use crate::scene::{EntityId, Scene, Transform};

const FLAG_GREEN: Rgba = Rgba::new(0.2, 0.55, 0.2, 1.0);
const FLAG_RED: Rgba = Rgba::new(0.55, 0.2, 0.2, 1.0);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlMode {
    Uncontrolled,
    Player,
    Autonomous,
}

#[derive(Debug, Clone, Copy)]
struct BodyPart {
    entity: EntityId,
    body: BodyHandle,
}

#[derive(Debug, Clone, Copy)]
struct BalloonRig {
    part: BodyPart,
    tint: Rgba,
    /// Present exactly while the balloon is attached to the hull.
    joint: Option<JointHandle>,
}

#[derive(Debug, Clone, Copy)]
struct Parts {
    root: EntityId,
    hull: BodyPart,
    balloons: [BalloonRig; 3],
    control_zone: BodyPart,
    zone_joint: Option<JointHandle>,
    turret_base: BodyPart,
    barrel: BodyPart,
    cloth: EntityId,
}

/// A flying galleon: kinematic hull lifted by three jointed balloons, with a
/// turret, a control trigger and a decorative flag.
pub struct CompositeVessel<S> {
    id: VesselId,
    facing_left: bool,
    tuning: VesselTuning,
    rng: StdRng,

    parts: Option<Parts>,
    cloth: Option<ClothSurface<S>>,
    health: Health,

    controllable: bool,
    player_controlled: bool,
    autopilot: Option<Autopilot>,

    momentum: Momentum,
    bob: FloatingBob,
    barrel_angle_deg: f32,
    /// Last aim direction in radians, used by right-facing launches.
    aim_vector: f32,
    reload_timer: f32,
    shot_latched: bool,

    projectiles: Vec<Projectile>,
    next_projectile: u32,
}

impl<S: ClothSimulation> CompositeVessel<S> {
    /// `facing_left` mirrors the turret and flag and picks the flag colour
    /// (green when facing left, red otherwise).
    pub fn new(id: VesselId, facing_left: bool, tuning: VesselTuning, seed: u64) -> Self {
        let health = Health::from_tuning(&tuning);
        let bob = FloatingBob::new(1.0, tuning.float_step);
        let reload_timer = tuning.cannon.reload;
        Self {
            id,
            facing_left,
            tuning,
            rng: StdRng::seed_from_u64(seed),
            parts: None,
            cloth: None,
            health,
            controllable: false,
            player_controlled: false,
            autopilot: None,
            momentum: Momentum::default(),
            bob,
            barrel_angle_deg: 0.0,
            aim_vector: 0.0,
            reload_timer,
            shot_latched: false,
            projectiles: Vec::new(),
            next_projectile: 0,
        }
    }

    /// Create every part around `origin`. Joints are created in [`Self::post_setup`].
    pub fn setup<P, C>(
        &mut self,
        physics: &mut P,
        solver: &mut C,
        scene: &mut Scene,
        origin: Vec3,
    ) -> Result<(), FleetError>
    where
        P: PhysicsWorld,
        C: ClothSolver<Simulation = S>,
    {
        let id = self.id;
        let material = self.tuning.material;
        let root = scene.spawn("vessel", Transform::from_translation(origin));

        // Hull
        let hull_pos = origin + self.tuning.hull_drop;
        let hull = BodyPart {
            entity: scene.spawn_child(root, "hull", Transform::from_translation(hull_pos)),
            body: physics.create_body(BodyDesc::kinematic(hull_pos)),
        };
        physics.attach_collider(
            hull.body,
            ColliderDesc::solid(
                Shape::TriangleMesh {
                    asset: self.tuning.hull_collision_asset.clone(),
                    half_extents: self.tuning.hull_half_extents,
                },
                material,
                ColliderTag::Hull(id),
            ),
        );

        // Balloons
        let balloons = BalloonTier::ALL.map(|tier| {
            let spec = &self.tuning.balloons[tier.index()];
            let pos = hull_pos + spec.anchor;
            let shade = (self.rng.gen_range(0..30) as f32 + 190.0) / 256.0;
            let part = BodyPart {
                entity: scene.spawn_child(root, balloon_name(tier), Transform::from_translation(pos)),
                body: physics.create_body(BodyDesc::dynamic(pos, spec.mass)),
            };
            physics.attach_collider(
                part.body,
                ColliderDesc::solid(
                    Shape::Sphere { radius: spec.radius },
                    material,
                    ColliderTag::Balloon(id, tier),
                ),
            );
            BalloonRig { part, tint: Rgba::grey(shade), joint: None }
        });

        // Control zone: invisible trigger that notices a nearby player.
        let zone_pos = hull_pos + self.tuning.control_zone_anchor;
        let control_zone = BodyPart {
            entity: scene.spawn_child(root, "control_zone", Transform::from_translation(zone_pos)),
            body: physics.create_body(BodyDesc::dynamic(zone_pos, 1.0)),
        };
        physics.attach_collider(
            control_zone.body,
            ColliderDesc::trigger(
                Shape::Cuboid { half_extents: self.tuning.control_zone_half_extents },
                material,
                ColliderTag::ControlZone(id),
            ),
        );

        // Turret
        let base_pos = hull_pos + self.mirrored(self.tuning.turret_base_offset);
        let turret_base = BodyPart {
            entity: scene.spawn_child(root, "turret_base", Transform::from_translation(base_pos)),
            body: physics.create_body(BodyDesc::kinematic(base_pos)),
        };
        physics.attach_collider(
            turret_base.body,
            ColliderDesc::solid(
                Shape::Cuboid { half_extents: self.tuning.turret_base_half_extents },
                material,
                ColliderTag::Turret(id),
            ),
        );
        let barrel_pos = hull_pos + self.mirrored(self.tuning.turret_barrel_offset);
        let barrel = BodyPart {
            entity: scene.spawn_child(root, "turret_barrel", Transform::from_translation(barrel_pos)),
            body: physics.create_body(BodyDesc::dynamic(barrel_pos, 1.0)),
        };
        physics.set_axis_locks(barrel.body, AxisLocks::ROLL_ONLY);
        physics.attach_collider(
            barrel.body,
            ColliderDesc::solid(
                Shape::Cuboid { half_extents: self.tuning.turret_barrel_half_extents },
                material,
                ColliderTag::Turret(id),
            ),
        );

        // Flag
        let deco = &self.tuning.cloth;
        let color = if self.facing_left { FLAG_GREEN } else { FLAG_RED };
        let mut cloth = ClothSurface::new(
            deco.width,
            deco.length,
            deco.resolution,
            color,
            deco.external_acceleration,
        )?
        .with_settings(deco.settings.clone());
        let cloth_pos = hull_pos + self.mirrored(self.tuning.cloth_offset);
        let cloth_entity = scene.spawn_child(root, "flag", Transform::from_translation(cloth_pos));
        cloth.setup(solver, cloth_pos, &mut self.rng);

        let phase = self.rng.gen_range(0..3) as f32;
        self.bob = FloatingBob::new(phase, self.tuning.float_step);

        self.parts = Some(Parts {
            root,
            hull,
            balloons,
            control_zone,
            zone_joint: None,
            turret_base,
            barrel,
            cloth: cloth_entity,
        });
        self.cloth = Some(cloth);
        info!(vessel = ?id, facing_left = self.facing_left, ?origin, "vessel set up");
        Ok(())
    }

    /// Rig the balloons and the control zone to the hull. Runs once all parts exist.
    pub fn post_setup<P: PhysicsWorld>(&mut self, physics: &mut P) {
        let Some(parts) = self.parts.as_mut() else {
            return;
        };
        for (rig, spec) in parts.balloons.iter_mut().zip(&self.tuning.balloons) {
            if rig.joint.is_none() {
                rig.joint = Some(physics.create_fixed_joint(
                    parts.hull.body,
                    spec.anchor,
                    rig.part.body,
                    Vec3::ZERO,
                ));
            }
        }
        if parts.zone_joint.is_none() {
            parts.zone_joint = Some(physics.create_fixed_joint(
                parts.hull.body,
                self.tuning.control_zone_anchor,
                parts.control_zone.body,
                Vec3::ZERO,
            ));
        }
    }

    /// Per-frame state machine.
    #[allow(clippy::too_many_arguments)]
    pub fn update<P: PhysicsWorld>(
        &mut self,
        physics: &mut P,
        scene: &mut Scene,
        frame: &FrameInfo,
        input: &FrameInput,
        camera: &CameraView,
        hulls: &HullPositions,
    ) {
        let Some(parts) = self.parts else {
            return;
        };
        let fi = frame.dt_factor();

        // Lift is applied to every balloon, attached or not; a cut balloon
        // drifts away.
        let offset = gravity_offset(&self.tuning, self.attached());
        for (rig, spec) in parts.balloons.iter().zip(&self.tuning.balloons) {
            physics.add_force(rig.part.body, Vec3::new(0.0, spec.lift, 0.0), ForceMode::Force);
        }

        let bob = self.bob.advance(self.tuning.float_amplitude, fi);
        let heave = bob - offset;

        if input.toggle_control {
            self.toggle_control();
        }

        let hull_pos = scene.translation(parts.hull.entity).unwrap_or(Vec3::ZERO);
        if self.player_controlled {
            self.drive_player(physics, scene, &parts, hull_pos, heave, input, camera, fi);
        } else if self.autopilot.is_some() {
            self.drive_autopilot(physics, scene, &parts, hull_pos, heave, camera, hulls, fi);
        }

        self.place_attachments(physics, scene, &parts);
        self.release_depleted_joints(physics);
        self.upkeep_projectiles(physics, scene, frame.delta_seconds);
    }

    /// Mirror the live cloth into its mesh. Runs after every vessel has updated.
    pub fn update_decorations(&mut self, scene: &Scene) {
        let (Some(parts), Some(cloth)) = (self.parts.as_ref(), self.cloth.as_mut()) else {
            return;
        };
        if let Some(pos) = scene.translation(parts.cloth) {
            cloth.update(pos);
        }
    }

    /// Pull simulated positions of free bodies back into the scene.
    pub fn sync_from_physics<P: PhysicsWorld>(&self, physics: &P, scene: &mut Scene) {
        let Some(parts) = self.parts.as_ref() else {
            return;
        };
        let free = parts
            .balloons
            .iter()
            .map(|b| b.part)
            .chain(std::iter::once(parts.control_zone))
            .map(|p| (p.entity, p.body))
            .chain(self.projectiles.iter().map(|p| (p.entity, p.body)));
        for (entity, body) in free {
            if let Some(pos) = physics.body_position(body) {
                scene.set_translation(entity, pos);
            }
        }
    }

    /// Fire a projectile from the barrel. Returns `None` before setup.
    pub fn shoot<P: PhysicsWorld>(&mut self, physics: &mut P, scene: &mut Scene) -> Option<ProjectileId> {
        let parts = self.parts?;
        let barrel = scene.translation(parts.barrel.entity)?;
        let cannon = &self.tuning.cannon;
        let shot = launch(
            self.facing_left,
            barrel,
            self.barrel_angle_deg.to_radians(),
            self.aim_vector,
            cannon,
        );

        let id = ProjectileId(self.next_projectile);
        self.next_projectile += 1;
        let tag = ColliderTag::Projectile(self.id, id);
        let material = self.tuning.material;

        let entity = scene.spawn_child(parts.root, "projectile", Transform::from_translation(shot.position));
        let body = physics.create_body(BodyDesc::dynamic(shot.position, cannon.projectile_mass));
        physics.set_axis_locks(body, AxisLocks::PLANAR_XY);
        physics.attach_collider(
            body,
            ColliderDesc::trigger(Shape::Sphere { radius: cannon.trigger_radius }, material, tag),
        );
        physics.attach_collider(
            body,
            ColliderDesc::solid(Shape::Sphere { radius: cannon.projectile_radius }, material, tag),
        );
        physics.add_force(body, shot.impulse, ForceMode::Impulse);

        self.projectiles.push(Projectile::new(id, entity, body, cannon.damage));
        self.reload_timer = 0.0;
        self.shot_latched = true;
        debug!(vessel = ?self.id, projectile = ?id, position = ?shot.position, impulse = ?shot.impulse, "fired");
        Some(id)
    }

    pub fn do_damage(&mut self, part: VesselPart, amount: f32) {
        self.health.damage(part, amount);
        debug!(vessel = ?self.id, ?part, amount, remaining = self.health.get(part), "damage taken");
    }

    /// Consume a projectile's hit: the damage it deals, or `None` if it has
    /// already struck something (or is unknown).
    pub fn claim_hit(&mut self, projectile: ProjectileId) -> Option<f32> {
        self.projectiles
            .iter_mut()
            .find(|p| p.id == projectile)
            .and_then(Projectile::strike)
    }

    /// Restore all counters to their tuned values. Released joints stay released.
    pub fn reset_health(&mut self) {
        self.health = Health::from_tuning(&self.tuning);
    }

    pub fn set_controllable(&mut self, controllable: bool) {
        if self.controllable != controllable {
            debug!(vessel = ?self.id, controllable, "control zone changed");
        }
        self.controllable = controllable;
    }

    /// Arm or disarm the autopilot against two opponents.
    pub fn set_autonomous(
        &mut self,
        active: bool,
        opponents: [VesselId; 2],
        hulls: &HullPositions,
    ) -> Result<(), FleetError> {
        if !active {
            self.autopilot = None;
            return Ok(());
        }
        if opponents.contains(&self.id) {
            return Err(FleetError::SelfTarget(self.id));
        }
        let own = hulls.get(self.id).unwrap_or(Vec3::ZERO);
        let pilot = Autopilot::new(opponents, own, hulls, self.tuning.autopilot.fire_threshold);
        info!(vessel = ?self.id, target = ?pilot.target, "autopilot armed");
        self.autopilot = Some(pilot);
        Ok(())
    }

    /// Release every remaining joint and remove all bodies and entities.
    pub fn teardown<P: PhysicsWorld>(&mut self, physics: &mut P, scene: &mut Scene) {
        let Some(mut parts) = self.parts.take() else {
            return;
        };
        for rig in parts.balloons.iter_mut() {
            if let Some(joint) = rig.joint.take() {
                physics.release_joint(joint);
            }
        }
        if let Some(joint) = parts.zone_joint.take() {
            physics.release_joint(joint);
        }
        for p in self.projectiles.drain(..) {
            physics.remove_body(p.body);
        }
        physics.remove_body(parts.hull.body);
        for rig in &parts.balloons {
            physics.remove_body(rig.part.body);
        }
        physics.remove_body(parts.control_zone.body);
        physics.remove_body(parts.turret_base.body);
        physics.remove_body(parts.barrel.body);
        scene.despawn(parts.root);
        self.cloth = None;
    }

    // ----- accessors -----

    pub fn id(&self) -> VesselId {
        self.id
    }

    pub fn facing_left(&self) -> bool {
        self.facing_left
    }

    pub fn tuning(&self) -> &VesselTuning {
        &self.tuning
    }

    pub fn health(&self) -> &Health {
        &self.health
    }

    pub fn total_health(&self) -> i32 {
        self.health.total_display()
    }

    pub fn hull_health(&self) -> f32 {
        self.health.get(VesselPart::Hull) / self.tuning.hull_display_divisor
    }

    /// Balloon health on the 0..10 display scale.
    pub fn balloon_health(&self, tier: BalloonTier) -> f32 {
        self.health.get(VesselPart::Balloon(tier)) / self.tuning.balloon(tier).display_divisor * 10.0
    }

    /// Attachment flags for big, mid, small.
    pub fn attached(&self) -> [bool; 3] {
        match &self.parts {
            Some(parts) => parts.balloons.map(|b| b.joint.is_some()),
            None => [false; 3],
        }
    }

    pub fn is_attached(&self, tier: BalloonTier) -> bool {
        self.attached()[tier.index()]
    }

    pub fn balloon_tint(&self, tier: BalloonTier) -> Option<Rgba> {
        self.parts.as_ref().map(|p| p.balloons[tier.index()].tint)
    }

    pub fn balloon_body(&self, tier: BalloonTier) -> Option<BodyHandle> {
        self.parts.as_ref().map(|p| p.balloons[tier.index()].part.body)
    }

    pub fn hull_entity(&self) -> Option<EntityId> {
        self.parts.as_ref().map(|p| p.hull.entity)
    }

    pub fn barrel_entity(&self) -> Option<EntityId> {
        self.parts.as_ref().map(|p| p.barrel.entity)
    }

    pub fn turret_base_entity(&self) -> Option<EntityId> {
        self.parts.as_ref().map(|p| p.turret_base.entity)
    }

    pub fn cloth_entity(&self) -> Option<EntityId> {
        self.parts.as_ref().map(|p| p.cloth)
    }

    pub fn hull_position(&self, scene: &Scene) -> Option<Vec3> {
        self.hull_entity().and_then(|e| scene.translation(e))
    }

    pub fn can_be_controlled(&self) -> bool {
        self.controllable
    }

    pub fn control_mode(&self) -> ControlMode {
        if self.player_controlled {
            ControlMode::Player
        } else if self.autopilot.is_some() {
            ControlMode::Autonomous
        } else {
            ControlMode::Uncontrolled
        }
    }

    pub fn autopilot(&self) -> Option<&Autopilot> {
        self.autopilot.as_ref()
    }

    pub fn momentum(&self) -> Momentum {
        self.momentum
    }

    pub fn floating(&self) -> FloatingBob {
        self.bob
    }

    pub fn barrel_angle_deg(&self) -> f32 {
        self.barrel_angle_deg
    }

    pub fn reload_time(&self) -> f32 {
        self.reload_timer
    }

    pub fn projectiles(&self) -> &[Projectile] {
        &self.projectiles
    }

    pub fn cloth(&self) -> Option<&ClothSurface<S>> {
        self.cloth.as_ref()
    }

    pub fn cloth_mut(&mut self) -> Option<&mut ClothSurface<S>> {
        self.cloth.as_mut()
    }

    // ----- internals -----

    fn mirrored(&self, offset: Vec3) -> Vec3 {
        if self.facing_left {
            offset
        } else {
            Vec3::new(-offset.x, offset.y, offset.z)
        }
    }

    fn toggle_control(&mut self) {
        if self.player_controlled {
            self.player_controlled = false;
            info!(vessel = ?self.id, "player left the helm");
        } else if self.controllable {
            self.player_controlled = true;
            info!(vessel = ?self.id, "player took the helm");
        }
    }

    fn move_hull<P: PhysicsWorld>(physics: &mut P, scene: &mut Scene, parts: &Parts, position: Vec3) {
        scene.set_translation(parts.hull.entity, position);
        physics.set_body_position(parts.hull.body, position);
    }

    #[allow(clippy::too_many_arguments)]
    fn drive_player<P: PhysicsWorld>(
        &mut self,
        physics: &mut P,
        scene: &mut Scene,
        parts: &Parts,
        hull_pos: Vec3,
        heave: f32,
        input: &FrameInput,
        camera: &CameraView,
        fi: f32,
    ) {
        self.momentum.steer(input, &self.tuning, fi);
        let next = hull_pos
            + Vec3::new(self.momentum.horizontal, self.momentum.vertical + heave, 0.0);
        Self::move_hull(physics, scene, parts, next);

        if let Some(barrel) = scene.translation(parts.barrel.entity) {
            let mouse = pixels_to_ndc(input.mouse_position, camera.viewport);
            let angle = clamp_player_aim(
                aim_at_ndc(camera, barrel, mouse),
                self.tuning.aim_min_deg,
                self.tuning.aim_max_deg,
            );
            self.barrel_angle_deg = angle;
            self.aim_vector = angle.to_radians();
        }

        if input.fire {
            if !self.shot_latched && self.reload_timer >= self.tuning.cannon.reload {
                self.shoot(physics, scene);
            }
        } else {
            self.shot_latched = false;
        }
        if !self.shot_latched {
            self.reload_timer += self.tuning.cannon.reload_tick;
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn drive_autopilot<P: PhysicsWorld>(
        &mut self,
        physics: &mut P,
        scene: &mut Scene,
        parts: &Parts,
        hull_pos: Vec3,
        heave: f32,
        camera: &CameraView,
        hulls: &HullPositions,
        fi: f32,
    ) {
        let Some(pilot) = self.autopilot.as_mut() else {
            return;
        };
        let Some(target_pos) = pilot.retarget(hull_pos, hulls) else {
            return;
        };
        let delta = pilot.steer(&*physics, self.id, hull_pos, target_pos, &self.tuning.autopilot, fi);
        Self::move_hull(physics, scene, parts, hull_pos + delta + Vec3::new(0.0, heave, 0.0));

        if let Some(barrel) = scene.translation(parts.barrel.entity) {
            let target_ndc = world_to_ndc(camera.view_proj, target_pos);
            let angle = aim_at_ndc(camera, barrel, target_ndc);
            self.barrel_angle_deg = angle;
            self.aim_vector = angle.to_radians();
        }

        let engage = self.tuning.autopilot.engage_range;
        let threshold = self.tuning.autopilot.fire_threshold;
        if proximity_heuristic(hull_pos, target_pos) >= engage {
            return;
        }
        let ready = self
            .autopilot
            .as_mut()
            .map(|p| {
                let ready = p.fire_timer > threshold;
                if ready {
                    p.fire_timer = 0.0;
                }
                ready
            })
            .unwrap_or(false);
        if ready {
            self.shoot(physics, scene);
        }
        let bump = self.rng.gen_range(1..=2) as f32 / 100.0;
        if let Some(p) = self.autopilot.as_mut() {
            p.fire_timer += bump;
        }
    }

    fn place_attachments<P: PhysicsWorld>(&self, physics: &mut P, scene: &mut Scene, parts: &Parts) {
        let Some(hull) = scene.translation(parts.hull.entity) else {
            return;
        };
        let planar = |offset: Vec3| {
            let p = hull + self.mirrored(offset);
            Vec3::new(p.x, p.y, 0.0)
        };

        let base = planar(self.tuning.turret_base_offset);
        scene.set_translation(parts.turret_base.entity, base);
        physics.set_body_position(parts.turret_base.body, base);

        let barrel = planar(self.tuning.turret_barrel_offset);
        let roll = Quat::from_rotation_z(self.barrel_angle_deg.to_radians());
        scene.set_translation(parts.barrel.entity, barrel);
        scene.set_rotation(parts.barrel.entity, roll);
        physics.set_body_position(parts.barrel.body, barrel);
        physics.set_body_rotation(parts.barrel.body, roll);

        scene.set_translation(parts.cloth, planar(self.tuning.cloth_offset));
    }

    fn release_depleted_joints<P: PhysicsWorld>(&mut self, physics: &mut P) {
        let Some(parts) = self.parts.as_mut() else {
            return;
        };
        let attached = parts.balloons.map(|b| b.joint.is_some());
        let plan = self.health.release_plan(attached);
        for tier in BalloonTier::ALL {
            if !plan[tier.index()] {
                continue;
            }
            if let Some(joint) = parts.balloons[tier.index()].joint.take() {
                physics.release_joint(joint);
                info!(vessel = ?self.id, ?tier, "balloon cut loose");
            }
        }
    }

    fn upkeep_projectiles<P: PhysicsWorld>(&mut self, physics: &mut P, scene: &mut Scene, dt: f32) {
        let drop = Vec3::new(0.0, -self.tuning.cannon.drop_force, 0.0);
        for p in &mut self.projectiles {
            physics.add_force(p.body, drop, ForceMode::Force);
            p.age += dt;
        }

        let policy = &self.tuning.projectiles;
        let excess = self.projectiles.len().saturating_sub(policy.max_live);
        let mut index = 0;
        self.projectiles.retain(|p| {
            let keep = index >= excess && p.age <= policy.ttl_secs;
            index += 1;
            if !keep {
                physics.remove_body(p.body);
                scene.despawn(p.entity);
            }
            keep
        });
    }
}

fn balloon_name(tier: BalloonTier) -> &'static str {
    match tier {
        BalloonTier::Big => "balloon_big",
        BalloonTier::Mid => "balloon_mid",
        BalloonTier::Small => "balloon_small",
    }
}
