use bevy_math::Vec3;
use tracing::{debug, info};

use crate::collab::{
    BodyDesc, BodyHandle, ClothSolver, ColliderDesc, ColliderTag, PhysicsWorld, ProjectileId,
    Shape, TriggerAction, TriggerEvent, VesselId,
};
use crate::error::FleetError;
use crate::input::{CameraView, FrameInfo, FrameInput};
use crate::scene::{EntityId, Scene, Transform};
use crate::vessel::{CompositeVessel, HullPositions, VesselPart, VesselTuning};

// Spreads per-vessel seeds so neighbouring ids get unrelated streams.
const SEED_SPREAD: u64 = 0x9E37_79B9_7F4A_7C15;
const PLAYER_RADIUS: f32 = 3.0;

/// Owns the collaborators, the scene and every vessel, and runs them in a
/// fixed order each frame.
pub struct Fleet<P, C: ClothSolver> {
    physics: P,
    cloth_solver: C,
    scene: Scene,
    tuning: VesselTuning,
    seed: u64,
    vessels: Vec<CompositeVessel<C::Simulation>>,
    player: Option<(EntityId, BodyHandle)>,
    hulls: HullPositions,
    frame: u64,
}

impl<P: PhysicsWorld, C: ClothSolver> Fleet<P, C> {
    pub fn new(physics: P, cloth_solver: C, tuning: VesselTuning, seed: u64) -> Self {
        Self {
            physics,
            cloth_solver,
            scene: Scene::new(),
            tuning,
            seed,
            vessels: Vec::new(),
            player: None,
            hulls: HullPositions::new(),
            frame: 0,
        }
    }

    /// Build a vessel at `origin` and rig its joints.
    pub fn spawn_vessel(&mut self, facing_left: bool, origin: Vec3) -> Result<VesselId, FleetError> {
        let id = VesselId(self.vessels.len() as u32);
        let seed = self.seed ^ u64::from(id.0).wrapping_mul(SEED_SPREAD);
        let mut vessel = CompositeVessel::new(id, facing_left, self.tuning.clone(), seed);
        vessel.setup(&mut self.physics, &mut self.cloth_solver, &mut self.scene, origin)?;
        vessel.post_setup(&mut self.physics);
        if let Some(pos) = vessel.hull_position(&self.scene) {
            self.hulls.insert(id, pos);
        }
        self.vessels.push(vessel);
        Ok(id)
    }

    pub fn set_autonomous(
        &mut self,
        id: VesselId,
        active: bool,
        opponents: [VesselId; 2],
    ) -> Result<(), FleetError> {
        for opponent in opponents {
            self.ensure_known(opponent)?;
        }
        self.snapshot_hulls();
        let hulls = &self.hulls;
        self.vessels
            .get_mut(id.0 as usize)
            .ok_or(FleetError::UnknownVessel(id))?
            .set_autonomous(active, opponents, hulls)
    }

    /// Place the sandbox player body. Its collider is what control zones react to.
    pub fn spawn_player(&mut self, position: Vec3) {
        if self.player.is_some() {
            self.move_player(position);
            return;
        }
        let entity = self.scene.spawn("player", Transform::from_translation(position));
        let body = self.physics.create_body(BodyDesc::kinematic(position));
        self.physics.attach_collider(
            body,
            ColliderDesc::solid(
                Shape::Sphere { radius: PLAYER_RADIUS },
                self.tuning.material,
                ColliderTag::Player,
            ),
        );
        self.player = Some((entity, body));
    }

    pub fn move_player(&mut self, position: Vec3) {
        if let Some((entity, body)) = self.player {
            self.scene.set_translation(entity, position);
            self.physics.set_body_position(body, position);
        }
    }

    /// One frame: route contacts, update vessels in spawn order, then their cloth.
    pub fn step(&mut self, frame: &FrameInfo, input: &FrameInput, camera: &CameraView) {
        for event in self.physics.drain_trigger_events() {
            self.route(event);
        }

        self.snapshot_hulls();
        for vessel in &mut self.vessels {
            vessel.update(&mut self.physics, &mut self.scene, frame, input, camera, &self.hulls);
        }
        for vessel in &mut self.vessels {
            vessel.update_decorations(&self.scene);
        }
        self.frame += 1;
    }

    /// Copy simulated body positions back into the scene.
    pub fn sync_from_physics(&mut self) {
        for vessel in &self.vessels {
            vessel.sync_from_physics(&self.physics, &mut self.scene);
        }
    }

    pub fn damage(&mut self, id: VesselId, part: VesselPart, amount: f32) -> Result<(), FleetError> {
        self.vessel_mut(id)?.do_damage(part, amount);
        Ok(())
    }

    /// Fire a vessel's cannon regardless of its reload state.
    pub fn fire(&mut self, id: VesselId) -> Result<ProjectileId, FleetError> {
        let vessel = self
            .vessels
            .get_mut(id.0 as usize)
            .ok_or(FleetError::UnknownVessel(id))?;
        vessel
            .shoot(&mut self.physics, &mut self.scene)
            .ok_or(FleetError::VesselNotReady(id))
    }

    pub fn vessel(&self, id: VesselId) -> Option<&CompositeVessel<C::Simulation>> {
        self.vessels.get(id.0 as usize)
    }

    pub fn vessel_mut(&mut self, id: VesselId) -> Result<&mut CompositeVessel<C::Simulation>, FleetError> {
        self.vessels.get_mut(id.0 as usize).ok_or(FleetError::UnknownVessel(id))
    }

    pub fn vessels(&self) -> &[CompositeVessel<C::Simulation>] {
        &self.vessels
    }

    pub fn hull_positions(&self) -> &HullPositions {
        &self.hulls
    }

    pub fn physics(&self) -> &P {
        &self.physics
    }

    pub fn physics_mut(&mut self) -> &mut P {
        &mut self.physics
    }

    pub fn cloth_solver(&self) -> &C {
        &self.cloth_solver
    }

    pub fn cloth_solver_mut(&mut self) -> &mut C {
        &mut self.cloth_solver
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Tear down every vessel and the player.
    pub fn teardown(&mut self) {
        for vessel in &mut self.vessels {
            vessel.teardown(&mut self.physics, &mut self.scene);
        }
        if let Some((entity, body)) = self.player.take() {
            self.physics.remove_body(body);
            self.scene.despawn(entity);
        }
        self.hulls = HullPositions::new();
        info!(vessels = self.vessels.len(), "fleet torn down");
    }

    fn ensure_known(&self, id: VesselId) -> Result<(), FleetError> {
        if (id.0 as usize) < self.vessels.len() {
            Ok(())
        } else {
            Err(FleetError::UnknownVessel(id))
        }
    }

    fn snapshot_hulls(&mut self) {
        for vessel in &self.vessels {
            if let Some(pos) = vessel.hull_position(&self.scene) {
                self.hulls.insert(vessel.id(), pos);
            }
        }
    }

    fn route(&mut self, event: TriggerEvent) {
        match (event.trigger, event.other) {
            (ColliderTag::ControlZone(owner), ColliderTag::Player) => {
                if let Some(vessel) = self.vessels.get_mut(owner.0 as usize) {
                    vessel.set_controllable(event.action == TriggerAction::Enter);
                }
            }
            (ColliderTag::Projectile(shooter, projectile), struck) => {
                if event.action != TriggerAction::Enter {
                    return;
                }
                let (target, part) = match struck {
                    ColliderTag::Hull(target) => (target, VesselPart::Hull),
                    ColliderTag::Balloon(target, tier) => (target, VesselPart::Balloon(tier)),
                    ColliderTag::ControlZone(_)
                    | ColliderTag::Turret(_)
                    | ColliderTag::Projectile(..)
                    | ColliderTag::Player
                    | ColliderTag::Scenery => return,
                };
                let Some(amount) = self
                    .vessels
                    .get_mut(shooter.0 as usize)
                    .and_then(|v| v.claim_hit(projectile))
                else {
                    return;
                };
                if let Some(vessel) = self.vessels.get_mut(target.0 as usize) {
                    vessel.do_damage(part, amount);
                    debug!(?shooter, ?projectile, ?target, ?part, amount, "projectile impact");
                }
            }
            (
                ColliderTag::ControlZone(_)
                | ColliderTag::Hull(_)
                | ColliderTag::Balloon(..)
                | ColliderTag::Turret(_)
                | ColliderTag::Player
                | ColliderTag::Scenery,
                _,
            ) => {}
        }
    }
}
