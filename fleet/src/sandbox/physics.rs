use std::collections::BTreeSet;

use bevy_math::{Quat, Vec3};
use tracing::{trace, warn};

use crate::collab::{
    AxisLocks, BodyDesc, BodyHandle, BodyKind, ColliderDesc, ForceMode, JointHandle, PhysicsWorld,
    RayHit, Shape, TriggerAction, TriggerEvent, VesselId,
};

/// Counters the tests inspect.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SandboxStats {
    pub bodies_created: u32,
    pub joints_created: u32,
    pub released_joints: u32,
    /// Releases of joints that were already released.
    pub double_releases: u32,
}

#[derive(Debug, Clone)]
struct Body {
    kind: BodyKind,
    position: Vec3,
    rotation: Quat,
    velocity: Vec3,
    mass: f32,
    locks: AxisLocks,
    force: Vec3,
    colliders: Vec<ColliderDesc>,
}

#[derive(Debug, Clone, Copy)]
struct Joint {
    a: BodyHandle,
    local_a: Vec3,
    b: BodyHandle,
    local_b: Vec3,
    active: bool,
}

/// (trigger body, trigger collider, other body, other collider)
type OverlapKey = (u32, usize, u32, usize);

/// World-space collision volume.
#[derive(Debug, Clone, Copy)]
enum Volume {
    Sphere { center: Vec3, radius: f32 },
    Aabb { min: Vec3, max: Vec3 },
}

impl Volume {
    fn of(shape: &Shape, position: Vec3) -> Self {
        match shape {
            Shape::Sphere { radius } => Volume::Sphere { center: position, radius: *radius },
            Shape::Cuboid { half_extents } | Shape::TriangleMesh { half_extents, .. } => Volume::Aabb {
                min: position - *half_extents,
                max: position + *half_extents,
            },
        }
    }

    fn overlaps(&self, other: &Volume) -> bool {
        match (*self, *other) {
            (Volume::Sphere { center: a, radius: ra }, Volume::Sphere { center: b, radius: rb }) => {
                a.distance_squared(b) <= (ra + rb) * (ra + rb)
            }
            (Volume::Sphere { center, radius }, Volume::Aabb { min, max })
            | (Volume::Aabb { min, max }, Volume::Sphere { center, radius }) => {
                center.clamp(min, max).distance_squared(center) <= radius * radius
            }
            (Volume::Aabb { min: amin, max: amax }, Volume::Aabb { min: bmin, max: bmax }) => {
                amin.cmple(bmax).all() && bmin.cmple(amax).all()
            }
        }
    }

    /// Entry distance of a ray, if it hits within `max`.
    fn ray(&self, origin: Vec3, dir: Vec3, max: f32) -> Option<f32> {
        let t = match *self {
            Volume::Sphere { center, radius } => {
                let oc = origin - center;
                let b = oc.dot(dir);
                let c = oc.length_squared() - radius * radius;
                if c <= 0.0 {
                    return Some(0.0);
                }
                let disc = b * b - c;
                if disc < 0.0 || b > 0.0 {
                    return None;
                }
                -b - disc.sqrt()
            }
            Volume::Aabb { min, max: hi } => {
                let mut near = f32::NEG_INFINITY;
                let mut far = f32::INFINITY;
                for axis in 0..3 {
                    let (o, d) = (origin[axis], dir[axis]);
                    if d.abs() < f32::EPSILON {
                        if o < min[axis] || o > hi[axis] {
                            return None;
                        }
                        continue;
                    }
                    let t1 = (min[axis] - o) / d;
                    let t2 = (hi[axis] - o) / d;
                    near = near.max(t1.min(t2));
                    far = far.min(t1.max(t2));
                }
                if near > far || far < 0.0 {
                    return None;
                }
                near.max(0.0)
            }
        };
        (t <= max).then_some(t)
    }
}

/// Minimal deterministic rigid-body world: point-mass bodies, rigid fixed
/// joints and sphere/box overlap tests.
///
/// Triangle meshes collide as their bounding box, rotations never affect
/// collision, and teleporting a body clears its velocity.
#[derive(Debug, Clone)]
pub struct SandboxPhysics {
    bodies: Vec<Option<Body>>,
    joints: Vec<Joint>,
    gravity: Vec3,
    linear_damping: f32,
    overlaps: BTreeSet<OverlapKey>,
    events: Vec<TriggerEvent>,
    stats: SandboxStats,
}

impl Default for SandboxPhysics {
    fn default() -> Self {
        Self::new(Vec3::new(0.0, -9.81, 0.0))
    }
}

impl SandboxPhysics {
    pub fn new(gravity: Vec3) -> Self {
        Self {
            bodies: Vec::new(),
            joints: Vec::new(),
            gravity,
            linear_damping: 0.05,
            overlaps: BTreeSet::new(),
            events: Vec::new(),
            stats: SandboxStats::default(),
        }
    }

    pub fn stats(&self) -> SandboxStats {
        self.stats
    }

    pub fn live_bodies(&self) -> usize {
        self.bodies.iter().filter(|b| b.is_some()).count()
    }

    pub fn body_velocity(&self, body: BodyHandle) -> Option<Vec3> {
        self.body(body).map(|b| b.velocity)
    }

    pub fn body_rotation(&self, body: BodyHandle) -> Option<Quat> {
        self.body(body).map(|b| b.rotation)
    }

    pub fn is_joint_active(&self, joint: JointHandle) -> bool {
        self.joints.get(joint.0 as usize).is_some_and(|j| j.active)
    }

    pub fn active_joints(&self) -> usize {
        self.joints.iter().filter(|j| j.active).count()
    }

    /// Advance the world by `dt` seconds and queue trigger events.
    pub fn step(&mut self, dt: f32) {
        let damping = (1.0 - self.linear_damping * dt).max(0.0);
        for body in self.bodies.iter_mut().flatten() {
            if body.kind != BodyKind::Dynamic {
                body.force = Vec3::ZERO;
                continue;
            }
            let accel = self.gravity + body.force / body.mass.max(f32::EPSILON);
            body.velocity = lock_translation((body.velocity + accel * dt) * damping, body.locks);
            body.position += body.velocity * dt;
            body.force = Vec3::ZERO;
        }
        self.solve_joints();
        self.detect_overlaps();
    }

    fn body(&self, handle: BodyHandle) -> Option<&Body> {
        self.bodies.get(handle.0 as usize).and_then(Option::as_ref)
    }

    fn body_mut(&mut self, handle: BodyHandle) -> Option<&mut Body> {
        self.bodies.get_mut(handle.0 as usize).and_then(Option::as_mut)
    }

    fn solve_joints(&mut self) {
        for i in 0..self.joints.len() {
            let joint = self.joints[i];
            if !joint.active {
                continue;
            }
            let Some(anchor) = self.body(joint.a).map(|a| a.position + joint.local_a) else {
                continue;
            };
            if let Some(b) = self.body_mut(joint.b) {
                b.position = anchor - joint.local_b;
                b.velocity = Vec3::ZERO;
            }
        }
    }

    fn detect_overlaps(&mut self) {
        let mut current = BTreeSet::new();
        for (ti, trigger_body) in self.bodies.iter().enumerate() {
            let Some(trigger_body) = trigger_body else { continue };
            for (tc, trigger) in trigger_body.colliders.iter().enumerate() {
                if !trigger.is_trigger {
                    continue;
                }
                let tv = Volume::of(&trigger.shape, trigger_body.position);
                for (oi, other_body) in self.bodies.iter().enumerate() {
                    let Some(other_body) = other_body else { continue };
                    if oi == ti {
                        continue;
                    }
                    for (oc, other) in other_body.colliders.iter().enumerate() {
                        if other.is_trigger {
                            continue;
                        }
                        if tv.overlaps(&Volume::of(&other.shape, other_body.position)) {
                            current.insert((ti as u32, tc, oi as u32, oc));
                        }
                    }
                }
            }
        }

        for key in current.difference(&self.overlaps) {
            if let Some(event) = self.event(*key, TriggerAction::Enter) {
                self.events.push(event);
            }
        }
        for key in self.overlaps.difference(&current) {
            if let Some(event) = self.event(*key, TriggerAction::Leave) {
                self.events.push(event);
            }
        }
        self.overlaps = current;
    }

    fn event(&self, (tb, tc, ob, oc): OverlapKey, action: TriggerAction) -> Option<TriggerEvent> {
        let trigger = self.body(BodyHandle(tb))?.colliders.get(tc)?.tag;
        let other = self.body(BodyHandle(ob))?.colliders.get(oc)?.tag;
        trace!(?trigger, ?other, ?action, "overlap");
        Some(TriggerEvent { trigger, other, action })
    }
}

fn lock_translation(v: Vec3, locks: AxisLocks) -> Vec3 {
    Vec3::new(
        if locks.translation[0] { 0.0 } else { v.x },
        if locks.translation[1] { 0.0 } else { v.y },
        if locks.translation[2] { 0.0 } else { v.z },
    )
}

impl PhysicsWorld for SandboxPhysics {
    fn create_body(&mut self, desc: BodyDesc) -> BodyHandle {
        let handle = BodyHandle(self.bodies.len() as u32);
        self.bodies.push(Some(Body {
            kind: desc.kind,
            position: desc.position,
            rotation: Quat::IDENTITY,
            velocity: Vec3::ZERO,
            mass: desc.mass,
            locks: AxisLocks::default(),
            force: Vec3::ZERO,
            colliders: Vec::new(),
        }));
        self.stats.bodies_created += 1;
        handle
    }

    fn attach_collider(&mut self, body: BodyHandle, collider: ColliderDesc) {
        match self.body_mut(body) {
            Some(b) => b.colliders.push(collider),
            None => warn!(?body, "collider attached to a missing body"),
        }
    }

    fn remove_body(&mut self, body: BodyHandle) {
        let Some(slot) = self.bodies.get_mut(body.0 as usize) else {
            return;
        };
        if slot.take().is_none() {
            warn!(?body, "body removed twice");
            return;
        }
        // Joints die with either end; these are not counted as releases.
        for joint in &mut self.joints {
            if joint.a == body || joint.b == body {
                joint.active = false;
            }
        }
        self.overlaps.retain(|(t, _, o, _)| *t != body.0 && *o != body.0);
    }

    fn set_axis_locks(&mut self, body: BodyHandle, locks: AxisLocks) {
        if let Some(b) = self.body_mut(body) {
            b.locks = locks;
        }
    }

    fn body_position(&self, body: BodyHandle) -> Option<Vec3> {
        self.body(body).map(|b| b.position)
    }

    fn set_body_position(&mut self, body: BodyHandle, position: Vec3) {
        if let Some(b) = self.body_mut(body) {
            b.position = position;
            b.velocity = Vec3::ZERO;
        }
    }

    fn set_body_rotation(&mut self, body: BodyHandle, rotation: Quat) {
        if let Some(b) = self.body_mut(body) {
            b.rotation = rotation;
        }
    }

    fn add_force(&mut self, body: BodyHandle, force: Vec3, mode: ForceMode) {
        let Some(b) = self.body_mut(body) else {
            return;
        };
        if b.kind != BodyKind::Dynamic {
            return;
        }
        match mode {
            ForceMode::Force => b.force += force,
            ForceMode::Impulse => {
                let dv = force / b.mass.max(f32::EPSILON);
                b.velocity = lock_translation(b.velocity + dv, b.locks);
            }
        }
    }

    fn create_fixed_joint(
        &mut self,
        a: BodyHandle,
        local_a: Vec3,
        b: BodyHandle,
        local_b: Vec3,
    ) -> JointHandle {
        let handle = JointHandle(self.joints.len() as u32);
        self.joints.push(Joint { a, local_a, b, local_b, active: true });
        self.stats.joints_created += 1;
        handle
    }

    fn release_joint(&mut self, joint: JointHandle) {
        match self.joints.get_mut(joint.0 as usize) {
            Some(j) if j.active => {
                j.active = false;
                self.stats.released_joints += 1;
            }
            Some(_) => {
                self.stats.double_releases += 1;
                warn!(?joint, "joint released twice");
            }
            None => warn!(?joint, "release of unknown joint"),
        }
    }

    fn raycast(
        &self,
        origin: Vec3,
        direction: Vec3,
        max_distance: f32,
        exclude: Option<VesselId>,
    ) -> Option<RayHit> {
        let dir = direction.normalize_or_zero();
        if dir == Vec3::ZERO {
            return None;
        }
        let mut best: Option<RayHit> = None;
        for body in self.bodies.iter().flatten() {
            for collider in &body.colliders {
                if collider.is_trigger || (exclude.is_some() && collider.tag.vessel() == exclude) {
                    continue;
                }
                let Some(distance) = Volume::of(&collider.shape, body.position).ray(origin, dir, max_distance)
                else {
                    continue;
                };
                if best.as_ref().is_none_or(|hit| distance < hit.distance) {
                    best = Some(RayHit { distance, point: origin + dir * distance, tag: collider.tag });
                }
            }
        }
        best
    }

    fn drain_trigger_events(&mut self) -> Vec<TriggerEvent> {
        std::mem::take(&mut self.events)
    }
}
