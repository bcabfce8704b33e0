use thiserror::Error;

use crate::collab::VesselId;

/// Precondition violations detected while building fleet objects.
///
/// Gameplay state transitions (damage, joint release) never fail; they are
/// guarded by state flags instead.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum FleetError {
    #[error("cloth {what} must be finite and positive, got {value}")]
    InvalidClothDimension { what: &'static str, value: f32 },
    #[error("cloth resolution {resolution} exceeds the supported maximum of {max}")]
    ResolutionTooLarge { resolution: u32, max: u32 },
    #[error("{what} must be finite")]
    NonFinite { what: &'static str },
    #[error("unknown vessel {0:?}")]
    UnknownVessel(VesselId),
    #[error("vessel {0:?} has not been set up")]
    VesselNotReady(VesselId),
    #[error("vessel {0:?} cannot pursue itself")]
    SelfTarget(VesselId),
}
