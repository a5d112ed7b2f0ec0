//! Component parameters
//!
//! Each projector has an associated parameters struct whose defaults are the values used
//! for the AR5 projections.

mod antarctic;
mod glacier;
mod greenland;
mod land_water;
mod scenario;

pub use antarctic::{
    AntarcticDynamicsParameters, AntarcticSMBParameters, LevermannCoefficients, LevermannFit,
};
pub use glacier::{GlacierMethod, GlacierModelFamily, GlacierParameters};
pub use greenland::{GreenlandDynamicsParameters, GreenlandSMBParameters};
pub use land_water::LandWaterParameters;
pub use scenario::ScenarioFamily;
