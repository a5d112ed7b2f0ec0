//! Component projections of the AR5 contributions to global mean sea-level rise
//!
//! Each contribution is a [`Projector`](rslr_core::projector::Projector) configured from a
//! parameters struct whose defaults are the values assessed in AR5.

pub mod components;
pub mod constants;
pub mod parameters;
