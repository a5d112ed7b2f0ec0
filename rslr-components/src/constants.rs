//! Physical constants shared between components

use rslr_core::timeseries::{FloatValue, Year};

/// Conversion factor from Gt of ice to m of sea-level equivalent
///
/// 1 Gt is spread over an ocean area of 3.61e14 m^2.
pub const M_SLE_PER_GT: FloatValue = 1e12 / 3.61e14 * 1e-3;

/// Last year of the historical period; projected timeseries begin at the end of this year
pub const END_OF_HISTORY: Year = 2006;

/// Sea-level equivalent (m) lost from Antarctica during 1996 to 2005 (AR5 chapter 4)
pub const DANT: FloatValue = (2.37 + 0.13) * 1e-3;

/// Sea-level equivalent (m) lost from Greenland during 1996 to 2005 (AR5 chapter 4)
pub const DGREEN: FloatValue = (3.21 - 0.30) * 1e-3;

/// Fraction of the Greenland loss during 1996 to 2005 attributed to rapid dynamical change
///
/// The remainder is attributed to SMB change.
pub const FGREENDYN: FloatValue = 0.5;

/// mm to m
pub const M_PER_MM: FloatValue = 1e-3;
