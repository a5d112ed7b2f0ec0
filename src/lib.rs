//! Probabilistic projections of global mean sea-level rise (GMSLR)
//!
//! Following the method of the IPCC Fifth Assessment Report (AR5), an ensemble of global
//! mean surface temperature change and thermosteric sea-level rise drives projections of
//! each contribution to GMSLR: glaciers, Greenland and Antarctic surface mass balance, ice
//! sheet rapid dynamics and land water storage. Every contribution is computed for each
//! climate realisation and each component realisation, and their sum gives the ensemble
//! of GMSLR, summarised by its median and uncertainty range.
//!
//! ```no_run
//! use rslr::config::ProjectionConfig;
//! use rslr::projection::project;
//!
//! let config = ProjectionConfig {
//!     input: Some("inputs".into()),
//!     output: Some("results".into()),
//!     ..ProjectionConfig::default()
//! };
//! let result = project(&config)?;
//! for projection in &result.projections {
//!     for line in projection.lines() {
//!         println!("{}", line);
//!     }
//! }
//! # Ok::<(), rslr::RSLRError>(())
//! ```

pub mod config;
pub mod ensemble;
pub mod projection;
pub mod report;
pub mod scenario;

pub use config::{AntarcticDynamicsMode, FailurePolicy, ProjectionConfig};
pub use projection::{project, project_scenario, BatchResult, ScenarioProjection};
pub use rslr_core::errors::{RSLRError, RSLRResult};
