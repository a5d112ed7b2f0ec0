pub mod drivers;
pub mod errors;
pub mod field;
pub mod io;
pub mod projector;
pub mod random;
pub mod stats;
pub mod template;
pub mod timeseries;
