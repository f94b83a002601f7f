//! Command-line front end for the labor supply simulator
//!
//! Loads a YAML configuration, runs `laborsim_core`, and writes the stacked
//! dataset as CSV or JSON.

pub mod commands;
pub mod config;
pub mod error;
pub mod logging;
pub mod output;
pub mod util;

pub use error::DataError;
pub use logging::init_logging;
