//! Command handlers -- one module per subcommand

pub mod config;
pub mod detectors;
pub mod generate;
