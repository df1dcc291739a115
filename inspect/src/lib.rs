//! Squads Inspect - offline inspector for Squads instructions.
//!
//! Derives every address of a squad and encodes a sample instruction batch
//! without touching the network, then reports both as JSON.
//!
//! # Components
//!
//! - [`config`]: Environment configuration
//! - [`report`]: Address derivation and batch description

pub mod config;
pub mod report;

pub use config::{ConfigError, InspectConfig};
pub use report::{build_report, describe_instruction, InspectReport};
