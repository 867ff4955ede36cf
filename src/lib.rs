//! Pagewright: Deterministic Layout Quality Gate
//!
//! Evaluates generated page layouts against a fixed house style-guide, scores them on five
//! bounded axes, repairs them through an ordered catalog of safe mutations, and decides
//! across a bounded number of regeneration attempts whether to accept, retry, or fail.

#[macro_use]
mod macros;

pub mod analysis;
pub mod autofix;
pub mod catalog;
pub mod cli;
pub mod config;
pub mod controller;
pub mod error;
pub mod layout;
pub mod logging;
pub mod narrative;
pub mod provider;
pub mod telemetry;
