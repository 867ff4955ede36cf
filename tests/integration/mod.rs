//! Integration tests for the Pagewright layout quality gate

mod config_loading;
mod controller_loop;
mod ingest_aliases;
mod scenarios;
mod telemetry_sinks;
mod test_utils;
