//! # Rank Baseline
//!
//! Samples ranked replays from ballchasing.com and reports the mean
//! per-player statistics of a skill rank over a date window.
//!
//! ## Architecture
//!
//! - **models**: Ranks, stat categories, replay IDs and stat tables
//! - **fetch**: Authenticated HTTP access to the provider
//! - **sync**: Provider client, replay locator, stat extraction and the run orchestrator
//! - **calculate**: Mean aggregation
//! - **storage**: Run directories, mean CSVs and debug dumps
//! - **config**: Configuration loading and validation

pub mod calculate;
pub mod config;
pub mod fetch;
pub mod models;
pub mod storage;
pub mod sync;

pub use models::*;
