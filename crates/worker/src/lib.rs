//! `vantage-worker` library crate.
//!
//! Batch host for the validation engine: loads configuration and a job
//! manifest, validates content on a bounded blocking pool, and emits one
//! verdict record per job. The binary entrypoint lives in `main.rs`.

pub mod config;
pub mod error;
pub mod manifest;
pub mod report;
pub mod runner;

pub use error::WorkerError;
