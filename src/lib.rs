//! Core library for the `loadprobe` binary.
//!
//! This crate provides the building blocks used by the harness: run
//! configuration, the two endpoint probes, the bounded-concurrency batch
//! runner, latency statistics, and result-set persistence. The primary
//! interface is the `loadprobe` command-line application.
pub mod config;
pub mod export;
pub mod http_probe;
pub mod runner;
pub mod stats;
