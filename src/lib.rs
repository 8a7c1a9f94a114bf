//! # RTL433 Reader Library
//!
//! Extract the latest telemetry reading per monitored device from an
//! `rtl_433` JSON-lines log, and keep that log trimmed.
//!
//! This library provides the device catalog, the backward-scan matcher that
//! builds a telemetry snapshot, and the log trimmer that compacts the log to
//! the lines the next scan still needs.

pub mod catalog;
pub mod config;
pub mod error;
pub mod reader;
pub mod scanner;
pub mod trimmer;
