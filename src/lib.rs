//! Nil AI Credential Diagnostics
//!
//! Probes a hosted LLM API with two credentials, classifies the outcome
//! into one named scenario and produces actionable recommendations.
//!
//! # Features
//!
//! - Six probes run in a fixed order, each bounded by a timeout
//! - Deterministic rule-table classification into seven scenarios
//! - Per-scenario recommendation templates
//! - JSON, text and Markdown reports with masked credentials
//! - Cancellation that still yields a partial, classified report
//!
//! # Quick Start
//!
//! ```bash
//! NILAI_API_KEY=<64 hex chars> ./nilai-diagnostics --json
//! ```
//!
//! # Architecture
//!
//! ```text
//! ┌──────────┐   Config   ┌───────────────────┐   HTTP   ┌─────────────┐
//! │   CLI    │───────────▶│ DiagnosticService │─────────▶│  Nil AI API │
//! └──────────┘            └─────────┬─────────┘          └─────────────┘
//!      ▲                            │ ProbeResultSet
//!      │        Report              ▼
//!      └──────────────── classify + generate
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod cli;
pub mod client;
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod report;
pub mod traits;

#[cfg(test)]
mod test_utils;
