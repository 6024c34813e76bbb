//! Supply chain risk pipeline
//!
//! Streams supply-chain news through a deduplicating fetcher, a
//! semantic relevance filter, an LLM risk extractor, a deterministic
//! scorer, a graph-based propagator, and an alert synthesizer — five
//! Redis-backed streams connecting three independently-scaling worker
//! stages (spec §4).
//!
//! ## Architecture
//!
//! - **Fetcher** (`ingestion`): polls the news API on a fixed interval,
//!   normalizes and deduplicates raw records onto `normalized_events`.
//! - **Extract worker** (`worker::extract`): relevance-filters then
//!   LLM-extracts risk structure, publishing skeleton
//!   [`domain::RiskEvent`]s to `risk_entities`.
//! - **Score worker** (`worker::score`): runs the deterministic scoring
//!   formula (`scoring`) and the graph propagator (`graph::propagator`).
//! - **Alert worker** (`worker::alert`): synthesizes ranked-alternate-
//!   supplier alerts (`alerts`) and hands them to the
//!   [`notify::Notifier`].

pub mod alerts;
pub mod catalog;
pub mod config;
pub mod dedup;
pub mod domain;
pub mod errors;
pub mod graph;
pub mod ingestion;
pub mod llm;
pub mod notify;
pub mod relevance;
pub mod risk_extraction;
pub mod scheduler;
pub mod scoring;
pub mod store;
pub mod stream;
pub mod worker;
