//! Configuration Module
//!
//! Two layers, loaded independently:
//!
//! - [`CompanyProfile`](crate::domain::CompanyProfile) — TOML, one per
//!   tenant, re-readable on SIGHUP (spec §3 lifecycle). Call [`init`] once
//!   at startup, [`get`] anywhere, [`reload`] on SIGHUP.
//! - [`Settings`] — environment-sourced service configuration (urls, API
//!   keys, thresholds, intervals). Loaded once via [`Settings::from_env`]
//!   and threaded through the worker context explicitly — no global for
//!   this one, since it is only ever read at startup.
//!
//! ## Loading order (company profile)
//!
//! 1. `RISK_CONFIG` environment variable (path to TOML file)
//! 2. `./company_profile.toml` in the current working directory
//! 3. Built-in defaults

mod company_profile;
mod settings;
pub mod validation;

pub use company_profile::load_company_profile;
pub use settings::Settings;

use arc_swap::ArcSwap;
use std::sync::OnceLock;

use crate::domain::CompanyProfile;

static COMPANY_PROFILE: OnceLock<ArcSwap<CompanyProfile>> = OnceLock::new();

/// Initialize the global company profile. Must be called exactly once
/// before any call to [`get`].
pub fn init(profile: CompanyProfile) {
    if COMPANY_PROFILE.set(ArcSwap::from_pointee(profile)).is_err() {
        tracing::warn!("config::init() called more than once — ignoring");
    }
}

/// Get the current company profile snapshot.
///
/// Panics if [`init`] has not been called — a missing config is a fatal
/// startup bug, not a recoverable condition.
pub fn get() -> std::sync::Arc<CompanyProfile> {
    COMPANY_PROFILE
        .get()
        .expect("config::get() called before config::init() — this is a startup bug")
        .load_full()
}

/// Atomically replace the company profile (SIGHUP / periodic refresh).
/// Readers already holding a snapshot from [`get`] keep seeing the old
/// value; new calls to [`get`] observe the replacement. No lock is ever
/// held across I/O.
pub fn reload(profile: CompanyProfile) {
    match COMPANY_PROFILE.get() {
        Some(slot) => {
            slot.store(std::sync::Arc::new(profile));
            tracing::info!("company profile reloaded");
        }
        None => init(profile),
    }
}

pub fn is_initialized() -> bool {
    COMPANY_PROFILE.get().is_some()
}
