//! # habitect-core
//!
//! Core library for habitect - the habit streak and analytics engine.
//!
//! This library provides:
//! - Domain types for habits, events, and journal entries
//! - Calendar normalization (instants to user-timezone civil dates)
//! - Streak computation with polarity-aware contribution rules
//! - Analytics aggregation (overview, per-habit, heatmap, trends)
//! - Weekly statistics, achievements, insights, and comparisons
//! - Configuration management and logging infrastructure
//!
//! ## Architecture
//!
//! Every computation is a pure function over in-memory slices the caller
//! supplies; the engine performs no I/O and keeps no state. Data flows
//! through three stages:
//! - **Calendar:** each event instant is resolved to a civil date in the
//!   user's timezone
//! - **Classification:** each day gets a contributes/breaks disposition
//!   from the habit's polarity and the day's significant event
//! - **Aggregation:** streak walks, analytics reductions, and the weekly
//!   builder consume the classified stream independently, so a streak
//!   embedded in a weekly report always matches the standalone computation
//!
//! ## Example
//!
//! ```rust,no_run
//! use habitect_core::calendar::{civil_today, resolve_timezone};
//! use habitect_core::export::ExportBundle;
//! use habitect_core::streak::compute_streak;
//!
//! let bundle = ExportBundle::load(std::path::Path::new("export.json"))
//!     .expect("failed to load bundle");
//! let zone = resolve_timezone("America/New_York");
//! let today = civil_today(zone.tz);
//! for habit in &bundle.habits {
//!     let streak = compute_streak(habit, &bundle.events, zone.tz, today);
//!     println!("{}: {} days", habit.title, streak.current_streak);
//! }
//! ```

// Re-export commonly used items at the crate root
pub use config::Config;
pub use error::{Error, Result};
pub use export::ExportBundle;
pub use types::*;

// Public modules
pub mod analytics;
pub mod calendar;
pub mod classify;
pub mod config;
pub mod error;
pub mod export;
pub mod logging;
pub mod streak;
pub mod types;
pub mod weekly;
