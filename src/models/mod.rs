// src/models/mod.rs

//! Domain models for the relay application.
//!
//! This module contains all data structures used throughout the
//! application, organized by their primary purpose.

mod config;
mod outcome;
mod post;

// Re-export all public types
pub use config::{
    Config, FetchConfig, MirrorConfig, ProxyConfig, SeenConfig, SeenMode, SourceEntry,
    SourceKind, WebhookConfig,
};
pub use outcome::{DeliveryOutcome, RunSummary, SourceOutcome};
pub use post::{Platform, Post};
