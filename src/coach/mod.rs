//! Coaching feedback for a finished session.
//!
//! The engine hands its finished `WordStat` list to a [`FeedbackProvider`] and displays
//! whatever text comes back. Providers never see an empty list: [`request_feedback`]
//! rejects it before any provider is consulted.

pub mod local;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::session::judge::WordStat;
use crate::session::metrics::SessionReport;

pub use local::LocalCoach;

/// The body an external coach receives: the per-word stats plus the headline numbers.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FeedbackRequest {
    pub stats: Vec<WordStat>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub report: Option<SessionReport>,
}

impl FeedbackRequest {
    pub fn new(stats: &[WordStat], report: Option<SessionReport>) -> Result<Self, FeedbackError> {
        if stats.is_empty() {
            return Err(FeedbackError::EmptyStats);
        }
        Ok(Self {
            stats: stats.to_vec(),
            report,
        })
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[non_exhaustive]
pub enum FeedbackError {
    #[error("no words were submitted, nothing to coach")]
    EmptyStats,
    #[error("coach unavailable: {0}")]
    ProviderUnavailable(String),
}

pub trait FeedbackProvider {
    fn name(&self) -> &str;

    /// `stats` is guaranteed non-empty.
    fn feedback(&self, stats: &[WordStat]) -> Result<String, FeedbackError>;
}

/// Stand-in used when coaching is turned off in the config.
pub struct Disabled;

impl FeedbackProvider for Disabled {
    fn name(&self) -> &str {
        "off"
    }

    fn feedback(&self, _stats: &[WordStat]) -> Result<String, FeedbackError> {
        Err(FeedbackError::ProviderUnavailable(
            "coaching is disabled in the config".to_string(),
        ))
    }
}

pub fn request_feedback(
    provider: &dyn FeedbackProvider,
    stats: &[WordStat],
) -> Result<String, FeedbackError> {
    if stats.is_empty() {
        return Err(FeedbackError::EmptyStats);
    }
    provider.feedback(stats)
}

/// Resolve a provider by its config name.
pub fn provider_from_name(name: &str) -> Option<Box<dyn FeedbackProvider>> {
    match name {
        "local" => Some(Box::new(LocalCoach::default())),
        "off" => Some(Box::new(Disabled)),
        _ => None,
    }
}
