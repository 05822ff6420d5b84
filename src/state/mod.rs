//! Per-page state. Pages share nothing; each owns its form, its last good
//! result and at most one in-flight request.
//!
//! Every page follows the same result policy: the last good result stays
//! until a newer one is committed, and a reply is only committed if its
//! [`CancelToken`] is still live and still the page's current request.

use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, error};

use crate::errors::CoachResult;
use crate::wire::InlineImage;

pub mod analysis;
pub mod diet;
pub mod training;

pub use analysis::AnalysisPage;
pub use diet::DietPage;
pub use training::{Phase, TrainingSession};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Model,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationTurn {
    pub role: Role,
    pub text: String,
}

impl ConversationTurn {
    pub fn user(text: impl Into<String>) -> Self {
        Self { role: Role::User, text: text.into() }
    }

    pub fn model(text: impl Into<String>) -> Self {
        Self { role: Role::Model, text: text.into() }
    }
}

#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    fn same(&self, other: &CancelToken) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

/// What a page hands to the gateway for one attempt.
#[derive(Debug, Clone)]
pub struct Outbound {
    pub prompt: String,
    pub image: Option<InlineImage>,
    pub token: CancelToken,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Commit {
    /// New result stored, error cleared.
    Stored,
    /// Error message set; the previous result is untouched.
    Failed,
    /// Reply discarded: its request was cancelled or superseded.
    Dropped,
}

/// Result holder shared by all pages.
#[derive(Debug)]
pub struct Slot<T> {
    result: Option<T>,
    error: Option<String>,
    pending: Option<CancelToken>,
    failure_message: &'static str,
}

impl<T> Slot<T> {
    pub fn new(failure_message: &'static str) -> Self {
        Self { result: None, error: None, pending: None, failure_message }
    }

    pub fn result(&self) -> Option<&T> {
        self.result.as_ref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_loading(&self) -> bool {
        self.pending.is_some()
    }

    /// Start an attempt. `None` while another attempt is in flight.
    pub fn begin(&mut self) -> Option<CancelToken> {
        if self.pending.is_some() {
            return None;
        }
        let token = CancelToken::new();
        self.pending = Some(token.clone());
        self.error = None;
        Some(token)
    }

    pub fn finish(&mut self, token: &CancelToken, outcome: CoachResult<T>) -> Commit {
        let current = self.pending.as_ref().is_some_and(|p| p.same(token));
        if token.is_cancelled() || !current {
            debug!(cancelled = token.is_cancelled(), "dropping stale reply");
            return Commit::Dropped;
        }
        self.pending = None;
        match outcome {
            Ok(v) => {
                self.result = Some(v);
                self.error = None;
                Commit::Stored
            }
            Err(e) => {
                error!(error = %e, "model request failed");
                self.error = Some(self.failure_message.to_string());
                Commit::Failed
            }
        }
    }

    /// Cancel the in-flight attempt, if any. Its reply will be dropped.
    pub fn cancel(&mut self) {
        if let Some(p) = self.pending.take() {
            p.cancel();
        }
    }

    pub(crate) fn clear_error(&mut self) {
        self.error = None;
    }

    pub(crate) fn clear_result(&mut self) {
        self.result = None;
    }
}
