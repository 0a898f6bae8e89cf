use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use statig::prelude::*;
use std::fmt;

use crate::errors::TAG_MISMATCH_REASON;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScanOutcome {
    Pass,
    Fail { reason: String },
}

impl ScanOutcome {
    pub fn mismatch() -> Self {
        ScanOutcome::Fail {
            reason: TAG_MISMATCH_REASON.to_string(),
        }
    }

    pub fn is_pass(&self) -> bool {
        matches!(self, ScanOutcome::Pass)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VerificationEvent {
    StartScan,
    ScanResolved(ScanOutcome),
    Dismiss,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VerificationStatus {
    Idle,
    Scanning,
    Verified,
    Failed,
}

impl fmt::Display for VerificationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            VerificationStatus::Idle => "idle",
            VerificationStatus::Scanning => "scanning",
            VerificationStatus::Verified => "verified",
            VerificationStatus::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// One authenticity check of one artwork.
#[derive(Debug)]
pub struct TagVerification {
    artwork_id: String,
    expected_tag_id: String,
    attempts: u32,
    failure_reason: Option<String>,
    verified_at: Option<DateTime<Utc>>,
}

impl TagVerification {
    pub fn new(artwork_id: impl Into<String>, expected_tag_id: impl Into<String>) -> Self {
        Self {
            artwork_id: artwork_id.into(),
            expected_tag_id: expected_tag_id.into(),
            attempts: 0,
            failure_reason: None,
            verified_at: None,
        }
    }

    fn begin_attempt(&mut self) {
        self.attempts += 1;
        self.failure_reason = None;
        tracing::info!(
            artwork_id = %self.artwork_id,
            attempt = self.attempts,
            "Tag scan started"
        );
    }
}

#[state_machine(
    initial = "State::idle()",
    state(derive(Debug, Clone, PartialEq, Eq))
)]
impl TagVerification {
    #[state]
    fn idle(&mut self, event: &VerificationEvent) -> Outcome<State> {
        match event {
            VerificationEvent::StartScan => {
                self.begin_attempt();
                Transition(State::scanning())
            }
            _ => Handled,
        }
    }

    #[state]
    fn scanning(&mut self, event: &VerificationEvent) -> Outcome<State> {
        match event {
            VerificationEvent::ScanResolved(ScanOutcome::Pass) => {
                let now = Utc::now();
                self.verified_at = Some(now);
                tracing::info!(
                    artwork_id = %self.artwork_id,
                    tag_id = %self.expected_tag_id,
                    attempt = self.attempts,
                    "Artwork verified"
                );
                Transition(State::verified())
            }
            VerificationEvent::ScanResolved(ScanOutcome::Fail { reason }) => {
                self.failure_reason = Some(reason.clone());
                tracing::warn!(
                    artwork_id = %self.artwork_id,
                    attempt = self.attempts,
                    reason = %reason,
                    "Tag verification failed"
                );
                Transition(State::failed())
            }
            // A scan in flight can neither restart nor be dismissed.
            VerificationEvent::StartScan | VerificationEvent::Dismiss => Handled,
        }
    }

    #[state]
    fn verified(&mut self, event: &VerificationEvent) -> Outcome<State> {
        let _ = event;
        Handled
    }

    #[state]
    fn failed(&mut self, event: &VerificationEvent) -> Outcome<State> {
        match event {
            VerificationEvent::StartScan => {
                self.begin_attempt();
                Transition(State::scanning())
            }
            VerificationEvent::Dismiss => {
                self.failure_reason = None;
                tracing::debug!(artwork_id = %self.artwork_id, "Verification dialog dismissed");
                Transition(State::idle())
            }
            VerificationEvent::ScanResolved(_) => Handled,
        }
    }
}

impl TagVerification {
    pub fn artwork_id(&self) -> &str {
        &self.artwork_id
    }

    pub fn expected_tag_id(&self) -> &str {
        &self.expected_tag_id
    }

    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    pub fn failure_reason(&self) -> Option<&str> {
        self.failure_reason.as_deref()
    }

    pub fn verified_at(&self) -> Option<DateTime<Utc>> {
        self.verified_at
    }
}

/// Read the externally visible status of a running verification.
pub trait VerificationStatusExt {
    fn status(&self) -> VerificationStatus;
}

impl VerificationStatusExt for StateMachine<TagVerification> {
    fn status(&self) -> VerificationStatus {
        match self.state() {
            State::Idle { .. } => VerificationStatus::Idle,
            State::Scanning { .. } => VerificationStatus::Scanning,
            State::Verified { .. } => VerificationStatus::Verified,
            State::Failed { .. } => VerificationStatus::Failed,
        }
    }
}
