use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use statig::prelude::*;
use std::sync::Arc;
use tracing::{info, warn};

use super::reader::TagReader;
use super::state_machine::{
    TagVerification, VerificationEvent, VerificationStatus, VerificationStatusExt,
};
use crate::catalog::Artwork;
use crate::config::VerificationConfig;
use crate::errors::{ArtifyError, Result};
use crate::timing::SharedDelay;

/// What a verification session hands to the rest of the app.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationReport {
    pub artwork_id: String,
    pub tag_id: String,
    pub status: VerificationStatus,
    pub verified: bool,
    pub attempts: u32,
    pub verified_at: Option<DateTime<Utc>>,
    pub failure_reason: Option<String>,
}

pub type CompletionCallback = Box<dyn FnOnce(&VerificationReport) + Send>;

/// Drives a `TagVerification` through the simulated scan timings.
pub struct Verifier {
    machine: StateMachine<TagVerification>,
    reader: Arc<dyn TagReader>,
    delay: SharedDelay,
    config: VerificationConfig,
    on_verified: Option<CompletionCallback>,
}

impl std::fmt::Debug for Verifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Verifier")
            .field("artwork_id", &self.machine.inner().artwork_id())
            .field("status", &self.status())
            .field("attempts", &self.attempts())
            .field("callback_pending", &self.on_verified.is_some())
            .finish()
    }
}

impl Verifier {
    pub fn new(
        artwork: &Artwork,
        reader: Arc<dyn TagReader>,
        delay: SharedDelay,
        config: VerificationConfig,
    ) -> Self {
        Self::for_tag(&artwork.id, &artwork.tag_id, reader, delay, config)
    }

    pub fn for_tag(
        artwork_id: &str,
        expected_tag_id: &str,
        reader: Arc<dyn TagReader>,
        delay: SharedDelay,
        config: VerificationConfig,
    ) -> Self {
        Self {
            machine: TagVerification::new(artwork_id, expected_tag_id).state_machine(),
            reader,
            delay,
            config,
            on_verified: None,
        }
    }

    /// Called once, after the confirmation pause that follows a successful scan.
    pub fn on_verified<F>(mut self, callback: F) -> Self
    where
        F: FnOnce(&VerificationReport) + Send + 'static,
    {
        self.on_verified = Some(Box::new(callback));
        self
    }

    pub fn status(&self) -> VerificationStatus {
        self.machine.status()
    }

    pub fn artwork_id(&self) -> &str {
        self.machine.inner().artwork_id()
    }

    pub fn attempts(&self) -> u32 {
        self.machine.inner().attempts()
    }

    pub fn failure_reason(&self) -> Option<&str> {
        self.machine.inner().failure_reason()
    }

    pub fn is_supported(&self) -> bool {
        self.reader.is_supported()
    }

    pub fn report(&self) -> VerificationReport {
        let ctx = self.machine.inner();
        let status = self.status();
        VerificationReport {
            artwork_id: ctx.artwork_id().to_string(),
            tag_id: ctx.expected_tag_id().to_string(),
            status,
            verified: status == VerificationStatus::Verified,
            attempts: ctx.attempts(),
            verified_at: ctx.verified_at(),
            failure_reason: ctx.failure_reason().map(str::to_string),
        }
    }

    /// Enter `Scanning` from `Idle` or `Failed`.
    ///
    /// Returns `Ok(false)` without touching anything when a scan is already
    /// running or the artwork is verified.
    pub fn start_scan(&mut self) -> Result<bool> {
        match self.status() {
            VerificationStatus::Idle | VerificationStatus::Failed => {
                if !self.reader.is_supported() {
                    warn!(artwork_id = %self.artwork_id(), "Scan requested without NFC capability");
                    return Err(ArtifyError::UnsupportedCapability {
                        capability: "nfc".to_string(),
                    });
                }
                self.machine.handle(&VerificationEvent::StartScan);
                Ok(true)
            }
            VerificationStatus::Scanning | VerificationStatus::Verified => Ok(false),
        }
    }

    /// Wait out the scan, resolve it, and on success wait the confirmation
    /// pause and fire the completion callback.
    pub async fn complete_scan(&mut self) -> Result<VerificationReport> {
        let status = self.status();
        if status != VerificationStatus::Scanning {
            return Err(ArtifyError::invalid_transition("complete a scan", status));
        }

        self.delay.wait(self.config.scan_delay()).await;
        let expected = self.machine.inner().expected_tag_id().to_string();
        let outcome = self.reader.read(&expected).await;
        self.machine.handle(&VerificationEvent::ScanResolved(outcome));

        let report = self.report();
        if report.verified {
            self.delay.wait(self.config.confirmation_delay()).await;
            if let Some(callback) = self.on_verified.take() {
                info!(artwork_id = %report.artwork_id, "Notifying verification listener");
                callback(&report);
            }
            Ok(report)
        } else {
            Err(ArtifyError::VerificationFailed {
                reason: report
                    .failure_reason
                    .unwrap_or_else(|| crate::errors::TAG_MISMATCH_REASON.to_string()),
            })
        }
    }

    /// One user press of "Start NFC Scan" / "Try Again".
    pub async fn scan(&mut self) -> Result<VerificationReport> {
        if self.start_scan()? {
            return self.complete_scan().await;
        }
        match self.status() {
            VerificationStatus::Verified => Ok(self.report()),
            status => Err(ArtifyError::invalid_transition("start a scan", status)),
        }
    }

    /// The dialog was closed. Only a failed attempt is reset; a running scan
    /// keeps going.
    pub fn dismiss(&mut self) {
        self.machine.handle(&VerificationEvent::Dismiss);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timing::{no_delay, tokio_delay};
    use crate::verification::reader::{ScriptedTagReader, SimulatedTagReader};
    use crate::verification::state_machine::ScanOutcome;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
    use std::time::Duration;

    fn verifier(reader: impl TagReader + 'static, delay: SharedDelay) -> Verifier {
        Verifier::for_tag(
            "artwork-123",
            "nfc-7d8e9f-art123",
            Arc::new(reader),
            delay,
            VerificationConfig::default(),
        )
    }

    #[tokio::test]
    async fn test_scan_passes() {
        let mut v = verifier(ScriptedTagReader::always_pass(), no_delay());
        let report = v.scan().await.unwrap();
        assert!(report.verified);
        assert_eq!(report.status, VerificationStatus::Verified);
        assert_eq!(report.attempts, 1);
        assert!(report.verified_at.is_some());
    }

    #[tokio::test]
    async fn test_failed_scan_then_retry() {
        let reader = ScriptedTagReader::new(vec![ScanOutcome::mismatch()], ScanOutcome::Pass);
        let mut v = verifier(reader, no_delay());

        let err = v.scan().await.unwrap_err();
        assert!(err.is_retryable());
        assert_eq!(v.status(), VerificationStatus::Failed);
        assert!(v.failure_reason().is_some());

        let report = v.scan().await.unwrap();
        assert!(report.verified);
        assert_eq!(report.attempts, 2);
        assert_eq!(report.failure_reason, None);
    }

    #[tokio::test]
    async fn test_second_start_while_scanning_is_noop() {
        let mut v = verifier(ScriptedTagReader::always_pass(), no_delay());
        assert!(v.start_scan().unwrap());
        assert!(!v.start_scan().unwrap());
        assert_eq!(v.status(), VerificationStatus::Scanning);
        assert_eq!(v.attempts(), 1);
    }

    #[tokio::test]
    async fn test_unsupported_capability_keeps_idle() {
        let mut v = verifier(SimulatedTagReader::unsupported(), no_delay());
        let err = v.scan().await.unwrap_err();
        assert!(matches!(err, ArtifyError::UnsupportedCapability { .. }));
        assert!(!err.is_retryable());
        assert_eq!(v.status(), VerificationStatus::Idle);
        assert_eq!(v.attempts(), 0);
    }

    #[tokio::test]
    async fn test_complete_without_start_is_rejected() {
        let mut v = verifier(ScriptedTagReader::always_pass(), no_delay());
        let err = v.complete_scan().await.unwrap_err();
        assert!(matches!(err, ArtifyError::InvalidTransition { .. }));
    }

    #[tokio::test]
    async fn test_callback_fires_exactly_once() {
        let calls = Arc::new(AtomicU32::new(0));
        let seen = calls.clone();
        let mut v = verifier(ScriptedTagReader::always_pass(), no_delay())
            .on_verified(move |_| {
                seen.fetch_add(1, Ordering::SeqCst);
            });

        v.scan().await.unwrap();
        v.scan().await.unwrap();
        assert!(v.complete_scan().await.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_callback_not_fired_on_failure() {
        let calls = Arc::new(AtomicU32::new(0));
        let seen = calls.clone();
        let mut v = verifier(ScriptedTagReader::always_fail(), no_delay())
            .on_verified(move |_| {
                seen.fetch_add(1, Ordering::SeqCst);
            });

        for _ in 0..3 {
            assert!(v.scan().await.is_err());
        }
        assert_eq!(v.attempts(), 3);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_timings_follow_config() {
        let start = tokio::time::Instant::now();
        let mut v = verifier(ScriptedTagReader::always_pass(), tokio_delay());
        v.scan().await.unwrap();
        // scan delay + confirmation pause
        assert!(start.elapsed() >= Duration::from_millis(3000));

        let start = tokio::time::Instant::now();
        let mut v = verifier(ScriptedTagReader::always_fail(), tokio_delay());
        let _ = v.scan().await;
        let elapsed = start.elapsed();
        assert!(elapsed >= Duration::from_millis(2000));
        assert!(elapsed < Duration::from_millis(3000));
    }

    /// Passes every scan; NFC support can be switched off mid-session.
    struct SwitchableReader(Arc<AtomicBool>);

    #[async_trait]
    impl TagReader for SwitchableReader {
        fn is_supported(&self) -> bool {
            self.0.load(Ordering::SeqCst)
        }

        async fn read(&self, _expected_tag_id: &str) -> ScanOutcome {
            ScanOutcome::Pass
        }
    }

    #[tokio::test]
    async fn test_verified_session_ignores_lost_capability() {
        let supported = Arc::new(AtomicBool::new(true));
        let mut v = verifier(SwitchableReader(supported.clone()), no_delay());
        v.scan().await.unwrap();

        supported.store(false, Ordering::SeqCst);
        assert!(!v.start_scan().unwrap());
        let report = v.scan().await.unwrap();
        assert!(report.verified);
        assert_eq!(report.attempts, 1);
    }
}
