// Scan result providers. The verifier never decides an outcome itself; it
// asks a TagReader, so the comparison logic is swappable and tests can force
// deterministic results.

use async_trait::async_trait;
use rand::Rng;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use super::state_machine::ScanOutcome;
use crate::catalog::ArtworkService;

#[async_trait]
pub trait TagReader: Send + Sync {
    /// Whether this environment can scan at all.
    fn is_supported(&self) -> bool {
        true
    }

    async fn read(&self, expected_tag_id: &str) -> ScanOutcome;
}

/// Weighted coin flip that ignores the tag. Stands in for hardware that
/// does not exist yet.
#[derive(Debug, Clone)]
pub struct SimulatedTagReader {
    pass_probability: f64,
    supported: bool,
}

impl Default for SimulatedTagReader {
    fn default() -> Self {
        Self::new(0.8)
    }
}

impl SimulatedTagReader {
    pub fn new(pass_probability: f64) -> Self {
        Self {
            pass_probability: pass_probability.clamp(0.0, 1.0),
            supported: true,
        }
    }

    /// A reader on a device without NFC.
    pub fn unsupported() -> Self {
        Self {
            pass_probability: 0.0,
            supported: false,
        }
    }

    pub fn pass_probability(&self) -> f64 {
        self.pass_probability
    }
}

#[async_trait]
impl TagReader for SimulatedTagReader {
    fn is_supported(&self) -> bool {
        self.supported
    }

    async fn read(&self, _expected_tag_id: &str) -> ScanOutcome {
        let passed = rand::rng().random_bool(self.pass_probability);
        if passed {
            ScanOutcome::Pass
        } else {
            ScanOutcome::mismatch()
        }
    }
}

/// Compares a physically scanned value with the registered tag.
#[derive(Debug, Clone)]
pub struct ComparingTagReader {
    scanned_tag: String,
}

impl ComparingTagReader {
    pub fn new(scanned_tag: impl Into<String>) -> Self {
        Self {
            scanned_tag: scanned_tag.into(),
        }
    }
}

#[async_trait]
impl TagReader for ComparingTagReader {
    async fn read(&self, expected_tag_id: &str) -> ScanOutcome {
        if self.scanned_tag == expected_tag_id {
            ScanOutcome::Pass
        } else {
            tracing::debug!(
                scanned = %self.scanned_tag,
                expected = %expected_tag_id,
                "Scanned tag differs from registered tag"
            );
            ScanOutcome::mismatch()
        }
    }
}

/// Asks the catalog backend whether the scanned tag belongs to the artwork.
pub struct CatalogTagReader {
    service: Arc<dyn ArtworkService>,
    artwork_id: String,
    scanned_tag: String,
    verified_by: String,
}

impl CatalogTagReader {
    pub fn new(
        service: Arc<dyn ArtworkService>,
        artwork_id: impl Into<String>,
        scanned_tag: impl Into<String>,
        verified_by: impl Into<String>,
    ) -> Self {
        Self {
            service,
            artwork_id: artwork_id.into(),
            scanned_tag: scanned_tag.into(),
            verified_by: verified_by.into(),
        }
    }
}

#[async_trait]
impl TagReader for CatalogTagReader {
    async fn read(&self, _expected_tag_id: &str) -> ScanOutcome {
        match self
            .service
            .verify_tag(&self.scanned_tag, &self.artwork_id, &self.verified_by)
            .await
        {
            Ok(check) if check.is_valid => ScanOutcome::Pass,
            Ok(_) => ScanOutcome::mismatch(),
            Err(e) => {
                tracing::warn!(artwork_id = %self.artwork_id, error = %e, "Tag check failed");
                ScanOutcome::Fail {
                    reason: e.user_message(),
                }
            }
        }
    }
}

/// Plays back queued outcomes, then repeats the fallback.
#[derive(Debug)]
pub struct ScriptedTagReader {
    queued: Mutex<VecDeque<ScanOutcome>>,
    fallback: ScanOutcome,
    supported: bool,
}

impl ScriptedTagReader {
    pub fn new(outcomes: impl IntoIterator<Item = ScanOutcome>, fallback: ScanOutcome) -> Self {
        Self {
            queued: Mutex::new(outcomes.into_iter().collect()),
            fallback,
            supported: true,
        }
    }

    pub fn always(outcome: ScanOutcome) -> Self {
        Self::new(Vec::new(), outcome)
    }

    pub fn always_pass() -> Self {
        Self::always(ScanOutcome::Pass)
    }

    pub fn always_fail() -> Self {
        Self::always(ScanOutcome::mismatch())
    }

    pub fn unsupported(mut self) -> Self {
        self.supported = false;
        self
    }
}

#[async_trait]
impl TagReader for ScriptedTagReader {
    fn is_supported(&self) -> bool {
        self.supported
    }

    async fn read(&self, _expected_tag_id: &str) -> ScanOutcome {
        self.queued
            .lock()
            .ok()
            .and_then(|mut queued| queued.pop_front())
            .unwrap_or_else(|| self.fallback.clone())
    }
}
