use async_trait::async_trait;
use chrono::Utc;
use std::sync::Mutex;
use std::time::Duration;
use tracing::{debug, info, warn};

use super::fixtures::seed_artworks;
use super::types::{Artwork, TagCheck, TransactionReceipt, TransactionRequest};
use crate::config::CatalogConfig;
use crate::errors::{ArtifyError, Result};
use crate::timing::{tokio_delay, SharedDelay};

/// Backend the purchase flow talks to. Only a mocked implementation exists.
#[async_trait]
pub trait ArtworkService: Send + Sync {
    async fn get_artwork(&self, artwork_id: &str) -> Result<Artwork>;

    async fn list_artworks(&self) -> Result<Vec<Artwork>>;

    async fn verify_tag(&self, tag_id: &str, artwork_id: &str, verified_by: &str) -> Result<TagCheck>;

    async fn create_transaction(&self, request: TransactionRequest) -> Result<TransactionReceipt>;
}

/// A tag belongs to an artwork when it is the registered tag, or when its
/// last segment is `art` plus the artwork's suffix (`artwork-123` -> `...-art123`).
pub fn tag_matches_artwork(tag_id: &str, artwork: &Artwork) -> bool {
    if tag_id == artwork.tag_id {
        return true;
    }
    let Some(suffix) = artwork.id.strip_prefix("artwork-").filter(|s| !s.is_empty()) else {
        return false;
    };
    tag_id
        .rsplit('-')
        .next()
        .is_some_and(|last| last.strip_prefix("art") == Some(suffix))
}

pub struct MockArtworkService {
    artworks: Vec<Artwork>,
    delay: SharedDelay,
    fetch_delay: Duration,
    tag_check_delay: Duration,
    decline_payments: bool,
    settled: Mutex<Vec<TransactionReceipt>>,
}

impl std::fmt::Debug for MockArtworkService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockArtworkService")
            .field("artworks", &self.artworks.len())
            .field("fetch_delay", &self.fetch_delay)
            .field("tag_check_delay", &self.tag_check_delay)
            .field("decline_payments", &self.decline_payments)
            .finish()
    }
}

impl Default for MockArtworkService {
    fn default() -> Self {
        Self::new(&CatalogConfig::default(), tokio_delay())
    }
}

impl MockArtworkService {
    pub fn new(config: &CatalogConfig, delay: SharedDelay) -> Self {
        Self::with_artworks(seed_artworks(), config, delay)
    }

    pub fn with_artworks(artworks: Vec<Artwork>, config: &CatalogConfig, delay: SharedDelay) -> Self {
        Self {
            artworks,
            delay,
            fetch_delay: Duration::from_millis(config.fetch_delay_ms),
            tag_check_delay: Duration::from_millis(config.tag_check_delay_ms),
            decline_payments: false,
            settled: Mutex::new(Vec::new()),
        }
    }

    /// Price every artwork in `currency`, the checkout currency.
    pub fn listed_in(mut self, currency: &str) -> Self {
        for artwork in &mut self.artworks {
            artwork.currency = currency.to_string();
        }
        self
    }

    /// Make every settlement fail, to exercise the payment failure path.
    pub fn declining_payments(mut self) -> Self {
        self.decline_payments = true;
        self
    }

    /// Receipts issued so far, oldest first.
    pub fn settled_transactions(&self) -> Vec<TransactionReceipt> {
        self.settled
            .lock()
            .map(|settled| settled.clone())
            .unwrap_or_default()
    }

    fn find(&self, artwork_id: &str) -> Result<&Artwork> {
        self.artworks
            .iter()
            .find(|a| a.id == artwork_id)
            .ok_or_else(|| ArtifyError::ArtworkNotFound(artwork_id.to_string()))
    }
}

#[async_trait]
impl ArtworkService for MockArtworkService {
    async fn get_artwork(&self, artwork_id: &str) -> Result<Artwork> {
        debug!(artwork_id = %artwork_id, "Fetching artwork");
        self.delay.wait(self.fetch_delay).await;
        self.find(artwork_id).cloned()
    }

    async fn list_artworks(&self) -> Result<Vec<Artwork>> {
        self.delay.wait(self.fetch_delay).await;
        Ok(self.artworks.clone())
    }

    async fn verify_tag(&self, tag_id: &str, artwork_id: &str, verified_by: &str) -> Result<TagCheck> {
        debug!(tag_id = %tag_id, artwork_id = %artwork_id, "Checking tag");
        self.delay.wait(self.tag_check_delay).await;
        let artwork = self.find(artwork_id)?;
        let now = Utc::now();

        Ok(TagCheck {
            id: format!("verify-{}", now.timestamp_millis()),
            tag_id: tag_id.to_string(),
            artwork_id: artwork_id.to_string(),
            verified_by: verified_by.to_string(),
            checked_at: now,
            is_valid: tag_matches_artwork(tag_id, artwork),
        })
    }

    async fn create_transaction(&self, request: TransactionRequest) -> Result<TransactionReceipt> {
        self.find(&request.artwork_id)?;

        if self.decline_payments {
            warn!(artwork_id = %request.artwork_id, "Payment declined by mock backend");
            return Err(ArtifyError::PaymentFailed("card declined".to_string()));
        }

        let now = Utc::now();
        let receipt = TransactionReceipt {
            transaction_id: format!("tx-{}", uuid::Uuid::new_v4()),
            artwork_id: request.artwork_id,
            buyer_id: request.buyer_id,
            seller_id: request.seller_id,
            amount: request.amount,
            currency: request.currency,
            settled_at: now,
            tag_verified: request.tag_verified_at.is_some(),
            tag_verified_at: request.tag_verified_at,
        };

        info!(
            transaction_id = %receipt.transaction_id,
            artwork_id = %receipt.artwork_id,
            amount = %receipt.amount,
            "Transaction settled"
        );

        if let Ok(mut settled) = self.settled.lock() {
            settled.push(receipt.clone());
        }
        Ok(receipt)
    }
}
