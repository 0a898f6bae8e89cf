use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProvenanceRecord {
    pub date: String,
    pub owner: String,
    pub location: String,
    pub verified: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Artwork {
    pub id: String,
    pub title: String,
    pub artist_id: String,
    pub artist_name: String,
    pub seller_id: String,
    pub year: u16,
    pub medium: String,
    pub dimensions: String,
    pub edition: String,
    /// List price in whole currency units
    pub price: Decimal,
    pub currency: String,
    pub image_url: String,
    pub description: String,
    /// Identifier of the NFC tag registered for this artwork
    pub tag_id: String,
    pub provenance: Vec<ProvenanceRecord>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Artwork {
    /// Short form used in listings, e.g. "Convergence of Time (2024) by Elena Rodriguez"
    pub fn headline(&self) -> String {
        format!("{} ({}) by {}", self.title, self.year, self.artist_name)
    }

    pub fn is_provenance_verified(&self) -> bool {
        !self.provenance.is_empty() && self.provenance.iter().all(|r| r.verified)
    }
}

/// Result of checking a tag against the catalog
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagCheck {
    pub id: String,
    pub tag_id: String,
    pub artwork_id: String,
    pub verified_by: String,
    pub checked_at: DateTime<Utc>,
    pub is_valid: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionRequest {
    pub artwork_id: String,
    pub buyer_id: String,
    pub seller_id: String,
    pub amount: Decimal,
    pub currency: String,
    pub tag_verified_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionReceipt {
    pub transaction_id: String,
    pub artwork_id: String,
    pub buyer_id: String,
    pub seller_id: String,
    pub amount: Decimal,
    pub currency: String,
    pub settled_at: DateTime<Utc>,
    pub tag_verified: bool,
    pub tag_verified_at: Option<DateTime<Utc>>,
}
