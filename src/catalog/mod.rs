// Artwork catalog: records consumed by the purchase flow and the mocked
// backend calls behind them.

pub mod fixtures;
pub mod service;
pub mod types;

pub use service::{tag_matches_artwork, ArtworkService, MockArtworkService};
pub use types::{Artwork, ProvenanceRecord, TagCheck, TransactionReceipt, TransactionRequest};
