// Artify - authenticity-gated artwork purchases
// Library surface for the CLI and for integration tests

pub mod catalog;
pub mod cli;
pub mod config;
pub mod errors;
pub mod pricing;
pub mod session;
pub mod telemetry;
pub mod timing;
pub mod transaction;
pub mod verification;

// Re-export key types for easy access
pub use catalog::{Artwork, ArtworkService, MockArtworkService, TransactionReceipt};
pub use config::{config, init_config, ArtifyConfig};
pub use errors::{ArtifyError, Result};
pub use pricing::{FrameOption, PriceQuote, PrintSize, PurchaseOptions};
pub use session::{NavigationProfile, Role, UserSession};
pub use telemetry::{create_flow_span, generate_correlation_id, init_telemetry};
pub use timing::{Delay, NoDelay, TokioDelay};
pub use transaction::{PurchaseOutcome, PurchaseTransaction, TransactionFlow, TransactionStatus};
pub use verification::{
    ScanOutcome, TagReader, VerificationReport, VerificationStatus, Verifier,
};
