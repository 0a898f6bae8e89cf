// Purchase flow: Idle -> AwaitingVerification -> Processing -> Completed.
// Processing is only reachable with a verified tag for the same artwork.

pub mod flow;
pub mod state_machine;

pub use flow::{PurchaseOutcome, PurchaseTransaction, TransactionFlow};
pub use state_machine::{PurchaseEvent, PurchaseLifecycle, TransactionStatus, TransactionStatusExt};
