// NFC authenticity verification: Idle -> Scanning -> {Verified | Failed},
// with Failed -> Scanning on retry.

pub mod reader;
pub mod state_machine;
pub mod verifier;

pub use reader::{
    CatalogTagReader, ComparingTagReader, ScriptedTagReader, SimulatedTagReader, TagReader,
};
pub use state_machine::{
    ScanOutcome, TagVerification, VerificationEvent, VerificationStatus, VerificationStatusExt,
};
pub use verifier::{CompletionCallback, VerificationReport, Verifier};
