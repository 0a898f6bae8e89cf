use serde::{Deserialize, Serialize};
use statig::prelude::*;
use std::fmt;

use crate::catalog::TransactionReceipt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PurchaseEvent {
    AttemptPurchase { verified: bool },
    VerificationReceived,
    VerificationDismissed,
    PaymentSettled(TransactionReceipt),
    PaymentDeclined { reason: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionStatus {
    Idle,
    AwaitingVerification,
    Processing,
    Completed,
    Failed,
}

impl fmt::Display for TransactionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TransactionStatus::Idle => "idle",
            TransactionStatus::AwaitingVerification => "awaiting verification",
            TransactionStatus::Processing => "processing",
            TransactionStatus::Completed => "completed",
            TransactionStatus::Failed => "failed",
        };
        f.write_str(name)
    }
}

#[derive(Debug)]
pub struct PurchaseLifecycle {
    artwork_id: String,
    buyer_id: String,
    receipt: Option<TransactionReceipt>,
    failure_reason: Option<String>,
}

impl PurchaseLifecycle {
    pub fn new(artwork_id: impl Into<String>, buyer_id: impl Into<String>) -> Self {
        Self {
            artwork_id: artwork_id.into(),
            buyer_id: buyer_id.into(),
            receipt: None,
            failure_reason: None,
        }
    }

    fn begin_processing(&mut self) {
        self.failure_reason = None;
        tracing::info!(
            artwork_id = %self.artwork_id,
            buyer_id = %self.buyer_id,
            "Processing payment"
        );
    }
}

#[state_machine(
    initial = "State::idle()",
    state(derive(Debug, Clone, PartialEq, Eq))
)]
impl PurchaseLifecycle {
    #[state]
    fn idle(&mut self, event: &PurchaseEvent) -> Outcome<State> {
        match event {
            PurchaseEvent::AttemptPurchase { verified: true } => {
                self.begin_processing();
                Transition(State::processing())
            }
            PurchaseEvent::AttemptPurchase { verified: false } => {
                tracing::info!(
                    artwork_id = %self.artwork_id,
                    "Purchase requires tag verification"
                );
                Transition(State::awaiting_verification())
            }
            _ => Handled,
        }
    }

    #[state]
    fn awaiting_verification(&mut self, event: &PurchaseEvent) -> Outcome<State> {
        match event {
            PurchaseEvent::VerificationReceived => {
                self.begin_processing();
                Transition(State::processing())
            }
            PurchaseEvent::VerificationDismissed => {
                tracing::debug!(artwork_id = %self.artwork_id, "Verification dialog closed");
                Transition(State::idle())
            }
            _ => Handled,
        }
    }

    #[state]
    fn processing(&mut self, event: &PurchaseEvent) -> Outcome<State> {
        match event {
            PurchaseEvent::PaymentSettled(receipt) => {
                tracing::info!(
                    artwork_id = %self.artwork_id,
                    transaction_id = %receipt.transaction_id,
                    amount = %receipt.amount,
                    "Purchase completed"
                );
                self.receipt = Some(receipt.clone());
                Transition(State::completed())
            }
            PurchaseEvent::PaymentDeclined { reason } => {
                tracing::warn!(
                    artwork_id = %self.artwork_id,
                    reason = %reason,
                    "Payment failed"
                );
                self.failure_reason = Some(reason.clone());
                Transition(State::failed())
            }
            _ => Handled,
        }
    }

    #[state]
    fn completed(&mut self, event: &PurchaseEvent) -> Outcome<State> {
        let _ = event;
        Handled
    }

    #[state]
    fn failed(&mut self, event: &PurchaseEvent) -> Outcome<State> {
        match event {
            PurchaseEvent::AttemptPurchase { verified: true } => {
                self.begin_processing();
                Transition(State::processing())
            }
            PurchaseEvent::AttemptPurchase { verified: false } => {
                Transition(State::awaiting_verification())
            }
            _ => Handled,
        }
    }
}

impl PurchaseLifecycle {
    pub fn artwork_id(&self) -> &str {
        &self.artwork_id
    }

    pub fn receipt(&self) -> Option<&TransactionReceipt> {
        self.receipt.as_ref()
    }

    pub fn failure_reason(&self) -> Option<&str> {
        self.failure_reason.as_deref()
    }
}

pub trait TransactionStatusExt {
    fn status(&self) -> TransactionStatus;
}

impl TransactionStatusExt for StateMachine<PurchaseLifecycle> {
    fn status(&self) -> TransactionStatus {
        match self.state() {
            State::Idle { .. } => TransactionStatus::Idle,
            State::AwaitingVerification { .. } => TransactionStatus::AwaitingVerification,
            State::Processing { .. } => TransactionStatus::Processing,
            State::Completed { .. } => TransactionStatus::Completed,
            State::Failed { .. } => TransactionStatus::Failed,
        }
    }
}
