use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use statig::prelude::*;
use std::sync::Arc;
use tracing::{info, Instrument};

use super::state_machine::{
    PurchaseEvent, PurchaseLifecycle, TransactionStatus, TransactionStatusExt,
};
use crate::catalog::{Artwork, ArtworkService, TransactionReceipt, TransactionRequest};
use crate::config::PaymentConfig;
use crate::errors::{ArtifyError, Result};
use crate::pricing::{self, PriceQuote, PurchaseOptions};
use crate::session::UserSession;
use crate::telemetry::{create_flow_span, generate_correlation_id};
use crate::timing::SharedDelay;
use crate::verification::{VerificationReport, Verifier};

/// Snapshot of one purchase attempt, as rendered by the checkout page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PurchaseTransaction {
    pub artwork_id: String,
    pub buyer_id: String,
    pub seller_id: String,
    pub base_price: Decimal,
    pub authentication_fee: Decimal,
    pub total_price: Decimal,
    pub currency: String,
    pub options: PurchaseOptions,
    pub status: TransactionStatus,
    pub receipt: Option<TransactionReceipt>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PurchaseOutcome {
    /// The verification dialog must be shown before payment can start.
    VerificationRequired,
    /// A verification is held; the next attempt will settle.
    Ready,
    Completed(TransactionReceipt),
    /// Nothing happened; the purchase had already completed.
    AlreadyCompleted,
}

/// Gates a purchase on a verified tag, then settles it.
pub struct TransactionFlow {
    machine: StateMachine<PurchaseLifecycle>,
    artwork: Artwork,
    buyer: UserSession,
    options: PurchaseOptions,
    verification: Option<VerificationReport>,
    service: Arc<dyn ArtworkService>,
    delay: SharedDelay,
    payments: PaymentConfig,
    correlation_id: String,
}

impl std::fmt::Debug for TransactionFlow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransactionFlow")
            .field("artwork_id", &self.artwork.id)
            .field("buyer_id", &self.buyer.user_id)
            .field("status", &self.status())
            .field("options", &self.options)
            .field("verified", &self.verification.is_some())
            .field("correlation_id", &self.correlation_id)
            .finish()
    }
}

impl TransactionFlow {
    pub fn new(
        artwork: Artwork,
        buyer: UserSession,
        service: Arc<dyn ArtworkService>,
        delay: SharedDelay,
        payments: PaymentConfig,
    ) -> Result<Self> {
        if !buyer.can_purchase() {
            return Err(ArtifyError::invalid_transition(
                "purchase artworks",
                format!("signed in as a {}", buyer.role),
            ));
        }
        if artwork.currency != payments.currency {
            return Err(ArtifyError::InvalidPrice(format!(
                "{} is listed in {}, checkout settles in {}",
                artwork.id, artwork.currency, payments.currency
            )));
        }
        pricing::quote(
            artwork.price,
            PurchaseOptions::default(),
            payments.fee_rate(),
            &payments.currency,
        )?;

        Ok(Self {
            machine: PurchaseLifecycle::new(&artwork.id, &buyer.user_id).state_machine(),
            artwork,
            buyer,
            options: PurchaseOptions::default(),
            verification: None,
            service,
            delay,
            payments,
            correlation_id: generate_correlation_id(),
        })
    }

    pub fn status(&self) -> TransactionStatus {
        self.machine.status()
    }

    pub fn artwork(&self) -> &Artwork {
        &self.artwork
    }

    pub fn options(&self) -> PurchaseOptions {
        self.options
    }

    pub fn is_verified(&self) -> bool {
        self.verification.is_some()
    }

    pub fn correlation_id(&self) -> &str {
        &self.correlation_id
    }

    pub fn receipt(&self) -> Option<&TransactionReceipt> {
        self.machine.inner().receipt()
    }

    /// Purchase actions stay enabled until the transaction completes or
    /// while payment is in flight.
    pub fn can_purchase(&self) -> bool {
        !matches!(
            self.status(),
            TransactionStatus::Processing | TransactionStatus::Completed
        )
    }

    /// Always computed from the current options.
    pub fn quote(&self) -> Result<PriceQuote> {
        pricing::quote(
            self.artwork.price,
            self.options,
            self.payments.fee_rate(),
            &self.payments.currency,
        )
    }

    pub fn transaction(&self) -> Result<PurchaseTransaction> {
        let quote = self.quote()?;
        Ok(PurchaseTransaction {
            artwork_id: self.artwork.id.clone(),
            buyer_id: self.buyer.user_id.clone(),
            seller_id: self.artwork.seller_id.clone(),
            base_price: quote.base_price,
            authentication_fee: quote.authentication_fee,
            total_price: quote.total_price,
            currency: quote.currency,
            options: self.options,
            status: self.status(),
            receipt: self.receipt().cloned(),
        })
    }

    pub fn select_options(&mut self, options: PurchaseOptions) -> Result<()> {
        let status = self.status();
        if matches!(
            status,
            TransactionStatus::Processing | TransactionStatus::Completed
        ) {
            return Err(ArtifyError::invalid_transition("change options", status));
        }
        self.options = options;
        Ok(())
    }

    pub async fn attempt_purchase(&mut self) -> Result<PurchaseOutcome> {
        match self.status() {
            TransactionStatus::Completed => {
                info!(artwork_id = %self.artwork.id, "Purchase already completed");
                return Ok(PurchaseOutcome::AlreadyCompleted);
            }
            TransactionStatus::Processing => {
                return Err(ArtifyError::invalid_transition(
                    "start another purchase",
                    TransactionStatus::Processing,
                ));
            }
            TransactionStatus::AwaitingVerification => {
                return Ok(PurchaseOutcome::VerificationRequired);
            }
            TransactionStatus::Idle | TransactionStatus::Failed => {}
        }

        let verified = self.verification.is_some();
        self.machine
            .handle(&PurchaseEvent::AttemptPurchase { verified });

        if verified {
            self.settle().await
        } else {
            Ok(PurchaseOutcome::VerificationRequired)
        }
    }

    /// Hand over a successful verification. When the purchase was waiting on
    /// it, payment starts immediately.
    pub async fn resume_with_verification(
        &mut self,
        report: VerificationReport,
    ) -> Result<PurchaseOutcome> {
        if report.artwork_id != self.artwork.id {
            return Err(ArtifyError::ArtworkMismatch {
                expected: self.artwork.id.clone(),
                actual: report.artwork_id,
            });
        }
        if !report.verified {
            return Err(ArtifyError::VerificationFailed {
                reason: report
                    .failure_reason
                    .unwrap_or_else(|| crate::errors::TAG_MISMATCH_REASON.to_string()),
            });
        }
        if self.status() == TransactionStatus::Completed {
            return Ok(PurchaseOutcome::AlreadyCompleted);
        }

        self.verification = Some(report);

        if self.status() == TransactionStatus::AwaitingVerification {
            self.machine.handle(&PurchaseEvent::VerificationReceived);
            self.settle().await
        } else {
            Ok(PurchaseOutcome::Ready)
        }
    }

    /// The verification dialog was closed without a verified tag.
    pub fn dismiss_verification(&mut self) {
        self.machine.handle(&PurchaseEvent::VerificationDismissed);
    }

    /// One press of "Complete Purchase", scanning first if needed.
    pub async fn purchase_with_verifier(&mut self, verifier: &mut Verifier) -> Result<PurchaseOutcome> {
        if verifier.artwork_id() != self.artwork.id {
            return Err(ArtifyError::ArtworkMismatch {
                expected: self.artwork.id.clone(),
                actual: verifier.artwork_id().to_string(),
            });
        }
        match self.attempt_purchase().await? {
            PurchaseOutcome::VerificationRequired => {
                let report = verifier.scan().await?;
                self.resume_with_verification(report).await
            }
            outcome => Ok(outcome),
        }
    }

    async fn settle(&mut self) -> Result<PurchaseOutcome> {
        let span = create_flow_span(
            "settle_payment",
            Some(self.artwork.id.as_str()),
            Some(self.buyer.user_id.as_str()),
            Some(self.correlation_id.as_str()),
        );
        self.settle_inner().instrument(span).await
    }

    async fn settle_inner(&mut self) -> Result<PurchaseOutcome> {
        let quote = match self.quote() {
            Ok(quote) => quote,
            Err(e) => {
                self.machine.handle(&PurchaseEvent::PaymentDeclined {
                    reason: e.to_string(),
                });
                return Err(e);
            }
        };
        let request = TransactionRequest {
            artwork_id: self.artwork.id.clone(),
            buyer_id: self.buyer.user_id.clone(),
            seller_id: self.artwork.seller_id.clone(),
            amount: quote.total_price,
            currency: quote.currency,
            tag_verified_at: self.verification.as_ref().and_then(|v| v.verified_at),
        };

        self.delay.wait(self.payments.processing_delay()).await;

        match self.service.create_transaction(request).await {
            Ok(receipt) => {
                self.machine
                    .handle(&PurchaseEvent::PaymentSettled(receipt.clone()));
                Ok(PurchaseOutcome::Completed(receipt))
            }
            Err(e) => {
                self.machine.handle(&PurchaseEvent::PaymentDeclined {
                    reason: e.to_string(),
                });
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::MockArtworkService;
    use crate::config::{CatalogConfig, VerificationConfig};
    use crate::pricing::{FrameOption, PrintSize};
    use crate::session::Role;
    use crate::timing::no_delay;
    use crate::verification::{ScriptedTagReader, VerificationStatus};

    async fn fixture(service: Arc<MockArtworkService>) -> (TransactionFlow, Verifier) {
        let artwork = service.get_artwork("artwork-123").await.unwrap();
        let verifier = Verifier::new(
            &artwork,
            Arc::new(ScriptedTagReader::always_pass()),
            no_delay(),
            VerificationConfig::default(),
        );
        let flow = TransactionFlow::new(
            artwork,
            UserSession::new("collector-1", "Casey", Role::Collector),
            service,
            no_delay(),
            PaymentConfig::default(),
        )
        .unwrap();
        (flow, verifier)
    }

    fn service() -> Arc<MockArtworkService> {
        Arc::new(MockArtworkService::new(&CatalogConfig::default(), no_delay()))
    }

    #[tokio::test]
    async fn test_unverified_purchase_is_gated() {
        let svc = service();
        let (mut flow, _) = fixture(svc.clone()).await;

        for _ in 0..3 {
            let outcome = flow.attempt_purchase().await.unwrap();
            assert_eq!(outcome, PurchaseOutcome::VerificationRequired);
            assert_eq!(flow.status(), TransactionStatus::AwaitingVerification);
        }
        assert!(svc.settled_transactions().is_empty());
    }

    #[tokio::test]
    async fn test_verification_resumes_waiting_purchase() {
        let svc = service();
        let (mut flow, mut verifier) = fixture(svc.clone()).await;

        flow.attempt_purchase().await.unwrap();
        let report = verifier.scan().await.unwrap();
        let outcome = flow.resume_with_verification(report).await.unwrap();

        let PurchaseOutcome::Completed(receipt) = outcome else {
            panic!("expected completion, got {outcome:?}");
        };
        assert_eq!(receipt.amount, Decimal::from(1224));
        assert!(receipt.tag_verified);
        assert_eq!(flow.status(), TransactionStatus::Completed);
        assert_eq!(svc.settled_transactions().len(), 1);
    }

    #[tokio::test]
    async fn test_verification_before_purchase_marks_ready() {
        let (mut flow, mut verifier) = fixture(service()).await;
        let report = verifier.scan().await.unwrap();

        assert_eq!(
            flow.resume_with_verification(report).await.unwrap(),
            PurchaseOutcome::Ready
        );
        assert_eq!(flow.status(), TransactionStatus::Idle);

        let outcome = flow.attempt_purchase().await.unwrap();
        assert!(matches!(outcome, PurchaseOutcome::Completed(_)));
    }

    #[tokio::test]
    async fn test_completion_is_idempotent() {
        let svc = service();
        let (mut flow, mut verifier) = fixture(svc.clone()).await;
        flow.purchase_with_verifier(&mut verifier).await.unwrap();
        assert!(!flow.can_purchase());

        for _ in 0..3 {
            assert_eq!(
                flow.attempt_purchase().await.unwrap(),
                PurchaseOutcome::AlreadyCompleted
            );
        }
        assert_eq!(flow.status(), TransactionStatus::Completed);
        assert_eq!(svc.settled_transactions().len(), 1);
    }

    #[tokio::test]
    async fn test_report_for_other_artwork_rejected() {
        let (mut flow, _) = fixture(service()).await;
        flow.attempt_purchase().await.unwrap();

        let report = VerificationReport {
            artwork_id: "artwork-1".to_string(),
            tag_id: "NFC-4A2B9C-8D7E-1".to_string(),
            status: VerificationStatus::Verified,
            verified: true,
            attempts: 1,
            verified_at: None,
            failure_reason: None,
        };
        let err = flow.resume_with_verification(report).await.unwrap_err();
        assert!(matches!(err, ArtifyError::ArtworkMismatch { .. }));
        assert_eq!(flow.status(), TransactionStatus::AwaitingVerification);
        assert!(!flow.is_verified());
    }

    #[tokio::test]
    async fn test_options_recompute_total() {
        let (mut flow, mut verifier) = fixture(service()).await;
        assert_eq!(flow.quote().unwrap().total_price, Decimal::from(1224));

        flow.select_options(PurchaseOptions {
            size: PrintSize::Large,
            frame: FrameOption::Wood,
        })
        .unwrap();
        // 1200 * 1.5 + 200 = 2000 -> 2040
        assert_eq!(flow.quote().unwrap().total_price, Decimal::from(2040));
        assert_eq!(flow.transaction().unwrap().total_price, Decimal::from(2040));

        let outcome = flow.purchase_with_verifier(&mut verifier).await.unwrap();
        let PurchaseOutcome::Completed(receipt) = outcome else {
            panic!("expected completion");
        };
        assert_eq!(receipt.amount, Decimal::from(2040));
        assert!(flow.select_options(PurchaseOptions::default()).is_err());
    }

    #[tokio::test]
    async fn test_declined_payment_fails_then_retries() {
        let declining = Arc::new(
            MockArtworkService::new(&CatalogConfig::default(), no_delay()).declining_payments(),
        );
        let (mut flow, mut verifier) = fixture(declining).await;

        let err = flow.purchase_with_verifier(&mut verifier).await.unwrap_err();
        assert!(matches!(err, ArtifyError::PaymentFailed(_)));
        assert_eq!(flow.status(), TransactionStatus::Failed);
        assert!(flow.is_verified());

        // Verification is kept; the retry goes straight back to settlement.
        let err = flow.attempt_purchase().await.unwrap_err();
        assert!(err.is_retryable());
        assert_eq!(flow.status(), TransactionStatus::Failed);
    }

    #[tokio::test]
    async fn test_viewer_cannot_start_purchase() {
        let svc = service();
        let artwork = svc.get_artwork("artwork-123").await.unwrap();
        let err = TransactionFlow::new(
            artwork,
            UserSession::new("viewer-1", "Val", Role::Viewer),
            svc,
            no_delay(),
            PaymentConfig::default(),
        )
        .unwrap_err();
        assert!(matches!(err, ArtifyError::InvalidTransition { .. }));
    }

    #[tokio::test]
    async fn test_checkout_settles_in_configured_currency() {
        let svc = Arc::new(
            MockArtworkService::new(&CatalogConfig::default(), no_delay()).listed_in("EUR"),
        );
        let artwork = svc.get_artwork("artwork-123").await.unwrap();
        let mut verifier = Verifier::new(
            &artwork,
            Arc::new(ScriptedTagReader::always_pass()),
            no_delay(),
            VerificationConfig::default(),
        );
        let payments = PaymentConfig {
            currency: "EUR".to_string(),
            ..PaymentConfig::default()
        };
        let mut flow = TransactionFlow::new(
            artwork,
            UserSession::new("collector-1", "Casey", Role::Collector),
            svc.clone(),
            no_delay(),
            payments,
        )
        .unwrap();

        assert_eq!(flow.quote().unwrap().currency, "EUR");
        let PurchaseOutcome::Completed(receipt) =
            flow.purchase_with_verifier(&mut verifier).await.unwrap()
        else {
            panic!("expected completion");
        };
        assert_eq!(receipt.currency, "EUR");
        assert_eq!(receipt.amount, Decimal::from(1224));
    }

    #[tokio::test]
    async fn test_listing_currency_must_match_checkout() {
        let svc = service();
        let artwork = svc.get_artwork("artwork-123").await.unwrap();
        let payments = PaymentConfig {
            currency: "EUR".to_string(),
            ..PaymentConfig::default()
        };
        let err = TransactionFlow::new(
            artwork,
            UserSession::new("collector-1", "Casey", Role::Collector),
            svc,
            no_delay(),
            payments,
        )
        .unwrap_err();
        assert!(matches!(err, ArtifyError::InvalidPrice(_)));
    }
}
