use anyhow::Result;

use super::{Command, CommandContext};
use crate::catalog::ArtworkService;
use crate::cli::ScanArgs;
use crate::errors::ArtifyError;
use crate::pricing::{FrameOption, PrintSize, PurchaseOptions};
use crate::session::{Role, UserSession};
use crate::transaction::{PurchaseOutcome, TransactionFlow};
use crate::verification::Verifier;

pub struct PurchaseCommand {
    pub artwork_id: String,
    pub buyer: String,
    pub role: Role,
    pub size: PrintSize,
    pub frame: FrameOption,
    pub scan: ScanArgs,
}

impl Command for PurchaseCommand {
    async fn execute(&self, ctx: &CommandContext) -> Result<()> {
        let artwork = ctx.service.get_artwork(&self.artwork_id).await?;
        let buyer = UserSession::new(&self.buyer, &self.buyer, self.role);
        let reader = ctx.tag_reader(&artwork.id, &buyer.user_id, &self.scan);
        let mut verifier = Verifier::new(
            &artwork,
            reader,
            ctx.delay.clone(),
            ctx.config.verification.clone(),
        );
        let mut flow = TransactionFlow::new(
            artwork,
            buyer,
            ctx.service(),
            ctx.delay.clone(),
            ctx.config.payments.clone(),
        )?;
        flow.select_options(PurchaseOptions {
            size: self.size,
            frame: self.frame,
        })?;

        let quote = flow.quote()?;
        if !ctx.json {
            println!("🛒 Purchasing '{}'", flow.artwork().title);
            println!(
                "   Total: {} {} (includes {} {} authentication fee)",
                quote.currency, quote.total_price, quote.currency, quote.authentication_fee
            );
        }

        for attempt in 1..=self.scan.attempts.max(1) {
            if !ctx.json {
                println!("   📡 NFC verification required (attempt {attempt})");
            }
            match flow.purchase_with_verifier(&mut verifier).await {
                Ok(outcome) => {
                    if let Some(output) = completion_output(&flow, &outcome, ctx.json)? {
                        println!("{output}");
                        return Ok(());
                    }
                    tracing::debug!(outcome = ?outcome, "Purchase not yet settled");
                }
                Err(e @ ArtifyError::VerificationFailed { .. }) => {
                    if !ctx.json {
                        println!("   ❌ {}", e.user_message());
                    }
                }
                Err(e) => {
                    if !ctx.json {
                        println!("   ❌ {}", e.user_message());
                    }
                    return Err(e.into());
                }
            }
        }

        flow.dismiss_verification();
        if ctx.json {
            ctx.print_json(&flow.transaction()?)?;
        }
        anyhow::bail!(
            "purchase of {} not completed: verification failed after {} attempt(s)",
            flow.artwork().id,
            verifier.attempts()
        )
    }
}

/// What to print once the purchase has settled; `None` while it has not.
fn completion_output(
    flow: &TransactionFlow,
    outcome: &PurchaseOutcome,
    json: bool,
) -> Result<Option<String>> {
    let output = match outcome {
        PurchaseOutcome::Completed(_) | PurchaseOutcome::AlreadyCompleted if json => {
            serde_json::to_string_pretty(&flow.transaction()?)?
        }
        PurchaseOutcome::Completed(receipt) => format!(
            "   ✅ Artwork NFC verified\n🎉 Purchase Complete\n   Transaction: {}\n   Charged:     {} {}",
            receipt.transaction_id, receipt.currency, receipt.amount
        ),
        PurchaseOutcome::AlreadyCompleted => "✅ This purchase is already complete".to_string(),
        PurchaseOutcome::VerificationRequired | PurchaseOutcome::Ready => return Ok(None),
    };
    Ok(Some(output))
}
