use anyhow::Result;

use super::{Command, CommandContext};
use crate::catalog::ArtworkService;
use crate::cli::ScanArgs;
use crate::errors::ArtifyError;
use crate::verification::{VerificationReport, Verifier};

pub struct VerifyCommand {
    pub artwork_id: String,
    pub scan: ScanArgs,
}

impl Command for VerifyCommand {
    async fn execute(&self, ctx: &CommandContext) -> Result<()> {
        let artwork = ctx.service.get_artwork(&self.artwork_id).await?;
        let reader = ctx.tag_reader(&artwork.id, "cli", &self.scan);
        let mut verifier = Verifier::new(
            &artwork,
            reader,
            ctx.delay.clone(),
            ctx.config.verification.clone(),
        );

        if !ctx.json {
            println!("📡 Verifying '{}' (tag {})", artwork.title, artwork.tag_id);
        }

        let report = run_scans(&mut verifier, self.scan.attempts, ctx.json).await?;
        if ctx.json {
            ctx.print_json(&report)?;
        } else if report.verified {
            println!("✅ Artwork Verified! NFC ID: {}", report.tag_id);
        }
        if !report.verified {
            anyhow::bail!(
                "artwork {} could not be verified after {} attempt(s)",
                report.artwork_id,
                report.attempts
            );
        }
        Ok(())
    }
}

/// Scan until verified or out of attempts. Non-retryable errors stop at once;
/// running out of attempts returns the failed report.
pub async fn run_scans(verifier: &mut Verifier, attempts: u32, quiet: bool) -> Result<VerificationReport> {
    for attempt in 1..=attempts.max(1) {
        if !quiet {
            println!("   🔄 Scanning NFC tag... (attempt {attempt})");
        }
        match verifier.scan().await {
            Ok(report) => return Ok(report),
            Err(e @ ArtifyError::VerificationFailed { .. }) => {
                if !quiet {
                    println!("   ❌ Verification Failed: {}", e.user_message());
                }
            }
            Err(e) => {
                if !quiet {
                    println!("   ❌ {}", e.user_message());
                }
                return Err(e.into());
            }
        }
    }
    Ok(verifier.report())
}
