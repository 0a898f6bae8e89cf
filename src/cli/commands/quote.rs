use anyhow::Result;

use super::{Command, CommandContext};
use crate::catalog::ArtworkService;
use crate::pricing::{self, FrameOption, PrintSize, PurchaseOptions};

pub struct QuoteCommand {
    pub artwork_id: String,
    pub size: PrintSize,
    pub frame: FrameOption,
}

impl Command for QuoteCommand {
    async fn execute(&self, ctx: &CommandContext) -> Result<()> {
        let artwork = ctx.service.get_artwork(&self.artwork_id).await?;
        let options = PurchaseOptions {
            size: self.size,
            frame: self.frame,
        };
        let quote = pricing::quote(
            artwork.price,
            options,
            ctx.config.payments.fee_rate(),
            &ctx.config.payments.currency,
        )?;

        if ctx.json {
            return ctx.print_json(&quote);
        }

        println!("💰 {}", artwork.headline());
        println!("   Size / frame:        {} / {}", self.size, self.frame);
        println!("   List price:          {} {}", quote.currency, quote.list_price);
        println!("   Price:               {} {}", quote.currency, quote.base_price);
        println!("   Authentication fee:  {} {}", quote.currency, quote.authentication_fee);
        println!("   Total:               {} {}", quote.currency, quote.total_price);
        Ok(())
    }
}
