use anyhow::Result;

use super::{Command, CommandContext};
use crate::catalog::ArtworkService;

pub struct ArtworksCommand;

impl Command for ArtworksCommand {
    async fn execute(&self, ctx: &CommandContext) -> Result<()> {
        let artworks = ctx.service.list_artworks().await?;
        if ctx.json {
            return ctx.print_json(&artworks);
        }

        println!("🖼️  ARTWORKS ({})", artworks.len());
        println!();
        for artwork in &artworks {
            println!("   {:<12} {}", artwork.id, artwork.headline());
            println!(
                "   {:<12} {} {} · {}",
                "", artwork.currency, artwork.price, artwork.medium
            );
        }
        println!();
        println!("💡 Run 'artify show <id>' for details or 'artify purchase <id>' to buy");
        Ok(())
    }
}

pub struct ShowCommand {
    pub artwork_id: String,
}

impl Command for ShowCommand {
    async fn execute(&self, ctx: &CommandContext) -> Result<()> {
        let artwork = match ctx.service.get_artwork(&self.artwork_id).await {
            Ok(artwork) => artwork,
            Err(e) => {
                println!("❌ {}", e.user_message());
                return Err(e.into());
            }
        };
        if ctx.json {
            return ctx.print_json(&artwork);
        }

        println!("🖼️  {}", artwork.headline());
        println!("   Medium:     {}", artwork.medium);
        println!("   Dimensions: {}", artwork.dimensions);
        println!("   Edition:    {}", artwork.edition);
        println!("   Price:      {} {}", artwork.currency, artwork.price);
        println!("   NFC tag:    {}", artwork.tag_id);
        println!();
        println!("   {}", artwork.description);
        println!();
        println!("📜 PROVENANCE");
        for record in &artwork.provenance {
            let mark = if record.verified { "✅" } else { "⚠️ " };
            println!("   {mark} {}  {} ({})", record.date, record.owner, record.location);
        }
        Ok(())
    }
}
