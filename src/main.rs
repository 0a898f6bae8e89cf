use anyhow::Result;
use clap::Parser;

use artify::cli::commands::artworks::{ArtworksCommand, ShowCommand};
use artify::cli::commands::nav::NavCommand;
use artify::cli::commands::purchase::PurchaseCommand;
use artify::cli::commands::quote::QuoteCommand;
use artify::cli::commands::verify::VerifyCommand;
use artify::cli::commands::{Command, CommandContext};
use artify::cli::{Cli, Commands};
use artify::{config, init_config, init_telemetry};

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_config()?;
    let config = config()?.clone();
    init_telemetry(&config.observability)?;

    let ctx = CommandContext::new(config, cli.json, cli.fast);

    tokio::runtime::Runtime::new()?.block_on(async {
        match cli.command {
            Commands::Artworks => ArtworksCommand.execute(&ctx).await,
            Commands::Show { artwork_id } => ShowCommand { artwork_id }.execute(&ctx).await,
            Commands::Quote {
                artwork_id,
                size,
                frame,
            } => {
                QuoteCommand {
                    artwork_id,
                    size,
                    frame,
                }
                .execute(&ctx)
                .await
            }
            Commands::Verify { artwork_id, scan } => {
                VerifyCommand { artwork_id, scan }.execute(&ctx).await
            }
            Commands::Purchase {
                artwork_id,
                buyer,
                role,
                size,
                frame,
                scan,
            } => {
                PurchaseCommand {
                    artwork_id,
                    buyer,
                    role,
                    size,
                    frame,
                    scan,
                }
                .execute(&ctx)
                .await
            }
            Commands::Nav { role } => NavCommand { role }.execute(&ctx).await,
        }
    })
}
