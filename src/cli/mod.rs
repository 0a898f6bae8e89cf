use clap::{Parser, Subcommand, ValueEnum};

use crate::pricing::{FrameOption, PrintSize};
use crate::session::Role;

pub mod commands;

#[derive(Parser)]
#[command(name = "artify")]
#[command(about = "Browse artworks, verify NFC authenticity tags, and buy verified art")]
#[command(long_about = "Artify simulates the marketplace purchase flow: every purchase is gated on \
                       an NFC authenticity check of the artwork's tag, followed by a simulated payment. \
                       Start with 'artify artworks' to see what is for sale.")]
pub struct Cli {
    /// Print machine-readable JSON instead of text
    #[arg(long, global = true)]
    pub json: bool,

    /// Skip the simulated scan and payment latency
    #[arg(long, global = true)]
    pub fast: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutcomeArg {
    /// Every scan passes
    Pass,
    /// Every scan fails with a tag mismatch
    Fail,
    /// Weighted coin flip using verification.pass_probability
    Random,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List artworks in the catalog
    Artworks,
    /// Show one artwork with its provenance
    Show {
        /// Artwork id, e.g. artwork-123
        artwork_id: String,
    },
    /// Price an artwork with size and frame options
    Quote {
        artwork_id: String,
        #[arg(long, default_value = "original", help = "Print size: small, original, large")]
        size: PrintSize,
        #[arg(long, default_value = "none", help = "Frame: none, wood, metal, floating")]
        frame: FrameOption,
    },
    /// Run an NFC authenticity check on an artwork
    Verify {
        artwork_id: String,
        #[command(flatten)]
        scan: ScanArgs,
    },
    /// Buy an artwork, verifying its tag first
    Purchase {
        artwork_id: String,
        /// Buyer user id
        #[arg(long, default_value = "collector-1")]
        buyer: String,
        /// Buyer role
        #[arg(long, default_value = "collector")]
        role: Role,
        #[arg(long, default_value = "original", help = "Print size: small, original, large")]
        size: PrintSize,
        #[arg(long, default_value = "none", help = "Frame: none, wood, metal, floating")]
        frame: FrameOption,
        #[command(flatten)]
        scan: ScanArgs,
    },
    /// Show the dashboard navigation for a role
    Nav {
        #[arg(long, help = "artist, gallery, collector or viewer")]
        role: Role,
    },
}

#[derive(Debug, Clone, clap::Args)]
pub struct ScanArgs {
    /// How simulated scans resolve
    #[arg(long, value_enum, default_value = "random")]
    pub outcome: OutcomeArg,
    /// Tag value read from the artwork; checked against the catalog instead of simulating
    #[arg(long)]
    pub scanned_tag: Option<String>,
    /// Scan attempts before giving up
    #[arg(long, default_value = "3")]
    pub attempts: u32,
    /// Pretend the device has no NFC reader
    #[arg(long)]
    pub no_nfc: bool,
}
