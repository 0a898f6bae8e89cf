use anyhow::Result;
use serde::Serialize;
use std::sync::Arc;

use crate::catalog::{ArtworkService, MockArtworkService};
use crate::cli::{OutcomeArg, ScanArgs};
use crate::config::ArtifyConfig;
use crate::timing::{no_delay, tokio_delay, SharedDelay};
use crate::verification::{
    CatalogTagReader, ScriptedTagReader, SimulatedTagReader, TagReader,
};

pub mod artworks;
pub mod nav;
pub mod purchase;
pub mod quote;
pub mod verify;

#[allow(async_fn_in_trait)]
pub trait Command {
    async fn execute(&self, ctx: &CommandContext) -> Result<()>;
}

/// Everything a command needs, built once in main.
pub struct CommandContext {
    pub config: ArtifyConfig,
    pub service: Arc<MockArtworkService>,
    pub delay: SharedDelay,
    pub json: bool,
}

impl CommandContext {
    pub fn new(config: ArtifyConfig, json: bool, fast: bool) -> Self {
        let delay = if fast { no_delay() } else { tokio_delay() };
        let service = Arc::new(
            MockArtworkService::new(&config.catalog, delay.clone())
                .listed_in(&config.payments.currency),
        );
        Self {
            config,
            service,
            delay,
            json,
        }
    }

    pub fn service(&self) -> Arc<dyn ArtworkService> {
        self.service.clone()
    }

    pub fn print_json<T: Serialize>(&self, value: &T) -> Result<()> {
        println!("{}", serde_json::to_string_pretty(value)?);
        Ok(())
    }

    /// The scan result provider selected on the command line.
    pub fn tag_reader(&self, artwork_id: &str, verified_by: &str, scan: &ScanArgs) -> Arc<dyn TagReader> {
        if scan.no_nfc {
            return Arc::new(SimulatedTagReader::unsupported());
        }
        if let Some(scanned) = &scan.scanned_tag {
            return Arc::new(CatalogTagReader::new(
                self.service(),
                artwork_id,
                scanned,
                verified_by,
            ));
        }
        match scan.outcome {
            OutcomeArg::Pass => Arc::new(ScriptedTagReader::always_pass()),
            OutcomeArg::Fail => Arc::new(ScriptedTagReader::always_fail()),
            OutcomeArg::Random => Arc::new(SimulatedTagReader::new(
                self.config.verification.pass_probability,
            )),
        }
    }
}
