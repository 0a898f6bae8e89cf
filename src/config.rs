use anyhow::Result;
use config::{Config, Environment, File};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Main configuration structure for Artify
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct ArtifyConfig {
    /// NFC verification timings and simulation settings
    pub verification: VerificationConfig,
    /// Payment settlement and fee settings
    pub payments: PaymentConfig,
    /// Mocked catalog backend settings
    pub catalog: CatalogConfig,
    /// Logging settings
    pub observability: ObservabilityConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct VerificationConfig {
    /// Simulated time to read the tag
    pub scan_delay_ms: u64,
    /// Pause between a successful scan and the completion callback
    pub confirmation_delay_ms: u64,
    /// Probability that a simulated scan passes
    pub pass_probability: f64,
}

impl Default for VerificationConfig {
    fn default() -> Self {
        Self {
            scan_delay_ms: 2000,
            confirmation_delay_ms: 1000,
            pass_probability: 0.8,
        }
    }
}

impl VerificationConfig {
    pub fn scan_delay(&self) -> Duration {
        Duration::from_millis(self.scan_delay_ms)
    }

    pub fn confirmation_delay(&self) -> Duration {
        Duration::from_millis(self.confirmation_delay_ms)
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct PaymentConfig {
    /// Simulated payment processing time
    pub processing_delay_ms: u64,
    /// Authentication fee in basis points of the adjusted price
    pub authentication_fee_bps: u32,
    /// ISO currency code for every amount
    pub currency: String,
}

impl Default for PaymentConfig {
    fn default() -> Self {
        Self {
            processing_delay_ms: 2000,
            authentication_fee_bps: 200,
            currency: "USD".to_string(),
        }
    }
}

impl PaymentConfig {
    pub fn processing_delay(&self) -> Duration {
        Duration::from_millis(self.processing_delay_ms)
    }

    /// Fee rate as a fraction, e.g. 200 bps => 0.02
    pub fn fee_rate(&self) -> Decimal {
        Decimal::new(self.authentication_fee_bps as i64, 4)
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CatalogConfig {
    pub fetch_delay_ms: u64,
    pub tag_check_delay_ms: u64,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            fetch_delay_ms: 500,
            tag_check_delay_ms: 1500,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Default log level when RUST_LOG is unset
    pub log_level: String,
    /// Emit JSON lines instead of human-readable logs
    pub json_logs: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            json_logs: true,
        }
    }
}

impl ArtifyConfig {
    /// Load configuration from multiple sources with precedence:
    /// 1. Default values
    /// 2. Configuration files (artify.toml, .artify-rc)
    /// 3. Environment variables (prefixed with ARTIFY_, sections split by "__")
    pub fn load() -> Result<Self> {
        let mut builder = Config::builder().add_source(Config::try_from(&Self::default())?);

        if Path::new("artify.toml").exists() {
            builder = builder.add_source(File::with_name("artify"));
        }

        if Path::new(".artify-rc").exists() {
            builder = builder.add_source(File::with_name(".artify-rc").format(config::FileFormat::Toml));
        }

        builder = builder.add_source(
            Environment::with_prefix("ARTIFY")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let artify_config: ArtifyConfig = builder.build()?.try_deserialize()?;
        artify_config.validate()?;
        Ok(artify_config)
    }

    /// Load defaults overlaid with a single TOML file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let artify_config: ArtifyConfig = Config::builder()
            .add_source(Config::try_from(&Self::default())?)
            .add_source(File::from(path).format(config::FileFormat::Toml))
            .build()?
            .try_deserialize()?;
        artify_config.validate()?;
        Ok(artify_config)
    }

    pub fn validate(&self) -> Result<()> {
        let p = self.verification.pass_probability;
        if !(0.0..=1.0).contains(&p) {
            anyhow::bail!("verification.pass_probability must be within 0.0..=1.0, got {p}");
        }
        if self.payments.currency.len() != 3 {
            anyhow::bail!(
                "payments.currency must be a 3-letter ISO code, got '{}'",
                self.payments.currency
            );
        }
        Ok(())
    }

    /// Save configuration to file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let toml_content = toml::to_string_pretty(self)?;
        std::fs::write(path, toml_content)?;
        Ok(())
    }

    /// Load .env file if it exists
    pub fn load_env_file() -> Result<()> {
        if Path::new(".env").exists() {
            dotenvy::dotenv()?;
            tracing::info!("Loaded environment variables from .env file");
        }
        Ok(())
    }
}

/// Global configuration instance
static CONFIG: std::sync::LazyLock<Result<ArtifyConfig, anyhow::Error>> =
    std::sync::LazyLock::new(|| {
        let _ = ArtifyConfig::load_env_file();
        ArtifyConfig::load()
    });

/// Get the global configuration
pub fn config() -> Result<&'static ArtifyConfig> {
    CONFIG
        .as_ref()
        .map_err(|e| anyhow::anyhow!("Failed to load configuration: {}", e))
}

/// Initialize configuration (called at startup)
pub fn init_config() -> Result<()> {
    let _config = config()?;
    tracing::info!("Configuration loaded successfully");
    Ok(())
}
