//! Explicit dependency container for the pipeline
//!
//! Build one [`ConverterContext`] at startup and hand it to whichever
//! component needs it. Tests assemble their own from doubles.

use crate::{ConversionPipeline, ConvertError, PipelineConfig, ServiceConfig};
use lynx_extractor::{DocumentScanner, DocxSource};
use lynx_ledger::ConversionLedger;
use lynx_rates::{CoinGeckoSource, RateCache};
use lynx_wallet::{ConfiguredWallets, SimulatedTransferClient};
use std::sync::Arc;
use tracing::info;

/// Shared handles to every pipeline collaborator
pub struct ConverterContext<D, P, W, T> {
    /// Document scanner
    pub scanner: Arc<DocumentScanner<D>>,
    /// Rate cache
    pub rates: Arc<RateCache<P>>,
    /// Conversion ledger
    pub ledger: Arc<ConversionLedger>,
    /// Wallet address book
    pub wallets: Arc<W>,
    /// Transfer collaborator
    pub transfers: Arc<T>,
    /// Pipeline settings
    pub config: PipelineConfig,
}

// Manual impl: cloning only bumps the Arc counts, so no bounds on D, P, W, T
impl<D, P, W, T> Clone for ConverterContext<D, P, W, T> {
    fn clone(&self) -> Self {
        Self {
            scanner: Arc::clone(&self.scanner),
            rates: Arc::clone(&self.rates),
            ledger: Arc::clone(&self.ledger),
            wallets: Arc::clone(&self.wallets),
            transfers: Arc::clone(&self.transfers),
            config: self.config.clone(),
        }
    }
}

impl<D, P, W, T> ConverterContext<D, P, W, T> {
    /// Assemble a context from already constructed collaborators
    pub fn new(
        scanner: DocumentScanner<D>,
        rates: RateCache<P>,
        ledger: ConversionLedger,
        wallets: W,
        transfers: T,
        config: PipelineConfig,
    ) -> Result<Self, ConvertError> {
        config.validate().map_err(ConvertError::Config)?;
        Ok(Self {
            scanner: Arc::new(scanner),
            rates: Arc::new(rates),
            ledger: Arc::new(ledger),
            wallets: Arc::new(wallets),
            transfers: Arc::new(transfers),
            config,
        })
    }
}

/// Context wired to `.docx` files, CoinGecko, configured wallets and the
/// simulated transfer client
pub type LiveContext =
    ConverterContext<DocxSource, CoinGeckoSource, ConfiguredWallets, SimulatedTransferClient>;

/// Pipeline over a [`LiveContext`]
pub type LivePipeline =
    ConversionPipeline<DocxSource, CoinGeckoSource, ConfiguredWallets, SimulatedTransferClient>;

impl LiveContext {
    /// Build the production collaborators from configuration
    ///
    /// Wallet addresses set through `*_WALLET` environment variables override
    /// the configured ones.
    pub fn from_config(config: &ServiceConfig) -> Result<Self, ConvertError> {
        config.validate().map_err(ConvertError::Config)?;

        let scanner = DocumentScanner::new(DocxSource::new(), config.extractor.clone())?;
        let source = CoinGeckoSource::from_config(&config.rates)
            .map_err(|e| ConvertError::Config(e.to_string()))?;
        let rates = RateCache::new(source, config.rates.clone())?;
        let ledger = ConversionLedger::new(&config.ledger)?;
        let wallets = ConfiguredWallets::from_config(&config.wallet.clone().with_env_overrides())?;
        let transfers = SimulatedTransferClient::new(config.wallet.transfer_assets.iter().copied());

        info!(
            ledger = %ledger.path().display(),
            wallets = wallets.len(),
            "Converter context ready"
        );

        Self::new(
            scanner,
            rates,
            ledger,
            wallets,
            transfers,
            config.pipeline.clone(),
        )
    }
}
