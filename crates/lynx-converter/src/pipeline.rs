//! Conversion pipeline
//!
//! ```text
//! document → DocumentScanner → sum → RateCache → total / rate per asset
//!          → wallet association → ConversionLedger → (replay) TransferClient
//! ```

use crate::context::ConverterContext;
use crate::types::{PortfolioSummary, SendReport, SingleConversion, WalletSummary};
use crate::{ConvertError, Result};
use chrono::Utc;
use lynx_domain::traits::{DocumentSource, PriceSource, TransferClient, WalletDirectory};
use lynx_domain::{
    Asset, ConversionRecord, ConversionSummary, RateTable, TransferOutcome, WalletEntry,
};
use lynx_extractor::ScanReport;
use lynx_ledger::ConversionDraft;
use lynx_rates::RateQuote;
use rust_decimal::Decimal;
use std::collections::{BTreeMap, HashSet};
use std::path::Path;
use tokio::sync::Mutex;
use tracing::{debug, error, info, warn};

/// Orchestrates scanning, pricing, wallet association, persistence and replay
pub struct ConversionPipeline<D, P, W, T> {
    ctx: ConverterContext<D, P, W, T>,
    /// Serializes replays; holds IDs whose transfers were accepted but which
    /// could not be marked sent in the ledger
    replay_lock: Mutex<HashSet<String>>,
}

impl<D, P, W, T> ConversionPipeline<D, P, W, T>
where
    D: DocumentSource + Send + Sync,
    P: PriceSource,
    W: WalletDirectory,
    T: TransferClient,
{
    /// Create a pipeline over a context
    pub fn new(ctx: ConverterContext<D, P, W, T>) -> Self {
        Self {
            ctx,
            replay_lock: Mutex::new(HashSet::new()),
        }
    }

    /// The collaborators this pipeline uses
    pub fn context(&self) -> &ConverterContext<D, P, W, T> {
        &self.ctx
    }

    /// Extract every amount from a document without converting
    pub fn scan_document(&self, path: &Path) -> Result<ScanReport> {
        Ok(self.ctx.scanner.scan(path)?)
    }

    /// Convert a document's total into every asset and persist the result
    ///
    /// `base_currency` defaults to the configured base currency and must match
    /// it, ignoring case.
    ///
    /// # Errors
    ///
    /// - [`ConvertError::UnsupportedConversion`] for any other base currency
    /// - [`ConvertError::NotFound`], [`ConvertError::UnsupportedFormat`] or
    ///   [`ConvertError::CorruptDocument`] if the document cannot be scanned
    /// - [`ConvertError::NoBalancesFound`] if it holds no amounts
    /// - [`ConvertError::RatesUnavailable`] if no rate tier succeeds
    /// - [`ConvertError::Storage`] if the ledger write fails
    pub async fn convert(
        &self,
        path: &Path,
        base_currency: Option<&str>,
    ) -> Result<ConversionRecord> {
        if let Some(currency) = base_currency {
            if !self.ctx.config.is_base(currency) {
                return Err(ConvertError::UnsupportedConversion(format!(
                    "document balances must be in {}, got {}",
                    self.ctx.config.base_code(),
                    currency.trim().to_uppercase()
                )));
            }
        }

        let report = self.scan_document(path)?;
        if report.is_empty() {
            return Err(ConvertError::NoBalancesFound(report.source_file));
        }
        let total = report.summary.total_sum;

        let quote = self.ctx.rates.get_rates().await?;
        if quote.tier.is_degraded() {
            warn!(tier = quote.tier.as_str(), "Converting with degraded rates");
        }

        let per_asset_amounts = purchasable_amounts(total, &quote.rates)?;
        let wallet_info = self.associate_wallets(&per_asset_amounts);

        let draft = ConversionDraft {
            source_file: report.source_file,
            base_currency: self.ctx.config.base_code(),
            total_base_amount: total,
            per_asset_amounts,
            wallet_info,
            rate_snapshot: quote.rates.as_map().clone(),
        };
        let record = self.ctx.ledger.save(draft)?;

        info!(
            id = %record.id,
            total = %record.total_base_amount,
            balances = report.summary.count,
            tier = quote.tier.as_str(),
            "Conversion saved"
        );
        Ok(record)
    }

    /// Convert one base-currency amount into one asset
    ///
    /// Nothing is persisted.
    ///
    /// # Errors
    ///
    /// - [`ConvertError::UnsupportedConversion`] unless `from` is the base currency
    /// - [`ConvertError::RateNotAvailable`] if `to` is not a priced asset
    pub async fn convert_single_amount(
        &self,
        amount: Decimal,
        from: &str,
        to: &str,
    ) -> Result<SingleConversion> {
        if !self.ctx.config.is_base(from) {
            return Err(ConvertError::UnsupportedConversion(format!(
                "only {} to crypto conversion is supported, got {} to {}",
                self.ctx.config.base_code(),
                from.trim().to_uppercase(),
                to.trim().to_uppercase()
            )));
        }

        let unavailable = || ConvertError::RateNotAvailable(to.trim().to_uppercase());
        let asset = Asset::parse(to).ok_or_else(unavailable)?;

        let quote = self.ctx.rates.get_rates().await?;
        let rate = quote.rates.get(asset).ok_or_else(unavailable)?;
        let converted = amount.checked_div(rate).ok_or_else(|| {
            ConvertError::UnsupportedConversion(format!("{} {} is out of range", amount, asset))
        })?;

        let currency = self.ctx.config.base_code();
        let calculation = format!(
            "{} {} / {} {} per {} = {:.8} {}",
            amount.normalize(),
            currency,
            rate.normalize(),
            currency,
            asset,
            converted.round_dp(8),
            asset
        );
        debug!(%calculation, tier = quote.tier.as_str(), "Single conversion");

        Ok(SingleConversion {
            original_amount: amount,
            original_currency: currency,
            converted_amount: converted,
            target_asset: asset,
            rate,
            rate_tier: quote.tier,
            calculation,
            timestamp: Utc::now(),
        })
    }

    /// Convert a document and report its wallet coverage
    pub async fn portfolio_summary(&self, path: &Path) -> Result<PortfolioSummary> {
        let conversion = self.convert(path, None).await?;
        let wallet_summary = WalletSummary::from_entries(&conversion.wallet_info);
        Ok(PortfolioSummary {
            conversion,
            wallet_summary,
        })
    }

    /// Convert a document, persist it, then transfer every amount
    ///
    /// The conversion stays in the ledger even if every transfer fails, and
    /// can be replayed with [`send_saved_conversion`](Self::send_saved_conversion).
    pub async fn send_conversion(
        &self,
        path: &Path,
        wallet_override: Option<&str>,
    ) -> Result<SendReport> {
        let record = self.convert(path, None).await?;
        self.send_saved_conversion(&record.id, wallet_override).await
    }

    /// Stored conversions, newest first
    pub fn list_conversions(&self, include_sent: bool) -> Result<Vec<ConversionSummary>> {
        Ok(self.ctx.ledger.list(include_sent)?)
    }

    /// Transfer a stored conversion's amounts
    ///
    /// Each asset is attempted independently. The record is marked sent if at
    /// least one transfer was accepted. Concurrent replays are serialized, so
    /// a conversion is never transferred twice by one pipeline.
    ///
    /// Once a transfer has been accepted the report is always returned. If
    /// the ledger cannot record the send, `sent` is false, `mark_error` says
    /// why, and later replays through this pipeline are still refused.
    ///
    /// # Errors
    ///
    /// - [`ConvertError::NotFound`] if no record has this ID
    /// - [`ConvertError::AlreadySent`] if the record was already sent
    pub async fn send_saved_conversion(
        &self,
        id: &str,
        wallet_override: Option<&str>,
    ) -> Result<SendReport> {
        let mut unmarked = self.replay_lock.lock().await;

        let record = self
            .ctx
            .ledger
            .get(id)?
            .ok_or_else(|| ConvertError::NotFound(format!("conversion {}", id)))?;
        if record.sent || unmarked.contains(&record.id) {
            return Err(ConvertError::AlreadySent(record.id));
        }

        let mut transactions = Vec::with_capacity(record.per_asset_amounts.len());
        for (&asset, &amount) in &record.per_asset_amounts {
            transactions.push(self.transfer(asset, amount, wallet_override).await);
        }

        let mut mark_error = None;
        let sent = if transactions.iter().any(|t| t.success) {
            match self.ctx.ledger.mark_sent(&record.id) {
                Ok(true) => true,
                Ok(false) => {
                    warn!(id = %record.id, "Conversion removed before it could be marked sent");
                    false
                }
                Err(e) => {
                    error!(id = %record.id, error = %e, "Transfers accepted but conversion not marked sent");
                    unmarked.insert(record.id.clone());
                    mark_error = Some(ConvertError::from(e).to_string());
                    false
                }
            }
        } else {
            false
        };

        let report = SendReport {
            conversion_id: record.id,
            source_file: record.source_file,
            total_base_amount: record.total_base_amount,
            transactions,
            sent,
            mark_error,
        };
        info!(
            id = %report.conversion_id,
            successful = report.successful(),
            failed = report.failed(),
            "Conversion replayed"
        );
        Ok(report)
    }

    /// Current rates, optionally bypassing the in-memory cache
    pub async fn rates(&self, refresh: bool) -> Result<RateQuote> {
        let quote = if refresh {
            self.ctx.rates.force_refresh().await?
        } else {
            self.ctx.rates.get_rates().await?
        };
        Ok(quote)
    }

    /// Remove a stored conversion; returns whether it existed
    pub fn delete_conversion(&self, id: &str) -> Result<bool> {
        Ok(self.ctx.ledger.delete(id)?)
    }

    fn associate_wallets(
        &self,
        amounts: &BTreeMap<Asset, Decimal>,
    ) -> BTreeMap<Asset, WalletEntry> {
        amounts
            .keys()
            .map(|&asset| {
                let entry = match self.ctx.wallets.address_for(asset) {
                    None => {
                        warn!(%asset, "No wallet address configured");
                        WalletEntry::missing()
                    }
                    Some(address) => {
                        let valid = self.ctx.wallets.is_valid_format(asset, &address);
                        if !valid {
                            warn!(%asset, %address, "Invalid wallet address");
                        }
                        WalletEntry {
                            address: Some(address),
                            valid,
                        }
                    }
                };
                (asset, entry)
            })
            .collect()
    }

    async fn transfer(
        &self,
        asset: Asset,
        amount: Decimal,
        wallet_override: Option<&str>,
    ) -> TransferOutcome {
        let destination = match wallet_override {
            Some(address) => Some(address.trim().to_string()),
            None => self.ctx.wallets.address_for(asset),
        };

        let Some(destination) = destination else {
            warn!(%asset, "Transfer skipped: no wallet address");
            return TransferOutcome::failed(
                asset,
                amount,
                None,
                format!("No wallet address configured for {}", asset),
            );
        };

        if !self.ctx.wallets.is_valid_format(asset, &destination) {
            warn!(%asset, %destination, "Transfer skipped: invalid wallet address");
            return TransferOutcome::failed(
                asset,
                amount,
                Some(destination.clone()),
                format!("Invalid {} address: {}", asset, destination),
            );
        }

        match self.ctx.transfers.send(asset, amount, &destination).await {
            Ok(receipt) => {
                info!(%asset, %amount, tx_hash = %receipt.tx_hash, "Transfer accepted");
                TransferOutcome::accepted(asset, amount, destination, receipt)
            }
            Err(e) => {
                warn!(%asset, %amount, error = %e, "Transfer failed");
                TransferOutcome::failed(asset, amount, Some(destination), e.to_string())
            }
        }
    }
}

/// How much of each asset `total` buys at the table's prices
fn purchasable_amounts(total: Decimal, rates: &RateTable) -> Result<BTreeMap<Asset, Decimal>> {
    rates
        .iter()
        .map(|(asset, rate)| {
            total
                .checked_div(rate)
                .map(|amount| (asset, amount))
                .ok_or_else(|| {
                    ConvertError::UnsupportedConversion(format!(
                        "{} at {} per {} is out of range",
                        total, rate, asset
                    ))
                })
        })
        .collect()
}
