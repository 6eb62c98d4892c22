//! Integration tests for the conversion pipeline

use async_trait::async_trait;
use lynx_converter::{
    ConversionPipeline, ConvertError, ConverterContext, ErrorKind, PipelineConfig,
};
use lynx_domain::traits::TransferClient;
use lynx_domain::{Asset, Document, RateTier, Table, TransferReceipt, TransferStatus};
use lynx_extractor::{DocumentScanner, ExtractorConfig, StaticDocumentSource};
use lynx_ledger::ConversionLedger;
use lynx_rates::{MockPriceSource, RateCache, RateConfig};
use lynx_wallet::{ConfiguredWallets, SimulatedTransferClient};
use rust_decimal::Decimal;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

const BALANCES: &str = "/docs/balances.docx";
const ETH_ADDRESS: &str = "0x742d35Cc6634C0532925a3b844Bc454e4438f44e";

type Pipeline<T> = ConversionPipeline<StaticDocumentSource, MockPriceSource, ConfiguredWallets, T>;

fn prices() -> Vec<(Asset, Decimal)> {
    vec![
        (Asset::Btc, Decimal::from(45_000)),
        (Asset::Eth, Decimal::from(2_500)),
        (Asset::Usdt, Decimal::ONE),
        (Asset::Sol, Decimal::from(125)),
    ]
}

fn documents() -> StaticDocumentSource {
    StaticDocumentSource::new()
        .with_document(
            BALANCES,
            Document::new()
                .with_paragraph("Checking: $5,250.00")
                .with_paragraph("Savings: $12,800.50"),
        )
        .with_document(
            "/docs/notes.docx",
            Document::new().with_paragraph("Nothing to see here"),
        )
        .with_document("/docs/report.pdf", Document::new())
        .with_unreadable("/docs/broken.docx")
}

fn eth_wallets() -> ConfiguredWallets {
    ConfiguredWallets::new(BTreeMap::new())
        .unwrap()
        .with_address(Asset::Eth, ETH_ADDRESS)
        .with_address(Asset::Usdt, ETH_ADDRESS)
}

fn build<T: TransferClient>(
    dir: &TempDir,
    source: MockPriceSource,
    wallets: ConfiguredWallets,
    transfers: T,
) -> Pipeline<T> {
    let scanner = DocumentScanner::new(documents(), ExtractorConfig::default()).unwrap();
    let rates = RateCache::new(
        source,
        RateConfig {
            snapshot_path: dir.path().join("fallback_rates.json"),
            ..RateConfig::default()
        },
    )
    .unwrap();
    let ledger = ConversionLedger::open(dir.path().join("conversions.json")).unwrap();

    let ctx = ConverterContext::new(
        scanner,
        rates,
        ledger,
        wallets,
        transfers,
        PipelineConfig::default(),
    )
    .unwrap();
    ConversionPipeline::new(ctx)
}

fn pipeline(dir: &TempDir) -> Pipeline<SimulatedTransferClient> {
    build(
        dir,
        MockPriceSource::new(prices()),
        eth_wallets(),
        SimulatedTransferClient::default(),
    )
}

/// Transfer client that rejects a fixed set of assets and counts calls
#[derive(Clone, Default)]
struct SelectiveTransferClient {
    rejected: Vec<Asset>,
    call_count: Arc<Mutex<usize>>,
}

impl SelectiveTransferClient {
    fn rejecting(rejected: impl IntoIterator<Item = Asset>) -> Self {
        Self {
            rejected: rejected.into_iter().collect(),
            ..Self::default()
        }
    }

    fn call_count(&self) -> usize {
        *self.call_count.lock().unwrap()
    }
}

#[async_trait]
impl TransferClient for SelectiveTransferClient {
    type Error = String;

    async fn send(
        &self,
        asset: Asset,
        _amount: Decimal,
        _destination: &str,
    ) -> Result<TransferReceipt, String> {
        *self.call_count.lock().unwrap() += 1;
        if self.rejected.contains(&asset) {
            return Err(format!("{} node unreachable", asset));
        }
        Ok(TransferReceipt {
            tx_hash: format!("0x{}", asset.symbol().to_lowercase()),
            status: TransferStatus::Pending,
        })
    }
}

/// What [`LedgerTamperingClient`] does to the ledger file while sending
#[derive(Clone, Copy)]
enum Tamper {
    /// Put a directory where the ledger writes its temp file
    BlockWrites,
    /// Replace the ledger with an empty list
    Clear,
}

/// Transfer client that accepts everything and disturbs the ledger file
#[derive(Clone)]
struct LedgerTamperingClient {
    ledger_path: PathBuf,
    tamper: Tamper,
    call_count: Arc<Mutex<usize>>,
}

impl LedgerTamperingClient {
    fn new(dir: &TempDir, tamper: Tamper) -> Self {
        Self {
            ledger_path: dir.path().join("conversions.json"),
            tamper,
            call_count: Arc::new(Mutex::new(0)),
        }
    }

    fn temp_path(&self) -> PathBuf {
        self.ledger_path.with_file_name("conversions.json.tmp")
    }

    fn call_count(&self) -> usize {
        *self.call_count.lock().unwrap()
    }
}

#[async_trait]
impl TransferClient for LedgerTamperingClient {
    type Error = String;

    async fn send(
        &self,
        asset: Asset,
        _amount: Decimal,
        _destination: &str,
    ) -> Result<TransferReceipt, String> {
        *self.call_count.lock().unwrap() += 1;
        match self.tamper {
            Tamper::BlockWrites => fs::create_dir_all(self.temp_path()).unwrap(),
            Tamper::Clear => fs::write(&self.ledger_path, "[]").unwrap(),
        }
        Ok(TransferReceipt {
            tx_hash: format!("0x{}", asset.symbol().to_lowercase()),
            status: TransferStatus::Pending,
        })
    }
}

#[tokio::test]
async fn test_convert_divides_total_by_each_rate() {
    let dir = TempDir::new().unwrap();
    let pipeline = pipeline(&dir);

    let record = pipeline.convert(Path::new(BALANCES), None).await.unwrap();

    assert!(record.id.starts_with("balances_"));
    assert_eq!(record.source_file, BALANCES);
    assert_eq!(record.base_currency, "USD");
    assert_eq!(record.total_base_amount, Decimal::new(1_805_050, 2));
    assert_eq!(
        record.per_asset_amounts[&Asset::Btc],
        Decimal::new(1_805_050, 2) / Decimal::from(45_000)
    );
    assert_eq!(record.per_asset_amounts[&Asset::Usdt], Decimal::new(1_805_050, 2));
    assert_eq!(record.per_asset_amounts[&Asset::Sol], Decimal::new(144_404, 3));
    assert_eq!(record.rate_snapshot[&Asset::Eth], Decimal::from(2_500));
    assert!(!record.sent);

    let stored = pipeline.context().ledger.get(&record.id).unwrap().unwrap();
    assert_eq!(stored, record);
}

#[tokio::test]
async fn test_convert_associates_wallets() {
    let dir = TempDir::new().unwrap();
    let wallets = eth_wallets().with_address(Asset::Sol, "not-a-solana-address");
    let pipeline = build(
        &dir,
        MockPriceSource::new(prices()),
        wallets,
        SimulatedTransferClient::default(),
    );

    let record = pipeline.convert(Path::new(BALANCES), None).await.unwrap();

    assert!(record.wallet_info[&Asset::Eth].valid);
    assert_eq!(record.wallet_info[&Asset::Eth].address.as_deref(), Some(ETH_ADDRESS));
    assert!(!record.wallet_info[&Asset::Sol].valid);
    assert!(record.wallet_info[&Asset::Sol].address.is_some());
    assert!(record.wallet_info[&Asset::Btc].address.is_none());
}

#[tokio::test]
async fn test_convert_base_currency() {
    let dir = TempDir::new().unwrap();
    let pipeline = pipeline(&dir);

    let err = pipeline.convert(Path::new(BALANCES), Some("EUR")).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnsupportedConversion);
    assert!(pipeline.list_conversions(true).unwrap().is_empty());

    let record = pipeline.convert(Path::new(BALANCES), Some("usd")).await.unwrap();
    assert_eq!(record.base_currency, "USD");
}

#[tokio::test]
async fn test_convert_document_errors() {
    let dir = TempDir::new().unwrap();
    let pipeline = pipeline(&dir);

    let cases = [
        ("/docs/missing.docx", ErrorKind::NotFound),
        ("/docs/report.pdf", ErrorKind::UnsupportedFormat),
        ("/docs/broken.docx", ErrorKind::CorruptDocument),
        ("/docs/notes.docx", ErrorKind::NoBalancesFound),
    ];
    for (path, kind) in cases {
        let err = pipeline.convert(Path::new(path), None).await.unwrap_err();
        assert_eq!(err.kind(), kind, "{}", path);
    }

    assert!(pipeline.list_conversions(true).unwrap().is_empty());
}

#[tokio::test]
async fn test_no_balances_payload() {
    let dir = TempDir::new().unwrap();
    let pipeline = pipeline(&dir);

    let payload = pipeline
        .convert(Path::new("/docs/notes.docx"), None)
        .await
        .unwrap_err()
        .to_payload();

    assert_eq!(payload.error_kind, ErrorKind::NoBalancesFound);
    assert_eq!(payload.message, "No valid balances found in /docs/notes.docx");
}

#[tokio::test]
async fn test_convert_falls_back_to_emergency_rates() {
    let dir = TempDir::new().unwrap();
    let pipeline = build(
        &dir,
        MockPriceSource::unavailable(),
        eth_wallets(),
        SimulatedTransferClient::default(),
    );

    let record = pipeline.convert(Path::new(BALANCES), None).await.unwrap();
    assert_eq!(record.rate_snapshot, RateConfig::default().emergency_rates);
}

#[tokio::test]
async fn test_scan_document_reports_tables() {
    let dir = TempDir::new().unwrap();
    let pipeline = pipeline(&dir);

    let report = pipeline.scan_document(Path::new(BALANCES)).unwrap();
    assert_eq!(report.summary.count, 2);
    assert_eq!(report.summary.max_value, Decimal::new(1_280_050, 2));

    let scanner = DocumentScanner::new(StaticDocumentSource::new(), ExtractorConfig::default()).unwrap();
    let table = Document::new().with_table(Table::from_rows([["Account", "Balance"], ["Main", "€1.234,56"]]));
    assert_eq!(scanner.scan_document(&table)[0].value, Decimal::new(123_456, 2));
}

#[tokio::test]
async fn test_single_amount() {
    let dir = TempDir::new().unwrap();
    let pipeline = pipeline(&dir);

    let result = pipeline
        .convert_single_amount(Decimal::from(100), "usd", "btc")
        .await
        .unwrap();

    assert_eq!(result.target_asset, Asset::Btc);
    assert_eq!(result.rate, Decimal::from(45_000));
    assert_eq!(result.original_currency, "USD");
    assert_eq!(result.rate_tier, RateTier::Fresh);
    assert_eq!(
        result.calculation,
        "100 USD / 45000 USD per BTC = 0.00222222 BTC"
    );
    assert!(pipeline.list_conversions(true).unwrap().is_empty());
}

#[tokio::test]
async fn test_single_amount_errors() {
    let dir = TempDir::new().unwrap();
    let pipeline = pipeline(&dir);

    let err = pipeline
        .convert_single_amount(Decimal::from(100), "EUR", "BTC")
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnsupportedConversion);

    let err = pipeline
        .convert_single_amount(Decimal::from(100), "USD", "DOGE")
        .await
        .unwrap_err();
    assert_eq!(err, ConvertError::RateNotAvailable("DOGE".to_string()));
}

#[tokio::test]
async fn test_single_amount_outside_configured_assets() {
    let dir = TempDir::new().unwrap();
    let scanner = DocumentScanner::new(documents(), ExtractorConfig::default()).unwrap();
    let mut config = RateConfig {
        snapshot_path: dir.path().join("fallback_rates.json"),
        assets: vec![Asset::Btc],
        ..RateConfig::default()
    };
    config.emergency_rates.retain(|asset, _| *asset == Asset::Btc);
    let rates = RateCache::new(MockPriceSource::new(prices()), config).unwrap();
    let ledger = ConversionLedger::open(dir.path().join("conversions.json")).unwrap();
    let ctx = ConverterContext::new(
        scanner,
        rates,
        ledger,
        eth_wallets(),
        SimulatedTransferClient::default(),
        PipelineConfig::default(),
    )
    .unwrap();
    let pipeline = ConversionPipeline::new(ctx);

    let err = pipeline
        .convert_single_amount(Decimal::from(100), "USD", "SOL")
        .await
        .unwrap_err();
    assert_eq!(err, ConvertError::RateNotAvailable("SOL".to_string()));
}

#[tokio::test]
async fn test_portfolio_summary() {
    let dir = TempDir::new().unwrap();
    let wallets = ConfiguredWallets::new(BTreeMap::new())
        .unwrap()
        .with_address(Asset::Eth, ETH_ADDRESS)
        .with_address(Asset::Sol, "not-a-solana-address");
    let pipeline = build(
        &dir,
        MockPriceSource::new(prices()),
        wallets,
        SimulatedTransferClient::default(),
    );

    let summary = pipeline.portfolio_summary(Path::new(BALANCES)).await.unwrap();

    assert_eq!(summary.wallet_summary.total_wallets, 4);
    assert_eq!(summary.wallet_summary.valid_wallets, 1);
    assert_eq!(summary.wallet_summary.invalid_wallets, 3);
    assert_eq!(summary.wallet_summary.missing_wallets, 2);
    assert_eq!(pipeline.list_conversions(true).unwrap().len(), 1);
}

#[tokio::test]
async fn test_replay_marks_sent_then_rejects() {
    let dir = TempDir::new().unwrap();
    let pipeline = pipeline(&dir);
    let record = pipeline.convert(Path::new(BALANCES), None).await.unwrap();

    let report = pipeline.send_saved_conversion(&record.id, None).await.unwrap();

    assert!(report.sent);
    assert_eq!(report.transactions.len(), 4);
    assert_eq!(report.successful(), 2);
    assert_eq!(report.failed(), 2);

    let btc = &report.transactions[0];
    assert_eq!(btc.asset, Asset::Btc);
    assert!(!btc.success);
    assert_eq!(btc.status, TransferStatus::Failed);
    assert_eq!(btc.error.as_deref(), Some("No wallet address configured for BTC"));

    let eth = &report.transactions[1];
    assert!(eth.success);
    assert_eq!(eth.status, TransferStatus::Simulated);
    assert!(eth.tx_hash.as_deref().unwrap().starts_with("sim_eth_"));
    assert_eq!(eth.amount, record.per_asset_amounts[&Asset::Eth]);

    let stored = pipeline.context().ledger.get(&record.id).unwrap().unwrap();
    assert!(stored.sent);
    assert!(stored.sent_at.is_some());

    let err = pipeline.send_saved_conversion(&record.id, None).await.unwrap_err();
    assert_eq!(err, ConvertError::AlreadySent(record.id.clone()));
    assert_eq!(pipeline.context().transfers.submissions().len(), 2);
}

#[tokio::test]
async fn test_replay_reports_transfers_when_ledger_write_fails() {
    let dir = TempDir::new().unwrap();
    let client = LedgerTamperingClient::new(&dir, Tamper::BlockWrites);
    let pipeline = build(&dir, MockPriceSource::new(prices()), eth_wallets(), client.clone());
    let record = pipeline.convert(Path::new(BALANCES), None).await.unwrap();

    let report = pipeline.send_saved_conversion(&record.id, None).await.unwrap();
    assert!(!report.sent);
    assert_eq!(report.successful(), 2);
    assert_eq!(report.transactions[1].tx_hash.as_deref(), Some("0xeth"));
    assert!(report.mark_error.as_deref().unwrap().starts_with("Storage error"));
    assert_eq!(client.call_count(), 2);

    fs::remove_dir(client.temp_path()).unwrap();
    let stored = pipeline.context().ledger.get(&record.id).unwrap().unwrap();
    assert!(!stored.sent);

    let err = pipeline.send_saved_conversion(&record.id, None).await.unwrap_err();
    assert_eq!(err, ConvertError::AlreadySent(record.id.clone()));
    assert_eq!(client.call_count(), 2);
}

#[tokio::test]
async fn test_replay_of_record_removed_mid_send() {
    let dir = TempDir::new().unwrap();
    let client = LedgerTamperingClient::new(&dir, Tamper::Clear);
    let pipeline = build(&dir, MockPriceSource::new(prices()), eth_wallets(), client.clone());
    let record = pipeline.convert(Path::new(BALANCES), None).await.unwrap();

    let report = pipeline.send_saved_conversion(&record.id, None).await.unwrap();
    assert!(!report.sent);
    assert_eq!(report.successful(), 2);
    assert!(report.mark_error.is_none());
    assert!(pipeline.context().ledger.get(&record.id).unwrap().is_none());
}

#[tokio::test]
async fn test_replay_unknown_id() {
    let dir = TempDir::new().unwrap();
    let pipeline = pipeline(&dir);

    let err = pipeline
        .send_saved_conversion("missing_20250101_120000", None)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[tokio::test]
async fn test_all_failures_leave_record_unsent() {
    let dir = TempDir::new().unwrap();
    let transfers = SelectiveTransferClient::default();
    let pipeline = build(
        &dir,
        MockPriceSource::new(prices()),
        ConfiguredWallets::new(BTreeMap::new()).unwrap(),
        transfers.clone(),
    );
    let record = pipeline.convert(Path::new(BALANCES), None).await.unwrap();

    let report = pipeline.send_saved_conversion(&record.id, None).await.unwrap();
    assert!(!report.sent);
    assert_eq!(report.successful(), 0);
    assert_eq!(transfers.call_count(), 0);

    // Still replayable
    let again = pipeline.send_saved_conversion(&record.id, None).await.unwrap();
    assert!(!again.sent);
    assert_eq!(pipeline.list_conversions(false).unwrap().len(), 1);
}

#[tokio::test]
async fn test_partial_client_failure() {
    let dir = TempDir::new().unwrap();
    let transfers = SelectiveTransferClient::rejecting([Asset::Usdt]);
    let pipeline = build(&dir, MockPriceSource::new(prices()), eth_wallets(), transfers.clone());
    let record = pipeline.convert(Path::new(BALANCES), None).await.unwrap();

    let report = pipeline.send_saved_conversion(&record.id, None).await.unwrap();

    assert!(report.sent);
    assert_eq!(transfers.call_count(), 2);

    let usdt = report
        .transactions
        .iter()
        .find(|t| t.asset == Asset::Usdt)
        .unwrap();
    assert!(!usdt.success);
    assert_eq!(usdt.destination.as_deref(), Some(ETH_ADDRESS));
    assert_eq!(usdt.error.as_deref(), Some("USDT node unreachable"));

    let eth = report.transactions.iter().find(|t| t.asset == Asset::Eth).unwrap();
    assert_eq!(eth.status, TransferStatus::Pending);
    assert_eq!(eth.tx_hash.as_deref(), Some("0xeth"));
}

#[tokio::test]
async fn test_wallet_override() {
    let dir = TempDir::new().unwrap();
    let transfers = SelectiveTransferClient::default();
    let pipeline = build(
        &dir,
        MockPriceSource::new(prices()),
        ConfiguredWallets::new(BTreeMap::new()).unwrap(),
        transfers.clone(),
    );
    let record = pipeline.convert(Path::new(BALANCES), None).await.unwrap();

    let report = pipeline
        .send_saved_conversion(&record.id, Some(ETH_ADDRESS))
        .await
        .unwrap();

    // ETH and USDT accept an Ethereum address; BTC and SOL do not
    assert_eq!(report.successful(), 2);
    assert_eq!(transfers.call_count(), 2);

    let sol = report.transactions.iter().find(|t| t.asset == Asset::Sol).unwrap();
    assert_eq!(sol.destination.as_deref(), Some(ETH_ADDRESS));
    assert!(sol.error.as_deref().unwrap().starts_with("Invalid SOL address"));
}

#[tokio::test]
async fn test_unsupported_asset_reported_per_transfer() {
    let dir = TempDir::new().unwrap();
    let pipeline = build(
        &dir,
        MockPriceSource::new(prices()),
        eth_wallets(),
        SimulatedTransferClient::new([Asset::Eth]),
    );
    let record = pipeline.convert(Path::new(BALANCES), None).await.unwrap();

    let report = pipeline.send_saved_conversion(&record.id, None).await.unwrap();
    let usdt = report.transactions.iter().find(|t| t.asset == Asset::Usdt).unwrap();

    assert_eq!(
        usdt.error.as_deref(),
        Some("Currency USDT not supported for blockchain transactions")
    );
    assert!(report.sent);
}

#[tokio::test]
async fn test_concurrent_replays_send_once() {
    let dir = TempDir::new().unwrap();
    let pipeline = Arc::new(pipeline(&dir));
    let record = pipeline.convert(Path::new(BALANCES), None).await.unwrap();

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let pipeline = Arc::clone(&pipeline);
            let id = record.id.clone();
            tokio::spawn(async move { pipeline.send_saved_conversion(&id, None).await })
        })
        .collect();

    let mut sent = 0;
    let mut rejected = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(report) => {
                assert!(report.sent);
                sent += 1;
            }
            Err(ConvertError::AlreadySent(_)) => rejected += 1,
            Err(other) => panic!("unexpected error: {}", other),
        }
    }

    assert_eq!(sent, 1);
    assert_eq!(rejected, 3);
    assert_eq!(pipeline.context().transfers.submissions().len(), 2);
}

#[tokio::test]
async fn test_send_conversion_from_file() {
    let dir = TempDir::new().unwrap();
    let pipeline = pipeline(&dir);

    let report = pipeline.send_conversion(Path::new(BALANCES), None).await.unwrap();
    assert!(report.sent);
    assert_eq!(report.source_file, BALANCES);

    assert!(pipeline.list_conversions(false).unwrap().is_empty());
    let all = pipeline.list_conversions(true).unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].id, report.conversion_id);
}

#[tokio::test]
async fn test_rates_refresh() {
    let dir = TempDir::new().unwrap();
    let source = MockPriceSource::new(prices());
    let pipeline = build(&dir, source.clone(), eth_wallets(), SimulatedTransferClient::default());

    assert_eq!(pipeline.rates(false).await.unwrap().tier, RateTier::Fresh);
    assert_eq!(pipeline.rates(false).await.unwrap().tier, RateTier::Cached);
    assert_eq!(pipeline.rates(true).await.unwrap().tier, RateTier::Fresh);
    assert_eq!(source.call_count(), 2);
}

#[tokio::test]
async fn test_delete_conversion() {
    let dir = TempDir::new().unwrap();
    let pipeline = pipeline(&dir);
    let record = pipeline.convert(Path::new(BALANCES), None).await.unwrap();

    assert!(pipeline.delete_conversion(&record.id).unwrap());
    assert!(!pipeline.delete_conversion(&record.id).unwrap());
    assert!(pipeline.list_conversions(true).unwrap().is_empty());
}
