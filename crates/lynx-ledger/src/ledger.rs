//! JSON-file conversion ledger

use crate::id::conversion_id;
use crate::{LedgerConfig, LedgerError};
use chrono::Utc;
use lynx_domain::{Asset, ConversionRecord, ConversionSummary, WalletEntry};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};
use tracing::{debug, info};

/// A conversion ready to be stored
///
/// The ledger assigns the ID and creation time and starts the record unsent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversionDraft {
    /// Document the balances were read from
    pub source_file: String,

    /// Currency of the document balances
    pub base_currency: String,

    /// Sum of every extracted balance
    pub total_base_amount: Decimal,

    /// Purchasable amount per asset
    pub per_asset_amounts: BTreeMap<Asset, Decimal>,

    /// Destination wallet per asset
    pub wallet_info: BTreeMap<Asset, WalletEntry>,

    /// Prices used for the conversion
    pub rate_snapshot: BTreeMap<Asset, Decimal>,
}

/// Durable store of conversion records
///
/// Every operation reads the whole file, and mutations rewrite it through a
/// temp file and rename, all under one lock. The lock only covers this
/// process; concurrent processes sharing a file are not supported.
///
/// # Examples
///
/// ```no_run
/// use lynx_ledger::{ConversionLedger, LedgerConfig};
///
/// let ledger = ConversionLedger::new(&LedgerConfig::default()).unwrap();
/// for summary in ledger.list(false).unwrap() {
///     println!("{} pending", summary.id);
/// }
/// ```
#[derive(Debug)]
pub struct ConversionLedger {
    path: PathBuf,
    lock: Mutex<()>,
}

impl ConversionLedger {
    /// Open the ledger described by `config`
    pub fn new(config: &LedgerConfig) -> Result<Self, LedgerError> {
        config.validate().map_err(LedgerError::Config)?;
        Self::open(&config.path)
    }

    /// Open a ledger file, creating its directory if needed
    ///
    /// The file itself is created on the first save.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, LedgerError> {
        let path = path.into();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        Ok(Self {
            path,
            lock: Mutex::new(()),
        })
    }

    /// Location of the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Store a new conversion and return the complete record
    pub fn save(&self, draft: ConversionDraft) -> Result<ConversionRecord, LedgerError> {
        let _guard = self.lock();
        let mut records = self.load()?;

        let created_at = Utc::now();
        let id = conversion_id(&draft.source_file, created_at, |candidate| {
            records.iter().any(|r| r.id == candidate)
        });

        let record = ConversionRecord {
            id,
            created_at,
            source_file: draft.source_file,
            base_currency: draft.base_currency,
            total_base_amount: draft.total_base_amount,
            per_asset_amounts: draft.per_asset_amounts,
            wallet_info: draft.wallet_info,
            rate_snapshot: draft.rate_snapshot,
            sent: false,
            sent_at: None,
        };

        records.push(record.clone());
        self.store(&records)?;

        info!(
            id = %record.id,
            total = %record.total_base_amount,
            currency = %record.base_currency,
            "Saved conversion"
        );
        Ok(record)
    }

    /// Look up a record by ID
    pub fn get(&self, id: &str) -> Result<Option<ConversionRecord>, LedgerError> {
        let _guard = self.lock();
        Ok(self.load()?.into_iter().find(|r| r.id == id))
    }

    /// Summaries of stored records, newest first
    ///
    /// With `include_sent = false` only pending records are listed.
    pub fn list(&self, include_sent: bool) -> Result<Vec<ConversionSummary>, LedgerError> {
        let _guard = self.lock();
        let mut summaries: Vec<ConversionSummary> = self
            .load()?
            .iter()
            .filter(|r| include_sent || !r.sent)
            .map(ConversionSummary::from)
            .collect();

        summaries.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(summaries)
    }

    /// Mark a record as sent
    ///
    /// Returns `false` if no record has `id`. Marking an already sent record
    /// returns `true` and leaves its `sent_at` unchanged.
    pub fn mark_sent(&self, id: &str) -> Result<bool, LedgerError> {
        let _guard = self.lock();
        let mut records = self.load()?;

        let Some(record) = records.iter_mut().find(|r| r.id == id) else {
            return Ok(false);
        };

        if record.sent {
            debug!(id, "Conversion already marked sent");
            return Ok(true);
        }

        record.sent = true;
        record.sent_at = Some(Utc::now());
        self.store(&records)?;

        info!(id, "Marked conversion as sent");
        Ok(true)
    }

    /// Remove a record
    ///
    /// Returns `false` if no record has `id`.
    pub fn delete(&self, id: &str) -> Result<bool, LedgerError> {
        let _guard = self.lock();
        let mut records = self.load()?;

        let before = records.len();
        records.retain(|r| r.id != id);
        if records.len() == before {
            return Ok(false);
        }

        self.store(&records)?;
        info!(id, "Deleted conversion");
        Ok(true)
    }

    fn lock(&self) -> MutexGuard<'_, ()> {
        self.lock.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn load(&self) -> Result<Vec<ConversionRecord>, LedgerError> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        if contents.trim().is_empty() {
            return Ok(Vec::new());
        }

        serde_json::from_str(&contents)
            .map_err(|e| LedgerError::Corrupt(format!("{}: {}", self.path.display(), e)))
    }

    fn store(&self, records: &[ConversionRecord]) -> Result<(), LedgerError> {
        let json = serde_json::to_string_pretty(records)
            .map_err(|e| LedgerError::Serialization(e.to_string()))?;

        let mut tmp_name = self.path.file_name().unwrap_or_default().to_os_string();
        tmp_name.push(".tmp");
        let tmp = self.path.with_file_name(tmp_name);

        let mut file = File::create(&tmp)?;
        file.write_all(json.as_bytes())?;
        file.sync_all()?;
        fs::rename(&tmp, &self.path)?;
        debug!(path = %self.path.display(), records = records.len(), "Ledger written");
        Ok(())
    }
}
