//! Durable fallback snapshot of the last good rate table

use crate::RateError;
use chrono::{DateTime, Utc};
use lynx_domain::{Asset, IncompleteRates, RateTable};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

static TEMP_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Rates as last fetched, with the time they were saved
///
/// Stored as `{"timestamp": "<RFC 3339>", "rates": {"BTC": "45000.00", ...}}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateSnapshot {
    /// When the snapshot was taken
    pub timestamp: DateTime<Utc>,

    /// Prices per asset
    pub rates: BTreeMap<Asset, Decimal>,
}

impl RateSnapshot {
    /// Snapshot a table as of now
    pub fn new(table: &RateTable) -> Self {
        Self {
            timestamp: Utc::now(),
            rates: table.as_map().clone(),
        }
    }

    /// Read a snapshot from disk
    ///
    /// Returns `Ok(None)` when no file exists.
    pub fn load(path: &Path) -> Result<Option<Self>, RateError> {
        let contents = match fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(RateError::Snapshot(format!(
                    "cannot read {}: {}",
                    path.display(),
                    e
                )))
            }
        };

        serde_json::from_str(&contents)
            .map(Some)
            .map_err(|e| RateError::Snapshot(format!("invalid snapshot {}: {}", path.display(), e)))
    }

    /// Write the snapshot, replacing any previous one atomically
    pub fn save(&self, path: &Path) -> Result<(), RateError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .map_err(|e| RateError::Snapshot(format!("cannot create {}: {}", parent.display(), e)))?;
        }

        let json = serde_json::to_string_pretty(self)
            .map_err(|e| RateError::Snapshot(e.to_string()))?;

        let tmp = temp_path(path);
        write_synced(&tmp, json.as_bytes())
            .map_err(|e| RateError::Snapshot(format!("cannot write {}: {}", tmp.display(), e)))?;
        fs::rename(&tmp, path).map_err(|e| {
            let _ = fs::remove_file(&tmp);
            RateError::Snapshot(format!("cannot replace {}: {}", path.display(), e))
        })
    }

    /// Convert to a table covering `required`
    pub fn into_table(self, required: &[Asset]) -> Result<RateTable, IncompleteRates> {
        RateTable::complete(self.rates, required)
    }
}

fn write_synced(path: &Path, contents: &[u8]) -> std::io::Result<()> {
    let mut file = File::create(path)?;
    file.write_all(contents)?;
    file.sync_all()
}

/// Per-write temp file next to `path`, so concurrent saves never share one
fn temp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(format!(
        ".{}.{}.tmp",
        std::process::id(),
        TEMP_COUNTER.fetch_add(1, Ordering::Relaxed)
    ));
    path.with_file_name(name)
}
