//! Per-repository running totals of generation cost.
//!
//! Stored as a flat JSON object at `<data dir>/kommit/cost.json`:
//!
//! ```json
//! {
//!   "~/code/kommit": 0.00231
//! }
//! ```
//!
//! Updates are read-modify-write without locking. Two sessions recording at
//! the same moment race, and the last writer wins.

use std::collections::BTreeMap;
use std::env;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::{debug, warn};

use crate::error::LedgerError;
use crate::llm::Cost;

/// Environment variable overriding the platform data directory.
pub const DATA_HOME_VAR: &str = "XDG_DATA_HOME";

const LEDGER_DIR: &str = "kommit";
const LEDGER_FILE: &str = "cost.json";

/// Accumulated cost keyed by repository identity.
pub type Costs = BTreeMap<String, Cost>;

#[derive(Debug, Clone)]
pub struct CostLedger {
    path: PathBuf,
}

impl CostLedger {
    /// Ledger at an explicit file path.
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Ledger under `$XDG_DATA_HOME`, falling back to the platform data
    /// directory.
    pub fn from_env() -> Result<Self, LedgerError> {
        let base = env::var_os(DATA_HOME_VAR)
            .filter(|v| !v.is_empty())
            .map(PathBuf::from)
            .or_else(dirs::data_dir)
            .ok_or(LedgerError::NoDataDir)?;
        Ok(Self::at(base.join(LEDGER_DIR).join(LEDGER_FILE)))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Add `cost` to the total for `identity`.
    ///
    /// A missing ledger or one with unparsable content counts as empty. A
    /// ledger that cannot be read is left untouched and the error returned.
    pub fn record(&self, identity: &str, cost: Cost) -> Result<(), LedgerError> {
        let mut costs = match self.read_all() {
            Ok(costs) => costs,
            Err(LedgerError::NotFound(_)) => Costs::new(),
            Err(e @ LedgerError::Corrupt { .. }) => {
                warn!("Starting a fresh cost ledger: {e}");
                Costs::new()
            }
            Err(e) => return Err(e),
        };

        *costs.entry(identity.to_string()).or_insert(0.0) += cost.max(0.0);
        self.write_all(&costs)?;

        debug!("Recorded ${cost:.5} for {identity} in {}", self.path.display());
        Ok(())
    }

    /// Read every total. Fails with `NotFound` when nothing was ever recorded.
    pub fn read_all(&self) -> Result<Costs, LedgerError> {
        let bytes = match std::fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(LedgerError::NotFound(self.path.clone()));
            }
            Err(source) => {
                return Err(LedgerError::ReadFailed {
                    path: self.path.clone(),
                    source,
                });
            }
        };

        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Costs::new());
        }

        serde_json::from_slice(&bytes).map_err(|source| LedgerError::Corrupt {
            path: self.path.clone(),
            source,
        })
    }

    /// Replace the ledger atomically through a sibling temp file.
    fn write_all(&self, costs: &Costs) -> Result<(), LedgerError> {
        let persist_err = |source: io::Error| LedgerError::PersistFailed {
            path: self.path.clone(),
            source,
        };

        let dir = self
            .path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        std::fs::create_dir_all(dir).map_err(persist_err)?;

        let json =
            serde_json::to_string_pretty(costs).map_err(|e| persist_err(io::Error::other(e)))?;

        let mut tmp = NamedTempFile::new_in(dir).map_err(persist_err)?;
        tmp.write_all(json.as_bytes()).map_err(persist_err)?;
        tmp.persist(&self.path).map_err(|e| persist_err(e.error))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ledger_in(dir: &tempfile::TempDir) -> CostLedger {
        CostLedger::at(dir.path().join("kommit").join("cost.json"))
    }

    #[test]
    fn test_read_all_never_created() {
        let dir = tempfile::tempdir().unwrap();
        let ledger = ledger_in(&dir);
        assert!(matches!(ledger.read_all(), Err(LedgerError::NotFound(_))));
    }

    #[test]
    fn test_record_creates_directories() {
        let dir = tempfile::tempdir().unwrap();
        let ledger = ledger_in(&dir);

        ledger.record("~/code/kommit", 0.25).unwrap();

        assert!(ledger.path().exists());
        assert_eq!(ledger.read_all().unwrap()["~/code/kommit"], 0.25);
    }

    #[test]
    fn test_record_is_additive_per_identity() {
        let dir = tempfile::tempdir().unwrap();
        let ledger = ledger_in(&dir);

        ledger.record("~/a", 0.5).unwrap();
        ledger.record("~/b", 2.0).unwrap();
        ledger.record("~/a", 0.25).unwrap();

        let costs = ledger.read_all().unwrap();
        assert_eq!(costs["~/a"], 0.75);
        assert_eq!(costs["~/b"], 2.0);
    }

    #[test]
    fn test_record_resets_corrupt_ledger() {
        let dir = tempfile::tempdir().unwrap();
        let ledger = ledger_in(&dir);
        std::fs::create_dir_all(ledger.path().parent().unwrap()).unwrap();
        std::fs::write(ledger.path(), "{ this is not json").unwrap();

        assert!(matches!(ledger.read_all(), Err(LedgerError::Corrupt { .. })));

        ledger.record("~/a", 1.0).unwrap();
        let costs = ledger.read_all().unwrap();
        assert_eq!(costs.len(), 1);
        assert_eq!(costs["~/a"], 1.0);
    }

    #[test]
    fn test_record_resets_non_utf8_ledger() {
        let dir = tempfile::tempdir().unwrap();
        let ledger = ledger_in(&dir);
        std::fs::create_dir_all(ledger.path().parent().unwrap()).unwrap();
        std::fs::write(ledger.path(), b"{\"~/b\": \xff}").unwrap();

        assert!(matches!(ledger.read_all(), Err(LedgerError::Corrupt { .. })));
        ledger.record("~/a", 1.0).unwrap();
        assert_eq!(ledger.read_all().unwrap().len(), 1);
    }

    #[test]
    fn test_record_leaves_unreadable_ledger_alone() {
        let dir = tempfile::tempdir().unwrap();
        let ledger = ledger_in(&dir);
        // Reading a directory fails with an I/O error, not a parse error.
        std::fs::create_dir_all(ledger.path().join("totals")).unwrap();

        let result = ledger.record("~/a", 1.0);

        assert!(matches!(result, Err(LedgerError::ReadFailed { .. })));
        assert!(ledger.path().join("totals").is_dir());
    }

    #[test]
    fn test_ledger_is_pretty_json() {
        let dir = tempfile::tempdir().unwrap();
        let ledger = ledger_in(&dir);
        ledger.record("/srv/repo", 0.5).unwrap();

        let text = std::fs::read_to_string(ledger.path()).unwrap();
        assert_eq!(text, "{\n  \"/srv/repo\": 0.5\n}");
    }

    #[test]
    fn test_empty_file_reads_as_empty_ledger() {
        let dir = tempfile::tempdir().unwrap();
        let ledger = ledger_in(&dir);
        std::fs::create_dir_all(ledger.path().parent().unwrap()).unwrap();
        std::fs::write(ledger.path(), "").unwrap();

        assert!(ledger.read_all().unwrap().is_empty());
    }

    #[test]
    fn test_from_env_uses_data_home() {
        let dir = tempfile::tempdir().unwrap();
        temp_env::with_var(DATA_HOME_VAR, Some(dir.path()), || {
            let ledger = CostLedger::from_env().unwrap();
            assert_eq!(ledger.path(), dir.path().join("kommit").join("cost.json"));
        });
    }
}
