//! On-disk farm state: the farm snapshot and the bank in a single file.
//!
//! The file is written to a temporary sibling and renamed into place, so a
//! failed or interrupted save leaves the previous state intact and the farm
//! and bank on disk always belong to the same commit.

use std::fs;
use std::path::{Path, PathBuf};

use farm_bank::MemoryBank;
use farm_staking::{FarmSnapshot, StakingFarm};
use serde::{Deserialize, Serialize};

use crate::ServiceError;

const STATE_FILE: &str = "farm.state";

#[derive(Deserialize)]
struct StoredState {
    farm: FarmSnapshot,
    bank: MemoryBank,
}

/// Borrowed twin of [`StoredState`]; encodes to the same bytes.
#[derive(Serialize)]
struct StoredStateRef<'a> {
    farm: &'a FarmSnapshot,
    bank: &'a MemoryBank,
}

/// The state file inside a data directory.
#[derive(Clone, Debug)]
pub struct StateFiles {
    dir: PathBuf,
}

impl StateFiles {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn exists(&self) -> bool {
        self.state_path().is_file()
    }

    /// Load the farm and bank. Fails if the file is missing or corrupt.
    pub fn load(&self) -> Result<(StakingFarm, MemoryBank), ServiceError> {
        let bytes = fs::read(self.state_path())?;
        let stored: StoredState = bincode::deserialize(&bytes)
            .map_err(|e| ServiceError::State(format!("state file: {e}")))?;
        tracing::debug!(
            participants = stored.farm.participant_count(),
            epoch = stored.farm.epoch,
            hash = %stored.farm.hash_hex(),
            "farm state loaded"
        );
        let farm = StakingFarm::restore(stored.farm)?;
        Ok((farm, stored.bank))
    }

    /// Write farm and bank together, creating the directory if needed.
    pub fn save(&self, snapshot: &FarmSnapshot, bank: &MemoryBank) -> Result<(), ServiceError> {
        fs::create_dir_all(&self.dir)?;
        let stored = StoredStateRef {
            farm: snapshot,
            bank,
        };
        let bytes = bincode::serialize(&stored)
            .map_err(|e| ServiceError::State(format!("state file: {e}")))?;
        write_atomic(&self.state_path(), &bytes)
    }

    fn state_path(&self) -> PathBuf {
        self.dir.join(STATE_FILE)
    }
}

fn write_atomic(path: &Path, bytes: &[u8]) -> Result<(), ServiceError> {
    let tmp = path.with_extension("tmp");
    fs::write(&tmp, bytes)?;
    fs::rename(&tmp, path)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use farm_bank::{AssetBank, AssetKey};
    use farm_types::{AccountId, AssetId, FarmParams};

    fn dai() -> AssetKey {
        AssetKey::plain(AssetId::new("mdai"))
    }

    #[test]
    fn save_then_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let files = StateFiles::new(dir.path().join("state"));
        assert!(!files.exists());

        let params = FarmParams::dev_defaults();
        let mut farm = StakingFarm::new(params.clone()).unwrap();
        farm.approve(&params.administrator, AssetId::new("mdai")).unwrap();
        let mut bank = MemoryBank::new();
        bank.mint(&dai(), &AccountId::new("alice"), 5).unwrap();

        files.save(&farm.snapshot(), &bank).unwrap();
        assert!(files.exists());

        let (loaded_farm, loaded_bank) = files.load().unwrap();
        assert!(loaded_farm.is_approved(&AssetId::new("mdai")));
        assert_eq!(loaded_bank.balance_of(&dai(), &AccountId::new("alice")), 5);
    }

    #[test]
    fn corrupt_state_file_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let files = StateFiles::new(dir.path());
        let farm = StakingFarm::new(FarmParams::dev_defaults()).unwrap();
        files.save(&farm.snapshot(), &MemoryBank::new()).unwrap();

        std::fs::write(dir.path().join(STATE_FILE), b"not a farm").unwrap();
        assert!(files.load().is_err());
    }

    #[test]
    fn failed_save_keeps_previous_farm_and_bank_together() {
        let dir = tempfile::tempdir().unwrap();
        let files = StateFiles::new(dir.path());
        let params = FarmParams::dev_defaults();
        let investor = AccountId::new("investor");

        let mut farm = StakingFarm::new(params.clone()).unwrap();
        farm.approve(&params.administrator, AssetId::new("mdai")).unwrap();
        let mut bank = MemoryBank::new();
        bank.mint(&dai(), &investor, 10).unwrap();
        bank.approve(&investor, &params.custody_account, &dai(), 10);
        files.save(&farm.snapshot(), &bank).unwrap();

        farm.deposit(&mut bank, &investor, &AssetId::new("mdai"), 10)
            .unwrap();
        // A directory squatting on the temporary path makes the write fail.
        std::fs::create_dir(dir.path().join("farm.tmp")).unwrap();
        assert!(files.save(&farm.snapshot(), &bank).is_err());

        let (loaded_farm, loaded_bank) = files.load().unwrap();
        assert_eq!(loaded_farm.staked_balance(&AssetId::new("mdai"), &investor), 0);
        assert_eq!(loaded_bank.balance_of(&dai(), &investor), 10);
        assert_eq!(loaded_bank.balance_of(&dai(), &params.custody_account), 0);
    }
}
