//! Farm snapshots capture the complete ledger state at a point in time.
//!
//! A snapshot is what a host process persists between runs. The hash is a
//! Blake2b-256 digest over a canonical encoding of every field, so a
//! truncated or edited snapshot is rejected on restore.

use serde::{Deserialize, Serialize};

use crate::error::StakingError;
use farm_types::{AccountId, AssetId, FarmParams};

/// Current snapshot format version.
pub const SNAPSHOT_VERSION: u32 = 1;

/// A complete, self-verifying capture of a farm.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FarmSnapshot {
    /// Blake2b-256 over the canonical encoding of the remaining fields.
    pub hash: [u8; 32],
    pub version: u32,
    pub params: FarmParams,
    /// Number of completed distributions.
    pub epoch: u64,
    /// Approved assets in ascending order.
    pub approved: Vec<AssetId>,
    /// Every participant row, active or not, in ascending order.
    pub positions: Vec<PositionSnapshot>,
}

/// One participant row captured in a snapshot.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PositionSnapshot {
    pub participant: AccountId,
    /// Non-zero balances in ascending asset order.
    pub stakes: Vec<(AssetId, u128)>,
    pub pending_reward: u128,
}

impl FarmSnapshot {
    pub fn create(
        params: FarmParams,
        epoch: u64,
        approved: Vec<AssetId>,
        positions: Vec<PositionSnapshot>,
    ) -> Self {
        let mut snap = Self {
            hash: [0u8; 32],
            version: SNAPSHOT_VERSION,
            params,
            epoch,
            approved,
            positions,
        };
        snap.hash = snap.compute_hash();
        snap
    }

    fn compute_hash(&self) -> [u8; 32] {
        use blake2::digest::consts::U32;
        use blake2::{Blake2b, Digest};

        fn put_str(hasher: &mut Blake2b<U32>, s: &str) {
            hasher.update((s.len() as u64).to_le_bytes());
            hasher.update(s.as_bytes());
        }

        let mut hasher = Blake2b::<U32>::new();
        hasher.update(self.version.to_le_bytes());
        put_str(&mut hasher, self.params.administrator.as_str());
        put_str(&mut hasher, self.params.custody_account.as_str());
        put_str(&mut hasher, self.params.reward_asset.as_str());
        hasher.update(self.epoch.to_le_bytes());

        hasher.update((self.approved.len() as u64).to_le_bytes());
        for asset in &self.approved {
            put_str(&mut hasher, asset.as_str());
        }

        hasher.update((self.positions.len() as u64).to_le_bytes());
        for position in &self.positions {
            put_str(&mut hasher, position.participant.as_str());
            hasher.update((position.stakes.len() as u64).to_le_bytes());
            for (asset, amount) in &position.stakes {
                put_str(&mut hasher, asset.as_str());
                hasher.update(amount.to_le_bytes());
            }
            hasher.update(position.pending_reward.to_le_bytes());
        }

        let result = hasher.finalize();
        let mut out = [0u8; 32];
        out.copy_from_slice(&result);
        out
    }

    /// Verify the stored hash matches the content.
    pub fn verify(&self) -> bool {
        self.hash == self.compute_hash()
    }

    pub fn hash_hex(&self) -> String {
        hex::encode(self.hash)
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, StakingError> {
        bincode::serialize(self).map_err(|e| StakingError::Snapshot(e.to_string()))
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, StakingError> {
        bincode::deserialize(bytes).map_err(|e| StakingError::Snapshot(e.to_string()))
    }

    pub fn participant_count(&self) -> usize {
        self.positions.len()
    }
}
