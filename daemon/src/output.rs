//! What each command prints, as a human line or a JSON object.

use std::fmt;
use std::path::PathBuf;

use farm_bank::{AssetBank, AssetKey};
use farm_staking::StakingFarm;
use farm_types::{AccountId, AssetId};
use serde::Serialize;

#[derive(Debug, Serialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum Outcome {
    Init {
        data_dir: PathBuf,
        genesis_entries: usize,
    },
    Approve {
        asset: AssetId,
        newly_approved: bool,
    },
    Allow {
        owner: AccountId,
        spender: AccountId,
        asset: String,
        amount: u128,
    },
    Deposit {
        participant: AccountId,
        asset: AssetId,
        amount: u128,
        balance: u128,
    },
    Withdraw {
        participant: AccountId,
        asset: AssetId,
        amount: u128,
    },
    Distribute {
        epoch: u64,
        participants: usize,
        total_accrued: u128,
    },
    Claim {
        participant: AccountId,
        amount: u128,
    },
    Status(StatusReport),
}

#[derive(Debug, Serialize)]
pub struct StatusReport {
    pub administrator: AccountId,
    pub custody_account: AccountId,
    pub reward_token: String,
    pub epoch: u64,
    pub approved_assets: Vec<AssetId>,
    pub reward_inventory: u128,
    pub participants: Vec<ParticipantStatus>,
}

#[derive(Debug, Serialize)]
pub struct ParticipantStatus {
    pub participant: AccountId,
    pub active: bool,
    pub pending_reward: u128,
    pub stakes: Vec<(AssetId, u128)>,
}

impl StatusReport {
    /// Describe the farm, or only `only` if given.
    pub fn collect(farm: &StakingFarm, bank: &dyn AssetBank, only: Option<&AccountId>) -> Self {
        let row = |participant: &AccountId| ParticipantStatus {
            participant: participant.clone(),
            active: farm.is_active(participant),
            pending_reward: farm.pending_reward(participant),
            stakes: farm
                .ledger()
                .position(participant)
                .map(|position| {
                    position
                        .stakes()
                        .map(|(asset, amount)| (asset.clone(), amount))
                        .collect()
                })
                .unwrap_or_default(),
        };
        let participants = match only {
            Some(participant) => vec![row(participant)],
            None => farm
                .ledger()
                .positions()
                .map(|(participant, _)| row(participant))
                .collect(),
        };
        let params = farm.params();
        Self {
            administrator: params.administrator.clone(),
            custody_account: params.custody_account.clone(),
            reward_token: farm.reward_token().to_string(),
            epoch: farm.epoch(),
            approved_assets: farm.approved_assets(),
            reward_inventory: bank.balance_of(
                &AssetKey::from(farm.reward_token().clone()),
                &params.custody_account,
            ),
            participants,
        }
    }
}

impl Outcome {
    /// Render for stdout.
    pub fn render(&self, json: bool) -> Result<String, serde_json::Error> {
        if json {
            serde_json::to_string(self)
        } else {
            Ok(self.to_string())
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Init {
                data_dir,
                genesis_entries,
            } => write!(
                f,
                "initialised {} with {genesis_entries} genesis balance(s)",
                data_dir.display()
            ),
            Self::Approve {
                asset,
                newly_approved,
            } => {
                if *newly_approved {
                    write!(f, "approved {asset}")
                } else {
                    write!(f, "{asset} was already approved")
                }
            }
            Self::Allow {
                owner,
                spender,
                asset,
                amount,
            } => write!(f, "{owner} allows {spender} to move {amount} {asset}"),
            Self::Deposit {
                participant,
                asset,
                amount,
                balance,
            } => write!(
                f,
                "{participant} staked {amount} {asset} (balance {balance})"
            ),
            Self::Withdraw {
                participant,
                asset,
                amount,
            } => write!(f, "{participant} withdrew {amount} {asset}"),
            Self::Distribute {
                epoch,
                participants,
                total_accrued,
            } => write!(
                f,
                "epoch {epoch}: accrued {total_accrued} across {participants} participant(s)"
            ),
            Self::Claim {
                participant,
                amount,
            } => write!(f, "{participant} claimed {amount}"),
            Self::Status(report) => fmt::Display::fmt(report, f),
        }
    }
}

impl fmt::Display for StatusReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "administrator:    {}", self.administrator)?;
        writeln!(f, "custody account:  {}", self.custody_account)?;
        writeln!(
            f,
            "reward token:     {} ({} in custody)",
            self.reward_token, self.reward_inventory
        )?;
        writeln!(f, "epoch:            {}", self.epoch)?;
        let approved: Vec<&str> = self.approved_assets.iter().map(AssetId::as_str).collect();
        write!(f, "approved assets:  {}", approved.join(", "))?;
        for row in &self.participants {
            let stakes: Vec<String> = row
                .stakes
                .iter()
                .map(|(asset, amount)| format!("{amount} {asset}"))
                .collect();
            write!(
                f,
                "\n  {} [{}] pending {} staked {}",
                row.participant,
                if row.active { "active" } else { "inactive" },
                row.pending_reward,
                if stakes.is_empty() {
                    "-".to_string()
                } else {
                    stakes.join(", ")
                }
            )?;
        }
        Ok(())
    }
}
