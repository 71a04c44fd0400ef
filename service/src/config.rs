//! Farm configuration with TOML file support.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use farm_bank::AssetKey;
use farm_types::{AccountId, AssetId, CategoryId, FarmParams};

use crate::ServiceError;

/// Configuration for a farm host.
///
/// Can be loaded from a TOML file via [`FarmConfig::from_toml_file`] or built
/// programmatically (e.g. for tests).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FarmConfig {
    /// The only account allowed to approve assets and distribute rewards.
    #[serde(default = "default_administrator")]
    pub administrator: AccountId,

    /// The farm's own account holding staked assets and reward inventory.
    #[serde(default = "default_custody_account")]
    pub custody_account: AccountId,

    /// Asset rewards are paid in (always its platinum category).
    #[serde(default = "default_reward_asset")]
    pub reward_asset: AssetId,

    /// Directory holding the persisted farm and bank state.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Log format: "human" or "json".
    #[serde(default = "default_log_format")]
    pub log_format: String,

    /// Log level filter: "trace", "debug", "info", "warn", "error".
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Balances created when the data directory is initialised.
    #[serde(default)]
    pub genesis: Vec<GenesisBalance>,
}

/// One balance seeded into the bank at `init`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenesisBalance {
    pub account: AccountId,
    pub asset: AssetId,
    /// Category for multi-category assets; omit for plain assets.
    #[serde(default)]
    pub category: Option<u32>,
    /// TOML integers are 64-bit, so genesis amounts are too.
    pub amount: u64,
}

impl GenesisBalance {
    pub fn asset_key(&self) -> AssetKey {
        match self.category {
            Some(raw) => AssetKey::categorized(self.asset.clone(), CategoryId::new(raw)),
            None => AssetKey::plain(self.asset.clone()),
        }
    }
}

// ── Serde default helpers ──────────────────────────────────────────────

fn default_administrator() -> AccountId {
    FarmParams::dev_defaults().administrator
}

fn default_custody_account() -> AccountId {
    FarmParams::dev_defaults().custody_account
}

fn default_reward_asset() -> AssetId {
    FarmParams::dev_defaults().reward_asset
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("./farm_data")
}

fn default_log_format() -> String {
    "human".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

// ── Impl ───────────────────────────────────────────────────────────────

impl FarmConfig {
    /// Load configuration from a TOML file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ServiceError> {
        let content =
            std::fs::read_to_string(path).map_err(|e| ServiceError::Config(e.to_string()))?;
        Self::from_toml_str(&content)
    }

    /// Parse and validate configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, ServiceError> {
        let config: Self = toml::from_str(s).map_err(|e| ServiceError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize the configuration to a TOML string.
    pub fn to_toml_string(&self) -> Result<String, ServiceError> {
        toml::to_string_pretty(self).map_err(|e| ServiceError::Config(e.to_string()))
    }

    /// Reject identifiers that could not have come from the CLI.
    pub fn validate(&self) -> Result<(), ServiceError> {
        for account in std::iter::once(&self.administrator)
            .chain(std::iter::once(&self.custody_account))
            .chain(self.genesis.iter().map(|g| &g.account))
        {
            AccountId::parse(account.as_str())?;
        }
        for asset in std::iter::once(&self.reward_asset).chain(self.genesis.iter().map(|g| &g.asset)) {
            AssetId::parse(asset.as_str())?;
        }
        if self.administrator == self.custody_account {
            return Err(ServiceError::Config(
                "administrator and custody account must differ".into(),
            ));
        }
        Ok(())
    }

    /// The immutable farm parameters this config describes.
    pub fn params(&self) -> FarmParams {
        FarmParams::new(
            self.administrator.clone(),
            self.custody_account.clone(),
            self.reward_asset.clone(),
        )
    }
}

impl Default for FarmConfig {
    fn default() -> Self {
        Self {
            administrator: default_administrator(),
            custody_account: default_custody_account(),
            reward_asset: default_reward_asset(),
            data_dir: default_data_dir(),
            log_format: default_log_format(),
            log_level: default_log_level(),
            genesis: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_toml_gives_defaults() {
        let config = FarmConfig::from_toml_str("").unwrap();
        assert_eq!(config, FarmConfig::default());
        assert_eq!(config.params(), FarmParams::dev_defaults());
    }

    #[test]
    fn parses_full_config() {
        let toml = r#"
            administrator = "admin"
            custody_account = "vault"
            reward_asset = "eq"
            data_dir = "/var/lib/farm"
            log_format = "json"
            log_level = "debug"

            [[genesis]]
            account = "investor"
            asset = "mdai"
            amount = 1000

            [[genesis]]
            account = "vault"
            asset = "eq"
            category = 1
            amount = 5000000
        "#;
        let config = FarmConfig::from_toml_str(toml).unwrap();
        assert_eq!(config.administrator, AccountId::new("admin"));
        assert_eq!(config.data_dir, PathBuf::from("/var/lib/farm"));
        assert_eq!(config.genesis.len(), 2);
        assert_eq!(
            config.genesis[1].asset_key(),
            AssetKey::from(config.params().reward_token())
        );
        assert_eq!(config.genesis[0].asset_key(), AssetKey::plain(AssetId::new("mdai")));
    }

    #[test]
    fn rejects_blank_administrator() {
        let err = FarmConfig::from_toml_str(r#"administrator = "two words""#).unwrap_err();
        assert!(matches!(err, ServiceError::Types(_)));
    }

    #[test]
    fn rejects_admin_as_custody() {
        let err = FarmConfig::from_toml_str(
            r#"
            administrator = "farm"
            custody_account = "farm"
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, ServiceError::Config(_)));
    }

    #[test]
    fn toml_roundtrip() {
        let mut config = FarmConfig::default();
        config.genesis.push(GenesisBalance {
            account: AccountId::new("investor"),
            asset: AssetId::new("mdai"),
            category: None,
            amount: 10,
        });
        let text = config.to_toml_string().unwrap();
        assert_eq!(FarmConfig::from_toml_str(&text).unwrap(), config);
    }
}
