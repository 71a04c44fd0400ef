use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("staking error: {0}")]
    Staking(#[from] farm_staking::StakingError),

    #[error("bank error: {0}")]
    Bank(#[from] farm_bank::BankError),

    #[error("invalid identifier: {0}")]
    Types(#[from] farm_types::TypesError),

    #[error("config error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("state file error: {0}")]
    State(String),

    #[error("farm state lock poisoned")]
    Poisoned,
}
