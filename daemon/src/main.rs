//! Token farm daemon: runs one farm operation against a data directory.

mod output;

use std::path::PathBuf;

use anyhow::{bail, Context};
use clap::Parser;
use farm_bank::{AssetKey, MemoryBank};
use farm_service::{init_logging, FarmConfig, FarmService, LogFormat, StateFiles};
use farm_types::{AccountId, AssetId, CategoryId};

use output::{Outcome, StatusReport};

#[derive(Parser)]
#[command(name = "farmd", about = "Token farm: stake assets, accrue and claim rewards")]
struct Cli {
    /// Path to a TOML configuration file. If provided, file settings
    /// are used as the base; CLI flags and env vars override them.
    #[arg(long, global = true, env = "FARM_CONFIG")]
    config: Option<PathBuf>,

    /// Directory holding the farm and bank state.
    #[arg(long, global = true, env = "FARM_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Log level: "trace", "debug", "info", "warn", "error".
    #[arg(long, global = true, env = "FARM_LOG_LEVEL")]
    log_level: Option<String>,

    /// Log format: "human" or "json".
    #[arg(long, global = true, env = "FARM_LOG_FORMAT")]
    log_format: Option<String>,

    /// Print results as JSON.
    #[arg(long, global = true, env = "FARM_JSON")]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Subcommand)]
enum Command {
    /// Create a fresh farm and seed the configured genesis balances.
    Init {
        /// Overwrite existing state.
        #[arg(long)]
        force: bool,
    },
    #[command(flatten)]
    Farm(FarmCommand),
}

/// Commands that operate on an existing farm.
#[derive(clap::Subcommand)]
enum FarmCommand {
    /// Approve an asset for staking.
    Approve {
        #[arg(long, env = "FARM_CALLER")]
        caller: AccountId,
        asset: AssetId,
    },
    /// Let a spender (the custody account by default) move an owner's asset.
    Allow {
        owner: AccountId,
        asset: AssetId,
        amount: u128,
        #[arg(long)]
        spender: Option<AccountId>,
        /// Category of a multi-category asset.
        #[arg(long)]
        category: Option<u32>,
    },
    /// Stake an amount of an approved asset.
    Deposit {
        participant: AccountId,
        asset: AssetId,
        amount: u128,
    },
    /// Unstake the whole balance of one asset.
    Withdraw {
        participant: AccountId,
        asset: AssetId,
    },
    /// Run one reward accrual epoch.
    Distribute {
        #[arg(long, env = "FARM_CALLER")]
        caller: AccountId,
    },
    /// Pay out a participant's pending reward.
    Claim { participant: AccountId },
    /// Show the farm, or one participant.
    Status { participant: Option<AccountId> },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = resolve_config(&cli)?;
    init_logging(LogFormat::from_config(&config.log_format), &config.log_level);

    let outcome = run(cli.command, &config)?;
    println!("{}", outcome.render(cli.json)?);
    Ok(())
}

/// File settings first, then CLI flags and `FARM_*` variables on top.
fn resolve_config(cli: &Cli) -> anyhow::Result<FarmConfig> {
    let mut config = match &cli.config {
        Some(path) => FarmConfig::from_toml_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => FarmConfig::default(),
    };
    if let Some(dir) = &cli.data_dir {
        config.data_dir = dir.clone();
    }
    if let Some(level) = &cli.log_level {
        config.log_level = level.clone();
    }
    if let Some(format) = &cli.log_format {
        config.log_format = format.clone();
    }
    Ok(config)
}

fn run(command: Command, config: &FarmConfig) -> anyhow::Result<Outcome> {
    let files = StateFiles::new(&config.data_dir);
    match command {
        Command::Init { force } => init(&files, config, force),
        Command::Farm(command) => operate(&files, config, command),
    }
}

fn init(files: &StateFiles, config: &FarmConfig, force: bool) -> anyhow::Result<Outcome> {
    if files.exists() && !force {
        bail!(
            "{} already holds a farm (use --force to overwrite)",
            files.dir().display()
        );
    }
    let service = FarmService::from_config(config)?;
    let (farm, bank) = service.into_parts()?;
    files.save(&farm.snapshot(), &bank)?;
    tracing::info!(data_dir = %files.dir().display(), "farm initialised");
    Ok(Outcome::Init {
        data_dir: config.data_dir.clone(),
        genesis_entries: config.genesis.len(),
    })
}

/// Load the farm, apply one command, and write the state back if it changed.
fn operate(
    files: &StateFiles,
    config: &FarmConfig,
    command: FarmCommand,
) -> anyhow::Result<Outcome> {
    if !files.exists() {
        bail!(
            "no farm in {} (run `farmd init` first)",
            files.dir().display()
        );
    }
    let (farm, bank) = files
        .load()
        .with_context(|| format!("loading state from {}", files.dir().display()))?;
    if farm.params() != &config.params() {
        tracing::warn!(
            "configured farm parameters differ from the stored farm; using the stored ones"
        );
    }
    let custody = farm.params().custody_account.clone();
    let service: FarmService<MemoryBank> = FarmService::new(farm, bank);

    let outcome = match command {
        FarmCommand::Approve { caller, asset } => {
            let newly_approved = service.approve(&caller, &asset)?;
            Outcome::Approve {
                asset,
                newly_approved,
            }
        }
        FarmCommand::Allow {
            owner,
            asset,
            amount,
            spender,
            category,
        } => {
            let key = match category {
                Some(raw) => AssetKey::categorized(asset, CategoryId::new(raw)),
                None => AssetKey::plain(asset),
            };
            let spender = spender.unwrap_or(custody);
            service.allow(&owner, &spender, &key, amount)?;
            Outcome::Allow {
                owner,
                spender,
                asset: key.to_string(),
                amount,
            }
        }
        FarmCommand::Deposit {
            participant,
            asset,
            amount,
        } => {
            let balance = service.deposit(&participant, &asset, amount)?;
            Outcome::Deposit {
                participant,
                asset,
                amount,
                balance,
            }
        }
        FarmCommand::Withdraw { participant, asset } => {
            let amount = service.withdraw(&participant, &asset)?;
            Outcome::Withdraw {
                participant,
                asset,
                amount,
            }
        }
        FarmCommand::Distribute { caller } => {
            let report = service.distribute(&caller)?;
            Outcome::Distribute {
                epoch: report.epoch,
                participants: report.participants,
                total_accrued: report.total_accrued,
            }
        }
        FarmCommand::Claim { participant } => {
            let amount = service.claim(&participant)?;
            Outcome::Claim {
                participant,
                amount,
            }
        }
        FarmCommand::Status { participant } => {
            let report = service
                .inspect(|farm, bank| StatusReport::collect(farm, bank, participant.as_ref()))?;
            return Ok(Outcome::Status(report));
        }
    };

    let (farm, bank) = service.into_parts()?;
    files.save(&farm.snapshot(), &bank)?;
    Ok(outcome)
}
