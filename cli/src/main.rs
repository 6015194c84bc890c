//! lockvote: inspect a voter's locking positions from a snapshot file.

mod file_provider;
mod output;

use anyhow::{bail, Context};
use clap::{Parser, ValueEnum};
use lockvote_dashboard::{Dashboard, DashboardConfig};
use lockvote_positions::PendingAction;
use lockvote_types::{Days, PositionIndex, Timestamp, TokenAmount};
use std::path::{Path, PathBuf};

use crate::file_provider::FileProvider;

#[derive(Parser)]
#[command(name = "lockvote", about = "Voting-power locking position dashboard")]
struct Cli {
    /// Path to a TOML configuration file. CLI flags and env vars override it.
    #[arg(long, env = "LOCKVOTE_CONFIG")]
    config: Option<PathBuf>,

    /// Log level: "trace", "debug", "info", "warn", "error".
    #[arg(long, env = "LOCKVOTE_LOG_LEVEL")]
    log_level: Option<String>,

    /// Subcommand.
    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Subcommand)]
enum Command {
    /// Print totals and one row per position.
    Summary {
        /// Voter snapshot JSON file.
        #[arg(long)]
        snapshot: PathBuf,

        /// Evaluation time in epoch milliseconds (defaults to now).
        #[arg(long)]
        now: Option<u64>,

        /// Print the snapshot as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Check whether an action would be accepted.
    Check {
        /// Voter snapshot JSON file.
        #[arg(long)]
        snapshot: PathBuf,

        /// Position index (not needed for withdraw-all).
        #[arg(long)]
        index: Option<PositionIndex>,

        #[arg(long, value_enum)]
        action: ActionArg,

        /// New locking period in days (relock, extend).
        #[arg(long)]
        days: Option<Days>,

        /// Amount in raw token units: the amount released by partial-unlock,
        /// or the relocked total, which cannot be below the position amount.
        #[arg(long)]
        amount: Option<u128>,

        /// Evaluation time in epoch milliseconds (defaults to now).
        #[arg(long)]
        now: Option<u64>,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum ActionArg {
    Unlock,
    PartialUnlock,
    Relock,
    Extend,
    Withdraw,
    WithdrawAll,
}

fn load_config(cli: &Cli) -> anyhow::Result<DashboardConfig> {
    let mut config = match &cli.config {
        Some(path) => DashboardConfig::from_toml_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => DashboardConfig::default(),
    };
    if let Some(level) = &cli.log_level {
        config.log_level = level.clone();
    }
    Ok(config)
}

async fn open_dashboard(
    path: &Path,
    config: &DashboardConfig,
) -> anyhow::Result<Dashboard<FileProvider>> {
    let provider = FileProvider::new(path);
    let voter = provider
        .load()
        .await
        .with_context(|| format!("reading snapshot {}", path.display()))?
        .voter_id;
    tracing::debug!(voter = %voter, path = %path.display(), "opened snapshot");
    Ok(Dashboard::new(provider, voter, config.locking.clone()))
}

fn build_action(
    dashboard: &Dashboard<FileProvider>,
    action: ActionArg,
    index: Option<PositionIndex>,
    days: Option<Days>,
    amount: Option<u128>,
) -> anyhow::Result<PendingAction> {
    let require_index = || index.with_context(|| format!("--index is required for {action:?}"));
    let pending = match action {
        ActionArg::WithdrawAll => PendingAction::withdraw_all(),
        ActionArg::Unlock => PendingAction::start_unlock(require_index()?),
        ActionArg::Withdraw => PendingAction::withdraw(require_index()?),
        ActionArg::Extend => {
            let days = days.context("--days is required for extend")?;
            PendingAction::extend_lock(require_index()?, days)
        }
        ActionArg::PartialUnlock => {
            let amount = amount.context("--amount is required for partial-unlock")?;
            PendingAction::partial_unlock(require_index()?, TokenAmount::new(amount))
        }
        ActionArg::Relock => {
            let index = require_index()?;
            let snapshot = dashboard.current().context("dashboard not loaded")?;
            let position = &snapshot
                .summary
                .position(index)
                .with_context(|| format!("position {index} not found"))?
                .position;
            PendingAction::relock(
                index,
                days.unwrap_or(position.locking_period_days),
                amount.map_or(position.amount, TokenAmount::new),
            )
        }
    };
    Ok(pending)
}

fn resolve_now(now: Option<u64>) -> Timestamp {
    now.map_or_else(Timestamp::now, Timestamp::new)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = load_config(&cli)?;
    lockvote_utils::init_tracing(config.log_format(), &config.log_level);

    match cli.command {
        Command::Summary {
            snapshot,
            now,
            json,
        } => {
            let dashboard = open_dashboard(&snapshot, &config).await?;
            let view = dashboard.refresh(resolve_now(now)).await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&*view)?);
            } else {
                print!("{}", output::render_summary(dashboard.voter(), &view));
            }
        }
        Command::Check {
            snapshot,
            index,
            action,
            days,
            amount,
            now,
        } => {
            let now = resolve_now(now);
            let dashboard = open_dashboard(&snapshot, &config).await?;
            dashboard.refresh(now).await?;
            let pending = build_action(&dashboard, action, index, days, amount)?;
            match dashboard.preview(&pending, now) {
                Ok(preview) => println!("{}", output::render_preview(&pending, &preview)),
                Err(e) => bail!("{} on {:?}: not eligible: {e}", pending.kind.name(), pending.target),
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_check_command() {
        let cli = Cli::parse_from([
            "lockvote",
            "check",
            "--snapshot",
            "voter.json",
            "--index",
            "3",
            "--action",
            "partial-unlock",
            "--amount",
            "2000000",
        ]);
        match cli.command {
            Command::Check {
                index,
                action,
                amount,
                ..
            } => {
                assert_eq!(index, Some(3));
                assert!(matches!(action, ActionArg::PartialUnlock));
                assert_eq!(amount, Some(2_000_000));
            }
            Command::Summary { .. } => panic!("expected check"),
        }
    }

    #[test]
    fn explicit_now_is_used() {
        assert_eq!(resolve_now(Some(42)), Timestamp::new(42));
    }
}
