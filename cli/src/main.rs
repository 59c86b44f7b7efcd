//! StableSwap CLI - Offline pool simulator
//!
//! Loads a pool description from a TOML file and/or flags and runs the
//! StableSwap math against it: invariant, prices, swap quotes, deposits,
//! withdrawals, amp ramps and farm rewards. Nothing is persisted; every
//! invocation is a pure function of its inputs and `--now`.

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod check;
mod config;
mod farm;
mod invariant;
mod liquidity;
mod output;
mod swap;

use config::{Overrides, PoolConfig};

#[derive(Parser)]
#[command(name = "stableswap")]
#[command(about = "StableSwap CLI - Simulate swaps, liquidity and rewards on a stable pool", long_about = None)]
#[command(version)]
struct Cli {
    /// Pool description (TOML)
    #[arg(short, long, global = true)]
    pool: Option<PathBuf>,

    /// Token balances, comma separated (overrides the pool file)
    #[arg(short, long, global = true, value_delimiter = ',')]
    balances: Option<Vec<u64>>,

    /// Amplification coefficient (overrides the pool file)
    #[arg(short, long, global = true)]
    amp: Option<u64>,

    /// Swap fee in basis points (overrides the pool file)
    #[arg(long, global = true)]
    fee_bps: Option<u64>,

    /// Outstanding LP supply (overrides the pool file)
    #[arg(long, global = true)]
    lp_supply: Option<u64>,

    /// UNIX timestamp to evaluate ramps and farms at (default: now)
    #[arg(long, global = true)]
    now: Option<i64>,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute the invariant D
    Invariant,

    /// Marginal price of one token in units of another
    Price {
        /// Token being priced
        #[arg(long)]
        from: usize,

        /// Token the price is quoted in
        #[arg(long)]
        to: usize,
    },

    /// Quote a swap
    Swap {
        /// Input token index
        #[arg(long)]
        from: usize,

        /// Output token index
        #[arg(long)]
        to: usize,

        /// Amount of the input token
        #[arg(long)]
        amount: u64,

        /// Slippage tolerance for the minimum output (basis points)
        #[arg(long, default_value = "50")]
        slippage_bps: u64,
    },

    /// LP tokens minted for a deposit
    Deposit {
        /// Deposit amounts, one per token, comma separated
        #[arg(long, value_delimiter = ',', required = true)]
        amounts: Vec<u64>,
    },

    /// Tokens paid out for burning LP
    Withdraw {
        /// LP tokens to burn
        #[arg(long)]
        lp: u64,
    },

    /// Value of one LP share (1e18 scale)
    VirtualPrice,

    /// Effective amplification coefficient
    Amp,

    /// Farming reward arithmetic
    Farm {
        #[command(subcommand)]
        command: FarmCommands,
    },

    /// Run the parameter range checks
    Check,
}

#[derive(Subcommand)]
enum FarmCommands {
    /// Rewards owed to a position
    Pending {
        #[arg(long)]
        staked: u64,

        /// Reward-per-share accumulator (1e12 scale)
        #[arg(long)]
        acc: u64,

        #[arg(long, default_value = "0")]
        debt: u64,
    },

    /// Advance the reward-per-share accumulator
    Accrue {
        #[arg(long)]
        acc: u64,

        #[arg(long)]
        reward: u64,

        #[arg(long)]
        total_staked: u64,
    },

    /// Rewards emitted since the last update
    Emission {
        /// Rewards per second
        #[arg(long)]
        rate: u64,

        #[arg(long)]
        start: i64,

        #[arg(long)]
        end: i64,

        #[arg(long)]
        last_update: i64,
    },
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default)).init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let now = cli.now.unwrap_or_else(|| chrono::Utc::now().timestamp());
    let overrides = Overrides {
        balances: cli.balances.clone(),
        amp: cli.amp,
        fee_bps: cli.fee_bps,
        lp_supply: cli.lp_supply,
    };
    let pool = cli.pool.as_deref();
    let json = cli.json;

    match cli.command {
        Commands::Invariant => {
            let config = PoolConfig::load(pool, overrides)?;
            invariant::show_invariant(&config, now, json)?;
        }
        Commands::Price { from, to } => {
            let config = PoolConfig::load(pool, overrides)?;
            invariant::show_price(&config, from, to, now, json)?;
        }
        Commands::Swap {
            from,
            to,
            amount,
            slippage_bps,
        } => {
            let config = PoolConfig::load(pool, overrides)?;
            swap::quote(&config, from, to, amount, slippage_bps, now, json)?;
        }
        Commands::Deposit { amounts } => {
            let config = PoolConfig::load(pool, overrides)?;
            liquidity::deposit(&config, &amounts, now, json)?;
        }
        Commands::Withdraw { lp } => {
            let config = PoolConfig::load(pool, overrides)?;
            liquidity::withdraw(&config, lp, json)?;
        }
        Commands::VirtualPrice => {
            let config = PoolConfig::load(pool, overrides)?;
            liquidity::virtual_price(&config, now, json)?;
        }
        Commands::Amp => {
            let config = PoolConfig::load(pool, overrides)?;
            invariant::show_amp(&config, now, json)?;
        }
        Commands::Farm { command } => match command {
            FarmCommands::Pending { staked, acc, debt } => {
                farm::pending(staked, acc, debt, json)?;
            }
            FarmCommands::Accrue {
                acc,
                reward,
                total_staked,
            } => {
                farm::accrue(acc, reward, total_staked, json)?;
            }
            FarmCommands::Emission {
                rate,
                start,
                end,
                last_update,
            } => {
                farm::emission(rate, start, end, last_update, now, json)?;
            }
        },
        Commands::Check => {
            let config = PoolConfig::load_unchecked(pool, overrides)?;
            check::run_checks(&config, now, json)?;
        }
    }

    Ok(())
}
