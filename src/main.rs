use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use p402::AppCommand;
use p402::cli::params::ParamsRequest;
use p402::core::log::init_logging;

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to optional configuration file
    #[arg(short, long, global = true)]
    config_path: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Create default configuration
    Setup,
    /// List supported tokens with USD rates and gas fees
    Tokens {
        /// Refresh rates from the live price feed first
        #[arg(long)]
        live: bool,
    },
    /// Convert an amount between tokens, deducting the source network's gas fee
    Convert {
        amount: f64,
        from: String,
        to: String,
        /// Skip the gas fee deduction
        #[arg(long)]
        no_gas_fee: bool,
        /// Refresh rates from the live price feed first
        #[arg(long)]
        live: bool,
    },
    /// List payment providers and their configuration fields
    Providers,
    /// Generate an HTTP 402 response for paid content
    Params {
        /// Payment provider id
        #[arg(short, long, default_value = "lightning")]
        method: String,
        #[arg(long, default_value = "premium-content-001")]
        content_id: String,
        #[arg(short, long, default_value_t = 1000.0)]
        amount: f64,
        #[arg(long, default_value = "sats")]
        currency: String,
        /// Seconds until the payment request expires
        #[arg(long)]
        expires_in: Option<i64>,
        /// Extra metadata as key=value, repeatable
        #[arg(long = "meta")]
        metadata: Vec<String>,
    },
    /// Verify a payment token with a provider
    Verify {
        #[arg(short, long, default_value = "lightning")]
        method: String,
        token: String,
    },
    /// Display dashboard metrics, traffic, revenue and recent activity
    Dashboard {
        /// Number of recent payment requests to show
        #[arg(short, long)]
        limit: Option<usize>,
    },
}

impl From<Commands> for AppCommand {
    fn from(cmd: Commands) -> AppCommand {
        match cmd {
            Commands::Tokens { live } => AppCommand::Tokens { live },
            Commands::Convert {
                amount,
                from,
                to,
                no_gas_fee,
                live,
            } => AppCommand::Convert {
                amount,
                from,
                to,
                include_gas_fee: !no_gas_fee,
                live,
            },
            Commands::Providers => AppCommand::Providers,
            Commands::Params {
                method,
                content_id,
                amount,
                currency,
                expires_in,
                metadata,
            } => AppCommand::Params(ParamsRequest {
                method,
                content_id,
                amount,
                currency,
                expires_in_secs: expires_in,
                metadata,
            }),
            Commands::Verify { method, token } => AppCommand::Verify { method, token },
            Commands::Dashboard { limit } => AppCommand::Dashboard { limit },
            Commands::Setup => unreachable!("Setup command should be handled separately"),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let result = match cli.command {
        Some(Commands::Setup) => p402::cli::setup::setup(),
        Some(cmd) => p402::run_command(cmd.into(), cli.config_path.as_deref()).await,
        None => {
            Cli::command().print_help()?;
            Ok(())
        }
    };

    if let Err(e) = &result {
        tracing::error!(error = %e, "Application failed");
    }
    result
}
