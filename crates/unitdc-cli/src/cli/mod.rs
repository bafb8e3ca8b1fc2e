//! CLI entry and dispatch.

use anyhow::{Context, Result};
use clap::Parser;
use tokio::runtime::Runtime;
use unitdc_core::config::Config;
use unitdc_core::logging;

mod commands;

#[derive(Parser)]
#[command(name = "unitdc")]
#[command(version)]
#[command(about = "Unit-aware RPN calculator console")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Log to stderr in line modes (repl, eval)
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Evaluate lines from stdin, printing results as they come
    Repl,
    /// Evaluate expressions in order and exit
    Eval {
        /// Expressions, each submitted as its own cell
        #[arg(value_name = "EXPR", required = true)]
        exprs: Vec<String>,

        /// Print cells as JSON lines
        #[arg(long)]
        json: bool,
    },
    /// Manage configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(clap::Subcommand)]
enum ConfigCommands {
    /// Show the path to the config file
    Path,
    /// Initialize a default config file (if not present)
    Init,
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();

    // one tokio runtime for everything
    let rt = Runtime::new().context("create tokio runtime")?;

    rt.block_on(async move { dispatch(cli).await })
}

async fn dispatch(cli: Cli) -> Result<()> {
    let Cli { command, verbose } = cli;

    // default to the interactive console
    let Some(command) = command else {
        let config = Config::load().context("load config")?;
        return commands::console::run(&config);
    };

    match command {
        Commands::Repl => {
            let config = Config::load().context("load config")?;
            init_line_logging(verbose, &config)?;
            commands::repl::run(&config).await
        }
        Commands::Eval { exprs, json } => {
            let config = Config::load().context("load config")?;
            init_line_logging(verbose, &config)?;
            commands::eval::run(&config, &exprs, json).await
        }
        Commands::Config { command } => match command {
            ConfigCommands::Path => {
                commands::config::path();
                Ok(())
            }
            ConfigCommands::Init => commands::config::init(),
        },
    }
}

fn init_line_logging(verbose: bool, config: &Config) -> Result<()> {
    if verbose {
        logging::init_stderr_logging(&config.logging.level)?;
    }
    Ok(())
}
