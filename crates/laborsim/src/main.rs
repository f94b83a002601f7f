use std::path::PathBuf;

use clap::{Parser, Subcommand};
use color_eyre::eyre::WrapErr;
use laborsim::config::{self, Overrides};
use laborsim::output::OutputFormat;
use laborsim::{commands, init_logging};
use laborsim_core::SimulationConfig;

#[derive(Parser, Debug)]
#[command(name = "laborsim")]
#[command(about = "Simulate labor supply cross-sections with known structural parameters")]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// Log level (debug, info, warn, error)
    #[arg(short, long, default_value = "info", global = true)]
    log_level: String,

    /// Write logs to this file instead of stderr
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,
}

#[derive(clap::Args, Debug)]
struct ConfigArgs {
    /// YAML configuration file (library defaults when omitted)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the master seed
    #[arg(short, long)]
    seed: Option<u64>,

    /// Override the number of agents per regime
    #[arg(short = 'n', long)]
    population_size: Option<usize>,
}

impl ConfigArgs {
    fn load(&self) -> color_eyre::Result<SimulationConfig> {
        let overrides = Overrides {
            seed: self.seed,
            population_size: self.population_size,
        };
        config::load(self.config.as_deref(), overrides).wrap_err("failed to load configuration")
    }
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Simulate every regime and write the dataset
    Run {
        #[command(flatten)]
        config: ConfigArgs,

        /// Output file (stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output format; guessed from the output extension when omitted
        #[arg(short, long, value_enum)]
        format: Option<OutputFormat>,
    },
    /// Validate a configuration and print the regime plan
    Check {
        #[command(flatten)]
        config: ConfigArgs,
    },
    /// Print a configuration template
    Template,
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let args = Args::parse();
    init_logging(&args.log_level, args.log_file.as_deref())?;

    match args.command {
        Command::Run {
            config,
            output,
            format,
        } => {
            let config = config.load()?;
            let format = format
                .or_else(|| output.as_deref().and_then(OutputFormat::from_path))
                .unwrap_or_default();
            commands::run(&config, output.as_deref(), format)?;
        }
        Command::Check { config } => {
            let config = config.load()?;
            print!("{}", commands::check(&config)?);
        }
        Command::Template => {
            print!("{}", config::template()?);
        }
    }

    Ok(())
}
