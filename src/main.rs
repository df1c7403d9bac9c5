use anyhow::Result;
use clap::{Args, Parser, Subcommand};

use fuelwatch::cli::{self, OutputFormat};
use fuelwatch::config;
use fuelwatch::form::FormSelection;
use fuelwatch::web;

#[derive(Debug, Parser)]
#[command(name = "fuelwatch")]
#[command(about = "Fuel-efficiency prediction dashboard for fleet operations")]
struct App {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Probe the inference service and show the configuration in use
    Health,
    /// List the selectable values for each form field
    Options {
        /// Output format: table (default), json
        #[arg(long, default_value = "table")]
        format: String,
    },
    /// Predict fuel efficiency for one selection
    Predict {
        #[command(flatten)]
        form: FormArgs,
        /// Output format: table (default), json
        #[arg(long, default_value = "table")]
        format: String,
    },
    /// Open the external visualization for a selection
    View {
        #[command(flatten)]
        form: FormArgs,
        /// Only print the URL
        #[arg(long)]
        no_open: bool,
    },
    /// Describe the remote model
    ModelInfo {
        /// Output format: table (default), json
        #[arg(long, default_value = "table")]
        format: String,
    },
    /// Serve the web dashboard
    Serve {
        /// Listen address (default: dashboard.addr)
        #[arg(long)]
        addr: Option<String>,
    },
    /// Summarize the diagnostics log
    Diagnostics {
        /// Only include the last N days of data
        #[arg(long)]
        days: Option<u32>,
        /// Output format: table (default), json
        #[arg(long, default_value = "table")]
        format: String,
    },
    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Debug, Subcommand)]
enum ConfigAction {
    /// Show the effective configuration
    Show,
    /// Write the default config to ~/.fuelwatch/config.toml
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
    /// Set a dotted key, e.g. `service.base_url http://10.0.0.5:8000`
    Set { key: String, value: String },
    /// Reset the global config to defaults
    Reset,
}

/// The six selection fields. Omitted fields stay empty.
#[derive(Debug, Args)]
struct FormArgs {
    #[arg(long, default_value = "")]
    driver: String,
    #[arg(long, default_value = "")]
    vehicle: String,
    #[arg(long, default_value = "")]
    division: String,
    /// Bill of lading
    #[arg(long, default_value = "")]
    bl: String,
    /// Cargo type
    #[arg(long, default_value = "")]
    cargo: String,
    #[arg(long, default_value = "")]
    station: String,
}

impl From<FormArgs> for FormSelection {
    fn from(args: FormArgs) -> Self {
        Self {
            driver: args.driver,
            vehicle: args.vehicle,
            division: args.division,
            bill_of_lading: args.bl,
            cargo_type: args.cargo,
            station: args.station,
        }
    }
}

fn main() -> Result<()> {
    let app = App::parse();

    match app.command {
        Commands::Health => cli::run_health(&config::load()),
        Commands::Options { format } => {
            cli::run_options(&config::load(), OutputFormat::from_str_opt(Some(&format)))
        }
        Commands::Predict { form, format } => cli::run_predict(
            &config::load(),
            &form.into(),
            OutputFormat::from_str_opt(Some(&format)),
        ),
        Commands::View { form, no_open } => cli::run_view(&config::load(), &form.into(), no_open),
        Commands::ModelInfo { format } => {
            cli::run_model_info(&config::load(), OutputFormat::from_str_opt(Some(&format)))
        }
        Commands::Serve { addr } => {
            let cfg = config::load();
            let addr = addr.unwrap_or_else(|| cfg.dashboard.addr.clone());
            web::serve(cfg, &addr)
        }
        Commands::Diagnostics { days, format } => cli::run_diagnostics(
            &config::load(),
            days,
            OutputFormat::from_str_opt(Some(&format)),
        ),
        Commands::Config { action } => match action {
            ConfigAction::Show => cli::run_config_show(),
            ConfigAction::Init { force } => cli::run_config_init(force),
            ConfigAction::Set { key, value } => cli::run_config_set(&key, &value),
            ConfigAction::Reset => cli::run_config_reset(),
        },
    }
}
