pub mod cli;
pub mod toml_config;

#[cfg(feature = "cli")]
pub use self::args::{CliConfig, Command};

#[cfg(feature = "cli")]
mod args {
    use crate::domain::model::YearMonth;
    use crate::utils::error::{CheckError, Result};
    use crate::utils::validation::{validate_path, Validate};
    use clap::{Parser, Subcommand};

    #[derive(Debug, Clone, Parser)]
    #[command(name = "instrument-check")]
    #[command(about = "Validate card numbers, expiry dates, CVVs and UPI addresses")]
    pub struct CliConfig {
        #[arg(short, long, global = true, help = "Enable verbose output")]
        pub verbose: bool,

        #[arg(long, global = true, help = "Emit logs as JSON lines")]
        pub json_logs: bool,

        /// Pin the current month for expiry checks (YYYY-MM)
        #[arg(long, global = true, value_parser = parse_year_month)]
        pub reference_month: Option<YearMonth>,

        #[command(subcommand)]
        pub command: Command,
    }

    #[derive(Debug, Clone, Subcommand)]
    pub enum Command {
        /// Check UPI virtual payment address syntax
        Vpa { vpa: String },

        /// Check a card number, and optionally its expiry and CVV
        Card {
            number: String,
            #[arg(long)]
            month: Option<String>,
            #[arg(long)]
            year: Option<String>,
            #[arg(long)]
            cvv: Option<String>,
        },

        /// Detect the card network from the number prefix
        Network { number: String },

        /// Print the last four digits of a card number
        Last4 { number: String },

        /// Check every instrument in a CSV file described by a TOML job
        Batch {
            #[arg(short, long, default_value = "instrument-check.toml")]
            config: String,

            /// Show what would be processed without writing reports
            #[arg(long)]
            dry_run: bool,
        },
    }

    fn parse_year_month(value: &str) -> std::result::Result<YearMonth, String> {
        YearMonth::parse(value).ok_or_else(|| format!("expected YYYY-MM, got '{}'", value))
    }

    impl Validate for CliConfig {
        fn validate(&self) -> Result<()> {
            match &self.command {
                Command::Card { month, year, .. } => match (month, year) {
                    (Some(_), None) => Err(CheckError::MissingConfigError {
                        field: "--year".to_string(),
                    }),
                    (None, Some(_)) => Err(CheckError::MissingConfigError {
                        field: "--month".to_string(),
                    }),
                    _ => Ok(()),
                },
                Command::Batch { config, .. } => validate_path("--config", config),
                _ => Ok(()),
            }
        }
    }

}
