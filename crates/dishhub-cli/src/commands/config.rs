//! Configuration management CLI commands.

use clap::{Args, Subcommand};

use dishhub_core::config::{AppConfig, env_var_name};
use dishhub_core::error::AppError;

use crate::output::{self, OutputFormat};

/// Arguments for config commands
#[derive(Debug, Args)]
pub struct ConfigArgs {
    /// Config subcommand
    #[command(subcommand)]
    pub command: ConfigCommand,
}

/// Config subcommands
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show the effective configuration
    Show,
    /// Check that every required value is present
    Check,
}

/// Execute config commands
pub fn execute(
    args: &ConfigArgs,
    config: &AppConfig,
    config_path: &str,
    format: OutputFormat,
) -> Result<(), AppError> {
    match &args.command {
        ConfigCommand::Show => {
            output::print_item(config, format, |c| {
                output::print_kv("Provider", &format!("{:?}", c.platform.provider));
                output::print_kv("Endpoint", &c.platform.endpoint);
                output::print_kv("Project", &c.platform.project_id);
                output::print_kv("Database", &c.platform.database_id);
                output::print_kv("Collection", &c.platform.collection_id);
                output::print_kv("Bucket", &c.platform.bucket_id);
                output::print_kv("Session file", &c.session.session_file);
                output::print_kv("Log level", &c.logging.level);
            });
        }
        ConfigCommand::Check => match config.validate() {
            Ok(()) => {
                output::print_success(&format!("Configuration '{config_path}' is complete"));
                output::print_kv("Provider", &format!("{:?}", config.platform.provider));
                output::print_kv("Endpoint", &config.platform.endpoint);
            }
            Err(e) => {
                output::print_error("Configuration incomplete. Set these values:");
                for key in config.missing_keys() {
                    println!("  {key:<24} {}", env_var_name(key));
                }
                return Err(e);
            }
        },
    }

    Ok(())
}
