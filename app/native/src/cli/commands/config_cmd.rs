//! Config CLI commands.
//!
//! Commands for managing the Backdrop configuration file.

use std::path::PathBuf;

use clap::Subcommand;

use crate::config::template::{create_config_file, generate_config_template};
use crate::config::{self, ConfigError, config_paths};
use crate::error::BackdropError;

/// Config management commands.
#[derive(Subcommand, Debug)]
#[command(next_display_order = None)]
pub enum ConfigCommands {
    /// Initialize a new configuration file with all options documented.
    ///
    /// Every option is commented out and shows its default value.
    #[command(
        name = "init",
        after_long_help = r#"Examples:
  backdrop config init              # Create config at default location
  backdrop config init --force      # Overwrite existing config
  backdrop config init --path ~/backdrop.jsonc
  backdrop config init --stdout     # Print template to stdout"#
    )]
    Init {
        /// Overwrite existing configuration file if it exists.
        #[arg(long, short)]
        force: bool,

        /// Custom path for the configuration file.
        /// If not specified, uses ~/.config/backdrop/config.jsonc
        #[arg(long, short, value_name = "PATH")]
        path: Option<PathBuf>,

        /// Print the configuration template to stdout instead of writing to a file.
        #[arg(long)]
        stdout: bool,
    },

    /// Show the configuration file search paths.
    ///
    /// Marks the file that is currently in use, if any.
    Path,
}

/// Execute config subcommands.
///
/// # Errors
///
/// Returns an error if the command execution fails.
pub fn execute(cmd: &ConfigCommands) -> Result<(), BackdropError> {
    match cmd {
        ConfigCommands::Init { force, path, stdout } => {
            if *stdout {
                println!("{}", generate_config_template());
                Ok(())
            } else {
                init_config(*force, path.clone())
            }
        }
        ConfigCommands::Path => {
            show_config_path();
            Ok(())
        }
    }
}

fn init_config(force: bool, custom_path: Option<PathBuf>) -> Result<(), BackdropError> {
    let config_path = custom_path
        .or_else(config::preferred_config_path)
        .unwrap_or_else(|| PathBuf::from("config.jsonc"));

    if config_path.exists() && !force {
        return Err(BackdropError::InvalidArguments(format!(
            "Configuration file already exists at: {}\nUse --force to overwrite.",
            config_path.display()
        )));
    }

    create_config_file(&config_path)
        .map_err(|source| ConfigError::Io { path: config_path.clone(), source })?;

    println!("Configuration file created at: {}", config_path.display());
    println!("\nAll options are commented out by default.");
    println!("Edit the file and uncomment the options you want to configure.");

    Ok(())
}

fn show_config_path() {
    config::init();

    if let Some(path) = config::custom_config_path() {
        println!("Using configuration file from --config:\n");
        println!("  {}", path.display());
        return;
    }

    println!("Configuration file search paths (in priority order):\n");

    for (i, path) in config_paths().iter().enumerate() {
        let marker = if config::is_loaded_from(path) {
            " (active)"
        } else if path.exists() {
            " (exists)"
        } else {
            ""
        };

        println!("  {}. {}{}", i + 1, path.display(), marker);
    }

    if config::get_config_path().is_none() {
        println!("\nNo configuration file found. Defaults are in use.");
        println!("Run 'backdrop config init' to create one.");
    }
}
