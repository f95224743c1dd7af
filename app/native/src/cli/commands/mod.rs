//! CLI command definitions using Clap.
//!
//! This module defines all CLI commands and their arguments, organized into
//! domain-specific submodules:
//!
//! - `automation` - Starting, stopping and running the shuffle loop
//! - `cache` - Cache maintenance
//! - `config_cmd` - Configuration file management
//! - `wallpaper` - Setting, selecting and listing wallpapers

use std::io;
use std::num::NonZeroU64;
use std::path::PathBuf;
use std::sync::Arc;

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{Generator, Shell, generate};

use crate::automation::{AutomationController, ProcessSupervisor};
use crate::constants::{APP_NAME, LOOP_COMMAND};
use crate::error::BackdropError;
use crate::wallpaper::WallpaperEngine;
use crate::{config, schema};

pub mod automation;
pub mod cache;
pub mod config_cmd;
pub mod wallpaper;

pub use config_cmd::ConfigCommands;

/// Application version from Cargo.toml.
const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Backdrop CLI - wallpaper, theme and automation control.
///
/// Run without a command to print the current wallpaper. Passing an existing
/// image file as the only argument sets it.
#[derive(Parser, Debug)]
#[command(name = "backdrop")]
#[command(author, version = APP_VERSION, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to a custom configuration file.
    ///
    /// Overrides the default configuration file search paths.
    /// Supports JSONC format (JSON with comments).
    #[arg(long, short, global = true, value_name = "PATH")]
    pub config: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
#[command(next_display_order = None)]
pub enum Commands {
    /// Set a specific image as the wallpaper.
    ///
    /// Paints the image, regenerates the color palette, reloads themed
    /// components and derives every configured effect.
    Set {
        /// The image to use.
        #[arg(value_name = "PATH")]
        path: PathBuf,
    },

    /// Set a random wallpaper, optionally from a category.
    ///
    /// A category is a subdirectory of the wallpaper directory.
    #[command(visible_alias = "s")]
    Shuffle {
        /// Subdirectory to pick from.
        category: Option<String>,
    },

    /// Shuffle the wallpaper every <INTERVAL> seconds in the background.
    ///
    /// Replaces any running automation. An interval of 0 stops it.
    #[command(
        visible_alias = "a",
        after_long_help = r#"Examples:
  backdrop auto 300          # New wallpaper every five minutes
  backdrop auto 600 nature   # Only from the nature category
  backdrop auto 0            # Stop automation"#
    )]
    Auto {
        /// Seconds between wallpapers, 0 to stop.
        interval: u64,

        /// Subdirectory to pick from.
        category: Option<String>,
    },

    /// Show whether automation is running.
    Status,

    /// Regenerate the color palette from the current wallpaper.
    #[command(visible_alias = "c")]
    Color,

    /// Paint the current wallpaper again.
    ///
    /// Only the display step runs. Useful after logging in.
    #[command(visible_alias = "r")]
    Restore,

    /// Pull the wallpaper repository, cloning it if needed.
    #[command(visible_alias = "u")]
    Update,

    /// List the available wallpapers.
    List {
        /// Subdirectory to list.
        category: Option<String>,

        /// Print a JSON array instead of one path per line.
        #[arg(long)]
        json: bool,
    },

    /// Remove every cached artifact and state file.
    #[command(name = "clear-cache")]
    ClearCache,

    /// Set every wallpaper in turn so that all effects are cached.
    #[command(name = "fill-cache")]
    FillCache {
        /// Seconds to wait between wallpapers.
        #[arg(default_value_t = 2.0)]
        interval: f64,
    },

    /// Configuration file management commands.
    #[command(subcommand)]
    Config(ConfigCommands),

    /// Output the configuration JSON Schema.
    ///
    /// Can be redirected to a file for use with editors that support JSON
    /// Schema validation.
    Schema,

    /// Generate shell completions.
    ///
    /// Usage:
    ///   eval "$(backdrop completions --shell zsh)"
    ///   backdrop completions --shell fish > ~/.config/fish/completions/backdrop.fish
    Completions {
        /// The shell to generate completions for.
        #[arg(long, short, value_enum)]
        shell: Shell,
    },

    /// Run the automation loop in the foreground.
    #[command(name = LOOP_COMMAND, hide = true)]
    Loop {
        /// Seconds between wallpapers.
        interval: NonZeroU64,

        /// Subdirectory to pick from.
        category: Option<String>,
    },
}

impl Cli {
    /// Returns the custom config path if specified via --config flag.
    #[must_use]
    pub fn config_path(&self) -> Option<PathBuf> { self.config.as_ref().map(PathBuf::from) }

    /// Execute the CLI command.
    ///
    /// # Errors
    ///
    /// Returns an error if the command execution fails.
    pub fn execute(&self) -> Result<(), BackdropError> {
        if let Some(path) = self.config_path() {
            if !path.exists() {
                return Err(BackdropError::InvalidArguments(format!(
                    "Configuration file not found: {}",
                    path.display()
                )));
            }
            config::set_custom_config_path(path);
        }

        let Some(command) = &self.command else {
            return wallpaper::execute_current(&engine());
        };

        match command {
            Commands::Set { path } => wallpaper::execute_set(&engine(), path),
            Commands::Shuffle { category } => {
                wallpaper::execute_shuffle(&engine(), category.as_deref())
            }
            Commands::Auto { interval, category } => {
                let engine = engine();
                automation::execute_auto(
                    &engine,
                    &controller(&engine)?,
                    *interval,
                    category.as_deref(),
                )
            }
            Commands::Status => {
                let engine = engine();
                automation::execute_status(&controller(&engine)?)
            }
            Commands::Color => wallpaper::execute_color(&engine()),
            Commands::Restore => wallpaper::execute_restore(&engine()),
            Commands::Update => wallpaper::execute_update(&engine()),
            Commands::List { category, json } => {
                wallpaper::execute_list(&engine(), category.as_deref(), *json)
            }
            Commands::ClearCache => {
                let engine = engine();
                cache::execute_clear(&engine, &controller(&engine)?)
            }
            Commands::FillCache { interval } => wallpaper::execute_fill_cache(&engine(), *interval),
            Commands::Config(cmd) => config_cmd::execute(cmd),
            Commands::Schema => {
                println!("{}", schema::print_schema());
                Ok(())
            }
            Commands::Completions { shell } => {
                Self::print_completions(*shell);
                Ok(())
            }
            Commands::Loop { interval, category } => {
                let engine = engine();
                automation::execute_loop(&engine, &controller(&engine)?, *interval, category.clone())
            }
        }
    }

    /// Print shell completions to stdout.
    fn print_completions<G: Generator>(generator: G) {
        let mut cmd = Self::command();
        generate(generator, &mut cmd, APP_NAME, &mut io::stdout());
    }
}

/// Builds the engine from the loaded configuration and environment.
#[must_use]
pub fn engine() -> WallpaperEngine { WallpaperEngine::system(config::resolve(config::get_config())) }

/// Builds the automation controller sharing `engine`'s state.
fn controller(engine: &WallpaperEngine) -> Result<AutomationController, BackdropError> {
    let supervisor = ProcessSupervisor::current(config::custom_config_path().cloned())?;
    Ok(AutomationController::new(Arc::new(supervisor), engine.state()))
}

#[cfg(test)]
mod tests {
    use super::*;

    // ========================================================================
    // CLI parsing tests
    // ========================================================================

    #[test]
    fn test_cli_parses_no_command() {
        let cli = Cli::try_parse_from(["backdrop"]).unwrap();
        assert!(cli.command.is_none());
        assert!(cli.config.is_none());
    }

    #[test]
    fn test_cli_parses_set() {
        let cli = Cli::try_parse_from(["backdrop", "set", "/walls/a.png"]).unwrap();
        match cli.command {
            Some(Commands::Set { path }) => assert_eq!(path, PathBuf::from("/walls/a.png")),
            _ => panic!("Expected Set command"),
        }
    }

    #[test]
    fn test_cli_set_requires_path() {
        assert!(Cli::try_parse_from(["backdrop", "set"]).is_err());
    }

    #[test]
    fn test_cli_parses_shuffle_alias_with_category() {
        let cli = Cli::try_parse_from(["backdrop", "s", "nature"]).unwrap();
        match cli.command {
            Some(Commands::Shuffle { category }) => assert_eq!(category.as_deref(), Some("nature")),
            _ => panic!("Expected Shuffle command"),
        }
    }

    #[test]
    fn test_cli_parses_shuffle_without_category() {
        let cli = Cli::try_parse_from(["backdrop", "shuffle"]).unwrap();
        assert!(matches!(cli.command, Some(Commands::Shuffle { category: None })));
    }

    #[test]
    fn test_cli_parses_auto() {
        let cli = Cli::try_parse_from(["backdrop", "auto", "300", "space"]).unwrap();
        match cli.command {
            Some(Commands::Auto { interval, category }) => {
                assert_eq!(interval, 300);
                assert_eq!(category.as_deref(), Some("space"));
            }
            _ => panic!("Expected Auto command"),
        }
    }

    #[test]
    fn test_cli_parses_auto_zero_alias() {
        let cli = Cli::try_parse_from(["backdrop", "a", "0"]).unwrap();
        assert!(matches!(cli.command, Some(Commands::Auto { interval: 0, category: None })));
    }

    #[test]
    fn test_cli_auto_rejects_non_numeric_interval() {
        assert!(Cli::try_parse_from(["backdrop", "auto", "soon"]).is_err());
        assert!(Cli::try_parse_from(["backdrop", "auto", "-5"]).is_err());
    }

    #[test]
    fn test_cli_parses_short_aliases() {
        let color = Cli::try_parse_from(["backdrop", "c"]).unwrap();
        assert!(matches!(color.command, Some(Commands::Color)));

        let restore = Cli::try_parse_from(["backdrop", "r"]).unwrap();
        assert!(matches!(restore.command, Some(Commands::Restore)));

        let update = Cli::try_parse_from(["backdrop", "u"]).unwrap();
        assert!(matches!(update.command, Some(Commands::Update)));
    }

    #[test]
    fn test_cli_parses_status() {
        let cli = Cli::try_parse_from(["backdrop", "status"]).unwrap();
        assert!(matches!(cli.command, Some(Commands::Status)));
    }

    #[test]
    fn test_cli_parses_list_json() {
        let cli = Cli::try_parse_from(["backdrop", "list", "--json"]).unwrap();
        match cli.command {
            Some(Commands::List { category, json }) => {
                assert!(category.is_none());
                assert!(json);
            }
            _ => panic!("Expected List command"),
        }
    }

    #[test]
    fn test_cli_parses_clear_cache() {
        let cli = Cli::try_parse_from(["backdrop", "clear-cache"]).unwrap();
        assert!(matches!(cli.command, Some(Commands::ClearCache)));
    }

    #[test]
    fn test_cli_parses_fill_cache_default_interval() {
        let cli = Cli::try_parse_from(["backdrop", "fill-cache"]).unwrap();
        match cli.command {
            Some(Commands::FillCache { interval }) => assert!((interval - 2.0).abs() < f64::EPSILON),
            _ => panic!("Expected FillCache command"),
        }
    }

    #[test]
    fn test_cli_parses_fill_cache_interval() {
        let cli = Cli::try_parse_from(["backdrop", "fill-cache", "0.5"]).unwrap();
        match cli.command {
            Some(Commands::FillCache { interval }) => assert!((interval - 0.5).abs() < f64::EPSILON),
            _ => panic!("Expected FillCache command"),
        }
    }

    #[test]
    fn test_cli_parses_config_init() {
        let cli = Cli::try_parse_from(["backdrop", "config", "init", "--stdout"]).unwrap();
        assert!(matches!(
            cli.command,
            Some(Commands::Config(ConfigCommands::Init { stdout: true, .. }))
        ));
    }

    #[test]
    fn test_cli_parses_schema() {
        let cli = Cli::try_parse_from(["backdrop", "schema"]).unwrap();
        assert!(matches!(cli.command, Some(Commands::Schema)));
    }

    #[test]
    fn test_cli_parses_completions_zsh() {
        let cli = Cli::try_parse_from(["backdrop", "completions", "--shell", "zsh"]).unwrap();
        match cli.command {
            Some(Commands::Completions { shell }) => assert_eq!(shell, Shell::Zsh),
            _ => panic!("Expected Completions command"),
        }
    }

    #[test]
    fn test_cli_parses_hidden_loop() {
        let cli = Cli::try_parse_from(["backdrop", "_loop", "60", "space"]).unwrap();
        match cli.command {
            Some(Commands::Loop { interval, category }) => {
                assert_eq!(interval.get(), 60);
                assert_eq!(category.as_deref(), Some("space"));
            }
            _ => panic!("Expected Loop command"),
        }
    }

    #[test]
    fn test_cli_loop_rejects_zero_interval() {
        assert!(Cli::try_parse_from(["backdrop", "_loop", "0"]).is_err());
    }

    #[test]
    fn test_cli_loop_is_hidden_from_help() {
        let help = Cli::command().render_long_help().to_string();
        assert!(!help.contains(LOOP_COMMAND));
        assert!(help.contains("shuffle"));
    }

    // ========================================================================
    // Global flag tests
    // ========================================================================

    #[test]
    fn test_cli_parses_global_config_after_subcommand() {
        let cli = Cli::try_parse_from(["backdrop", "shuffle", "--config", "/tmp/b.jsonc"]).unwrap();
        assert_eq!(cli.config_path(), Some(PathBuf::from("/tmp/b.jsonc")));
    }

    #[test]
    fn test_cli_parses_global_config_before_loop() {
        let cli =
            Cli::try_parse_from(["backdrop", "--config", "/tmp/b.jsonc", "_loop", "5"]).unwrap();
        assert_eq!(cli.config_path(), Some(PathBuf::from("/tmp/b.jsonc")));
        assert!(matches!(cli.command, Some(Commands::Loop { .. })));
    }

    #[test]
    fn test_execute_rejects_missing_config_file() {
        let cli = Cli::try_parse_from([
            "backdrop",
            "--config",
            "/definitely/not/here/config.jsonc",
            "schema",
        ])
        .unwrap();

        let err = cli.execute().unwrap_err();
        assert!(err.to_string().contains("Configuration file not found"));
    }

    #[test]
    fn test_cli_debug_assert() {
        Cli::command().debug_assert();
    }
}
