//! Command-line interface.
//!
//! With no subcommand the TUI starts; `config` and `completions` print and exit.

mod completions;

use crate::config::Config;
use crate::utils::default_config_path;
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use clap_complete::Shell;
use indoc::printdoc;
use std::path::PathBuf;

/// Log a classroom screen in to the grading portal and submit homework images
#[derive(Parser, Debug)]
#[command(name = "hwsubmit", version, about, long_about = None, disable_help_subcommand = true)]
pub struct Cli {
    /// Config file to use instead of the default location
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Portal base URL for this run, e.g. https://school.example/system
    #[arg(long, value_name = "URL")]
    pub base_url: Option<String>,

    /// Screen id to pre-fill on the login form
    #[arg(long, value_name = "ID")]
    pub screen_id: Option<String>,

    /// Disable colours (same as NO_COLOR=1)
    #[arg(long)]
    pub no_colors: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the config file location and the effective configuration
    Config,
    /// Generate shell completions
    Completions {
        /// Shell to generate for; detected from $SHELL when omitted
        shell: Option<Shell>,
    },
}

impl Cli {
    pub fn config_path(&self) -> PathBuf {
        self.config.clone().unwrap_or_else(default_config_path)
    }

    /// Load the config file and apply this run's overrides.
    pub fn load_config(&self) -> Result<Config> {
        let path = self.config_path();
        let config = Config::load_or_create(&path)
            .with_context(|| format!("Failed to load configuration from {:?}", path))?;
        Ok(config.with_overrides(self.base_url.clone(), self.screen_id.clone()))
    }

    /// Run a subcommand. Returns false when there is none and the TUI should start.
    pub fn execute(&self) -> Result<bool> {
        match &self.command {
            Some(Commands::Config) => {
                self.cmd_config()?;
                Ok(true)
            }
            Some(Commands::Completions { shell }) => {
                completions::generate(*shell)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn cmd_config(&self) -> Result<()> {
        let config = self.load_config()?;
        let rendered =
            toml::to_string_pretty(&config).context("Failed to serialize configuration")?;
        printdoc! {"
            # Config file: {path}
            # Passwords are never stored here.

            {rendered}",
            path = self.config_path().display(),
            rendered = rendered,
        };
        Ok(())
    }
}
