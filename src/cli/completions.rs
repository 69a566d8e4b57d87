use super::Cli;
use anyhow::{bail, Result};
use clap::CommandFactory;
use clap_complete::Shell;

/// Write completions for `shell` (or the shell detected from the environment) to stdout.
pub fn generate(shell: Option<Shell>) -> Result<()> {
    let Some(shell) = shell.or_else(Shell::from_env) else {
        bail!("Could not detect your shell; pass it explicitly, e.g. `hwsubmit completions zsh`");
    };

    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    clap_complete::generate(shell, &mut cmd, name, &mut std::io::stdout());
    Ok(())
}
