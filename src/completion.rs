//! # Shell Completion Module
//!
//! ```bash
//! songmatch completion bash > ~/.local/share/bash-completion/completions/songmatch
//! songmatch completion zsh > ~/.config/zsh/completions/_songmatch
//! ```

use crate::cli::{Args, Shell};
use anyhow::{Context, Result};
use clap::CommandFactory;
use clap_complete::{generate, Shell as CompletionShell};
use std::io::Write;

/// Write the completion script for `shell` to `out`.
pub fn generate_completions(shell: Shell, out: &mut dyn Write) -> Result<()> {
    let mut cmd = Args::command();
    let name = cmd.get_name().to_string();
    generate(shell_to_completion_shell(shell), &mut cmd, name, out);
    out.flush().context("Failed to write completion script")
}

#[must_use]
pub const fn shell_to_completion_shell(shell: Shell) -> CompletionShell {
    match shell {
        Shell::Bash => CompletionShell::Bash,
        Shell::Zsh => CompletionShell::Zsh,
        Shell::Fish => CompletionShell::Fish,
        Shell::PowerShell => CompletionShell::PowerShell,
        Shell::Elvish => CompletionShell::Elvish,
    }
}
