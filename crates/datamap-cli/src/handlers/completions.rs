//! Shell completions command handler

use crate::cli::CompletionsArgs;
use crate::error::Result;
use clap::CommandFactory;
use clap_complete::generate;
use std::io::{self, Write};

/// Handle the completions command
pub fn handle_completions(args: CompletionsArgs) -> Result<()> {
    write_completions(args, &mut io::stdout())
}

pub fn write_completions(args: CompletionsArgs, out: &mut dyn Write) -> Result<()> {
    let mut cmd = crate::cli::Cli::command();
    let name = cmd.get_name().to_string();
    generate(args.shell.to_clap_shell(), &mut cmd, name, out);
    Ok(())
}
