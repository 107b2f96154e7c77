//! Command-line overrides for the server binary.
use anyhow::{bail, Context, Result};

use stroke_core::config::Settings;

pub const USAGE: &str = "Usage: stroke-web [--model <path>] [--host <addr>] [--port <n>]";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CliAction {
    Serve,
    Help,
}

/// Apply `--model`, `--host` and `--port` on top of the loaded settings.
pub fn apply_args(settings: &mut Settings, args: &[String]) -> Result<CliAction> {
    let mut it = args.iter();
    while let Some(flag) = it.next() {
        let mut value = || it.next().with_context(|| format!("{flag} needs a value\n{USAGE}"));
        match flag.as_str() {
            "--model" => settings.model.path = value()?.clone(),
            "--host" => settings.server.host = value()?.clone(),
            "--port" => settings.server.port = value()?.parse().with_context(|| format!("Invalid port\n{USAGE}"))?,
            "-h" | "--help" => return Ok(CliAction::Help),
            other => bail!("Unknown argument: {other}\n{USAGE}"),
        }
    }
    Ok(CliAction::Serve)
}
