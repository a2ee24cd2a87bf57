use clap::Parser;

mod cli;
mod commands;
mod logging;

fn main() -> anyhow::Result<()> {
    let cli = cli::Cli::parse_from(cli::normalize_args(std::env::args_os()));
    logging::init(cli.verbose, cli.log.as_deref())?;
    commands::run(cli).inspect_err(|e| tracing::error!("{e:#}"))
}
