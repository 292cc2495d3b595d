mod cli;
mod command;
mod error;
mod item_builder;

use clap::CommandFactory;
use clap::Parser;

#[tokio::main]
async fn main() -> error::Result<()> {
    color_eyre::install()?;
    tracing_subscriber::fmt::init();

    let command_line = cli::Cli::parse();
    let cfg = content_core::Config::load_or_default(&command_line.config);

    if let Some(command) = command_line.command {
        let cmd: Box<dyn command::Command> = match command {
            cli::Commands::Index { path } => Box::new(command::IndexCommand::new(cfg, path)),
            cli::Commands::Search { path, query, limit } => {
                Box::new(command::SearchCommand::new(cfg, path, query, limit))
            }
            cli::Commands::Watch { path } => Box::new(command::WatchCommand::new(cfg, path)),
        };
        cmd.execute().await?;
    } else {
        cli::Cli::command().print_help()?;
    }

    Ok(())
}
