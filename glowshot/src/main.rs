use anyhow::Result;
use clap::Parser;
use glowshot::cli::Cli;

fn main() -> Result<()> {
    glowshot::init_logger();
    glowshot::commands::run(Cli::parse())
}
