//! A CLI for inspecting and extracting objects from DAT containers.

mod cli;
mod cmds;

use clap::Parser;

use crate::cli::Cli;

fn main() -> anyhow::Result<()> {
    env_logger::init();
    Cli::parse().run()
}
