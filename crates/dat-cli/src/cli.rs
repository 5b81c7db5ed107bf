mod dump;
mod extract;

use clap::Parser;

#[derive(Parser)]
pub(crate) struct Cli {
    #[clap(subcommand)]
    command: Cmd,
}

impl Cli {
    pub(crate) fn run(&self) -> anyhow::Result<()> {
        match &self.command {
            Cmd::Dump(dump) => dump.run(),
            Cmd::Extract(extract) => extract.run(),
        }
    }
}

#[derive(clap::Subcommand)]
enum Cmd {
    /// Print the roots, externs, and object table of a DAT file.
    #[clap(name = "dump")]
    Dump(dump::Dump),

    /// Copy the subgraph reachable from a named root in one DAT file into
    /// another, adding it as a root under (optionally) a new name.
    #[clap(name = "extract")]
    Extract(extract::Extract),
}
