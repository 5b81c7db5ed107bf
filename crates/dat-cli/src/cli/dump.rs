use std::path::PathBuf;

use clap::Parser;

use crate::cmds::dump::dump;

#[derive(Parser)]
pub(crate) struct Dump {
    /// Path to the DAT file to inspect.
    file: PathBuf,
}

impl Dump {
    pub(crate) fn run(&self) -> anyhow::Result<()> {
        dump(&self.file)
    }
}
