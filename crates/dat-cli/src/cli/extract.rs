use std::path::PathBuf;

use clap::Parser;

use crate::cmds::extract::extract;

#[derive(Parser)]
pub(crate) struct Extract {
    /// DAT file to copy a root out of.
    #[clap(long = "from")]
    src: PathBuf,

    /// DAT file to copy the root into. Created empty if it does not exist.
    #[clap(long = "into")]
    dst: PathBuf,

    /// Name of the root to copy, as it appears in `--from`'s root table.
    #[clap(long)]
    root: String,

    /// Name to give the root in `--into`, if different from `--root`.
    #[clap(long = "as")]
    root_as: Option<String>,
}

impl Extract {
    pub(crate) fn run(&self) -> anyhow::Result<()> {
        let dst_name = self.root_as.as_deref().unwrap_or(&self.root);
        extract(&self.src, &self.dst, &self.root, dst_name)
    }
}
