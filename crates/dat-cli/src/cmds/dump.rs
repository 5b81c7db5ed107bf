use std::path::Path;

use anyhow::Context;

pub(crate) fn dump(file: &Path) -> anyhow::Result<()> {
    let bytes = std::fs::read(file)
        .with_context(|| format!("reading {}", file.display()))?;
    let dat = dat_core::import(&bytes)
        .map_err(anyhow::Error::from)
        .with_context(|| format!("parsing {}", file.display()))?;

    let mut out = String::new();
    dat.dump_to(&mut out).expect("writing to a String cannot fail");
    print!("{out}");
    Ok(())
}
