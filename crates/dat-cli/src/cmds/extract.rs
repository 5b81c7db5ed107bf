use std::path::Path;

use anyhow::Context;
use dat_core::DatFile;

pub(crate) fn extract(src: &Path, dst: &Path, root_name: &str, dst_root_name: &str) -> anyhow::Result<()> {
    let src_bytes = std::fs::read(src).with_context(|| format!("reading {}", src.display()))?;
    let src_dat = dat_core::import(&src_bytes)
        .map_err(anyhow::Error::from)
        .with_context(|| format!("parsing {}", src.display()))?;

    let src_ref = src_dat
        .root_find(root_name)
        .map_err(anyhow::Error::from)
        .with_context(|| format!("looking up root \"{root_name}\" in {}", src.display()))?;

    let mut dst_dat = match std::fs::read(dst) {
        Ok(bytes) => dat_core::import(&bytes)
            .map_err(anyhow::Error::from)
            .with_context(|| format!("parsing {}", dst.display()))?,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => DatFile::new(),
        Err(e) => return Err(e).with_context(|| format!("reading {}", dst.display())),
    };

    let dst_ref = dst_dat
        .obj_copy(&src_dat, src_ref)
        .map_err(anyhow::Error::from)
        .context("copying object graph")?;

    dst_dat
        .root_add(dst_dat.root_count(), dst_ref, dst_root_name)
        .map_err(anyhow::Error::from)
        .context("registering root in destination")?;

    let bytes = dat_core::export(&dst_dat);
    std::fs::write(dst, bytes).with_context(|| format!("writing {}", dst.display()))?;

    log::info!(
        "copied root \"{root_name}\" from {} into {} as \"{dst_root_name}\"",
        src.display(),
        dst.display()
    );
    Ok(())
}
