//! Import/export codec. Bit-exact against the on-disk, all-big-endian
//! layout:
//!
//! | Offset | Field                            | Width |
//! |--------|-----------------------------------|-------|
//! | 0x00   | `file_size`                       | u32   |
//! | 0x04   | `data_size`                       | u32   |
//! | 0x08   | `reloc_count`                     | u32   |
//! | 0x0C   | `root_count`                      | u32   |
//! | 0x10   | `extern_count`                     | u32   |
//! | 0x14   | version + padding (zero on write)  | 12    |
//! | 0x20   | `data`                              | `data_size` |
//! | —      | `reloc_targets`                    | `4 * reloc_count` |
//! | —      | `root_info`                        | `8 * root_count`  |
//! | —      | `extern_info`                       | `8 * extern_count`|
//! | —      | `symbols`                           | remainder up to `file_size` |

use dat_errors::{DatError, DatResult};

use crate::byteio;
use crate::container::{reserve_doubling, DatFile, Offset, SymbolRef, IMPORT_DATA_CAPACITY};

const HEADER_SIZE: usize = 0x20;

/// Validates that a side-table starting at `offset`, holding `count`
/// entries of `entry_size` bytes each, ends at or before `file_size`.
/// Returns the end offset on success, or [`DatError::InvalidSize`] if the
/// header's self-reported counts would run past the file — guarding every
/// later slice/read against a malformed (not just truncated) header.
fn checked_table_end(
    offset: usize,
    count: usize,
    entry_size: usize,
    file_size: usize,
) -> DatResult<usize> {
    let table_bytes = count.checked_mul(entry_size).ok_or(DatError::InvalidSize)?;
    let end = offset.checked_add(table_bytes).ok_or(DatError::InvalidSize)?;
    if end > file_size {
        return Err(DatError::InvalidSize);
    }
    Ok(end)
}

/// Parses a DAT file from `file`, which must be at least as long as the
/// file's own `file_size` header field.
pub fn import(file: &[u8]) -> DatResult<DatFile> {
    if file.len() < HEADER_SIZE {
        return Err(DatError::InvalidSize);
    }

    let file_size = byteio::read_u32(file, 0x00) as usize;
    let data_size = byteio::read_u32(file, 0x04) as usize;
    let reloc_count = byteio::read_u32(file, 0x08) as usize;
    let root_count = byteio::read_u32(file, 0x0C) as usize;
    let extern_count = byteio::read_u32(file, 0x10) as usize;

    if file_size > file.len() {
        return Err(DatError::InvalidSize);
    }

    // Every side-table's end offset is validated against `file_size` before
    // it is used to index `file`, so a header lying about its own table
    // sizes fails with `InvalidSize` instead of panicking on an
    // out-of-range slice.
    let data_end = checked_table_end(HEADER_SIZE, data_size, 1, file_size)?;
    let reloc_end = checked_table_end(data_end, reloc_count, 4, file_size)?;
    let root_end = checked_table_end(reloc_end, root_count, 8, file_size)?;
    let extern_end = checked_table_end(root_end, extern_count, 8, file_size)?;

    let mut dat = DatFile::new();

    // data ------------------------------------------------------------
    reserve_doubling(&mut dat.data, data_size, IMPORT_DATA_CAPACITY)?;
    dat.data.extend_from_slice(&file[HEADER_SIZE..data_end]);

    // reloc table -------------------------------------------------------
    let reloc_offset = data_end;
    reserve_doubling(&mut dat.reloc_targets, reloc_count * 2, 64)?;
    for i in 0..reloc_count {
        let entry_offset = reloc_offset + i * 4;
        dat.reloc_targets.push(byteio::read_u32(file, entry_offset));
    }
    dat.reloc_targets.sort_unstable();

    // root table ----------------------------------------------------
    let root_offset = reloc_end;
    for i in 0..root_count {
        let entry_offset = root_offset + i * 8;
        dat.root_info.push(SymbolRef {
            data_offset: byteio::read_u32(file, entry_offset),
            symbol_offset: byteio::read_u32(file, entry_offset + 4),
        });
    }
    dat.root_info.sort_unstable_by_key(|r| r.data_offset);

    // extern table --------------------------------------------------
    let extern_offset = root_end;
    for i in 0..extern_count {
        let entry_offset = extern_offset + i * 8;
        dat.extern_info.push(SymbolRef {
            data_offset: byteio::read_u32(file, entry_offset),
            symbol_offset: byteio::read_u32(file, entry_offset + 4),
        });
    }
    dat.extern_info.sort_unstable_by_key(|r| r.data_offset);

    // symbol pool -----------------------------------------------------
    let symbol_offset = extern_end;
    dat.symbols.extend_from_slice(&file[symbol_offset..file_size]);

    // derived object index --------------------------------------------
    let mut objects: Vec<Offset> = Vec::with_capacity(reloc_count + root_count + extern_count);
    for &r in &dat.reloc_targets {
        let r = r as usize;
        if r.checked_add(4).is_none_or(|end| end > dat.data.len()) {
            return Err(DatError::InvalidSize);
        }
        objects.push(byteio::read_u32(&dat.data, r));
    }
    for root in &dat.root_info {
        objects.push(root.data_offset);
    }
    for ext in &dat.extern_info {
        objects.push(ext.data_offset);
    }
    objects.sort_unstable();
    objects.dedup();
    dat.objects = objects;

    log::debug!(
        "imported dat: data_size={data_size} reloc_count={reloc_count} root_count={root_count} extern_count={extern_count} object_count={}",
        dat.objects.len()
    );

    Ok(dat)
}

/// The maximum number of bytes [`export`] could produce for `dat`, so a
/// caller that wants to preallocate a buffer knows how large to make it.
#[must_use]
pub fn export_max_size(dat: &DatFile) -> usize {
    HEADER_SIZE
        + dat.data.len()
        + dat.reloc_targets.len() * 4
        + dat.root_info.len() * 8
        + dat.extern_info.len() * 8
        + dat.symbols.len()
}

/// Serializes `dat` to its on-disk byte layout, bit-exact with what
/// [`import`] would read back.
#[must_use]
pub fn export(dat: &DatFile) -> Vec<u8> {
    let mut out = Vec::with_capacity(export_max_size(dat));

    out.extend_from_slice(&[0u8; HEADER_SIZE]);
    byteio::write_u32(&mut out, 0x04, dat.data.len() as u32);
    byteio::write_u32(&mut out, 0x08, dat.reloc_targets.len() as u32);
    byteio::write_u32(&mut out, 0x0C, dat.root_info.len() as u32);
    byteio::write_u32(&mut out, 0x10, dat.extern_info.len() as u32);
    // 0x14..0x20 (version + padding) is already zero.

    out.extend_from_slice(&dat.data);

    for &r in &dat.reloc_targets {
        let mut buf = [0u8; 4];
        byteio::write_u32(&mut buf, 0, r);
        out.extend_from_slice(&buf);
    }

    for root in &dat.root_info {
        let mut buf = [0u8; 8];
        byteio::write_u32(&mut buf, 0, root.data_offset);
        byteio::write_u32(&mut buf, 4, root.symbol_offset);
        out.extend_from_slice(&buf);
    }

    for ext in &dat.extern_info {
        let mut buf = [0u8; 8];
        byteio::write_u32(&mut buf, 0, ext.data_offset);
        byteio::write_u32(&mut buf, 4, ext.symbol_offset);
        out.extend_from_slice(&buf);
    }

    out.extend_from_slice(&dat.symbols);

    let file_size = out.len() as u32;
    byteio::write_u32(&mut out, 0x00, file_size);

    log::debug!("exported dat: file_size={file_size}");

    out
}
