//! Builds the "MEX function" object that the PowerPC game loader expects a
//! linked code object to look like, using `dat-core`'s mutation API.
//!
//! This crate does not parse ELF, invoke a compiler, or apply
//! relocations against linked code — it takes already-resolved code
//! bytes and a function-pointer table (whatever upstream tooling parsed
//! out of a compiled `.o`) and lays them out as a DAT object, then
//! installs it as a root.

use dat_core::{DatFile, Offset};

/// `(symbol_idx, elf_offset)` — one entry of the function-pointer table
/// that follows the code object, identifying an exported function by its
/// index into the caller's symbol table and its byte offset within the
/// code blob.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FnTableEntry {
    pub symbol_idx: u32,
    pub elf_offset: u32,
}

/// A reason [`build_mex_function`] could not complete.
#[derive(Debug, thiserror::Error)]
pub enum LinkError {
    #[error("building MEX function object: {0}")]
    Dat(#[from] dat_core::DatError),
    /// `fn_table` had more entries than fit in a `u32` count field.
    #[error("function table has {0} entries, which does not fit in a u32 count")]
    TooManyFunctions(usize),
}

const MEX_FUNCTION_SIZE: u32 = 0x20;
const FN_TABLE_ENTRY_SIZE: u32 = 8;

/// Allocates `code` and `fn_table` as objects in `dat`, then a 0x20-byte
/// MEX function header pointing at both, and registers it as a root named
/// `symbol_name`. Returns the offset of the MEX function header.
///
/// Relocations within `code` are not applied by this crate (see the crate
/// doc comment); the code bytes are written verbatim.
pub fn build_mex_function(
    dat: &mut DatFile,
    code: &[u8],
    fn_table: &[FnTableEntry],
    symbol_name: &str,
) -> Result<Offset, LinkError> {
    let fn_table_count: u32 = fn_table
        .len()
        .try_into()
        .map_err(|_| LinkError::TooManyFunctions(fn_table.len()))?;

    let code_offset = dat.alloc(code.len() as u32)?;
    for (i, &byte) in code.iter().enumerate() {
        dat.write_u8(code_offset + i as u32, byte)?;
    }

    let fn_table_size = fn_table_count * FN_TABLE_ENTRY_SIZE;
    let fn_table_offset = dat.alloc(fn_table_size)?;
    for (i, entry) in fn_table.iter().enumerate() {
        let entry_offset = fn_table_offset + i as u32 * FN_TABLE_ENTRY_SIZE;
        dat.write_u32(entry_offset, entry.symbol_idx)?;
        dat.write_u32(entry_offset + 4, entry.elf_offset)?;
    }

    let fn_obj = dat.alloc(MEX_FUNCTION_SIZE)?;
    dat.set_ref(fn_obj, code_offset)?;
    dat.set_ref(fn_obj + 0x0C, fn_table_offset)?;
    dat.write_u32(fn_obj + 0x10, fn_table_count)?;
    dat.write_u32(fn_obj + 0x14, code.len() as u32)?;
    dat.write_u32(fn_obj + 0x18, 0)?; // debug symbol count
    dat.write_u32(fn_obj + 0x1C, 0)?; // debug symbol pointer

    dat.root_add(dat.root_count(), fn_obj, symbol_name)?;

    log::debug!(
        "built MEX function \"{symbol_name}\" at {fn_obj:#x}: {} code bytes, {fn_table_count} table entries",
        code.len()
    );

    Ok(fn_obj)
}
