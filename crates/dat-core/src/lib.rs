//! An in-memory representation of the DAT binary container format, with a
//! bit-exact import/export codec, an offset-based allocator and relocation
//! table, and a cycle-safe object-graph copy.
//!
//! `dat-core` owns the container's invariants: `data` is
//! always stored big-endian; `reloc_targets` stays sorted and
//! deduplicated; `root_info`/`extern_info` pair a data offset with a
//! symbol-pool offset; and `objects` is a derived, sorted index of
//! allocation boundaries that every mutating operation keeps consistent.
//! Everything that produces or consumes a `DatFile` — ELF linking,
//! extraction, field access — lives in its own crate and talks to this one
//! only through the operations below.

mod binary_search;
mod byteio;
mod codec;
mod container;
mod copy;
mod mutation;
mod roots;

pub use codec::{export, export_max_size, import};
pub use container::{DatFile, Offset, SymbolRef};
pub use dat_errors::{DatError, DatResult};
