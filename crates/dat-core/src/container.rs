//! The in-memory DAT container and the invariants it must uphold.

/// A byte offset into [`DatFile::data`]. The format's substitute for a
/// pointer — always a plain, host-endian `u32` index; ownership lives
/// solely with the buffer it indexes.
pub type Offset = u32;

/// Default capacity reserved for `data` the first time it grows while the
/// container is being populated through the mutation API.
pub(crate) const MUTATION_DATA_CAPACITY: usize = 4 * 1024;

/// Default capacity reserved for `data` on import, to avoid repeated
/// reallocation while copying a (usually much larger) file in.
pub(crate) const IMPORT_DATA_CAPACITY: usize = 256 * 1024;

/// A named entry point into [`DatFile::data`]: a `(data_offset,
/// symbol_offset)` pair. Roots and externs share this exact shape —
/// `symbol_offset` indexes into [`DatFile::symbols`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SymbolRef {
    pub data_offset: Offset,
    pub symbol_offset: Offset,
}

/// A DAT container: the object heap plus the side-tables that describe it.
///
/// Created empty via [`DatFile::new`], populated by
/// [`crate::codec::import`] or the mutation API in [`crate::mutation`], and
/// reset to the empty state by [`DatFile::destroy`]. Every public operation
/// that returns [`Ok`] leaves every container invariant intact.
#[derive(Default, Clone)]
pub struct DatFile {
    /// The object heap. Always stored big-endian, so exported bytes are a
    /// direct copy.
    pub(crate) data: Vec<u8>,
    /// Offsets into `data` that each hold a 32-bit big-endian pointer into
    /// `data`. Strictly increasing; each offset appears at most once.
    pub(crate) reloc_targets: Vec<Offset>,
    /// Named entry points, in caller-visible (not necessarily sorted) order
    /// once the mutation API has touched them.
    pub(crate) root_info: Vec<SymbolRef>,
    /// Locations that should resolve against externally defined symbols.
    /// The core treats these opaquely; they are populated only by import.
    pub(crate) extern_info: Vec<SymbolRef>,
    /// A packed blob of NUL-terminated symbol names, indexed by
    /// `SymbolRef::symbol_offset`.
    pub(crate) symbols: Vec<u8>,
    /// A derived, sorted set of offsets marking the start of each distinct
    /// allocation in `data`. Not part of the serialized format.
    pub(crate) objects: Vec<Offset>,
}

impl DatFile {
    /// Creates an empty container. Does not allocate.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Frees every owned buffer and resets the container to the empty
    /// state. Safe to call more than once — it re-zeros an already-zeroed
    /// container.
    pub fn destroy(&mut self) {
        *self = Self::default();
    }

    #[must_use]
    pub fn data_size(&self) -> usize {
        self.data.len()
    }

    #[must_use]
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    #[must_use]
    pub fn reloc_targets(&self) -> &[Offset] {
        &self.reloc_targets
    }

    #[must_use]
    pub fn root_count(&self) -> usize {
        self.root_info.len()
    }

    #[must_use]
    pub fn roots(&self) -> &[SymbolRef] {
        &self.root_info
    }

    #[must_use]
    pub fn extern_count(&self) -> usize {
        self.extern_info.len()
    }

    #[must_use]
    pub fn externs(&self) -> &[SymbolRef] {
        &self.extern_info
    }

    #[must_use]
    pub fn symbols(&self) -> &[u8] {
        &self.symbols
    }

    #[must_use]
    pub fn object_count(&self) -> usize {
        self.objects.len()
    }

    #[must_use]
    pub fn objects(&self) -> &[Offset] {
        &self.objects
    }

    /// Reads the NUL-terminated string starting at `symbol_offset`, or
    /// `None` if the offset is out of range or unterminated.
    #[must_use]
    pub fn symbol_at(&self, symbol_offset: Offset) -> Option<&str> {
        let start = symbol_offset as usize;
        let bytes = self.symbols.get(start..)?;
        let len = bytes.iter().position(|&b| b == 0)?;
        std::str::from_utf8(&bytes[..len]).ok()
    }

    /// Writes a human-readable listing of roots, externs, and the object
    /// table to `out` — useful from a CLI `dump` subcommand or a failing
    /// test.
    pub fn dump_to(&self, out: &mut impl std::fmt::Write) -> std::fmt::Result {
        writeln!(
            out,
            "data_size={} reloc_count={} root_count={} extern_count={} object_count={}",
            self.data.len(),
            self.reloc_targets.len(),
            self.root_info.len(),
            self.extern_info.len(),
            self.objects.len()
        )?;
        for root in &self.root_info {
            writeln!(
                out,
                "root {:#x} \"{}\"",
                root.data_offset,
                self.symbol_at(root.symbol_offset).unwrap_or("<invalid>")
            )?;
        }
        for ext in &self.extern_info {
            writeln!(
                out,
                "extern {:#x} \"{}\"",
                ext.data_offset,
                self.symbol_at(ext.symbol_offset).unwrap_or("<invalid>")
            )?;
        }
        for &obj in &self.objects {
            writeln!(out, "object {obj:#x}")?;
        }
        Ok(())
    }
}

/// Prints buffer lengths rather than raw bytes — the contained `data`
/// blob can be hundreds of kilobytes, and its owning buffers are already
/// safe, so there's nothing a pointer dump would add that the lengths
/// don't already say.
impl std::fmt::Debug for DatFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DatFile")
            .field("data_size", &self.data.len())
            .field("reloc_count", &self.reloc_targets.len())
            .field("root_count", &self.root_info.len())
            .field("extern_count", &self.extern_info.len())
            .field("symbols_size", &self.symbols.len())
            .field("object_count", &self.objects.len())
            .finish()
    }
}

/// Grows `buf` to have room for at least `min_capacity` elements beyond its
/// current length, doubling from `floor` rather than growing by exactly the
/// amount requested — this growth policy is followed literally rather
/// than left to `Vec`'s own (unspecified) growth factor.
///
/// Returns [`dat_errors::DatError::AllocationFailure`] if the underlying
/// allocator cannot satisfy the request, rather than aborting the process
/// the way an infallible `Vec::reserve` would.
pub(crate) fn reserve_doubling<T>(
    buf: &mut Vec<T>,
    min_capacity: usize,
    floor: usize,
) -> dat_errors::DatResult<()> {
    if buf.capacity() >= min_capacity {
        return Ok(());
    }
    let mut new_cap = buf.capacity().max(floor).max(1);
    while new_cap < min_capacity {
        new_cap *= 2;
    }
    buf.try_reserve_exact(new_cap - buf.len())
        .map_err(|_| dat_errors::DatError::AllocationFailure)
}
