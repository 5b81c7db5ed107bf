//! Allocation, primitive read/write, and relocation maintenance — the
//! mutation API over the container model.

use dat_errors::{DatError, DatResult};

use crate::binary_search::lower_bound;
use crate::byteio;
use crate::container::{reserve_doubling, DatFile, Offset, MUTATION_DATA_CAPACITY};

#[must_use]
pub(crate) fn align_up(offset: usize, align: usize) -> usize {
    let rem = offset % align;
    if rem == 0 {
        offset
    } else {
        offset + (align - rem)
    }
}

impl DatFile {
    /// Allocates a new, uninitialized object of `size` bytes and returns
    /// its offset. Aligns the current end of `data` up to 4 before
    /// reserving, so the returned offset is always 4-byte aligned.
    ///
    /// `size == 0` is permitted: it yields a zero-length object at the
    /// aligned offset, and two such allocations may return the same
    /// offset.
    pub fn alloc(&mut self, size: u32) -> DatResult<Offset> {
        let aligned = align_up(self.data.len(), 4);
        let new_len = aligned
            .checked_add(size as usize)
            .ok_or(DatError::AllocationFailure)?;

        reserve_doubling(&mut self.data, new_len, MUTATION_DATA_CAPACITY)?;
        self.data.resize(new_len, 0);
        self.objects.push(aligned as Offset);

        Ok(aligned as Offset)
    }

    pub fn read_u8(&self, offset: Offset) -> DatResult<u8> {
        self.check_bounds(offset, 1)?;
        Ok(byteio::read_u8(&self.data, offset as usize))
    }

    pub fn write_u8(&mut self, offset: Offset, value: u8) -> DatResult<()> {
        self.check_bounds(offset, 1)?;
        byteio::write_u8(&mut self.data, offset as usize, value);
        Ok(())
    }

    pub fn read_u16(&self, offset: Offset) -> DatResult<u16> {
        self.check_aligned(offset, 2)?;
        self.check_bounds(offset, 2)?;
        Ok(byteio::read_u16(&self.data, offset as usize))
    }

    pub fn write_u16(&mut self, offset: Offset, value: u16) -> DatResult<()> {
        self.check_aligned(offset, 2)?;
        self.check_bounds(offset, 2)?;
        byteio::write_u16(&mut self.data, offset as usize, value);
        Ok(())
    }

    pub fn read_u32(&self, offset: Offset) -> DatResult<u32> {
        self.check_aligned(offset, 4)?;
        self.check_bounds(offset, 4)?;
        Ok(byteio::read_u32(&self.data, offset as usize))
    }

    pub fn write_u32(&mut self, offset: Offset, value: u32) -> DatResult<()> {
        self.check_aligned(offset, 4)?;
        self.check_bounds(offset, 4)?;
        byteio::write_u32(&mut self.data, offset as usize, value);
        Ok(())
    }

    /// Writes `to` big-endian at `data[from]` and ensures `from` is present
    /// in `reloc_targets`, preserving sorted order. Idempotent: calling
    /// this again with the same `(from, to)` leaves the container
    /// unchanged beyond the (already correct) write.
    pub fn set_ref(&mut self, from: Offset, to: Offset) -> DatResult<()> {
        self.check_aligned(from, 4)?;
        self.check_bounds(from, 4)?;
        if to as usize >= self.data.len() {
            return Err(DatError::OutOfBounds);
        }

        let idx = self.reloc_idx(from);
        if self.reloc_targets.get(idx) != Some(&from) {
            self.reloc_targets.insert(idx, from);
        }

        byteio::write_u32(&mut self.data, from as usize, to);
        Ok(())
    }

    /// Removes `from` from `reloc_targets` if present. Leaves the bytes at
    /// `data[from]` untouched.
    pub fn remove_ref(&mut self, from: Offset) -> DatResult<()> {
        self.check_aligned(from, 4)?;
        let idx = self.reloc_idx(from);
        if self.reloc_targets.get(idx) == Some(&from) {
            self.reloc_targets.remove(idx);
        }
        Ok(())
    }

    /// Returns the index where `offset` is found in `reloc_targets`, or the
    /// index at which it would need to be inserted.
    #[must_use]
    pub fn reloc_idx(&self, offset: Offset) -> usize {
        lower_bound(&self.reloc_targets, offset)
    }

    /// Returns the `(start, size)` of the allocated object containing
    /// `offset`.
    pub fn obj_location(&self, offset: Offset) -> DatResult<(Offset, u32)> {
        if self.objects.is_empty() {
            return Err(DatError::NotFound);
        }

        let mut idx = lower_bound(&self.objects, offset);
        if idx == self.objects.len() {
            idx -= 1;
        }
        if self.objects[idx] > offset {
            if idx == 0 {
                return Err(DatError::NotFound);
            }
            idx -= 1;
        }
        if self.objects[idx] > offset {
            return Err(DatError::NotFound);
        }

        let start = self.objects[idx];
        let end = self
            .objects
            .get(idx + 1)
            .copied()
            .unwrap_or(self.data.len() as Offset);
        Ok((start, end - start))
    }

    fn check_bounds(&self, offset: Offset, width: u32) -> DatResult<()> {
        let end = (offset as u64) + (width as u64);
        if end > self.data.len() as u64 {
            return Err(DatError::OutOfBounds);
        }
        Ok(())
    }

    fn check_aligned(&self, offset: Offset, width: u32) -> DatResult<()> {
        if offset % width != 0 {
            return Err(DatError::InvalidAlignment);
        }
        Ok(())
    }
}
