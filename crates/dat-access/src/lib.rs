//! Typed field and pointer access on top of `dat-core`'s byte codec.
//!
//! A thin, generic layer that lets callers read and write big-endian
//! fields and follow typed pointers without re-deriving the byte offsets
//! by hand. Game-specific struct layouts built on top of this kind of
//! layer (joints, meshes, materials, map headers) are not reproduced
//! here.

use std::marker::PhantomData;

use dat_core::{DatFile, DatResult, Offset};

/// A typed, nullable pointer field: the big-endian `u32` offset stored at
/// `field_offset`, tagged with the Rust type `T` it is expected to point
/// at. Offset `0` is the format's null value.
#[derive(Debug)]
pub struct Ref<T> {
    field_offset: Offset,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Clone for Ref<T> {
    fn clone(&self) -> Self {
        *self
    }
}
impl<T> Copy for Ref<T> {}

impl<T> PartialEq for Ref<T> {
    fn eq(&self, other: &Self) -> bool {
        self.field_offset == other.field_offset
    }
}
impl<T> Eq for Ref<T> {}

impl<T> Ref<T> {
    /// Wraps `field_offset`, the location of the pointer field itself
    /// (not the pointee).
    #[must_use]
    pub fn at(field_offset: Offset) -> Self {
        Self {
            field_offset,
            _marker: PhantomData,
        }
    }

    #[must_use]
    pub fn field_offset(self) -> Offset {
        self.field_offset
    }

    /// Reads the pointer value stored at this field. `Ok(0)` means null.
    pub fn read(self, dat: &DatFile) -> DatResult<Offset> {
        dat.read_u32(self.field_offset)
    }

    /// Returns `true` if the stored pointer value is the null offset `0`.
    pub fn is_null(self, dat: &DatFile) -> DatResult<bool> {
        Ok(self.read(dat)? == 0)
    }

    /// Installs `target` as the pointer value of this field via
    /// [`DatFile::set_ref`], so the relocation table stays consistent.
    pub fn set(self, dat: &mut DatFile, target: Offset) -> DatResult<()> {
        dat.set_ref(self.field_offset, target)
    }
}

/// A big-endian scalar field readable/writable at an arbitrary offset.
/// Implemented for the primitive widths the format's structs are built
/// from; callers needing a new scalar kind implement this trait rather
/// than hand-rolling offset math.
pub trait FieldType: Sized {
    fn read_field(dat: &DatFile, offset: Offset) -> DatResult<Self>;
    fn write_field(dat: &mut DatFile, offset: Offset, value: Self) -> DatResult<()>;
}

impl FieldType for u8 {
    fn read_field(dat: &DatFile, offset: Offset) -> DatResult<Self> {
        dat.read_u8(offset)
    }
    fn write_field(dat: &mut DatFile, offset: Offset, value: Self) -> DatResult<()> {
        dat.write_u8(offset, value)
    }
}

impl FieldType for u16 {
    fn read_field(dat: &DatFile, offset: Offset) -> DatResult<Self> {
        dat.read_u16(offset)
    }
    fn write_field(dat: &mut DatFile, offset: Offset, value: Self) -> DatResult<()> {
        dat.write_u16(offset, value)
    }
}

impl FieldType for u32 {
    fn read_field(dat: &DatFile, offset: Offset) -> DatResult<Self> {
        dat.read_u32(offset)
    }
    fn write_field(dat: &mut DatFile, offset: Offset, value: Self) -> DatResult<()> {
        dat.write_u32(offset, value)
    }
}

impl FieldType for i16 {
    fn read_field(dat: &DatFile, offset: Offset) -> DatResult<Self> {
        Ok(dat.read_u16(offset)? as i16)
    }
    fn write_field(dat: &mut DatFile, offset: Offset, value: Self) -> DatResult<()> {
        dat.write_u16(offset, value as u16)
    }
}

impl FieldType for i32 {
    fn read_field(dat: &DatFile, offset: Offset) -> DatResult<Self> {
        Ok(dat.read_u32(offset)? as i32)
    }
    fn write_field(dat: &mut DatFile, offset: Offset, value: Self) -> DatResult<()> {
        dat.write_u32(offset, value as u32)
    }
}

/// A big-endian IEEE-754 single-precision float, stored as a plain bit
/// pattern rather than reinterpreted through a native `f32` load.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct F32(pub f32);

impl FieldType for F32 {
    fn read_field(dat: &DatFile, offset: Offset) -> DatResult<Self> {
        Ok(F32(f32::from_bits(dat.read_u32(offset)?)))
    }
    fn write_field(dat: &mut DatFile, offset: Offset, value: Self) -> DatResult<()> {
        dat.write_u32(offset, value.0.to_bits())
    }
}

/// Convenience methods for reading/writing [`FieldType`]s and following
/// [`Ref`] pointers directly against a [`DatFile`], so call sites read as
/// field access rather than offset arithmetic.
pub trait DatFileExt {
    fn read_field<T: FieldType>(&self, offset: Offset) -> DatResult<T>;
    fn write_field<T: FieldType>(&mut self, offset: Offset, value: T) -> DatResult<()>;

    /// Reads `r`'s pointer value and then the `T` stored at that offset.
    fn deref_ref<T: FieldType>(&self, r: Ref<T>) -> DatResult<T>;
}

impl DatFileExt for DatFile {
    fn read_field<T: FieldType>(&self, offset: Offset) -> DatResult<T> {
        T::read_field(self, offset)
    }

    fn write_field<T: FieldType>(&mut self, offset: Offset, value: T) -> DatResult<()> {
        T::write_field(self, offset, value)
    }

    fn deref_ref<T: FieldType>(&self, r: Ref<T>) -> DatResult<T> {
        let target = r.read(self)?;
        T::read_field(self, target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn typed_field_round_trips() {
        let mut dat = DatFile::new();
        let obj = dat.alloc(8).unwrap();
        dat.write_field(obj, 0x1234_5678u32).unwrap();
        assert_eq!(dat.read_field::<u32>(obj).unwrap(), 0x1234_5678);
    }

    #[test]
    fn f32_round_trips_by_bit_pattern() {
        let mut dat = DatFile::new();
        let obj = dat.alloc(4).unwrap();
        dat.write_field(obj, F32(1.5)).unwrap();
        assert_eq!(dat.read_field::<F32>(obj).unwrap(), F32(1.5));
    }

    #[test]
    fn ref_field_follows_pointer() {
        let mut dat = DatFile::new();
        let target = dat.alloc(4).unwrap();
        dat.write_field(target, 99u32).unwrap();

        let holder = dat.alloc(4).unwrap();
        let r: Ref<u32> = Ref::at(holder);
        r.set(&mut dat, target).unwrap();

        assert!(!r.is_null(&dat).unwrap());
        assert_eq!(dat.deref_ref(r).unwrap(), 99u32);
    }

    #[test]
    fn ref_field_detects_null() {
        let mut dat = DatFile::new();
        let holder = dat.alloc(4).unwrap();
        let r: Ref<u32> = Ref::at(holder);
        assert!(r.is_null(&dat).unwrap());
    }
}
