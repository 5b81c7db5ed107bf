//! Black-box coverage of the container's core behaviors, exercised only
//! through `dat-core`'s public API.

use dat_core::{export, import, DatError, DatFile};

#[test]
fn alloc_alignment() {
    let mut dat = DatFile::new();
    let o1 = dat.alloc(256).unwrap();
    let o2 = dat.alloc(33).unwrap();
    let o3 = dat.alloc(0).unwrap();
    let o4 = dat.alloc(8).unwrap();

    assert_eq!((o1, o2, o3, o4), (0, 256, 292, 292));
    assert_eq!(dat.object_count(), 4);
}

#[test]
fn root_insertion() {
    let mut dat = DatFile::new();
    let r1 = dat.alloc(4).unwrap();
    let r2 = dat.alloc(4).unwrap();
    let r3 = dat.alloc(4).unwrap();

    dat.root_add(0, r2, "root2").unwrap();
    dat.root_add(1, r3, "root3").unwrap();
    dat.root_add(0, r1, "root1").unwrap();

    let names: Vec<_> = dat
        .roots()
        .iter()
        .map(|r| (r.data_offset, dat.symbol_at(r.symbol_offset).unwrap()))
        .collect();
    assert_eq!(names, vec![(r1, "root1"), (r2, "root2"), (r3, "root3")]);

    dat.root_remove(1).unwrap();
    let names: Vec<_> = dat
        .roots()
        .iter()
        .map(|r| (r.data_offset, dat.symbol_at(r.symbol_offset).unwrap()))
        .collect();
    assert_eq!(names, vec![(r1, "root1"), (r3, "root3")]);
}

#[test]
fn pointer_install() {
    let mut dat = DatFile::new();
    let r1 = dat.alloc(64).unwrap();
    let r2 = dat.alloc(64).unwrap();
    let r3 = dat.alloc(64).unwrap();
    let r4 = dat.alloc(64).unwrap();

    dat.set_ref(r1, r2).unwrap();
    dat.set_ref(r2 + 4, r3).unwrap();
    dat.set_ref(r2 + 8, r4).unwrap();

    assert_eq!(dat.reloc_targets(), &[r1, r2 + 4, r2 + 8]);
    assert_eq!(
        [dat.read_u32(r1).unwrap(), dat.read_u32(r2 + 4).unwrap(), dat.read_u32(r2 + 8).unwrap()],
        [r2, r3, r4]
    );

    dat.remove_ref(r2 + 4).unwrap();
    assert_eq!(dat.reloc_targets(), &[r1, r2 + 8]);
}

#[test]
fn cyclic_copy() {
    let mut src = DatFile::new();
    let r1 = src.alloc(4).unwrap();
    let r2 = src.alloc(16).unwrap();
    let r3 = src.alloc(4).unwrap();
    let r4 = src.alloc(4).unwrap();

    src.set_ref(r1, r2).unwrap();
    src.set_ref(r2, r2).unwrap();
    src.set_ref(r2 + 4, r3).unwrap();
    src.set_ref(r2 + 8, r4).unwrap();
    src.set_ref(r4, r1).unwrap();

    let mut dst = DatFile::new();
    dst.obj_copy(&src, r1).unwrap();

    assert_eq!(dst.object_count(), 4);
    assert_eq!(dst.reloc_targets().len(), 5);
}

#[test]
fn byte_endianness() {
    let mut dat = DatFile::new();
    let r = dat.alloc(64).unwrap();
    dat.write_u32(r, 0x1234_5678).unwrap();
    assert_eq!(&dat.data()[r as usize..r as usize + 4], &[0x12, 0x34, 0x56, 0x78]);
}

#[test]
fn import_export_bit_equality() {
    let mut dat = DatFile::new();
    let a = dat.alloc(20).unwrap();
    let b = dat.alloc(12).unwrap();
    let c = dat.alloc(4).unwrap();
    dat.set_ref(a, b).unwrap();
    dat.set_ref(a + 4, c).unwrap();
    dat.write_u32(c, 7).unwrap();
    dat.root_add(0, a, "entry_point").unwrap();

    let first = export(&dat);
    let reimported = import(&first).unwrap();
    let second = export(&reimported);

    assert_eq!(first, second);
}

#[test]
fn import_rejects_a_buffer_shorter_than_its_own_declared_size() {
    let mut dat = DatFile::new();
    dat.alloc(8).unwrap();
    let bytes = export(&dat);
    assert_eq!(import(&bytes[..bytes.len() - 1]), Err(DatError::InvalidSize));
}
