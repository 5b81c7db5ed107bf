//! Recursive object-graph copy.
//!
//! Uses an explicit worklist instead of native recursion, so a deep or
//! cyclic graph cannot blow the stack, and a `HashMap` for the src → dst
//! lookup instead of a linear scan over a parallel-array lookup.

use std::collections::HashMap;

use dat_errors::{DatError, DatResult};

use crate::container::{DatFile, Offset};

impl DatFile {
    /// Copies the object graph reachable from `src_ref` in `src` into
    /// `self`, returning the destination offset of the copied root object.
    ///
    /// Objects reachable more than once (including through a cycle) are
    /// copied exactly once; every pointer into the copied subgraph is
    /// rewritten to point at its corresponding destination object. `src`'s
    /// roots and externs are not consulted — only the relocation table
    /// bounds the walk.
    ///
    /// On failure, objects already copied before the failing step remain
    /// in `self` — a partial copy is not rolled back.
    pub fn obj_copy(&mut self, src: &DatFile, src_ref: Offset) -> DatResult<Offset> {
        if src_ref as usize >= src.data.len() {
            return Err(DatError::OutOfBounds);
        }

        let mut seen: HashMap<Offset, Offset> = HashMap::new();
        let dst_root = self.copy_one(src, src_ref, &mut seen)?;

        let mut worklist: Vec<Offset> = vec![src_ref];
        while let Some(src_obj) = worklist.pop() {
            let (obj_start, obj_size) = src.obj_location(src_obj)?;
            let obj_end = obj_start + obj_size;
            let dst_obj = *seen.get(&src_obj).expect("pushed after being recorded in seen");

            let mut reloc_i = src.reloc_idx(obj_start);
            while let Some(&src_child_ref_offset) = src.reloc_targets.get(reloc_i) {
                if src_child_ref_offset >= obj_end {
                    break;
                }

                let src_child_ref = src.read_u32(src_child_ref_offset)?;
                let dst_child_ref = match seen.get(&src_child_ref) {
                    Some(&existing) => existing,
                    None => {
                        let copied = self.copy_one(src, src_child_ref, &mut seen)?;
                        worklist.push(src_child_ref);
                        copied
                    }
                };

                let dst_child_ref_offset = dst_obj + (src_child_ref_offset - obj_start);
                self.set_ref(dst_child_ref_offset, dst_child_ref)?;

                reloc_i += 1;
            }
        }

        Ok(dst_root)
    }

    /// Allocates and copies the bytes of the single object at `src_ref`,
    /// recording the mapping in `seen` before returning. Does not follow
    /// any child pointers — that is the worklist's job.
    fn copy_one(
        &mut self,
        src: &DatFile,
        src_ref: Offset,
        seen: &mut HashMap<Offset, Offset>,
    ) -> DatResult<Offset> {
        let (obj_start, obj_size) = src.obj_location(src_ref)?;
        let dst_ref = self.alloc(obj_size)?;

        let src_bytes = &src.data[obj_start as usize..(obj_start + obj_size) as usize];
        self.data[dst_ref as usize..(dst_ref + obj_size) as usize].copy_from_slice(src_bytes);

        seen.insert(src_ref, dst_ref);
        Ok(dst_ref)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn copies_flat_object() {
        let mut src = DatFile::new();
        let r = src.alloc(8).unwrap();
        src.write_u32(r, 0xCAFE_BABE).unwrap();

        let mut dst = DatFile::new();
        let copied = dst.obj_copy(&src, r).unwrap();

        assert_eq!(dst.read_u32(copied).unwrap(), 0xCAFE_BABE);
        assert_eq!(dst.object_count(), 1);
    }

    #[test]
    fn preserves_shared_child() {
        let mut src = DatFile::new();
        let child = src.alloc(4).unwrap();
        let p1 = src.alloc(4).unwrap();
        let p2 = src.alloc(4).unwrap();
        src.set_ref(p1, child).unwrap();
        src.set_ref(p2, child).unwrap();
        let root = src.alloc(8).unwrap();
        src.set_ref(root, p1).unwrap();
        src.set_ref(root + 4, p2).unwrap();

        let mut dst = DatFile::new();
        let dst_root = dst.obj_copy(&src, root).unwrap();

        let dst_p1 = dst.read_u32(dst_root).unwrap();
        let dst_p2 = dst.read_u32(dst_root + 4).unwrap();
        assert_eq!(dst.read_u32(dst_p1).unwrap(), dst.read_u32(dst_p2).unwrap());
        assert_eq!(dst.object_count(), 4);
    }

    /// r1 -> r2, r2 -> r2 (self), r2 -> r3, r2 -> r4, r4 -> r1, copying from
    /// r1. Expect 4 objects and 5 relocations in the destination, with the
    /// cycle intact.
    #[test]
    fn preserves_cycles() {
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
        let dst_r1 = dst.obj_copy(&src, r1).unwrap();

        assert_eq!(dst.object_count(), 4);
        assert_eq!(dst.reloc_targets().len(), 5);

        let dst_r2 = dst.read_u32(dst_r1).unwrap();
        assert_eq!(dst.read_u32(dst_r2).unwrap(), dst_r2);
        let dst_r4 = dst.read_u32(dst_r2 + 8).unwrap();
        assert_eq!(dst.read_u32(dst_r4).unwrap(), dst_r1);
    }

    #[test]
    fn does_not_consult_source_roots_or_externs() {
        let mut src = DatFile::new();
        let r = src.alloc(4).unwrap();
        src.root_add(0, r, "ignored").unwrap();

        let mut dst = DatFile::new();
        dst.obj_copy(&src, r).unwrap();

        assert_eq!(dst.root_count(), 0);
    }

    #[test]
    fn rejects_out_of_bounds_src_ref() {
        let src = DatFile::new();
        let mut dst = DatFile::new();
        assert_eq!(dst.obj_copy(&src, 0), Err(DatError::OutOfBounds));
    }
}
