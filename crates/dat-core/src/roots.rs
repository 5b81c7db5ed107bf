//! Root management. Externs share `root_info`'s shape but have no
//! add/remove API here: they are populated only by [`crate::codec::import`]
//! and read directly off [`DatFile::externs`].

use dat_errors::{DatError, DatResult};

use crate::container::{reserve_doubling, DatFile, Offset, SymbolRef};

impl DatFile {
    /// Inserts a root at `index` (appending is `index == root_count`),
    /// recording `data_offset` and the NUL-terminated bytes of `symbol`
    /// (appended to the symbol pool).
    pub fn root_add(&mut self, index: usize, data_offset: Offset, symbol: &str) -> DatResult<()> {
        if data_offset % 4 != 0 {
            return Err(DatError::InvalidAlignment);
        }
        if index > self.root_info.len() {
            return Err(DatError::OutOfBounds);
        }

        let symbol_offset = self.symbols.len() as Offset;
        let needed = self.symbols.len() + symbol.len() + 1;
        reserve_doubling(&mut self.symbols, needed, 4 * 1024)?;
        self.symbols.extend_from_slice(symbol.as_bytes());
        self.symbols.push(0);

        self.root_info.insert(
            index,
            SymbolRef {
                data_offset,
                symbol_offset,
            },
        );
        Ok(())
    }

    /// Removes the root at `index`, shifting subsequent roots left. The
    /// symbol bytes are left in place in the pool.
    pub fn root_remove(&mut self, index: usize) -> DatResult<()> {
        if index >= self.root_info.len() {
            return Err(DatError::OutOfBounds);
        }
        self.root_info.remove(index);
        Ok(())
    }

    /// Linear scan for a root whose symbol matches `name` exactly.
    pub fn root_find(&self, name: &str) -> DatResult<Offset> {
        for root in &self.root_info {
            if self.symbol_at(root.symbol_offset) == Some(name) {
                return Ok(root.data_offset);
            }
        }
        Err(DatError::NotFound)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn root_insertion_scenario() {
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
        assert_eq!(
            names,
            vec![(r1, "root1"), (r2, "root2"), (r3, "root3")]
        );

        dat.root_remove(1).unwrap();
        let names: Vec<_> = dat
            .roots()
            .iter()
            .map(|r| (r.data_offset, dat.symbol_at(r.symbol_offset).unwrap()))
            .collect();
        assert_eq!(names, vec![(r1, "root1"), (r3, "root3")]);
    }

    #[test]
    fn root_find_matches_by_name() {
        let mut dat = DatFile::new();
        let r1 = dat.alloc(4).unwrap();
        dat.root_add(0, r1, "map_head").unwrap();
        assert_eq!(dat.root_find("map_head"), Ok(r1));
        assert_eq!(dat.root_find("missing"), Err(DatError::NotFound));
    }

    #[test]
    fn root_add_rejects_misaligned_offset() {
        let mut dat = DatFile::new();
        assert_eq!(
            dat.root_add(0, 1, "x"),
            Err(DatError::InvalidAlignment)
        );
    }

    #[test]
    fn root_remove_orphans_symbol_bytes_but_stays_valid() {
        let mut dat = DatFile::new();
        let r1 = dat.alloc(4).unwrap();
        let r2 = dat.alloc(4).unwrap();
        dat.root_add(0, r1, "first").unwrap();
        dat.root_add(1, r2, "second").unwrap();
        dat.root_remove(0).unwrap();
        assert_eq!(dat.root_count(), 1);
        assert_eq!(dat.symbol_at(dat.roots()[0].symbol_offset), Some("second"));
    }
}
