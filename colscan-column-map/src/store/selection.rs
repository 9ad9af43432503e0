use std::fmt;
use std::ops::Range;

use colscan_storage::RowId;
use croaring::Treemap;

/// The live row-index set of one query.
///
/// Starts as every stored row and only ever shrinks.
#[derive(Clone, PartialEq)]
pub struct RowSelection {
    rows: Treemap,
}

impl RowSelection {
    /// All rows `[0, row_count)`.
    pub fn full(row_count: u64) -> Self {
        Self {
            rows: Treemap::from_iter(0..row_count),
        }
    }

    pub fn empty() -> Self {
        Self {
            rows: Treemap::new(),
        }
    }

    pub fn from_treemap(rows: Treemap) -> Self {
        Self { rows }
    }

    #[inline]
    pub fn contains(&self, row: RowId) -> bool {
        self.rows.contains(row)
    }

    pub fn len(&self) -> u64 {
        self.rows.cardinality()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Row ids in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = RowId> + '_ {
        self.rows.iter()
    }

    pub fn to_vec(&self) -> Vec<RowId> {
        self.rows.iter().collect()
    }

    pub fn remove(&mut self, row: RowId) {
        self.rows.remove(row);
    }

    pub fn remove_range(&mut self, range: Range<RowId>) {
        if range.start < range.end {
            self.rows.remove_range(range);
        }
    }

    /// Keep only rows also present in `other`.
    pub fn intersect_with(&mut self, other: &RowSelection) {
        self.rows = &self.rows & &other.rows;
    }

    pub fn is_subset_of(&self, other: &RowSelection) -> bool {
        self.rows.iter().all(|row| other.contains(row))
    }

    pub fn as_treemap(&self) -> &Treemap {
        &self.rows
    }

    pub fn into_treemap(self) -> Treemap {
        self.rows
    }
}

impl FromIterator<RowId> for RowSelection {
    fn from_iter<I: IntoIterator<Item = RowId>>(iter: I) -> Self {
        Self {
            rows: Treemap::from_iter(iter),
        }
    }
}

impl fmt::Debug for RowSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RowSelection")
            .field("len", &self.len())
            .finish()
    }
}
