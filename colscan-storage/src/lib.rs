//! Storage primitives for the colscan column store.
//!
//! Data is held column-wise in fixed-capacity [`Block`]s. A table is either a
//! set of per-column block chains or a set of [`Partition`]s keyed by a
//! partition-column value; both layouts live in a [`Disk`] as
//! [`StorageUnit`] variants. Nothing here is persistent: "disk" names the role,
//! not the medium.

pub mod block;
pub mod constants;
pub mod disk;
pub mod partition;
pub mod range_op;
pub mod types;
pub mod value;

pub use block::{Block, ZoneBounds};
pub use constants::{DEFAULT_BLOCK_SIZE, FLOAT_BYTES, VARCHAR_BYTES};
pub use disk::{Disk, StorageUnit};
pub use partition::Partition;
pub use range_op::RangeOp;
pub use types::{BlockId, RowId};
pub use value::{Value, widen_f32};
