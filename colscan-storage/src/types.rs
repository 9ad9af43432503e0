/// Stable identifier handed to a block when it is opened.
/// Zone maps key their entries by this id.
pub type BlockId = u64;

/// Position of a row in storage order.
pub type RowId = u64;
