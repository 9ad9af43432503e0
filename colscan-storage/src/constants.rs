/// Byte budget of a freshly opened block.
pub const DEFAULT_BLOCK_SIZE: usize = 8192;

/// Accounted size of a numeric cell.
pub const FLOAT_BYTES: usize = 4;

// VARCHAR(22) plus two bytes of length overhead.
pub const VARCHAR_BYTES: usize = 24;
