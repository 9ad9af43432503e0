//! Fixed-capacity column blocks.
//!
//! A [`Block`] is the unit of storage and of zone-map pruning: an append-only
//! run of one column's values with a byte budget. Size accounting uses the
//! fixed per-kind costs from [`Value::byte_size`] rather than an exact encoding.
//!
//! When zone mapping is enabled the block keeps the running min/max of the
//! numeric values it has seen. Text values never widen the bounds, so a block
//! holding only text has no summary and is never pruned.

use crate::constants::DEFAULT_BLOCK_SIZE;
use crate::range_op::RangeOp;
use crate::types::BlockId;
use crate::value::{Value, widen_f32};

/// Inclusive min/max of the numeric values in a block.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ZoneBounds {
    pub min: f32,
    pub max: f32,
}

impl ZoneBounds {
    #[inline]
    fn seeded(v: f32) -> Self {
        Self { min: v, max: v }
    }

    #[inline]
    fn widen(&mut self, v: f32) {
        if v < self.min {
            self.min = v;
        }
        if v > self.max {
            self.max = v;
        }
    }

    #[inline]
    pub fn contains(&self, v: f64) -> bool {
        widen_f32(self.min) <= v && v <= widen_f32(self.max)
    }
}

#[derive(Clone, Debug)]
pub struct Block {
    id: BlockId,
    values: Vec<Value>,
    remaining_capacity: usize,
    zone_map: bool,
    bounds: Option<ZoneBounds>,
}

impl Block {
    pub fn new(id: BlockId, zone_map: bool) -> Self {
        Self::with_capacity(id, DEFAULT_BLOCK_SIZE, zone_map)
    }

    pub fn with_capacity(id: BlockId, capacity_bytes: usize, zone_map: bool) -> Self {
        Self {
            id,
            values: Vec::new(),
            remaining_capacity: capacity_bytes,
            zone_map,
            bounds: None,
        }
    }

    #[inline]
    pub fn id(&self) -> BlockId {
        self.id
    }

    /// Append `value`, charging `size` bytes against the budget.
    ///
    /// Callers check [`Block::is_able_to_add`] first; the budget saturates at
    /// zero instead of underflowing.
    pub fn add_data(&mut self, value: Value, size: usize) {
        if self.zone_map
            && let Value::Float(v) = &value
        {
            match self.bounds.as_mut() {
                Some(bounds) => bounds.widen(*v),
                None => self.bounds = Some(ZoneBounds::seeded(*v)),
            }
        }
        self.values.push(value);
        self.remaining_capacity = self.remaining_capacity.saturating_sub(size);
    }

    #[inline]
    pub fn is_able_to_add(&self, size: usize) -> bool {
        size <= self.remaining_capacity
    }

    #[inline]
    pub fn remaining_capacity(&self) -> usize {
        self.remaining_capacity
    }

    #[inline]
    pub fn values(&self) -> &[Value] {
        &self.values
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    #[inline]
    pub fn has_zone_map(&self) -> bool {
        self.zone_map
    }

    #[inline]
    pub fn bounds(&self) -> Option<ZoneBounds> {
        self.bounds
    }

    pub fn min(&self) -> Option<f32> {
        self.bounds.map(|b| b.min)
    }

    pub fn max(&self) -> Option<f32> {
        self.bounds.map(|b| b.max)
    }

    /// False only when the summary proves `value` cannot be in this block.
    pub fn is_in_zone(&self, value: &Value) -> bool {
        if !self.zone_map {
            return true;
        }
        match (self.bounds, value.as_f64()) {
            (Some(bounds), Some(v)) => bounds.contains(v),
            _ => true,
        }
    }

    /// False only when no value in this block can satisfy `value <op> threshold`.
    pub fn may_satisfy(&self, op: RangeOp, threshold: f64) -> bool {
        if !self.zone_map {
            return true;
        }
        match self.bounds {
            Some(b) => op.may_overlap(widen_f32(b.min), widen_f32(b.max), threshold),
            None => true,
        }
    }
}
