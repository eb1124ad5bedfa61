//! Size thresholds.
//!
//! All values are in estimator cost units. They are compile-time constants:
//! the ceiling is a property of the target format, not of the input.

/// Hard ceiling for one compiled unit.
pub const MAX_UNIT_SIZE: u32 = 65_535;

/// Trigger for splitting a unit. Half the hard ceiling leaves headroom for
/// code the estimator does not model precisely.
pub const SAFE_UNIT_SIZE: u32 = MAX_UNIT_SIZE / 2;

/// Largest expression (or list element) kept inline.
pub const MAX_INLINE_EXPR: u32 = 1_024;

/// Largest aggregate of a list literal kept inline.
pub const MAX_INLINE_LIST: u32 = 8_192;

/// Largest run of list elements conflated into one placeholder.
pub const MAX_SPLIT_CHUNK: u32 = 4_096;

/// Largest statement (or statement run) kept inline.
pub const MAX_INLINE_STMT: u32 = 8_192;

/// Cost of a placeholder in its parent: the call into the out-of-line unit.
pub const SPLIT_COST: u32 = 25;

/// String literals longer than this many bytes load in several pieces.
pub const STRING_CHUNK: usize = 32_768;

const _: () = assert!(SPLIT_COST < MAX_INLINE_EXPR);
const _: () = assert!(MAX_SPLIT_CHUNK <= MAX_INLINE_LIST);
const _: () = assert!(SAFE_UNIT_SIZE < MAX_UNIT_SIZE);
const _: () = assert!(MAX_INLINE_STMT < SAFE_UNIT_SIZE);
