//! Stack growth for deeply nested syntax trees.
//!
//! Size estimation, splitting and reference evaluation all recurse over the
//! tree. Generated code routinely produces left-deep operator chains thousands
//! of levels deep, so every recursive entry point wraps itself in
//! [`ensure_sufficient_stack`].
//!
//! - **Red zone**: 128KB. Below this much remaining stack, a new segment is allocated.
//! - **Segment size**: 2MB per growth.

/// Remaining stack below which we grow.
const RED_ZONE: usize = 128 * 1024;

/// Size of each newly allocated stack segment.
const SEGMENT_SIZE: usize = 2 * 1024 * 1024;

/// Run `f`, growing the stack first if less than the red zone remains.
#[inline]
#[cfg(not(target_arch = "wasm32"))]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    stacker::maybe_grow(RED_ZONE, SEGMENT_SIZE, f)
}

/// WASM manages its own stack.
#[inline]
#[cfg(target_arch = "wasm32")]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    f()
}

#[cfg(test)]
mod tests;
