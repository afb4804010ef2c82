//! Stack growth for recursive traversals.
//!
//! Mangled names and type references nest without a fixed bound (a
//! metatype of a metatype of ...). Every recursive walk in the reflection
//! crates goes through [`ensure_sufficient_stack`] so a pathological input
//! grows the stack instead of overflowing it.
//!
//! On wasm targets this is a passthrough.

/// Remaining stack below which a new segment is allocated (100KB).
const RED_ZONE: usize = 100 * 1024;

/// Size of each new stack segment (1MB).
const STACK_PER_RECURSION: usize = 1024 * 1024;

/// Run `f`, first growing the stack if less than the red zone remains.
#[inline]
#[cfg(not(target_arch = "wasm32"))]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    stacker::maybe_grow(RED_ZONE, STACK_PER_RECURSION, f)
}

/// WASM manages its own stack.
#[inline]
#[cfg(target_arch = "wasm32")]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    f()
}
