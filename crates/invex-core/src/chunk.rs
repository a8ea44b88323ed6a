//! Fixed-size chunking of ordered sequences.
//!
//! The tree renderer uses this to lay long `values` arrays out in rows.

use crate::error::InvexError;
use std::num::NonZeroUsize;

/// Split `items` into `ceil(len / size)` borrowed chunks, in order. The last
/// chunk may be shorter.
pub fn chunked<T>(items: &[T], size: NonZeroUsize) -> std::slice::Chunks<'_, T> {
    items.chunks(size.get())
}

/// [`chunked`] for sizes coming from user input or configuration.
pub fn try_chunked<T>(items: &[T], size: usize) -> Result<std::slice::Chunks<'_, T>, InvexError> {
    NonZeroUsize::new(size)
        .map(|size| chunked(items, size))
        .ok_or(InvexError::InvalidChunkSize)
}
