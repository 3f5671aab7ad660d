//! Compute-once cells for semantic nodes.
//!
//! Every lazily derived field of a node lives in one `Cached<T>`. The first
//! reader runs the compute function; concurrent readers block until the value
//! is published and then all observe the same result. When a field has both a
//! value and an error set, both live in one `Computed<V>` slot so a single
//! computation feeds both accessors.

use std::fmt;

use once_cell::sync::OnceCell;

use crate::error::EdmError;

pub struct Cached<T> {
    cell: OnceCell<T>,
}

impl<T> Cached<T> {
    pub const fn new() -> Self {
        Self {
            cell: OnceCell::new(),
        }
    }

    /// Return the cached value, computing it with `compute` on first access.
    ///
    /// `compute` must not read this same cell.
    pub fn get_or_compute(&self, compute: impl FnOnce() -> T) -> &T {
        self.cell.get_or_init(compute)
    }

    pub fn is_computed(&self) -> bool {
        self.cell.get().is_some()
    }
}

impl<T> Default for Cached<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: fmt::Debug> fmt::Debug for Cached<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.cell.get() {
            Some(value) => f.debug_tuple("Cached").field(value).finish(),
            None => f.write_str("Cached(<pending>)"),
        }
    }
}

/// Value and error set produced by one computation.
#[derive(Debug, Clone)]
pub struct Computed<V> {
    pub value: V,
    pub errors: Vec<EdmError>,
}

impl<V> Computed<V> {
    pub fn ok(value: V) -> Self {
        Self {
            value,
            errors: Vec::new(),
        }
    }

    pub fn with_errors(value: V, errors: Vec<EdmError>) -> Self {
        Self { value, errors }
    }
}
