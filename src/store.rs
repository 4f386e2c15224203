// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Exposed Entity Store - append-only reveal log.
//!
//! The only output surface of the engine. Consumers read it; only the reveal
//! path writes it.
//!
//! # Invariants
//! - Elements appear in catalog order
//! - Nothing is ever removed or reordered
//! - Null slots never land here, even if a caller hands one in

use alloc::vec::Vec;

#[derive(Clone, Debug, PartialEq)]
pub struct ExposedStore<E> {
    entries: Vec<E>,
}

impl<E> ExposedStore<E> {
    pub fn new() -> Self {
        Self { entries: Vec::new() }
    }

    /// Appends a revealed entity. A `None` is filtered out and reported as `false`.
    pub fn append(&mut self, entity: Option<E>) -> bool {
        match entity {
            Some(entity) => {
                self.entries.push(entity);
                true
            }
            None => false,
        }
    }

    /// Current reveal log, oldest first.
    pub fn read(&self) -> &[E] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<E> Default for ExposedStore<E> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_append_filters_null() {
        let mut store = ExposedStore::new();
        assert!(store.append(Some(1)));
        assert!(!store.append(None));
        assert!(store.append(Some(2)));
        assert_eq!(store.read(), &[1, 2]);
    }
}
