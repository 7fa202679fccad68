//! Chunk orderer.
//!
//! Assigns every code chunk in the bundle a unique ascending order index by
//! depth-first traversal: a chunk's imported chunks are registered before
//! the chunk itself, so the result is a topological order of the chunk
//! import relation. Non-chunk assets and unknown import names are skipped.
//!
//! The order is what makes import injection deterministic: when the
//! aggregator prepends `@import` links for a chunk's dependencies, it sorts
//! them by this index, and because dependencies are processed first their
//! artifact names are already known.
//!
//! A cyclic import relation is rejected with [`BundleError::ChunkCycle`];
//! chunk graphs are required to be DAGs.

use std::collections::{HashMap, HashSet};

use crate::error::BundleError;
use crate::model::{Bundle, BundleItem};

// ---------------------------------------------------------------------------
// ChunkOrdering
// ---------------------------------------------------------------------------

/// Order indices for every chunk in a bundle, keyed by chunk file name.
///
/// Indices start at 1 and increase monotonically with each first
/// registration during the traversal.
#[derive(Clone, Debug, Default)]
pub struct ChunkOrdering {
    orders: HashMap<String, u32>,
}

impl ChunkOrdering {
    /// The order index assigned to a chunk, if it was visited.
    #[must_use]
    pub fn order_of(&self, chunk_file_name: &str) -> Option<u32> {
        self.orders.get(chunk_file_name).copied()
    }

    /// Chunk file names sorted by ascending order index.
    #[must_use]
    pub fn sorted_chunks(&self) -> Vec<String> {
        let mut names: Vec<(&String, u32)> =
            self.orders.iter().map(|(k, v)| (k, *v)).collect();
        names.sort_by_key(|(_, order)| *order);
        names.into_iter().map(|(name, _)| name.clone()).collect()
    }

    /// Number of ordered chunks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.orders.len()
    }

    /// Whether no chunks were ordered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }
}

// ---------------------------------------------------------------------------
// order_chunks
// ---------------------------------------------------------------------------

/// Walk the bundle and assign each chunk an order index, dependencies first.
///
/// # Errors
/// Returns [`BundleError::ChunkCycle`] if the chunk import relation contains
/// a cycle.
pub fn order_chunks(bundle: &Bundle) -> Result<ChunkOrdering, BundleError> {
    let mut ordering = ChunkOrdering::default();
    let mut visiting: HashSet<String> = HashSet::new();
    let mut next_order = 1u32;

    for file_name in bundle.file_names() {
        visit(bundle, file_name, &mut ordering, &mut visiting, &mut next_order)?;
    }
    Ok(ordering)
}

fn visit(
    bundle: &Bundle,
    file_name: &str,
    ordering: &mut ChunkOrdering,
    visiting: &mut HashSet<String>,
    next_order: &mut u32,
) -> Result<(), BundleError> {
    if ordering.orders.contains_key(file_name) {
        return Ok(());
    }
    let Some(chunk) = bundle.get(file_name).and_then(BundleItem::as_chunk) else {
        // Assets and unknown names carry no order.
        return Ok(());
    };
    if !visiting.insert(file_name.to_owned()) {
        return Err(BundleError::ChunkCycle {
            chunk: file_name.to_owned(),
        });
    }

    for dep in &chunk.imports {
        visit(bundle, dep, ordering, visiting, next_order)?;
    }

    visiting.remove(file_name);
    ordering.orders.insert(file_name.to_owned(), *next_order);
    *next_order += 1;
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
