//! Style-module collector.
//!
//! Finds the style fragments reachable from one chunk: for each module the
//! chunk contains (in the host's listing order), the collector inspects that
//! module's imports and keeps the ones classified as style fragments. The
//! result is the aggregation input — it captures style fragments pulled in
//! through ordinary module imports, independent of the chunk graph.
//!
//! Encounter order is preserved and duplicates are kept; if two modules of
//! the chunk import the same style fragment, its text appears twice in the
//! merged artifact.

use crate::host::ModuleGraph;
use crate::model::{ModuleId, ModuleKind, OutputChunk};

/// Collect the style-fragment module ids reachable from `chunk`, in
/// encounter order, without de-duplication.
#[must_use]
pub fn collect_style_modules(chunk: &OutputChunk, graph: &dyn ModuleGraph) -> Vec<ModuleId> {
    let mut styles = Vec::new();
    for module_id in &chunk.modules {
        let Some(record) = graph.module(module_id) else {
            continue;
        };
        for import in &record.imports {
            if graph.module(import).is_some_and(|r| r.kind == ModuleKind::Style) {
                styles.push(import.clone());
            }
        }
    }
    styles
}

/// The style-fragment module ids listed directly in `chunk`'s own module
/// set.
///
/// Used by import injection, which links a dependency chunk's artifact once
/// per style module that chunk carries.
#[must_use]
pub fn own_style_modules(chunk: &OutputChunk, graph: &dyn ModuleGraph) -> Vec<ModuleId> {
    chunk
        .modules
        .iter()
        .filter(|id| graph.module(id).is_some_and(|r| r.kind == ModuleKind::Style))
        .cloned()
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
