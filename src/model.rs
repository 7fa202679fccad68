//! Core data model for style-sheet aggregation.
//!
//! Foundation types shared across the engine: module identifiers, the
//! per-build style-fragment table, output chunks, and the bundle itself.
//!
//! The fragment table is an explicit context object owned by the build
//! invocation that produced it — never a process-wide singleton. It is
//! populated while the host processes individual modules and is read-only
//! once aggregation starts.

use std::collections::HashMap;
use std::fmt;

use indexmap::IndexMap;

use crate::mappings::SourceMapJson;

// ---------------------------------------------------------------------------
// ModuleId
// ---------------------------------------------------------------------------

/// Identifier of a source module, as assigned by the host's resolver.
///
/// Usually an absolute or root-relative file path, but the engine treats it
/// as an opaque key.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ModuleId(String);

impl ModuleId {
    /// Create a module identifier.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Return the identifier string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ModuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ModuleId {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

// ---------------------------------------------------------------------------
// ModuleKind / ModuleRecord
// ---------------------------------------------------------------------------

/// Classification attached to each module record at extraction time.
///
/// The collector consults this tag to decide whether an imported module is a
/// style fragment; there is no duck-typed probing of module metadata.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ModuleKind {
    /// Ordinary compiled code.
    #[default]
    Code,
    /// An extracted style fragment.
    Style,
}

/// Per-module metadata exposed by the host's module graph.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ModuleRecord {
    /// Whether this module is a style fragment.
    pub kind: ModuleKind,
    /// Identifiers of the modules this module imports, in source order.
    pub imports: Vec<ModuleId>,
}

impl ModuleRecord {
    /// Create a record with the given kind and imports.
    #[must_use]
    pub fn new(kind: ModuleKind, imports: Vec<ModuleId>) -> Self {
        Self { kind, imports }
    }
}

// ---------------------------------------------------------------------------
// StyleFragment / FragmentTable
// ---------------------------------------------------------------------------

/// The text (and optional source map) extracted from one style-sheet module.
///
/// `code` has already been stripped of any embedded map comment by the
/// extraction side; `map` is whatever map the extractor recovered, or `None`
/// if there was none (or it was malformed and dropped with a warning).
#[derive(Clone, Debug, PartialEq)]
pub struct StyleFragment {
    /// Raw style text.
    pub code: String,
    /// Source map for `code`, if one was recovered.
    pub map: Option<SourceMapJson>,
}

/// Per-build table of extracted style fragments, keyed by module identifier.
///
/// Insert-once: a module contributes at most one fragment per build.
/// Re-registering a module replaces its fragment, which is what happens when
/// the host re-transforms a module within the same watch session.
#[derive(Clone, Debug, Default)]
pub struct FragmentTable {
    entries: HashMap<ModuleId, StyleFragment>,
}

impl FragmentTable {
    /// Create an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the fragment extracted from `id`.
    pub fn insert(&mut self, id: ModuleId, fragment: StyleFragment) {
        self.entries.insert(id, fragment);
    }

    /// Look up the fragment for a module, if any.
    #[must_use]
    pub fn get(&self, id: &ModuleId) -> Option<&StyleFragment> {
        self.entries.get(id)
    }

    /// Number of registered fragments.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the table holds no fragments.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// ---------------------------------------------------------------------------
// OutputChunk / BundleItem / Bundle
// ---------------------------------------------------------------------------

/// One output unit of compiled code produced by the host's bundling step.
///
/// The engine reads most fields and mutates only `code` (placeholder
/// patching) and `imports` (extended with emitted artifact names).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OutputChunk {
    /// Logical chunk name, used for `[name]` substitution.
    pub name: String,
    /// Final file name of the chunk within the bundle.
    pub file_name: String,
    /// Whether this chunk is an entry point.
    pub is_entry: bool,
    /// Identifiers of the modules contained in this chunk, in the host's
    /// deterministic listing order.
    pub modules: Vec<ModuleId>,
    /// File names of other bundle entries this chunk imports. Extended with
    /// emitted style artifact names so downstream tooling can discover the
    /// dependency.
    pub imports: Vec<String>,
    /// Compiled code text. Patched in place when the placeholder token is
    /// substituted.
    pub code: String,
}

/// One entry of the output bundle: a code chunk or some other asset.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BundleItem {
    /// A code chunk participating in the chunk graph.
    Chunk(OutputChunk),
    /// A non-chunk asset; opaque to the engine and skipped by the orderer.
    Asset {
        /// Raw asset contents.
        source: String,
    },
}

impl BundleItem {
    /// Return the chunk if this item is one.
    #[must_use]
    pub fn as_chunk(&self) -> Option<&OutputChunk> {
        match self {
            Self::Chunk(chunk) => Some(chunk),
            Self::Asset { .. } => None,
        }
    }
}

/// The finished output set handed to the engine, keyed by file name.
///
/// Iteration order is insertion order — the host's own bundle order — which
/// keeps the orderer's traversal (and therefore artifact content)
/// deterministic across runs.
#[derive(Clone, Debug, Default)]
pub struct Bundle {
    items: IndexMap<String, BundleItem>,
}

impl Bundle {
    /// Create an empty bundle.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an item under its file name.
    pub fn insert(&mut self, file_name: impl Into<String>, item: BundleItem) {
        self.items.insert(file_name.into(), item);
    }

    /// Look up an item by file name.
    #[must_use]
    pub fn get(&self, file_name: &str) -> Option<&BundleItem> {
        self.items.get(file_name)
    }

    /// Look up a chunk mutably by file name.
    #[must_use]
    pub fn get_chunk_mut(&mut self, file_name: &str) -> Option<&mut OutputChunk> {
        match self.items.get_mut(file_name) {
            Some(BundleItem::Chunk(chunk)) => Some(chunk),
            _ => None,
        }
    }

    /// Iterate over `(file name, item)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &BundleItem)> {
        self.items.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// File names of all items, in insertion order.
    pub fn file_names(&self) -> impl Iterator<Item = &str> {
        self.items.keys().map(String::as_str)
    }

    /// Number of items in the bundle.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the bundle is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
