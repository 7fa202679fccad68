//! Content and map aggregation for one chunk.
//!
//! Concatenates the style fragments reachable from a chunk into one text
//! blob and composes their individual source maps into one merged map.
//!
//! # Map merging
//!
//! The merged map is built by splicing decoded line tables end to end, which
//! works because every fragment's text is appended with a trailing line
//! break. Two adjustments keep the arithmetic consistent:
//!
//! - The first fragment that contributes sources has the generated columns
//!   on its *first* line shifted by the number of characters already present
//!   in the merged text (the synthetic `@import` prefix, which carries no
//!   mappings of its own).
//! - Every later fragment has all of its segments' source indices rewritten
//!   to a single slot — the position its sources block starts at in the
//!   merged `sources` list. Fragments whose own map references several
//!   original sources lose that distinction; this collapsing is deliberate
//!   and kept for output compatibility, since the overwhelmingly common case
//!   is a one-source fragment map.

use std::collections::HashMap;
use std::path::Path;

use crate::collect::{collect_style_modules, own_style_modules};
use crate::config::Options;
use crate::error::BundleError;
use crate::host::{HostSink, ModuleGraph};
use crate::mappings::{self, LineTable, SourceMapJson};
use crate::model::{Bundle, BundleItem, FragmentTable, OutputChunk};
use crate::order::ChunkOrdering;
use crate::urls::relative_path;

// ---------------------------------------------------------------------------
// MergedStyles
// ---------------------------------------------------------------------------

/// The aggregated output for one chunk: final style text and, when map
/// composition is enabled, the merged map.
#[derive(Clone, Debug, Default)]
pub struct MergedStyles {
    /// Concatenated style text, one trailing line break per fragment.
    pub code: String,
    /// Merged source map, present only when `sourcemap` is enabled and at
    /// least one fragment carried a usable map.
    pub map: Option<SourceMapJson>,
}

// ---------------------------------------------------------------------------
// aggregate_chunk
// ---------------------------------------------------------------------------

/// Build the merged style text (and optional map) for `chunk`.
///
/// `emitted_artifacts` maps already-processed chunk file names to their
/// artifact names; chunks are processed in orderer-assigned order, so every
/// dependency's artifact is known by the time import injection needs it.
#[allow(clippy::too_many_arguments)]
pub fn aggregate_chunk(
    chunk: &OutputChunk,
    bundle: &Bundle,
    ordering: &ChunkOrdering,
    graph: &dyn ModuleGraph,
    fragments: &FragmentTable,
    opts: &Options,
    out_dir: Option<&Path>,
    emitted_artifacts: &HashMap<String, String>,
    sink: &mut dyn HostSink,
) -> MergedStyles {
    let mut code = String::new();

    if opts.inject_imports {
        inject_chunk_imports(chunk, bundle, ordering, graph, emitted_artifacts, &mut code);
    }

    let mut sources: Vec<String> = Vec::new();
    let mut sources_content: Vec<Option<String>> = Vec::new();
    let mut table: LineTable = Vec::new();

    for module_id in collect_style_modules(chunk, graph) {
        let Some(fragment) = fragments.get(&module_id) else {
            sink.warn(&format!(
                "style module '{module_id}' is referenced by chunk '{}' but no fragment was recorded for it",
                chunk.file_name
            ));
            continue;
        };

        if opts.sourcemap {
            if let Some(map) = &fragment.map {
                splice_fragment_map(
                    &module_id.to_string(),
                    map,
                    code.len(),
                    out_dir,
                    &mut sources,
                    &mut sources_content,
                    &mut table,
                    sink,
                );
            }
        }

        code.push_str(&fragment.code);
        code.push('\n');
    }

    let map = if opts.sourcemap && !sources.is_empty() {
        Some(SourceMapJson {
            version: 3,
            file: None,
            sources,
            sources_content,
            names: Vec::new(),
            mappings: mappings::encode_mappings(&table),
        })
    } else {
        None
    };

    MergedStyles { code, map }
}

/// Prepend one `@import` line per style module of every chunk the current
/// chunk imports, dependency-ordered.
///
/// The lines are plain text and carry no source-map entries.
fn inject_chunk_imports(
    chunk: &OutputChunk,
    bundle: &Bundle,
    ordering: &ChunkOrdering,
    graph: &dyn ModuleGraph,
    emitted_artifacts: &HashMap<String, String>,
    code: &mut String,
) {
    let chunk_dir = Path::new(&chunk.file_name)
        .parent()
        .map_or_else(|| Path::new("").to_path_buf(), Path::to_path_buf);

    let mut deps: Vec<(&str, u32)> = chunk
        .imports
        .iter()
        .filter_map(|dep| ordering.order_of(dep).map(|order| (dep.as_str(), order)))
        .collect();
    deps.sort_by_key(|(_, order)| *order);

    for (dep, _) in deps {
        let Some(dep_chunk) = bundle.get(dep).and_then(BundleItem::as_chunk) else {
            continue;
        };
        let Some(artifact) = emitted_artifacts.get(dep) else {
            continue;
        };
        let rel = relative_path(&chunk_dir, Path::new(artifact));
        for _style_id in own_style_modules(dep_chunk, graph) {
            code.push_str(&format!("@import '{rel}';\n"));
        }
    }
}

/// Splice one fragment's map into the running merged state.
///
/// `prefix_len` is the number of characters already present in the merged
/// text when the fragment is appended; it only affects the very first
/// contributing fragment.
#[allow(clippy::too_many_arguments)]
fn splice_fragment_map(
    module: &str,
    map: &SourceMapJson,
    prefix_len: usize,
    out_dir: Option<&Path>,
    sources: &mut Vec<String>,
    sources_content: &mut Vec<Option<String>>,
    table: &mut LineTable,
    sink: &mut dyn HostSink,
) {
    let slot = sources.len();

    let mut lines = match mappings::decode_mappings(&map.mappings) {
        Ok(lines) => lines,
        Err(e) => {
            // Recovered locally: the fragment contributes text but no
            // mapping entries.
            let err = BundleError::MapDecode {
                module: module.to_owned(),
                detail: e.to_string(),
            };
            sink.warn(&format!("{err}"));
            return;
        }
    };

    if slot == 0 {
        if let Some(first_line) = lines.first_mut() {
            let shift = i64::try_from(prefix_len).unwrap_or(i64::MAX);
            for segment in first_line {
                segment.generated_column += shift;
            }
        }
    } else {
        let slot = i64::try_from(slot).unwrap_or(i64::MAX);
        for segment in lines.iter_mut().flatten() {
            if let Some(src) = segment.src.as_mut() {
                src.source_index = slot;
            }
        }
    }

    for source in &map.sources {
        sources.push(resolve_source(source, out_dir));
    }
    for idx in 0..map.sources.len() {
        sources_content.push(map.sources_content.get(idx).cloned().flatten());
    }

    table.extend(lines);
}

/// Express a fragment source path relative to the output directory, so the
/// emitted map resolves correctly from where the artifact lives.
fn resolve_source(source: &str, out_dir: Option<&Path>) -> String {
    match out_dir {
        Some(dir) if Path::new(source).is_absolute() => relative_path(dir, Path::new(source)),
        _ => source.to_owned(),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
