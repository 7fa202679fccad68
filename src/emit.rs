//! Emission and linking: the once-per-build entry point.
//!
//! [`process_bundle`] runs after the host has finalized its output chunk
//! set and before files are written: order the chunks, aggregate each
//! chunk's reachable style fragments, name the artifact from its content,
//! optionally rewrite asset URLs, register the artifact (and companion map)
//! with the host, and patch the owning chunk's placeholder token with the
//! artifact's public URL.
//!
//! Chunks are processed strictly in orderer-assigned order, so a chunk's
//! dependencies always have their artifacts registered before import
//! injection asks for their names.

use std::collections::HashMap;
use std::path::Path;

use crate::aggregate::aggregate_chunk;
use crate::config::Options;
use crate::error::BundleError;
use crate::host::{HostSink, ModuleGraph, placeholder_token};
use crate::model::{Bundle, BundleItem, FragmentTable};
use crate::naming::{content_hash, substitute_pattern};
use crate::order::order_chunks;
use crate::urls::rewrite_relative_urls;

/// Aggregate, name, emit, and link style artifacts for a finished bundle.
///
/// `out_dir` is the host's resolved output directory. Without one, nothing
/// can be emitted; the run degrades to a no-op with a single warning. With
/// `emit_files` off the run is a silent no-op.
///
/// # Errors
/// Returns [`BundleError::ChunkCycle`] if the chunk import graph is cyclic,
/// or [`BundleError::MapSerialize`] if a merged map cannot be serialized.
/// All other conditions degrade to warnings on `sink`.
pub fn process_bundle(
    opts: &Options,
    graph: &dyn ModuleGraph,
    fragments: &FragmentTable,
    bundle: &mut Bundle,
    out_dir: Option<&Path>,
    sink: &mut dyn HostSink,
) -> Result<(), BundleError> {
    if !opts.emit_files {
        return Ok(());
    }
    let Some(out_dir) = out_dir else {
        sink.warn(
            "no output directory configured; style artifacts will not be emitted this build",
        );
        return Ok(());
    };

    let ordering = order_chunks(bundle)?;
    let mut emitted_artifacts: HashMap<String, String> = HashMap::new();

    for chunk_name in ordering.sorted_chunks() {
        let Some(chunk) = bundle.get(&chunk_name).and_then(BundleItem::as_chunk) else {
            continue;
        };
        let chunk = chunk.clone();

        let merged = aggregate_chunk(
            &chunk,
            bundle,
            &ordering,
            graph,
            fragments,
            opts,
            Some(out_dir),
            &emitted_artifacts,
            sink,
        );
        if merged.code.is_empty() {
            // No reachable styles: no artifact, no placeholder patching.
            continue;
        }

        // Name from content as it exists before URL rewriting.
        let hash = content_hash(&merged.code);
        let artifact_name =
            substitute_pattern(opts.file_name_pattern(chunk.is_entry), &chunk.name, &hash);
        tracing::debug!(
            chunk = %chunk.file_name,
            artifact = %artifact_name,
            "aggregated style artifact"
        );

        let mut content = if opts.make_relative_urls {
            rewrite_relative_urls(&merged.code, out_dir, &artifact_name)
        } else {
            merged.code
        };

        // Late-bind the artifact URL into the owning chunk's code.
        let url = public_url(&opts.public_path, &artifact_name);
        let token = placeholder_token(&chunk.file_name);
        if let Some(owned) = bundle.get_chunk_mut(&chunk_name) {
            owned.code = owned.code.replace(&token, &url);
        }

        let map_asset = match merged.map {
            Some(mut map) => {
                map.file = Some(artifact_name.clone());
                let json = serde_json::to_string(&map).map_err(|e| {
                    BundleError::MapSerialize {
                        chunk: chunk.file_name.clone(),
                        detail: e.to_string(),
                    }
                })?;
                let map_name = format!("{artifact_name}.map");
                content.push_str(&format!(
                    "/*# sourceMappingURL={} */",
                    basename(&map_name)
                ));
                Some((map_name, json))
            }
            None => None,
        };

        sink.emit_asset(&artifact_name, content);
        if let Some((map_name, json)) = map_asset {
            sink.emit_asset(&map_name, json);
        }
        if let Some(owned) = bundle.get_chunk_mut(&chunk_name) {
            owned.imports.push(artifact_name.clone());
        }
        emitted_artifacts.insert(chunk_name, artifact_name);
    }

    Ok(())
}

/// Join the configured public-path prefix with an artifact file name.
fn public_url(public_path: &str, artifact_name: &str) -> String {
    format!("{}/{artifact_name}", public_path.trim_end_matches('/'))
}

/// Final path component of a bundle-relative file name.
fn basename(file_name: &str) -> &str {
    file_name.rsplit('/').next().unwrap_or(file_name)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
