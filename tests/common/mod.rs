//! Shared fixture builders for aggregation integration tests.

use std::collections::HashMap;

use csspack::host::placeholder_token;
use csspack::mappings::SourceMapJson;
use csspack::model::{
    Bundle, BundleItem, FragmentTable, ModuleId, ModuleKind, ModuleRecord, OutputChunk,
};

/// Build a module graph from `(id, kind, imports)` triples.
pub fn graph(entries: &[(&str, ModuleKind, &[&str])]) -> HashMap<ModuleId, ModuleRecord> {
    entries
        .iter()
        .map(|(id, kind, imports)| {
            (
                ModuleId::from(*id),
                ModuleRecord::new(*kind, imports.iter().map(|s| ModuleId::from(*s)).collect()),
            )
        })
        .collect()
}

/// A chunk whose compiled code contains its own placeholder token twice.
pub fn chunk_with_placeholder(
    name: &str,
    file_name: &str,
    is_entry: bool,
    modules: &[&str],
    imports: &[&str],
) -> OutputChunk {
    let token = placeholder_token(file_name);
    OutputChunk {
        name: name.to_owned(),
        file_name: file_name.to_owned(),
        is_entry,
        modules: modules.iter().map(|s| ModuleId::from(*s)).collect(),
        imports: imports.iter().map(|s| (*s).to_owned()).collect(),
        code: format!("const url = '{token}'; preload('{token}');"),
    }
}

/// Insert a chunk into a bundle under its file name.
pub fn insert_chunk(bundle: &mut Bundle, chunk: OutputChunk) {
    bundle.insert(chunk.file_name.clone(), BundleItem::Chunk(chunk));
}

/// Register an unmapped fragment.
pub fn register_fragment(table: &mut FragmentTable, id: &str, code: &str) {
    table.insert(
        ModuleId::from(id),
        csspack::model::StyleFragment {
            code: code.to_owned(),
            map: None,
        },
    );
}

/// Register a fragment with a single-source map.
pub fn register_mapped_fragment(
    table: &mut FragmentTable,
    id: &str,
    code: &str,
    source: &str,
    mappings: &str,
) {
    table.insert(
        ModuleId::from(id),
        csspack::model::StyleFragment {
            code: code.to_owned(),
            map: Some(SourceMapJson {
                version: 3,
                file: None,
                sources: vec![source.to_owned()],
                sources_content: vec![Some(code.to_owned())],
                names: vec![],
                mappings: mappings.to_owned(),
            }),
        },
    );
}
