//! Collaborator contract with the host build system.
//!
//! The engine runs inside one host lifecycle callback and talks back through
//! two narrow seams: the module graph (read-only introspection) and the sink
//! (asset emission plus a single warning channel). Everything else the host
//! does — resolving modules, forming chunks, writing files — stays on the
//! host's side of the boundary.
//!
//! This module also carries the small helpers the host's per-module hooks
//! need: the style-file selector, the virtual meta-property resolution, and
//! the placeholder token that stands in for an artifact's not-yet-known URL.

use crate::model::{ModuleId, ModuleRecord};

/// The virtual meta-property style modules read to learn their artifact URL.
///
/// The host's transform hook replaces a style module's compiled output with
/// a single expression reading this property; the resolve hook then maps it
/// to a chunk-specific placeholder token via [`resolve_import_meta`].
pub const STYLE_URL_PROPERTY: &str = "CSS_URL";

// ---------------------------------------------------------------------------
// ModuleGraph
// ---------------------------------------------------------------------------

/// Read-only view of the host's module graph.
///
/// Covers both introspection primitives the engine needs: the per-module
/// style classification and the per-module import list.
pub trait ModuleGraph {
    /// Look up the record for a module, if the host knows it.
    fn module(&self, id: &ModuleId) -> Option<&ModuleRecord>;
}

impl ModuleGraph for std::collections::HashMap<ModuleId, ModuleRecord> {
    fn module(&self, id: &ModuleId) -> Option<&ModuleRecord> {
        self.get(id)
    }
}

// ---------------------------------------------------------------------------
// HostSink
// ---------------------------------------------------------------------------

/// Where the engine's outputs go: emitted assets and warnings.
pub trait HostSink {
    /// Register a new build output asset.
    fn emit_asset(&mut self, file_name: &str, source: String);

    /// Surface a warning to the host. Warnings never abort the build.
    fn warn(&mut self, message: &str);
}

/// A sink that buffers everything in memory.
///
/// Useful for hosts that batch-register assets after the callback returns,
/// and for tests.
#[derive(Clone, Debug, Default)]
pub struct BufferedSink {
    /// Emitted `(file name, source)` pairs, in emission order.
    pub assets: Vec<(String, String)>,
    /// Surfaced warnings, in order.
    pub warnings: Vec<String>,
}

impl BufferedSink {
    /// Create an empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the source of an emitted asset by file name.
    #[must_use]
    pub fn asset(&self, file_name: &str) -> Option<&str> {
        self.assets
            .iter()
            .find(|(name, _)| name == file_name)
            .map(|(_, source)| source.as_str())
    }
}

impl HostSink for BufferedSink {
    fn emit_asset(&mut self, file_name: &str, source: String) {
        self.assets.push((file_name.to_owned(), source));
    }

    fn warn(&mut self, message: &str) {
        tracing::warn!("{message}");
        self.warnings.push(message.to_owned());
    }
}

// ---------------------------------------------------------------------------
// Hook helpers
// ---------------------------------------------------------------------------

/// Does this path name a style source file? Case-insensitive suffix match.
#[must_use]
pub fn is_style_source(path: &str) -> bool {
    let path = path.to_ascii_lowercase();
    path.ends_with(".css")
}

/// The literal placeholder token embedded in a chunk's compiled code where
/// its style artifact URL will eventually go.
///
/// Derived from the chunk's file name so every chunk's token is unique and
/// can be substituted without touching other chunks.
#[must_use]
pub fn placeholder_token(chunk_file_name: &str) -> String {
    format!("CSS_FILE_{chunk_file_name}")
}

/// Resolve the virtual meta-property for the host's resolve hook.
///
/// Returns the replacement expression (a string literal holding the
/// placeholder token) for [`STYLE_URL_PROPERTY`], or `None` for properties
/// this engine does not own.
#[must_use]
pub fn resolve_import_meta(property: &str, chunk_file_name: &str) -> Option<String> {
    if property == STYLE_URL_PROPERTY {
        Some(format!("'{}'", placeholder_token(chunk_file_name)))
    } else {
        None
    }
}

/// The expression a style module's compiled output is replaced with by the
/// host's transform hook.
#[must_use]
pub fn style_module_shim() -> String {
    format!("export default import.meta.{STYLE_URL_PROPERTY};")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ModuleKind;
    use std::collections::HashMap;

    #[test]
    fn style_selector_is_case_insensitive() {
        assert!(is_style_source("src/app.css"));
        assert!(is_style_source("src/APP.CSS"));
        assert!(is_style_source("theme.Css"));
        assert!(!is_style_source("src/app.scss.bak"));
        assert!(!is_style_source("app.js"));
        assert!(!is_style_source("css"));
    }

    #[test]
    fn placeholder_tokens_are_chunk_unique() {
        let a = placeholder_token("main.js");
        let b = placeholder_token("vendor.js");
        assert_ne!(a, b);
        assert!(a.contains("main.js"));
    }

    #[test]
    fn resolve_import_meta_owns_only_style_url() {
        let resolved = resolve_import_meta(STYLE_URL_PROPERTY, "main.js")
            .expect("style url property resolves");
        assert_eq!(resolved, "'CSS_FILE_main.js'");
        assert!(resolve_import_meta("url", "main.js").is_none());
    }

    #[test]
    fn shim_reads_the_meta_property() {
        assert_eq!(style_module_shim(), "export default import.meta.CSS_URL;");
    }

    #[test]
    fn buffered_sink_records_in_order() {
        let mut sink = BufferedSink::new();
        sink.emit_asset("a.css", ".a{}".to_owned());
        sink.emit_asset("b.css", ".b{}".to_owned());
        sink.warn("something odd");

        assert_eq!(sink.asset("a.css"), Some(".a{}"));
        assert_eq!(sink.asset("b.css"), Some(".b{}"));
        assert!(sink.asset("c.css").is_none());
        assert_eq!(sink.warnings, vec!["something odd".to_owned()]);
    }

    #[test]
    fn hashmap_module_graph() {
        let mut graph = HashMap::new();
        graph.insert(
            ModuleId::from("a.css"),
            ModuleRecord::new(ModuleKind::Style, vec![]),
        );
        assert!(graph.module(&ModuleId::from("a.css")).is_some());
        assert!(graph.module(&ModuleId::from("b.css")).is_none());
    }
}
