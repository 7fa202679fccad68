//! Aggregation options.
//!
//! Defines the typed configuration consumed by the aggregation entry point.
//! Hosts hand over a loosely-typed JSON object; [`Options::from_value`]
//! validates it eagerly — unknown keys are rejected before any bundle work
//! starts. Missing fields use defaults.

use serde::Deserialize;

// ---------------------------------------------------------------------------
// Options
// ---------------------------------------------------------------------------

/// Configuration for one aggregation run.
///
/// Field names on the wire are camelCase (`injectImports`, `publicPath`, ...)
/// because that is what build hosts pass through from user config files.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields, default)]
pub struct Options {
    /// Prepend cross-chunk `@import` links instead of duplicating content.
    pub inject_imports: bool,

    /// Naming pattern for non-entry artifacts. `[name]` and `[hash]` are
    /// substituted (first occurrence only).
    pub chunk_file_names: String,

    /// Naming pattern for entry artifacts.
    pub entry_file_names: String,

    /// Prefix joined to artifact names to form runtime URLs.
    pub public_path: String,

    /// Compose and emit companion source maps.
    pub sourcemap: bool,

    /// Actually register artifacts and patch chunks. When off, the run is a
    /// no-op.
    pub emit_files: bool,

    /// Rewrite absolute `url(...)` references to be relative to the
    /// artifact's final directory.
    pub make_relative_urls: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            inject_imports: false,
            chunk_file_names: default_chunk_file_names(),
            entry_file_names: default_entry_file_names(),
            public_path: String::new(),
            sourcemap: false,
            emit_files: true,
            make_relative_urls: false,
        }
    }
}

fn default_chunk_file_names() -> String {
    "[name]-[hash].css".to_owned()
}

fn default_entry_file_names() -> String {
    "[name].css".to_owned()
}

impl Options {
    /// Parse options from a host-supplied JSON object.
    ///
    /// # Errors
    /// Returns a [`ConfigError`] if the value contains unknown keys or a key
    /// with the wrong type. Validation is eager: this is called before any
    /// bundle is touched.
    pub fn from_value(value: serde_json::Value) -> Result<Self, ConfigError> {
        serde_json::from_value(value).map_err(|e| ConfigError {
            message: e.to_string(),
        })
    }

    /// Select the naming pattern for a chunk.
    #[must_use]
    pub fn file_name_pattern(&self, is_entry: bool) -> &str {
        if is_entry {
            &self.entry_file_names
        } else {
            &self.chunk_file_names
        }
    }
}

// ---------------------------------------------------------------------------
// ConfigError
// ---------------------------------------------------------------------------

/// Error produced when the host-supplied options object fails validation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConfigError {
    /// Description of the offending key or value.
    pub message: String,
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "invalid options: {}", self.message)
    }
}

impl std::error::Error for ConfigError {}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn defaults() {
        let opts = Options::default();
        assert!(!opts.inject_imports);
        assert_eq!(opts.chunk_file_names, "[name]-[hash].css");
        assert_eq!(opts.entry_file_names, "[name].css");
        assert_eq!(opts.public_path, "");
        assert!(!opts.sourcemap);
        assert!(opts.emit_files);
        assert!(!opts.make_relative_urls);
    }

    #[test]
    fn empty_object_is_all_defaults() {
        let opts = Options::from_value(json!({})).expect("empty object should parse");
        assert_eq!(opts, Options::default());
    }

    #[test]
    fn camel_case_keys() {
        let opts = Options::from_value(json!({
            "injectImports": true,
            "publicPath": "/static",
            "sourcemap": true,
        }))
        .expect("valid options should parse");
        assert!(opts.inject_imports);
        assert_eq!(opts.public_path, "/static");
        assert!(opts.sourcemap);
        // Untouched fields keep defaults.
        assert_eq!(opts.entry_file_names, "[name].css");
    }

    #[test]
    fn unknown_key_is_rejected() {
        let err = Options::from_value(json!({ "injectimports": true }))
            .expect_err("unknown key must be rejected");
        assert!(err.message.contains("injectimports"), "got: {}", err.message);
    }

    #[test]
    fn wrong_type_is_rejected() {
        let err = Options::from_value(json!({ "sourcemap": "yes" }))
            .expect_err("string for bool must be rejected");
        assert!(!err.message.is_empty());
    }

    #[test]
    fn pattern_selection() {
        let opts = Options::default();
        assert_eq!(opts.file_name_pattern(true), "[name].css");
        assert_eq!(opts.file_name_pattern(false), "[name]-[hash].css");
    }
}
