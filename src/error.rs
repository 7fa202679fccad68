//! Error types for style-sheet aggregation.
//!
//! Defines [`BundleError`], the unified error type for one aggregation run.
//! Only genuinely fatal conditions become errors: a bad configuration object
//! or a cyclic chunk graph aborts the build invocation. Everything else
//! (malformed fragment maps, missing output directory, empty merged content)
//! degrades gracefully and is reported through the host's warning channel.

use std::fmt;

// ---------------------------------------------------------------------------
// BundleError
// ---------------------------------------------------------------------------

/// Unified error type for bundle aggregation.
///
/// Each variant carries enough context to locate the problem without the
/// caller needing to re-run the build with extra instrumentation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BundleError {
    /// The configuration object contained an unknown or malformed key.
    ///
    /// Raised eagerly by [`crate::config::Options::from_value`], before any
    /// bundle work starts.
    Config {
        /// Human-readable description of the problem.
        detail: String,
    },

    /// The chunk import graph contains a cycle.
    ///
    /// The orderer requires a DAG; a cycle would otherwise recurse without
    /// bound, so it is detected explicitly and reported with the chunk on
    /// which the cycle closed.
    ChunkCycle {
        /// File name of the chunk at which the cycle was detected.
        chunk: String,
    },

    /// A fragment's source map had a `mappings` field that could not be
    /// decoded.
    ///
    /// At the aggregation boundary this is recovered (the fragment is
    /// treated as unmapped and a warning is surfaced); the variant exists so
    /// the codec can report precisely what it choked on.
    MapDecode {
        /// Identifier of the style module whose map failed to decode.
        module: String,
        /// Description of the malformed input.
        detail: String,
    },

    /// A merged source map could not be serialized for emission.
    MapSerialize {
        /// File name of the chunk whose map failed to serialize.
        chunk: String,
        /// Description from the JSON serializer.
        detail: String,
    },
}

impl fmt::Display for BundleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config { detail } => {
                write!(
                    f,
                    "invalid configuration: {detail}\n  To fix: remove unknown keys; supported keys are injectImports, chunkFileNames, entryFileNames, publicPath, sourcemap, emitFiles, makeRelativeUrls."
                )
            }
            Self::ChunkCycle { chunk } => {
                write!(
                    f,
                    "cyclic chunk imports detected at '{chunk}'.\n  To fix: break the import cycle between output chunks; chunk imports must form a DAG."
                )
            }
            Self::MapDecode { module, detail } => {
                write!(
                    f,
                    "could not decode source map for style module '{module}': {detail}"
                )
            }
            Self::MapSerialize { chunk, detail } => {
                write!(
                    f,
                    "could not serialize merged source map for chunk '{chunk}': {detail}"
                )
            }
        }
    }
}

impl std::error::Error for BundleError {}

impl From<crate::config::ConfigError> for BundleError {
    fn from(err: crate::config::ConfigError) -> Self {
        Self::Config {
            detail: err.message,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
