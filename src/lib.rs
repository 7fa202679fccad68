//! csspack — bundle-time style-sheet aggregation.
//!
//! Merges style fragments extracted from individual modules back into a
//! small number of deployable style-sheet files, one per output code chunk,
//! while preserving source maps, deterministic content-hashed names, and
//! correct relative linkage between code and its style companions.
//!
//! The host build system extracts fragments while processing modules
//! (recording them in a [`model::FragmentTable`]), then hands its finished
//! bundle to [`emit::process_bundle`] exactly once per build. Everything the
//! engine does is synchronous, deterministic, and confined to that call.
//!
//! ```
//! use csspack::config::Options;
//! use csspack::host::BufferedSink;
//! use csspack::model::{Bundle, FragmentTable, ModuleId, ModuleRecord};
//! use std::collections::HashMap;
//!
//! let opts = Options::default();
//! let graph: HashMap<ModuleId, ModuleRecord> = HashMap::new();
//! let fragments = FragmentTable::new();
//! let mut bundle = Bundle::new();
//! let mut sink = BufferedSink::new();
//!
//! csspack::emit::process_bundle(
//!     &opts,
//!     &graph,
//!     &fragments,
//!     &mut bundle,
//!     Some(std::path::Path::new("/out")),
//!     &mut sink,
//! )
//! .expect("empty bundle aggregates");
//! assert!(sink.assets.is_empty());
//! ```

pub mod aggregate;
pub mod collect;
pub mod config;
pub mod emit;
pub mod error;
pub mod host;
pub mod mappings;
pub mod model;
pub mod naming;
pub mod order;
pub mod urls;

pub use config::Options;
pub use emit::process_bundle;
pub use error::BundleError;
