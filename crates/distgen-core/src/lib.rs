//! Deterministic source synthesis for a declarative API schema.
//!
//! `distgen-core` keeps hand-maintained C sources in sync with a TOML schema
//! describing an API surface: methods and their modifier tags, configuration
//! options, per-context flag sets, and per-handle statistics. The stages:
//!
//! 1. [`schema::Registry::load`] parses and validates the schema into an
//!    immutable registry;
//! 2. [`ordering`] assigns reproducible numeric identifiers from sorted key
//!    order;
//! 3. [`markers`] locates BEGIN/END delimited regions in target files;
//! 4. [`emit`] renders registry entries into fixed-format C text;
//! 5. [`commit`] replaces a target only when its content actually changed,
//!    so an unchanged schema never triggers downstream rebuilds.
//!
//! [`pipeline::run`] drives the whole batch, fail-fast on the first error.

pub mod commit;
pub mod emit;
pub mod error;
pub mod markers;
pub mod ordering;
pub mod pipeline;
pub mod schema;

pub use commit::Outcome;
pub use error::{GenError, MarkerError, RenderError, SchemaError};
pub use pipeline::{check, run, RunReport, TargetOutcome};
pub use schema::Registry;
