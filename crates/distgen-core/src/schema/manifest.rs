//! Raw schema manifest model (`serde` view of the TOML input).
//!
//! These structs mirror the manifest verbatim; `Registry::load` validates
//! them into the immutable schema types the rest of the pipeline consumes.

use std::collections::BTreeMap;

use serde::Deserialize;

fn default_prefix() -> String {
    "API".to_string()
}

fn default_context_type() -> String {
    "ENV".to_string()
}

fn default_context_var() -> String {
    "env".to_string()
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct Manifest {
    /// Uppercase prefix for generated macros and defines (e.g. `API_STAT_...`).
    #[serde(default = "default_prefix")]
    pub prefix: String,

    /// C type of the allocation context passed to generated routines.
    #[serde(default = "default_context_type")]
    pub context_type: String,

    /// Variable name for the allocation context parameter.
    #[serde(default = "default_context_var")]
    pub context_var: String,

    #[serde(default, rename = "handle")]
    pub handles: Vec<HandleDecl>,

    /// Flag sets keyed by context (a method key or a subsystem name).
    /// An empty list is the explicit "no flags defined yet" sentinel.
    #[serde(default)]
    pub flags: BTreeMap<String, Vec<String>>,

    #[serde(default, rename = "method")]
    pub methods: Vec<MethodDecl>,

    #[serde(default, rename = "target")]
    pub targets: Vec<TargetDecl>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct HandleDecl {
    pub name: String,

    #[serde(default, rename = "stat")]
    pub stats: Vec<StatDecl>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct StatDecl {
    pub key: String,
    pub desc: String,

    #[serde(default)]
    pub tags: Vec<String>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct MethodDecl {
    /// `owner.name` key, unique across the schema.
    pub key: String,

    #[serde(default)]
    pub tags: Vec<String>,

    #[serde(default)]
    pub args: Vec<ArgDecl>,

    /// Flag context this method validates against; absent means the method
    /// takes no flags argument at all.
    pub flag_context: Option<String>,

    /// Predecessor states in which the call is legal.
    #[serde(default)]
    pub on: Vec<String>,

    /// Successor states entered on success.
    #[serde(default)]
    pub off: Vec<String>,

    #[serde(default, rename = "config")]
    pub config: Vec<ConfigDecl>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct ArgDecl {
    pub name: String,

    /// Declaration template; `@S` marks where the name goes.
    pub decl: String,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct ConfigDecl {
    pub name: String,
    pub default: String,
    pub desc: String,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct TargetDecl {
    /// Path relative to the generation root.
    pub path: String,

    #[serde(default, rename = "region")]
    pub regions: Vec<RegionDecl>,

    /// Sections for a fully generator-owned file (no markers; the file may
    /// not exist yet).
    #[serde(default, rename = "whole")]
    pub whole: Vec<SectionDecl>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct RegionDecl {
    pub begin: String,
    pub end: String,
    pub section: String,
    pub owner: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct SectionDecl {
    pub section: String,
    pub owner: Option<String>,
}
