//! Schema registry: the validated, immutable form of the manifest.
//!
//! `Registry::load` is the single entry point. It parses the TOML manifest,
//! validates every declaration, and produces a read-only value passed by
//! reference to all downstream stages — no global state, no mutation during
//! a run. Loading is total: the first malformed declaration aborts the run
//! before any output is produced.

mod manifest;

use std::collections::{BTreeMap, BTreeSet};
use std::path::PathBuf;

use crate::error::SchemaError;
use crate::ordering;

/// The complete, validated schema for one generation run.
#[derive(Debug)]
pub struct Registry {
    /// Uppercase prefix for generated macros (`API_STAT_...`).
    pub prefix: String,
    /// C type of the allocation context parameter.
    pub context_type: String,
    /// Variable name of the allocation context parameter.
    pub context_var: String,
    /// Methods keyed by `owner.name`; the map order is the sorted key order
    /// the emitter iterates in.
    pub methods: BTreeMap<String, MethodSpec>,
    /// Flag sets keyed by context, in sorted context order.
    pub flags: BTreeMap<String, FlagSet>,
    /// Handles in authorial order.
    pub handles: Vec<Handle>,
    /// Targets in authorial order.
    pub targets: Vec<TargetSpec>,
}

/// One declared API method.
#[derive(Debug)]
pub struct MethodSpec {
    pub key: String,
    pub owner: String,
    pub name: String,
    pub tags: MethodTags,
    pub args: Vec<ArgSpec>,
    /// `None` means the method takes no flags argument at all; a context
    /// with an empty flag set is the "none defined yet" sentinel.
    pub flag_context: Option<String>,
    pub on: Vec<String>,
    pub off: Vec<String>,
    pub config: Vec<ConfigOption>,
}

/// Closed set of method modifier tags, validated at load time.
#[derive(Debug, Default, Clone, Copy)]
pub struct MethodTags {
    pub getter: bool,
    pub setter: bool,
    pub returns_status: bool,
    pub returns_void: bool,
    pub no_stub: bool,
    pub hand_written: bool,
    pub validates_input: bool,
}

impl MethodTags {
    fn parse(key: &str, tags: &[String]) -> Result<Self, SchemaError> {
        let mut out = Self::default();
        for tag in tags {
            match tag.as_str() {
                "getter" => out.getter = true,
                "setter" => out.setter = true,
                "returns-status" => out.returns_status = true,
                "returns-void" => out.returns_void = true,
                "no-stub" => out.no_stub = true,
                "hand-written" => out.hand_written = true,
                "validates-input" => out.validates_input = true,
                other => {
                    return Err(SchemaError::UnknownTag {
                        key: key.to_string(),
                        tag: other.to_string(),
                    })
                }
            }
        }
        if !out.no_stub && out.returns_status == out.returns_void {
            return Err(SchemaError::ReturnTagConflict(key.to_string()));
        }
        if out.getter && out.setter {
            return Err(SchemaError::AccessorTagConflict(key.to_string()));
        }
        Ok(out)
    }
}

/// One method argument: a name plus its structured declaration.
#[derive(Debug)]
pub struct ArgSpec {
    pub name: String,
    pub decl: Declaration,
}

/// A C declaration split at the name position.
///
/// Parsed once at load time from a template containing exactly one `@S`
/// placeholder; both rendered forms are derived mechanically from the split,
/// never by string surgery at emit time.
#[derive(Debug)]
pub struct Declaration {
    prefix: String,
    suffix: String,
}

impl Declaration {
    fn parse(template: &str, key: &str, arg: &str) -> Result<Self, SchemaError> {
        let mut parts = template.split("@S");
        let prefix = parts.next().unwrap_or_default();
        let (Some(suffix), None) = (parts.next(), parts.next()) else {
            return Err(SchemaError::BadPlaceholder {
                key: key.to_string(),
                arg: arg.to_string(),
            });
        };
        Ok(Self {
            prefix: prefix.to_string(),
            suffix: suffix.to_string(),
        })
    }

    /// Render with the argument name filled in (`u_int32_t flags`).
    pub fn named(&self, name: &str) -> String {
        format!("{}{}{}", self.prefix, name, self.suffix)
    }

    /// Render without the name, for prototypes (`u_int32_t`).
    pub fn anonymous(&self) -> String {
        format!("{}{}", self.prefix.trim_end(), self.suffix)
    }
}

/// A method configuration option. Order is authorial, never resorted.
#[derive(Debug)]
pub struct ConfigOption {
    pub name: String,
    pub default: String,
    pub desc: String,
}

/// Flag literals for one context, in declared order. Bit assignment happens
/// per run from the sorted order, see [`crate::ordering`].
#[derive(Debug)]
pub struct FlagSet {
    pub flags: Vec<String>,
}

/// A named grouping of statistics, independently numbered.
#[derive(Debug)]
pub struct Handle {
    pub name: String,
    pub stats: Vec<StatEntry>,
}

/// One instrumentation counter.
#[derive(Debug)]
pub struct StatEntry {
    pub key: String,
    pub desc: String,
    /// Permanent entries are excluded from the clear routine.
    pub permanent: bool,
}

/// One file the generator owns (wholly or via marker regions).
#[derive(Debug)]
pub struct TargetSpec {
    /// Path relative to the generation root.
    pub path: PathBuf,
    pub kind: TargetKind,
}

#[derive(Debug)]
pub enum TargetKind {
    /// Marker regions inside a hand-maintained file; the file must exist.
    Regions(Vec<Region>),
    /// A fully generated file; may not exist yet.
    Whole(Vec<Section>),
}

/// One BEGIN/END delimited span owned by the generator.
#[derive(Debug)]
pub struct Region {
    pub begin: String,
    pub end: String,
    pub section: Section,
}

/// What to render into a region or whole-file target.
#[derive(Debug)]
pub enum Section {
    StatDefines,
    StatFunctions,
    FlagDefines,
    MethodStubs { owner: String },
    ConfigDefaults { owner: String },
}

impl Registry {
    /// Parse and validate a schema manifest.
    pub fn load(text: &str) -> Result<Self, SchemaError> {
        let manifest: manifest::Manifest = toml::from_str(text)?;

        let mut handles = Vec::with_capacity(manifest.handles.len());
        let mut handle_names = BTreeSet::new();
        for h in manifest.handles {
            if !handle_names.insert(h.name.clone()) {
                return Err(SchemaError::DuplicateHandle(h.name));
            }
            let mut stat_keys = BTreeSet::new();
            let mut stats = Vec::with_capacity(h.stats.len());
            for s in h.stats {
                if !stat_keys.insert(s.key.clone()) {
                    return Err(SchemaError::DuplicateStat {
                        handle: h.name.clone(),
                        key: s.key,
                    });
                }
                let mut permanent = false;
                for tag in &s.tags {
                    match tag.as_str() {
                        "permanent" => permanent = true,
                        other => {
                            return Err(SchemaError::UnknownTag {
                                key: s.key.clone(),
                                tag: other.to_string(),
                            })
                        }
                    }
                }
                stats.push(StatEntry {
                    key: s.key,
                    desc: s.desc,
                    permanent,
                });
            }
            handles.push(Handle {
                name: h.name,
                stats,
            });
        }

        let mut flags = BTreeMap::new();
        for (context, literals) in manifest.flags {
            let mut seen = BTreeSet::new();
            for f in &literals {
                if !seen.insert(f.clone()) {
                    return Err(SchemaError::DuplicateFlag {
                        context: context.clone(),
                        flag: f.clone(),
                    });
                }
            }
            ordering::ensure_flag_capacity(&context, literals.len())?;
            flags.insert(context, FlagSet { flags: literals });
        }

        let mut methods = BTreeMap::new();
        for m in manifest.methods {
            let mut parts = m.key.split('.');
            let (owner, name) = match (parts.next(), parts.next(), parts.next()) {
                (Some(owner), Some(name), None) if !owner.is_empty() && !name.is_empty() => {
                    (owner.to_string(), name.to_string())
                }
                _ => return Err(SchemaError::BadMethodKey(m.key)),
            };

            let tags = MethodTags::parse(&m.key, &m.tags)?;

            if let Some(context) = &m.flag_context {
                if !flags.contains_key(context) {
                    return Err(SchemaError::UnknownFlagContext {
                        key: m.key.clone(),
                        context: context.clone(),
                    });
                }
            }

            let mut args = Vec::with_capacity(m.args.len());
            for a in m.args {
                let decl = Declaration::parse(&a.decl, &m.key, &a.name)?;
                args.push(ArgSpec { name: a.name, decl });
            }

            let mut config_names = BTreeSet::new();
            let mut config = Vec::with_capacity(m.config.len());
            for c in m.config {
                if !config_names.insert(c.name.clone()) {
                    return Err(SchemaError::DuplicateConfig {
                        key: m.key,
                        name: c.name,
                    });
                }
                config.push(ConfigOption {
                    name: c.name,
                    default: c.default,
                    desc: c.desc,
                });
            }

            let spec = MethodSpec {
                key: m.key.clone(),
                owner,
                name,
                tags,
                args,
                flag_context: m.flag_context,
                on: m.on,
                off: m.off,
                config,
            };
            if methods.insert(m.key.clone(), spec).is_some() {
                return Err(SchemaError::DuplicateMethod(m.key));
            }
        }

        let owners: BTreeSet<&str> = methods.values().map(|m| m.owner.as_str()).collect();
        let mut targets = Vec::with_capacity(manifest.targets.len());
        for t in manifest.targets {
            let kind = match (t.regions.is_empty(), t.whole.is_empty()) {
                (false, true) => {
                    let mut regions = Vec::with_capacity(t.regions.len());
                    for r in t.regions {
                        if r.begin == r.end {
                            return Err(SchemaError::IdenticalMarkers { path: t.path });
                        }
                        let section = resolve_section(&t.path, r.section, r.owner, &owners)?;
                        regions.push(Region {
                            begin: r.begin,
                            end: r.end,
                            section,
                        });
                    }
                    TargetKind::Regions(regions)
                }
                (true, false) => {
                    let mut sections = Vec::with_capacity(t.whole.len());
                    for s in t.whole {
                        sections.push(resolve_section(&t.path, s.section, s.owner, &owners)?);
                    }
                    TargetKind::Whole(sections)
                }
                _ => return Err(SchemaError::AmbiguousTarget { path: t.path }),
            };
            targets.push(TargetSpec {
                path: PathBuf::from(t.path),
                kind,
            });
        }

        tracing::debug!(
            methods = methods.len(),
            handles = handles.len(),
            flag_contexts = flags.len(),
            targets = targets.len(),
            "schema loaded"
        );

        Ok(Self {
            prefix: manifest.prefix,
            context_type: manifest.context_type,
            context_var: manifest.context_var,
            methods,
            flags,
            handles,
            targets,
        })
    }

    /// Methods belonging to one owner, in sorted key order.
    pub fn methods_of<'a>(&'a self, owner: &'a str) -> impl Iterator<Item = &'a MethodSpec> {
        self.methods.values().filter(move |m| m.owner == owner)
    }
}

fn resolve_section(
    path: &str,
    section: String,
    owner: Option<String>,
    owners: &BTreeSet<&str>,
) -> Result<Section, SchemaError> {
    match section.as_str() {
        "stat-defines" => Ok(Section::StatDefines),
        "stat-functions" => Ok(Section::StatFunctions),
        "flag-defines" => Ok(Section::FlagDefines),
        "method-stubs" | "config-defaults" => {
            let owner = owner.ok_or_else(|| SchemaError::MissingOwner {
                path: path.to_string(),
                section: section.clone(),
            })?;
            if !owners.contains(owner.as_str()) {
                return Err(SchemaError::UnknownOwner {
                    path: path.to_string(),
                    section,
                    owner,
                });
            }
            if section == "method-stubs" {
                Ok(Section::MethodStubs { owner })
            } else {
                Ok(Section::ConfigDefaults { owner })
            }
        }
        other => Err(SchemaError::UnknownSection {
            path: path.to_string(),
            section: other.to_string(),
        }),
    }
}
