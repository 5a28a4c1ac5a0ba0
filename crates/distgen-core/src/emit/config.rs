//! Configuration-default tables, one per method carrying config options.

use super::{c_quote, CodeWriter};
use crate::schema::Registry;

/// Name/default tables for one owner's methods, methods in sorted key order.
/// Option order within a table is authorial and preserved as declared.
pub(super) fn config_defaults(registry: &Registry, owner: &str, w: &mut CodeWriter) {
    let p = &registry.prefix;
    let pl = registry.prefix.to_lowercase();
    for method in registry.methods_of(owner) {
        if method.config.is_empty() {
            continue;
        }
        w.banner(&format!("Configuration defaults for {}.", method.key));
        w.line(&format!(
            "static const {p}_CONFIG_DEF __{pl}_config_{}_{}[] = {{",
            method.owner, method.name
        ));
        for option in &method.config {
            w.line(&format!(
                "\t{{ \"{}\", \"{}\" }},",
                c_quote(&option.name),
                c_quote(&option.default)
            ));
        }
        w.line("\t{ NULL, NULL }");
        w.line("};");
        w.blank();
    }
}

#[cfg(test)]
mod tests {
    use crate::emit::render_section;
    use crate::schema::{Registry, Section};

    const SCHEMA: &str = r#"
prefix = "API"

[[method]]
key = "session.create"
tags = ["returns-status"]

[[method.config]]
name = "leaf_node_max"
default = "1MB"
desc = "maximum page size for leaf nodes"

[[method.config]]
name = "allocation_size"
default = "512B"
desc = "file unit allocation size"

[[method]]
key = "session.close"
tags = ["returns-status"]
"#;

    #[test]
    fn table_preserves_authorial_option_order() {
        let reg = Registry::load(SCHEMA).unwrap();
        let out = render_section(
            &reg,
            &Section::ConfigDefaults {
                owner: "session".to_string(),
            },
        )
        .unwrap();
        assert!(out.contains("static const API_CONFIG_DEF __api_config_session_create[] = {"));
        // leaf_node_max was declared first and stays first.
        let leaf = out.find("{ \"leaf_node_max\", \"1MB\" },");
        let alloc = out.find("{ \"allocation_size\", \"512B\" },");
        assert!(leaf.unwrap() < alloc.unwrap());
        assert!(out.contains("\t{ NULL, NULL }"));
    }

    #[test]
    fn methods_without_options_get_no_table() {
        let reg = Registry::load(SCHEMA).unwrap();
        let out = render_section(
            &reg,
            &Section::ConfigDefaults {
                owner: "session".to_string(),
            },
        )
        .unwrap();
        assert!(!out.contains("session_close"));
    }
}
