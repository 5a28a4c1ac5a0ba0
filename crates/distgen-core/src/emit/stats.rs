//! Statistics emission: identifier defines plus allocation/clear routines.

use heck::{ToShoutySnakeCase, ToSnakeCase};

use super::{c_quote, expanded_width, CodeWriter, LINE_BUDGET};
use crate::error::RenderError;
use crate::ordering;
use crate::schema::{Handle, Registry, StatEntry};

/// Per-handle total and identifier defines, entries in sorted key order.
pub(super) fn stat_defines(registry: &Registry, w: &mut CodeWriter) -> Result<(), RenderError> {
    let p = &registry.prefix;
    for handle in &registry.handles {
        let hident = handle.name.to_shouty_snake_case();
        w.banner(&format!("Statistics entries for the {} handle.", handle.name));
        w.define_dec(&format!("{p}_STAT_{hident}_TOTAL"), handle.stats.len())?;
        w.blank();
        for (key, id) in ordering::numbered(handle.stats.iter().map(|s| s.key.as_str())) {
            w.define_dec(&format!("{p}_STAT_{}", key.to_shouty_snake_case()), id)?;
        }
        w.blank();
    }
    Ok(())
}

/// Per-handle allocation and clear routines.
pub(super) fn stat_functions(registry: &Registry, w: &mut CodeWriter) {
    let p = &registry.prefix;
    let pl = registry.prefix.to_lowercase();
    let ctx_ty = &registry.context_type;
    let ctx = &registry.context_var;

    for handle in &registry.handles {
        let hl = handle.name.to_snake_case();
        let hident = handle.name.to_shouty_snake_case();

        w.line("int");
        w.line(&format!(
            "__{pl}_stat_alloc_{hl}_stats({ctx_ty} *{ctx}, {p}_STATS **statsp)"
        ));
        w.line("{");
        w.line(&format!("\t{p}_STATS *stats;"));
        w.blank();
        // Table is sized to total + 1 so the last entry stays zeroed as a
        // terminator.
        w.line(&format!("\t{p}_RET(__{pl}_calloc({ctx},"));
        w.line(&format!(
            "\t    {p}_STAT_{hident}_TOTAL + 1, sizeof({p}_STATS), &stats));"
        ));
        w.blank();
        for entry in sorted_stats(handle) {
            let ident = format!("{p}_STAT_{}", entry.key.to_shouty_snake_case());
            let desc = c_quote(&entry.desc);
            let single = format!("\tstats[{ident}].desc = \"{desc}\";");
            if expanded_width(&single) > LINE_BUDGET {
                w.line(&format!("\tstats[{ident}].desc ="));
                w.line(&format!("\t    \"{desc}\";"));
            } else {
                w.line(&single);
            }
        }
        w.blank();
        w.line("\t*statsp = stats;");
        w.line("\treturn (0);");
        w.line("}");
        w.blank();

        w.line("void");
        w.line(&format!("__{pl}_stat_clear_{hl}_stats({p}_STATS *stats)"));
        w.line("{");
        for entry in sorted_stats(handle) {
            // Entries marked permanent are never reset by the clear routine.
            if entry.permanent {
                continue;
            }
            let ident = format!("{p}_STAT_{}", entry.key.to_shouty_snake_case());
            w.line(&format!("\tstats[{ident}].v = 0;"));
        }
        w.line("}");
        w.blank();
    }
}

fn sorted_stats(handle: &Handle) -> Vec<&StatEntry> {
    let mut entries: Vec<&StatEntry> = handle.stats.iter().collect();
    entries.sort_unstable_by(|a, b| a.key.cmp(&b.key));
    entries
}
