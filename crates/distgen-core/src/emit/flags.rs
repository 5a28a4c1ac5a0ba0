//! Flag-bit emission: per-context bit defines plus the combined API mask.

use heck::ToShoutySnakeCase;

use super::CodeWriter;
use crate::error::RenderError;
use crate::ordering;
use crate::schema::Registry;

/// Flag defines for every context, contexts and flags both in sorted order.
///
/// A context declared with no flags (the "none defined yet" sentinel) still
/// gets its mask define, with value zero, so verifying setters reject any
/// flag bits passed in.
pub(super) fn flag_defines(registry: &Registry, w: &mut CodeWriter) -> Result<(), RenderError> {
    let p = &registry.prefix;
    for (context, set) in &registry.flags {
        w.banner(&format!("Flags for {context}."));
        let mut mask = 0u32;
        for (flag, ordinal) in ordering::numbered(set.flags.iter().map(String::as_str)) {
            let bit = ordering::flag_bit(ordinal);
            mask |= bit;
            w.define_hex(&format!("{p}_{}", flag.to_shouty_snake_case()), bit)?;
        }
        w.define_hex(&format!("{p}_APIMASK_{}", context_ident(context)), mask)?;
        w.blank();
    }
    Ok(())
}

/// Shouty identifier for a flag context; method keys fold `.` into `_`.
pub(crate) fn context_ident(context: &str) -> String {
    context.replace('.', "_").to_shouty_snake_case()
}

#[cfg(test)]
mod tests {
    use crate::emit::render_section;
    use crate::schema::{Registry, Section};

    const SCHEMA: &str = r#"
prefix = "API"

[flags]
"env.verbose_set" = ["VERB_FILEOPS", "VERB_ALL"]
"db.close" = []
"#;

    #[test]
    fn bits_follow_sorted_flag_order() {
        let reg = Registry::load(SCHEMA).unwrap();
        let out = render_section(&reg, &Section::FlagDefines).unwrap();
        // VERB_ALL sorts before VERB_FILEOPS despite declaration order.
        assert!(out.contains("API_VERB_ALL"));
        let all = out.lines().find(|l| l.contains("API_VERB_ALL")).unwrap();
        let fileops = out.lines().find(|l| l.contains("API_VERB_FILEOPS")).unwrap();
        assert!(all.ends_with("0x00000001"));
        assert!(fileops.ends_with("0x00000002"));
        let mask = out
            .lines()
            .find(|l| l.contains("API_APIMASK_ENV_VERBOSE_SET"))
            .unwrap();
        assert!(mask.ends_with("0x00000003"));
    }

    #[test]
    fn sentinel_context_gets_a_zero_mask() {
        let reg = Registry::load(SCHEMA).unwrap();
        let out = render_section(&reg, &Section::FlagDefines).unwrap();
        let mask = out
            .lines()
            .find(|l| l.contains("API_APIMASK_DB_CLOSE"))
            .unwrap();
        assert!(mask.ends_with("0x00000000"));
    }
}
