//! Code emission: fixed-format C text rendered from the registry.
//!
//! Every section renders through a [`CodeWriter`], which owns the formatting
//! rules: tab-stop aligned define values, the 80-column line budget, and
//! greedy argument-list wrapping. Output is byte-exact and reproducible for
//! a given schema — the commit gate compares verbatim.

mod config;
mod flags;
mod methods;
mod stats;

use crate::error::RenderError;
use crate::schema::{Registry, Section};

/// Tab stops every eight columns, matching the consuming C tree.
pub(crate) const TAB_WIDTH: usize = 8;

/// Column define values are aligned to, regardless of name length.
pub(crate) const VALUE_COLUMN: usize = 56;

/// Maximum expanded line width before an emitter must split.
pub(crate) const LINE_BUDGET: usize = 80;

/// Render one section into a fresh buffer.
pub fn render_section(registry: &Registry, section: &Section) -> Result<String, RenderError> {
    let mut w = CodeWriter::new();
    match section {
        Section::StatDefines => stats::stat_defines(registry, &mut w)?,
        Section::StatFunctions => stats::stat_functions(registry, &mut w),
        Section::FlagDefines => flags::flag_defines(registry, &mut w)?,
        Section::MethodStubs { owner } => methods::method_stubs(registry, owner, &mut w),
        Section::ConfigDefaults { owner } => config::config_defaults(registry, owner, &mut w),
    }
    Ok(w.finish())
}

/// Append buffer scoped to one render operation.
pub(crate) struct CodeWriter {
    buf: String,
}

impl CodeWriter {
    pub fn new() -> Self {
        Self { buf: String::new() }
    }

    /// Finish the section: exactly one trailing newline, no trailing blanks.
    pub fn finish(mut self) -> String {
        while self.buf.ends_with('\n') {
            self.buf.pop();
        }
        self.buf.push('\n');
        self.buf
    }

    pub fn line(&mut self, s: &str) {
        self.buf.push_str(s);
        self.buf.push('\n');
    }

    pub fn blank(&mut self) {
        self.buf.push('\n');
    }

    /// C block comment banner.
    pub fn banner(&mut self, text: &str) {
        self.buf.push_str("/*\n");
        self.buf.push_str(" * ");
        self.buf.push_str(text);
        self.buf.push('\n');
        self.buf.push_str(" */\n");
    }

    /// `#define` with the value column pinned to [`VALUE_COLUMN`]. A name
    /// too long to reach the column with at least one tab is a render error.
    pub fn define(&mut self, name: &str, value: &str) -> Result<(), RenderError> {
        let mut col = TAB_WIDTH + name.len();
        if col >= VALUE_COLUMN {
            return Err(RenderError::DefineTooLong {
                name: name.to_string(),
            });
        }
        self.buf.push_str("#define\t");
        self.buf.push_str(name);
        while col < VALUE_COLUMN {
            self.buf.push('\t');
            col = (col / TAB_WIDTH + 1) * TAB_WIDTH;
        }
        self.buf.push_str(value);
        self.buf.push('\n');
        Ok(())
    }

    /// Define with a decimal identifier, right-aligned in five columns.
    pub fn define_dec(&mut self, name: &str, value: usize) -> Result<(), RenderError> {
        self.define(name, &format!("{value:5}"))
    }

    /// Define with a 32-bit hex flag value.
    pub fn define_hex(&mut self, name: &str, value: u32) -> Result<(), RenderError> {
        self.define(name, &format!("0x{value:08x}"))
    }

    /// Emit `head` + comma-separated `args` + `tail`, greedily packed into
    /// lines within the budget; continuation lines are indented one tab
    /// plus four spaces.
    pub fn packed(&mut self, head: &str, args: &[String], tail: &str) {
        if args.is_empty() {
            self.line(&format!("{head}{tail}"));
            return;
        }
        let mut cur = head.to_string();
        for (i, arg) in args.iter().enumerate() {
            let sep = if i + 1 == args.len() { tail } else { "," };
            let glued = if cur.ends_with('(') || cur.ends_with("\t    ") {
                format!("{cur}{arg}{sep}")
            } else {
                format!("{cur} {arg}{sep}")
            };
            if expanded_width(&glued) > LINE_BUDGET && !cur.ends_with('(') {
                self.line(&cur);
                cur = format!("\t    {arg}{sep}");
            } else {
                cur = glued;
            }
        }
        self.line(&cur);
    }
}

/// Display width with tabs expanded to the next tab stop.
pub(crate) fn expanded_width(s: &str) -> usize {
    let mut col = 0;
    for ch in s.chars() {
        if ch == '\t' {
            col = (col / TAB_WIDTH + 1) * TAB_WIDTH;
        } else {
            col += 1;
        }
    }
    col
}

/// Escape a schema string for inclusion in a C string literal.
pub(crate) fn c_quote(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            other => out.push(other),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn value_offset(line: &str) -> usize {
        // Expanded width of everything before the value field.
        let prefix = line.trim_end_matches(|c: char| c != '\t');
        expanded_width(prefix)
    }

    #[test]
    fn define_values_align_for_short_and_long_names() {
        let mut w = CodeWriter::new();
        w.define_dec("SHORT", 0).unwrap();
        w.define_dec(&"N".repeat(40), 1).unwrap();
        let out = w.finish();
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(value_offset(lines[0]), VALUE_COLUMN);
        assert_eq!(value_offset(lines[1]), VALUE_COLUMN);
        assert!(lines[0].ends_with("    0"));
        assert!(lines[1].ends_with("    1"));
    }

    #[test]
    fn over_long_define_name_is_a_render_error() {
        let mut w = CodeWriter::new();
        let err = w.define_dec(&"N".repeat(48), 0).unwrap_err();
        assert!(matches!(err, RenderError::DefineTooLong { .. }));
    }

    #[test]
    fn finish_normalizes_trailing_blank_lines() {
        let mut w = CodeWriter::new();
        w.line("x");
        w.blank();
        w.blank();
        assert_eq!(w.finish(), "x\n");
    }

    #[test]
    fn packed_keeps_short_calls_on_one_line() {
        let mut w = CodeWriter::new();
        w.packed(
            "\tAPI_FLAG_CHK(",
            &["env".into(), "flags".into(), "MASK".into()],
            ");",
        );
        assert_eq!(w.finish(), "\tAPI_FLAG_CHK(env, flags, MASK);\n");
    }

    #[test]
    fn packed_wraps_at_the_line_budget() {
        let long: Vec<String> = (0..6)
            .map(|i| format!("int (*cb{i})(DB *, DBT **, DBT **)"))
            .collect();
        let mut w = CodeWriter::new();
        w.packed("int __api_db_bulk_load(", &long, ");");
        let out = w.finish();
        assert!(out.lines().count() > 1);
        for line in out.lines() {
            assert!(expanded_width(line) <= LINE_BUDGET, "over budget: {line:?}");
        }
        for line in out.lines().skip(1) {
            assert!(line.starts_with("\t    "));
        }
    }

    #[test]
    fn c_quote_escapes_specials() {
        assert_eq!(c_quote(r#"a "b" \c"#), r#"a \"b\" \\c"#);
    }
}
