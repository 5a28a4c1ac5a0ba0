//! Method stub emission: accessor bodies and prototypes per owner.

use heck::ToShoutySnakeCase;

use super::flags::context_ident;
use super::CodeWriter;
use crate::schema::{MethodSpec, Registry};

/// Stubs for every method of one owner, in sorted key order.
///
/// Tag selection:
/// - `no-stub`: nothing is emitted;
/// - `hand-written`, or neither accessor tag: extern prototype only;
/// - `getter` / `setter`: full accessor body. Setters additionally get the
///   flag check (non-empty flag set plus `validates-input`), the verify
///   call, and state-transition assertions when declared.
pub(super) fn method_stubs(registry: &Registry, owner: &str, w: &mut CodeWriter) {
    for method in registry.methods_of(owner) {
        if method.tags.no_stub {
            continue;
        }
        if method.tags.hand_written || (!method.tags.getter && !method.tags.setter) {
            prototype(registry, method, w);
        } else {
            accessor(registry, method, w);
        }
    }
}

fn return_type(method: &MethodSpec) -> &'static str {
    if method.tags.returns_void {
        "void"
    } else {
        "int"
    }
}

fn stub_name(registry: &Registry, method: &MethodSpec) -> String {
    format!(
        "__{}_{}_{}",
        registry.prefix.to_lowercase(),
        method.owner,
        method.name
    )
}

/// Extern prototype for methods whose body lives elsewhere.
fn prototype(registry: &Registry, method: &MethodSpec, w: &mut CodeWriter) {
    let owner_ty = method.owner.to_shouty_snake_case();
    let mut args = vec![format!("{owner_ty} *")];
    args.extend(method.args.iter().map(|a| a.decl.anonymous()));
    w.packed(
        &format!("{} {}(", return_type(method), stub_name(registry, method)),
        &args,
        ");",
    );
    w.blank();
}

fn accessor(registry: &Registry, method: &MethodSpec, w: &mut CodeWriter) {
    let p = &registry.prefix;
    let owner_ty = method.owner.to_shouty_snake_case();
    let ov = &method.owner;
    let name = stub_name(registry, method);
    let kind = if method.tags.getter { "Getter" } else { "Setter" };

    w.line("/*");
    w.line(&format!(" * {name} --"));
    w.line(&format!(" *\t{kind} for {}.", method.key));
    w.line(" */");
    w.line(&format!("static {}", return_type(method)));
    let mut args = vec![format!("{owner_ty} *{ov}")];
    args.extend(method.args.iter().map(|a| a.decl.named(&a.name)));
    w.packed(&format!("{name}("), &args, ")");
    w.line("{");

    // Callable-state assertions come first.
    for state in &method.on {
        w.line(&format!("\t{p}_STATE_CHK({ov}, \"{}\", {state});", method.key));
    }

    if method.tags.setter {
        if method.tags.validates_input {
            if let Some(mask) = flag_mask(registry, method) {
                w.packed(
                    &format!("\t{p}_FLAG_CHK("),
                    &[
                        ov.to_string(),
                        format!("\"{}\"", method.key),
                        checked_value(method),
                        mask,
                    ],
                    ");",
                );
            }
            let mut verify_args = vec![ov.to_string()];
            verify_args.extend(method.args.iter().map(|a| a.name.clone()));
            w.packed(&format!("\t{p}_RET({name}_verify("), &verify_args, "));");
        }
        for arg in &method.args {
            w.line(&format!("\t{ov}->{0} = {0};", arg.name));
        }
    } else {
        for arg in &method.args {
            w.line(&format!("\t*{0} = {ov}->{0};", arg.name));
        }
    }

    // Successor-state transitions happen last, once the body succeeded.
    for state in &method.off {
        w.line(&format!("\t{p}_STATE_SET({ov}, {state});"));
    }

    if method.tags.returns_status {
        w.line("\treturn (0);");
    }
    w.line("}");
    w.blank();
}

/// Mask identifier when the method has a non-empty flag set.
fn flag_mask(registry: &Registry, method: &MethodSpec) -> Option<String> {
    let context = method.flag_context.as_deref()?;
    let set = registry.flags.get(context)?;
    if set.flags.is_empty() {
        return None;
    }
    Some(format!(
        "{}_APIMASK_{}",
        registry.prefix,
        context_ident(context)
    ))
}

/// The argument value validated against the flag mask.
fn checked_value(method: &MethodSpec) -> String {
    method
        .args
        .first()
        .map(|a| a.name.clone())
        .unwrap_or_else(|| "0".to_string())
}

#[cfg(test)]
mod tests {
    use crate::emit::render_section;
    use crate::schema::{Registry, Section};

    const SCHEMA: &str = r#"
prefix = "API"

[flags]
"env.verbose_set" = ["VERB_ALL", "VERB_FILEOPS"]
"env.close" = []

[[method]]
key = "env.verbose_get"
tags = ["returns-status", "getter"]
args = [{ name = "verbose", decl = "u_int32_t *@S" }]

[[method]]
key = "env.verbose_set"
tags = ["returns-status", "setter", "validates-input"]
args = [{ name = "verbose", decl = "u_int32_t @S" }]
flag_context = "env.verbose_set"
on = ["init"]
off = ["open"]

[[method]]
key = "env.close"
tags = ["returns-status"]
args = [{ name = "flags", decl = "u_int32_t @S" }]
flag_context = "env.close"

[[method]]
key = "env.err"
tags = ["returns-void", "no-stub"]

[[method]]
key = "env.huffman_set"
tags = ["returns-status", "setter", "hand-written"]
args = [{ name = "table", decl = "const u_int8_t *@S" }]
"#;

    fn render(owner: &str) -> String {
        let reg = Registry::load(SCHEMA).unwrap();
        render_section(
            &reg,
            &Section::MethodStubs {
                owner: owner.to_string(),
            },
        )
        .unwrap()
    }

    #[test]
    fn getter_assigns_through_the_pointer() {
        let out = render("env");
        assert!(out.contains("__api_env_verbose_get(ENV *env, u_int32_t *verbose)"));
        assert!(out.contains("\t*verbose = env->verbose;"));
    }

    #[test]
    fn verifying_setter_checks_flags_then_verifies_then_assigns() {
        let out = render("env");
        // The call exceeds the line budget and wraps after the third argument.
        let chk = out.find(
            "API_FLAG_CHK(env, \"env.verbose_set\", verbose,\n\t    API_APIMASK_ENV_VERBOSE_SET);",
        );
        let verify = out.find("API_RET(__api_env_verbose_set_verify(env, verbose));");
        let assign = out.find("env->verbose = verbose;");
        assert!(chk.unwrap() < verify.unwrap());
        assert!(verify.unwrap() < assign.unwrap());
    }

    #[test]
    fn state_assertions_bracket_the_body() {
        let out = render("env");
        let on = out.find("API_STATE_CHK(env, \"env.verbose_set\", init);");
        let off = out.find("API_STATE_SET(env, open);");
        let ret = out.find("__api_env_verbose_set(");
        assert!(ret.unwrap() < on.unwrap());
        assert!(on.unwrap() < off.unwrap());
    }

    #[test]
    fn plain_and_hand_written_methods_get_prototypes_only() {
        let out = render("env");
        assert!(out.contains("int __api_env_close(ENV *, u_int32_t);"));
        assert!(out.contains("int __api_env_huffman_set(ENV *, const u_int8_t *);"));
        assert!(!out.contains("env->table = table;"));
    }

    #[test]
    fn no_stub_methods_are_omitted_entirely() {
        let out = render("env");
        assert!(!out.contains("env_err"));
    }

    #[test]
    fn sentinel_flag_context_emits_no_flag_check() {
        let schema = SCHEMA.replace(
            "flag_context = \"env.verbose_set\"",
            "flag_context = \"env.close\"",
        );
        let reg = Registry::load(&schema).unwrap();
        let out = render_section(
            &reg,
            &Section::MethodStubs {
                owner: "env".to_string(),
            },
        )
        .unwrap();
        assert!(!out.contains("API_FLAG_CHK"));
        // The verify call still runs.
        assert!(out.contains("API_RET(__api_env_verbose_set_verify(env, verbose));"));
    }
}
