//! Variable substitution for user supplied templates.
//!
//! Both `${name}` and `{name}` placeholders are recognised. Placeholders
//! whose name is not in the variable set are left untouched.

use std::collections::HashMap;
use std::sync::OnceLock;

use regex::{Captures, Regex};

fn placeholder_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\$?\{([A-Za-z_][A-Za-z0-9_]*)\}").expect("valid placeholder regex"))
}

/// Template variables keyed by name
pub type Vars = HashMap<String, String>;

/// Build a variable set from `(name, value)` pairs
pub fn vars<I, K, V>(pairs: I) -> Vars
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<String>,
{
    pairs
        .into_iter()
        .map(|(k, v)| (k.into(), v.into()))
        .collect()
}

/// Replace every known placeholder in `template`
pub fn render(template: &str, vars: &Vars) -> String {
    placeholder_re()
        .replace_all(template, |caps: &Captures<'_>| match vars.get(&caps[1]) {
            Some(value) => value.clone(),
            None => caps[0].to_string(),
        })
        .into_owned()
}
