//! Variable interpolation for strings
//!
//! This module handles parsing and replacing variables in strings using the ${var} syntax.
//! Anything else that looks like shell syntax (`$HOME`, `$(pwd)`, `${1}`) is left alone.

use regex::Regex;
use std::sync::OnceLock;

fn placeholder_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)\}").expect("placeholder regex"))
}

/// Names referenced by `${name}` placeholders in `s`, in order of appearance
pub fn placeholders(s: &str) -> Vec<&str> {
    placeholder_regex()
        .captures_iter(s)
        .filter_map(|caps| caps.get(1).map(|m| m.as_str()))
        .collect()
}

/// Whether `s` references `${name}`
pub fn references(s: &str, name: &str) -> bool {
    placeholders(s).contains(&name)
}

/// Replace every placeholder with the value `lookup` returns for it.
///
/// Substituted values are not scanned again, so a value containing `${...}`
/// is inserted literally.
pub fn interpolate_with<F, E>(s: &str, mut lookup: F) -> Result<String, E>
where
    F: FnMut(&str) -> Result<String, E>,
{
    let re = placeholder_regex();
    let mut result = String::with_capacity(s.len());
    let mut last = 0;

    for caps in re.captures_iter(s) {
        let (Some(whole), Some(name)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        result.push_str(&s[last..whole.start()]);
        result.push_str(&lookup(name.as_str())?);
        last = whole.end();
    }
    result.push_str(&s[last..]);

    Ok(result)
}
