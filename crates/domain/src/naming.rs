//! Hierarchical region naming rules
//!
//! Region names encode nesting with dot-separated numeric components:
//! roots are "1", "2", ...; children of "1" are "1.1", "1.2", and so on.
//! Root names take the smallest unused positive integer among all regions
//! of the relevant kind; child names extend the parent with the smallest
//! unused suffix among that parent's direct children.

use std::sync::OnceLock;

use regex_lite::Regex;

/// Numeric root component of a hierarchical name ("1.2.3" -> 1).
pub fn root_prefix(name: &str) -> Option<u32> {
    let root = name.split('.').next().unwrap_or(name);
    root.trim().parse().ok()
}

/// Next available root name among `names`: one past the largest numeric
/// root prefix, starting at "1".
pub fn next_root_name<'a>(names: impl IntoIterator<Item = &'a str>) -> String {
    let max = names
        .into_iter()
        .filter_map(root_prefix)
        .max()
        .unwrap_or(0);
    (max + 1).to_string()
}

/// Next available child name under `parent` among `names`.
///
/// Only direct children count: "1.2" is a child of "1", "1.2.1" is not.
pub fn next_child_name<'a>(parent: &str, names: impl IntoIterator<Item = &'a str>) -> String {
    let prefix = format!("{parent}.");
    let max = names
        .into_iter()
        .filter_map(|name| {
            let suffix = name.strip_prefix(prefix.as_str())?;
            if suffix.contains('.') {
                return None;
            }
            suffix.parse::<u32>().ok()
        })
        .max()
        .unwrap_or(0);
    format!("{parent}.{}", max + 1)
}

/// Trailing digits of a name ("Wall 12" -> "12"), used when deriving
/// split-segment names from an edited wall.
pub fn trailing_digits(name: &str) -> Option<String> {
    static TRAILING: OnceLock<Regex> = OnceLock::new();
    let re =
        TRAILING.get_or_init(|| Regex::new(r"(\d+)\s*$").expect("static pattern is valid"));
    re.captures(name)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}
