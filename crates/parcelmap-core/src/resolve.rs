//! Case-insensitive, priority-ordered field lookup over heterogeneous
//! attribute bags.
//!
//! County GIS layers disagree on both naming (`OWNER1`, `OWNER_NAME`,
//! `ownname`) and casing, so every lookup takes a list of candidate names
//! and returns the first one that holds a usable value.

use serde_json::Value;

/// Attribute bag as returned by a feature service: field name to scalar.
pub type RawAttributes = serde_json::Map<String, Value>;

/// Returns the value of the first candidate that is present and usable.
///
/// For each candidate, an exact key match is tried before a
/// case-insensitive scan over all keys. `null` and blank strings (empty or
/// whitespace-only) count as absent, so a blank field never shadows a later
/// candidate.
#[must_use]
pub fn resolve_field<'a, S: AsRef<str>>(
    attributes: &'a RawAttributes,
    candidates: &[S],
) -> Option<&'a Value> {
    candidates
        .iter()
        .filter_map(|name| lookup(attributes, name.as_ref()))
        .find(|value| is_usable(value))
}

/// [`resolve_field`] rendered as text, or `fallback` when nothing resolves.
#[must_use]
pub fn resolve_field_or<S: AsRef<str>>(
    attributes: &RawAttributes,
    candidates: &[S],
    fallback: &str,
) -> String {
    resolve_text(attributes, candidates).unwrap_or_else(|| fallback.to_string())
}

/// Resolves a field and renders it as text.
///
/// Numbers are rendered without a trailing `.0` when integral, so a
/// `YEARBUILT` of `1978.0` reads as `"1978"`.
#[must_use]
pub fn resolve_text<S: AsRef<str>>(attributes: &RawAttributes, candidates: &[S]) -> Option<String> {
    resolve_field(attributes, candidates)
        .and_then(value_to_text)
        .filter(|text| !text.is_empty())
}

/// Resolves a field and interprets it as a number.
///
/// Numeric strings are accepted after stripping `$`, `,` and whitespace.
/// A resolved value that does not parse is treated as absent.
#[must_use]
pub fn resolve_number<S: AsRef<str>>(attributes: &RawAttributes, candidates: &[S]) -> Option<f64> {
    match resolve_field(attributes, candidates)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => {
            let cleaned: String = s
                .chars()
                .filter(|c| !matches!(c, '$' | ',') && !c.is_whitespace())
                .collect();
            cleaned.parse::<f64>().ok().filter(|n| n.is_finite())
        }
        _ => None,
    }
}

fn lookup<'a>(attributes: &'a RawAttributes, name: &str) -> Option<&'a Value> {
    attributes.get(name).or_else(|| {
        attributes
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value)
    })
}

fn is_usable(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::String(s) => !s.trim().is_empty(),
        _ => true,
    }
}

fn value_to_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.trim().to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => {
            if n.is_i64() || n.is_u64() {
                return Some(n.to_string());
            }
            let f = n.as_f64()?;
            if f.fract().abs() < f64::EPSILON && f.abs() < 1e15 {
                Some(format!("{f:.0}"))
            } else {
                Some(f.to_string())
            }
        }
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}
