//! Fuzzy matching suggestions for template errors
//!
//! When a template references a variable that is not bound, the closest
//! bound names (by Levenshtein distance) are offered as corrections.

use crate::functions::NORMALIZE_ALIASES;

/// Maximum Levenshtein distance to consider for suggestions
const MAX_SUGGESTION_DISTANCE: usize = 3;

/// Suggestion result with its distance to the input
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Suggestion {
    /// The suggested correction
    pub text: String,
    /// Levenshtein distance (lower = better match)
    pub distance: usize,
}

/// Find closest matches from a list of candidates
pub fn find_closest_matches(input: &str, candidates: &[&str], max_results: usize) -> Vec<Suggestion> {
    let mut suggestions: Vec<Suggestion> = candidates
        .iter()
        .filter_map(|&candidate| {
            let distance = strsim::levenshtein(input, candidate);
            (distance <= MAX_SUGGESTION_DISTANCE && distance > 0).then(|| Suggestion {
                text: candidate.to_string(),
                distance,
            })
        })
        .collect();

    suggestions.sort_by_key(|s| s.distance);
    suggestions.truncate(max_results);
    suggestions
}

/// Suggest corrections for an unbound variable
pub fn suggest_undefined_variable(variable_name: &str, bound_names: &[String]) -> Option<String> {
    let candidates: Vec<&str> = bound_names.iter().map(String::as_str).collect();
    let matches = find_closest_matches(variable_name, &candidates, 3);

    if !matches.is_empty() {
        let names: Vec<String> = matches.iter().map(|s| format!("`{}`", s.text)).collect();
        return Some(format!("Did you mean {}?", names.join(" or ")));
    }

    // Case-only mismatches are common with upper-case variable names
    if let Some(name) = bound_names
        .iter()
        .find(|n| n.eq_ignore_ascii_case(variable_name))
    {
        return Some(format!("Did you mean `{}`? Variable names are case-sensitive.", name));
    }

    if bound_names.is_empty() {
        Some(format!(
            "Variable `{}` is not bound. No variables were supplied; pass it with --set {}=<value>",
            variable_name, variable_name
        ))
    } else {
        Some(format!(
            "Variable `{}` is not bound. Bound variables: {}",
            variable_name,
            bound_names.join(", ")
        ))
    }
}

/// Suggest corrections for an unknown function or filter
pub fn suggest_unknown_helper(name: &str) -> Option<String> {
    find_closest_matches(name, NORMALIZE_ALIASES, 1)
        .first()
        .map(|s| format!("Did you mean `{}`?", s.text))
}

/// Extract a quoted name from an error message
///
/// Pattern: "undefined variable `foo`" or "unknown function 'foo'"
pub fn extract_quoted_name(msg: &str) -> Option<String> {
    let patterns = [("`", "`"), ("'", "'"), ("\"", "\"")];

    for (start, end) in patterns {
        if let Some(start_idx) = msg.find(start) {
            let rest = &msg[start_idx + start.len()..];
            if let Some(end_idx) = rest.find(end) {
                return Some(rest[..end_idx].to_string());
            }
        }
    }
    None
}
