use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;

use super::AnalysisError;

// Greedy: first `{` through last `}` across lines.
static OUTERMOST_BRACES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)\{.*\}").expect("valid braces pattern"));

/// Pull the outermost `{...}` span out of free-form model output and parse it.
///
/// The parsed value is not checked against the schema here.
pub fn extract_json(text: &str) -> Result<Value, AnalysisError> {
    let candidate = OUTERMOST_BRACES
        .find(text)
        .ok_or(AnalysisError::NoJsonFound)?;

    serde_json::from_str(candidate.as_str()).map_err(|e| AnalysisError::MalformedJson {
        reason: e.to_string(),
    })
}
