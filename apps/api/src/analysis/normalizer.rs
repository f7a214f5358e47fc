//! Response normalizer: turns an untrusted model reply into an `AnalysisResult`.
//!
//! The reply goes through an ordered list of parse stages until one yields JSON.
//! That JSON is coerced into the three-list shape; when no stage parses or the
//! coercion rejects the value, the caller gets an empty result carrying the raw
//! reply. Nothing here returns an error.

use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::models::analysis::{AnalysisResult, Resource};

type ParseStage = fn(&str) -> Option<Value>;

/// Parse stages in the order they are tried.
const PARSE_STAGES: [(&str, ParseStage); 3] = [
    ("direct", parse_direct),
    ("sanitized", parse_sanitized),
    ("brace_span", parse_brace_span),
];

/// Normalizes a raw model reply. Always returns a well-formed result.
///
/// The first stage that yields JSON decides the outcome: if that JSON does not
/// coerce into the result shape, later stages are not consulted.
pub fn normalize_reply(raw: &str) -> AnalysisResult {
    let text = unwrap_code_fence(raw);

    let parsed = PARSE_STAGES
        .iter()
        .find_map(|(name, stage)| stage(text).map(|value| (*name, value)));

    if let Some((name, value)) = parsed {
        if let Some(result) = coerce_result(value) {
            debug!("Model reply normalized via {name} stage");
            return result;
        }
        debug!("{name} stage parsed JSON of the wrong shape");
    }

    warn!(
        "Model reply could not be normalized ({} bytes); returning empty result",
        raw.len()
    );
    AnalysisResult::unparsed(raw)
}

/// Trims the reply and drops a surrounding markdown fence (```` ```json ````
/// or a bare ```` ``` ````). An unclosed fence only loses its opening line marker.
fn unwrap_code_fence(reply: &str) -> &str {
    let reply = reply.trim();
    let Some(body) = reply
        .strip_prefix("```json")
        .or_else(|| reply.strip_prefix("```"))
    else {
        return reply;
    };
    let body = body.trim_start();
    body.strip_suffix("```").map_or(body, str::trim_end)
}

fn parse_direct(text: &str) -> Option<Value> {
    serde_json::from_str(text).ok()
}

/// Drops C0 control characters and DEL, then parses.
fn parse_sanitized(text: &str) -> Option<Value> {
    let cleaned = strip_control_chars(text);
    if cleaned.len() == text.len() {
        return None;
    }
    serde_json::from_str(&cleaned).ok()
}

/// Parses the greedy span from the first `{` to the last `}`.
fn parse_brace_span(text: &str) -> Option<Value> {
    let cleaned = strip_control_chars(text);
    let start = cleaned.find('{')?;
    let end = cleaned.rfind('}')?;
    if end <= start {
        return None;
    }
    serde_json::from_str(&cleaned[start..=end]).ok()
}

fn strip_control_chars(text: &str) -> String {
    text.chars().filter(|c| !c.is_ascii_control()).collect()
}

/// Coerces parsed JSON into the result shape.
/// A top-level array contributes its first element. Missing or null fields become
/// empty lists; a field holding anything other than an array rejects the value.
fn coerce_result(value: Value) -> Option<AnalysisResult> {
    let object = match value {
        Value::Object(map) => map,
        Value::Array(items) => match items.into_iter().next()? {
            Value::Object(map) => map,
            _ => return None,
        },
        _ => return None,
    };

    Some(AnalysisResult {
        detected_skills: skill_list(&object, "detected_skills")?,
        missing_skills: skill_list(&object, "missing_skills")?,
        resources: list_field(&object, "resources")?
            .iter()
            .filter_map(coerce_resource)
            .collect(),
        raw_output: None,
    })
}

fn list_field<'a>(object: &'a Map<String, Value>, key: &str) -> Option<&'a [Value]> {
    match object.get(key) {
        None | Some(Value::Null) => Some(&[]),
        Some(Value::Array(items)) => Some(items.as_slice()),
        Some(_) => None,
    }
}

/// Non-string entries are dropped.
fn skill_list(object: &Map<String, Value>, key: &str) -> Option<Vec<String>> {
    Some(
        list_field(object, key)?
            .iter()
            .filter_map(|v| v.as_str().map(String::from))
            .collect(),
    )
}

/// Accepts `{"skill", "resource"}` objects and bare URL strings.
fn coerce_resource(value: &Value) -> Option<Resource> {
    match value {
        Value::Object(map) => {
            let field = |key: &str| {
                map.get(key)
                    .and_then(|v| v.as_str())
                    .unwrap_or_default()
                    .to_string()
            };
            Some(Resource {
                skill: field("skill"),
                resource: field("resource"),
            })
        }
        Value::String(url) => Some(Resource {
            skill: String::new(),
            resource: url.clone(),
        }),
        _ => None,
    }
}
