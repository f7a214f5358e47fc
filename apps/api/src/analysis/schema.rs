use serde_json::{json, Value};

/// Structured-output schema for the analysis reply, in Gemini's OpenAPI-subset form.
/// Advisory: the normalizer validates the reply whether or not the model honoured it.
pub fn analysis_response_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "detected_skills": {
                "type": "ARRAY",
                "items": { "type": "STRING" },
                "description": "Skills detected in the resume text, explicit or inferred."
            },
            "missing_skills": {
                "type": "ARRAY",
                "items": { "type": "STRING" },
                "description": "Skills expected for the target field that the resume lacks."
            },
            "resources": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "skill": { "type": "STRING" },
                        "resource": { "type": "STRING" }
                    },
                    "required": ["skill", "resource"]
                },
                "description": "One learning resource URL per missing skill."
            }
        },
        "required": ["detected_skills", "missing_skills", "resources"]
    })
}
