use serde::{Deserialize, Serialize};

/// Resume text and target field resolved from an incoming request.
/// Both fields may be empty; emptiness is rejected by the handler, not here.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnalysisRequest {
    pub resume_text: String,
    pub job_field: String,
}

/// One learning resource suggested for a missing skill.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resource {
    pub skill: String,
    pub resource: String,
}

/// Structured analysis returned to callers of `POST /analyze`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub detected_skills: Vec<String>,
    pub missing_skills: Vec<String>,
    pub resources: Vec<Resource>,
    /// Raw model reply, set only when it could not be normalized.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw_output: Option<String>,
}

impl AnalysisResult {
    /// Empty result carrying the unparseable model reply for diagnostics.
    pub fn unparsed(raw: &str) -> Self {
        Self {
            raw_output: Some(raw.to_string()),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.detected_skills.is_empty()
            && self.missing_skills.is_empty()
            && self.resources.is_empty()
    }
}

/// Failure body: the result shape with every list empty, plus the fault description.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorEnvelope {
    pub detected_skills: Vec<String>,
    pub missing_skills: Vec<String>,
    pub resources: Vec<Resource>,
    pub error: String,
}

impl ErrorEnvelope {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            detected_skills: Vec::new(),
            missing_skills: Vec::new(),
            resources: Vec::new(),
            error: error.into(),
        }
    }
}
