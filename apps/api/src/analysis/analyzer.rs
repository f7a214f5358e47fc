//! Analysis pipeline: prompt → LLM → normalized result.

use tracing::{debug, info};

use crate::analysis::normalizer::normalize_reply;
use crate::analysis::prompts::{build_analysis_prompt, ANALYSIS_SYSTEM};
use crate::analysis::schema::analysis_response_schema;
use crate::errors::AppError;
use crate::llm_client::LlmBackend;
use crate::models::analysis::{AnalysisRequest, AnalysisResult};

const LOG_PREVIEW_CHARS: usize = 500;

/// Runs one analysis. Fails only on empty input or a provider fault; a reply the
/// normalizer cannot make sense of still produces an (empty) result.
pub async fn analyze_resume(
    request: &AnalysisRequest,
    llm: &dyn LlmBackend,
    structured_output: bool,
) -> Result<AnalysisResult, AppError> {
    debug!(
        "Resume text preview: {}",
        preview(&request.resume_text, LOG_PREVIEW_CHARS)
    );
    info!(
        "Analyzing resume ({} chars) for job field {:?}",
        request.resume_text.chars().count(),
        request.job_field
    );

    if request.resume_text.trim().is_empty() {
        return Err(AppError::InputUnavailable);
    }

    let prompt = build_analysis_prompt(&request.resume_text, &request.job_field);
    let schema = structured_output.then(analysis_response_schema);

    let raw = llm
        .complete(&prompt, ANALYSIS_SYSTEM, schema.as_ref())
        .await?;
    debug!("{} raw response: {raw}", llm.model());

    let result = normalize_reply(&raw);
    if result.is_empty() {
        info!("Analysis complete: model reported no skills");
        return Ok(result);
    }
    info!(
        "Analysis complete: {} detected, {} missing, {} resources",
        result.detected_skills.len(),
        result.missing_skills.len(),
        result.resources.len()
    );
    Ok(result)
}

fn preview(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;
    use serde_json::Value;

    use super::*;
    use crate::llm_client::LlmError;

    /// Scripted backend: records what it was asked and replays a fixed outcome.
    pub(crate) struct ScriptedLlm {
        reply: Result<String, (u16, String)>,
        pub(crate) calls: Mutex<Vec<(String, Option<Value>)>>,
    }

    impl ScriptedLlm {
        pub(crate) fn replying(reply: &str) -> Self {
            Self {
                reply: Ok(reply.to_string()),
                calls: Mutex::new(Vec::new()),
            }
        }

        pub(crate) fn failing(status: u16, message: &str) -> Self {
            Self {
                reply: Err((status, message.to_string())),
                calls: Mutex::new(Vec::new()),
            }
        }

        pub(crate) fn call_count(&self) -> usize {
            self.calls.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl LlmBackend for ScriptedLlm {
        async fn complete(
            &self,
            prompt: &str,
            _system: &str,
            response_schema: Option<&Value>,
        ) -> Result<String, LlmError> {
            self.calls
                .lock()
                .unwrap()
                .push((prompt.to_string(), response_schema.cloned()));
            match &self.reply {
                Ok(text) => Ok(text.clone()),
                Err((status, message)) => Err(LlmError::Api {
                    status: *status,
                    message: message.clone(),
                }),
            }
        }

        fn model(&self) -> &str {
            "scripted"
        }
    }

    fn request(text: &str, job_field: &str) -> AnalysisRequest {
        AnalysisRequest {
            resume_text: text.to_string(),
            job_field: job_field.to_string(),
        }
    }

    #[tokio::test]
    async fn test_blank_text_is_rejected_before_calling_llm() {
        let llm = ScriptedLlm::replying("{}");
        let err = analyze_resume(&request("  \n\t ", "backend"), &llm, true)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::InputUnavailable));
        assert_eq!(llm.call_count(), 0);
    }

    #[tokio::test]
    async fn test_prompt_and_schema_are_sent() {
        let llm = ScriptedLlm::replying(r#"{"detected_skills": ["Go"]}"#);
        let result = analyze_resume(&request("Wrote Go services", "backend"), &llm, true)
            .await
            .unwrap();
        assert_eq!(result.detected_skills, vec!["Go"]);

        let calls = llm.calls.lock().unwrap();
        let (prompt, schema) = &calls[0];
        assert!(prompt.contains("Wrote Go services"));
        assert!(prompt.contains("backend"));
        assert_eq!(schema.as_ref().unwrap()["type"], "OBJECT");
    }

    #[tokio::test]
    async fn test_schema_omitted_when_structured_output_disabled() {
        let llm = ScriptedLlm::replying("{}");
        analyze_resume(&request("Rust", ""), &llm, false).await.unwrap();
        assert!(llm.calls.lock().unwrap()[0].1.is_none());
    }

    #[tokio::test]
    async fn test_provider_failure_is_propagated() {
        let llm = ScriptedLlm::failing(429, "Resource has been exhausted");
        let err = analyze_resume(&request("Rust", "systems"), &llm, true)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Llm(LlmError::Api { status: 429, .. })));
        assert_eq!(llm.call_count(), 1);
    }

    #[tokio::test]
    async fn test_garbage_reply_yields_empty_result() {
        let llm = ScriptedLlm::replying("<html>502 Bad Gateway</html>");
        let result = analyze_resume(&request("Rust", "systems"), &llm, true)
            .await
            .unwrap();
        assert!(result.is_empty());
    }

    #[test]
    fn test_preview_respects_char_boundaries() {
        assert_eq!(preview("héllo wörld", 4), "héll");
        assert_eq!(preview("short", 500), "short");
    }
}
