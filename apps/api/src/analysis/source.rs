//! Text source resolver: works out where the resume text comes from.
//!
//! A multipart upload with a non-empty `resume` part is decoded as a PDF; otherwise
//! the body is read as JSON `{"text", "job_field"?}`. Resolution never fails: an
//! unusable request simply resolves to empty text, which the handler rejects.

use std::convert::Infallible;
use std::fmt;

use axum::{
    async_trait,
    extract::{FromRequest, Multipart, Request},
    http::header::CONTENT_TYPE,
};
use bytes::Bytes;
use serde_json::Value;
use tracing::warn;

use crate::analysis::pdf::extract_pdf_text;
use crate::models::analysis::AnalysisRequest;

const RESUME_FIELD: &str = "resume";
const JOB_FIELD: &str = "job_field";
const TEXT_FIELD: &str = "text";

/// Where the resume text was taken from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextSource {
    PdfUpload,
    FormText,
    JsonBody,
    Missing,
}

impl fmt::Display for TextSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            TextSource::PdfUpload => "pdf_upload",
            TextSource::FormText => "form_text",
            TextSource::JsonBody => "json_body",
            TextSource::Missing => "missing",
        })
    }
}

/// Extractor yielding the resolved `AnalysisRequest` for `POST /analyze`.
#[derive(Debug)]
pub struct ResumeSubmission {
    pub request: AnalysisRequest,
    pub source: TextSource,
}

#[async_trait]
impl<S> FromRequest<S> for ResumeSubmission
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let is_multipart = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|ct| ct.to_ascii_lowercase().starts_with("multipart/form-data"));

        if is_multipart {
            return Ok(match Multipart::from_request(req, state).await {
                Ok(multipart) => resolve_multipart(read_form(multipart).await).await,
                Err(e) => {
                    warn!("Unreadable multipart request: {e}");
                    ResumeSubmission::missing(String::new())
                }
            });
        }

        Ok(match Bytes::from_request(req, state).await {
            Ok(body) => resolve_json_body(&body),
            Err(e) => {
                warn!("Unreadable request body: {e}");
                ResumeSubmission::missing(String::new())
            }
        })
    }
}

impl ResumeSubmission {
    fn missing(job_field: String) -> Self {
        Self {
            request: AnalysisRequest {
                resume_text: String::new(),
                job_field,
            },
            source: TextSource::Missing,
        }
    }
}

/// Fields collected from a multipart form.
#[derive(Debug, Default)]
struct FormParts {
    upload: Option<Bytes>,
    text: Option<String>,
    job_field: Option<String>,
}

/// Reads the fields we care about. A stream error ends reading; whatever was
/// collected so far is kept.
async fn read_form(mut multipart: Multipart) -> FormParts {
    let mut parts = FormParts::default();

    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(e) => {
                warn!("Multipart stream error: {e}");
                break;
            }
        };

        let name = field.name().unwrap_or_default().to_string();
        let outcome = match name.as_str() {
            RESUME_FIELD => field.bytes().await.map(|b| parts.upload = Some(b)),
            TEXT_FIELD => field.text().await.map(|t| parts.text = Some(t)),
            JOB_FIELD => field.text().await.map(|t| parts.job_field = Some(t)),
            _ => Ok(()),
        };

        if let Err(e) = outcome {
            warn!("Failed to read multipart field '{name}': {e}");
            break;
        }
    }

    parts
}

async fn resolve_multipart(parts: FormParts) -> ResumeSubmission {
    let job_field = parts.job_field.unwrap_or_default();

    if let Some(upload) = parts.upload.filter(|b| !b.is_empty()) {
        let resume_text = extract_pdf_text(upload).await;
        return ResumeSubmission {
            request: AnalysisRequest {
                resume_text,
                job_field,
            },
            source: TextSource::PdfUpload,
        };
    }

    match parts.text {
        Some(resume_text) => ResumeSubmission {
            request: AnalysisRequest {
                resume_text,
                job_field,
            },
            source: TextSource::FormText,
        },
        None => ResumeSubmission::missing(job_field),
    }
}

/// JSON body `{"text": string, "job_field"?: string}`. Anything else resolves to
/// empty text; a non-string `job_field` is ignored.
pub fn resolve_json_body(body: &[u8]) -> ResumeSubmission {
    let Ok(value) = serde_json::from_slice::<Value>(body) else {
        return ResumeSubmission::missing(String::new());
    };

    let job_field = value
        .get(JOB_FIELD)
        .and_then(|v| v.as_str())
        .unwrap_or_default()
        .to_string();

    match value.get(TEXT_FIELD).and_then(|v| v.as_str()) {
        Some(text) => ResumeSubmission {
            request: AnalysisRequest {
                resume_text: text.to_string(),
                job_field,
            },
            source: TextSource::JsonBody,
        },
        None => ResumeSubmission::missing(job_field),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, http::Request as HttpRequest};

    const BOUNDARY: &str = "XyZboundary";

    fn multipart_request(parts: &[(&str, Option<&str>, &str)]) -> Request {
        let mut body = Vec::new();
        for (name, filename, content) in parts {
            body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
            match filename {
                Some(file) => body.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"{name}\"; filename=\"{file}\"\r\nContent-Type: application/pdf\r\n\r\n"
                    )
                    .as_bytes(),
                ),
                None => body.extend_from_slice(
                    format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n").as_bytes(),
                ),
            }
            body.extend_from_slice(content.as_bytes());
            body.extend_from_slice(b"\r\n");
        }
        body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());

        HttpRequest::builder()
            .method("POST")
            .uri("/analyze")
            .header(CONTENT_TYPE, format!("multipart/form-data; boundary={BOUNDARY}"))
            .body(Body::from(body))
            .unwrap()
    }

    async fn extract(req: Request) -> ResumeSubmission {
        match ResumeSubmission::from_request(req, &()).await {
            Ok(submission) => submission,
            Err(never) => match never {},
        }
    }

    #[test]
    fn test_json_body_with_text_and_job_field() {
        let submission =
            resolve_json_body(br#"{"text": "Led a 5-person team", "job_field": "product manager"}"#);
        assert_eq!(submission.source, TextSource::JsonBody);
        assert_eq!(submission.request.resume_text, "Led a 5-person team");
        assert_eq!(submission.request.job_field, "product manager");
    }

    #[test]
    fn test_json_body_job_field_defaults_to_empty() {
        let submission = resolve_json_body(br#"{"text": "Rust"}"#);
        assert_eq!(submission.request.job_field, "");
        assert_eq!(submission.request.resume_text, "Rust");
    }

    #[test]
    fn test_json_body_without_text_is_missing() {
        let submission = resolve_json_body(br#"{"job_field": "devops"}"#);
        assert_eq!(submission.source, TextSource::Missing);
        assert!(submission.request.resume_text.is_empty());
        assert_eq!(submission.request.job_field, "devops");
    }

    #[test]
    fn test_json_body_with_non_string_text_is_missing() {
        let submission = resolve_json_body(br#"{"text": 42, "job_field": ["x"]}"#);
        assert_eq!(submission.source, TextSource::Missing);
        assert_eq!(submission.request.job_field, "");
    }

    #[test]
    fn test_unparseable_body_is_missing() {
        assert_eq!(resolve_json_body(b"text=hello").source, TextSource::Missing);
        assert_eq!(resolve_json_body(b"").source, TextSource::Missing);
    }

    #[tokio::test]
    async fn test_json_request_is_resolved_without_content_type() {
        let req = HttpRequest::builder()
            .method("POST")
            .uri("/analyze")
            .body(Body::from(r#"{"text": "SQL and dashboards"}"#))
            .unwrap();
        let submission = extract(req).await;
        assert_eq!(submission.source, TextSource::JsonBody);
        assert_eq!(submission.request.resume_text, "SQL and dashboards");
    }

    #[tokio::test]
    async fn test_multipart_upload_is_treated_as_pdf() {
        let req = multipart_request(&[
            ("resume", Some("resume.pdf"), "not really a pdf"),
            ("job_field", None, "data analyst"),
            ("text", None, "ignored when a file is uploaded"),
        ]);
        let submission = extract(req).await;
        assert_eq!(submission.source, TextSource::PdfUpload);
        assert!(submission.request.resume_text.is_empty());
        assert_eq!(submission.request.job_field, "data analyst");
    }

    #[tokio::test]
    async fn test_multipart_empty_file_falls_back_to_text_field() {
        let req = multipart_request(&[
            ("resume", Some(""), ""),
            ("text", None, "Kubernetes on-call rotation"),
            ("job_field", None, "sre"),
        ]);
        let submission = extract(req).await;
        assert_eq!(submission.source, TextSource::FormText);
        assert_eq!(submission.request.resume_text, "Kubernetes on-call rotation");
        assert_eq!(submission.request.job_field, "sre");
    }

    #[tokio::test]
    async fn test_multipart_without_resume_is_missing() {
        let req = multipart_request(&[("job_field", None, "designer")]);
        let submission = extract(req).await;
        assert_eq!(submission.source, TextSource::Missing);
        assert_eq!(submission.request.job_field, "designer");
    }

    #[tokio::test]
    async fn test_multipart_without_boundary_is_missing() {
        let req = HttpRequest::builder()
            .method("POST")
            .uri("/analyze")
            .header(CONTENT_TYPE, "multipart/form-data")
            .body(Body::from("garbage"))
            .unwrap();
        assert_eq!(extract(req).await.source, TextSource::Missing);
    }
}
