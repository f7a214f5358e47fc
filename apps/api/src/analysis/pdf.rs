use bytes::Bytes;
use tracing::warn;

/// Best-effort PDF text extraction.
///
/// Page texts are concatenated, skipping pages that yield no text. Any failure,
/// including a panic inside the PDF library, yields an empty string.
pub async fn extract_pdf_text(data: Bytes) -> String {
    match tokio::task::spawn_blocking(move || extract_pages(&data)).await {
        Ok(text) => text,
        Err(e) => {
            warn!("PDF extraction task failed: {e}");
            String::new()
        }
    }
}

fn extract_pages(data: &[u8]) -> String {
    match pdf_extract::extract_text_from_mem_by_pages(data) {
        Ok(pages) => pages
            .iter()
            .map(|page| page.trim())
            .filter(|page| !page.is_empty())
            .collect::<Vec<_>>()
            .join("\n"),
        Err(e) => {
            warn!("Error reading PDF: {e}");
            String::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_non_pdf_bytes_yield_empty_text() {
        let text = extract_pdf_text(Bytes::from_static(b"definitely not a pdf")).await;
        assert!(text.is_empty());
    }

    #[tokio::test]
    async fn test_empty_upload_yields_empty_text() {
        assert!(extract_pdf_text(Bytes::new()).await.is_empty());
    }

    #[tokio::test]
    async fn test_truncated_pdf_header_yields_empty_text() {
        let text = extract_pdf_text(Bytes::from_static(b"%PDF-1.4\n1 0 obj\n<<")).await;
        assert!(text.is_empty());
    }
}
