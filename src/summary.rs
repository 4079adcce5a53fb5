//! External report summarization
//!
//! Thin client over the text-generation API. The contract with callers is
//! that this path always yields a displayable string: an unconfigured key,
//! a transport failure or an empty completion all collapse into fixed
//! placeholder messages instead of errors.

use std::time::Duration;

const DEFAULT_API_URL: &str =
    "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.5-flash:generateContent";

const MISSING_KEY: &str = "Chave de API não configurada. A sumarização está desabilitada.";
const CALL_FAILED: &str = "Erro ao se comunicar com o serviço de IA. Tente novamente mais tarde.";
const EMPTY_COMPLETION: &str = "Não foi possível gerar um resumo.";

pub struct Summarizer {
    client: reqwest::Client,
    api_key: Option<String>,
    api_url: String,
}

impl Summarizer {
    pub fn new(api_key: Option<String>, api_url: Option<String>) -> Self {
        Self {
            client: reqwest::Client::builder()
                .timeout(Duration::from_secs(30))
                .build()
                .unwrap_or_default(),
            api_key: api_key.filter(|k| !k.trim().is_empty()),
            api_url: api_url.unwrap_or_else(|| DEFAULT_API_URL.to_string()),
        }
    }

    /// Summarize an investigator's findings report. Always returns a
    /// string, never an error.
    pub async fn summarize(&self, text: &str) -> String {
        let Some(ref key) = self.api_key else {
            return MISSING_KEY.to_string();
        };

        let prompt = format!(
            "Resuma o seguinte relatório de fiscalização em um parágrafo conciso, \
             destacando a constatação principal e a ação tomada. Relatório: \"{}\"",
            text
        );
        let body = serde_json::json!({
            "contents": [{ "parts": [{ "text": prompt }] }]
        });

        let response = self
            .client
            .post(&self.api_url)
            .query(&[("key", key.as_str())])
            .json(&body)
            .send()
            .await
            .and_then(|r| r.error_for_status());

        let response = match response {
            Ok(r) => r,
            Err(e) => {
                tracing::error!("Summarization call failed: {}", e);
                return CALL_FAILED.to_string();
            }
        };

        match response.json::<serde_json::Value>().await {
            Ok(value) => value["candidates"][0]["content"]["parts"][0]["text"]
                .as_str()
                .map(|t| t.trim().to_string())
                .filter(|t| !t.is_empty())
                .unwrap_or_else(|| EMPTY_COMPLETION.to_string()),
            Err(e) => {
                tracing::error!("Summarization response could not be decoded: {}", e);
                CALL_FAILED.to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_key_yields_placeholder() {
        let summarizer = Summarizer::new(None, None);
        assert_eq!(summarizer.summarize("relatório").await, MISSING_KEY);

        let summarizer = Summarizer::new(Some("  ".to_string()), None);
        assert_eq!(summarizer.summarize("relatório").await, MISSING_KEY);
    }

    #[tokio::test]
    async fn test_unreachable_service_yields_placeholder() {
        // Nothing listens on this port; the call must degrade to a string.
        let summarizer = Summarizer::new(
            Some("test-key".to_string()),
            Some("http://127.0.0.1:9/unreachable".to_string()),
        );
        assert_eq!(summarizer.summarize("relatório").await, CALL_FAILED);
    }
}
