//! Page generation through an OpenAI-compatible chat completion endpoint.

use std::time::Duration;

use http::header::{AUTHORIZATION, HeaderValue};
use serde::Deserialize;

use super::error::LlmError;
use crate::webhook::{HttpClient, HttpRequest};

const SYSTEM_PROMPT: &str = "You write a single self-contained static HTML page. \
Answer with the HTML document only, no explanations. \
Use only CDN-hosted libraries and keep all logic in inline scripts.";

/// Connection settings for the completion endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LlmSettings {
    /// Full URL of the chat completions endpoint.
    pub endpoint: url::Url,
    /// Bearer token sent in the `Authorization` header.
    pub api_key: String,
    /// Model identifier.
    pub model: String,
    /// Timeout for the completion request.
    pub timeout: Duration,
}

#[derive(Deserialize)]
struct Completion {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: Message,
}

#[derive(Deserialize)]
struct Message {
    content: Option<String>,
}

/// Client asking a language model for a page.
#[derive(Debug)]
pub struct LlmClient<H> {
    client: H,
    settings: LlmSettings,
}

impl<H: HttpClient> LlmClient<H> {
    /// Creates a client.
    #[must_use]
    pub const fn new(client: H, settings: LlmSettings) -> Self {
        Self { client, settings }
    }

    /// Returns the configured settings.
    #[must_use]
    pub const fn settings(&self) -> &LlmSettings {
        &self.settings
    }

    /// Asks the model for a page implementing `brief`.
    ///
    /// # Errors
    ///
    /// Returns [`LlmError`] if the request fails, the endpoint answers with
    /// a non-success status, or the answer holds no content.
    pub async fn generate(&self, task: &str, brief: &str) -> Result<String, LlmError> {
        let body = serde_json::json!({
            "model": self.settings.model,
            "messages": [
                { "role": "system", "content": SYSTEM_PROMPT },
                {
                    "role": "user",
                    "content": format!(
                        "Build a minimal, standards-compliant static app passing the evaluation checks for: `{task}`.\n\nBrief:\n{brief}"
                    ),
                },
            ],
        });

        let auth = HeaderValue::from_str(&format!("Bearer {}", self.settings.api_key))
            .map_err(|e| LlmError::InvalidResponse(format!("invalid api key header: {e}")))?;
        let request = HttpRequest::post(self.settings.endpoint.clone())
            .with_json(&body)
            .with_header(AUTHORIZATION, auth)
            .with_timeout(self.settings.timeout);

        let response = self.client.request(request).await?;
        if !response.is_success() {
            return Err(LlmError::Status {
                status: response.status,
            });
        }

        let completion: Completion = serde_json::from_slice(&response.body)
            .map_err(|e| LlmError::InvalidResponse(e.to_string()))?;
        let content = completion
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| LlmError::InvalidResponse("no choices".to_string()))?;

        let html = strip_code_fence(&content);
        if html.is_empty() {
            return Err(LlmError::InvalidResponse("empty content".to_string()));
        }
        Ok(html.to_string())
    }
}

/// Removes a surrounding Markdown code fence (with optional language tag).
fn strip_code_fence(content: &str) -> &str {
    let trimmed = content.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let body = rest.split_once('\n').map_or("", |(_, body)| body);
    body.strip_suffix("```").unwrap_or(body).trim()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::webhook::HttpError;
    use crate::webhook::test_fixtures::{MockClient, response};
    use std::sync::Arc;

    fn settings() -> LlmSettings {
        LlmSettings {
            endpoint: url::Url::parse("https://llm.example.com/v1/chat/completions").unwrap(),
            api_key: "sk-test".to_string(),
            model: "gpt-test".to_string(),
            timeout: Duration::from_secs(60),
        }
    }

    fn completion(content: &str) -> String {
        serde_json::json!({
            "choices": [{ "message": { "role": "assistant", "content": content } }]
        })
        .to_string()
    }

    #[tokio::test]
    async fn sends_model_prompt_and_bearer_token() {
        let client = Arc::new(MockClient::new(vec![Ok(response(
            200,
            &completion("<html></html>"),
        ))]));
        let llm = LlmClient::new(Arc::clone(&client), settings());

        llm.generate("demo-task", "Show a clock").await.unwrap();

        let req = &client.captured_requests()[0];
        assert_eq!(req.url.as_str(), "https://llm.example.com/v1/chat/completions");
        assert_eq!(req.headers.get(AUTHORIZATION).unwrap(), "Bearer sk-test");
        assert_eq!(req.timeout, Some(Duration::from_secs(60)));
        let body: serde_json::Value =
            serde_json::from_slice(req.body.as_deref().unwrap()).unwrap();
        assert_eq!(body["model"], "gpt-test");
        let user = body["messages"][1]["content"].as_str().unwrap();
        assert!(user.contains("`demo-task`"));
        assert!(user.contains("Show a clock"));
    }

    #[tokio::test]
    async fn returns_content_without_code_fence() {
        let client = MockClient::new(vec![Ok(response(
            200,
            &completion("```html\n<!doctype html><h1>Hi</h1>\n```"),
        ))]);
        let llm = LlmClient::new(client, settings());

        let html = llm.generate("t", "b").await.unwrap();

        assert_eq!(html, "<!doctype html><h1>Hi</h1>");
    }

    #[tokio::test]
    async fn non_success_status_is_an_error() {
        let client = MockClient::statuses(&[429]);
        let llm = LlmClient::new(client, settings());

        let err = llm.generate("t", "b").await.unwrap_err();

        assert!(matches!(err, LlmError::Status { status } if status.as_u16() == 429));
    }

    #[tokio::test]
    async fn empty_choices_is_an_error() {
        let client = MockClient::new(vec![Ok(response(200, r#"{"choices":[]}"#))]);
        let llm = LlmClient::new(client, settings());

        assert!(matches!(
            llm.generate("t", "b").await,
            Err(LlmError::InvalidResponse(_))
        ));
    }

    #[tokio::test]
    async fn transport_error_is_propagated() {
        let client = MockClient::new(vec![Err(HttpError::Timeout)]);
        let llm = LlmClient::new(client, settings());

        assert!(matches!(
            llm.generate("t", "b").await,
            Err(LlmError::Http(HttpError::Timeout))
        ));
    }

    #[test]
    fn strip_code_fence_handles_plain_content() {
        assert_eq!(strip_code_fence("  <p>x</p>\n"), "<p>x</p>");
        assert_eq!(strip_code_fence("```\n<p>x</p>```"), "<p>x</p>");
    }
}
