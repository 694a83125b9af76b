//! Chooses how the index page is produced for a task.

use super::error::SiteError;
use super::llm::LlmClient;
use super::pages::{PageKind, PageRenderer};
use super::Attachments;
use crate::webhook::HttpClient;

/// Where the index page came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageSource {
    /// One of the built-in templates.
    Template(PageKind),
    /// The language model.
    Llm,
    /// The plain heading page.
    Fallback,
}

impl PageSource {
    /// Human-readable description for the README.
    #[must_use]
    pub const fn describe(self) -> &'static str {
        match self {
            Self::Template(kind) => kind.label(),
            Self::Llm => "LLM-generated page",
            Self::Fallback => "fallback page",
        }
    }
}

/// A generated index page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedPage {
    /// HTML document.
    pub html: String,
    /// How it was produced.
    pub source: PageSource,
}

/// Produces the index page: template, then model, then fallback.
#[derive(Debug)]
pub struct PageGenerator<H> {
    renderer: PageRenderer,
    llm: Option<LlmClient<H>>,
}

impl<H: HttpClient> PageGenerator<H> {
    /// Creates a generator. Without an LLM client, briefs that match no
    /// template get the fallback page.
    #[must_use]
    pub const fn new(renderer: PageRenderer, llm: Option<LlmClient<H>>) -> Self {
        Self { renderer, llm }
    }

    /// Returns the shared template renderer.
    #[must_use]
    pub const fn renderer(&self) -> &PageRenderer {
        &self.renderer
    }

    /// Generates the index page for a task.
    ///
    /// Model failures are logged and degrade to the fallback page.
    ///
    /// # Errors
    ///
    /// Returns [`SiteError`] only if a built-in template fails to render.
    pub async fn generate(
        &self,
        task: &str,
        brief: &str,
        seed: &str,
        attachments: &Attachments,
    ) -> Result<GeneratedPage, SiteError> {
        if let Some(kind) = PageKind::from_brief(brief) {
            let html = self.renderer.render_page(kind, seed, attachments)?;
            return Ok(GeneratedPage {
                html,
                source: PageSource::Template(kind),
            });
        }

        if let Some(llm) = &self.llm {
            match llm.generate(task, brief).await {
                Ok(html) => {
                    return Ok(GeneratedPage {
                        html,
                        source: PageSource::Llm,
                    });
                }
                Err(e) => {
                    tracing::warn!(task, error = %e, "LLM generation failed, using fallback page");
                }
            }
        }

        Ok(GeneratedPage {
            html: self.renderer.render_fallback(task, brief)?,
            source: PageSource::Fallback,
        })
    }
}

/// Derives the template seed from the requester's email (its local part).
#[must_use]
pub fn seed_from_email(email: Option<&str>) -> String {
    email
        .filter(|e| !e.is_empty())
        .unwrap_or("user")
        .split('@')
        .next()
        .unwrap_or_default()
        .to_string()
}
