//! Built-in page templates and keyword-based selection.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use handlebars::Handlebars;
use serde::Serialize;

use super::Attachments;
use super::error::SiteError;

const SALES_CSV_DEFAULT: &[u8] = b"product,sales\na,1\n";
const MARKDOWN_DEFAULT: &[u8] = b"# Title\n\nHello";

/// A page the generator can produce without calling a model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageKind {
    /// Sales summary computed from `data.csv`.
    SalesSummary,
    /// Markdown renderer for `input.md` (or a `?url=` override).
    Markdown,
    /// GitHub account lookup form.
    GitHubUser,
    /// Tesseract-based captcha reader for `sample.png`.
    CaptchaSolver,
}

impl PageKind {
    /// Picks a template from keywords in the brief, case-insensitively.
    ///
    /// Returns `None` when no keyword matches.
    #[must_use]
    pub fn from_brief(brief: &str) -> Option<Self> {
        let brief = brief.to_lowercase();

        if brief.contains("sum-of-sales") || (brief.contains("sales") && brief.contains("+bootstrap"))
        {
            Some(Self::SalesSummary)
        } else if brief.contains("markdown") {
            Some(Self::Markdown)
        } else if brief.contains("github-user") || brief.contains("github username") {
            Some(Self::GitHubUser)
        } else if brief.contains("captcha") {
            Some(Self::CaptchaSolver)
        } else {
            None
        }
    }

    const fn template_name(self) -> &'static str {
        match self {
            Self::SalesSummary => "sales_summary",
            Self::Markdown => "markdown",
            Self::GitHubUser => "github_user",
            Self::CaptchaSolver => "captcha_solver",
        }
    }

    /// Short label used in logs and the README.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::SalesSummary => "sum-of-sales template",
            Self::Markdown => "markdown-to-html template",
            Self::GitHubUser => "github-user template",
            Self::CaptchaSolver => "captcha-solver template",
        }
    }
}

#[derive(Serialize)]
struct SalesData<'a> {
    seed: &'a str,
    total: String,
    csv_base64: String,
}

#[derive(Serialize)]
struct MarkdownData {
    markdown_base64: String,
}

#[derive(Serialize)]
struct GitHubUserData<'a> {
    seed: &'a str,
}

#[derive(Serialize)]
struct CaptchaData {
    image_base64: String,
}

#[derive(Serialize)]
struct FallbackData<'a> {
    task: &'a str,
    brief: &'a str,
}

#[derive(Serialize)]
struct ReadmeData<'a> {
    task: &'a str,
    round: u64,
    brief: &'a str,
    source: &'a str,
}

#[derive(Serialize)]
struct LicenseData<'a> {
    year: i32,
    owner: &'a str,
}

/// Compiled Handlebars registry for every page and boilerplate file.
///
/// Strict mode is on, so a missing variable is a render error rather than
/// an empty string.
#[derive(Debug)]
pub struct PageRenderer {
    registry: Handlebars<'static>,
}

impl PageRenderer {
    /// Compiles the embedded templates.
    ///
    /// # Errors
    ///
    /// Returns [`SiteError::Template`] if an embedded template fails to parse.
    pub fn new() -> Result<Self, SiteError> {
        let mut registry = Handlebars::new();
        registry.set_strict_mode(true);

        let templates = [
            ("sales_summary", include_str!("templates/sales_summary.html.hbs")),
            ("markdown", include_str!("templates/markdown.html.hbs")),
            ("github_user", include_str!("templates/github_user.html.hbs")),
            ("captcha_solver", include_str!("templates/captcha_solver.html.hbs")),
            ("fallback", include_str!("templates/fallback.html.hbs")),
            ("readme", include_str!("templates/readme.md.hbs")),
            ("license", include_str!("templates/license.txt.hbs")),
        ];
        for (name, source) in templates {
            registry
                .register_template_string(name, source)
                .map_err(|e| SiteError::Template(format!("{name}: {e}")))?;
        }

        Ok(Self { registry })
    }

    /// Renders a built-in page.
    ///
    /// # Errors
    ///
    /// Returns [`SiteError::Template`] on render failure.
    pub fn render_page(
        &self,
        kind: PageKind,
        seed: &str,
        attachments: &Attachments,
    ) -> Result<String, SiteError> {
        match kind {
            PageKind::SalesSummary => {
                let csv = attachments.get_or("data.csv", SALES_CSV_DEFAULT);
                self.render(
                    kind.template_name(),
                    &SalesData {
                        seed,
                        total: format!("{:.2}", sales_total(csv)),
                        csv_base64: STANDARD.encode(csv),
                    },
                )
            }
            PageKind::Markdown => {
                let markdown = attachments.get_or("input.md", MARKDOWN_DEFAULT);
                self.render(
                    kind.template_name(),
                    &MarkdownData {
                        markdown_base64: STANDARD.encode(markdown),
                    },
                )
            }
            PageKind::GitHubUser => self.render(kind.template_name(), &GitHubUserData { seed }),
            PageKind::CaptchaSolver => {
                let image = attachments.get("sample.png").unwrap_or_default();
                self.render(
                    kind.template_name(),
                    &CaptchaData {
                        image_base64: STANDARD.encode(image),
                    },
                )
            }
        }
    }

    /// Renders the plain page used when nothing better is available.
    ///
    /// # Errors
    ///
    /// Returns [`SiteError::Template`] on render failure.
    pub fn render_fallback(&self, task: &str, brief: &str) -> Result<String, SiteError> {
        self.render("fallback", &FallbackData { task, brief })
    }

    /// Renders the repository README.
    ///
    /// # Errors
    ///
    /// Returns [`SiteError::Template`] on render failure.
    pub fn render_readme(
        &self,
        task: &str,
        round: u64,
        brief: &str,
        source: &str,
    ) -> Result<String, SiteError> {
        self.render(
            "readme",
            &ReadmeData {
                task,
                round,
                brief,
                source,
            },
        )
    }

    /// Renders the MIT license text.
    ///
    /// # Errors
    ///
    /// Returns [`SiteError::Template`] on render failure.
    pub fn render_license(&self, year: i32, owner: &str) -> Result<String, SiteError> {
        self.render("license", &LicenseData { year, owner })
    }

    fn render<T: Serialize>(&self, name: &str, data: &T) -> Result<String, SiteError> {
        self.registry
            .render(name, data)
            .map_err(|e| SiteError::Template(format!("{name}: {e}")))
    }
}

/// Sums the last column of every data row, ignoring unparsable cells.
fn sales_total(csv: &[u8]) -> f64 {
    String::from_utf8_lossy(csv)
        .trim()
        .lines()
        .skip(1)
        .filter_map(|line| line.rsplit(',').next())
        .filter_map(|cell| cell.trim().parse::<f64>().ok())
        .sum()
}
