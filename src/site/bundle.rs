//! The set of files committed to a generated repository.

use super::error::SiteError;
use super::pages::PageRenderer;

const PAGES_WORKFLOW: &str = include_str!("templates/pages.yml");
const GITLEAKS_CONFIG: &str = include_str!("templates/gitleaks.toml");

/// One file in the bundle, addressed relative to the repository root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteFile {
    /// Relative path using `/` separators.
    pub path: String,
    /// File contents.
    pub contents: Vec<u8>,
}

/// Inputs for building a repository bundle.
#[derive(Debug, Clone, Copy)]
pub struct BundleSpec<'a> {
    /// Task identifier.
    pub task: &'a str,
    /// Round number reported by the caller.
    pub round: u64,
    /// Brief the page implements.
    pub brief: &'a str,
    /// Rendered index page.
    pub index_html: &'a str,
    /// How the index page was produced, for the README.
    pub source: &'a str,
    /// Copyright holder for the LICENSE.
    pub owner: &'a str,
    /// Copyright year for the LICENSE.
    pub year: i32,
}

/// Ordered list of files making up a generated repository.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SiteBundle {
    files: Vec<SiteFile>,
}

impl SiteBundle {
    /// Builds the full bundle: the page under `dist/`, README, LICENSE,
    /// the Pages deploy workflow and the gitleaks config.
    ///
    /// # Errors
    ///
    /// Returns [`SiteError`] if README or LICENSE rendering fails.
    pub fn build(renderer: &PageRenderer, spec: &BundleSpec<'_>) -> Result<Self, SiteError> {
        let readme = renderer.render_readme(spec.task, spec.round, spec.brief, spec.source)?;
        let license = renderer.render_license(spec.year, spec.owner)?;

        Ok(Self::default()
            .with_file("dist/index.html", spec.index_html)
            .with_file("README.md", readme)
            .with_file("LICENSE", license)
            .with_file(".github/workflows/pages.yml", PAGES_WORKFLOW)
            .with_file(".gitleaks.toml", GITLEAKS_CONFIG))
    }

    /// Appends a file.
    #[must_use]
    pub fn with_file(mut self, path: impl Into<String>, contents: impl Into<Vec<u8>>) -> Self {
        self.files.push(SiteFile {
            path: path.into(),
            contents: contents.into(),
        });
        self
    }

    /// Returns the files in insertion order.
    #[must_use]
    pub fn files(&self) -> &[SiteFile] {
        &self.files
    }

    /// Looks up a file by path.
    #[must_use]
    pub fn get(&self, path: &str) -> Option<&SiteFile> {
        self.files.iter().find(|f| f.path == path)
    }
}
