use serde::Serialize;

/// How a stylesheet swap ended. None of these abort an apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StylesheetLoad {
    Loaded,
    Failed,
    /// No load signal within the configured timeout.
    TimedOut,
    /// The link href was cleared because the theme has no such stylesheet.
    Cleared,
    /// The page has no usable link for this stylesheet.
    Skipped,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FragmentStatus {
    Injected { wrapped: bool },
    Cleared,
    Skipped,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FragmentReport {
    pub container_id: String,
    pub file: String,
    pub status: FragmentStatus,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DescriptionReport {
    /// Forum ids that received a description.
    pub inserted: Vec<String>,
    /// Forum ids present in the manifest but not insertable on this page.
    pub skipped: Vec<String>,
}

/// What one apply did to the page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApplyReport {
    pub theme_id: String,
    pub main_stylesheet: StylesheetLoad,
    pub secondary_stylesheet: StylesheetLoad,
    pub fragments: Vec<FragmentReport>,
    pub descriptions_removed: usize,
    pub descriptions: DescriptionReport,
}

impl ApplyReport {
    pub fn new(theme_id: &str) -> Self {
        Self {
            theme_id: theme_id.to_string(),
            main_stylesheet: StylesheetLoad::Skipped,
            secondary_stylesheet: StylesheetLoad::Skipped,
            fragments: Vec::new(),
            descriptions_removed: 0,
            descriptions: DescriptionReport::default(),
        }
    }

    pub fn fragment(&self, container_id: &str) -> Option<&FragmentReport> {
        self.fragments
            .iter()
            .find(|fragment| fragment.container_id == container_id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ApplyOutcome {
    Applied(ApplyReport),
    /// A newer switch started before this one finished writing; the report
    /// covers the steps completed up to that point.
    Superseded(ApplyReport),
    /// The id is not in the catalog; the page was left untouched.
    UnknownTheme { theme_id: String },
}

impl ApplyOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, ApplyOutcome::Applied(_))
    }

    pub fn report(&self) -> Option<&ApplyReport> {
        match self {
            ApplyOutcome::Applied(report) | ApplyOutcome::Superseded(report) => Some(report),
            ApplyOutcome::UnknownTheme { .. } => None,
        }
    }
}
