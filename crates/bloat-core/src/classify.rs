use crate::resource::ResourceRecord;
use std::collections::HashSet;

pub const HTML: &str = "HTML";
pub const JAVASCRIPT: &str = "JavaScript";
pub const CSS: &str = "CSS";
pub const IMAGE: &str = "Image";
pub const FONT: &str = "Font";

/// Built-in categories and the exact MIME types each one claims
static BUILTIN_CATEGORIES: &[(&str, &[&str])] = &[
    (HTML, &["text/html"]),
    (
        JAVASCRIPT,
        &[
            "application/javascript",
            "text/javascript",
            "application/x-javascript",
            "application/ecmascript",
            "text/ecmascript",
        ],
    ),
    (CSS, &["text/css"]),
    (
        IMAGE,
        &[
            "image/png",
            "image/jpeg",
            "image/gif",
            "image/webp",
            "image/avif",
            "image/svg+xml",
            "image/bmp",
            "image/x-icon",
            "image/vnd.microsoft.icon",
        ],
    ),
    (
        FONT,
        &[
            "font/woff",
            "font/woff2",
            "font/ttf",
            "font/otf",
            "application/font-woff",
            "application/font-woff2",
            "application/x-font-ttf",
            "application/x-font-woff",
            "application/vnd.ms-fontobject",
        ],
    ),
];

/// A named category and its MIME allow-list
#[derive(Debug, Clone)]
pub struct CategoryRule {
    name: String,
    mime_types: HashSet<String>,
}

impl CategoryRule {
    pub fn new<I, S>(name: impl Into<String>, mime_types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            mime_types: mime_types.into_iter().map(Into::into).collect(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Exact, case-sensitive match against the allow-list
    pub fn matches(&self, mime_type: &str) -> bool {
        self.mime_types.contains(mime_type)
    }
}

/// Maps resource MIME types to zero or more categories
#[derive(Debug, Clone)]
pub struct ResourceClassifier {
    rules: Vec<CategoryRule>,
}

impl ResourceClassifier {
    /// Classifier with the HTML, JavaScript, CSS, Image and Font categories
    pub fn builtin() -> Self {
        let rules = BUILTIN_CATEGORIES
            .iter()
            .map(|(name, mime_types)| CategoryRule::new(*name, mime_types.iter().copied()))
            .collect();
        Self { rules }
    }

    /// Add a category, or extend an existing one with more MIME types
    pub fn with_category<I, S>(mut self, name: &str, mime_types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        match self.rules.iter_mut().find(|rule| rule.name == name) {
            Some(rule) => rule.mime_types.extend(mime_types.into_iter().map(Into::into)),
            None => self.rules.push(CategoryRule::new(name, mime_types)),
        }
        self
    }

    pub fn rules(&self) -> &[CategoryRule] {
        &self.rules
    }

    pub fn category_names(&self) -> impl Iterator<Item = &str> {
        self.rules.iter().map(CategoryRule::name)
    }

    /// Names of every category claiming this MIME type, in table order
    pub fn categories_for(&self, mime_type: &str) -> Vec<&str> {
        self.rules
            .iter()
            .filter(|rule| rule.matches(mime_type))
            .map(CategoryRule::name)
            .collect()
    }

    pub fn classify(&self, record: &ResourceRecord) -> Vec<&str> {
        self.categories_for(&record.mime_type)
    }
}

impl Default for ResourceClassifier {
    fn default() -> Self {
        Self::builtin()
    }
}
