use serde::{Deserialize, Serialize};

/// One version of one exam paper at an edition.
///
/// Papers have no id; two papers are the same paper when every field
/// matches.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Paper {
    /// Exam day, counting from 1
    pub day: u32,
    pub language: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
}

impl Paper {
    pub fn new(day: u32, language: impl Into<String>) -> Self {
        Self {
            day,
            language: language.into(),
            description: None,
            url: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }
}
