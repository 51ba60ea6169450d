use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::ValidationError;

const MAX_ARTICLE_ID_LEN: usize = 512;

/// Content path identifying one article, e.g. `technology/2024/jan/15/some-headline`.
///
/// Ids are used verbatim as the request path, so anything that would change
/// the shape of the URL is rejected up front.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ArticleId(String);

impl ArticleId {
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::EmptyArticleId);
        }

        let len = trimmed.chars().count();
        if len > MAX_ARTICLE_ID_LEN {
            return Err(ValidationError::ArticleIdTooLong {
                len,
                max: MAX_ARTICLE_ID_LEN,
            });
        }

        for (index, ch) in trimmed.chars().enumerate() {
            let invalid = ch.is_whitespace() || ch.is_control() || matches!(ch, '?' | '#' | '\\');
            if invalid {
                return Err(ValidationError::ArticleIdInvalidChar { ch, index });
            }
        }

        let escapes_root = trimmed.starts_with('/')
            || trimmed.contains("://")
            || trimmed.split('/').any(|segment| segment == ".." || segment.is_empty());
        if escapes_root {
            return Err(ValidationError::ArticleIdNotRelative {
                value: trimmed.to_owned(),
            });
        }

        Ok(Self(trimmed.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Request path for this article under the API base URL.
    pub fn path(&self) -> String {
        format!("/{}", self.0)
    }
}

impl Display for ArticleId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<String> for ArticleId {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl TryFrom<&str> for ArticleId {
    type Error = ValidationError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<ArticleId> for String {
    fn from(value: ArticleId) -> Self {
        value.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_content_path() {
        let id = ArticleId::parse(" technology/2024/jan/15/rust-in-production ")
            .expect("id should parse");
        assert_eq!(id.as_str(), "technology/2024/jan/15/rust-in-production");
        assert_eq!(id.path(), "/technology/2024/jan/15/rust-in-production");
    }

    #[test]
    fn rejects_empty() {
        let err = ArticleId::parse("   ").expect_err("must fail");
        assert_eq!(err, ValidationError::EmptyArticleId);
    }

    #[test]
    fn rejects_query_injection() {
        let err = ArticleId::parse("technology/x?api-key=other").expect_err("must fail");
        assert!(matches!(err, ValidationError::ArticleIdInvalidChar { ch: '?', .. }));
    }

    #[test]
    fn rejects_traversal_and_absolute_paths() {
        assert!(matches!(
            ArticleId::parse("technology/../search"),
            Err(ValidationError::ArticleIdNotRelative { .. })
        ));
        assert!(matches!(
            ArticleId::parse("/technology/2024"),
            Err(ValidationError::ArticleIdNotRelative { .. })
        ));
        assert!(matches!(
            ArticleId::parse("https://evil.test/x"),
            Err(ValidationError::ArticleIdNotRelative { .. })
        ));
    }
}
