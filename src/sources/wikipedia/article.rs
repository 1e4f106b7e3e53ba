//! Article record.
use serde::{Deserialize, Deserializer};

use super::markup;

/// One article of an archive.
///
/// Built once by [super::Archive] and never modified afterwards.
/// Both `abstract` and `text` keep their markup; accessors optionally strip it.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Article {
    #[serde(default, deserialize_with = "string_or_number")]
    id: Option<String>,
    #[serde(default)]
    url: Option<String>,
    title: String,
    #[serde(default)]
    text: String,
    #[serde(default, rename = "abstract")]
    abstract_text: Option<String>,
}

/// Extraction tools disagree on the type of ids.
fn string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Id {
        Str(String),
        Num(u64),
    }

    Ok(Option::<Id>::deserialize(deserializer)?.map(|id| match id {
        Id::Str(s) => s,
        Id::Num(n) => n.to_string(),
    }))
}

impl Article {
    pub fn new(title: String, text: String) -> Self {
        Self {
            id: None,
            url: None,
            title,
            text,
            abstract_text: None,
        }
    }

    pub(super) fn with_attributes(mut self, id: Option<String>, url: Option<String>) -> Self {
        self.id = id;
        self.url = url;
        self
    }

    /// Set an explicit abstract, overriding the one extracted from the text.
    pub fn with_abstract(mut self, abstract_text: String) -> Self {
        self.abstract_text = Some(abstract_text);
        self
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    pub fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }

    /// Article abstract.
    ///
    /// Either the explicit abstract of the record, or the text preceding the first section heading.
    pub fn abstract_text(&self, strip_markup: bool) -> String {
        let raw = match &self.abstract_text {
            Some(a) => a.clone(),
            None => self
                .text
                .lines()
                .take_while(|line| !markup::is_heading(line))
                .map(str::trim)
                .filter(|line| !line.is_empty())
                .collect::<Vec<_>>()
                .join("\n"),
        };

        if strip_markup {
            markup::strip(&raw)
        } else {
            raw
        }
    }

    /// Full article text.
    pub fn text(&self, strip_markup: bool) -> String {
        if strip_markup {
            markup::strip(&self.text)
        } else {
            self.text.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEXT: &str = "'''Paris''' is the capital of [[France]].\n\nIt is big.\n== History ==\nOld.";

    #[test]
    fn from_json() {
        let json = r#"{"id": "12", "url": "https://en.wikipedia.org/wiki?curid=12", "title": "Paris", "text": "Paris is a city."}"#;
        let article: Article = serde_json::from_str(json).unwrap();

        assert_eq!(article.id(), Some("12"));
        assert_eq!(article.title(), "Paris");
        assert_eq!(article.text(false), "Paris is a city.");
    }

    #[test]
    fn numeric_id() {
        let json = r#"{"id": 12, "title": "Paris", "text": ""}"#;
        let article: Article = serde_json::from_str(json).unwrap();
        assert_eq!(article.id(), Some("12"));
        assert_eq!(article.url(), None);
    }

    #[test]
    fn abstract_until_first_heading() {
        let article = Article::new("Paris".to_string(), TEXT.to_string());

        assert_eq!(
            article.abstract_text(false),
            "'''Paris''' is the capital of [[France]].\nIt is big."
        );
        assert_eq!(
            article.abstract_text(true),
            "Paris is the capital of France.\nIt is big."
        );
    }

    #[test]
    fn explicit_abstract() {
        let article = Article::new("Paris".to_string(), TEXT.to_string())
            .with_abstract("[[Paris]] abstract.".to_string());

        assert_eq!(article.abstract_text(true), "Paris abstract.");
    }

    #[test]
    fn full_text() {
        let article = Article::new("Paris".to_string(), TEXT.to_string());

        assert_eq!(article.text(false), TEXT);
        assert_eq!(
            article.text(true),
            "Paris is the capital of France.\n\nIt is big.\nHistory\nOld."
        );
    }
}
