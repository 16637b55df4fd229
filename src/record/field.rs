//! Field values and per-field extraction
//!
//! A field is extracted by a plain function from a row element. The function
//! returns `None` whenever the expected structure is absent and the caller
//! substitutes a sentinel, so a single odd row degrades one cell instead of
//! aborting the page.

use scraper::ElementRef;
use std::fmt;
use url::Url;

/// Sentinel written in place of any field that could not be extracted.
pub const MISSING_VALUE: &str = "MISSING VALUE";

/// A single extracted field value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    /// A plain text value
    Text(String),
    /// A multi-valued field, rendered comma-separated
    List(Vec<String>),
    /// The extraction sentinel
    Missing,
}

impl FieldValue {
    /// Builds a `Text` value from anything string-like.
    pub fn text(value: impl Into<String>) -> Self {
        FieldValue::Text(value.into())
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, FieldValue::Missing)
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Text(value) => f.write_str(value),
            FieldValue::List(values) => f.write_str(&values.join(", ")),
            FieldValue::Missing => f.write_str(MISSING_VALUE),
        }
    }
}

/// Everything an extraction function may look at: the row element itself and
/// the URL of the page it came from, for resolving relative links.
pub struct RowContext<'a> {
    pub row: ElementRef<'a>,
    pub page_url: &'a Url,
}

/// Extraction function for a single field.
///
/// Returns `None` when the field's structure is not present in the row.
pub type ExtractFn = fn(&RowContext) -> Option<FieldValue>;

/// One column of a site's record: a stable name plus its extraction function.
///
/// The order of `FieldSpec`s in a site definition is the column order of the
/// output.
#[derive(Debug, Clone)]
pub struct FieldSpec {
    pub name: &'static str,
    pub extract: ExtractFn,
}

impl FieldSpec {
    pub fn new(name: &'static str, extract: ExtractFn) -> Self {
        FieldSpec { name, extract }
    }
}

/// Runs one field's extraction, substituting the sentinel on failure.
///
/// This is the only place extraction failures are absorbed: the failure is
/// logged and the record keeps its shape.
pub fn safe_extract(spec: &FieldSpec, row: &RowContext) -> FieldValue {
    match (spec.extract)(row) {
        Some(value) => value,
        None => {
            tracing::debug!("Could not retrieve {}", spec.name);
            FieldValue::Missing
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scraper::{Html, Selector};

    fn always_none(_row: &RowContext) -> Option<FieldValue> {
        None
    }

    fn always_text(_row: &RowContext) -> Option<FieldValue> {
        Some(FieldValue::text("hello"))
    }

    fn with_row<F: FnOnce(RowContext)>(html: &str, f: F) {
        let document = Html::parse_fragment(html);
        let selector = Selector::parse("div").unwrap();
        let row = document.select(&selector).next().unwrap();
        let page_url = Url::parse("https://example.com/list").unwrap();
        f(RowContext {
            row,
            page_url: &page_url,
        });
    }

    #[test]
    fn test_display_text() {
        assert_eq!(FieldValue::text("Arsenal").to_string(), "Arsenal");
    }

    #[test]
    fn test_display_list_joins_with_comma() {
        let value = FieldValue::List(vec!["France".to_string(), "Algeria".to_string()]);
        assert_eq!(value.to_string(), "France, Algeria");
    }

    #[test]
    fn test_display_empty_list() {
        assert_eq!(FieldValue::List(vec![]).to_string(), "");
    }

    #[test]
    fn test_display_missing_is_sentinel() {
        assert_eq!(FieldValue::Missing.to_string(), MISSING_VALUE);
    }

    #[test]
    fn test_safe_extract_passes_value_through() {
        with_row("<div>x</div>", |ctx| {
            let spec = FieldSpec::new("greeting", always_text);
            assert_eq!(safe_extract(&spec, &ctx), FieldValue::text("hello"));
        });
    }

    #[test]
    fn test_safe_extract_substitutes_sentinel() {
        with_row("<div>x</div>", |ctx| {
            let spec = FieldSpec::new("absent", always_none);
            assert_eq!(safe_extract(&spec, &ctx), FieldValue::Missing);
        });
    }

    #[test]
    fn test_is_missing() {
        assert!(FieldValue::Missing.is_missing());
        assert!(!FieldValue::text("").is_missing());
        assert!(!FieldValue::List(vec![]).is_missing());
    }
}
