//! Site scraper definitions
//!
//! Each submodule declares one target as data: a row selector, an ordered
//! field table, a page-URL builder, and the sink shape. The engine never
//! special-cases a site; everything site-specific lives here.
//!
//! Available sites:
//! - `books`: books.toscrape.com catalogue
//! - `countries`: scrapethissite.com country directory
//! - `hockey`: scrapethissite.com NHL team seasons
//! - `transfers`: transfermarkt all-time transfer records

pub mod books;
pub mod countries;
pub mod hockey;
pub mod transfers;

use crate::record::FieldSpec;
use crate::scrape::{PageHintFn, PagePolicy, PageUrlFn};
use scraper::{ElementRef, Selector};
use url::Url;

/// Rewrites a rendered cell before it is written or sorted
pub type TransformFn = fn(&str) -> String;

/// Numeric, descending sort on one column's written cells
#[derive(Debug, Clone)]
pub struct SortSpec {
    pub field: &'static str,
}

/// A cell rewrite applied to one column at write time
#[derive(Debug, Clone)]
pub struct ColumnTransform {
    pub field: &'static str,
    pub apply: TransformFn,
}

/// Declares that records of a site carry a downloadable asset
#[derive(Debug, Clone)]
pub struct AssetSpec {
    /// Field holding the asset URL
    pub url_field: &'static str,
    /// Field whose value names the stored file
    pub key_field: &'static str,
    /// Default directory assets are written into
    pub directory: &'static str,
}

/// Everything the engine needs to know about one site
pub struct SiteSpec {
    pub name: &'static str,
    /// Listing URL the page-URL builder starts from
    pub base: Url,
    /// Selector matching one record row
    pub row_selector: Selector,
    /// Field table; declaration order is column order
    pub fields: Vec<FieldSpec>,
    pub page_url: PageUrlFn,
    /// Reads a total page count out of page 1, when the site exposes one
    pub page_hint: Option<PageHintFn>,
    pub default_policy: PagePolicy,
    /// Name of the 1-based id column the CSV sink prepends
    pub id_column: &'static str,
    pub csv_filename: &'static str,
    pub transforms: Vec<ColumnTransform>,
    pub sort: Option<SortSpec>,
    pub asset: Option<AssetSpec>,
}

impl SiteSpec {
    /// Position of a named field in the field table
    pub fn field_index(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|field| field.name == name)
    }
}

/// All site names accepted on the command line
pub const SITE_NAMES: [&str; 4] = ["books", "countries", "hockey", "transfers"];

/// Looks a site definition up by its command-line name
pub fn by_name(name: &str) -> Option<SiteSpec> {
    match name {
        "books" => Some(books::site()),
        "countries" => Some(countries::site()),
        "hockey" => Some(hockey::site()),
        "transfers" => Some(transfers::site()),
        _ => None,
    }
}

/// Trimmed text content of an element, nested tags flattened
pub(crate) fn text_of(element: ElementRef) -> String {
    element.text().collect::<String>().trim().to_string()
}

/// Direct element children with a given tag name
///
/// Unlike a descendant selector this does not reach into nested tables,
/// which matters for rows that embed mini-tables inside their cells.
pub(crate) fn child_elements<'a>(row: &ElementRef<'a>, name: &str) -> Vec<ElementRef<'a>> {
    row.children()
        .filter_map(ElementRef::wrap)
        .filter(|element| element.value().name() == name)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use scraper::Html;

    #[test]
    fn test_by_name_knows_every_site() {
        for name in SITE_NAMES {
            let site = by_name(name).unwrap();
            assert_eq!(site.name, name);
            assert!(!site.fields.is_empty());
        }
        assert!(by_name("nosuchsite").is_none());
    }

    #[test]
    fn test_field_index() {
        let site = by_name("hockey").unwrap();
        assert_eq!(site.field_index("team_name"), Some(0));
        assert!(site.field_index("nonexistent").is_none());
    }

    #[test]
    fn test_child_elements_skips_nested_tables() {
        let html = r#"
            <table>
              <tr id="outer">
                <td>one</td>
                <td><table><tr><td>nested</td></tr></table></td>
              </tr>
            </table>
        "#;
        let document = Html::parse_document(html);
        let selector = Selector::parse("tr#outer").unwrap();
        let row = document.select(&selector).next().unwrap();

        let cells = child_elements(&row, "td");
        assert_eq!(cells.len(), 2);
        assert_eq!(text_of(cells[0]), "one");
    }

    #[test]
    fn test_text_of_flattens_and_trims() {
        let html = "<div>  <b>Hello</b> world\n</div>";
        let document = Html::parse_fragment(html);
        let selector = Selector::parse("div").unwrap();
        let element = document.select(&selector).next().unwrap();
        assert_eq!(text_of(element), "Hello world");
    }
}
