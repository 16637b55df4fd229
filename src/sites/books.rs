//! books.toscrape.com catalogue scraper
//!
//! One record per product card. The star rating is encoded as a CSS class
//! (`star-rating Three`), translated here into a plain 1-5 number.

use super::{text_of, SiteSpec};
use crate::record::{FieldSpec, FieldValue, RowContext};
use crate::scrape::PagePolicy;
use lazy_static::lazy_static;
use scraper::Selector;
use url::Url;

const E: &str = "Invalid selector";
const BASE_URL: &str = "https://books.toscrape.com/";

lazy_static! {
    static ref ROWS: Selector = Selector::parse("article.product_pod").expect(E);
    static ref TITLE_LINK: Selector = Selector::parse("h3 a").expect(E);
    static ref PRICE: Selector = Selector::parse("p.price_color").expect(E);
    static ref AVAILABILITY: Selector = Selector::parse("p.instock.availability").expect(E);
    static ref RATING: Selector = Selector::parse("p.star-rating").expect(E);
}

pub fn site() -> SiteSpec {
    SiteSpec {
        name: "books",
        base: Url::parse(BASE_URL).expect("Invalid base URL"),
        row_selector: ROWS.clone(),
        fields: vec![
            FieldSpec::new("title", title),
            FieldSpec::new("price_in_pounds", price),
            FieldSpec::new("availability", availability),
            FieldSpec::new("rating", rating),
        ],
        page_url,
        page_hint: None,
        default_policy: PagePolicy::Bounded { pages: 50 },
        id_column: "record_id",
        csv_filename: "books.csv",
        transforms: vec![],
        sort: None,
        asset: None,
    }
}

fn page_url(base: &Url, page: u32) -> Result<Url, url::ParseError> {
    base.join(&format!("catalogue/page-{}.html", page))
}

// The card truncates long titles with an ellipsis; the full title only
// exists in the link's title attribute
fn title(ctx: &RowContext) -> Option<FieldValue> {
    let link = ctx.row.select(&TITLE_LINK).next()?;
    link.value().attr("title").map(FieldValue::text)
}

fn price(ctx: &RowContext) -> Option<FieldValue> {
    let cell = ctx.row.select(&PRICE).next()?;
    Some(FieldValue::text(text_of(cell).replace('£', "")))
}

fn availability(ctx: &RowContext) -> Option<FieldValue> {
    let cell = ctx.row.select(&AVAILABILITY).next()?;
    Some(FieldValue::text(text_of(cell)))
}

fn rating(ctx: &RowContext) -> Option<FieldValue> {
    let tag = ctx.row.select(&RATING).next()?;
    let stars = tag.value().classes().find_map(rating_from_word)?;
    Some(FieldValue::text(stars.to_string()))
}

fn rating_from_word(word: &str) -> Option<u8> {
    match word {
        "One" => Some(1),
        "Two" => Some(2),
        "Three" => Some(3),
        "Four" => Some(4),
        "Five" => Some(5),
        _ => None,
    }
}
