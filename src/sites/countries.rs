//! scrapethissite.com country directory scraper
//!
//! The directory is a single page of country cards, so the page-URL builder
//! ignores the page number and the default policy fetches exactly one page.

use super::{text_of, SiteSpec};
use crate::record::{FieldSpec, FieldValue, RowContext};
use crate::scrape::PagePolicy;
use lazy_static::lazy_static;
use scraper::Selector;
use url::Url;

const E: &str = "Invalid selector";
const BASE_URL: &str = "https://www.scrapethissite.com/pages/simple/";

lazy_static! {
    static ref ROWS: Selector = Selector::parse("div.col-md-4.country").expect(E);
    static ref NAME: Selector = Selector::parse("h3.country-name").expect(E);
    static ref CAPITAL: Selector = Selector::parse("span.country-capital").expect(E);
    static ref AREA: Selector = Selector::parse("span.country-area").expect(E);
    static ref POPULATION: Selector = Selector::parse("span.country-population").expect(E);
}

pub fn site() -> SiteSpec {
    SiteSpec {
        name: "countries",
        base: Url::parse(BASE_URL).expect("Invalid base URL"),
        row_selector: ROWS.clone(),
        fields: vec![
            FieldSpec::new("country_name", country_name),
            FieldSpec::new("country_capital", country_capital),
            FieldSpec::new("country_area_km2", country_area),
            FieldSpec::new("country_population", country_population),
        ],
        page_url,
        page_hint: None,
        default_policy: PagePolicy::Bounded { pages: 1 },
        id_column: "record_id",
        csv_filename: "countries.csv",
        transforms: vec![],
        sort: None,
        asset: None,
    }
}

fn page_url(base: &Url, _page: u32) -> Result<Url, url::ParseError> {
    Ok(base.clone())
}

fn card_text(ctx: &RowContext, selector: &Selector) -> Option<FieldValue> {
    let element = ctx.row.select(selector).next()?;
    Some(FieldValue::text(text_of(element)))
}

fn country_name(ctx: &RowContext) -> Option<FieldValue> {
    card_text(ctx, &NAME)
}

fn country_capital(ctx: &RowContext) -> Option<FieldValue> {
    card_text(ctx, &CAPITAL)
}

fn country_area(ctx: &RowContext) -> Option<FieldValue> {
    card_text(ctx, &AREA)
}

fn country_population(ctx: &RowContext) -> Option<FieldValue> {
    card_text(ctx, &POPULATION)
}
