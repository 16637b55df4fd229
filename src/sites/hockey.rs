//! scrapethissite.com NHL team season scraper
//!
//! One record per team season row. The site paginates with a `page_num`
//! query parameter and answers out-of-range pages with an empty table, so
//! discovery runs adaptively under a fixed ceiling.

use super::{text_of, SiteSpec};
use crate::record::{FieldSpec, FieldValue, RowContext};
use crate::scrape::PagePolicy;
use lazy_static::lazy_static;
use scraper::Selector;
use url::Url;

const E: &str = "Invalid selector";
const BASE_URL: &str = "https://www.scrapethissite.com/pages/forms/";
const MAX_PAGE_NUMBER: u32 = 24;

lazy_static! {
    static ref ROWS: Selector = Selector::parse("tr.team").expect(E);
    static ref NAME: Selector = Selector::parse("td.name").expect(E);
    static ref YEAR: Selector = Selector::parse("td.year").expect(E);
    static ref WINS: Selector = Selector::parse("td.wins").expect(E);
    static ref LOSSES: Selector = Selector::parse("td.losses").expect(E);
    static ref OT_LOSSES: Selector = Selector::parse("td.ot-losses").expect(E);
    static ref PCT: Selector = Selector::parse("td.pct").expect(E);
    static ref GOALS_FOR: Selector = Selector::parse("td.gf").expect(E);
    static ref GOALS_AGAINST: Selector = Selector::parse("td.ga").expect(E);
    static ref DIFF: Selector = Selector::parse("td.diff").expect(E);
}

pub fn site() -> SiteSpec {
    SiteSpec {
        name: "hockey",
        base: Url::parse(BASE_URL).expect("Invalid base URL"),
        row_selector: ROWS.clone(),
        fields: vec![
            FieldSpec::new("team_name", team_name),
            FieldSpec::new("year", year),
            FieldSpec::new("wins", wins),
            FieldSpec::new("losses", losses),
            FieldSpec::new("ot_losses", ot_losses),
            FieldSpec::new("win_percentage", win_percentage),
            FieldSpec::new("goals_for", goals_for),
            FieldSpec::new("goals_against", goals_against),
            FieldSpec::new("goal_difference", goal_difference),
        ],
        page_url,
        page_hint: None,
        default_policy: PagePolicy::Adaptive {
            ceiling: MAX_PAGE_NUMBER,
        },
        id_column: "record_id",
        csv_filename: "teams.csv",
        transforms: vec![],
        sort: None,
        asset: None,
    }
}

fn page_url(base: &Url, page: u32) -> Result<Url, url::ParseError> {
    let mut url = base.clone();
    url.query_pairs_mut()
        .append_pair("page_num", &page.to_string());
    Ok(url)
}

fn cell_text(ctx: &RowContext, selector: &Selector) -> Option<FieldValue> {
    let cell = ctx.row.select(selector).next()?;
    Some(FieldValue::text(text_of(cell)))
}

fn team_name(ctx: &RowContext) -> Option<FieldValue> {
    cell_text(ctx, &NAME)
}

fn year(ctx: &RowContext) -> Option<FieldValue> {
    cell_text(ctx, &YEAR)
}

fn wins(ctx: &RowContext) -> Option<FieldValue> {
    cell_text(ctx, &WINS)
}

fn losses(ctx: &RowContext) -> Option<FieldValue> {
    cell_text(ctx, &LOSSES)
}

fn ot_losses(ctx: &RowContext) -> Option<FieldValue> {
    cell_text(ctx, &OT_LOSSES)
}

// Styled green or red depending on the season, so the class list is
// "pct text-success" or "pct text-danger"
fn win_percentage(ctx: &RowContext) -> Option<FieldValue> {
    cell_text(ctx, &PCT)
}

fn goals_for(ctx: &RowContext) -> Option<FieldValue> {
    cell_text(ctx, &GOALS_FOR)
}

fn goals_against(ctx: &RowContext) -> Option<FieldValue> {
    cell_text(ctx, &GOALS_AGAINST)
}

fn goal_difference(ctx: &RowContext) -> Option<FieldValue> {
    cell_text(ctx, &DIFF)
}
