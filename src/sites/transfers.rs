//! Transfermarkt all-time transfer record scraper
//!
//! Each listing row is a transfer: player, clubs, leagues, fee. Rows embed
//! mini-tables inside their cells, so cell access goes through direct
//! children only and never through descendant selectors.
//!
//! Fee and market-value columns arrive as display strings ("€120.00m") and
//! are normalized to plain euro amounts at write time, which is also what
//! the output sort orders by.

use super::{child_elements, text_of, AssetSpec, ColumnTransform, SiteSpec, SortSpec};
use crate::record::{FieldSpec, FieldValue, RowContext};
use crate::scrape::PagePolicy;
use lazy_static::lazy_static;
use scraper::{ElementRef, Html, Selector};
use url::Url;

const E: &str = "Invalid selector";
const BASE_URL: &str = "https://www.transfermarkt.co.uk/transfers/transferrekorde/statistik?saison_id=alle&land_id=0&ausrichtung=&spielerposition_id=&altersklasse=&leihe=&w_s=&plus=1";
const MAXIMUM_PAGES: u32 = 10;

lazy_static! {
    static ref ROWS: Selector =
        Selector::parse("table.items tr.odd, table.items tr.even").expect(E);
    static ref ANCHOR: Selector = Selector::parse("a").expect(E);
    static ref IMAGE: Selector = Selector::parse("img").expect(E);
    static ref ROW: Selector = Selector::parse("tr").expect(E);
    static ref PAGINATION_LINKS: Selector = Selector::parse("ul.tm-pagination a").expect(E);
}

pub fn site() -> SiteSpec {
    SiteSpec {
        name: "transfers",
        base: Url::parse(BASE_URL).expect("Invalid base URL"),
        row_selector: ROWS.clone(),
        fields: vec![
            FieldSpec::new("player_name", player_name),
            FieldSpec::new("player_page_url", player_page_url),
            FieldSpec::new("player_image_url", player_image_url),
            FieldSpec::new("player_position", player_position),
            FieldSpec::new("player_age", player_age),
            FieldSpec::new("player_value_in_euros", player_value),
            FieldSpec::new("season", season),
            FieldSpec::new("player_nationalities", player_nationalities),
            FieldSpec::new("old_club_name", old_club_name),
            FieldSpec::new("old_league_name", old_league_name),
            FieldSpec::new("new_club_name", new_club_name),
            FieldSpec::new("new_league_name", new_league_name),
            FieldSpec::new("transfer_fee_in_euros", transfer_fee),
        ],
        page_url,
        page_hint: Some(page_hint),
        default_policy: PagePolicy::Adaptive {
            ceiling: MAXIMUM_PAGES,
        },
        id_column: "transfer_id",
        csv_filename: "players.csv",
        transforms: vec![
            ColumnTransform {
                field: "player_value_in_euros",
                apply: normalize_money,
            },
            ColumnTransform {
                field: "transfer_fee_in_euros",
                apply: normalize_money,
            },
        ],
        sort: Some(SortSpec {
            field: "transfer_fee_in_euros",
        }),
        asset: Some(AssetSpec {
            url_field: "player_image_url",
            key_field: "player_name",
            directory: "player_images",
        }),
    }
}

fn page_url(base: &Url, page: u32) -> Result<Url, url::ParseError> {
    let mut url = base.clone();
    url.query_pairs_mut().append_pair("page", &page.to_string());
    Ok(url)
}

/// Largest page number linked from the pagination control
fn page_hint(document: &Html) -> Option<u32> {
    let mut last: Option<u32> = None;
    for link in document.select(&PAGINATION_LINKS) {
        let Some(href) = link.value().attr("href") else {
            continue;
        };
        let Some(page) = page_param(href) else {
            continue;
        };
        last = Some(last.map_or(page, |current| current.max(page)));
    }
    last
}

fn page_param(href: &str) -> Option<u32> {
    href.split(['?', '&'])
        .find_map(|part| part.strip_prefix("page="))
        .and_then(|value| value.parse().ok())
}

/// Direct-child cell of the row by position
fn cell<'a>(ctx: &RowContext<'a>, index: usize) -> Option<ElementRef<'a>> {
    child_elements(&ctx.row, "td").into_iter().nth(index)
}

fn player_name(ctx: &RowContext) -> Option<FieldValue> {
    let link = cell(ctx, 1)?.select(&ANCHOR).next()?;
    Some(FieldValue::text(text_of(link)))
}

fn player_page_url(ctx: &RowContext) -> Option<FieldValue> {
    let link = cell(ctx, 1)?.select(&ANCHOR).next()?;
    let href = link.value().attr("href")?;
    let url = ctx.page_url.join(href).ok()?;
    Some(FieldValue::text(url.to_string()))
}

fn player_image_url(ctx: &RowContext) -> Option<FieldValue> {
    let image = cell(ctx, 1)?.select(&IMAGE).next()?;
    image.value().attr("data-src").map(FieldValue::text)
}

// The player cell embeds a two-row mini-table: name on the first row,
// position on the second
fn player_position(ctx: &RowContext) -> Option<FieldValue> {
    let row = cell(ctx, 1)?.select(&ROW).nth(1)?;
    Some(FieldValue::text(text_of(row)))
}

fn player_age(ctx: &RowContext) -> Option<FieldValue> {
    Some(FieldValue::text(text_of(cell(ctx, 2)?)))
}

fn player_value(ctx: &RowContext) -> Option<FieldValue> {
    Some(FieldValue::text(text_of(cell(ctx, 3)?)))
}

fn season(ctx: &RowContext) -> Option<FieldValue> {
    let link = cell(ctx, 4)?.select(&ANCHOR).next()?;
    Some(FieldValue::text(text_of(link)))
}

// One flag image per nationality; dual citizens get two
fn player_nationalities(ctx: &RowContext) -> Option<FieldValue> {
    let mut nationalities = Vec::new();
    for flag in cell(ctx, 5)?.select(&IMAGE) {
        nationalities.push(flag.value().attr("title")?.to_string());
    }
    Some(FieldValue::List(nationalities))
}

fn old_club_name(ctx: &RowContext) -> Option<FieldValue> {
    club_cell_title(ctx, 6, 0)
}

fn old_league_name(ctx: &RowContext) -> Option<FieldValue> {
    club_cell_title(ctx, 6, 1)
}

fn new_club_name(ctx: &RowContext) -> Option<FieldValue> {
    club_cell_title(ctx, 7, 0)
}

fn new_league_name(ctx: &RowContext) -> Option<FieldValue> {
    club_cell_title(ctx, 7, 1)
}

// Club cells hold a mini-table too: club row first, league row second,
// names carried in the anchors' title attributes
fn club_cell_title(ctx: &RowContext, cell_index: usize, row_index: usize) -> Option<FieldValue> {
    let row = cell(ctx, cell_index)?.select(&ROW).nth(row_index)?;
    let link = row.select(&ANCHOR).next()?;
    link.value().attr("title").map(FieldValue::text)
}

fn transfer_fee(ctx: &RowContext) -> Option<FieldValue> {
    let link = cell(ctx, 8)?.select(&ANCHOR).next()?;
    Some(FieldValue::text(text_of(link)))
}

/// Turns a display amount like "€120.00m" into a plain euro count
///
/// Values that do not look like amounts pass through unchanged, so labels
/// like "Free transfer" survive into the output.
fn normalize_money(raw: &str) -> String {
    let cleaned = raw.trim().trim_start_matches(['€', '£', '$']);
    let (number, factor) = if let Some(value) = cleaned.strip_suffix("bn") {
        (value, 1e9)
    } else if let Some(value) = cleaned.strip_suffix('m') {
        (value, 1e6)
    } else if let Some(value) = cleaned.strip_suffix('k') {
        (value, 1e3)
    } else if let Some(value) = cleaned.strip_suffix("Th.") {
        (value, 1e3)
    } else {
        (cleaned, 1.0)
    };
    match number.parse::<f64>() {
        Ok(amount) => format!("{}", (amount * factor).round() as i64),
        Err(_) => raw.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scrape::extract_records;

    const LISTING: &str = r#"
        <table class="items">
          <tbody>
            <tr class="odd">
              <td class="zentriert">1</td>
              <td>
                <table class="inline-table">
                  <tr>
                    <td rowspan="2">
                      <img data-src="https://img.example.com/342229.jpg?lm=1" title="Kylian Mbappé">
                    </td>
                    <td class="hauptlink">
                      <a href="/kylian-mbappe/profil/spieler/342229">Kylian Mbappé</a>
                    </td>
                  </tr>
                  <tr><td>Centre-Forward</td></tr>
                </table>
              </td>
              <td class="zentriert">18</td>
              <td class="rechts">€120.00m</td>
              <td class="zentriert"><a href="/transfers/saison/17-18">17/18</a></td>
              <td class="zentriert">
                <img class="flaggenrahmen" title="France">
                <img class="flaggenrahmen" title="Cameroon">
              </td>
              <td class="zentriert">
                <table class="inline-table">
                  <tr><td><a title="AS Monaco" href="/as-monaco">Monaco</a></td></tr>
                  <tr><td><a title="Ligue 1" href="/ligue-1">L1</a></td></tr>
                </table>
              </td>
              <td class="zentriert">
                <table class="inline-table">
                  <tr><td><a title="Paris Saint-Germain" href="/psg">PSG</a></td></tr>
                  <tr><td><a title="Ligue 1" href="/ligue-1">L1</a></td></tr>
                </table>
              </td>
              <td class="rechts"><a href="/transfer/123">€180.00m</a></td>
            </tr>
            <tr class="even">
              <td class="zentriert">2</td>
              <td><table class="inline-table"><tr><td>No profile link</td></tr></table></td>
            </tr>
          </tbody>
        </table>
    "#;

    fn page_one_url() -> Url {
        let site = site();
        page_url(&site.base, 1).unwrap()
    }

    #[test]
    fn test_extracts_every_field_of_a_full_row() {
        let site = site();
        let records = extract_records(LISTING, &site, &page_one_url(), 1);

        assert_eq!(records.len(), 2);
        let values = &records[0].values;
        assert_eq!(values[0], FieldValue::text("Kylian Mbappé"));
        assert_eq!(
            values[1],
            FieldValue::text(
                "https://www.transfermarkt.co.uk/kylian-mbappe/profil/spieler/342229"
            )
        );
        assert_eq!(
            values[2],
            FieldValue::text("https://img.example.com/342229.jpg?lm=1")
        );
        assert_eq!(values[3], FieldValue::text("Centre-Forward"));
        assert_eq!(values[4], FieldValue::text("18"));
        assert_eq!(values[5], FieldValue::text("€120.00m"));
        assert_eq!(values[6], FieldValue::text("17/18"));
        assert_eq!(
            values[7],
            FieldValue::List(vec!["France".to_string(), "Cameroon".to_string()])
        );
        assert_eq!(values[8], FieldValue::text("AS Monaco"));
        assert_eq!(values[9], FieldValue::text("Ligue 1"));
        assert_eq!(values[10], FieldValue::text("Paris Saint-Germain"));
        assert_eq!(values[11], FieldValue::text("Ligue 1"));
        assert_eq!(values[12], FieldValue::text("€180.00m"));
    }

    #[test]
    fn test_sparse_row_degrades_per_field() {
        let site = site();
        let records = extract_records(LISTING, &site, &page_one_url(), 1);

        // Second row has no anchors, images, or later cells
        let values = &records[1].values;
        assert_eq!(values[0], FieldValue::Missing);
        assert_eq!(values[2], FieldValue::Missing);
        assert_eq!(values[4], FieldValue::Missing);
        assert_eq!(values[12], FieldValue::Missing);
    }

    #[test]
    fn test_flag_without_title_fails_the_whole_field() {
        let body = r#"
            <table class="items">
              <tr class="odd">
                <td></td><td></td><td></td><td></td><td></td>
                <td><img title="Brazil"><img class="broken"></td>
              </tr>
            </table>
        "#;
        let site = site();
        let records = extract_records(body, &site, &page_one_url(), 1);
        assert_eq!(records[0].values[7], FieldValue::Missing);
    }

    #[test]
    fn test_normalize_money() {
        assert_eq!(normalize_money("€120.00m"), "120000000");
        assert_eq!(normalize_money("€900k"), "900000");
        assert_eq!(normalize_money("€400Th."), "400000");
        assert_eq!(normalize_money("€1.2bn"), "1200000000");
        assert_eq!(normalize_money("£72.50m"), "72500000");
        assert_eq!(normalize_money("50000"), "50000");
        assert_eq!(normalize_money("Free transfer"), "Free transfer");
        assert_eq!(normalize_money("-"), "-");
    }

    #[test]
    fn test_page_url_appends_page_parameter() {
        let site = site();
        let url = page_url(&site.base, 3).unwrap();
        assert!(url.as_str().ends_with("&plus=1&page=3"));
        assert!(url.as_str().contains("saison_id=alle"));
    }

    #[test]
    fn test_page_hint_reads_last_page_link() {
        let body = r##"
            <ul class="tm-pagination">
              <li><a href="/transfers/statistik?plus=1&page=2">2</a></li>
              <li><a href="/transfers/statistik?plus=1&page=3">3</a></li>
              <li><a href="/transfers/statistik?plus=1&page=10">last</a></li>
              <li><a href="#">current</a></li>
            </ul>
        "##;
        let document = Html::parse_document(body);
        assert_eq!(page_hint(&document), Some(10));
    }

    #[test]
    fn test_page_hint_absent_without_control() {
        let document = Html::parse_document("<p>No pagination here</p>");
        assert_eq!(page_hint(&document), None);
    }

    #[test]
    fn test_page_param() {
        assert_eq!(page_param("/a/b?x=1&page=7"), Some(7));
        assert_eq!(page_param("/a/b?page=2"), Some(2));
        assert_eq!(page_param("/a/b?x=1"), None);
        assert_eq!(page_param("#"), None);
    }
}
