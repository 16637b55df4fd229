//! Record extraction from fetched pages
//!
//! One page body goes in, zero or more records come out. Rows are located
//! with the site's row selector; every field of a row is extracted through
//! `safe_extract`, so a malformed cell degrades to a sentinel value instead
//! of dropping the row or the page.

use crate::record::{safe_extract, Record, RowContext};
use crate::sites::SiteSpec;
use scraper::Html;
use url::Url;

/// Extracts all records from one page body
///
/// Records carry their page number and 0-based row index, which together
/// define the canonical output order no matter when the page was fetched.
pub fn extract_records(body: &str, site: &SiteSpec, page_url: &Url, page: u32) -> Vec<Record> {
    let document = Html::parse_document(body);
    let mut records = Vec::new();

    for (index, row) in document.select(&site.row_selector).enumerate() {
        let ctx = RowContext { row, page_url };
        let values = site
            .fields
            .iter()
            .map(|spec| safe_extract(spec, &ctx))
            .collect();
        records.push(Record::new(page, index as u32, values));
    }

    if records.is_empty() {
        tracing::debug!("No matching rows on page {}", page);
    } else {
        tracing::debug!("Extracted {} records from page {}", records.len(), page);
    }

    records
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{FieldSpec, FieldValue};
    use crate::scrape::PagePolicy;
    use scraper::Selector;

    fn name(ctx: &RowContext) -> Option<FieldValue> {
        let selector = Selector::parse(".name").unwrap();
        let element = ctx.row.select(&selector).next()?;
        Some(FieldValue::text(
            element.text().collect::<String>().trim().to_string(),
        ))
    }

    fn price(ctx: &RowContext) -> Option<FieldValue> {
        let selector = Selector::parse(".price").unwrap();
        let element = ctx.row.select(&selector).next()?;
        Some(FieldValue::text(
            element.text().collect::<String>().trim().to_string(),
        ))
    }

    fn tags(ctx: &RowContext) -> Option<FieldValue> {
        let selector = Selector::parse(".tag").unwrap();
        Some(FieldValue::List(
            ctx.row
                .select(&selector)
                .map(|el| el.text().collect::<String>().trim().to_string())
                .collect(),
        ))
    }

    fn page_url(base: &Url, page: u32) -> Result<Url, url::ParseError> {
        base.join(&format!("?page={}", page))
    }

    fn listing_site() -> SiteSpec {
        SiteSpec {
            name: "listing",
            base: Url::parse("https://listing.example.com/").unwrap(),
            row_selector: Selector::parse("li.item").unwrap(),
            fields: vec![
                FieldSpec::new("name", name),
                FieldSpec::new("price", price),
                FieldSpec::new("tags", tags),
            ],
            page_url,
            page_hint: None,
            default_policy: PagePolicy::Bounded { pages: 1 },
            id_column: "record_id",
            csv_filename: "listing.csv",
            transforms: vec![],
            sort: None,
            asset: None,
        }
    }

    #[test]
    fn test_extracts_rows_in_document_order() {
        let body = r#"
            <ul>
              <li class="item"><span class="name">Alpha</span><span class="price">10</span></li>
              <li class="item"><span class="name">Beta</span><span class="price">20</span></li>
            </ul>
        "#;
        let site = listing_site();
        let records = extract_records(body, &site, &site.base, 3);

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].page, 3);
        assert_eq!(records[0].row, 0);
        assert_eq!(records[0].values[0], FieldValue::text("Alpha"));
        assert_eq!(records[1].row, 1);
        assert_eq!(records[1].values[1], FieldValue::text("20"));
    }

    #[test]
    fn test_missing_field_becomes_sentinel() {
        let body = r#"
            <li class="item"><span class="name">NoPrice</span></li>
        "#;
        let site = listing_site();
        let records = extract_records(body, &site, &site.base, 1);

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].values[0], FieldValue::text("NoPrice"));
        assert_eq!(records[0].values[1], FieldValue::Missing);
    }

    #[test]
    fn test_sibling_fields_survive_a_bad_cell() {
        let body = r#"
            <li class="item">
              <span class="name">Gamma</span>
              <span class="tag">new</span>
              <span class="tag">sale</span>
            </li>
        "#;
        let site = listing_site();
        let records = extract_records(body, &site, &site.base, 1);

        let record = &records[0];
        assert_eq!(record.values[0], FieldValue::text("Gamma"));
        assert_eq!(record.values[1], FieldValue::Missing);
        assert_eq!(
            record.values[2],
            FieldValue::List(vec!["new".to_string(), "sale".to_string()])
        );
    }

    #[test]
    fn test_no_matching_rows_yields_empty() {
        let body = "<div><p>Nothing to see</p></div>";
        let site = listing_site();
        let records = extract_records(body, &site, &site.base, 7);
        assert!(records.is_empty());
    }

    #[test]
    fn test_values_follow_declared_field_order() {
        let body = r#"
            <li class="item"><span class="price">5</span><span class="name">Delta</span></li>
        "#;
        let site = listing_site();
        let records = extract_records(body, &site, &site.base, 1);

        // Column order comes from the field table, not the markup
        assert_eq!(records[0].values[0], FieldValue::text("Delta"));
        assert_eq!(records[0].values[1], FieldValue::text("5"));
    }
}
