//! Record and run-level result types

use crate::record::FieldValue;

/// A downloadable asset referenced by a record, such as a photo.
///
/// The reference is attached during the asset round; `data` stays `None`
/// when the download failed, which is not an error for the record itself.
#[derive(Debug, Clone)]
pub struct AssetReference {
    /// Where the asset was (or would have been) fetched from
    pub source_url: String,
    /// Filename the asset sink will write, extension included
    pub filename: String,
    /// Downloaded bytes, `None` if the download failed or was skipped
    pub data: Option<Vec<u8>>,
}

/// One extracted record: an ordered list of field values plus its provenance.
///
/// `page` and `row` record where the record came from and define the
/// canonical output order, independent of fetch completion order.
#[derive(Debug, Clone)]
pub struct Record {
    /// 1-based page number the record was extracted from
    pub page: u32,
    /// 0-based row index within that page
    pub row: u32,
    /// Field values in the site's declared field order
    pub values: Vec<FieldValue>,
    pub asset: Option<AssetReference>,
}

impl Record {
    pub fn new(page: u32, row: u32, values: Vec<FieldValue>) -> Self {
        Record {
            page,
            row,
            values,
            asset: None,
        }
    }

    /// True when the record carries an asset whose download succeeded.
    pub fn has_asset_data(&self) -> bool {
        self.asset
            .as_ref()
            .map(|asset| asset.data.is_some())
            .unwrap_or(false)
    }
}

/// Counters accumulated over a scrape run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunStats {
    pub pages_fetched: usize,
    pub pages_failed: usize,
    pub assets_fetched: usize,
    pub assets_failed: usize,
}

/// Everything a finished run produced
#[derive(Debug, Default)]
pub struct ScrapeResult {
    /// Records sorted by (page, row)
    pub records: Vec<Record>,
    pub stats: RunStats,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_starts_without_asset() {
        let record = Record::new(1, 0, vec![FieldValue::text("a")]);
        assert!(record.asset.is_none());
        assert!(!record.has_asset_data());
    }

    #[test]
    fn test_has_asset_data_requires_bytes() {
        let mut record = Record::new(2, 3, vec![]);
        record.asset = Some(AssetReference {
            source_url: "https://img.example.com/p.jpg".to_string(),
            filename: "p.jpg".to_string(),
            data: None,
        });
        assert!(!record.has_asset_data());

        if let Some(asset) = record.asset.as_mut() {
            asset.data = Some(vec![0xff, 0xd8]);
        }
        assert!(record.has_asset_data());
    }

    #[test]
    fn test_stats_default_to_zero() {
        let stats = RunStats::default();
        assert_eq!(stats.pages_fetched, 0);
        assert_eq!(stats.pages_failed, 0);
        assert_eq!(stats.assets_fetched, 0);
        assert_eq!(stats.assets_failed, 0);
    }
}
