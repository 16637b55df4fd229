//! CSV record sink
//!
//! Writes one header row plus one row per record. The first column is a
//! 1-based id assigned after the sink's own ordering, so ids always match
//! the written row positions. Sites may declare a numeric sort key; rows
//! whose key does not parse sort after all rows whose key does.

use crate::record::{FieldValue, Record};
use crate::sites::{SiteSpec, TransformFn};
use crate::SinkResult;
use std::cmp::Ordering;
use std::path::PathBuf;

/// Writes finished records to one CSV file
pub struct CsvSink {
    path: PathBuf,
}

impl CsvSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        CsvSink { path: path.into() }
    }

    /// Writes all records, returning the number of data rows
    pub fn write(&self, site: &SiteSpec, records: &[Record]) -> SinkResult<usize> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let transforms = transform_table(site);
        let ordered = order_for_write(site, records, &transforms);

        let mut writer = csv::WriterBuilder::new().from_path(&self.path)?;

        let mut header = Vec::with_capacity(site.fields.len() + 1);
        header.push(site.id_column.to_string());
        header.extend(site.fields.iter().map(|field| field.name.to_string()));
        writer.write_record(&header)?;

        for (position, record) in ordered.iter().enumerate() {
            let mut row = Vec::with_capacity(site.fields.len() + 1);
            row.push((position + 1).to_string());
            for (index, value) in record.values.iter().enumerate() {
                row.push(render_cell(value, transforms.get(index).copied().flatten()));
            }
            writer.write_record(&row)?;
        }
        writer.flush()?;

        Ok(ordered.len())
    }
}

/// Column transform lookup in field order
fn transform_table(site: &SiteSpec) -> Vec<Option<TransformFn>> {
    site.fields
        .iter()
        .map(|field| {
            site.transforms
                .iter()
                .find(|transform| transform.field == field.name)
                .map(|transform| transform.apply)
        })
        .collect()
}

/// Renders one cell, applying the column transform when one is declared
///
/// The missing-value sentinel is written verbatim, never transformed.
fn render_cell(value: &FieldValue, transform: Option<TransformFn>) -> String {
    let cell = value.to_string();
    if value.is_missing() {
        return cell;
    }
    match transform {
        Some(apply) => apply(&cell),
        None => cell,
    }
}

/// Applies the site's declared sort, if any
///
/// Sorting is stable and descending on the numeric value of the sort
/// column's rendered cell. Cells that do not parse as numbers keep their
/// relative order after all cells that do.
fn order_for_write<'a>(
    site: &SiteSpec,
    records: &'a [Record],
    transforms: &[Option<TransformFn>],
) -> Vec<&'a Record> {
    let ordered: Vec<&Record> = records.iter().collect();
    let Some(sort) = &site.sort else {
        return ordered;
    };
    let Some(index) = site.field_index(sort.field) else {
        tracing::warn!("Sort field '{}' is not in the field table", sort.field);
        return ordered;
    };

    let transform = transforms.get(index).copied().flatten();
    let mut keyed: Vec<(Option<f64>, &Record)> = ordered
        .into_iter()
        .map(|record| {
            let cell = render_cell(&record.values[index], transform);
            (cell.parse::<f64>().ok(), record)
        })
        .collect();

    keyed.sort_by(|(a, _), (b, _)| match (a, b) {
        (Some(x), Some(y)) => y.partial_cmp(x).unwrap_or(Ordering::Equal),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });

    keyed.into_iter().map(|(_, record)| record).collect()
}
