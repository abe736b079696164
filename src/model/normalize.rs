//! Record normalization
//!
//! Turns raw dataset rows into typed [`RawRecord`]s. The key column is
//! decomposed into year and month, the grid row is read as an integer and
//! every category column is parsed as a float. Row and category fields that
//! fail to parse are kept as "no data" instead of aborting the batch; only
//! an unusable key rejects the input.

use super::error::{NormalizeError, NormalizeResult};
use super::types::{CategoryValues, RawRecord, Severity, CATEGORY_COUNT};
use csv::StringRecord;

/// Name of the identifying key column
pub const KEY_COLUMN: &str = "key";

/// Name of the grid row column
pub const ROW_COLUMN: &str = "row";

/// Output of a normalization pass
#[derive(Debug, Clone, Default)]
pub struct Normalized {
    /// One record per input row, in input order
    pub records: Vec<RawRecord>,
    /// Number of row and category fields that were treated as missing
    pub malformed_fields: usize,
    /// Number of records whose categories sum to more than 1
    pub overfull_records: usize,
}

/// Maps header names to column positions and normalizes rows
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordNormalizer {
    key: usize,
    row: usize,
    categories: [usize; CATEGORY_COUNT],
}

impl RecordNormalizer {
    /// Resolve column positions from a header row
    pub fn from_headers(headers: &StringRecord) -> NormalizeResult<Self> {
        let find = |name: &str| {
            headers
                .iter()
                .position(|h| h.trim() == name)
                .ok_or_else(|| NormalizeError::MissingColumn(name.to_string()))
        };

        let key = find(KEY_COLUMN)?;
        let row = find(ROW_COLUMN)?;
        let mut categories = [0; CATEGORY_COUNT];
        for severity in Severity::all() {
            categories[severity.index()] = find(&severity.column())?;
        }

        let ignored = headers.len().saturating_sub(CATEGORY_COUNT + 2);
        if ignored > 0 {
            tracing::debug!("Ignoring {} extra dataset columns", ignored);
        }

        Ok(Self {
            key,
            row,
            categories,
        })
    }

    /// Normalize one row. `line` is the 1-based data line used in errors.
    ///
    /// Returns the record and the number of fields (grid row included) that
    /// were treated as missing.
    pub fn normalize(&self, row: &StringRecord, line: usize) -> NormalizeResult<(RawRecord, usize)> {
        let key = row.get(self.key).unwrap_or("").trim();
        let (year, month) = parse_key(key).ok_or_else(|| NormalizeError::InvalidKey {
            line,
            key: key.to_string(),
        })?;

        let grid_row = row.get(self.row).and_then(parse_row);
        let mut malformed = usize::from(grid_row.is_none());

        let mut values: CategoryValues = [None; CATEGORY_COUNT];
        for (slot, &column) in values.iter_mut().zip(self.categories.iter()) {
            *slot = row.get(column).and_then(parse_value);
            if slot.is_none() {
                malformed += 1;
            }
        }

        let mut record = RawRecord::new(year, month, 0, values);
        record.key = key.to_string();
        record.row = grid_row;
        Ok((record, malformed))
    }

    /// Normalize a batch of rows, preserving order
    pub fn normalize_all<'a, I>(&self, rows: I) -> NormalizeResult<Normalized>
    where
        I: IntoIterator<Item = &'a StringRecord>,
    {
        let mut out = Normalized::default();
        for (idx, row) in rows.into_iter().enumerate() {
            let (record, malformed) = self.normalize(row, idx + 1)?;
            if malformed > 0 {
                tracing::debug!("Key {}: {} fields treated as missing", record.key, malformed);
            }
            if record.is_overfull() {
                tracing::warn!(
                    "Key {}: categories sum to {:.3}, more than the whole area",
                    record.key,
                    record.total()
                );
                out.overfull_records += 1;
            }
            out.malformed_fields += malformed;
            out.records.push(record);
        }
        Ok(out)
    }
}

/// Split a `YYYYMM` key into year and month
///
/// Characters after the sixth are ignored.
pub fn parse_key(key: &str) -> Option<(i32, u32)> {
    let year = key.get(0..4)?;
    let month = key.get(4..6)?;
    if !year.bytes().chain(month.bytes()).all(|b| b.is_ascii_digit()) {
        return None;
    }

    let year: i32 = year.parse().ok()?;
    let month: u32 = month.parse().ok()?;
    (1..=12).contains(&month).then_some((year, month))
}

/// Parse a category value; empty, non-numeric and non-finite text is missing
pub fn parse_value(text: &str) -> Option<f64> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    text.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Parse a grid row; accepts integral floats such as `"3.0"`
fn parse_row(text: &str) -> Option<u32> {
    let value = text.trim().parse::<f64>().ok()?;
    if value.is_finite() && value >= 0.0 && value.fract() == 0.0 && value <= u32::MAX as f64 {
        Some(value as u32)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers() -> StringRecord {
        StringRecord::from(vec!["key", "0", "1", "2", "3", "4", "5", "6", "row"])
    }

    fn row(fields: &[&str]) -> StringRecord {
        StringRecord::from(fields.to_vec())
    }

    #[test]
    fn test_normalize_scenario() {
        let normalizer = RecordNormalizer::from_headers(&headers()).unwrap();
        let input = row(&["201301", "0.1", "0.2", "0.26", "0.2", "0.1", "0.1", "0.04", "0"]);

        let (record, malformed) = normalizer.normalize(&input, 1).unwrap();

        assert_eq!(malformed, 0);
        assert_eq!(record.year, 2013);
        assert_eq!(record.month, 1);
        assert_eq!(record.col, 3);
        assert_eq!(record.row, Some(0));
        assert_eq!(record.values[0], Some(0.1));
        assert_eq!(record.values[1], Some(0.2));
        assert_eq!(record.values[2], Some(0.26));
    }

    #[test]
    fn test_key_round_trip() {
        let normalizer = RecordNormalizer::from_headers(&headers()).unwrap();
        for key in ["189501", "190012", "193406", "201301"] {
            let input = row(&[key, "0", "0", "0", "0", "0", "0", "0", "2"]);
            let (record, _) = normalizer.normalize(&input, 1).unwrap();
            assert_eq!(
                (record.year * 100 + record.month as i32).to_string(),
                key
            );
        }
    }

    #[test]
    fn test_malformed_fields_are_missing() {
        let normalizer = RecordNormalizer::from_headers(&headers()).unwrap();
        let input = row(&["190003", "abc", "", "0.3", "NaN", "0.1", "0.1", "0.1", "1"]);

        let (record, malformed) = normalizer.normalize(&input, 1).unwrap();

        assert_eq!(malformed, 3);
        assert_eq!(record.values[0], None);
        assert_eq!(record.values[1], None);
        assert_eq!(record.values[3], None);
        assert_eq!(record.values[2], Some(0.3));
    }

    #[test]
    fn test_column_order_from_header() {
        let headers = StringRecord::from(vec!["row", "6", "5", "4", "3", "2", "1", "0", "key", "extra"]);
        let normalizer = RecordNormalizer::from_headers(&headers).unwrap();
        let input = row(&["4", "0.6", "0.5", "0.4", "0.3", "0.2", "0.1", "0.0", "195007", "x"]);

        let (record, _) = normalizer.normalize(&input, 1).unwrap();

        assert_eq!(record.row, Some(4));
        assert_eq!(record.col, 0);
        assert_eq!(record.values[6], Some(0.6));
        assert_eq!(record.values[1], Some(0.1));
    }

    #[test]
    fn test_missing_column() {
        let headers = StringRecord::from(vec!["key", "0", "1", "2", "3", "4", "5", "row"]);
        assert_eq!(
            RecordNormalizer::from_headers(&headers),
            Err(NormalizeError::MissingColumn("6".to_string()))
        );
    }

    #[test]
    fn test_invalid_key() {
        let normalizer = RecordNormalizer::from_headers(&headers()).unwrap();

        let bad_month = row(&["201313", "0", "0", "0", "0", "0", "0", "0", "0"]);
        assert!(matches!(
            normalizer.normalize(&bad_month, 7),
            Err(NormalizeError::InvalidKey { line: 7, .. })
        ));
    }

    #[test]
    fn test_malformed_row_is_missing() {
        let normalizer = RecordNormalizer::from_headers(&headers()).unwrap();

        for text in ["abc", "-1", "2.5", ""] {
            let input = row(&["189502", "0.1", "0", "0", "0", "0", "0", "0", text]);
            let (record, malformed) = normalizer.normalize(&input, 2).unwrap();

            assert_eq!(record.row, None);
            assert_eq!(record.position(), None);
            assert_eq!(malformed, 1);
            assert_eq!(record.values[0], Some(0.1));
        }
    }

    #[test]
    fn test_overfull_records_counted() {
        let normalizer = RecordNormalizer::from_headers(&headers()).unwrap();
        let rows = vec![
            row(&["190001", "0.9", "0.9", "0.9", "0.9", "0.9", "0.9", "0.9", "0"]),
            row(&["190002", "0.1", "0.2", "0.26", "0.2", "0.1", "0.1", "0.04", "0"]),
        ];

        let out = normalizer.normalize_all(&rows).unwrap();

        assert_eq!(out.records.len(), 2);
        assert_eq!(out.overfull_records, 1);
        assert!(out.records[0].is_overfull());
    }

    #[test]
    fn test_normalize_all_preserves_order() {
        let normalizer = RecordNormalizer::from_headers(&headers()).unwrap();
        let rows = vec![
            row(&["190002", "0.1", "0", "0", "0", "0", "0", "0", "0"]),
            row(&["190001", "x", "0", "0", "0", "0", "0", "0", "0"]),
        ];

        let out = normalizer.normalize_all(&rows).unwrap();

        assert_eq!(out.records.len(), 2);
        assert_eq!(out.records[0].month, 2);
        assert_eq!(out.records[1].month, 1);
        assert_eq!(out.malformed_fields, 1);
    }

    #[test]
    fn test_parse_key() {
        assert_eq!(parse_key("201301"), Some((2013, 1)));
        assert_eq!(parse_key("2013"), None);
        assert_eq!(parse_key("2013a1"), None);
        assert_eq!(parse_key("201300"), None);
    }
}
