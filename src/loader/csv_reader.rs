//! CSV parsing of the drought dataset

use super::LoadError;
use crate::model::{Normalized, RecordNormalizer};

/// Parse dataset text (header row plus one row per month)
pub fn parse_dataset(text: &str) -> Result<Normalized, LoadError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(text.as_bytes());

    let headers = reader.headers()?.clone();
    let normalizer = RecordNormalizer::from_headers(&headers)?;

    let rows = reader.records().collect::<Result<Vec<_>, _>>()?;
    Ok(normalizer.normalize_all(&rows)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::NormalizeError;

    #[test]
    fn test_parse_dataset() {
        let text = "key,0,1,2,3,4,5,6,row
189501, 0.05,0.1,0.1,0.5,0.1,0.1,0.05,0
189502,0.05,oops,0.1,0.5,0.1,0.1,0.05,0
";
        let normalized = parse_dataset(text).unwrap();

        assert_eq!(normalized.records.len(), 2);
        assert_eq!(normalized.records[0].values[0], Some(0.05));
        assert_eq!(normalized.records[1].values[1], None);
        assert_eq!(normalized.malformed_fields, 1);
    }

    #[test]
    fn test_bad_row_kept_as_missing() {
        let text = "key,0,1,2,3,4,5,6,row
189501,0.05,0.1,0.1,0.5,0.1,0.1,0.05,0
189502,0.05,0.1,0.1,0.5,0.1,0.1,0.05,abc
";
        let normalized = parse_dataset(text).unwrap();

        assert_eq!(normalized.records.len(), 2);
        assert_eq!(normalized.records[0].row, Some(0));
        assert_eq!(normalized.records[1].row, None);
        assert_eq!(normalized.malformed_fields, 1);
    }

    #[test]
    fn test_ragged_row_is_fatal() {
        let text = "key,0,1,2,3,4,5,6,row
189501,0.05,0.1
";
        assert!(matches!(parse_dataset(text), Err(LoadError::Csv(_))));
    }

    #[test]
    fn test_bad_key_reports_line() {
        let text = "key,0,1,2,3,4,5,6,row
189501,0,0,0,0,0,0,0,0
18950,0,0,0,0,0,0,0,0
";
        match parse_dataset(text) {
            Err(LoadError::Malformed(NormalizeError::InvalidKey { line, key })) => {
                assert_eq!(line, 2);
                assert_eq!(key, "18950");
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }
}
