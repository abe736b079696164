//! Year grouping and stacking
//!
//! Groups normalized records by year, appends one synthetic boundary record
//! per year and computes the cumulative category stacks.
//!
//! # Boundary records
//!
//! A step-shaped area needs a value at the right edge of its domain, so each
//! year gets a copy of its last real month placed at month 13. The partial
//! boundary year only has a single real month; it gets a copy of that month
//! placed at month 2 so the area covers exactly one month slot.
//!
//! ```text
//! regular year:  1 2 3 4 5 6 7 8 9 10 11 12 | 13 (copy of 12)
//! boundary year: 1 | 2 (copy of 1)
//! ```

use super::error::{ModelError, ModelResult};
use super::grid::GridIndex;
use super::types::*;

/// Month given to the synthetic record of a regular year
pub const TRAILING_MONTH: u32 = 13;

/// Month given to the synthetic record of the boundary year
pub const BOUNDARY_MONTH: u32 = 2;

/// Group records by year, keeping years in first-seen order
pub fn group_by_year(records: Vec<RawRecord>) -> Vec<(i32, Vec<RawRecord>)> {
    let mut groups: Vec<(i32, Vec<RawRecord>)> = Vec::new();
    for record in records {
        match groups.iter_mut().find(|(year, _)| *year == record.year) {
            Some((_, members)) => members.push(record),
            None => groups.push((record.year, vec![record])),
        }
    }
    groups
}

/// Pick the boundary year among the years present
pub fn resolve_boundary_year(years: &[i32], boundary: BoundaryYear) -> ModelResult<i32> {
    match boundary {
        BoundaryYear::Earliest => years.iter().copied().min().ok_or(ModelError::EmptyDataset),
        BoundaryYear::Latest => years.iter().copied().max().ok_or(ModelError::EmptyDataset),
        BoundaryYear::Year(year) if years.contains(&year) => Ok(year),
        BoundaryYear::Year(year) => Err(ModelError::UnknownBoundaryYear(year)),
    }
}

/// Compute ordered cumulative stacks over the fixed categories
///
/// Pure: the same records always produce the same frames. A missing value
/// yields no band and does not advance the running sum.
pub fn stack(records: &[RawRecord]) -> Vec<StackFrame> {
    records
        .iter()
        .map(|record| {
            let mut running = 0.0;
            let mut category_bounds = [None; CATEGORY_COUNT];
            for (bound, value) in category_bounds.iter_mut().zip(record.values.iter()) {
                if let Some(v) = value {
                    *bound = Some(Band {
                        lower: running,
                        upper: running + v,
                    });
                    running += v;
                }
            }
            StackFrame {
                month: record.month,
                category_bounds,
            }
        })
        .collect()
}

impl YearGroup {
    /// Validate the real records of a year, append its synthetic record and
    /// stack the result
    pub fn build(year: i32, mut records: Vec<RawRecord>, boundary: bool) -> ModelResult<Self> {
        if records.is_empty() {
            return Err(ModelError::DegenerateYearGroup(year));
        }

        records.sort_by_key(|r| r.month);
        if let Some(pair) = records.windows(2).find(|w| w[0].month == w[1].month) {
            return Err(ModelError::DuplicateMonth {
                year,
                month: pair[0].month,
            });
        }

        let synthetic = if boundary {
            if records.len() != 1 {
                return Err(ModelError::BoundaryYearShape {
                    year,
                    records: records.len(),
                });
            }
            records[0].with_month(BOUNDARY_MONTH)
        } else {
            if records.len() != 12 {
                return Err(ModelError::IncompleteYear {
                    year,
                    months: records.len(),
                });
            }
            records[11].with_month(TRAILING_MONTH)
        };

        let real_months = records.len();
        records.push(synthetic);
        let stacked_series = stack(&records);

        Ok(Self {
            year,
            records,
            real_months,
            boundary,
            stacked_series,
        })
    }
}

impl DroughtModel {
    /// Build the model from normalized records
    pub fn build(records: Vec<RawRecord>, options: &ModelOptions) -> ModelResult<Self> {
        // Taken over every record, including years dropped below
        let max_row = records.iter().filter_map(|r| r.row).max().unwrap_or(0);
        let overfull_months = records.iter().filter(|r| r.is_overfull()).count();
        if overfull_months > 0 {
            tracing::warn!(
                "{} months have categories summing to more than 1; their stacks overflow the cell",
                overfull_months
            );
        }

        let grouped = group_by_year(records);
        let years: Vec<i32> = grouped.iter().map(|(year, _)| *year).collect();
        let boundary_year = resolve_boundary_year(&years, options.boundary_year)?;

        let mut groups = Vec::with_capacity(grouped.len());
        for (year, members) in grouped {
            match YearGroup::build(year, members, year == boundary_year) {
                Ok(group) => groups.push(group),
                Err(ModelError::IncompleteYear { year, months })
                    if options.incomplete_years == IncompletePolicy::Skip =>
                {
                    tracing::warn!("Skipping year {}: only {} months present", year, months);
                }
                Err(e) => return Err(e),
            }
        }

        // Fails on overlapping cells
        let index = GridIndex::new(&groups)?;
        if index.len() < groups.len() {
            tracing::warn!(
                "{} years have no grid row and will not be drawn",
                groups.len() - index.len()
            );
        }

        tracing::info!(
            "Built drought model: {} years, boundary year {}, {} grid rows",
            groups.len(),
            boundary_year,
            max_row + 1
        );

        Ok(Self {
            groups,
            max_row,
            boundary_year,
            overfull_months,
        })
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Twelve months of a year with a constant category split
    pub(crate) fn full_year(year: i32, row: u32) -> Vec<RawRecord> {
        (1..=12)
            .map(|month| {
                let dry = 0.01 * month as f64;
                RawRecord::new(
                    year,
                    month,
                    row,
                    [
                        Some(dry),
                        Some(0.1),
                        Some(0.1),
                        Some(0.3),
                        Some(0.1),
                        Some(0.1),
                        Some(0.1),
                    ],
                )
            })
            .collect()
    }

    pub(crate) fn boundary_record(year: i32, row: u32) -> RawRecord {
        RawRecord::new(
            year,
            1,
            row,
            [
                Some(0.1),
                Some(0.2),
                Some(0.26),
                Some(0.2),
                Some(0.1),
                Some(0.1),
                Some(0.04),
            ],
        )
    }

    /// 2013 boundary year (January only) followed by 2011 and 2012
    pub(crate) fn sample_records() -> Vec<RawRecord> {
        let mut records = vec![boundary_record(2013, 0)];
        records.extend(full_year(2011, 0));
        records.extend(full_year(2012, 0));
        records
    }

    #[test]
    fn test_group_by_year_first_seen_order() {
        let groups = group_by_year(sample_records());
        let years: Vec<i32> = groups.iter().map(|(y, _)| *y).collect();

        assert_eq!(years, vec![2013, 2011, 2012]);
        assert_eq!(groups[0].1.len(), 1);
        assert_eq!(groups[1].1.len(), 12);
    }

    #[test]
    fn test_regular_year_augmentation() {
        let group = YearGroup::build(2011, full_year(2011, 0), false).unwrap();
        let records = group.records();

        assert_eq!(records.len(), 13);
        assert_eq!(records[12].month, TRAILING_MONTH);
        assert_eq!(records[12].with_month(12), records[11]);
        assert_eq!(group.real_records().len(), 12);
        assert_eq!(group.stacked_series().len(), 13);
    }

    #[test]
    fn test_boundary_year_augmentation() {
        let group = YearGroup::build(2013, vec![boundary_record(2013, 0)], true).unwrap();
        let records = group.records();

        assert_eq!(records.len(), 2);
        assert_eq!(records[1].month, BOUNDARY_MONTH);
        assert_eq!(records[1].values, records[0].values);
        assert!(group.is_boundary());
    }

    #[test]
    fn test_records_sorted_chronologically() {
        let mut shuffled = full_year(1950, 3);
        shuffled.reverse();
        let group = YearGroup::build(1950, shuffled, false).unwrap();

        let months: Vec<u32> = group.records().iter().map(|r| r.month).collect();
        assert_eq!(months, (1..=13).collect::<Vec<_>>());
    }

    #[test]
    fn test_degenerate_and_incomplete_years() {
        assert_eq!(
            YearGroup::build(1900, Vec::new(), false),
            Err(ModelError::DegenerateYearGroup(1900))
        );

        let mut partial = full_year(1900, 0);
        partial.truncate(11);
        assert_eq!(
            YearGroup::build(1900, partial, false),
            Err(ModelError::IncompleteYear {
                year: 1900,
                months: 11
            })
        );

        assert_eq!(
            YearGroup::build(1900, full_year(1900, 0), true),
            Err(ModelError::BoundaryYearShape {
                year: 1900,
                records: 12
            })
        );
    }

    #[test]
    fn test_duplicate_month_rejected() {
        let mut records = full_year(1901, 0);
        records[4] = records[3].clone();
        assert_eq!(
            YearGroup::build(1901, records, false),
            Err(ModelError::DuplicateMonth {
                year: 1901,
                month: 4
            })
        );
    }

    #[test]
    fn test_stack_bounds() {
        let records = full_year(1960, 0);
        let frames = stack(&records);

        for (frame, record) in frames.iter().zip(records.iter()) {
            let first = frame.band(Severity::ExtremeDrought).unwrap();
            assert_eq!(first.lower, 0.0);

            for pair in frame.category_bounds.windows(2) {
                let (a, b) = (pair[0].unwrap(), pair[1].unwrap());
                assert!((a.upper - b.lower).abs() < 1e-12);
            }

            let last = frame.band(Severity::ExtremelyMoist).unwrap();
            assert!((last.upper - record.total()).abs() < 1e-9);
        }
    }

    #[test]
    fn test_stack_is_pure() {
        let group = YearGroup::build(1970, full_year(1970, 7), false).unwrap();
        let again = stack(group.records());

        assert_eq!(again, group.stacked_series());
        assert_eq!(stack(group.records()), again);
    }

    #[test]
    fn test_stack_with_missing_value() {
        let mut record = boundary_record(2013, 0);
        record.values[1] = None;
        let frames = stack(&[record]);
        let frame = &frames[0];

        assert_eq!(frame.band(Severity::SevereDrought), None);
        let moderate = frame.band(Severity::ModerateDrought).unwrap();
        assert!((moderate.lower - 0.1).abs() < 1e-12);
        assert!((moderate.upper - 0.36).abs() < 1e-12);
        assert!((frame.top() - 0.8).abs() < 1e-9);
    }

    #[test]
    fn test_resolve_boundary_year() {
        let years = [2013, 2011, 2012];
        assert_eq!(resolve_boundary_year(&years, BoundaryYear::Earliest), Ok(2011));
        assert_eq!(resolve_boundary_year(&years, BoundaryYear::Latest), Ok(2013));
        assert_eq!(resolve_boundary_year(&years, BoundaryYear::Year(2012)), Ok(2012));
        assert_eq!(
            resolve_boundary_year(&years, BoundaryYear::Year(1999)),
            Err(ModelError::UnknownBoundaryYear(1999))
        );
        assert_eq!(
            resolve_boundary_year(&[], BoundaryYear::Earliest),
            Err(ModelError::EmptyDataset)
        );
    }

    #[test]
    fn test_build_model() {
        let options = ModelOptions {
            boundary_year: BoundaryYear::Latest,
            ..Default::default()
        };
        let model = DroughtModel::build(sample_records(), &options).unwrap();

        assert_eq!(model.boundary_year(), 2013);
        assert_eq!(model.years().collect::<Vec<_>>(), vec![2013, 2011, 2012]);
        assert_eq!(model.group(2013).unwrap().records().len(), 2);
        assert_eq!(model.group(2011).unwrap().records().len(), 13);
        assert_eq!(model.max_row(), 0);
    }

    #[test]
    fn test_build_model_earliest_default() {
        let mut records = vec![boundary_record(1895, 0)];
        records.extend(full_year(1896, 0));
        let model = DroughtModel::build(records, &ModelOptions::default()).unwrap();

        assert_eq!(model.boundary_year(), 1895);
        assert!(model.boundary_group().unwrap().is_boundary());
    }

    #[test]
    fn test_incomplete_year_policy() {
        let mut records = sample_records();
        records.retain(|r| !(r.year == 2012 && r.month == 6));

        let reject = ModelOptions {
            boundary_year: BoundaryYear::Latest,
            incomplete_years: IncompletePolicy::Reject,
        };
        assert_eq!(
            DroughtModel::build(records.clone(), &reject),
            Err(ModelError::IncompleteYear {
                year: 2012,
                months: 11
            })
        );

        let skip = ModelOptions {
            incomplete_years: IncompletePolicy::Skip,
            ..reject
        };
        let model = DroughtModel::build(records, &skip).unwrap();
        assert_eq!(model.years().collect::<Vec<_>>(), vec![2013, 2011]);
    }

    #[test]
    fn test_max_row_covers_skipped_years() {
        let mut records = vec![boundary_record(2013, 0)];
        records.extend(full_year(2012, 0));
        let mut partial = full_year(1960, 5);
        partial.truncate(11);
        records.extend(partial);

        let options = ModelOptions {
            boundary_year: BoundaryYear::Latest,
            incomplete_years: IncompletePolicy::Skip,
        };
        let model = DroughtModel::build(records, &options).unwrap();

        assert_eq!(model.years().collect::<Vec<_>>(), vec![2013, 2012]);
        assert_eq!(model.max_row(), 5);
    }

    #[test]
    fn test_year_without_row_has_no_cell() {
        let mut records = sample_records();
        for record in records.iter_mut().filter(|r| r.year == 2011) {
            record.row = None;
        }
        let options = ModelOptions {
            boundary_year: BoundaryYear::Latest,
            ..Default::default()
        };

        let model = DroughtModel::build(records, &options).unwrap();

        assert_eq!(model.year_to_cell(2011), None);
        assert_eq!(model.group(2011).unwrap().position(), None);
        assert!(model.year_to_cell(2012).is_some());
    }

    #[test]
    fn test_overfull_months_counted() {
        let overfull = RawRecord::new(2013, 1, 0, [Some(0.9); CATEGORY_COUNT]);
        let mut records = vec![overfull];
        records.extend(full_year(2012, 0));
        let options = ModelOptions {
            boundary_year: BoundaryYear::Latest,
            ..Default::default()
        };

        let model = DroughtModel::build(records, &options).unwrap();

        assert_eq!(model.overfull_months(), 1);
        let top = model.group(2013).unwrap().stacked_series()[0].top();
        assert!((top - 6.3).abs() < 1e-9);
    }

    #[test]
    fn test_cell_collision_rejected() {
        let mut records = vec![boundary_record(2013, 0)];
        records.extend(full_year(2003, 0));
        let options = ModelOptions {
            boundary_year: BoundaryYear::Latest,
            ..Default::default()
        };

        assert!(matches!(
            DroughtModel::build(records, &options),
            Err(ModelError::CellCollision { col: 3, row: 0, .. })
        ));
    }
}
