//! Per-year drought summaries
//!
//! Aggregates the dry share of each year's real months for tabular output.

use crate::model::{DroughtModel, YearGroup};
use serde::Serialize;

/// Dry-share statistics of one year
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct YearSummary {
    pub year: i32,
    pub months: usize,
    /// Mean dry fraction over months with complete dry data
    pub mean_dry: Option<f64>,
    /// Month with the highest dry fraction
    pub peak_month: Option<u32>,
    pub peak_dry: Option<f64>,
    /// Months whose dry fraction could not be computed
    pub missing_months: usize,
}

impl YearSummary {
    pub fn from_group(group: &YearGroup) -> Self {
        let dry: Vec<(u32, f64)> = group
            .real_records()
            .iter()
            .filter_map(|r| r.dry_fraction().map(|f| (r.month, f)))
            .collect();

        let mean_dry = if dry.is_empty() {
            None
        } else {
            Some(dry.iter().map(|(_, f)| f).sum::<f64>() / dry.len() as f64)
        };

        let peak = dry
            .iter()
            .copied()
            .fold(None, |best: Option<(u32, f64)>, (month, f)| match best {
                Some((_, b)) if b >= f => best,
                _ => Some((month, f)),
            });

        Self {
            year: group.year(),
            months: group.real_records().len(),
            mean_dry,
            peak_month: peak.map(|(m, _)| m),
            peak_dry: peak.map(|(_, f)| f),
            missing_months: group.real_records().len() - dry.len(),
        }
    }
}

/// Summaries of all years in model order
pub fn summarize(model: &DroughtModel) -> Vec<YearSummary> {
    model.groups().iter().map(YearSummary::from_group).collect()
}
