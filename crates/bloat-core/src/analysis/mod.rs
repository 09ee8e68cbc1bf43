mod document;
mod totals;

pub use document::{DocumentStats, PageWeightAnalyzer, StatsAggregator};
pub use totals::{ByteTotals, CategoryTotals, Percentages, TOTAL};

use crate::resource::ResourceRecordSet;

pub trait Analyzer {
    type Output;

    fn analyze(&self, records: &ResourceRecordSet) -> crate::Result<Self::Output>;
}
