use super::totals::{CategoryTotals, TOTAL};
use super::Analyzer;
use crate::Result;
use crate::classify::ResourceClassifier;
use crate::resource::{ResourceRecord, ResourceRecordSet};
use serde::Serialize;

/// Byte statistics for one page load
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DocumentStats {
    pub total: CategoryTotals,
    /// One entry per classifier category, in classifier order
    pub categories: Vec<CategoryTotals>,
    /// Encoded bytes of resources outside every category
    uncategorized_encoded_bytes: u64,
}

impl DocumentStats {
    pub fn new(classifier: &ResourceClassifier) -> Self {
        Self {
            total: CategoryTotals::new(TOTAL),
            categories: classifier.category_names().map(CategoryTotals::new).collect(),
            uncategorized_encoded_bytes: 0,
        }
    }

    pub fn category(&self, name: &str) -> Option<&CategoryTotals> {
        self.categories.iter().find(|c| c.name == name)
    }

    pub fn uncategorized_encoded_bytes(&self) -> u64 {
        self.uncategorized_encoded_bytes
    }
}

/// Accumulates resource records into a fresh `DocumentStats`
pub struct StatsAggregator<'a> {
    classifier: &'a ResourceClassifier,
    stats: DocumentStats,
}

impl<'a> StatsAggregator<'a> {
    pub fn new(classifier: &'a ResourceClassifier) -> Self {
        Self {
            classifier,
            stats: DocumentStats::new(classifier),
        }
    }

    /// Count a record in the total and in every category it belongs to
    pub fn add(&mut self, record: &ResourceRecord) {
        self.stats.total.add(record);

        let mut matched = false;
        for (rule, totals) in self
            .classifier
            .rules()
            .iter()
            .zip(self.stats.categories.iter_mut())
        {
            if rule.matches(&record.mime_type) {
                totals.add(record);
                matched = true;
            }
        }

        if !matched {
            self.stats.uncategorized_encoded_bytes = self
                .stats
                .uncategorized_encoded_bytes
                .saturating_add(record.encoded_bytes);
        }
    }

    pub fn stats(&self) -> &DocumentStats {
        &self.stats
    }

    pub fn finish(self) -> DocumentStats {
        self.stats
    }
}

/// Aggregates a page's resource records by category
pub struct PageWeightAnalyzer<'a> {
    classifier: &'a ResourceClassifier,
}

impl<'a> PageWeightAnalyzer<'a> {
    pub fn new(classifier: &'a ResourceClassifier) -> Self {
        Self { classifier }
    }
}

impl Analyzer for PageWeightAnalyzer<'_> {
    type Output = DocumentStats;

    fn analyze(&self, records: &ResourceRecordSet) -> Result<Self::Output> {
        tracing::debug!("Aggregating {} resource records", records.len());

        let mut aggregator = StatsAggregator::new(self.classifier);
        for record in records {
            aggregator.add(record);
        }
        let stats = aggregator.finish();

        tracing::info!(
            "Page weight: {} bytes transferred across {} resources",
            stats.total.encoded_bytes(),
            stats.total.count()
        );

        Ok(stats)
    }
}
