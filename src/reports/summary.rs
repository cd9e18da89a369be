use tracing::debug;

use crate::normalize::{normalize_metrics, MetricRow};
use crate::records::RawRecord;

/// Number of metric cards shown at the top of the summary
pub const SUMMARY_CARD_LIMIT: usize = 6;

/// Number of metrics plotted in the comparison chart
pub const SUMMARY_CHART_LIMIT: usize = 10;

/// Summary view: headline metrics in input order
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SummaryReport {
    pub rows: Vec<MetricRow>,
}

impl SummaryReport {
    /// Card view: the first rows in input order, never re-sorted by value
    pub fn cards(&self) -> &[MetricRow] {
        &self.rows[..self.rows.len().min(SUMMARY_CARD_LIMIT)]
    }

    /// Rows plotted in the comparison chart
    pub fn chart_rows(&self) -> &[MetricRow] {
        &self.rows[..self.rows.len().min(SUMMARY_CHART_LIMIT)]
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

pub fn build_summary(records: &[RawRecord]) -> SummaryReport {
    let rows = normalize_metrics(records);
    debug!("Built summary with {} metrics", rows.len());
    SummaryReport { rows }
}
