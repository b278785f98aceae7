use chrono::Datelike;

use crate::config::LedgerLayout;
use crate::ledger::HotelRange;
use crate::report::MetricsByDate;

/// A single pending cell update, 1-based row and column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellWrite {
    pub row: u32,
    pub column: u32,
    pub value: u32,
}

/// Folds one chunk's extraction into the hotel's accumulated metrics.
///
/// Chunk partitioning keeps keys disjoint across chunks; if a key does recur,
/// the later chunk wins.
pub fn merge_metrics(accumulated: &mut MetricsByDate, chunk: MetricsByDate) {
    accumulated.extend(chunk);
}

/// Matches every ledger row against the extracted metrics and produces the
/// cell writes for the tab.
///
/// Matching compares day and month only: the extranet always reports in its
/// own current year, so the ledger's contracted year is ignored. The first
/// extracted entry that matches a row wins; rows with no match produce no
/// writes.
pub fn plan_writes(
    range: &HotelRange,
    metrics: &MetricsByDate,
    layout: &LedgerLayout,
) -> Vec<CellWrite> {
    let mut writes = Vec::new();

    for ledger_date in &range.dates {
        let matched = metrics.iter().find_map(|(key, values)| {
            let (day, month) = parse_date_key(key)?;
            (ledger_date.date.day() == day && ledger_date.date.month() == month).then_some(values)
        });

        if let Some(values) = matched {
            writes.push(CellWrite {
                row: ledger_date.row,
                column: layout.allotment_column,
                value: values.allotment,
            });
            writes.push(CellWrite {
                row: ledger_date.row,
                column: layout.sales_column,
                value: values.sales,
            });
        }
    }

    writes
}

/// Reads the day and month out of a `"D/M/YYYY"` metrics key.
fn parse_date_key(key: &str) -> Option<(u32, u32)> {
    let mut parts = key.split('/');
    let day = parts.next()?.parse().ok()?;
    let month = parts.next()?.parse().ok()?;
    parts.next()?;
    if parts.next().is_some() {
        return None;
    }
    Some((day, month))
}
