use log::{debug, info, warn};

use crate::chunking::chunk_range;
use crate::config::SyncConfig;
use crate::error::Result;
use crate::ledger::HotelRange;
use crate::reconcile::{merge_metrics, plan_writes};
use crate::report::{extract_day_metrics, MetricsByDate};
use crate::sheets::LedgerStore;
use crate::source::AvailabilitySource;

/// Per-hotel outcome of one run. Produced even under partial failure.
#[derive(Debug, Default)]
pub struct SyncSummary {
    /// Tabs updated, with the number of ledger rows written.
    pub updated: Vec<(String, usize)>,
    /// Tabs skipped, with the reason.
    pub skipped: Vec<(String, String)>,
}

impl SyncSummary {
    pub fn rows_written(&self) -> usize {
        self.updated.iter().map(|(_, rows)| rows).sum()
    }

    fn skip(&mut self, tab: &str, reason: impl Into<String>) {
        self.skipped.push((tab.to_string(), reason.into()));
    }
}

/// One full reconciliation pass: read every mapped tab's date range, extract
/// the extranet figures chunk by chunk, then write each tab's cells as one
/// batched update.
///
/// Hotels are processed in mapping-declaration order, strictly sequentially;
/// a failure in one hotel's extraction or write is logged and skips that
/// hotel only. Configuration and login failures abort the run.
pub fn run_sync<S, L>(source: &mut S, store: &mut L, config: &SyncConfig) -> Result<SyncSummary>
where
    S: AvailabilitySource,
    L: LedgerStore,
{
    let mut summary = SyncSummary::default();

    info!("Reading ledger tabs for date ranges...");
    let ranges = read_hotel_ranges(store, config, &mut summary)?;
    if ranges.is_empty() {
        warn!("No ledger tabs with usable date ranges");
        return Ok(summary);
    }

    info!("Date ranges found for {} hotels:", ranges.len());
    for range in &ranges {
        info!(
            "  {}: {} to {} ({} days)",
            range.tab_name,
            range.first_date.format("%d/%m/%Y"),
            range.last_date.format("%d/%m/%Y"),
            range.num_days()
        );
    }

    source.authenticate(&config.username, &config.password)?;
    source.open_report_view()?;

    let mut extracted: Vec<(HotelRange, MetricsByDate)> = Vec::new();
    for range in ranges {
        match extract_hotel(source, &range, config.report_year) {
            Ok(metrics) => {
                info!(
                    "  {}: extracted {} dates",
                    range.tab_name,
                    metrics.len()
                );
                for (key, values) in metrics.iter().take(5) {
                    debug!("    {} = {:?}", key, values);
                }
                extracted.push((range, metrics));
            }
            Err(err) => {
                warn!("Skipping hotel '{}': {}", range.hotel_name, err);
                summary.skip(&range.tab_name, format!("extraction failed: {}", err));
            }
        }
    }

    info!("Updating spreadsheet...");
    for (range, metrics) in extracted {
        let writes = plan_writes(&range, &metrics, &config.layout);
        if writes.is_empty() {
            warn!("No cells to update for '{}'", range.tab_name);
            summary.skip(&range.tab_name, "no matching dates");
            continue;
        }

        let worksheet = match store.resolve_worksheet(&range.tab_name) {
            Ok(worksheet) => worksheet,
            Err(err) => {
                warn!("Tab '{}' not found - skipping: {}", range.tab_name, err);
                summary.skip(&range.tab_name, "worksheet not found");
                continue;
            }
        };

        // Two writes per matched ledger row.
        let rows = writes.len() / 2;
        match store.batch_update(&worksheet, &writes) {
            Ok(()) => {
                info!("  {}: updated {} rows", range.tab_name, rows);
                summary.updated.push((range.tab_name, rows));
            }
            Err(err) => {
                warn!("Update failed for '{}': {}", range.tab_name, err);
                summary.skip(&range.tab_name, format!("write rejected: {}", err));
            }
        }
    }

    Ok(summary)
}

/// Read pass over the spreadsheet: one [`HotelRange`] per mapped tab that
/// resolves and carries dates. Tabs that don't are recorded as skips.
fn read_hotel_ranges<L: LedgerStore>(
    store: &mut L,
    config: &SyncConfig,
    summary: &mut SyncSummary,
) -> Result<Vec<HotelRange>> {
    let title = store.spreadsheet_title()?;
    debug!("Connected to spreadsheet '{}'", title);

    let mut ranges = Vec::new();
    for (tab_name, hotel_name) in &config.hotel_mapping {
        let worksheet = match store.resolve_worksheet(tab_name) {
            Ok(worksheet) => worksheet,
            Err(err) => {
                warn!("Tab '{}' not found - skipping: {}", tab_name, err);
                summary.skip(tab_name, "worksheet not found");
                continue;
            }
        };

        let column = store.col_values(&worksheet, config.layout.date_column)?;
        match HotelRange::from_date_column(tab_name, hotel_name, &column, &config.layout) {
            Some(range) => ranges.push(range),
            None => {
                info!("  {}: no data rows found - skipping", tab_name);
                summary.skip(tab_name, "no data rows");
            }
        }
    }

    Ok(ranges)
}

/// Queries the extranet chunk by chunk over the hotel's range and merges the
/// extracted metrics. Any chunk failure abandons the hotel's remaining
/// chunks.
fn extract_hotel<S: AvailabilitySource>(
    source: &mut S,
    range: &HotelRange,
    report_year: i32,
) -> Result<MetricsByDate> {
    let chunks = chunk_range(range.first_date, range.last_date);
    info!(
        "Processing hotel: {} -> {} ({} chunk{})",
        range.tab_name,
        range.hotel_name,
        chunks.len(),
        if chunks.len() == 1 { "" } else { "s" }
    );

    let mut metrics = MetricsByDate::new();
    for (i, chunk) in chunks.iter().enumerate() {
        debug!(
            "  chunk {}: {} to {} ({} days)",
            i + 1,
            chunk.start.format("%d/%m/%Y"),
            chunk.end.format("%d/%m/%Y"),
            chunk.num_days()
        );

        source.set_window(chunk.start)?;
        source.select_hotel(&range.hotel_name)?;
        let table = source.fetch_report()?;

        let chunk_metrics = extract_day_metrics(&table, report_year);
        debug!("  chunk {}: {} dates", i + 1, chunk_metrics.len());
        merge_metrics(&mut metrics, chunk_metrics);
    }

    Ok(metrics)
}
