use std::collections::BTreeMap;

use once_cell::sync::Lazy;
use regex::Regex;

/// Metrics for a single calendar day of one hotel.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DayMetrics {
    pub sales: u32,
    pub allotment: u32,
}

/// Extracted report figures keyed by `"D/M/YYYY"` in the report year, with
/// day and month exactly as the report printed them.
pub type MetricsByDate = BTreeMap<String, DayMetrics>;

/// One rendered availability report: header cell text and body cell text,
/// row by row, in document order.
#[derive(Debug, Clone, Default)]
pub struct ReportTable {
    pub header_rows: Vec<Vec<String>>,
    pub body_rows: Vec<Vec<String>>,
}

/// Short `day-month` column labels, e.g. "1-3" inside "Sun 1-3".
static DAY_MONTH: Lazy<Regex> = Lazy::new(|| Regex::new(r"(\d{1,2})-(\d{1,2})").unwrap());

/// Converts one rendered report into per-date metrics.
///
/// Column dates come from the first header row with more than two cells,
/// reading labels from the second cell onward. The metric rows are the body
/// rows labeled `TOTAL SALES` and `TOTAL ALLOTMENT` (case-insensitive,
/// substring match); their cells pair with the date labels purely by index.
/// The report emits its columns in lockstep, so a missing date column would
/// silently shift every figure after it; alignment is positional by design.
pub fn extract_day_metrics(table: &ReportTable, report_year: i32) -> MetricsByDate {
    let dates = header_date_labels(&table.header_rows);
    let sales = metric_row(&table.body_rows, "TOTAL SALES");
    let allotment = metric_row(&table.body_rows, "TOTAL ALLOTMENT");

    let mut metrics = MetricsByDate::new();
    for (i, label) in dates.iter().enumerate() {
        let Some((day, month)) = label.split_once('-') else {
            continue;
        };
        let key = format!("{}/{}/{}", day, month, report_year);
        metrics.insert(
            key,
            DayMetrics {
                sales: sales.get(i).copied().unwrap_or(0),
                allotment: allotment.get(i).copied().unwrap_or(0),
            },
        );
    }

    metrics
}

/// Pulls the short date labels out of the header grid. The first cell of the
/// header row is the row label, so labels start at the second cell. Scanning
/// stops at the first row that yields any date label.
fn header_date_labels(header_rows: &[Vec<String>]) -> Vec<String> {
    let mut labels = Vec::new();

    for row in header_rows {
        if row.len() <= 2 {
            continue;
        }
        for cell in &row[1..] {
            if let Some(found) = DAY_MONTH.find(cell.trim()) {
                labels.push(found.as_str().to_string());
            }
        }
        if !labels.is_empty() {
            break;
        }
    }

    labels
}

/// Reads the numeric cells of the body row whose first cell contains `label`
/// (upper-cased). Non-numeric cells read as 0. When several rows match, the
/// last one wins.
fn metric_row(body_rows: &[Vec<String>], label: &str) -> Vec<u32> {
    let mut values = Vec::new();

    for row in body_rows {
        if row.len() < 2 {
            continue;
        }
        if row[0].trim().to_uppercase().contains(label) {
            values = row[1..]
                .iter()
                .map(|cell| cell.trim().parse::<u32>().unwrap_or(0))
                .collect();
        }
    }

    values
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(cells: &[&str]) -> Vec<String> {
        cells.iter().map(|c| c.to_string()).collect()
    }

    fn sample_table() -> ReportTable {
        ReportTable {
            header_rows: vec![row(&["Room Type", "Sun 1-3", "Mon 2-3"])],
            body_rows: vec![
                row(&["Deluxe", "2", "3"]),
                row(&["Total Sales", "5", "7"]),
                row(&["Total Allotment", "10", "12"]),
            ],
        }
    }

    #[test]
    fn test_basic_extraction() {
        let metrics = extract_day_metrics(&sample_table(), 2026);
        assert_eq!(metrics.len(), 2);
        assert_eq!(
            metrics.get("1/3/2026"),
            Some(&DayMetrics {
                sales: 5,
                allotment: 10
            })
        );
        assert_eq!(
            metrics.get("2/3/2026"),
            Some(&DayMetrics {
                sales: 7,
                allotment: 12
            })
        );
    }

    #[test]
    fn test_narrow_header_rows_skipped() {
        let table = ReportTable {
            header_rows: vec![
                row(&["Availability", "March"]),
                row(&["Room Type", "1-3", "2-3", "3-3"]),
            ],
            body_rows: vec![row(&["TOTAL SALES", "1", "2", "3"])],
        };
        let metrics = extract_day_metrics(&table, 2026);
        assert_eq!(metrics.len(), 3);
        assert_eq!(metrics.get("3/3/2026").unwrap().sales, 3);
    }

    #[test]
    fn test_header_scan_stops_after_first_dated_row() {
        let table = ReportTable {
            header_rows: vec![
                row(&["Room Type", "1-3", "2-3"]),
                row(&["Room Type", "9-9", "10-9"]),
            ],
            body_rows: vec![row(&["TOTAL SALES", "5", "7"])],
        };
        let metrics = extract_day_metrics(&table, 2026);
        assert_eq!(metrics.len(), 2);
        assert!(metrics.contains_key("1/3/2026"));
        assert!(!metrics.contains_key("9/9/2026"));
    }

    #[test]
    fn test_missing_metric_rows_default_to_zero() {
        let table = ReportTable {
            header_rows: vec![row(&["Room Type", "1-3", "2-3"])],
            body_rows: vec![row(&["Total Sales", "5"])],
        };
        let metrics = extract_day_metrics(&table, 2026);
        assert_eq!(
            metrics.get("2/3/2026"),
            Some(&DayMetrics {
                sales: 0,
                allotment: 0
            })
        );
        assert_eq!(metrics.get("1/3/2026").unwrap().sales, 5);
    }

    #[test]
    fn test_non_numeric_cells_read_as_zero() {
        let table = ReportTable {
            header_rows: vec![row(&["Room Type", "1-3", "2-3"])],
            body_rows: vec![
                row(&["TOTAL SALES", "-", "7"]),
                row(&["TOTAL ALLOTMENT", "10", "n/a"]),
            ],
        };
        let metrics = extract_day_metrics(&table, 2026);
        assert_eq!(
            metrics.get("1/3/2026"),
            Some(&DayMetrics {
                sales: 0,
                allotment: 10
            })
        );
        assert_eq!(
            metrics.get("2/3/2026"),
            Some(&DayMetrics {
                sales: 7,
                allotment: 0
            })
        );
    }

    #[test]
    fn test_label_match_is_case_insensitive_substring() {
        let table = ReportTable {
            header_rows: vec![row(&["Room Type", "1-3"])],
            body_rows: vec![row(&["  total sales (rooms)", "4"])],
        };
        // Header row has only two cells, so no dates and no output.
        assert!(extract_day_metrics(&table, 2026).is_empty());

        let table = ReportTable {
            header_rows: vec![row(&["Room Type", "1-3", "2-3"])],
            body_rows: vec![row(&["  total sales (rooms)", "4", "6"])],
        };
        let metrics = extract_day_metrics(&table, 2026);
        assert_eq!(metrics.get("1/3/2026").unwrap().sales, 4);
    }

    #[test]
    fn test_positional_alignment_shifts_on_dropped_column() {
        // A header missing one date while the metric row still carries the
        // cell pairs figures with the wrong dates. Pinned, not fixed.
        let table = ReportTable {
            header_rows: vec![row(&["Room Type", "1-3", "3-3"])],
            body_rows: vec![row(&["TOTAL SALES", "5", "7", "9"])],
        };
        let metrics = extract_day_metrics(&table, 2026);
        assert_eq!(metrics.get("3/3/2026").unwrap().sales, 7);
    }
}
