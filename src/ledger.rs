use chrono::NaiveDate;

use crate::config::LedgerLayout;
use crate::dates::parse_ledger_date;

/// One dated row of a ledger tab. Rows are 1-based and stable for the tab's
/// lifetime; the date carries no time component.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LedgerDate {
    pub row: u32,
    pub date: NaiveDate,
}

/// The contracted date block of one hotel tab, as read from its date column.
#[derive(Debug, Clone)]
pub struct HotelRange {
    /// Spreadsheet tab the block was read from.
    pub tab_name: String,
    /// Hotel name the extranet knows this tab as.
    pub hotel_name: String,
    /// Non-empty, strictly increasing by calendar date.
    pub dates: Vec<LedgerDate>,
    pub first_date: NaiveDate,
    pub last_date: NaiveDate,
}

impl HotelRange {
    /// Derives the contiguous date block from a tab's raw date column.
    ///
    /// Returns `None` when the column holds no parseable dates; such tabs are
    /// excluded from the run entirely.
    ///
    /// Precondition: the ledger's real date range contains no embedded blank
    /// rows. The first blank (or unparseable) cell after dates have started
    /// ends the block.
    pub fn from_date_column(
        tab_name: &str,
        hotel_name: &str,
        column: &[String],
        layout: &LedgerLayout,
    ) -> Option<Self> {
        let dates = scan_date_block(column, layout);
        let first = dates.first()?;
        let last = dates.last()?;
        let (first_date, last_date) = (first.date, last.date);

        Some(Self {
            tab_name: tab_name.to_string(),
            hotel_name: hotel_name.to_string(),
            dates,
            first_date,
            last_date,
        })
    }

    pub fn num_days(&self) -> usize {
        self.dates.len()
    }
}

/// Scans the date column from the layout's start row to the end.
///
/// Blanks and header text before the first date are skipped; the first blank
/// or non-date cell after dates have started terminates the scan.
fn scan_date_block(column: &[String], layout: &LedgerLayout) -> Vec<LedgerDate> {
    let offset = (layout.scan_start_row.saturating_sub(1)) as usize;
    let mut dates = Vec::new();
    let mut found_dates = false;

    for (idx, cell) in column.iter().enumerate().skip(offset) {
        let value = cell.trim();

        if value.is_empty() {
            if found_dates {
                break;
            }
            continue;
        }

        match parse_ledger_date(value) {
            Some(date) => {
                found_dates = true;
                dates.push(LedgerDate {
                    row: idx as u32 + 1,
                    date,
                });
            }
            None if found_dates => break,
            None => continue,
        }
    }

    dates
}

#[cfg(test)]
mod tests {
    use super::*;

    fn column(cells: &[&str]) -> Vec<String> {
        cells.iter().map(|c| c.to_string()).collect()
    }

    fn padded_column(cells: &[&str]) -> Vec<String> {
        // 14 filler rows so real content starts at the default scan row.
        let mut col = vec![String::new(); 14];
        col.extend(cells.iter().map(|c| c.to_string()));
        col
    }

    #[test]
    fn test_blank_terminates_block() {
        let col = padded_column(&["", "", "01-Mar-26", "02-Mar-26", "", "junk"]);
        let range =
            HotelRange::from_date_column("TAB", "HOTEL", &col, &LedgerLayout::default()).unwrap();

        assert_eq!(range.num_days(), 2);
        assert_eq!(range.dates[0].row, 17);
        assert_eq!(range.dates[1].row, 18);
        assert_eq!(
            range.first_date,
            NaiveDate::from_ymd_opt(2026, 3, 1).unwrap()
        );
        assert_eq!(range.last_date, NaiveDate::from_ymd_opt(2026, 3, 2).unwrap());
    }

    #[test]
    fn test_header_text_skipped_before_dates() {
        let col = padded_column(&["DATE", "", "01-Mar-26", "02-Mar-26"]);
        let range =
            HotelRange::from_date_column("TAB", "HOTEL", &col, &LedgerLayout::default()).unwrap();
        assert_eq!(range.num_days(), 2);
        assert_eq!(range.dates[0].row, 17);
    }

    #[test]
    fn test_non_date_terminates_after_dates() {
        let col = padded_column(&["01-Mar-26", "TOTAL", "02-Mar-26"]);
        let range =
            HotelRange::from_date_column("TAB", "HOTEL", &col, &LedgerLayout::default()).unwrap();
        assert_eq!(range.num_days(), 1);
    }

    #[test]
    fn test_rows_before_scan_start_ignored() {
        let mut col = column(&["01-Jan-26"]);
        col.extend(vec![String::new(); 13]);
        col.push("01-Mar-26".to_string());
        let range =
            HotelRange::from_date_column("TAB", "HOTEL", &col, &LedgerLayout::default()).unwrap();
        assert_eq!(range.num_days(), 1);
        assert_eq!(range.dates[0].row, 15);
        assert_eq!(
            range.first_date,
            NaiveDate::from_ymd_opt(2026, 3, 1).unwrap()
        );
    }

    #[test]
    fn test_empty_tab_excluded() {
        let col = padded_column(&["", "", "notes", ""]);
        assert!(
            HotelRange::from_date_column("TAB", "HOTEL", &col, &LedgerLayout::default()).is_none()
        );
    }

    #[test]
    fn test_short_column_excluded() {
        let col = column(&["01-Mar-26"]);
        assert!(
            HotelRange::from_date_column("TAB", "HOTEL", &col, &LedgerLayout::default()).is_none()
        );
    }
}
