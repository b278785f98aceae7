use std::path::Path;
use std::time::Duration;

use chrono::NaiveDate;
use log::{debug, info};
use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::blocking::Client;

use crate::error::{Result, SyncError};
use crate::report::ReportTable;
use crate::source::AvailabilitySource;

const LOGIN_PATH: &str = "login";
const REPORT_VIEW_PATH: &str = "availability/consolidated";

/// Extranet session over plain blocking HTTP.
///
/// Holds one logged-in cookie session. The pending report window and hotel
/// are recorded by [`AvailabilitySource::set_window`] and
/// [`AvailabilitySource::select_hotel`] and folded into the report query on
/// fetch. The last fetched page body is kept for diagnostic snapshots.
pub struct ExtranetClient {
    client: Client,
    base_url: String,
    window_start: Option<NaiveDate>,
    hotel: Option<String>,
    last_page: Option<String>,
}

impl ExtranetClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .cookie_store(true)
            .timeout(timeout)
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            window_start: None,
            hotel: None,
            last_page: None,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    /// Writes the last fetched page body to `path`. Best-effort diagnostic
    /// for unhandled failures; a session that never fetched writes nothing.
    pub fn save_snapshot(&self, path: &Path) -> Result<()> {
        match &self.last_page {
            Some(body) => {
                std::fs::write(path, body)?;
                info!("Saved extranet page snapshot to {}", path.display());
            }
            None => debug!("No extranet page to snapshot"),
        }
        Ok(())
    }
}

impl AvailabilitySource for ExtranetClient {
    fn authenticate(&mut self, username: &str, password: &str) -> Result<()> {
        let response = self
            .client
            .post(self.url(LOGIN_PATH))
            .form(&[("username", username), ("password", password)])
            .send()?;

        let status = response.status();
        if !status.is_success() {
            return Err(SyncError::SourceQuery(format!(
                "login rejected with status {}",
                status
            )));
        }

        info!("Logged in to extranet as {}", username);
        Ok(())
    }

    fn open_report_view(&mut self) -> Result<()> {
        let response = self.client.get(self.url(REPORT_VIEW_PATH)).send()?;
        let status = response.status();
        if !status.is_success() {
            return Err(SyncError::SourceQuery(format!(
                "report view unavailable, status {}",
                status
            )));
        }

        debug!("Opened consolidated availability view");
        Ok(())
    }

    fn set_window(&mut self, start: NaiveDate) -> Result<()> {
        self.window_start = Some(start);
        Ok(())
    }

    fn select_hotel(&mut self, name: &str) -> Result<()> {
        self.hotel = Some(name.to_string());
        Ok(())
    }

    fn fetch_report(&mut self) -> Result<ReportTable> {
        let start = self
            .window_start
            .ok_or_else(|| SyncError::SourceQuery("no report window set".to_string()))?;
        let hotel = self
            .hotel
            .clone()
            .ok_or_else(|| SyncError::SourceQuery("no hotel selected".to_string()))?;

        let response = self
            .client
            .get(self.url(REPORT_VIEW_PATH))
            .query(&[
                ("from", start.format("%d/%m/%Y").to_string()),
                ("hotel", hotel.clone()),
            ])
            .send()?;

        let status = response.status();
        if !status.is_success() {
            return Err(SyncError::SourceQuery(format!(
                "report fetch for '{}' failed with status {}",
                hotel, status
            )));
        }

        let body = response.text()?;
        self.last_page = Some(body.clone());

        parse_report_table(&body).ok_or_else(|| {
            SyncError::SourceQuery(format!("report page for '{}' contained no table", hotel))
        })
    }
}

static TABLE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?is)<table[^>]*>(.*?)</table>").unwrap());
static ROW: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?is)<tr[^>]*>(.*?)</tr>").unwrap());
static CELL: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?is)<(th|td)[^>]*>(.*?)</(?:th|td)>").unwrap());
static TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)<[^>]*>").unwrap());

/// Scans the first `<table>` of the page into header and body cell text.
///
/// Header rows collect the `<th>` cells of each row, body rows the `<td>`
/// cells; a row carrying both kinds contributes to both grids. Tag case,
/// attribute noise and entity escapes are tolerated. Returns `None` when the
/// page holds no table.
pub fn parse_report_table(html: &str) -> Option<ReportTable> {
    let table = TABLE.captures(html)?.get(1)?.as_str();

    let mut report = ReportTable::default();
    for row in ROW.captures_iter(table) {
        let mut header_cells = Vec::new();
        let mut body_cells = Vec::new();

        for cell in CELL.captures_iter(row.get(1).map_or("", |m| m.as_str())) {
            let text = clean_cell_text(cell.get(2).map_or("", |m| m.as_str()));
            if cell.get(1).map_or("", |m| m.as_str()).eq_ignore_ascii_case("th") {
                header_cells.push(text);
            } else {
                body_cells.push(text);
            }
        }

        if !header_cells.is_empty() {
            report.header_rows.push(header_cells);
        }
        if !body_cells.is_empty() {
            report.body_rows.push(body_cells);
        }
    }

    Some(report)
}

/// Strips markup and normalizes entities and whitespace in one cell.
fn clean_cell_text(inner: &str) -> String {
    let stripped = TAG.replace_all(inner, " ");
    let decoded = stripped
        .replace("&nbsp;", " ")
        .replace("&amp;", "&")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'");
    decoded.split_whitespace().collect::<Vec<_>>().join(" ")
}
