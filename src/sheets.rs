use std::thread;
use std::time::{Duration, Instant};

use log::{debug, info};
use reqwest::blocking::Client;
use serde::Deserialize;
use serde_json::json;

use crate::error::{Result, SyncError};
use crate::reconcile::CellWrite;

const SHEETS_BASE_URL: &str = "https://sheets.googleapis.com/v4/spreadsheets";

/// Spreadsheet operations the sync needs. One implementation talks to the
/// Google Sheets API; tests substitute an in-memory ledger.
pub trait LedgerStore {
    fn spreadsheet_title(&mut self) -> Result<String>;

    /// Resolves a tab name to the worksheet's actual title, tolerating the
    /// whitespace-trimmed alternate of the configured name.
    fn resolve_worksheet(&mut self, name: &str) -> Result<String>;

    /// Reads an entire 1-based column of a worksheet, top to bottom.
    fn col_values(&mut self, tab: &str, column: u32) -> Result<Vec<String>>;

    /// Applies all writes for one worksheet as a single batched update.
    fn batch_update(&mut self, tab: &str, writes: &[CellWrite]) -> Result<()>;
}

/// Google Sheets v4 client using a pre-authorized bearer token.
///
/// The API is a shared rate-limited resource; successive reads are paced to
/// keep at least `read_interval` apart. Worksheet titles are fetched once
/// from the spreadsheet metadata and cached for the client's lifetime.
pub struct SheetsClient {
    client: Client,
    spreadsheet_id: String,
    token: String,
    read_interval: Duration,
    last_read: Option<Instant>,
    metadata: Option<SpreadsheetMeta>,
}

#[derive(Debug, Deserialize)]
struct SpreadsheetMeta {
    properties: SpreadsheetProperties,
    #[serde(default)]
    sheets: Vec<SheetEntry>,
}

#[derive(Debug, Deserialize)]
struct SpreadsheetProperties {
    title: String,
}

#[derive(Debug, Deserialize)]
struct SheetEntry {
    properties: SheetTabProperties,
}

#[derive(Debug, Deserialize)]
struct SheetTabProperties {
    title: String,
}

#[derive(Debug, Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Vec<Vec<String>>,
}

impl SheetsClient {
    pub fn new(spreadsheet_id: &str, token: &str, read_interval: Duration) -> Result<Self> {
        Ok(Self {
            client: Client::builder().build()?,
            spreadsheet_id: spreadsheet_id.to_string(),
            token: token.to_string(),
            read_interval,
            last_read: None,
            metadata: None,
        })
    }

    fn pace_reads(&mut self) {
        if let Some(last) = self.last_read {
            let elapsed = last.elapsed();
            if elapsed < self.read_interval {
                thread::sleep(self.read_interval - elapsed);
            }
        }
        self.last_read = Some(Instant::now());
    }

    fn load_metadata(&mut self) -> Result<&SpreadsheetMeta> {
        if self.metadata.is_none() {
            let url = format!(
                "{}/{}?fields=properties.title,sheets.properties.title",
                SHEETS_BASE_URL, self.spreadsheet_id
            );
            let response = self.client.get(&url).bearer_auth(&self.token).send()?;
            let status = response.status();
            if !status.is_success() {
                return Err(SyncError::SheetRead(format!(
                    "spreadsheet metadata fetch failed with status {}",
                    status
                )));
            }

            let meta: SpreadsheetMeta = serde_json::from_str(&response.text()?)?;
            info!("Connected to spreadsheet: {}", meta.properties.title);
            self.metadata = Some(meta);
        }

        Ok(self.metadata.as_ref().unwrap())
    }
}

impl LedgerStore for SheetsClient {
    fn spreadsheet_title(&mut self) -> Result<String> {
        Ok(self.load_metadata()?.properties.title.clone())
    }

    fn resolve_worksheet(&mut self, name: &str) -> Result<String> {
        let meta = self.load_metadata()?;
        let found = meta
            .sheets
            .iter()
            .find(|sheet| sheet.properties.title == name)
            .or_else(|| {
                meta.sheets
                    .iter()
                    .find(|sheet| sheet.properties.title == name.trim())
            });

        match found {
            Some(sheet) => Ok(sheet.properties.title.clone()),
            None => Err(SyncError::WorksheetNotFound(name.to_string())),
        }
    }

    fn col_values(&mut self, tab: &str, column: u32) -> Result<Vec<String>> {
        self.pace_reads();

        let letter = column_letter(column);
        let range = format!("{}!{}:{}", quote_tab(tab), letter, letter);
        let url = format!(
            "{}/{}/values/{}?majorDimension=COLUMNS",
            SHEETS_BASE_URL,
            self.spreadsheet_id,
            urlencoding::encode(&range)
        );

        let response = self.client.get(&url).bearer_auth(&self.token).send()?;
        let status = response.status();
        if !status.is_success() {
            return Err(SyncError::SheetRead(format!(
                "column read for '{}' failed with status {}",
                tab, status
            )));
        }

        let body: ValueRange = serde_json::from_str(&response.text()?)?;
        Ok(body.values.into_iter().next().unwrap_or_default())
    }

    fn batch_update(&mut self, tab: &str, writes: &[CellWrite]) -> Result<()> {
        if writes.is_empty() {
            return Ok(());
        }

        let data: Vec<serde_json::Value> = writes
            .iter()
            .map(|write| {
                json!({
                    "range": cell_range(tab, write),
                    "values": [[write.value]],
                })
            })
            .collect();

        let url = format!(
            "{}/{}/values:batchUpdate",
            SHEETS_BASE_URL, self.spreadsheet_id
        );
        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.token)
            .json(&json!({
                "valueInputOption": "RAW",
                "data": data,
            }))
            .send()?;

        let status = response.status();
        if !status.is_success() {
            return Err(SyncError::SheetWrite(format!(
                "batch update for '{}' rejected with status {}",
                tab, status
            )));
        }

        debug!("Wrote {} cells to '{}'", writes.len(), tab);
        Ok(())
    }
}

/// A1-notation quoting for worksheet titles.
fn quote_tab(tab: &str) -> String {
    format!("'{}'", tab.replace('\'', "''"))
}

/// 1-based column number to A1 letters.
fn column_letter(column: u32) -> String {
    let mut column = column;
    let mut letters = Vec::new();
    while column > 0 {
        let rem = (column - 1) % 26;
        letters.push((b'A' + rem as u8) as char);
        column = (column - 1) / 26;
    }
    letters.iter().rev().collect()
}

fn cell_range(tab: &str, write: &CellWrite) -> String {
    format!("{}!{}{}", quote_tab(tab), column_letter(write.column), write.row)
}
