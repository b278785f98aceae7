use std::env;
use std::time::Duration;

use chrono::Datelike;

use crate::error::{Result, SyncError};

/// Ledger tab name -> extranet hotel name, in processing order.
///
/// Tab names are reproduced exactly as they appear in the spreadsheet,
/// stray whitespace included; worksheet lookup falls back to the trimmed
/// form when the literal name is missing.
pub const HOTEL_MAPPING: &[(&str, &str)] = &[
    ("Maden Hotel", "Maden Hotel"),
    ("AMP", "ANWAR"),
    ("SAJA", "SAJA MADINAH"),
    ("AL HARAM", "DAR AL EIMAN AL HARAM"),
    ("PULLMAN", "PULLMAN ZAMZAM MADINAH"),
    ("AQEEQ ", "AL AQEEQ MADINAH"),
    (" FRONT", "TAIBA FRONT HOTEL"),
    (" HARTHIYA", "FRONTEL AL HARITHIA"),
    ("MONA KAREEM", "LEADER AL MUNA KAREEM"),
    ("SAFWAT", "SAFWAT"),
    ("BADAR MAQAM", "GRAND PLAZA BADR"),
    ("RUA INT", "RUA INT"),
    (" KAYAN INT", "KAYAN INT"),
    ("ANSAR TULIP", "AL ANSAR GOLDEN TULIP"),
    ("MADINAH CONCORD", "MADINAH CONCORD"),
    (" CONCORD KHAIR", "CONCORDE HOTEL DAR AL KHAIR"),
    ("ABRAJ TABAH", "ABRAJ TABA"),
    ("VALLEY HOTEL", "VALY HOTEL"),
    ("MAIEN TAIBA HOTEL", "MAIEN TAIBA HOTEL"),
    ("GULNAR", "GULNAR"),
    ("NUSUK", "NUSUK"),
    ("RAMA", "RAMA AL MADINA"),
    ("TAJ WARD", "TAJ WARD"),
    ("JAWHRAT RASHEED", "JAWHARAT AL RASHEED"),
    ("MUKHTARA GOLDEN", "MUKHTARA GOLDEN"),
    ("RUA DIYAFAH", "RUA AL DIYAFAH HOTEL"),
    ("TAIBAH HILLZ", "TAIBAH HILLS HOTEL"),
    ("BIR", "BIR"),
    ("MIRAMAR", "MIRAMAR"),
    ("SHAZA", "SHAZA"),
    ("QADAT", "QADAT"),
];

/// Where the data lives inside every ledger tab. All the layout coupling is
/// gathered here rather than scattered as hard-coded constants.
#[derive(Debug, Clone)]
pub struct LedgerLayout {
    /// 1-based column holding the dates.
    pub date_column: u32,
    /// 1-based column receiving the allotment figures.
    pub allotment_column: u32,
    /// 1-based column receiving the sales figures.
    pub sales_column: u32,
    /// 1-based row the date scan starts from. Rows above are headers.
    pub scan_start_row: u32,
}

impl Default for LedgerLayout {
    fn default() -> Self {
        Self {
            date_column: 2,
            allotment_column: 3,
            sales_column: 4,
            scan_start_row: 15,
        }
    }
}

#[derive(Debug, Clone)]
pub struct SyncConfig {
    pub username: String,
    pub password: String,
    pub extranet_url: String,
    pub spreadsheet_id: String,
    pub sheets_token: String,
    /// Calendar year the extranet reports its short dates in. Fixed at load
    /// time and threaded explicitly so extraction stays deterministic.
    pub report_year: i32,
    pub layout: LedgerLayout,
    /// Minimum spacing between successive spreadsheet reads.
    pub read_interval: Duration,
    /// Upper bound on any single extranet round-trip.
    pub query_timeout: Duration,
    /// Ledger tab name -> extranet hotel name, in processing order.
    pub hotel_mapping: Vec<(String, String)>,
}

impl SyncConfig {
    /// Loads configuration from the environment, honoring a local `.env`.
    ///
    /// `SPREADSHEET_ID` and `SHEETS_ACCESS_TOKEN` are required; everything
    /// else has a deployment default.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let spreadsheet_id = env::var("SPREADSHEET_ID")
            .map_err(|_| SyncError::MissingConfiguration("SPREADSHEET_ID"))?;
        let sheets_token = env::var("SHEETS_ACCESS_TOKEN")
            .map_err(|_| SyncError::MissingConfiguration("SHEETS_ACCESS_TOKEN"))?;

        Ok(Self {
            username: env::var("SYNC_USERNAME").unwrap_or_else(|_| "ai".to_string()),
            password: env::var("SYNC_PASSWORD").unwrap_or_default(),
            extranet_url: env::var("EXTRANET_URL")
                .unwrap_or_else(|_| "https://bookingarabian.com/".to_string()),
            spreadsheet_id,
            sheets_token,
            report_year: chrono::Local::now().year(),
            layout: LedgerLayout::default(),
            read_interval: Duration::from_secs(2),
            query_timeout: Duration::from_secs(60),
            hotel_mapping: HOTEL_MAPPING
                .iter()
                .map(|(tab, hotel)| (tab.to_string(), hotel.to_string()))
                .collect(),
        })
    }

    /// The extranet name a ledger tab maps to.
    pub fn hotel_name_for(&self, tab: &str) -> Result<&str> {
        self.hotel_mapping
            .iter()
            .find(|(name, _)| name == tab)
            .map(|(_, hotel)| hotel.as_str())
            .ok_or_else(|| SyncError::UnmappedHotel(tab.to_string()))
    }
}
