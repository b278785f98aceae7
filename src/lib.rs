//! # Availability Sync
//!
//! Reconciles room-availability figures published on a hotel-booking
//! extranet with a per-hotel ledger kept in a Google spreadsheet.
//!
//! ## Core Concepts
//!
//! - **Ledger range**: each hotel tab lists its own contracted date range;
//!   the spreadsheet is authoritative for *which dates* matter.
//! - **Chunked extraction**: the extranet reports at most 30 days per query,
//!   so each hotel's range is split into grid-aligned 30-day windows.
//! - **Reconciliation**: extracted per-date sales and allotment figures are
//!   matched back to ledger rows by day and month (the extranet always
//!   reports in its own current year), producing a minimal set of cell
//!   writes applied as one batched update per tab.
//!
//! ## Example
//!
//! ```rust,ignore
//! use availability_sync::*;
//!
//! let config = SyncConfig::from_env()?;
//! let mut source = ExtranetClient::new(&config.extranet_url, config.query_timeout)?;
//! let mut store = SheetsClient::new(
//!     &config.spreadsheet_id,
//!     &config.sheets_token,
//!     config.read_interval,
//! )?;
//!
//! let summary = run_sync(&mut source, &mut store, &config)?;
//! println!("updated {} rows", summary.rows_written());
//! ```

pub mod chunking;
pub mod config;
pub mod dates;
pub mod error;
pub mod extranet;
pub mod ledger;
pub mod reconcile;
pub mod report;
pub mod sheets;
pub mod source;
pub mod sync;

pub use chunking::{chunk_range, Chunk};
pub use config::{LedgerLayout, SyncConfig, HOTEL_MAPPING};
pub use dates::parse_ledger_date;
pub use error::{Result, SyncError};
pub use extranet::ExtranetClient;
pub use ledger::{HotelRange, LedgerDate};
pub use reconcile::{merge_metrics, plan_writes, CellWrite};
pub use report::{extract_day_metrics, DayMetrics, MetricsByDate, ReportTable};
pub use sheets::{LedgerStore, SheetsClient};
pub use source::AvailabilitySource;
pub use sync::{run_sync, SyncSummary};
