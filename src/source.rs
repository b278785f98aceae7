use chrono::NaiveDate;

use crate::error::Result;
use crate::report::ReportTable;

/// Narrow capability interface over the extranet session.
///
/// The reconciliation core drives the external source exclusively through
/// these five operations; how a session is held (HTTP, browser, fixture) is
/// the implementation's business. The session is a single shared stateful
/// resource, so all operations take `&mut self` and callers issue them one
/// at a time.
pub trait AvailabilitySource {
    /// Opens a session under the given credentials.
    fn authenticate(&mut self, username: &str, password: &str) -> Result<()>;

    /// Navigates to the consolidated availability report view.
    fn open_report_view(&mut self) -> Result<()>;

    /// Sets the report window to the 30 days starting at `start`.
    fn set_window(&mut self, start: NaiveDate) -> Result<()>;

    /// Selects the hotel the next report should cover.
    fn select_hotel(&mut self, name: &str) -> Result<()>;

    /// Fetches the currently configured report.
    fn fetch_report(&mut self) -> Result<ReportTable>;
}
