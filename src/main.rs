use std::path::Path;
use std::process::ExitCode;

use log::{error, info, warn};

use availability_sync::{run_sync, ExtranetClient, SheetsClient, SyncConfig};

const SNAPSHOT_PATH: &str = "error_page.html";

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = match SyncConfig::from_env() {
        Ok(config) => config,
        Err(err) => {
            error!("{}", err);
            return ExitCode::FAILURE;
        }
    };

    match run(&config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("Sync failed: {}", err);
            ExitCode::FAILURE
        }
    }
}

fn run(config: &SyncConfig) -> availability_sync::Result<()> {
    let mut source = ExtranetClient::new(&config.extranet_url, config.query_timeout)?;
    let mut store = SheetsClient::new(
        &config.spreadsheet_id,
        &config.sheets_token,
        config.read_interval,
    )?;

    let summary = match run_sync(&mut source, &mut store, config) {
        Ok(summary) => summary,
        Err(err) => {
            // Keep whatever the extranet last served for post-mortem.
            if let Err(snapshot_err) = source.save_snapshot(Path::new(SNAPSHOT_PATH)) {
                warn!("Could not save page snapshot: {}", snapshot_err);
            }
            return Err(err);
        }
    };

    info!("Run complete: {} rows written", summary.rows_written());
    for (tab, rows) in &summary.updated {
        info!("  updated {}: {} rows", tab, rows);
    }
    for (tab, reason) in &summary.skipped {
        info!("  skipped {}: {}", tab, reason);
    }
    info!(
        "View at: https://docs.google.com/spreadsheets/d/{}",
        config.spreadsheet_id
    );

    Ok(())
}
