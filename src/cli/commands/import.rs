use crate::cli::parser::{Commands, LayoutKind};
use crate::config::Config;
use crate::errors::{AppError, AppResult};
use crate::jobs::{CancellationToken, run_import_blocking};
use crate::ui::messages::{info, success, warning};
use crate::utils::path::expand_tilde;

/// Issues printed in full; the rest are only counted.
const MAX_ISSUES_SHOWN: usize = 20;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Import { file, layout } = cmd {
        let path = expand_tilde(file);
        if !path.exists() {
            return Err(AppError::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("import file not found: {}", path.display()),
            )));
        }

        let layout = match layout {
            LayoutKind::Device => cfg.layouts.device.clone(),
            LayoutKind::Sheet => cfg.layouts.sheet.clone(),
        };

        info(format!("Importing {}…", path.display()));
        let summary = run_import_blocking(
            cfg.database.clone(),
            path,
            layout,
            CancellationToken::new(),
        )?;

        println!("  rows read     : {}", summary.rows_read);
        println!("  inserted      : {}", summary.inserted);
        println!("  duplicates    : {}", summary.duplicates);
        println!("  parse errors  : {}", summary.parse_errors);
        println!("  unknown ids   : {}", summary.lookup_errors);

        // reasons already carry their line number
        for (_, reason) in summary.issues.iter().take(MAX_ISSUES_SHOWN) {
            warning(reason);
        }
        if summary.issues.len() > MAX_ISSUES_SHOWN {
            warning(format!(
                "… {} more rows skipped",
                summary.issues.len() - MAX_ISSUES_SHOWN
            ));
        }

        if summary.cancelled {
            warning("Import cancelled; rows stored so far are kept.");
        } else {
            success(format!("Import completed: {} new punches", summary.inserted));
        }
    }

    Ok(())
}
