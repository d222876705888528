//! CSV hand-off between the scrape and generate stages.
//!
//! Scrape output lands in `<dir>/scraped_companies_<YYYYMMDD_HHMMSS>.csv`; the
//! generate stage picks the lexicographically latest such file by default.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::Local;
use tracing::{info, warn};

use crate::errors::AppError;
use crate::generation::generator::BatchReport;
use crate::models::company::CompanyRecord;

pub const SCRAPED_FILE_PREFIX: &str = "scraped_companies_";
const REQUIRED_COLUMNS: &[&str] = &["company_name", "website"];

/// Loads company rows. `industry`, `revenue` and `scraped_content` are optional columns.
pub fn load_companies(path: &Path) -> Result<Vec<CompanyRecord>, AppError> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::Headers)
        .from_path(path)
        .map_err(|e| AppError::csv(path, e))?;

    let headers = reader.headers().map_err(|e| AppError::csv(path, e))?.clone();
    for column in REQUIRED_COLUMNS {
        if !headers.iter().any(|h| h == *column) {
            return Err(AppError::Input {
                path: path.to_path_buf(),
                row: 1,
                message: format!("missing required column '{column}'"),
            });
        }
    }

    let mut companies = Vec::new();
    for (idx, result) in reader.deserialize::<CompanyRecord>().enumerate() {
        // Row 1 is the header.
        let row = idx + 2;
        let company = result.map_err(|e| AppError::Input {
            path: path.to_path_buf(),
            row,
            message: e.to_string(),
        })?;

        if company.company_name.trim().is_empty() {
            return Err(AppError::Input {
                path: path.to_path_buf(),
                row,
                message: "company_name is empty".to_string(),
            });
        }

        companies.push(company);
    }

    info!("Loaded {} companies from {}", companies.len(), path.display());
    Ok(companies)
}

/// Writes scraped records to a new timestamped CSV under `output_dir`.
/// Returns `None` (and writes nothing) when there are no records.
pub fn save_scraped(
    output_dir: &Path,
    companies: &[CompanyRecord],
) -> Result<Option<PathBuf>, AppError> {
    if companies.is_empty() {
        warn!("No results to save");
        return Ok(None);
    }

    fs::create_dir_all(output_dir).map_err(|e| AppError::io(output_dir, e))?;

    let timestamp = Local::now().format("%Y%m%d_%H%M%S");
    let path = output_dir.join(format!("{SCRAPED_FILE_PREFIX}{timestamp}.csv"));

    let mut writer = csv::Writer::from_path(&path).map_err(|e| AppError::csv(&path, e))?;
    for company in companies {
        writer
            .serialize(company)
            .map_err(|e| AppError::csv(&path, e))?;
    }
    writer.flush().map_err(|e| AppError::io(&path, e))?;

    info!("Saved {} companies to {}", companies.len(), path.display());
    Ok(Some(path))
}

/// Finds the most recent scrape output in `output_dir`.
pub fn latest_scraped_file(output_dir: &Path) -> Result<PathBuf, AppError> {
    let entries = match fs::read_dir(output_dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(AppError::NoScrapedData(output_dir.to_path_buf()))
        }
        Err(e) => return Err(AppError::io(output_dir, e)),
    };

    entries
        .filter_map(Result::ok)
        .map(|entry| entry.path())
        .filter(|path| {
            path.file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| n.starts_with(SCRAPED_FILE_PREFIX) && n.ends_with(".csv"))
        })
        .max()
        .ok_or_else(|| AppError::NoScrapedData(output_dir.to_path_buf()))
}

/// Writes the batch outcomes as pretty-printed JSON.
pub fn save_report_json(path: &Path, report: &BatchReport) -> Result<(), AppError> {
    let json = serde_json::to_string_pretty(report)
        .map_err(|e| AppError::io(path, std::io::Error::other(e)))?;
    fs::write(path, json).map_err(|e| AppError::io(path, e))?;
    info!("Wrote {} outcomes to {}", report.total(), path.display());
    Ok(())
}
