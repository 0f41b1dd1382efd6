//! JPL Horizons batch requests
//!
//! Observation nights are grouped into periods, one batch request is sent per
//! period, and the data sections of the responses are stitched into a single
//! `$$SOE ... $$EOE` table that [`HorizonsReader`] can consume.

use std::env;
use std::fs::{self, File};
use std::io::{self, BufWriter, Cursor, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::NaiveDate;
use log::{debug, info};

use crate::ephemeris::reader::{END_MARKER, START_MARKER};
use crate::ephemeris::{ColumnLayout, HorizonsReader};
use crate::{Result, SelenofieldError};

/// Horizons batch interface
pub const HORIZONS_BATCH_URL: &str = "https://ssd.jpl.nasa.gov/horizons_batch.cgi";

/// Observing site: Kitt Peak (695) on Earth (399)
const OBSERVER_CENTER: &str = "695@399";

/// Quantities of the full target table
const TARGET_QUANTITIES: &str = "1,4,7,8,9,10,13,14,15,19,20,23,24";

/// Quantities of a position-only table
const AXIS_QUANTITIES: &str = "1,20";

/// Dates further apart than this start a new request period
const MAX_PERIOD_GAP_DAYS: i64 = 3;

/// Date format used in `START_TIME` / `STOP_TIME`
const REQUEST_DATE_FORMAT: &str = "%Y-%b-%d";

/// One of the four tables needed per run
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HorizonsQuery {
    /// Full observer table of the Moon
    Target,
    /// Position of the lunar center
    Center,
    /// Position of a body-fixed point on the lunar surface
    SurfacePoint {
        longitude_deg: f64,
        latitude_deg: f64,
    },
}

impl HorizonsQuery {
    /// The selenographic (0°E, 0°N) reference point
    pub fn equator() -> Self {
        HorizonsQuery::SurfacePoint {
            longitude_deg: 0.0,
            latitude_deg: 0.0,
        }
    }

    /// The lunar north pole reference point
    pub fn pole() -> Self {
        HorizonsQuery::SurfacePoint {
            longitude_deg: 0.0,
            latitude_deg: 90.0,
        }
    }

    /// Horizons `COMMAND` value
    pub fn command(&self) -> String {
        match self {
            HorizonsQuery::Target | HorizonsQuery::Center => "301".to_string(),
            HorizonsQuery::SurfacePoint {
                longitude_deg,
                latitude_deg,
            } => format!("g:{},{},0@301", longitude_deg, latitude_deg),
        }
    }

    /// Horizons `QUANTITIES` value
    pub fn quantities(&self) -> &'static str {
        match self {
            HorizonsQuery::Target => TARGET_QUANTITIES,
            HorizonsQuery::Center | HorizonsQuery::SurfacePoint { .. } => AXIS_QUANTITIES,
        }
    }

    /// Column layout of the returned table
    pub fn layout(&self) -> ColumnLayout {
        match self {
            HorizonsQuery::Target => ColumnLayout::observer_table(),
            HorizonsQuery::Center | HorizonsQuery::SurfacePoint { .. } => {
                ColumnLayout::axis_table()
            }
        }
    }

    /// Short name used in logs and cache file names
    pub fn label(&self) -> String {
        match self {
            HorizonsQuery::Target => "target".to_string(),
            HorizonsQuery::Center => "center".to_string(),
            HorizonsQuery::SurfacePoint {
                longitude_deg,
                latitude_deg,
            } => format!("point_{}_{}", longitude_deg, latitude_deg),
        }
    }

    /// Batch URL covering `start` 00:00 through `stop` 23:59
    pub fn request_url(&self, start: NaiveDate, stop: NaiveDate) -> String {
        let params = [
            ("COMMAND", self.command()),
            ("CENTER", OBSERVER_CENTER.to_string()),
            ("OBJ_DATA", "NO".to_string()),
            ("MAKE_EPHEM", "YES".to_string()),
            ("TABLE_TYPE", "OBS".to_string()),
            ("RANGE_UNITS", "KM".to_string()),
            ("ANG_FORMAT", "DEG".to_string()),
            ("QUANTITIES", self.quantities().to_string()),
            ("SKIP_DAYLT", "YES".to_string()),
            ("CSV_FORMAT", "NO".to_string()),
            ("STEP_SIZE", "1 m".to_string()),
            ("START_TIME", start.format(REQUEST_DATE_FORMAT).to_string()),
            (
                "STOP_TIME",
                format!("{}-23:59", stop.format(REQUEST_DATE_FORMAT)),
            ),
        ];

        let query: Vec<String> = params
            .iter()
            .map(|(key, value)| format!("{}=%27{}%27", key, value.replace(' ', "%20")))
            .collect();

        format!("{}?batch=1&{}", HORIZONS_BATCH_URL, query.join("&"))
    }
}

/// Group observation dates into contiguous request periods
///
/// Dates are sorted and deduplicated; a gap of more than three days between
/// consecutive dates starts a new period. Each period is `(first, last)`.
pub fn split_periods(dates: &[NaiveDate]) -> Vec<(NaiveDate, NaiveDate)> {
    let mut sorted = dates.to_vec();
    sorted.sort_unstable();
    sorted.dedup();

    let mut periods: Vec<(NaiveDate, NaiveDate)> = Vec::new();
    for date in sorted {
        match periods.last_mut() {
            Some((_, last)) if (date - *last).num_days() <= MAX_PERIOD_GAP_DAYS => *last = date,
            _ => periods.push((date, date)),
        }
    }
    periods
}

/// Data lines of one response, without blank or daylight cut-off lines
pub fn extract_data_lines(response: &str) -> Result<Vec<&str>> {
    let mut lines = response.lines();

    if !lines.by_ref().any(|line| line.trim() == START_MARKER) {
        let preview: String = response.lines().take(5).collect::<Vec<_>>().join(" / ");
        return Err(SelenofieldError::InvalidFormat(format!(
            "no {} marker in Horizons response: {}",
            START_MARKER, preview
        )));
    }

    Ok(lines
        .take_while(|line| line.trim() != END_MARKER)
        .filter(|line| !line.trim().is_empty() && !line.contains("Daylight Cut-off"))
        .collect())
}

/// Fetch a table covering every date, one request per period
pub fn fetch_ephemeris(query: &HorizonsQuery, dates: &[NaiveDate]) -> Result<String> {
    let periods = split_periods(dates);
    if periods.is_empty() {
        return Err(SelenofieldError::DownloadError(
            "no observation dates given".to_string(),
        ));
    }
    info!(
        "Fetching {} table for {} dates in {} periods",
        query.label(),
        dates.len(),
        periods.len()
    );

    let client = reqwest::blocking::Client::builder()
        .timeout(Duration::from_secs(60))
        .build()
        .map_err(|e| {
            SelenofieldError::DownloadError(format!("Failed to create HTTP client: {}", e))
        })?;

    let mut table = format!("{}\n", START_MARKER);
    for (i, (start, stop)) in periods.iter().enumerate() {
        info!(
            "Requesting period {} of {}: {} to {}",
            i + 1,
            periods.len(),
            start,
            stop
        );
        let url = query.request_url(*start, *stop);
        debug!("GET {}", url);

        let response = client
            .get(&url)
            .send()
            .map_err(|e| SelenofieldError::DownloadError(format!("Request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(SelenofieldError::DownloadError(format!(
                "Horizons returned status {}",
                response.status()
            )));
        }

        let body = response.text().map_err(|e| {
            SelenofieldError::DownloadError(format!("Failed to read response: {}", e))
        })?;

        let lines = extract_data_lines(&body)?;
        info!("Period {} returned {} lines", i + 1, lines.len());
        for line in lines {
            table.push_str(line);
            table.push('\n');
        }
    }
    table.push_str(END_MARKER);
    table.push('\n');

    Ok(table)
}

/// Fetch a table and open a reader over it
pub fn open_remote(
    query: &HorizonsQuery,
    dates: &[NaiveDate],
) -> Result<HorizonsReader<Cursor<String>>> {
    HorizonsReader::from_text(fetch_ephemeris(query, dates)?, query.layout())
}

/// Get the cache directory path
pub fn get_cache_dir() -> PathBuf {
    let home = env::var("HOME").unwrap_or_else(|_| ".".to_string());
    PathBuf::from(home).join(".cache").join("selenofield")
}

/// Ensure that the cache directory exists
pub fn ensure_cache_dir() -> io::Result<PathBuf> {
    let cache_dir = get_cache_dir();
    fs::create_dir_all(&cache_dir)?;
    Ok(cache_dir)
}

fn file_exists_and_not_empty<P: AsRef<Path>>(path: P) -> bool {
    match fs::metadata(path) {
        Ok(metadata) => metadata.is_file() && metadata.len() > 0,
        Err(_) => false,
    }
}

/// Cache file name for a query over a set of dates
///
/// The fetched text depends only on the periods, so they form the key.
pub fn cache_file_name(query: &HorizonsQuery, dates: &[NaiveDate]) -> String {
    let periods: Vec<String> = split_periods(dates)
        .iter()
        .map(|(start, stop)| format!("{}_{}", start.format("%Y%m%d"), stop.format("%Y%m%d")))
        .collect();
    format!("horizons_{}_{}.txt", query.label(), periods.join("-"))
}

/// Fetch a table through a file cache in `cache_dir`
///
/// Returns the path of the cached table. An existing non-empty file is reused
/// without contacting Horizons.
pub fn fetch_ephemeris_cached<P: AsRef<Path>>(
    query: &HorizonsQuery,
    dates: &[NaiveDate],
    cache_dir: P,
) -> Result<PathBuf> {
    let path = cache_dir.as_ref().join(cache_file_name(query, dates));

    if file_exists_and_not_empty(&path) {
        info!("Using cached {} table {}", query.label(), path.display());
        return Ok(path);
    }

    let table = fetch_ephemeris(query, dates)?;

    fs::create_dir_all(cache_dir.as_ref())?;
    // Write to a temporary file first so an interrupted run leaves no partial table
    let temp_path = path.with_extension("tmp");
    let mut file = BufWriter::new(File::create(&temp_path)?);
    file.write_all(table.as_bytes())?;
    file.flush()?;
    drop(file);
    fs::rename(&temp_path, &path)?;

    info!("Cached {} table at {}", query.label(), path.display());
    Ok(path)
}
