//! Track log parsing
//!
//! A track log is plain text with one GPS fix per line: latitude then
//! longitude, delimited by `;` or `,`. Decimal commas are accepted by
//! normalizing `,` to `.` per field, which only takes effect when `,`
//! is not the active delimiter. Header rows and malformed lines are
//! skipped, never fatal on their own. The delimiter is chosen by
//! parsing with both candidates and keeping whichever yields more
//! usable fixes, so a stray free-text line cannot poison the whole
//! log.

use csv::ReaderBuilder;
use geo_types::Coord;

use crate::error::{AppError, AppResult};

/// An ordered sequence of at least two usable GPS fixes
///
/// Fixes are stored as (x, y) = (lon, lat), swapped from the log's
/// (lat, lon) field order, and preserve the log's line order.
#[derive(Debug, Clone, PartialEq)]
pub struct FlightTrack {
    fixes: Vec<Coord<f64>>,
}

impl FlightTrack {
    pub fn fixes(&self) -> &[Coord<f64>] {
        &self.fixes
    }

    pub fn len(&self) -> usize {
        self.fixes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fixes.is_empty()
    }
}

/// Parse raw track log text into an ordered fix sequence
///
/// Fails with `InsufficientTrackData` when fewer than 2 valid fixes
/// remain after filtering.
pub fn parse_track_log(content: &str) -> AppResult<FlightTrack> {
    // Sniffing the delimiter from the file as a whole lets one stray
    // line flip it for every record, so both candidates are parsed
    // and the one recovering more fixes wins. Ties go to the comma.
    let (comma_fixes, comma_skipped) = parse_with_delimiter(content, b',');
    let (semicolon_fixes, semicolon_skipped) = parse_with_delimiter(content, b';');

    let (fixes, skipped) = if semicolon_fixes.len() > comma_fixes.len() {
        (semicolon_fixes, semicolon_skipped)
    } else {
        (comma_fixes, comma_skipped)
    };

    if skipped > 0 {
        tracing::debug!(skipped, kept = fixes.len(), "skipped unusable track log lines");
    }

    if fixes.len() < 2 {
        return Err(AppError::InsufficientTrackData { found: fixes.len() });
    }

    Ok(FlightTrack { fixes })
}

fn parse_with_delimiter(content: &str, delimiter: u8) -> (Vec<Coord<f64>>, usize) {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .delimiter(delimiter)
        .from_reader(content.as_bytes());

    let mut fixes = Vec::new();
    let mut skipped = 0usize;

    for record in reader.records() {
        let record = match record {
            Ok(record) => record,
            Err(_) => {
                skipped += 1;
                continue;
            }
        };

        let parsed = match (record.get(0), record.get(1)) {
            (Some(lat), Some(lon)) => parse_field(lat).zip(parse_field(lon)),
            _ => None,
        };

        match parsed {
            Some((lat, lon)) => fixes.push(Coord { x: lon, y: lat }),
            None => skipped += 1,
        }
    }

    (fixes, skipped)
}

fn parse_field(raw: &str) -> Option<f64> {
    raw.replace(',', ".")
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
}
