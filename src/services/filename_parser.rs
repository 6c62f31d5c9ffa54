//! Filename parser for camera-generated snapshot names
//!
//! Parses filenames like:
//! - "192.168.1.51_01_20240101120000_LINE_CROSSING_DETECTION.jpg"
//! - "192.168.1.51_01_20160505160951242_VEHICLE_DETECTION.jpg" (extra millisecond digits)
//! - "10.0.0.9_02_20240101120000.jpg" (no event tag)

use std::path::{Path, PathBuf};

use chrono::{DateTime, TimeZone, Utc};
use once_cell::sync::Lazy;
use regex::Regex;

/// `<deviceId>_<sequence>_<14-digit datetime>[ms digits][_<eventTag>].jpg`
static SNAPSHOT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?P<device>[^_]+)_(?P<seq>\d+)_(?P<dt>\d{14})\d*(?:_(?P<tag>[^.]+))?\.(?i:jpg)$")
        .unwrap()
});

/// Parsed snapshot information from a camera filename
///
/// Immutable once parsed; the capture timestamp comes from the camera's UTC
/// clock, not from any filesystem timestamp.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedSnapshot {
    pub path: PathBuf,
    pub device_id: String,
    pub sequence: u32,
    pub captured_at: DateTime<Utc>,
    pub event_tag: Option<String>,
    pub file_name: String,
    /// `<yyyyMMdd>_<HHmmss>`, the base name of this capture's cache artifacts
    pub compact_key: String,
}

/// Parse a snapshot path into its capture metadata.
///
/// Returns `None` for any name that does not follow the convention: fewer
/// than two underscore separators, a datetime shorter than 14 digits, a
/// non-numeric digit group, or a datetime that is not a valid calendar
/// date/time. Malformed names must never abort a pass, so this is total.
pub fn parse_snapshot(path: &Path) -> Option<ParsedSnapshot> {
    let file_name = path.file_name()?.to_str()?;
    let caps = SNAPSHOT_RE.captures(file_name)?;

    let dt = &caps["dt"];
    let year: i32 = dt[0..4].parse().ok()?;
    let month: u32 = dt[4..6].parse().ok()?;
    let day: u32 = dt[6..8].parse().ok()?;
    let hour: u32 = dt[8..10].parse().ok()?;
    let minute: u32 = dt[10..12].parse().ok()?;
    let second: u32 = dt[12..14].parse().ok()?;

    let captured_at = Utc
        .with_ymd_and_hms(year, month, day, hour, minute, second)
        .single()?;

    Some(ParsedSnapshot {
        path: path.to_path_buf(),
        device_id: caps["device"].to_string(),
        sequence: caps["seq"].parse().ok()?,
        captured_at,
        event_tag: caps.name("tag").map(|m| m.as_str().to_string()),
        file_name: file_name.to_string(),
        compact_key: format!("{}_{}", &dt[0..8], &dt[8..14]),
    })
}
