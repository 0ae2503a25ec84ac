//! DTA spectrum files.
//!
//! A DTA file holds one spectrum. The name encodes the scan range and charge
//! (`<base>.<first scan>.<last scan>.<charge>.dta`); the first line holds the
//! precursor Mh and charge and every further line an m/z and intensity.

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use log::warn;
use regex::Regex;

use super::error::DtaError;

static DTA_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<base>.+)\.(?P<first>\d+)\.(?P<last>\d+)\.(?P<charge>\d+)\.dta$")
        .unwrap_or_else(|e| panic!("invalid DTA name pattern: {e}"))
});

/// Fields encoded in a DTA file name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DtaName {
    /// Run name.
    pub base: String,
    /// First scan number.
    pub first_scan: u32,
    /// Last scan number.
    pub last_scan: u32,
    /// Precursor charge.
    pub charge: u32,
}

/// Decode the name of a DTA file.
pub fn parse_dta_name(path: &Path) -> Result<DtaName, DtaError> {
    let invalid = || DtaError::InvalidName(path.to_path_buf());
    let name = path.file_name().and_then(|n| n.to_str()).ok_or_else(invalid)?;
    let captures = DTA_NAME.captures(name).ok_or_else(invalid)?;
    let number = |group: &str| captures[group].parse::<u32>().map_err(|_| invalid());
    Ok(DtaName {
        base: captures["base"].to_string(),
        first_scan: number("first")?,
        last_scan: number("last")?,
        charge: number("charge")?,
    })
}

/// One experimental spectrum.
#[derive(Debug, Clone, PartialEq)]
pub struct Spectrum {
    /// Scan number.
    pub scan: u32,
    /// Observed precursor Mh.
    pub precursor_mh: f64,
    /// Precursor charge.
    pub charge: u32,
    /// File the spectrum was read from.
    pub path: PathBuf,
    /// (m/z, intensity) pairs in file order.
    pub peaks: Vec<(f64, f64)>,
}

fn two_numbers<A, B>(line: &str) -> Option<(A, B)>
where
    A: std::str::FromStr,
    B: std::str::FromStr,
{
    let mut fields = line.split_whitespace();
    let first = fields.next()?.parse().ok()?;
    let second = fields.next()?.parse().ok()?;
    match fields.next() {
        Some(_) => None,
        None => Some((first, second)),
    }
}

/// Parse DTA content. The scan number comes from `path`.
pub fn parse_dta<R: BufRead>(reader: R, path: &Path) -> Result<Spectrum, DtaError> {
    let name = parse_dta_name(path)?;
    let mut header: Option<(f64, u32)> = None;
    let mut peaks = Vec::new();

    for (number, line) in reader.lines().enumerate() {
        let line = line.map_err(|source| DtaError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let content = line.trim();
        if content.is_empty() {
            continue;
        }
        let invalid = || DtaError::InvalidLine {
            path: path.to_path_buf(),
            line: number + 1,
            content: content.to_string(),
        };
        if header.is_none() {
            header = Some(two_numbers(content).ok_or_else(invalid)?);
        } else {
            peaks.push(two_numbers(content).ok_or_else(invalid)?);
        }
    }

    let (precursor_mh, charge) = header.ok_or_else(|| DtaError::MissingHeader(path.to_path_buf()))?;
    Ok(Spectrum {
        scan: name.first_scan,
        precursor_mh,
        charge,
        path: path.to_path_buf(),
        peaks,
    })
}

/// Read one DTA file.
pub fn read_dta(path: &Path) -> Result<Spectrum, DtaError> {
    let file = File::open(path).map_err(|source| DtaError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_dta(BufReader::new(file), path)
}

/// Drop files whose scan number occurs in more than one file name.
///
/// Files whose names cannot be decoded are kept so that reading them reports
/// the error. Order is preserved.
pub fn select_unique_scans(paths: Vec<PathBuf>) -> Vec<PathBuf> {
    let scans: Vec<Option<u32>> = paths
        .iter()
        .map(|path| parse_dta_name(path).ok().map(|name| name.first_scan))
        .collect();
    let mut occurrences: HashMap<u32, usize> = HashMap::new();
    for scan in scans.iter().flatten() {
        *occurrences.entry(*scan).or_insert(0) += 1;
    }
    paths
        .into_iter()
        .zip(scans)
        .filter(|(path, scan)| match scan {
            Some(scan) if occurrences[scan] > 1 => {
                warn!(
                    "Skipping {}: scan {scan} occurs in {} files",
                    path.display(),
                    occurrences[scan]
                );
                false
            }
            _ => true,
        })
        .map(|(path, _)| path)
        .collect()
}
