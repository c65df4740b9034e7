use std::cmp;

use crate::apt::records::{FrequencyRecord, RunwayEndRecord, TaxiwayVertex};
use crate::apt::{self, LayoutVariant, FREQ, RUNWAY_SEG, TAXIWAY_HEADING, VERTEX};
use crate::error::{Error, Result};

/// Everything one airport contributes to its graph, pulled out of the raw
/// line window.
#[derive(Debug, Clone)]
pub struct Extraction {
    pub frequencies: Vec<FrequencyRecord>,
    pub layout: LayoutRecords,
}

#[derive(Debug, Clone)]
pub enum LayoutRecords {
    /// 810: the `xxx` centerline segments, runway and parallel taxiway
    Runway(Vec<RunwayEndRecord>),
    /// 850: taxiway vertices in file order plus the taxiway direction
    Taxiway {
        vertices: Vec<TaxiwayVertex>,
        heading_deg: f64,
    },
}

pub fn extract(window: &[String], icao: &str, variant: LayoutVariant) -> Result<Extraction> {
    let header = find_header(window, icao)?;
    match variant {
        LayoutVariant::V810 => extract_810(window, header),
        LayoutVariant::V850 => extract_850(window, header),
    }
}

fn find_header(window: &[String], icao: &str) -> Result<usize> {
    let re = apt::header_regex(icao);
    window
        .iter()
        .position(|l| re.is_match(l))
        .ok_or_else(|| Error::AirportNotFound {
            icao: icao.to_owned(),
        })
}

fn extract_810(window: &[String], header: usize) -> Result<Extraction> {
    let mut runway_ends = Vec::new();
    for line in scan(window, header + 1, header + 15) {
        if RUNWAY_SEG.is_match(line) {
            runway_ends.push(RunwayEndRecord::from_line(line)?);
        }
    }
    let frequencies = collect_frequencies(window, header + 4, header + 25)?;
    Ok(Extraction {
        frequencies,
        layout: LayoutRecords::Runway(runway_ends),
    })
}

fn extract_850(window: &[String], header: usize) -> Result<Extraction> {
    let mut vertices = Vec::new();
    // stays 0.0 when the window carries no taxiway direction record
    let mut heading_deg = 0.0;
    for line in scan(window, header + 1, header + 40) {
        if VERTEX.is_match(line) {
            vertices.push(TaxiwayVertex::from_line(line)?);
        }
        if let Some(caps) = TAXIWAY_HEADING.captures(line) {
            heading_deg = caps[1].parse().map_err(|_| Error::MalformedRecord {
                line: line.to_owned(),
            })?;
        }
    }
    let frequencies = collect_frequencies(window, header + 4, header + 40)?;
    Ok(Extraction {
        frequencies,
        layout: LayoutRecords::Taxiway {
            vertices,
            heading_deg,
        },
    })
}

fn collect_frequencies(window: &[String], start: usize, end: usize) -> Result<Vec<FrequencyRecord>> {
    let mut frequencies = Vec::new();
    for line in scan(window, start, end) {
        if FREQ.is_match(line) {
            if let Some(record) = FrequencyRecord::from_line(line)? {
                frequencies.push(record);
            }
        }
    }
    Ok(frequencies)
}

/// `window[start..end]` bounded to the window, stopping at the first blank
/// line.
fn scan(window: &[String], start: usize, end: usize) -> impl Iterator<Item = &str> {
    let end = cmp::min(end, window.len());
    let start = cmp::min(start, end);
    window[start..end]
        .iter()
        .map(String::as_str)
        .take_while(|l| !l.is_empty())
}
