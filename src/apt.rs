use std::cmp;
use std::collections::HashSet;
use std::fs;
use std::path::Path;

use lazy_static::lazy_static;
use regex::Regex;

use crate::error::{Error, Result};

pub mod extract;
pub mod records;

lazy_static! {
    /// `1 <elev> <?> <?> <ICAO> <name…>` airport header
    static ref HEADER: Regex =
        Regex::new(r"^1\s+[0-9]+\s+[0-9]+\s+[0-9]+\s+([0-9A-Z]{3,5})\s+").unwrap();
    /// 810 taxiway centerline entries carry the `xxx` designator
    pub(crate) static ref RUNWAY_SEG: Regex = Regex::new(r"^10\s+.*?xxx\s+").unwrap();
    pub(crate) static ref FREQ: Regex = Regex::new(r"^5[0-9]\s+[0-9]{5}\s+").unwrap();
    /// 850 node records: 111 plain, 112 bezier, 113 close, 115 end
    pub(crate) static ref VERTEX: Regex = Regex::new(r"^11[1235]\s+").unwrap();
    /// heading-carrying taxiway direction record
    pub(crate) static ref TAXIWAY_HEADING: Regex =
        Regex::new(r"^110\s+[0-9.]+\s+[0-9.]+\s+([0-9.]+)\s+").unwrap();
    static ref TAXIWAY: Regex = Regex::new(r"^110\s+").unwrap();
    static ref TAXI_NODE: Regex = Regex::new(r"^111\s+").unwrap();
    static ref BEZIER: Regex = Regex::new(r"^112\s+").unwrap();
    static ref HOLD_FEATURE: Regex = Regex::new(r"^120\s+").unwrap();
}

/// The two supported apt database conventions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayoutVariant {
    V810,
    V850,
}

impl LayoutVariant {
    pub fn database_file(self) -> &'static str {
        match self {
            LayoutVariant::V810 => "apt.dat",
            LayoutVariant::V850 => "apt850.dat",
        }
    }

    pub fn cache_file(self) -> &'static str {
        match self {
            LayoutVariant::V810 => "airport_list.txt",
            LayoutVariant::V850 => "airport_list_850.txt",
        }
    }

    pub fn output_dir(self) -> &'static str {
        match self {
            LayoutVariant::V810 => "output",
            LayoutVariant::V850 => "output850",
        }
    }
}

pub(crate) fn header_regex(icao: &str) -> Regex {
    Regex::new(&format!(
        r"^1\s+[0-9]{{1,7}}\s+[0-9]\s+[0-9]\s+{}\s+",
        regex::escape(icao)
    ))
    .expect("Bad airport header pattern")
}

/// The whole apt database held in memory, line by line. Loaded once per run;
/// every per-airport job works on a short window into it.
#[derive(Debug)]
pub struct AptDatabase {
    lines: Vec<String>,
}

impl AptDatabase {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<AptDatabase> {
        // apt databases are not reliably UTF-8
        let buf = fs::read(path)?;
        Ok(AptDatabase::from_text(&String::from_utf8_lossy(&buf)))
    }

    pub fn from_text(text: &str) -> AptDatabase {
        AptDatabase {
            lines: text.lines().map(str::to_owned).collect(),
        }
    }

    /// The line window handed to the extractor: one line before the header
    /// through 40 lines past it.
    pub fn window(&self, header_index: usize) -> &[String] {
        let start = header_index.saturating_sub(1);
        let end = cmp::min(header_index + 40, self.lines.len());
        &self.lines[start..end]
    }

    pub fn find_airport(&self, icao: &str) -> Result<usize> {
        let re = header_regex(icao);
        self.lines
            .iter()
            .position(|l| re.is_match(l))
            .ok_or_else(|| Error::AirportNotFound {
                icao: icao.to_owned(),
            })
    }

    /// Airports whose record block fits the default layout template, as
    /// `(ICAO, header line index)`, first occurrence wins.
    pub fn classify_default(&self, variant: LayoutVariant) -> Vec<(String, usize)> {
        match variant {
            LayoutVariant::V810 => self.classify_810(),
            LayoutVariant::V850 => self.classify_850(),
        }
    }

    /// 810 template: four `xxx` centerline segments, the first three of equal
    /// length and a longer fourth of at least 2000 ft (the parallel taxiway).
    fn classify_810(&self) -> Vec<(String, usize)> {
        let mut seen = HashSet::new();
        let mut found = Vec::new();
        for (i, line) in self.lines.iter().enumerate() {
            let caps = match HEADER.captures(line) {
                Some(c) => c,
                None => continue,
            };
            let mut seg_len: Vec<&str> = Vec::new();
            for next in self.lookahead(i, 10) {
                if RUNWAY_SEG.is_match(next) {
                    match next.split_whitespace().nth(5) {
                        Some(len) => seg_len.push(len),
                        None => continue,
                    }
                }
            }
            if seg_len.len() != 4 || seg_len[0] != seg_len[1] || seg_len[0] != seg_len[2] {
                continue;
            }
            // a length that fails to parse disqualifies the candidate
            let parsed = (seg_len[0].parse::<f64>(), seg_len[3].parse::<f64>());
            if let (Ok(short), Ok(long)) = parsed {
                if short < long && long >= 2000.0 {
                    let icao = caps[1].to_owned();
                    if seen.insert(icao.clone()) {
                        found.push((icao, i));
                    }
                }
            }
        }
        found
    }

    /// 850 template: 14 plain centerline nodes, one taxiway direction record,
    /// four bezier nodes and three hold features.
    fn classify_850(&self) -> Vec<(String, usize)> {
        let mut seen = HashSet::new();
        let mut found = Vec::new();
        for (i, line) in self.lines.iter().enumerate() {
            if !HEADER.is_match(line) {
                continue;
            }
            let (mut segs, mut taxiways, mut bezier, mut holds) = (0, 0, 0, 0);
            for next in self.lookahead(i, 40) {
                if TAXIWAY.is_match(next) {
                    taxiways += 1;
                }
                if BEZIER.is_match(next) {
                    bezier += 1;
                }
                if HOLD_FEATURE.is_match(next) {
                    holds += 1;
                }
                if TAXI_NODE.is_match(next) {
                    segs += 1;
                }
            }
            if segs == 14 && taxiways == 1 && bezier == 4 && holds == 3 {
                if let Some(caps) = HEADER.captures(line) {
                    let icao = caps[1].to_owned();
                    if seen.insert(icao.clone()) {
                        found.push((icao, i));
                    }
                }
            }
        }
        found
    }

    /// Lines after `index`, at most `span - 1` of them, stopping at a blank.
    fn lookahead(&self, index: usize, span: usize) -> impl Iterator<Item = &str> {
        let end = cmp::min(index + span, self.lines.len());
        let start = cmp::min(index + 1, end);
        self.lines[start..end]
            .iter()
            .map(String::as_str)
            .take_while(|l| !l.is_empty())
    }
}
