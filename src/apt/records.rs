use crate::error::{Error, Result};
use crate::geo::LatLon;

/// One `10 … xxx …` centerline entry from an 810 database: the segment
/// midpoint plus its true heading and dimensions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RunwayEndRecord {
    pub midpoint: LatLon,
    pub heading_deg: f64,
    pub length_ft: f64,
    pub width_ft: f64,
}

impl RunwayEndRecord {
    pub fn from_line(line: &str) -> Result<Self> {
        let tokens: Vec<&str> = line.split_whitespace().collect();
        Ok(RunwayEndRecord {
            midpoint: LatLon::new(field(&tokens, 1, line)?, field(&tokens, 2, line)?),
            heading_deg: field(&tokens, 4, line)?,
            length_ft: field(&tokens, 5, line)?,
            width_ft: field(&tokens, 7, line)?,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VertexKind {
    /// 111, plain centerline node
    Plain,
    /// 112, bezier control node
    Curve,
    /// 113, node closing a boundary loop
    CloseLoop,
    /// 115, node ending a line
    End,
}

impl VertexKind {
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "111" => Some(VertexKind::Plain),
            "112" => Some(VertexKind::Curve),
            "113" => Some(VertexKind::CloseLoop),
            "115" => Some(VertexKind::End),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TaxiwayVertex {
    pub position: LatLon,
    pub kind: VertexKind,
}

impl TaxiwayVertex {
    pub fn from_line(line: &str) -> Result<Self> {
        let tokens: Vec<&str> = line.split_whitespace().collect();
        let kind = tokens
            .first()
            .and_then(|t| VertexKind::from_code(t))
            .ok_or_else(|| malformed(line))?;
        Ok(TaxiwayVertex {
            position: LatLon::new(field(&tokens, 1, line)?, field(&tokens, 2, line)?),
            kind,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrequencyCategory {
    Awos,
    Unicom,
    Clearance,
    Ground,
    Tower,
    Approach,
}

impl FrequencyCategory {
    /// Codes 55 and 56 are both approach-control subtypes in the source
    /// database convention and share one tag.
    pub fn from_code(code: u32) -> Option<Self> {
        match code {
            50 => Some(FrequencyCategory::Awos),
            51 => Some(FrequencyCategory::Unicom),
            52 => Some(FrequencyCategory::Clearance),
            53 => Some(FrequencyCategory::Ground),
            54 => Some(FrequencyCategory::Tower),
            55 | 56 => Some(FrequencyCategory::Approach),
            _ => None,
        }
    }

    pub fn tag(self) -> &'static str {
        match self {
            FrequencyCategory::Awos => "AWOS",
            FrequencyCategory::Unicom => "UNICOM",
            FrequencyCategory::Clearance => "CLEARANCE",
            FrequencyCategory::Ground => "GROUND",
            FrequencyCategory::Tower => "TOWER",
            FrequencyCategory::Approach => "APPROACH",
        }
    }
}

/// The 5-digit value is carried verbatim into the document, so it stays a
/// string.
#[derive(Debug, Clone, PartialEq)]
pub struct FrequencyRecord {
    pub category: FrequencyCategory,
    pub value: String,
}

impl FrequencyRecord {
    /// `Ok(None)` for codes 57-59, which fit the line pattern but have no
    /// tag in the output document.
    pub fn from_line(line: &str) -> Result<Option<Self>> {
        let mut tokens = line.split_whitespace();
        let code: u32 = tokens
            .next()
            .and_then(|t| t.parse().ok())
            .ok_or_else(|| malformed(line))?;
        let value = tokens.next().ok_or_else(|| malformed(line))?.to_owned();
        Ok(FrequencyCategory::from_code(code)
            .map(|category| FrequencyRecord { category, value }))
    }
}

fn field(tokens: &[&str], idx: usize, line: &str) -> Result<f64> {
    tokens
        .get(idx)
        .and_then(|t| t.parse().ok())
        .ok_or_else(|| malformed(line))
}

fn malformed(line: &str) -> Error {
    Error::MalformedRecord {
        line: line.to_owned(),
    }
}
