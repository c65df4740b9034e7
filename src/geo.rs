use std::f64::consts::PI;

pub const METER_TO_NM: f64 = 0.0005399568034557235;
pub const NM_TO_RAD: f64 = 0.00029088820866572159;
pub const FEET_TO_METER: f64 = 0.3048;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LatLon(f64, f64);

impl LatLon {
    pub fn new(lat: f64, lon: f64) -> Self {
        LatLon(lat, lon)
    }

    pub fn lat(self) -> f64 {
        self.0
    }

    pub fn lon(self) -> f64 {
        self.1
    }

    /// Destination point on a spherical Earth, from a bearing in degrees and
    /// a distance in meters.
    pub fn project(self, bearing_deg: f64, distance_m: f64) -> LatLon {
        let delta = distance_m * METER_TO_NM * NM_TO_RAD;
        let lat0 = self.0.to_radians();
        let bearing = bearing_deg.to_radians();
        let lat = (lat0.sin() * delta.cos() + lat0.cos() * delta.sin() * bearing.cos()).asin();
        let lon = ((self.1.to_radians() - (bearing.sin() * delta.sin() / lat.cos()).asin() + PI)
            % (2.0 * PI))
            - PI;
        LatLon(lat.to_degrees(), lon.to_degrees())
    }

    pub fn is_finite(self) -> bool {
        self.0.is_finite() && self.1.is_finite()
    }

    // Ex: ("N45 30.5", "E13 2.25")
    pub fn to_groundnet(self) -> (String, String) {
        (coord_str(self.0, 'N', 'S'), coord_str(self.1, 'E', 'W'))
    }
}

fn coord_str(value: f64, positive: char, negative: char) -> String {
    let hemi = if value.is_sign_positive() {
        positive
    } else {
        negative
    };
    let degrees = value.abs().trunc() as i32;
    let minutes = value.abs().fract() * 60.0;
    format!("{}{} {}", hemi, degrees, minutes)
}

/// Per-axis linear midpoint, not a geodesic one. The generated networks
/// depend on this exact placement.
pub fn midpoint(a: LatLon, b: LatLon) -> LatLon {
    LatLon(axis_mid(a.0, b.0), axis_mid(a.1, b.1))
}

fn axis_mid(p: f64, q: f64) -> f64 {
    if p > q {
        (p - q) / 2.0 + q
    } else {
        (q - p) / 2.0 + p
    }
}

/// Wraps a bearing that may have stepped past a full turn back into [0, 360).
pub fn wrap_bearing(deg: f64) -> f64 {
    if deg >= 360.0 {
        deg - 360.0
    } else {
        deg
    }
}

pub fn back_bearing(deg: f64) -> f64 {
    wrap_bearing(deg + 180.0)
}
