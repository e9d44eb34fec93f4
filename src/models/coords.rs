use serde::Serialize;

/// GPS fix attached to a clock event. Stored as given; range checks
/// happen where user input is parsed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
    pub accuracy: Option<f64>,
}

impl Coordinates {
    pub fn new(lat: f64, lng: f64, accuracy: Option<f64>) -> Self {
        Self { lat, lng, accuracy }
    }

    /// Build from nullable DB columns: both lat and lng must be present.
    pub fn from_columns(lat: Option<f64>, lng: Option<f64>, accuracy: Option<f64>) -> Option<Self> {
        match (lat, lng) {
            (Some(lat), Some(lng)) => Some(Self { lat, lng, accuracy }),
            _ => None,
        }
    }

    pub fn short(&self) -> String {
        format!("{:.5},{:.5}", self.lat, self.lng)
    }
}
