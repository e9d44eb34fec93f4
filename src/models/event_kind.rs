use serde::Serialize;

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    ClockIn,
    ClockOut,
}

impl EventKind {
    /// Parse user input. Accepts the short and long spellings the web
    /// client used to send: `in`, `clockin`, `clock_in` (and `out` likewise).
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "in" | "clockin" | "clock_in" => Some(Self::ClockIn),
            "out" | "clockout" | "clock_out" => Some(Self::ClockOut),
            _ => None,
        }
    }

    /// Convert enum → DB string
    pub fn to_db_str(&self) -> &'static str {
        match self {
            EventKind::ClockIn => "clock_in",
            EventKind::ClockOut => "clock_out",
        }
    }

    /// Convert DB string → enum
    pub fn from_db_str(s: &str) -> Option<Self> {
        match s {
            "clock_in" => Some(EventKind::ClockIn),
            "clock_out" => Some(EventKind::ClockOut),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            EventKind::ClockIn => "in",
            EventKind::ClockOut => "out",
        }
    }

    pub fn is_in(&self) -> bool {
        matches!(self, EventKind::ClockIn)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_accepts_client_aliases() {
        for s in ["in", "IN", "clockin", "Clock_In", " in "] {
            assert_eq!(EventKind::parse(s), Some(EventKind::ClockIn), "{s}");
        }
        for s in ["out", "clockout", "CLOCK_OUT"] {
            assert_eq!(EventKind::parse(s), Some(EventKind::ClockOut), "{s}");
        }
        assert_eq!(EventKind::parse("lunch"), None);
        assert_eq!(EventKind::parse(""), None);
    }

    #[test]
    fn db_strings_are_stable() {
        assert_eq!(EventKind::ClockIn.to_db_str(), "clock_in");
        assert_eq!(EventKind::from_db_str("clock_out"), Some(EventKind::ClockOut));
        assert_eq!(EventKind::from_db_str("out"), None);
    }
}
