//! Formatting utilities used for CLI and export outputs.

pub fn bold(s: &str) -> String {
    format!("\x1b[1m{}\x1b[0m", s)
}

/// Seconds → `HH:MM:SS`. Negative values render as zero; hours are not
/// wrapped at 24.
pub fn format_duration(seconds: i64) -> String {
    let total = seconds.max(0);
    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let secs = total % 60;
    format!("{:02}:{:02}:{:02}", hours, minutes, secs)
}

/// Seconds → `+1h 30m` style, used in the clock summary lines.
pub fn secs2readable(seconds: i64) -> String {
    let total = seconds.max(0);
    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    if hours > 0 {
        format!("{}h {:02}m", hours, minutes)
    } else if minutes > 0 {
        format!("{}m", minutes)
    } else {
        format!("{}s", total)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duration_formats() {
        assert_eq!(format_duration(0), "00:00:00");
        assert_eq!(format_duration(3661), "01:01:01");
        assert_eq!(format_duration(-5), "00:00:00");
        assert_eq!(format_duration(90_000), "25:00:00");
    }

    #[test]
    fn readable_formats() {
        assert_eq!(secs2readable(45), "45s");
        assert_eq!(secs2readable(1800), "30m");
        assert_eq!(secs2readable(5400), "1h 30m");
    }
}
