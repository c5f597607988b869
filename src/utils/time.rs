/// Format a millisecond count as `HH:MM:SS`.
///
/// Integer truncation only — fractional seconds are dropped and the hour
/// field simply widens past 99 hours.
pub fn format_milliseconds(ms: u64) -> String {
    let total_seconds = ms / 1000;
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;
    format!("{:02}:{:02}:{:02}", hours, minutes, seconds)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_milliseconds() {
        assert_eq!(format_milliseconds(0), "00:00:00");
        assert_eq!(format_milliseconds(59_999), "00:00:59");
        assert_eq!(format_milliseconds(3_661_000), "01:01:01");
    }

    #[test]
    fn hour_field_widens_past_two_digits() {
        assert_eq!(format_milliseconds(360_000_000), "100:00:00");
    }
}
