//! Dashboard utilities — status bar formatting.

use std::time::Duration;

/// Format a countdown as `m:ss`.
pub fn format_countdown(remaining: Duration) -> String {
    let secs = remaining.as_secs();
    format!("{}:{:02}", secs / 60, secs % 60)
}

/// Format the age of the last snapshot for human display.
pub fn format_age(age: Duration) -> String {
    let secs = age.as_secs();
    if secs >= 3600 {
        format!("{}h ago", secs / 3600)
    } else if secs >= 60 {
        format!("{}m ago", secs / 60)
    } else {
        format!("{secs}s ago")
    }
}

/// "3 of 10 contacts" — rows shown vs rows in the snapshot.
pub fn format_row_count(shown: usize, total: usize) -> String {
    let noun = if total == 1 { "contact" } else { "contacts" };
    if shown == total {
        format!("{total} {noun}")
    } else {
        format!("{shown} of {total} {noun}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn countdown_pads_seconds() {
        assert_eq!(format_countdown(Duration::from_secs(65)), "1:05");
        assert_eq!(format_countdown(Duration::from_secs(120)), "2:00");
        assert_eq!(format_countdown(Duration::ZERO), "0:00");
    }

    #[test]
    fn age_seconds() {
        assert_eq!(format_age(Duration::from_millis(4200)), "4s ago");
    }

    #[test]
    fn age_minutes_and_hours() {
        assert_eq!(format_age(Duration::from_secs(130)), "2m ago");
        assert_eq!(format_age(Duration::from_secs(7300)), "2h ago");
    }

    #[test]
    fn row_count_filtered() {
        assert_eq!(format_row_count(3, 10), "3 of 10 contacts");
    }

    #[test]
    fn row_count_unfiltered() {
        assert_eq!(format_row_count(1, 1), "1 contact");
        assert_eq!(format_row_count(0, 0), "0 contacts");
    }
}
