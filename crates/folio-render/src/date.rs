//! Relative date formatting.

use jiff::civil::Date;

/// Formats `start` relative to `today`, in days.
///
/// `start` is an ISO 8601 date, optionally followed by a time which is
/// ignored. Returns `None` if no date can be read from it.
pub fn relative_date(start: &str, today: Date) -> Option<String> {
    let date: Date = start.get(..10)?.parse().ok()?;
    let days = date.since(today).ok()?.get_days();

    let formatted = match days {
        0 => "Today".to_owned(),
        1 => "Tomorrow".to_owned(),
        -1 => "Yesterday".to_owned(),
        n if n > 1 => format!("In {n} days"),
        n => format!("{} days ago", -n),
    };
    Some(formatted)
}

#[cfg(test)]
mod tests {
    use jiff::civil::date;

    use super::*;

    #[test]
    fn test_relative_date() {
        let today = date(2024, 3, 10);

        assert_eq!(relative_date("2024-03-10", today).as_deref(), Some("Today"));
        assert_eq!(relative_date("2024-03-11", today).as_deref(), Some("Tomorrow"));
        assert_eq!(relative_date("2024-03-09", today).as_deref(), Some("Yesterday"));
        assert_eq!(relative_date("2024-03-15", today).as_deref(), Some("In 5 days"));
        assert_eq!(relative_date("2024-02-29", today).as_deref(), Some("10 days ago"));
    }

    #[test]
    fn test_relative_date_ignores_time() {
        let today = date(2024, 3, 10);
        assert_eq!(
            relative_date("2024-03-12T09:30:00.000+01:00", today).as_deref(),
            Some("In 2 days")
        );
    }

    #[test]
    fn test_relative_date_rejects_garbage() {
        let today = date(2024, 3, 10);
        assert!(relative_date("soon", today).is_none());
        assert!(relative_date("2024-13-45", today).is_none());
    }
}
