//! Plain-text rendering of session history.

use somnus_types::{Quality, SleepSession};

/// Render a newest-first session list as a readable summary.
pub fn format_history(sessions: &[SleepSession]) -> String {
    if sessions.is_empty() {
        return "No sleep recorded yet.".to_string();
    }

    let mut out = format!("{} session(s) recorded\n", sessions.len());
    for session in sessions {
        match session.duration_ms() {
            Some(ms) => {
                out.push_str(&format!(
                    "{} ({})\n",
                    format_duration(ms),
                    quality_label(session.quality)
                ));
            }
            None => out.push_str("in progress\n"),
        }
    }

    out
}

/// Format a duration in human-readable format
#[must_use]
pub fn format_duration(ms: i64) -> String {
    let minutes = ms / 60_000;
    format!("{}h {}m", minutes / 60, minutes % 60)
}

fn quality_label(rating: i64) -> &'static str {
    match Quality::try_from(rating) {
        Ok(quality) => quality.label(),
        Err(_) => "unrated",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_history() {
        assert_eq!(format_history(&[]), "No sleep recorded yet.");
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(0), "0h 0m");
        assert_eq!(format_duration(45 * 60_000), "0h 45m");
        assert_eq!(format_duration(8 * 3_600_000 + 12 * 60_000), "8h 12m");
    }

    #[test]
    fn test_completed_session_line() {
        let session = SleepSession {
            id: 1,
            start_time: 0,
            end_time: 8 * 3_600_000,
            quality: 5,
        };

        let text = format_history(&[session]);
        assert!(text.contains("1 session(s) recorded"));
        assert!(text.contains("8h 0m (excellent)"));
    }

    #[test]
    fn test_unrated_session_line() {
        let session = SleepSession {
            id: 1,
            start_time: 0,
            end_time: 60_000,
            quality: -1,
        };

        assert!(format_history(&[session]).contains("0h 1m (unrated)"));
    }

    #[test]
    fn test_in_progress_session_line() {
        let session = SleepSession::begin(1000);
        assert!(format_history(&[session]).contains("in progress"));
    }
}
