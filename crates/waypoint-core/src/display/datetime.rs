//! Timestamp formatting in the system time zone.

use std::fmt;

use jiff::{tz::TimeZone, Timestamp};

/// Formats a timestamp as `YYYY-MM-DD HH:MM:SS TZ` in the system time zone.
pub struct LocalDateTime<'a>(pub &'a Timestamp);

impl fmt::Display for LocalDateTime<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            self.0
                .to_zoned(TimeZone::system())
                .strftime("%Y-%m-%d %H:%M:%S %Z")
        )
    }
}

/// Formats only the civil date, `YYYY-MM-DD`, in the given time zone.
pub struct LocalDate<'a>(pub &'a Timestamp, pub &'a TimeZone);

impl fmt::Display for LocalDate<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.to_zoned(self.1.clone()).strftime("%Y-%m-%d"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn local_date_uses_the_given_zone() {
        let ts: Timestamp = "2026-03-01T02:30:00Z".parse().unwrap();
        assert_eq!(LocalDate(&ts, &TimeZone::UTC).to_string(), "2026-03-01");

        let eastern = TimeZone::fixed(jiff::tz::offset(-5));
        assert_eq!(LocalDate(&ts, &eastern).to_string(), "2026-02-28");
    }

    #[test]
    fn local_datetime_has_date_and_time() {
        let ts = Timestamp::from_second(1_640_995_200).unwrap();
        let output = LocalDateTime(&ts).to_string();
        assert!(output.contains(':'));
        assert!(output.len() >= 19);
    }
}
