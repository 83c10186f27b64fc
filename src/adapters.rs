use time::{Date, OffsetDateTime, PrimitiveDateTime, Time};

use crate::ports;

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl ports::Clock for SystemClock {
    fn now(&self) -> OffsetDateTime {
        OffsetDateTime::now_utc()
    }
}

/// Clock pinned to a calendar date at midnight UTC.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock {
    now: OffsetDateTime,
}

impl FixedClock {
    pub fn on(date: Date) -> Self {
        Self {
            now: PrimitiveDateTime::new(date, Time::MIDNIGHT).assume_utc(),
        }
    }
}

impl ports::Clock for FixedClock {
    fn now(&self) -> OffsetDateTime {
        self.now
    }
}

#[cfg(test)]
#[allow(non_snake_case)]
mod tests {
    use super::*;
    use crate::ports::Clock;
    use crate::types::dates::parse_iso_date;

    #[test]
    fn fixed_clock__should_report_pinned_date() {
        // Given
        let date = parse_iso_date("2025-02-10").expect("date");

        // When
        let clock = FixedClock::on(date);

        // Then
        assert_eq!(clock.today(), date);
        assert_eq!(clock.now().unix_timestamp(), 1_739_145_600);
    }
}
