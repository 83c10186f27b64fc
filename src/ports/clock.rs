use time::{Date, OffsetDateTime};

/// Source of "now". Status derivation and the schedule grid compare against
/// `today`, so tests pin it.
pub trait Clock: Send + Sync + 'static {
    fn now(&self) -> OffsetDateTime;

    fn today(&self) -> Date {
        self.now().date()
    }
}
