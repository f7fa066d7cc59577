use time::OffsetDateTime;

/// Source of "now" in milliseconds since the Unix epoch.
pub trait Clock {
    fn now_millis(&self) -> i64;
}

pub struct SystemClock;

impl Clock for SystemClock {
    fn now_millis(&self) -> i64 {
        (OffsetDateTime::now_utc().unix_timestamp_nanos() / 1_000_000) as i64
    }
}

/// Clock that advances by a fixed step on every reading.
#[cfg(test)]
pub(crate) struct SteppingClock {
    next: std::cell::Cell<i64>,
    step: i64,
}

#[cfg(test)]
impl SteppingClock {
    pub(crate) fn new(start: i64, step: i64) -> Self {
        Self {
            next: std::cell::Cell::new(start),
            step,
        }
    }
}

#[cfg(test)]
impl Clock for SteppingClock {
    fn now_millis(&self) -> i64 {
        let value = self.next.get();
        self.next.set(value + self.step);
        value
    }
}
