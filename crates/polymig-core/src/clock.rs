use chrono::{DateTime, DurationRound, TimeDelta, Utc};

/// The only impurity in the translation kernel. Injected so tests can hold
/// the emitted `createTime`/`updateTime` fixed instead of comparing bit-exact
/// wall-clock values.
pub trait Clock {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
            .duration_round(TimeDelta::milliseconds(1))
            .unwrap_or_else(|_| Utc::now())
    }
}

#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}
