use serde::{Deserialize, Serialize};
use std::{fmt, time::SystemTime};

/// An exact time and date used to represent absolute timelocks.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash, Deserialize, Serialize)]
#[serde(transparent)]
pub struct Timestamp(u32);

impl Timestamp {
    // This will work for the next 20 years
    #[allow(clippy::cast_possible_truncation)]
    pub fn now() -> Self {
        Timestamp(
            SystemTime::now()
                .duration_since(SystemTime::UNIX_EPOCH)
                .expect("SystemTime::duration_since failed")
                .as_secs() as u32,
        )
    }

    pub fn plus(self, duration: RelativeTime) -> Self {
        Self(self.0.saturating_add(duration.0))
    }

    pub fn minus(self, duration: RelativeTime) -> Self {
        Self(self.0.saturating_sub(duration.0))
    }
}

/// The u32 input is the number of seconds since epoch.
impl From<u32> for Timestamp {
    fn from(seconds: u32) -> Self {
        Timestamp(seconds)
    }
}

impl From<Timestamp> for u32 {
    fn from(timestamp: Timestamp) -> Self {
        timestamp.0
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A duration in seconds, used to represent relative timelocks (lock
/// durations) before they are anchored to an absolute point in time.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash, Deserialize, Serialize)]
#[serde(transparent)]
pub struct RelativeTime(u32);

impl RelativeTime {
    pub const fn new(seconds: u32) -> Self {
        RelativeTime(seconds)
    }

    pub fn is_zero(self) -> bool {
        self.0 == 0
    }

    pub fn plus(self, rhs: RelativeTime) -> Self {
        Self(self.0.saturating_add(rhs.0))
    }
}

impl From<u32> for RelativeTime {
    fn from(seconds: u32) -> Self {
        RelativeTime(seconds)
    }
}

impl From<RelativeTime> for u32 {
    fn from(time: RelativeTime) -> Self {
        time.0
    }
}

impl fmt::Display for RelativeTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}s", self.0)
    }
}
