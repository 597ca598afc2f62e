use std::{
    iter::Sum,
    ops::{Add, AddAssign},
};

use chrono::Utc;

/// Travel duration as reported by the routing provider, in whole seconds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct Duration(u64);

impl From<u64> for Duration {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

impl Add for Duration {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0.saturating_add(rhs.0))
    }
}

impl AddAssign for Duration {
    fn add_assign(&mut self, rhs: Self) {
        self.0 = self.0.saturating_add(rhs.0)
    }
}

impl Sum for Duration {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::default(), |total, duration| total + duration)
    }
}

impl Duration {
    pub const fn from_seconds(secs: u64) -> Self {
        Self(secs)
    }

    pub const fn from_minutes(minutes: u64) -> Self {
        Self(minutes.saturating_mul(60))
    }

    pub const fn as_seconds(&self) -> u64 {
        self.0
    }

    /// Whole minutes, half a minute rounds up.
    pub const fn as_rounded_minutes(&self) -> u64 {
        self.0.saturating_add(30) / 60
    }

    /// "M min" under an hour, "H hr M min" from an hour on.
    pub fn to_travel_string(&self) -> String {
        let minutes = self.as_rounded_minutes();
        if minutes >= 60 {
            format!("{} hr {} min", minutes / 60, minutes % 60)
        } else {
            format!("{minutes} min")
        }
    }
}

/// Unix epoch seconds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct Timestamp(i64);

impl From<i64> for Timestamp {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl Timestamp {
    pub fn now() -> Self {
        Self(Utc::now().timestamp())
    }

    pub const fn as_seconds(&self) -> i64 {
        self.0
    }
}

#[test]
fn rounding_half_minute_up() {
    assert_eq!(Duration::from_seconds(29).as_rounded_minutes(), 0);
    assert_eq!(Duration::from_seconds(30).as_rounded_minutes(), 1);
    assert_eq!(Duration::from_seconds(89).as_rounded_minutes(), 1);
}

#[test]
fn travel_string_under_an_hour() {
    assert_eq!(Duration::from_seconds(0).to_travel_string(), "0 min");
    assert_eq!(Duration::from_minutes(59).to_travel_string(), "59 min");
}

#[test]
fn travel_string_hours() {
    assert_eq!(Duration::from_minutes(60).to_travel_string(), "1 hr 0 min");
    assert_eq!(Duration::from_seconds(5400).to_travel_string(), "1 hr 30 min");
}

#[test]
fn sum_of_legs() {
    let total: Duration = [600, 900].into_iter().map(Duration::from_seconds).sum();
    assert_eq!(total.as_seconds(), 1500);
}

#[test]
fn huge_durations_saturate() {
    assert_eq!(Duration::from_seconds(u64::MAX).as_rounded_minutes(), u64::MAX / 60);
    assert_eq!(Duration::from_minutes(u64::MAX).as_seconds(), u64::MAX);
    let total: Duration = [u64::MAX, 600].into_iter().map(Duration::from_seconds).sum();
    assert_eq!(total.as_seconds(), u64::MAX);
    assert!(Duration::from_seconds(u64::MAX).to_travel_string().ends_with(" min"));
}

#[test]
fn now_is_after_2020() {
    assert!(Timestamp::now().as_seconds() > 1_577_836_800);
}
