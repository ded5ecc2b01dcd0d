pub mod client;
pub mod provider;
pub mod schedule;

pub use client::{AladhanClient, DayTimings, FetchError, TimingsRequest, TimingsSource};
pub use provider::{FetchState, PrayerTimesProvider};
pub use schedule::{next_prayer, Clock, NextPrayer, SystemClock};
