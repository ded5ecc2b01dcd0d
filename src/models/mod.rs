pub mod hijri;
pub mod prayer;
pub mod timings;

pub use hijri::HijriDate;
pub use prayer::Prayer;
pub use timings::{PrayerWindow, Timings};
