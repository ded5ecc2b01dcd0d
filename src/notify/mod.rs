pub mod trigger;

pub use trigger::AdhanTrigger;
