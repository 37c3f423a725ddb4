mod trigger;

pub use trigger::*;
