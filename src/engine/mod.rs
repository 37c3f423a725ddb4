//! Trigger logic written once against [`crate::db::store::TriggerStore`].

pub mod catalog;
pub mod resolution;
pub mod seed;
pub mod stats;
