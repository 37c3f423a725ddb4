pub mod triggers;
