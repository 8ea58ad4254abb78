//! Per-type value generators used by the field binder.

pub mod keyword;
pub mod network;
pub mod numeric;
pub mod static_value;
pub mod timestamp;
pub mod words;
