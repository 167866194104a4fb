//! Read entities definitions.

pub mod geocoding;
pub mod rental;
