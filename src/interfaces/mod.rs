//! Readers turning external files into domain values.

pub mod csv;
pub mod json;
