//! Row parsing and synchronous text detectors.
//!
//! [`parse_products`] turns delimited text into [`qm_core::ProductRecord`]s and
//! [`DetectorSet`] runs the vendor, phone and custom-pattern detectors over a
//! single product. Everything here is pure and synchronous.

pub mod error;
pub mod rows;
pub mod text;

pub use error::DetectError;
pub use rows::parse_products;
pub use text::{compile_custom_patterns, detect_phone, detect_vendor, CustomPattern, DetectorSet};
