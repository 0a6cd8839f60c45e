//! Report assembly.
//!
//! Deterministic rendering of the valuation, attributes, market context and
//! comparables into a paginated, printable document. The output is a plain
//! byte payload consumed by the caller and never re-parsed by this engine.

pub mod labels;
pub mod renderer;

pub use labels::{attribute_rows, label_dictionary, methodology, report_title, DISCLAIMER, MARKET_FACTORS};
pub use renderer::render;
