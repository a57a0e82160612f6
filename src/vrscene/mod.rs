//! Scene-description records.
//!
//! Writers build typed [`Record`](record::Record) trees; [`Formatter`](format::Formatter) turns
//! them into text, and [`scan`](scan::scan) reads that text back.

pub mod format;
pub mod record;
pub mod scan;
