//! Headless core for Qt Linguist translation catalogs (`.ts`).
//!
//! Parses catalogs into a flat entry list, checks their integrity, reports
//! lrelease-style statistics and writes them back in lupdate's canonical layout.

pub mod config;
pub mod error;
pub mod model;
pub mod parsers;
pub mod protocol;
pub mod services;
