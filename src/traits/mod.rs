//! Core traits for the simulation engine
//!
//! Each trait marks a seam where receiver algorithms are interchangeable.

mod decoder;

pub use decoder::SymbolDecoder;
