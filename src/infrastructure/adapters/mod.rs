//! Chat client adapters

pub mod console;
