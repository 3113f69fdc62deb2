//! Terminal output helpers

pub mod colors;
