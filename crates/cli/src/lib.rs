//! fontmill CLI library.

pub mod cli;
