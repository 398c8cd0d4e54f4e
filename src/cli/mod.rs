//! Wiring for the `rscmd` binary: the generator CLI built on the
//! framework itself.

pub mod commands;
pub mod output;
