//! Command-line front end for emergency department visit log analysis.

#![allow(missing_docs)]

pub mod cli;
pub mod commands;
pub mod logging;
pub mod summary;
pub mod types;
