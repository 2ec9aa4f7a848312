#![deny(missing_docs)]
#![deny(missing_copy_implementations)]
#![deny(trivial_casts)]
#![deny(trivial_numeric_casts)]
#![deny(unused_import_braces)]
#![deny(unused_qualifications)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]

//! This crate prices 3D print jobs: given material, energy, machine, and
//! labor parameters it produces an itemized cost breakdown and a total.
//!
//! The pricing itself is [compute], a pure function. Around it sit the
//! pieces a host needs to drive it from user input: text coercion
//! ([input]), an editable form that recomputes on every change ([form]),
//! table rendering ([render]), a line-driven editing loop ([session]),
//! configuration ([config]), and an HTTP API ([server]).

pub mod config;
mod cost;
pub mod form;
pub mod input;
pub mod render;
pub mod server;
pub mod session;

#[cfg(test)]
mod tests;

pub use cost::{compute, CostBreakdown, CostInputs, LineItem, DESIGN_MODIFICATION_FEE};
