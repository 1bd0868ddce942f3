//! Candidate selection and pruning utilities.
//!
//! Includes peak extraction from correlation surfaces and disjoint-box
//! suppression for exact matches.

pub(crate) mod overlap;
pub(crate) mod peaks;
