//! Needle planning for normalized cross-correlation.

mod plan;

pub use plan::TemplatePlan;
