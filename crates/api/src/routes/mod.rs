//! HTTP Routes

pub mod charts;
pub mod dataset;
pub mod model;
pub mod predictions;
