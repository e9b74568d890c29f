//! Feature Engineering Engine
//!
//! Defines the six-field feature vector fed to the severity model and the
//! calendar encodings used to build it from user input.

mod day;
mod features;

pub use day::{DayOfWeek, UnknownDay};
pub use features::{
    FeatureVector, OutOfDomain, FEATURE_COLUMNS, FEATURE_DIMENSION, FEATURE_DOMAIN, FEATURE_FIELDS,
};
