//! Input Validation
//!
//! Turns raw, possibly incomplete user input into a `FeatureVector`, enforcing
//! the domain of every field, and describes the input form the dashboard shows.

mod error;
mod form;
mod validator;

pub use error::ValidationError;
pub use form::{FormSchema, WidgetKind, WidgetSpec};
pub use validator::{DayInput, RawFeatures, ValidationConfig, ValidationResult, Validator};
