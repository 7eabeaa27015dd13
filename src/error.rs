//! Error types shared by the pricing core and its reference-data collaborators.
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum PricingError {
    #[error("Unsupported metal '{0}'")]
    UnsupportedMetal(String),
    /// A client-supplied graph input outside its domain, e.g. a negative or
    /// non-finite order weight.
    #[error("Invalid graph input '{field}': {value}")]
    InvalidGraphInput { field: &'static str, value: f64 },
    #[error("Copper fraction must be between 0 and 1, got {0}")]
    InvalidCopperFraction(f64),
    #[error("Invalid labour factor schedule: {0}")]
    InvalidLabourSchedule(String),
    #[error("Rod length {length} is below the first labour factor breakpoint {min}")]
    LengthOutOfRange { length: f64, min: f64 },
    #[error("Price must be a positive numeric value, got {price} for {metal}")]
    InvalidPrice { metal: String, price: f64 },
    #[error("No market price for {metal} (quality {quality})")]
    MissingPrice { metal: String, quality: String },
}

pub type Result<T> = std::result::Result<T, PricingError>;
