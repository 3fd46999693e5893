//! Core type definitions with validation.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Validation errors for core types.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// The provided value was empty.
    #[error("{field} cannot be empty")]
    Empty { field: &'static str },

    /// An event interval that does not move forward in time.
    #[error("event must start before it ends (start {start}, end {end})")]
    EmptyInterval {
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },

    /// Invalid payment method value.
    #[error("invalid payment method: {value}")]
    InvalidPaymentMethod { value: String },

    /// A calendar day that could not be parsed or is out of range.
    #[error("invalid day: {value}")]
    InvalidDay { value: String },
}

/// A way of paying at an eatery.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    /// Big Red Bucks, the campus dining debit balance.
    Brbs,
    /// Meal plan swipes.
    MealSwipes,
    Cash,
    Credit,
}

impl PaymentMethod {
    /// All payment methods in display order.
    pub const ALL: [Self; 4] = [Self::Brbs, Self::MealSwipes, Self::Cash, Self::Credit];

    /// String representation used in configuration and on the command line.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Brbs => "brbs",
            Self::MealSwipes => "meal_swipes",
            Self::Cash => "cash",
            Self::Credit => "credit",
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for PaymentMethod {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "brbs" => Ok(Self::Brbs),
            "meal_swipes" | "swipes" => Ok(Self::MealSwipes),
            "cash" => Ok(Self::Cash),
            "credit" => Ok(Self::Credit),
            _ => Err(ValidationError::InvalidPaymentMethod {
                value: s.to_string(),
            }),
        }
    }
}

/// Generates a validated string ID newtype with common trait implementations.
macro_rules! define_string_id {
    (
        $(#[$meta:meta])*
        $name:ident, $field_name:literal
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(String);

        impl $name {
            /// Creates a new ID after validation.
            pub fn new(id: impl Into<String>) -> Result<Self, ValidationError> {
                let id = id.into();
                if id.is_empty() {
                    return Err(ValidationError::Empty { field: $field_name });
                }
                Ok(Self(id))
            }

            /// Returns the ID as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl TryFrom<String> for $name {
            type Error = ValidationError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

define_string_id!(
    /// A validated eatery identifier.
    ///
    /// Eatery IDs must be non-empty strings. They key the per-user metadata
    /// (favorites) held outside the eatery aggregate.
    EateryId, "eatery ID"
);

define_string_id!(
    /// A validated account session identifier.
    ///
    /// Session IDs are issued by the account service and expire server-side
    /// without notice, which is why they are cached with a staleness bound.
    SessionId, "session ID"
);
