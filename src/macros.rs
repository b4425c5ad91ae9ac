//! # Identifier Macros
//!
//! Declarative macros for the name-like newtypes used across the crate.
//! Workflow ids, state names and transition names are all non-empty trimmed
//! strings; keeping them as distinct types stops a state name from being
//! passed where a transition name is expected.

/// Declare a non-empty string identifier newtype.
///
/// The generated type validates on construction, serializes as a plain string
/// and implements `Display`, `FromStr`, `AsRef<str>` and `Borrow<str>`.
///
/// # Examples
///
/// ```ignore
/// lifecycle_identifier! {
///     /// Name of a lifecycle state
///     StateName, "state name"
/// }
/// ```
#[macro_export]
macro_rules! lifecycle_identifier {
    ($(#[$meta:meta])* $name:ident, $kind:literal) => {
        $(#[$meta])*
        #[derive(
            Debug,
            Clone,
            PartialEq,
            Eq,
            Hash,
            PartialOrd,
            Ord,
            serde::Serialize,
            serde::Deserialize,
        )]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(String);

        impl $name {
            /// Create a validated identifier. Surrounding whitespace is trimmed.
            pub fn new(value: impl AsRef<str>) -> $crate::error::GateResult<Self> {
                let trimmed = value.as_ref().trim();
                if trimmed.is_empty() {
                    return Err($crate::error::GateError::EmptyIdentifier { kind: $kind });
                }
                Ok(Self(trimmed.to_string()))
            }

            /// Construct from a value already known to be non-empty, such as a
            /// crate constant
            #[allow(dead_code)]
            pub(crate) fn new_unchecked(value: impl Into<String>) -> Self {
                Self(value.into())
            }

            /// Borrow the identifier as a string slice
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl std::str::FromStr for $name {
            type Err = $crate::error::GateError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::new(s)
            }
        }

        impl TryFrom<String> for $name {
            type Error = $crate::error::GateError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                value.0
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl std::borrow::Borrow<str> for $name {
            fn borrow(&self) -> &str {
                &self.0
            }
        }
    };
}

/// Declare a numeric id newtype for entities, actors and organizations.
#[macro_export]
macro_rules! numeric_id {
    ($(#[$meta:meta])* $name:ident, $prefix:literal) => {
        $(#[$meta])*
        #[derive(
            Debug,
            Clone,
            Copy,
            PartialEq,
            Eq,
            Hash,
            PartialOrd,
            Ord,
            serde::Serialize,
            serde::Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(pub u64);

        impl $name {
            /// Raw numeric value
            pub fn value(self) -> u64 {
                self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, concat!($prefix, ":{}"), self.0)
            }
        }

        impl From<u64> for $name {
            fn from(value: u64) -> Self {
                Self(value)
            }
        }
    };
}
