//! Macro for implementing Display and FromStr for status enums
//!
//! Job statuses, batch phases and error kinds all travel as lowercase strings
//! (logs, persisted JSON, CLI output). This macro keeps both directions of
//! that mapping in one place.
//!
//! # Example
//!
//! ```rust
//! use livegate_domain::impl_domain_status_conversions;
//!
//! #[derive(Debug, Clone, Copy, PartialEq, Eq)]
//! pub enum ProbeOutcome {
//!     Reachable,
//!     Unreachable,
//! }
//!
//! impl_domain_status_conversions!(ProbeOutcome {
//!     Reachable => "reachable",
//!     Unreachable => "unreachable",
//! });
//!
//! assert_eq!(ProbeOutcome::Reachable.to_string(), "reachable");
//! assert_eq!("UNREACHABLE".parse::<ProbeOutcome>(), Ok(ProbeOutcome::Unreachable));
//! ```

/// Implements Display and FromStr traits for status enums
///
/// This macro generates:
/// - Display trait: converts enum variants to their lowercase strings
/// - FromStr trait: parses case-insensitive strings to enum variants
///
/// # Arguments
///
/// * `$enum_name` - The name of the enum type
/// * `$variant => $str` - Mapping of enum variants to their string
///   representations (must be lowercase)
#[macro_export]
macro_rules! impl_domain_status_conversions {
    ($enum_name:ident { $($variant:ident => $str:literal),+ $(,)? }) => {
        impl ::std::fmt::Display for $enum_name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                match self {
                    $(Self::$variant => f.pad($str),)+
                }
            }
        }

        impl ::std::str::FromStr for $enum_name {
            type Err = String;

            fn from_str(s: &str) -> ::std::result::Result<Self, Self::Err> {
                match s.to_lowercase().as_str() {
                    $($str => Ok(Self::$variant),)+
                    _ => Err(format!("Invalid {}: {}", stringify!($enum_name), s)),
                }
            }
        }
    };
}
