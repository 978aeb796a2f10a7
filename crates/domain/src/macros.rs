//! Macro for implementing Display and FromStr for wire-name enums
//!
//! API scopes and similar closed vocabularies travel as lowercase strings.
//! This macro maps each variant to its wire name in both directions, with
//! case-insensitive parsing.
//!
//! # Example
//!
//! ```rust
//! use vknet_domain::impl_wire_name_conversions;
//!
//! #[derive(Debug, Clone, Copy, PartialEq, Eq)]
//! pub enum Section {
//!     Audio,
//!     Video,
//! }
//!
//! impl_wire_name_conversions!(Section {
//!     Audio => "audio",
//!     Video => "video",
//! });
//!
//! assert_eq!(Section::Audio.to_string(), "audio");
//! assert_eq!("VIDEO".parse::<Section>(), Ok(Section::Video));
//! ```

/// Implements Display and FromStr traits for wire-name enums
///
/// This macro generates:
/// - Display trait: writes the wire name of the variant
/// - FromStr trait: parses case-insensitive strings to enum variants
///
/// # Arguments
///
/// * `$enum_name` - The name of the enum type
/// * `$variant => $str` - Mapping of enum variants to their lowercase wire
///   names
#[macro_export]
macro_rules! impl_wire_name_conversions {
    ($enum_name:ident { $($variant:ident => $str:expr),+ $(,)? }) => {
        impl std::fmt::Display for $enum_name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                match self {
                    $(Self::$variant => f.write_str($str),)+
                }
            }
        }

        impl std::str::FromStr for $enum_name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.to_lowercase().as_str() {
                    $($str => Ok(Self::$variant),)+
                    _ => Err(format!("Invalid {}: {}", stringify!($enum_name), s)),
                }
            }
        }
    };
}
