//! Newtype identifiers for inventory records.
//!
//! The backend assigns opaque string identifiers (document IDs), so every ID
//! here wraps a `String`. Use the `define_id!` macro to create further
//! wrappers that cannot be mixed up with each other.

use chrono::{DateTime, Utc};

/// Macro to define a type-safe string ID wrapper.
///
/// Creates a newtype wrapper around `String` with:
/// - `Serialize`/`Deserialize` with `#[serde(transparent)]`
/// - `Debug`, `Clone`, `PartialEq`, `Eq`, `Hash`, `Default`
/// - Conversion methods: `new()`, `as_str()`, `is_empty()`
/// - `From<String>`, `From<&str>` and `Display` implementations
///
/// # Example
///
/// ```rust
/// # use toollink_core::define_id;
/// define_id!(OrderRef);
/// define_id!(DriverRef);
///
/// let order = OrderRef::new("ord-1");
/// let driver = DriverRef::new("ord-1");
///
/// // These are different types, so this won't compile:
/// // let _: OrderRef = driver;
/// assert_eq!(order.as_str(), driver.as_str());
/// ```
#[macro_export]
macro_rules! define_id {
    ($name:ident) => {
        #[derive(
            Debug,
            Clone,
            PartialEq,
            Eq,
            Hash,
            Default,
            PartialOrd,
            Ord,
            ::serde::Serialize,
            ::serde::Deserialize
        )]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Create a new ID from anything string-like.
            #[must_use]
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Get the underlying string value.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Whether the ID is blank (not yet assigned).
            #[must_use]
            pub fn is_empty(&self) -> bool {
                self.0.trim().is_empty()
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_owned())
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

define_id!(ItemId);
define_id!(Sku);

/// Prefix used when the category has no characters to borrow from.
const FALLBACK_SKU_PREFIX: &str = "ITM";

impl Sku {
    /// Generate a SKU from a category and a timestamp.
    ///
    /// Format: first three characters of the category, uppercased, a dash,
    /// then the last six digits of the millisecond timestamp.
    ///
    /// ```rust
    /// # use toollink_core::Sku;
    /// let at = chrono::DateTime::from_timestamp_millis(1_700_000_123_456).unwrap();
    /// assert_eq!(Sku::generate("Steel & Reinforcement", at).as_str(), "STE-123456");
    /// ```
    #[must_use]
    pub fn generate(category: &str, at: DateTime<Utc>) -> Self {
        let prefix: String = category.trim().chars().take(3).collect::<String>().to_uppercase();
        let prefix = if prefix.is_empty() {
            FALLBACK_SKU_PREFIX.to_owned()
        } else {
            prefix
        };
        let digits = at.timestamp_millis().rem_euclid(1_000_000);
        Self(format!("{prefix}-{digits:06}"))
    }
}
