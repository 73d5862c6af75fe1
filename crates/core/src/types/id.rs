//! Newtype IDs for type-safe document references.
//!
//! Content documents are keyed by opaque strings (e.g. `"product-42"` or a
//! generated UUID), so every ID here wraps a `String`. The `define_id!` macro
//! keeps product, order and user identifiers from being mixed up.

/// Macro to define a type-safe, string-backed ID wrapper.
///
/// Creates a newtype around `String` with:
/// - `Serialize`/`Deserialize` with `#[serde(transparent)]`
/// - `Debug`, `Clone`, `PartialEq`, `Eq`, `Hash`, `PartialOrd`, `Ord`
/// - `new()`, `as_str()`, `into_inner()`
/// - `Display`, `AsRef<str>`, `From<String>` and `From<&str>`
///
/// # Example
///
/// ```rust
/// # use lounge_core::define_id;
/// define_id!(SofaId);
/// define_id!(ChairId);
///
/// let sofa = SofaId::new("sofa-1");
/// assert_eq!(sofa.as_str(), "sofa-1");
///
/// // These are different types, so this won't compile:
/// // let _: ChairId = sofa;
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
            PartialOrd,
            Ord,
            ::serde::Serialize,
            ::serde::Deserialize
        )]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Create a new ID from any string-like value.
            #[must_use]
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Borrow the underlying string.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consume the ID and return the underlying string.
            #[must_use]
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
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
    };
}

define_id!(ProductId);
define_id!(OrderId);
define_id!(UserId);

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_serialize_as_plain_strings() {
        let id = ProductId::new("chair-7");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"chair-7\"");

        let parsed: OrderId = serde_json::from_str("\"order-1\"").unwrap();
        assert_eq!(parsed.as_str(), "order-1");
    }

    #[test]
    fn test_display_matches_inner() {
        let id = UserId::from("guest");
        assert_eq!(id.to_string(), "guest");
        assert_eq!(id.into_inner(), "guest");
    }
}
