//! Identifier newtypes shared across the widget, dashboard and backend client
//!
//! Backend ids are opaque strings. An absent id and an empty or
//! whitespace-only id are treated the same way: as no id at all. Any other
//! id is passed through unchanged.

use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! opaque_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Wrap a raw id, returning `None` when it is empty or blank
            ///
            /// A non-blank id is kept exactly as given.
            pub fn parse(raw: impl AsRef<str>) -> Option<Self> {
                let raw = raw.as_ref();
                if raw.trim().is_empty() {
                    None
                } else {
                    Some(Self(raw.to_string()))
                }
            }

            /// Wrap an optional raw id, folding empty values into `None`
            pub fn parse_optional<S: AsRef<str>>(raw: Option<S>) -> Option<Self> {
                raw.and_then(|r| Self::parse(r))
            }

            /// Borrow the raw id
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consume into the raw id
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

opaque_id!(
    /// Tenant identifier supplied by the embedding page
    OrganizationId
);

opaque_id!(
    /// Contact session identifier, scoped to one organization
    ContactSessionId
);

opaque_id!(
    /// Conversation identifier
    ConversationId
);
