//! Identifier newtypes for desks and time blocks.
//!
//! Both are opaque labels: equality is plain string equality. They still need
//! a total order so that tie-breaking and output are reproducible, and input
//! files usually carry integers (`101`, `2`, `10`), so the order is
//! numeric-aware: labels that parse as integers sort by value and come before
//! every other label, which sort lexicographically.

use std::cmp::Ordering;
use std::fmt;

/// Numeric-aware total order over labels.
///
/// Integer labels compare by value, falling back to the raw text so that
/// `"01"` and `"1"` stay distinct. Integer labels sort before textual ones.
pub fn compare_labels(a: &str, b: &str) -> Ordering {
    match (a.parse::<i64>(), b.parse::<i64>()) {
        (Ok(x), Ok(y)) => x.cmp(&y).then_with(|| a.cmp(b)),
        (Ok(_), Err(_)) => Ordering::Less,
        (Err(_), Ok(_)) => Ordering::Greater,
        (Err(_), Err(_)) => a.cmp(b),
    }
}

macro_rules! label_type {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash)]
        pub struct $name(String);

        impl $name {
            pub fn new(label: impl Into<String>) -> Self {
                Self(label.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl Ord for $name {
            fn cmp(&self, other: &Self) -> Ordering {
                compare_labels(&self.0, &other.0)
            }
        }

        impl PartialOrd for $name {
            fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
                Some(self.cmp(other))
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(label: &str) -> Self {
                Self::new(label)
            }
        }

        impl From<String> for $name {
            fn from(label: String) -> Self {
                Self(label)
            }
        }

        impl From<u32> for $name {
            fn from(label: u32) -> Self {
                Self(label.to_string())
            }
        }

        #[cfg(feature = "serde")]
        impl serde::Serialize for $name {
            fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
            where
                S: serde::Serializer,
            {
                serializer.serialize_str(&self.0)
            }
        }

        #[cfg(feature = "serde")]
        impl<'de> serde::Deserialize<'de> for $name {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: serde::Deserializer<'de>,
            {
                RawLabel::deserialize(deserializer).map(|raw| Self(raw.into_string()))
            }
        }
    };
}

/// Labels arrive as JSON/YAML strings or integers.
#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
#[serde(untagged)]
enum RawLabel {
    Int(i64),
    Text(String),
}

#[cfg(feature = "serde")]
impl RawLabel {
    fn into_string(self) -> String {
        match self {
            RawLabel::Int(n) => n.to_string(),
            RawLabel::Text(s) => s,
        }
    }
}

label_type!(
    /// Unique identifier of a physical desk.
    DeskId
);

label_type!(
    /// Opaque scheduling slot. Only equality carries meaning; the order exists
    /// for reproducible output.
    TimeBlock
);
