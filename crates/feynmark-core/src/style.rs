//! Closed style vocabularies.
//!
//! Tags arrive as free-form strings (CLI flags, generator JSON). Each enum parses leniently: an
//! unknown tag falls back to a harmless default instead of failing the whole edge.

use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! tag_enum {
    (@first $first:literal $(| $rest:literal)*) => {
        $first
    };
    (
        $(#[$meta:meta])*
        $name:ident, fallback = $fallback:ident {
            $($variant:ident => $($tag:literal)|+),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(rename_all = "snake_case", from = "String")]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            /// Parses a tag, falling back to the default variant for anything unknown.
            pub fn from_tag(tag: &str) -> Self {
                match tag.trim().to_ascii_lowercase().as_str() {
                    $($($tag)|+ => Self::$variant,)+
                    other => {
                        tracing::debug!(tag = other, kind = stringify!($name), "unknown style tag");
                        Self::$fallback
                    }
                }
            }

            pub fn as_str(self) -> &'static str {
                match self {
                    $(Self::$variant => tag_enum!(@first $($tag)|+)),+
                }
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                Self::from_tag(&value)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self::from_tag(value)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

tag_enum! {
    /// Particle kind carried by an edge; drives the stroke style.
    Particle, fallback = None {
        Photon => "photon",
        Gluon => "gluon",
        Boson => "boson",
        Ghost => "ghost",
        Scalar => "scalar",
        Fermion => "fermion",
        None => "none" | "",
        NoChange => "no_change",
    }
}

tag_enum! {
    VertexStyle, fallback = None {
        None => "none" | "",
        Dot => "dot",
        Blob => "blob",
        Square => "square",
    }
}

tag_enum! {
    /// Which endpoint(s) of a curve receive the vertex marker.
    VertexLocation, fallback = Both {
        Both => "both",
        Start => "start",
        End => "end",
        Left => "left",
        Right => "right",
        Up => "up",
        Down => "down",
    }
}

tag_enum! {
    /// Requested arrow orientation, either canonical or relative to the page.
    Orientation, fallback = Forward {
        None => "none" | "",
        Forward => "forward",
        Backward => "backward",
        Left => "left",
        Right => "right",
        Up => "up",
        Down => "down",
    }
}

impl Default for Particle {
    fn default() -> Self {
        Self::Photon
    }
}

impl Default for VertexStyle {
    fn default() -> Self {
        Self::None
    }
}

impl Default for VertexLocation {
    fn default() -> Self {
        Self::Both
    }
}

impl Default for Orientation {
    fn default() -> Self {
        Self::None
    }
}

impl Particle {
    /// Fermion-like edges carry a mid-curve arrow in assembled diagrams.
    pub fn is_fermion_like(self) -> bool {
        matches!(self, Self::Fermion)
    }
}

impl VertexStyle {
    /// Node styles that must be drawn exactly once per diagram.
    pub fn is_special(self) -> bool {
        matches!(self, Self::Blob)
    }
}

/// Canonical arrow direction relative to the path's own start and end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Forward,
    Backward,
}

impl Direction {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Forward => "forward",
            Self::Backward => "backward",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
