//! Data model shared by the fragment collaborators and the analysis core.
//!
//! Fragments flow in from an extractor, outline records flow out to a
//! renderer. Neither side mutates the other's values.

mod fragment;
mod outline;

pub use fragment::{BoundingBox, Fragment, Point, TypographySignature};
pub use outline::{HeadingCandidate, HeadingLevel, OutlineRecord, TitleResult};
