//! Read model for presentations.
//!
//! These structures are snapshots of the slide XML taken by the reader.
//! They are used to render the inspection summary and to resolve the shape
//! references found in edit plans. Edits never go through them; the
//! [`Deck`](crate::deck::Deck) rewrites the package parts directly.

mod geometry;
mod slide;

pub use geometry::*;
pub use slide::*;
