//! PresentationML support: reading slide parts, splicing edits into them,
//! and the blank template for new presentations.

pub mod reader;
pub mod shapes;
pub mod template;
pub mod xml;

pub use reader::{parse_presentation, parse_slide, PresentationInfo, ShapeEntry, SlideDoc};
pub use template::{blank_presentation, SlideLayout};
