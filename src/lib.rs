//! # deckwright
//!
//! Natural-language editing of PowerPoint presentations.
//!
//! An instruction is turned into a structured [`EditPlan`] by a model, the
//! plan is validated against the presentation and applied through the
//! [`Deck`] helper API, and the result is rendered to PDF and reviewed.
//!
//! ## Quick Start
//!
//! ```no_run
//! use deckwright::{Deck, SlideLayout};
//!
//! let mut deck = Deck::create()?;
//! let slide = deck.add_slide(SlideLayout::TitleOnly, Some("Q3 Results"))?;
//! deck.add_text_box(
//!     slide,
//!     "Revenue up 12%",
//!     deckwright::Rect::from_points(72.0, 200.0, 400.0, 40.0),
//!     &Default::default(),
//! )?;
//! deck.save("q3.pptx")?;
//! # Ok::<(), deckwright::Error>(())
//! ```
//!
//! ## Pipeline
//!
//! ```no_run
//! use deckwright::{Converter, GeminiClient, Inspector, Modifier, Settings};
//! use std::path::Path;
//!
//! let settings = Settings::load(None)?;
//! let inspector = Inspector::new(Converter::detect(settings.convert_timeout), &settings.visuals_dir);
//! let client = GeminiClient::new(&settings.api_key, settings.base_url.as_deref(), settings.request_timeout)?;
//! let modifier = Modifier::new(client, &settings.text_model, &settings.vision_model)
//!     .with_temperature(settings.temperature);
//!
//! let path = Path::new("presentation.pptx");
//! let inspection = inspector.inspect(path)?;
//! let outcome = modifier.generate_and_apply("add a slide titled 'Q3 Results'", &inspection, path, false)?;
//! let review = modifier.verify("add a slide titled 'Q3 Results'", outcome.before.as_ref(), &inspector, path)?;
//! println!("{:?}", review);
//! # Ok::<(), deckwright::Error>(())
//! ```

pub mod config;
pub mod container;
pub mod convert;
pub mod deck;
pub mod detect;
pub mod error;
pub mod inspect;
pub mod llm;
pub mod lock;
pub mod model;
pub mod modify;
pub mod plan;
pub mod pptx;
pub mod prompt;

// Re-exports
pub use config::Settings;
pub use container::{OoxmlContainer, Relationship, Relationships};
pub use convert::{
    rendered_pdf_path, ConversionEngine, Converter, LibreOffice, PowerPointAutomation, Visual,
};
pub use deck::{distribute_horizontally, Deck, ImagePlacement, RoundedBox};
pub use detect::{detect_presentation_from_bytes, detect_presentation_from_path, PresentationKind};
pub use error::{Error, Result};
pub use inspect::{summarize, Inspection, Inspector};
pub use llm::{Attachment, GeminiClient, ModelBackend, ModelRequest};
pub use lock::LockState;
pub use model::{Presentation, Rect, Rgb, Shape, ShapeKind, Slide};
pub use modify::{EditOutcome, Modifier, Verification};
pub use plan::{ApplyReport, EditOp, EditPlan, ShapeRef, SlideTarget};
pub use pptx::shapes::{Align, ShapePreset, TextStyle};
pub use pptx::SlideLayout;
