//! Instruction → edit plan → saved presentation → review.

use crate::convert::Visual;
use crate::deck::Deck;
use crate::error::{Error, Result};
use crate::inspect::{Inspection, Inspector};
use crate::llm::{Attachment, ModelBackend, ModelRequest};
use crate::lock;
use crate::model::emu_to_points;
use crate::plan::{ApplyReport, EditPlan};
use crate::prompt;
use std::path::Path;

/// Feedback used when the reviewer returns nothing.
pub const NO_FEEDBACK: &str = "No feedback.";

/// Result of a successful edit.
#[derive(Debug, Clone)]
pub struct EditOutcome {
    /// Model that produced the plan
    pub model: String,
    /// The applied plan
    pub plan: EditPlan,
    /// What the plan did
    pub report: ApplyReport,
    /// The file did not exist and was created
    pub created: bool,
    /// Rendering of the presentation before the edit, when one existed
    pub before: Option<Attachment>,
}

/// Outcome of the post-edit review.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verification {
    /// No rendering was available; only the text summary was checked
    TextOnly(String),
    /// The vision model reviewed the rendering
    Reviewed {
        /// The reviewer reported no problems
        passed: bool,
        /// Reviewer text
        feedback: String,
    },
}

/// Whether reviewer feedback reads as a pass.
pub fn feedback_passes(feedback: &str) -> bool {
    let lower = feedback.to_lowercase();
    lower.contains("no issues") || lower.contains("looks good")
}

/// Drives edits through a model backend.
pub struct Modifier<B> {
    backend: B,
    text_model: String,
    vision_model: String,
    temperature: Option<f32>,
}

impl<B: ModelBackend> Modifier<B> {
    /// Create a modifier using `text_model` without a rendering and
    /// `vision_model` with one.
    pub fn new(backend: B, text_model: impl Into<String>, vision_model: impl Into<String>) -> Self {
        Self {
            backend,
            text_model: text_model.into(),
            vision_model: vision_model.into(),
            temperature: None,
        }
    }

    /// Sampling temperature sent with every request; the model default
    /// applies when unset.
    pub fn with_temperature(mut self, temperature: Option<f32>) -> Self {
        self.temperature = temperature;
        self
    }

    /// The backend in use.
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Ask the model for an edit plan and apply it to `path`.
    ///
    /// Nothing is written unless every operation applied; the save is
    /// atomic. A missing file is created from the blank template. With
    /// `debug` set the raw model response is printed to stderr.
    pub fn generate_and_apply(
        &self,
        instruction: &str,
        inspection: &Inspection,
        path: &Path,
        debug: bool,
    ) -> Result<EditOutcome> {
        lock::ensure_unlocked(path)?;

        let created = !path.exists();
        let mut deck = if created { Deck::create()? } else { Deck::open(path)? };

        let pdf = inspection.visual.pdf().filter(|p| p.exists());
        let model = match pdf {
            Some(_) => &self.vision_model,
            None => &self.text_model,
        };
        tracing::info!(model = %model, visual = pdf.is_some(), "requesting edit plan");

        let before = pdf.and_then(|pdf| match Attachment::pdf(pdf) {
            Ok(attachment) => Some(attachment),
            Err(e) => {
                tracing::warn!(pdf = %pdf.display(), error = %e, "could not attach rendering");
                None
            }
        });

        let (width, height) = deck.slide_size();
        let request = ModelRequest {
            model: model.clone(),
            prompt: prompt::generation_prompt(
                instruction,
                &inspection.summary,
                (emu_to_points(width), emu_to_points(height)),
                pdf.is_some(),
            ),
            attachments: before.iter().cloned().collect(),
            json_output: true,
            temperature: self.temperature,
        };

        let raw = self
            .backend
            .generate(&request)
            .map_err(|e| Error::Generation(e.to_string()))?;

        if debug {
            eprintln!("\n[DEBUG] Generated edit plan:\n{}\n{}\n{}\n", "=".repeat(60), raw.trim(), "=".repeat(60));
        }

        let plan = EditPlan::parse(&raw)?;
        plan.validate(deck.slide_count())?;
        let report = plan.apply(&mut deck)?;

        // The file may have been opened while the model was thinking.
        lock::ensure_unlocked(path)?;
        deck.save(path)?;
        tracing::info!(operations = report.applied, path = %path.display(), "edit plan applied");

        Ok(EditOutcome {
            model: model.clone(),
            plan,
            report,
            created,
            before,
        })
    }

    /// Re-inspect `path` and have the vision model review the rendering.
    ///
    /// With `before` (the pre-edit rendering from [`EditOutcome::before`])
    /// the reviewer receives both PDFs, before first, and compares them.
    pub fn verify(
        &self,
        instruction: &str,
        before: Option<&Attachment>,
        inspector: &Inspector,
        path: &Path,
    ) -> Result<Verification> {
        let inspection = inspector
            .inspect(path)
            .map_err(|e| Error::Verification(e.to_string()))?;

        let pdf = match &inspection.visual {
            Visual::Pdf(pdf) => pdf,
            Visual::Unavailable(reason) => {
                tracing::info!(%reason, "text-only verification");
                return Ok(Verification::TextOnly(reason.clone()));
            }
        };

        let after = Attachment::pdf(pdf).map_err(|e| Error::Verification(e.to_string()))?;
        let mut attachments: Vec<Attachment> = before.into_iter().cloned().collect();
        attachments.push(after);
        let request = ModelRequest {
            model: self.vision_model.clone(),
            prompt: prompt::verification_prompt(instruction, before.is_some()),
            attachments,
            json_output: false,
            temperature: self.temperature,
        };

        let text = self
            .backend
            .generate(&request)
            .map_err(|e| Error::Verification(e.to_string()))?;
        let feedback = match text.trim() {
            "" => NO_FEEDBACK.to_string(),
            trimmed => trimmed.to_string(),
        };

        Ok(Verification::Reviewed {
            passed: feedback_passes(&feedback),
            feedback,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feedback_heuristic() {
        assert!(feedback_passes("Looks good to me."));
        assert!(feedback_passes("NO ISSUES found"));
        assert!(!feedback_passes("The title is missing."));
        assert!(!feedback_passes(NO_FEEDBACK));
    }
}
