//! Prompt text for plan generation and verification.

/// Operation catalog shown to the model, one example per operation.
pub const OPERATION_CATALOG: &str = r##"{"op": "add_slide", "layout": "title_and_content", "title": "Agenda", "body": ["First point", "Second point"]}
{"op": "delete_slide", "slide": 3}
{"op": "set_title", "slide": 1, "text": "Q3 Results"}
{"op": "set_body_text", "slide": 2, "paragraphs": ["Revenue up 12%", "Costs flat"]}
{"op": "set_text", "slide": 2, "shape": 4, "text": "Line one\nLine two", "style": {"font_size": 18, "color": "#333333", "bold": true, "align": "center"}}
{"op": "add_text_box", "slide": 1, "text": "Note", "left": 72, "top": 400, "width": 300, "height": 40, "style": {"font_size": 14}, "label": "note"}
{"op": "add_rounded_text_box", "slide": 1, "text": "Plan", "left": 60, "top": 200, "width": 180, "height": 90, "fill": "#E8F4F8", "text_color": "#323232", "font_size": 20, "label": "plan"}
{"op": "add_shape", "slide": 1, "shape": "ellipse", "left": 300, "top": 200, "width": 120, "height": 120, "fill": "#4A90E2", "text": "Go", "label": "go"}
{"op": "add_arrow", "slide": 1, "from": "plan", "to": "go", "color": "#464646", "width_pt": 2.5}
{"op": "add_image", "slide": 1, "path": "logo.png", "left": 600, "top": 20, "width": 100}
{"op": "delete_shapes_except", "slide": 2, "keep": [5], "keep_title": true}
{"op": "remove_connectors", "slide": 2}
{"op": "add_box_row", "slide": "last", "texts": ["Plan", "Build", "Ship"], "top": 220, "box_width": 180, "box_height": 90, "gap": 30, "connect": true, "labels": ["plan", "build", "ship"]}"##;

const RULES: &str = "\
1. Respond with a single JSON object: {\"summary\": \"<one line>\", \"operations\": [ ... ]}. No code, no prose outside the JSON.
2. Use only the operations listed above. Unknown operations or fields make the whole plan fail.
3. Slides are numbered from 1 as in the structure above; \"last\" means the last slide at that point of the plan.
4. Operations run in order. Slide numbers shift after add_slide and delete_slide.
5. Existing shapes are referenced by their Id from the structure above. Shapes created by this plan are referenced by the label you gave them; labels are unique and only valid on the slide where the shape was created.
6. Geometry is in points (72 points per inch). The slide size is given above. Keep shapes inside the slide.
7. Colors are \"#RRGGBB\". Prefer soft, harmonious colors (e.g. #4A90E2, #50E3C2, #E8F4F8).
8. To rebuild a slide, first delete_shapes_except with keep_title, then remove_connectors, then add the new shapes.
9. For a horizontal sequence of boxes use add_box_row; set connect to draw arrows between neighbours.
10. Size text boxes for their text: width at least 0.6 x font size per character of the longest line, height at least 1.5 x font size per line.";

/// Prompt asking for an edit plan.
pub fn generation_prompt(instruction: &str, summary: &str, slide_size_pt: (i64, i64), has_visual: bool) -> String {
    let mut prompt = String::new();
    prompt.push_str(
        "You edit PowerPoint presentations. Translate the user's instruction into an edit plan: \
         a JSON list of operations from the catalog below. The plan is validated and applied by the tool; \
         you never write code.\n",
    );
    prompt.push_str("\n--- Current Presentation Structure ---\n");
    prompt.push_str(summary);
    prompt.push_str(&format!(
        "\nSlide size: {} x {} points\n",
        slide_size_pt.0, slide_size_pt.1
    ));
    prompt.push_str("\n--- User Instruction ---\n");
    prompt.push_str(instruction);
    prompt.push_str("\n\n--- Operation Catalog (one example each) ---\n");
    prompt.push_str(OPERATION_CATALOG);
    prompt.push_str("\n\n--- Rules ---\n");
    prompt.push_str(RULES);
    if has_visual {
        prompt.push_str(
            "\n\nA PDF rendering of the current slides is attached. Use it to judge layout, alignment and colors.",
        );
    }
    prompt
}

/// Prompt for the post-edit review.
///
/// With `compare_before` two PDFs are attached: the rendering before the
/// edit, then the rendering after it.
pub fn verification_prompt(instruction: &str, compare_before: bool) -> String {
    let attachments = if compare_before {
        "--- Two PDFs attached below: first BEFORE the edit, second AFTER the edit ---\n\
         Compare them: the requested change must be visible in AFTER, and nothing else should have changed unexpectedly."
    } else {
        "--- PDF of the presentation AFTER the edit attached below ---"
    };
    format!(
        "You are a QA checker. Review the presentation and compare it against the user's instruction.\n\
         List mismatches or missing elements; be concise. If everything matches, answer \"Looks good\".\n\
         --- User instruction ---\n\
         {}\n\
         {}",
        instruction, attachments
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plan::EditOp;

    #[test]
    fn test_catalog_examples_parse() {
        let ops: Vec<EditOp> = OPERATION_CATALOG
            .lines()
            .map(|line| serde_json::from_str(line).unwrap_or_else(|e| panic!("{}: {}", line, e)))
            .collect();
        let mut names: Vec<&str> = ops.iter().map(EditOp::name).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), 13);
    }

    #[test]
    fn test_generation_prompt_sections() {
        let prompt = generation_prompt("add a slide", "Presentation: a.pptx", (720, 540), false);
        assert!(prompt.contains("--- User Instruction ---\nadd a slide"));
        assert!(prompt.contains("Slide size: 720 x 540 points"));
        assert!(prompt.contains("\"op\": \"add_box_row\""));
        assert!(!prompt.contains("PDF rendering"));

        let with_pdf = generation_prompt("x", "y", (720, 540), true);
        assert!(with_pdf.contains("PDF rendering"));
    }

    #[test]
    fn test_verification_prompt() {
        let prompt = verification_prompt("make the title red", false);
        assert!(prompt.starts_with("You are a QA checker."));
        assert!(prompt.contains("make the title red"));
        assert!(!prompt.contains("BEFORE"));

        let compare = verification_prompt("make the title red", true);
        assert!(compare.contains("first BEFORE the edit, second AFTER the edit"));
    }
}
