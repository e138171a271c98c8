//! Prompt assembly from the four authoring fields.
//! Empty fields are skipped; present fields keep the authoring order.

use serde::{Deserialize, Serialize};

/// The four fixed sections of an authored prompt, in composition order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SectionLabel {
    Goal,
    ReturnFormat,
    Warnings,
    Context,
}

impl SectionLabel {
    pub const ORDERED: [SectionLabel; 4] = [
        SectionLabel::Goal,
        SectionLabel::ReturnFormat,
        SectionLabel::Warnings,
        SectionLabel::Context,
    ];

    pub fn display(&self) -> &'static str {
        match self {
            SectionLabel::Goal => "Goal",
            SectionLabel::ReturnFormat => "Return Format",
            SectionLabel::Warnings => "Warnings",
            SectionLabel::Context => "Context",
        }
    }
}

/// One labeled free-text field as read from the caller. Bodies may be
/// empty; empty bodies never reach the composed document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PromptSection {
    pub label: SectionLabel,
    pub body: String,
}

impl PromptSection {
    pub fn new(label: SectionLabel, body: impl Into<String>) -> Self {
        Self {
            label,
            body: body.into(),
        }
    }

    fn render(&self) -> String {
        format!("**{}:**\n{}", self.label.display(), self.body)
    }
}

pub struct Composer;

impl Composer {
    /// Assembles the four fields into one document.
    ///
    /// Each present field contributes a `**<Label>:**` block followed by its
    /// body and a trailing newline, except the last present block, which ends
    /// at its body. The presence check is an empty-string check only; a body
    /// of bare whitespace still counts as present.
    pub fn compose(goal: &str, return_format: &str, warnings: &str, context: &str) -> String {
        let bodies = [goal, return_format, warnings, context];

        let blocks: Vec<String> = SectionLabel::ORDERED
            .iter()
            .zip(bodies.iter())
            .filter(|(_, body)| !body.is_empty())
            .map(|(label, body)| PromptSection::new(*label, *body).render())
            .collect();

        blocks.join("\n\n")
    }

    /// Section-slice variant of [`Composer::compose`]; fields arrive in any
    /// order, composition order stays fixed.
    pub fn compose_sections(sections: &[PromptSection]) -> String {
        let body_for = |label: SectionLabel| {
            sections
                .iter()
                .find(|s| s.label == label)
                .map(|s| s.body.as_str())
                .unwrap_or("")
        };

        Self::compose(
            body_for(SectionLabel::Goal),
            body_for(SectionLabel::ReturnFormat),
            body_for(SectionLabel::Warnings),
            body_for(SectionLabel::Context),
        )
    }
}
