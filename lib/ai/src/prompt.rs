//! Extraction prompts.
//!
//! An extraction prompt is an instruction with a single `{{context}}` slot,
//! a system prompt, and the JSON schema of the object the model must return.

use crate::backend::LlmRequest;
use serde_json::Value as JsonValue;

/// Placeholder replaced by the text being extracted from.
pub const CONTEXT_PLACEHOLDER: &str = "{{context}}";

/// A fixed extraction prompt.
#[derive(Debug, Clone, PartialEq)]
pub struct PromptTemplate {
    /// Short identifier used in logs.
    pub name: &'static str,
    /// Instruction containing [`CONTEXT_PLACEHOLDER`].
    pub instruction: String,
    /// System prompt.
    pub system_prompt: String,
    /// JSON schema of the expected object.
    pub output_schema: JsonValue,
}

impl PromptTemplate {
    /// Creates a prompt.
    #[must_use]
    pub fn new(
        name: &'static str,
        instruction: impl Into<String>,
        system_prompt: impl Into<String>,
        output_schema: JsonValue,
    ) -> Self {
        Self {
            name,
            instruction: instruction.into(),
            system_prompt: system_prompt.into(),
            output_schema,
        }
    }

    /// Fills the context slot. An instruction without a slot gets the
    /// context appended after a blank line.
    #[must_use]
    pub fn render(&self, context: &str) -> String {
        if self.instruction.contains(CONTEXT_PLACEHOLDER) {
            self.instruction.replace(CONTEXT_PLACEHOLDER, context)
        } else {
            format!("{}\n\n{context}", self.instruction)
        }
    }

    /// Field names the schema marks as required.
    #[must_use]
    pub fn required_fields(&self) -> Vec<&str> {
        self.output_schema
            .get("required")
            .and_then(JsonValue::as_array)
            .map(|fields| fields.iter().filter_map(JsonValue::as_str).collect())
            .unwrap_or_default()
    }

    /// System message sent to the model: the system prompt followed by the
    /// schema, since JSON mode alone does not enforce a shape.
    #[must_use]
    pub fn system_message(&self) -> String {
        format!(
            "{}\n\nThe object must match this JSON schema:\n{}",
            self.system_prompt, self.output_schema
        )
    }

    /// Builds a deterministic JSON-mode request over `context`.
    #[must_use]
    pub fn to_request(&self, context: &str) -> LlmRequest {
        LlmRequest::new(self.render(context))
            .with_system(self.system_message())
            .with_temperature(0.0)
            .json_mode()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn template(instruction: &str) -> PromptTemplate {
        PromptTemplate::new(
            "probe",
            instruction,
            "Answer in JSON.",
            json!({
                "type": "object",
                "properties": {"searchTerm": {"type": "string"}},
                "required": ["searchTerm"]
            }),
        )
    }

    #[test]
    fn fills_every_context_slot() {
        let rendered = template("Request: {{context}}\n(again: {{context}})").render("rust books");
        assert_eq!(rendered, "Request: rust books\n(again: rust books)");
    }

    #[test]
    fn appends_context_without_slot() {
        assert_eq!(template("Extract.").render("dune"), "Extract.\n\ndune");
    }

    #[test]
    fn reads_required_fields_from_schema() {
        assert_eq!(template("x").required_fields(), vec!["searchTerm"]);

        let loose = PromptTemplate::new("loose", "x", "y", json!({"type": "object"}));
        assert!(loose.required_fields().is_empty());
    }

    #[test]
    fn request_is_deterministic_json_mode() {
        let request = template("Find: {{context}}").to_request("dune");
        assert_eq!(request.prompt, "Find: dune");
        assert_eq!(request.temperature, Some(0.0));
        assert!(request.json_mode);
        let system = request.system.unwrap_or_default();
        assert!(system.starts_with("Answer in JSON."));
        assert!(system.contains("\"searchTerm\""));
    }
}
