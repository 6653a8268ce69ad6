//! Definition formatter - turns extracted data into a Markdown + LaTeX card

use std::sync::Arc;

use tracing::debug;

use crate::domain::concept::Domain;
use crate::domain::extraction::ExtractedConcept;
use crate::error::Result;
use crate::llm::TextBackend;

use super::heuristics::has_formal_notation;

/// Input to the formatter
#[derive(Debug, Clone, PartialEq)]
pub struct RawConceptData {
    pub name: String,
    pub domain: Domain,
    pub subfield: String,
    /// Possibly empty, possibly informal
    pub definition: String,
    pub notations: Vec<String>,
    pub examples: Vec<String>,
}

impl RawConceptData {
    pub fn new(name: impl Into<String>, domain: Domain, definition: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            domain,
            subfield: "general".to_string(),
            definition: definition.into(),
            notations: Vec::new(),
            examples: Vec::new(),
        }
    }

    pub fn with_notations(mut self, notations: Vec<String>) -> Self {
        self.notations = notations;
        self
    }

    pub fn with_examples(mut self, examples: Vec<String>) -> Self {
        self.examples = examples;
        self
    }
}

impl From<&ExtractedConcept> for RawConceptData {
    /// TeX fragments from the source become notation hints when the
    /// definition text carries no notation of its own
    fn from(extracted: &ExtractedConcept) -> Self {
        let mut notations = extracted.notations.clone();
        if !has_formal_notation(&extracted.raw_definition) {
            for fragment in &extracted.latex_fragments {
                if !notations.contains(fragment) {
                    notations.push(fragment.clone());
                }
            }
        }

        Self {
            name: extracted.name.clone(),
            domain: extracted.domain,
            subfield: extracted.subfield.clone(),
            definition: extracted.raw_definition.clone(),
            notations,
            examples: extracted.examples.clone(),
        }
    }
}

/// Produces final definition text, calling the backend only when needed
///
/// A definition that already carries formal notation is used verbatim.
/// Otherwise the backend formalizes the informal text, or writes a
/// definition from scratch when there is none.
#[derive(Clone)]
pub struct DefinitionFormatter {
    backend: Arc<dyn TextBackend>,
}

impl DefinitionFormatter {
    pub fn new(backend: Arc<dyn TextBackend>) -> Self {
        Self { backend }
    }

    /// Format one concept; backend failures propagate
    pub async fn format(&self, raw: &RawConceptData) -> Result<String> {
        let definition = raw.definition.trim();

        let body = if !definition.is_empty() && has_formal_notation(definition) {
            definition.to_string()
        } else {
            let prompt = if definition.is_empty() {
                debug!(term = %raw.name, "Generating definition from scratch");
                generate_prompt(raw)
            } else {
                debug!(term = %raw.name, "Formalizing informal definition");
                formalize_prompt(raw, definition)
            };
            let response = self.backend.complete(&prompt).await?;
            strip_heading(response.trim(), &raw.name).to_string()
        };

        Ok(assemble(raw, &body))
    }

    /// Format each input independently, preserving order
    ///
    /// One failing item does not affect its siblings; each slot carries its
    /// own result.
    pub async fn format_batch(&self, raws: &[RawConceptData]) -> Vec<Result<String>> {
        let mut results = Vec::with_capacity(raws.len());
        for raw in raws {
            results.push(self.format(raw).await);
        }
        results
    }
}

fn formalize_prompt(raw: &RawConceptData, informal: &str) -> String {
    format!(
        "Convert this informal definition into a rigorous formal definition for a \
         knowledge graph.\n\n\
         Concept: {name}\nDomain: {domain}\nSubfield: {subfield}\n\n\
         Informal definition:\n{informal}\n\n\
         Requirements:\n\
         - Use LaTeX notation ($...$ inline, $$...$$ for display)\n\
         - Bold the defined term and any prerequisite concepts (**Term**)\n\
         - Be concise and precise\n\
         - Do not include a heading; return only the definition body",
        name = raw.name,
        domain = raw.domain,
        subfield = raw.subfield,
        informal = informal,
    )
}

fn generate_prompt(raw: &RawConceptData) -> String {
    format!(
        "Write a formal definition of the concept \"{name}\" in the domain {domain} \
         (subfield: {subfield}) for a knowledge graph.\n\n\
         Requirements:\n\
         - Use LaTeX notation ($...$ inline, $$...$$ for display)\n\
         - Bold the defined term and any prerequisite concepts (**Term**)\n\
         - State what the concept requires before defining it, if anything\n\
         - Do not include a heading; return only the definition body",
        name = raw.name,
        domain = raw.domain,
        subfield = raw.subfield,
    )
}

/// Drop a `# {name}` style heading the backend added despite instructions
fn strip_heading<'a>(body: &'a str, name: &str) -> &'a str {
    let Some(first_line) = body.lines().next() else {
        return body;
    };
    let heading = first_line.trim_start_matches('#');
    if heading.len() < first_line.len() && heading.trim().eq_ignore_ascii_case(name.trim()) {
        body[first_line.len()..].trim_start()
    } else {
        body
    }
}

fn assemble(raw: &RawConceptData, body: &str) -> String {
    let mut md = format!("## {}\n\n{}", raw.name, body);

    if !raw.notations.is_empty() {
        let tokens: Vec<String> = raw.notations.iter().map(|n| format!("`{}`", n)).collect();
        md.push_str(&format!("\n\n**Notation:** {}", tokens.join(", ")));
    }

    if !raw.examples.is_empty() {
        md.push_str("\n\n**Examples:**\n");
        for example in &raw.examples {
            md.push_str(&format!("- {}\n", example));
        }
    }

    md
}
