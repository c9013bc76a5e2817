//! Resume section templates.
//!
//! A template is plain text where `---` lines divide sections and `{name}`
//! marks a section the model writes. Everything else is copied through
//! untouched (names, contact lines, headings).

use std::collections::HashMap;

use thiserror::Error;

pub const SECTION_DIVIDER: &str = "---";

pub const DEFAULT_TEMPLATE: &str = "IMMUTABLE HEADER
---
{summary}
---
{technical_skills}
---
{job_history}
---
{education}";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TemplateError {
    #[error("template cannot be empty")]
    Empty,

    #[error("unclosed '{{' on line {line}")]
    Unclosed { line: usize },

    #[error("template has no {{variable}} sections for the model to write")]
    NoVariables,
}

#[derive(Debug, Clone)]
pub struct TemplateSection {
    pub index: usize,
    pub content: String,
    pub variables: Vec<String>,
}

impl TemplateSection {
    pub fn is_immutable(&self) -> bool {
        self.variables.is_empty()
    }
}

#[derive(Debug, Clone)]
pub struct ParsedTemplate {
    pub source: String,
    /// Distinct variable names in first-seen order.
    pub variables: Vec<String>,
    pub sections: Vec<TemplateSection>,
}

impl ParsedTemplate {
    pub fn immutable_sections(&self) -> impl Iterator<Item = &TemplateSection> {
        self.sections
            .iter()
            .filter(|s| s.is_immutable() && !s.content.is_empty())
    }

    /// Replaces each `{variable}` with generated content.
    /// Variables without content stay in place so the gap is visible.
    pub fn apply(&self, content: &HashMap<String, String>) -> String {
        self.variables
            .iter()
            .fold(self.source.clone(), |acc, variable| match content.get(variable) {
                Some(text) => acc.replace(&format!("{{{variable}}}"), text.trim()),
                None => acc,
            })
    }
}

pub fn parse_template(template: &str) -> Result<ParsedTemplate, TemplateError> {
    if template.trim().is_empty() {
        return Err(TemplateError::Empty);
    }

    let mut variables: Vec<String> = Vec::new();
    for name in find_variables(template)? {
        if !variables.contains(&name) {
            variables.push(name);
        }
    }

    if variables.is_empty() {
        return Err(TemplateError::NoVariables);
    }

    let sections = template
        .split(SECTION_DIVIDER)
        .enumerate()
        .map(|(index, raw)| {
            let content = raw.trim().to_string();
            // A variable cut in half by a divider counts for neither section.
            let variables = find_variables(&content).unwrap_or_default();
            TemplateSection {
                index,
                content,
                variables,
            }
        })
        .collect();

    Ok(ParsedTemplate {
        source: template.to_string(),
        variables,
        sections,
    })
}

/// `job_history` → `Job History`.
pub fn section_title(variable: &str) -> String {
    variable
        .split('_')
        .filter(|w| !w.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first
                    .to_uppercase()
                    .chain(chars.flat_map(char::to_lowercase))
                    .collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

/// Collects every `{name}` in order. `{}` is literal text.
fn find_variables(text: &str) -> Result<Vec<String>, TemplateError> {
    let mut found = Vec::new();
    let mut rest = text;
    let mut line = 1;

    while let Some(open) = rest.find('{') {
        line += rest[..open].matches('\n').count();
        let after = &rest[open + 1..];
        let close = match after.find(|c: char| c == '}' || c == '\n') {
            Some(pos) if after[pos..].starts_with('}') => pos,
            _ => return Err(TemplateError::Unclosed { line }),
        };

        let name = &after[..close];
        if !name.trim().is_empty() {
            found.push(name.to_string());
        }
        rest = &after[close + 1..];
    }

    Ok(found)
}
