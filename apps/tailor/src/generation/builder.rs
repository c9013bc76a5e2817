//! Prompt Builder — turns validated inputs into the text pair sent to the model.
//!
//! Pure and deterministic: the same inputs always produce the same prompt.
//! Inputs are embedded verbatim; nothing is substituted into them after the fact.

use std::fmt::Write;

use crate::errors::TailorError;
use crate::generation::prompts::{
    BOTH_DIRECTIVE, BOTH_MARKER, CLOSING_REMINDER, COVER_LETTER_DIRECTIVE,
    COVER_LETTER_ONLY_MARKER, COVER_LETTER_SCHEMA, NO_NOTES, RESUME_DIRECTIVE,
    RESUME_ONLY_MARKER, SECTIONS_SCHEMA, WRITER_ROLE,
};
use crate::generation::template::{parse_template, section_title, ParsedTemplate, DEFAULT_TEMPLATE};
use crate::llm_client::prompts::{HONESTY_INSTRUCTION, JSON_ONLY_SYSTEM};
use crate::models::submission::{OutputFormat, Prompt};

/// The prompt plus what the output composer needs to read the answer.
#[derive(Debug, Clone)]
pub struct PromptPlan {
    pub prompt: Prompt,
    pub format: OutputFormat,
    /// Present only when a resume was requested.
    pub template: Option<ParsedTemplate>,
}

/// Raw prompt inputs, borrowed from the submission.
#[derive(Debug, Clone, Copy)]
pub struct PromptInputs<'a> {
    pub resume_text: &'a str,
    pub job_description: &'a str,
    pub notes: &'a str,
    pub format: &'a str,
    /// Blank selects [`DEFAULT_TEMPLATE`].
    pub template: &'a str,
}

pub fn build_prompt(inputs: PromptInputs<'_>) -> Result<PromptPlan, TailorError> {
    if inputs.resume_text.trim().is_empty() {
        return Err(TailorError::MissingInput("resume text"));
    }
    if inputs.job_description.trim().is_empty() {
        return Err(TailorError::MissingInput("job description"));
    }

    let format: OutputFormat = inputs.format.parse()?;

    let template = if format.wants_resume() {
        let source = if inputs.template.trim().is_empty() {
            DEFAULT_TEMPLATE
        } else {
            inputs.template
        };
        let parsed = parse_template(source)
            .map_err(|e| TailorError::InvalidFormat(format!("section template: {e}")))?;
        Some(parsed)
    } else {
        None
    };

    let prompt = Prompt {
        system: system_prompt(format, template.as_ref()),
        user: user_prompt(&inputs, format),
    };

    Ok(PromptPlan {
        prompt,
        format,
        template,
    })
}

pub fn format_marker(format: OutputFormat) -> &'static str {
    match format {
        OutputFormat::ResumeOnly => RESUME_ONLY_MARKER,
        OutputFormat::CoverLetterOnly => COVER_LETTER_ONLY_MARKER,
        OutputFormat::Both => BOTH_MARKER,
    }
}

fn format_directive(format: OutputFormat) -> &'static str {
    match format {
        OutputFormat::ResumeOnly => RESUME_DIRECTIVE,
        OutputFormat::CoverLetterOnly => COVER_LETTER_DIRECTIVE,
        OutputFormat::Both => BOTH_DIRECTIVE,
    }
}

fn system_prompt(format: OutputFormat, template: Option<&ParsedTemplate>) -> String {
    let mut system = format!("{WRITER_ROLE}\n\n{HONESTY_INSTRUCTION}\n\nRespond with a JSON object containing:\n");

    if format.wants_resume() {
        let _ = writeln!(system, "- {SECTIONS_SCHEMA}");
    }
    if format.wants_cover_letter() {
        let _ = writeln!(system, "- {COVER_LETTER_SCHEMA}");
    }

    if let Some(template) = template {
        system.push_str("\nTemplate sections to generate:\n");
        for variable in &template.variables {
            let _ = writeln!(system, "- {variable} (section header: {})", section_title(variable));
        }

        let fixed: Vec<&str> = template
            .immutable_sections()
            .map(|s| s.content.as_str())
            .collect();
        if !fixed.is_empty() {
            system.push_str(
                "\nThe following fixed template text is kept verbatim; do not repeat it in any section:\n",
            );
            for text in fixed {
                let _ = writeln!(system, "{text}");
            }
        }
    }

    let _ = write!(system, "\n{JSON_ONLY_SYSTEM}");
    system
}

fn user_prompt(inputs: &PromptInputs<'_>, format: OutputFormat) -> String {
    let notes = if inputs.notes.trim().is_empty() {
        NO_NOTES
    } else {
        inputs.notes
    };

    format!(
        "Original Resume:\n{resume}\n\n\
         Job Description:\n{job}\n\n\
         Candidate's Experience and Limitations:\n{notes}\n\n\
         {marker}\n{directive}\n\n\
         {CLOSING_REMINDER}",
        resume = inputs.resume_text,
        job = inputs.job_description,
        marker = format_marker(format),
        directive = format_directive(format),
    )
}
