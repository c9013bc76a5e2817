use std::fmt;
use std::str::FromStr;

use bytes::Bytes;

use crate::errors::TailorError;

/// Which documents the model is asked to write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    ResumeOnly,
    CoverLetterOnly,
    Both,
}

impl OutputFormat {
    pub const ALL: [OutputFormat; 3] = [
        OutputFormat::ResumeOnly,
        OutputFormat::CoverLetterOnly,
        OutputFormat::Both,
    ];

    /// Form value submitted by the `<select>`.
    pub fn as_str(&self) -> &'static str {
        match self {
            OutputFormat::ResumeOnly => "resume",
            OutputFormat::CoverLetterOnly => "cover_letter",
            OutputFormat::Both => "both",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            OutputFormat::ResumeOnly => "Resume only",
            OutputFormat::CoverLetterOnly => "Cover letter only",
            OutputFormat::Both => "Resume and cover letter",
        }
    }

    pub fn wants_resume(&self) -> bool {
        matches!(self, OutputFormat::ResumeOnly | OutputFormat::Both)
    }

    pub fn wants_cover_letter(&self) -> bool {
        matches!(self, OutputFormat::CoverLetterOnly | OutputFormat::Both)
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OutputFormat {
    type Err = TailorError;

    /// Accepts the form value or the human label, case- and separator-insensitive.
    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let normalized = raw
            .trim()
            .to_lowercase()
            .replace(|c: char| c == '-' || c.is_whitespace(), "_");

        match normalized.as_str() {
            "resume" | "resume_only" => Ok(OutputFormat::ResumeOnly),
            "cover_letter" | "cover_letter_only" | "letter" => Ok(OutputFormat::CoverLetterOnly),
            "both" | "resume_and_cover_letter" => Ok(OutputFormat::Both),
            _ => Err(TailorError::InvalidFormat(format!(
                "'{}' is not one of: resume, cover_letter, both",
                raw.trim()
            ))),
        }
    }
}

/// An uploaded file as received from the form.
#[derive(Debug, Clone, Default)]
pub struct UploadedDocument {
    pub file_name: String,
    pub data: Bytes,
}

/// Everything the user submitted in one go. Lives only for the request.
#[derive(Debug, Clone, Default)]
pub struct SessionInput {
    pub document: UploadedDocument,
    pub job_description: String,
    pub notes: String,
    /// Raw selector; validated by the prompt builder.
    pub format: String,
    /// Empty means "use the default section template".
    pub template: String,
}

/// The text pair sent to the model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    pub system: String,
    pub user: String,
}

/// What the page shows after a successful run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GeneratedOutput {
    pub resume: Option<String>,
    pub cover_letter: Option<String>,
}
