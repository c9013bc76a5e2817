// Prompt fragments for resume / cover letter generation.
// Reuses cross-cutting fragments from llm_client::prompts.

/// Opening line of every system prompt.
pub const WRITER_ROLE: &str = "You are a professional resume writer and career counselor. \
    Your task is to tailor a candidate's application material to a specific job, \
    using only the candidate's original resume and their own notes as the source of truth.";

pub const RESUME_ONLY_MARKER: &str = "OUTPUT FORMAT: RESUME ONLY";
pub const COVER_LETTER_ONLY_MARKER: &str = "OUTPUT FORMAT: COVER LETTER ONLY";
pub const BOTH_MARKER: &str = "OUTPUT FORMAT: RESUME AND COVER LETTER";

pub const RESUME_DIRECTIVE: &str = "Rewrite the resume for this role. \
    Write complete, professional content for every template section listed in your instructions. \
    Do NOT write a cover letter.";

pub const COVER_LETTER_DIRECTIVE: &str = "Write a professional cover letter explaining why the \
    candidate is a good fit for this role, addressing any gaps the candidate mentioned honestly. \
    Do NOT rewrite the resume.";

pub const BOTH_DIRECTIVE: &str = "1. Rewrite the resume for this role, writing complete content for \
    every template section listed in your instructions.\n\
    2. Write a professional cover letter explaining why the candidate is a good fit for the role.";

/// Appended to the user message; the inputs above it are never edited.
pub const CLOSING_REMINDER: &str = "Be honest about capabilities and don't fabricate experience \
    that doesn't exist. OUTPUT MUST BE IN A JSON STRUCTURE.";

/// Shown in place of notes the user left blank.
pub const NO_NOTES: &str = "(none provided)";

/// JSON contract for the `sections` key.
pub const SECTIONS_SCHEMA: &str = "\"sections\": an object whose keys are EXACTLY the template \
    section variables below and whose values are the finished text for that section";

/// JSON contract for the `cover_letter` key.
pub const COVER_LETTER_SCHEMA: &str =
    "\"cover_letter\": a string containing the complete cover letter";
