//! Output composer — reads the model's JSON answer back into documents.

use std::collections::HashMap;

use serde::Deserialize;
use serde_json::Value;
use tracing::warn;

use crate::errors::TailorError;
use crate::generation::builder::PromptPlan;
use crate::llm_client::strip_json_fences;
use crate::models::submission::GeneratedOutput;

#[derive(Debug, Deserialize)]
struct RawAnswer {
    sections: Option<HashMap<String, Value>>,
    cover_letter: Option<Value>,
}

/// Parses generated text against what the plan asked for.
/// Anything requested but missing or blank is an upstream failure.
pub fn compose_output(plan: &PromptPlan, generated: &str) -> Result<GeneratedOutput, TailorError> {
    let answer: RawAnswer = serde_json::from_str(strip_json_fences(generated))
        .map_err(|e| TailorError::Upstream(format!("response is not the expected JSON object: {e}")))?;

    let resume = match &plan.template {
        Some(template) => {
            let raw_sections = answer.sections.ok_or_else(|| {
                TailorError::Upstream("response has no \"sections\" object".to_string())
            })?;

            let sections: HashMap<String, String> = raw_sections
                .into_iter()
                .filter_map(|(key, value)| section_text(&value).map(|text| (key, text)))
                .collect();

            let missing: Vec<&str> = template
                .variables
                .iter()
                .filter(|v| !sections.contains_key(v.as_str()))
                .map(String::as_str)
                .collect();
            if missing.len() == template.variables.len() {
                return Err(TailorError::Upstream(
                    "response contains none of the template sections".to_string(),
                ));
            }
            if !missing.is_empty() {
                warn!("Model left template sections empty: {}", missing.join(", "));
            }

            Some(template.apply(&sections))
        }
        None => None,
    };

    let cover_letter = if plan.format.wants_cover_letter() {
        let letter = answer
            .cover_letter
            .as_ref()
            .and_then(section_text)
            .ok_or_else(|| {
                TailorError::Upstream("response has no \"cover_letter\" text".to_string())
            })?;
        Some(letter)
    } else {
        None
    };

    Ok(GeneratedOutput {
        resume,
        cover_letter,
    })
}

/// Strings are taken as-is; a list of strings becomes one line per item.
fn section_text(value: &Value) -> Option<String> {
    let text = match value {
        Value::String(s) => s.trim().to_string(),
        Value::Array(items) => items
            .iter()
            .filter_map(|item| item.as_str())
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join("\n"),
        _ => return None,
    };

    (!text.is_empty()).then_some(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generation::builder::{build_prompt, PromptInputs};

    fn plan(format: &str, template: &str) -> PromptPlan {
        build_prompt(PromptInputs {
            resume_text: "Jane Doe, Software Engineer",
            job_description: "Backend Engineer",
            notes: "",
            format,
            template,
        })
        .unwrap()
    }

    #[test]
    fn test_cover_letter_only() {
        let output = compose_output(
            &plan("cover_letter", ""),
            r#"{"cover_letter": "Dear hiring team,\nI am eager to learn Go."}"#,
        )
        .unwrap();

        assert_eq!(output.resume, None);
        assert_eq!(
            output.cover_letter.as_deref(),
            Some("Dear hiring team,\nI am eager to learn Go.")
        );
    }

    #[test]
    fn test_both_fills_template_and_tolerates_fences() {
        let generated = "```json\n{\"sections\": {\"summary\": \"Pragmatic engineer.\", \
            \"skills\": [\"Python\", \"SQL\"]}, \"cover_letter\": \"Hello\"}\n```";
        let output = compose_output(
            &plan("both", "JANE DOE\n---\n{summary}\n---\n{skills}"),
            generated,
        )
        .unwrap();

        assert_eq!(
            output.resume.as_deref(),
            Some("JANE DOE\n---\nPragmatic engineer.\n---\nPython\nSQL")
        );
        assert_eq!(output.cover_letter.as_deref(), Some("Hello"));
    }

    #[test]
    fn test_missing_cover_letter_is_upstream_error() {
        let err = compose_output(&plan("cover_letter", ""), r#"{"sections": {}}"#).unwrap_err();
        assert!(matches!(err, TailorError::Upstream(_)));
    }

    #[test]
    fn test_blank_cover_letter_is_upstream_error() {
        let err = compose_output(&plan("cover_letter", ""), r#"{"cover_letter": "   "}"#).unwrap_err();
        assert!(matches!(err, TailorError::Upstream(_)));
    }

    #[test]
    fn test_sections_with_no_known_keys_is_upstream_error() {
        let err = compose_output(
            &plan("resume", "{summary}"),
            r#"{"sections": {"unrelated": "text"}}"#,
        )
        .unwrap_err();
        assert!(matches!(err, TailorError::Upstream(_)));
    }

    #[test]
    fn test_prose_answer_is_upstream_error() {
        let err = compose_output(&plan("both", ""), "Sure! Here is your resume.").unwrap_err();
        assert!(matches!(err, TailorError::Upstream(_)));
    }
}
