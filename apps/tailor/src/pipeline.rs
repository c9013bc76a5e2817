//! One submission, start to finish.
//!
//! Flow: extract_text → build_prompt → generator.generate → compose_output.
//!
//! Each stage runs only if the previous one succeeded, so a bad upload never
//! reaches the prompt builder and a bad prompt never reaches the model.

use std::fmt;

use tracing::{info, info_span, warn, Instrument};
use uuid::Uuid;

use crate::errors::TailorError;
use crate::extract::extract_text;
use crate::generation::builder::{build_prompt, PromptInputs};
use crate::generation::output::compose_output;
use crate::llm_client::TextGenerator;
use crate::models::submission::{GeneratedOutput, OutputFormat, SessionInput};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Idle,
    Extracting,
    Prompting,
    Generating,
    Displaying,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Idle => "idle",
            Stage::Extracting => "extracting",
            Stage::Prompting => "prompting",
            Stage::Generating => "generating",
            Stage::Displaying => "displaying",
        };
        f.write_str(name)
    }
}

/// A failed run: where it stopped and why. The submission is back at `Idle`.
#[derive(Debug)]
pub struct StageFailure {
    pub stage: Stage,
    pub error: TailorError,
}

/// A successful run, ready to display.
#[derive(Debug, Clone)]
pub struct Completed {
    pub format: OutputFormat,
    pub output: GeneratedOutput,
    /// Cleaned text the model was given.
    pub resume_text: String,
    /// Template variables the model was asked to fill; empty without a resume.
    pub sections: Vec<String>,
}

/// Walks a single submission through its stages.
#[derive(Debug)]
struct Run {
    stage: Stage,
}

impl Run {
    fn new() -> Self {
        Self { stage: Stage::Idle }
    }

    fn advance(&mut self, next: Stage) {
        info!("{} -> {}", self.stage, next);
        self.stage = next;
    }

    fn fail(&mut self, error: TailorError) -> StageFailure {
        let stage = self.stage;
        if error.is_upstream() {
            warn!("{stage} failed: {error}");
        } else {
            info!("{stage} rejected input: {error}");
        }
        self.stage = Stage::Idle;
        StageFailure { stage, error }
    }
}

/// Runs the whole pipeline for one submission.
pub async fn run_submission(
    generator: &dyn TextGenerator,
    input: &SessionInput,
) -> Result<Completed, StageFailure> {
    let span = info_span!("submission", id = %Uuid::new_v4());
    run_stages(generator, input).instrument(span).await
}

async fn run_stages(
    generator: &dyn TextGenerator,
    input: &SessionInput,
) -> Result<Completed, StageFailure> {
    let mut run = Run::new();

    run.advance(Stage::Extracting);
    let resume_text = extract_text(&input.document)
        .await
        .map_err(|e| run.fail(e))?;

    run.advance(Stage::Prompting);
    let plan = build_prompt(PromptInputs {
        resume_text: &resume_text,
        job_description: &input.job_description,
        notes: &input.notes,
        format: &input.format,
        template: &input.template,
    })
    .map_err(|e| run.fail(e))?;

    run.advance(Stage::Generating);
    let generated = generator
        .generate(&plan.prompt)
        .await
        .map_err(|e| run.fail(e.into()))?;
    let output = compose_output(&plan, &generated).map_err(|e| run.fail(e))?;

    run.advance(Stage::Displaying);
    let sections = plan
        .template
        .map(|template| template.variables)
        .unwrap_or_default();
    Ok(Completed {
        format: plan.format,
        output,
        resume_text,
        sections,
    })
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    use async_trait::async_trait;
    use bytes::Bytes;

    use crate::llm_client::LlmError;
    use crate::models::submission::{Prompt, UploadedDocument};

    /// Records prompts and answers with a canned reply.
    pub(crate) struct FakeGenerator {
        pub reply: Result<String, fn() -> LlmError>,
        pub calls: AtomicUsize,
        pub prompts: Mutex<Vec<Prompt>>,
    }

    impl FakeGenerator {
        pub(crate) fn replying(text: &str) -> Self {
            Self {
                reply: Ok(text.to_string()),
                calls: AtomicUsize::new(0),
                prompts: Mutex::new(Vec::new()),
            }
        }

        pub(crate) fn failing(error: fn() -> LlmError) -> Self {
            Self {
                reply: Err(error),
                calls: AtomicUsize::new(0),
                prompts: Mutex::new(Vec::new()),
            }
        }

        pub(crate) fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl TextGenerator for FakeGenerator {
        async fn generate(&self, prompt: &Prompt) -> Result<String, LlmError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.prompts.lock().unwrap().push(prompt.clone());
            match &self.reply {
                Ok(text) => Ok(text.clone()),
                Err(make) => Err(make()),
            }
        }
    }

    fn input(document: &'static [u8], job_description: &str, format: &str) -> SessionInput {
        SessionInput {
            document: UploadedDocument {
                file_name: "resume.txt".to_string(),
                data: Bytes::from_static(document),
            },
            job_description: job_description.to_string(),
            notes: "no Go experience, willing to learn".to_string(),
            format: format.to_string(),
            template: String::new(),
        }
    }

    #[tokio::test]
    async fn test_cover_letter_scenario() {
        let generator = FakeGenerator::replying(r#"{"cover_letter": "Dear team, I am eager to learn Go."}"#);
        let completed = run_submission(
            &generator,
            &input(
                b"Jane Doe, Software Engineer, 5 years Python",
                "Senior Backend Engineer, Go required",
                "cover letter only",
            ),
        )
        .await
        .unwrap();

        assert_eq!(completed.format, OutputFormat::CoverLetterOnly);
        assert_eq!(
            completed.output.cover_letter.as_deref(),
            Some("Dear team, I am eager to learn Go.")
        );
        assert_eq!(generator.calls(), 1);

        let prompts = generator.prompts.lock().unwrap();
        let user = &prompts[0].user;
        for fragment in [
            "Jane Doe, Software Engineer, 5 years Python",
            "Senior Backend Engineer, Go required",
            "no Go experience, willing to learn",
            "OUTPUT FORMAT: COVER LETTER ONLY",
        ] {
            assert!(user.contains(fragment), "missing {fragment}");
        }
    }

    #[tokio::test]
    async fn test_empty_upload_stops_before_prompting() {
        let generator = FakeGenerator::replying("{}");
        let failure = run_submission(&generator, &input(b"", "Backend Engineer", "both"))
            .await
            .unwrap_err();

        assert_eq!(failure.stage, Stage::Extracting);
        assert!(matches!(failure.error, TailorError::DocumentUnreadable(_)));
        assert_eq!(generator.calls(), 0);
    }

    #[tokio::test]
    async fn test_image_upload_stops_before_prompting() {
        const PNG: &[u8] = b"\x89PNG\r\n\x1a\n\0\0\0\rIHDR\0\0\0\x01\0\0\0\x01";
        let generator = FakeGenerator::replying("{}");
        let failure = run_submission(&generator, &input(PNG, "Backend Engineer", "both"))
            .await
            .unwrap_err();

        assert_eq!(failure.stage, Stage::Extracting);
        assert!(matches!(failure.error, TailorError::DocumentUnreadable(_)));
        assert_eq!(generator.calls(), 0);
    }

    #[tokio::test]
    async fn test_resume_run_reports_text_and_sections() {
        let generator = FakeGenerator::replying(
            r#"{"sections": {"summary": "Backend engineer.", "education": "BSc"}}"#,
        );
        let mut submission = input(b"  Jane Doe\n\n  Python  ", "Backend Engineer", "resume");
        submission.template = "JANE DOE\n---\n{summary}\n---\n{education}".to_string();

        let completed = run_submission(&generator, &submission).await.unwrap();

        assert_eq!(completed.resume_text, "Jane Doe\nPython");
        assert_eq!(completed.sections, vec!["summary", "education"]);
    }

    #[tokio::test]
    async fn test_cover_letter_run_has_no_sections() {
        let generator = FakeGenerator::replying(r#"{"cover_letter": "Hi"}"#);
        let completed = run_submission(&generator, &input(b"Jane Doe", "Backend Engineer", "cover_letter"))
            .await
            .unwrap();

        assert_eq!(completed.resume_text, "Jane Doe");
        assert!(completed.sections.is_empty());
    }

    #[tokio::test]
    async fn test_empty_job_description_never_calls_generator() {
        let generator = FakeGenerator::replying("{}");
        let failure = run_submission(&generator, &input(b"Jane Doe", "  ", "both"))
            .await
            .unwrap_err();

        assert_eq!(failure.stage, Stage::Prompting);
        assert!(matches!(failure.error, TailorError::MissingInput(_)));
        assert_eq!(generator.calls(), 0);
    }

    #[tokio::test]
    async fn test_missing_credential_is_authentication_error() {
        let generator = FakeGenerator::failing(|| LlmError::MissingApiKey);
        let failure = run_submission(&generator, &input(b"Jane Doe", "Backend Engineer", "resume"))
            .await
            .unwrap_err();

        assert_eq!(failure.stage, Stage::Generating);
        assert!(matches!(failure.error, TailorError::Authentication(_)));
    }

    #[tokio::test]
    async fn test_identical_inputs_produce_identical_prompts() {
        let generator = FakeGenerator::replying(r#"{"cover_letter": "Hi"}"#);
        let submission = input(b"Jane Doe", "Backend Engineer", "cover_letter");

        run_submission(&generator, &submission).await.unwrap();
        run_submission(&generator, &submission).await.unwrap();

        let prompts = generator.prompts.lock().unwrap();
        assert_eq!(prompts.len(), 2);
        assert_eq!(prompts[0], prompts[1]);
    }
}
