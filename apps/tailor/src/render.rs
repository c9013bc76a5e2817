//! Server-rendered HTML for the form and its results.

use std::fmt::Write;

use crate::errors::TailorError;
use crate::generation::template::{section_title, DEFAULT_TEMPLATE};
use crate::models::submission::OutputFormat;
use crate::pipeline::Completed;

/// Values echoed back into the form so a failed submission can be corrected and resent.
/// Browsers never allow pre-filling a file input, so the upload is not among them.
#[derive(Debug, Clone, Default)]
pub struct FormValues {
    pub job_description: String,
    pub notes: String,
    pub format: String,
    pub template: String,
}

/// What to show under the form.
pub enum Notice<'a> {
    Output(&'a Completed),
    Error(&'a TailorError),
}

const STYLE: &str = r#"
body { font-family: system-ui, sans-serif; margin: 0; background: #f6f7f9; color: #1d2330; }
header { background: #1d2330; color: #fff; padding: 16px 32px; }
main { display: grid; grid-template-columns: 2fr 1fr; gap: 24px; padding: 24px 32px; }
form label { display: block; font-weight: 600; margin-top: 16px; }
textarea, select, input[type=file] { width: 100%; box-sizing: border-box; margin-top: 6px; font: inherit; }
textarea { min-height: 120px; }
button { margin-top: 20px; padding: 10px 24px; font-size: 1rem; cursor: pointer; }
button[disabled] { opacity: .6; cursor: wait; }
aside { background: #fff; border-radius: 8px; padding: 16px; }
.error { background: #fdecea; border: 1px solid #e0665c; padding: 12px; border-radius: 6px; margin-top: 16px; }
.output { background: #fff; border-radius: 8px; padding: 16px; margin-top: 24px; }
.output pre { white-space: pre-wrap; font-family: Georgia, serif; }
details.output pre { font-family: ui-monospace, monospace; font-size: .9rem; }
#waiting { display: none; margin-top: 12px; }
#waiting.active { display: block; }
"#;

/// Disables the submit button while the request is in flight.
const SUBMIT_SCRIPT: &str = r#"
document.getElementById('tailor-form').addEventListener('submit', function () {
  var button = document.getElementById('submit');
  button.disabled = true;
  button.textContent = 'Working...';
  document.getElementById('waiting').classList.add('active');
});
"#;

pub fn form_page(values: &FormValues, notice: Option<Notice<'_>>) -> String {
    let mut body = String::new();

    let _ = write!(
        body,
        r#"<header><h1>AI Resume Tailor</h1>
<p>Upload your resume, paste a job description, and get a resume and/or cover letter tailored to the job.</p></header>
<main><div>
<form id="tailor-form" method="post" action="/tailor" enctype="multipart/form-data">
<label for="document">1. Resume document (PDF or plain text)</label>
<input type="file" id="document" name="document" accept=".pdf,.txt,.md,application/pdf,text/plain" required>
<label for="job_description">2. Job description</label>
<textarea id="job_description" name="job_description" required>{job}</textarea>
<label for="notes">3. Your experience and limitations</label>
<textarea id="notes" name="notes" placeholder="Example: I have 3 years of Python experience but am new to machine learning...">{notes}</textarea>
<label for="format">4. Output format</label>
<select id="format" name="format">{options}</select>
<label for="template">Resume section template (optional)</label>
<textarea id="template" name="template" placeholder="{placeholder}">{template}</textarea>
<button type="submit" id="submit">Tailor my application</button>
<div id="waiting">Generating, this can take up to a couple of minutes...</div>
</form>"#,
        job = html_escape(&values.job_description),
        notes = html_escape(&values.notes),
        options = format_options(&values.format),
        placeholder = html_escape(DEFAULT_TEMPLATE),
        template = html_escape(&values.template),
    );

    match notice {
        Some(Notice::Error(error)) => body.push_str(&error_banner(error)),
        Some(Notice::Output(completed)) => body.push_str(&output_sections(completed)),
        None => {}
    }

    body.push_str("</div>");
    body.push_str(&instructions());
    body.push_str("</main>");
    let _ = write!(body, "<script>{SUBMIT_SCRIPT}</script>");

    page("AI Resume Tailor", &body)
}

/// Bare page for failures outside the form flow.
pub fn error_page(error: &TailorError) -> String {
    let body = format!(
        "<header><h1>AI Resume Tailor</h1></header><main><div>{}<p><a href=\"/\">Back to the form</a></p></div></main>",
        error_banner(error)
    );
    page("Error - AI Resume Tailor", &body)
}

fn page(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\"><head><meta charset=\"utf-8\">\
         <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\
         <title>{}</title><style>{STYLE}</style></head><body>{body}</body></html>",
        html_escape(title)
    )
}

fn format_options(selected: &str) -> String {
    let selected = selected.parse::<OutputFormat>().unwrap_or(OutputFormat::Both);
    OutputFormat::ALL
        .iter()
        .map(|format| {
            format!(
                "<option value=\"{}\"{}>{}</option>",
                format.as_str(),
                if *format == selected { " selected" } else { "" },
                format.label()
            )
        })
        .collect()
}

fn error_banner(error: &TailorError) -> String {
    format!(
        "<div class=\"error\" data-code=\"{}\" role=\"alert\"><strong>Something went wrong.</strong> {}</div>",
        error.code(),
        html_escape(&error.user_message())
    )
}

fn output_sections(completed: &Completed) -> String {
    let output = &completed.output;
    let mut html = source_details(&completed.resume_text, &completed.sections);

    if let Some(resume) = &output.resume {
        html.push_str(&output_section("Resume", "resume", resume));
    }
    if let Some(letter) = &output.cover_letter {
        html.push_str(&output_section("Cover Letter", "cover_letter", letter));
    }
    if let (Some(resume), Some(letter)) = (&output.resume, &output.cover_letter) {
        let _ = write!(
            html,
            r#"<form method="post" action="/download" class="output">
<input type="hidden" name="kind" value="both">
<textarea name="resume" hidden>{}</textarea>
<textarea name="cover_letter" hidden>{}</textarea>
<button type="submit">Download both</button></form>"#,
            html_escape(resume),
            html_escape(letter)
        );
    }

    html
}

/// What the model was given: the extracted resume text and the sections it had to write.
fn source_details(resume_text: &str, sections: &[String]) -> String {
    let mut html = String::from(r#"<details class="output" id="source"><summary>View extracted text</summary>"#);

    if !sections.is_empty() {
        let names: Vec<String> = sections
            .iter()
            .map(|variable| {
                format!(
                    "<code>{{{}}}</code> ({})",
                    html_escape(variable),
                    html_escape(&section_title(variable))
                )
            })
            .collect();
        let _ = write!(
            html,
            "<p>Template contains {} AI-generated section{}: {}</p>",
            sections.len(),
            if sections.len() == 1 { "" } else { "s" },
            names.join(", ")
        );
    }

    let _ = write!(html, "<pre>{}</pre></details>", html_escape(resume_text));
    html
}

fn output_section(heading: &str, kind: &str, text: &str) -> String {
    let escaped = html_escape(text);
    format!(
        r#"<section class="output" id="{kind}"><h2>{heading}</h2><pre>{escaped}</pre>
<form method="post" action="/download">
<input type="hidden" name="kind" value="{kind}">
<textarea name="{kind}" hidden>{escaped}</textarea>
<button type="submit">Download {heading}</button></form></section>"#
    )
}

fn instructions() -> String {
    let formats: String = OutputFormat::ALL
        .iter()
        .map(|f| format!("<li><code>{}</code>: {}</li>", f.as_str(), f.label()))
        .collect();

    format!(
        r#"<aside><h2>Instructions</h2>
<ol><li>Upload your resume (PDF or plain text)</li>
<li>Paste the job description</li>
<li>Describe your experience honestly, including gaps</li>
<li>Pick what to generate</li>
<li>Optionally define a section template</li></ol>
<h3>Output formats</h3><ul>{formats}</ul>
<h3>Template rules</h3>
<ul><li>Fixed text (like your name) stays unchanged</li>
<li>Use <code>---</code> between sections</li>
<li>Use <code>{{variable_name}}</code> for generated sections</li>
<li>Variable names become section titles</li></ul>
<pre>{default}</pre></aside>"#,
        default = html_escape(DEFAULT_TEMPLATE)
    )
}

fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::models::submission::GeneratedOutput;

    #[test]
    fn test_html_escape() {
        assert_eq!(
            html_escape("<b>Tom & \"Jerry\"</b>"),
            "&lt;b&gt;Tom &amp; &quot;Jerry&quot;&lt;/b&gt;"
        );
    }

    #[test]
    fn test_form_echoes_values_escaped() {
        let html = form_page(
            &FormValues {
                job_description: "Rust <required>".to_string(),
                format: "cover_letter".to_string(),
                ..FormValues::default()
            },
            None,
        );
        assert!(html.contains("Rust &lt;required&gt;"));
        assert!(html.contains(r#"<option value="cover_letter" selected>"#));
    }

    fn completed_with(output: GeneratedOutput, sections: &[&str]) -> Completed {
        Completed {
            format: OutputFormat::Both,
            output,
            resume_text: "Jane Doe\nPython & <Go>".to_string(),
            sections: sections.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn test_cover_letter_output_has_heading() {
        let output = GeneratedOutput {
            resume: None,
            cover_letter: Some("Dear team".to_string()),
        };
        let completed = completed_with(output, &[]);
        let html = form_page(&FormValues::default(), Some(Notice::Output(&completed)));
        assert!(html.contains("<h2>Cover Letter</h2>"));
        assert!(html.contains("Dear team"));
        assert!(!html.contains("<h2>Resume</h2>"));
        assert!(!html.contains("Download both"));
        assert!(!html.contains("AI-generated section"));
    }

    #[test]
    fn test_output_shows_extracted_text_and_template_sections() {
        let output = GeneratedOutput {
            resume: Some("JANE DOE\n---\nBackend engineer.".to_string()),
            cover_letter: None,
        };
        let completed = completed_with(output, &["summary", "job_history"]);
        let html = form_page(&FormValues::default(), Some(Notice::Output(&completed)));

        assert!(html.contains("<summary>View extracted text</summary>"));
        assert!(html.contains("<pre>Jane Doe\nPython &amp; &lt;Go&gt;</pre></details>"));
        assert!(html.contains("Template contains 2 AI-generated sections:"));
        assert!(html.contains("<code>{summary}</code> (Summary)"));
        assert!(html.contains("<code>{job_history}</code> (Job History)"));
    }

    #[test]
    fn test_error_notice_shows_user_message() {
        let error = TailorError::MissingInput("job description");
        let html = form_page(&FormValues::default(), Some(Notice::Error(&error)));
        assert!(html.contains("Please provide the job description."));
        assert!(html.contains("data-code=\"MISSING_INPUT\""));
    }
}
