// Prompts for the direct LLM tailoring backend.

/// Role description; `JSON_ONLY_SYSTEM` is appended at call time.
pub const TAILOR_SYSTEM: &str = "You are an expert resume writer. You rewrite a candidate's \
    resume so it speaks to a specific job description, using only facts present in the resume. \
    Never invent employers, dates, titles, degrees or metrics.";

/// Replace `{job_description}` and `{resume_text}` before sending.
pub const TAILOR_PROMPT_TEMPLATE: &str = r#"Rewrite the resume below for the job description below.

Return a JSON object with this EXACT shape:
{
  "tailoredResume": "<the full rewritten resume as plain text>",
  "analysis": {
    "matchedSkills": ["..."],
    "missingSkills": ["..."],
    "summary": "<two or three sentences on fit>"
  }
}

Rules:
- Keep every section of the original resume; reorder and reword bullets to foreground relevant experience.
- Mirror the job description's terminology only where the resume supports it.
- List in missingSkills the requirements the resume gives no evidence for.

JOB DESCRIPTION:
{job_description}

RESUME:
{resume_text}"#;
