// All LLM prompt constants for the analysis module.
// Reuses cross-cutting fragments from llm_client::prompts.

pub use crate::llm_client::prompts::JSON_ONLY_SYSTEM as ANALYSIS_SYSTEM;

/// Upper bound on suggested missing skills, stated in the prompt.
pub const MAX_MISSING_SKILLS: usize = 8;

/// Skill-gap prompt template. Filled by `build_analysis_prompt`.
pub const ANALYSIS_PROMPT_TEMPLATE: &str = r#"You are a resume analysis AI. Carefully analyze the resume text below and the target job field.
The user is targeting the field: "{job_field}".
Identify the candidate's skills, suggest skills that are missing for this field, and give one learning resource URL for each missing skill.

TASKS (strict):
1. "detected_skills": skills EXPLICITLY listed in the resume (e.g. a "Skills" section) PLUS skills INFERRED from the candidate's experience (work, projects, volunteering, coursework).
   - Example: "Built a web app using React and Node" => "React", "Node.js", "Web Development".
   - Example: "Led a 5-person team" => "Leadership", "Team Management".
   - If no skills are detected, return an empty list.
2. "missing_skills": up to {max_missing} skills commonly expected for the target job field that are NOT in detected_skills.
   - Never list a skill in missing_skills if it appears in detected_skills, explicit OR inferred.
3. "resources": exactly ONE learning resource per missing skill, as an object with keys "skill" and "resource".
   - "resource" must be a direct, valid URL (official docs, course pages, tutorials).
   - Do NOT use search-result pages (e.g. Google search URLs) or link shorteners.
4. Output valid JSON ONLY: double-quoted keys and strings, no trailing commas, no comments, no markdown, nothing before or after the object.

OUTPUT SCHEMA (return exactly this structure):
{
  "detected_skills": ["string"],
  "missing_skills": ["string"],
  "resources": [{"skill": "string", "resource": "https://..."}]
}

RESUME TEXT:
{resume_text}

TARGET JOB FIELD:
{job_field}"#;

/// Builds the analysis prompt. Resume text and job field are embedded verbatim.
pub fn build_analysis_prompt(resume_text: &str, job_field: &str) -> String {
    let max_missing = MAX_MISSING_SKILLS.to_string();
    fill_template(
        ANALYSIS_PROMPT_TEMPLATE,
        &[
            ("job_field", job_field),
            ("resume_text", resume_text),
            ("max_missing", &max_missing),
        ],
    )
}

/// Single-pass `{name}` substitution: inserted values are never rescanned,
/// so braces inside the resume survive untouched.
fn fill_template(template: &str, values: &[(&str, &str)]) -> String {
    let inserted: usize = values.iter().map(|(_, v)| v.len()).sum();
    let mut out = String::with_capacity(template.len() + inserted);
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let placeholder = after.find('}').and_then(|close| {
            let name = &after[..close];
            values
                .iter()
                .find(|(key, _)| *key == name)
                .map(|(_, value)| (close, *value))
        });

        match placeholder {
            Some((close, value)) => {
                out.push_str(value);
                rest = &after[close + 1..];
            }
            None => {
                out.push('{');
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}
