//! Prompt templates.
//!
//! Output is a pure function of the arguments, which keeps cache keys stable.

/// Purpose tag for short-statement enrichment.
pub const PURPOSE_ENRICH: &str = "ENRICH";
/// Purpose tag for the executive summary.
pub const PURPOSE_BIO: &str = "BIO";
/// Purpose tag for the progression plan.
pub const PURPOSE_PLAN: &str = "PLAN";

/// Rewrites a keyword or short phrase into a full competency sentence.
pub fn enrich_prompt(statement: &str) -> String {
    format!(
        r#"Task: Turn this keyword or short phrase into a professional competency sentence for a resume.
Input: "{statement}"

STRICT RULES:
1. Do NOT add any technology or skill that is not implied by the original words.
2. The sentence must be grammatically complete (subject and verb, or an action).
3. No emojis.
4. Stay factual.

Example: "Python" -> "Development of scripts and applications in the Python language."
Example: "Project management" -> "Planning and follow-up of technical projects."
"#
    )
}

/// Three-sentence, third-person executive summary.
pub fn bio_prompt(inputs: &[String], target_job: &str, key_blocks: &[String]) -> String {
    format!(
        r#"Role: HR expert specialised in data professions.
Task: Write a short professional bio (3 sentences maximum) in the third person.
Target job: {target_job}
Key competencies detected: {blocks}
Candidate context: "{context}"

STYLE RULES:
- Strictly corporate and professional tone.
- No emojis.
- No introductory sentence such as "Here is the bio".
- Highlight technical expertise.
"#,
        blocks = key_blocks.join(", "),
        context = inputs.join(" "),
    )
}

/// Three concrete actions closing the listed gaps.
pub fn plan_prompt(target_job: &str, gaps: &[String]) -> String {
    format!(
        r#"Role: Senior tech mentor (CTO).
Goal: Prepare the candidate for the position of {target_job}.
Gaps to close: {gaps}.

Task: Propose an action plan in 3 concrete points (Markdown format).

RULES:
- Be direct and prescriptive (e.g. "Learn X", "Practice Y").
- No emojis.
- No marketing jargon, only technical or methodological advice.
- Bullet list format.
"#,
        gaps = gaps.join(", "),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enrich_prompt_quotes_statement() {
        let prompt = enrich_prompt("SQL");
        assert!(prompt.contains("Input: \"SQL\""));
    }

    #[test]
    fn test_bio_prompt_contents() {
        let prompt = bio_prompt(
            &["I build pipelines".to_string(), "I use dbt".to_string()],
            "Data Engineer",
            &["Data Architecture".to_string(), "Big Data & DevOps".to_string()],
        );
        assert!(prompt.contains("Target job: Data Engineer"));
        assert!(prompt.contains("Data Architecture, Big Data & DevOps"));
        assert!(prompt.contains("\"I build pipelines I use dbt\""));
    }

    #[test]
    fn test_plan_prompt_is_deterministic() {
        let gaps = vec!["Data Governance".to_string()];
        assert_eq!(plan_prompt("Data Engineer", &gaps), plan_prompt("Data Engineer", &gaps));
        assert!(plan_prompt("Data Engineer", &gaps).contains("Gaps to close: Data Governance."));
    }
}
