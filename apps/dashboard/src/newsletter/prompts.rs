// Newsletter prompt and fixed copy.

/// Monthly action plan prompt. Placeholders: `{persona}`, `{grade}`, `{month}`.
pub const MONTHLY_PLAN_TEMPLATE: &str = r####"{persona}
Target Audience: High School Students in {grade}.
Current Month: {month}.

Create a highly motivating, professional 'Monthly Action Plan' for this specific month.

Structure:
0. **Title**: # {month} Monthly Action Plan
1. **Greeting**: Start with "Welcome, {grade} Students." followed by a motivating opening about where they are in the academic year (e.g., "pivotal milestone", "halfway mark").
2. **Target Focus** (1 clear headline starting with "Target Focus:")
3. **Checklist** (3-4 specific, actionable items. MUST use bulleted checkboxes format: "- [ ] Item text...")
4. **Consultant's Tip** (Headline: "### Consultant's Tip", followed by bold advice)

IMPORTANT: Do NOT use strikethrough (~~text~~) formatting. If something is important, use **Bold** instead.
Output in English. Use Markdown formatting."####;

/// Footer appended to every newsletter body.
pub const SIGNATURE: &str = r#"
Sent by Elite Prep Master Plan & Academic Consulting

Andy Lee  | Branch Director <br>
Elite Prep Suwanee powered by Elite Open School <br>
1291 Old Peachtree Rd. NW #127, Suwanee, GA 30024 <br>
Tel & Text: 470.253.1004
"#;

pub fn newsletter_title(month: &str) -> String {
    format!("# Elite Prep – {month} Academic Master Plan\n\n")
}

pub fn newsletter_subject(month: &str) -> String {
    format!("[{month}] Monthly Academic Master Plan")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_monthly_template_keeps_tip_heading() {
        assert!(MONTHLY_PLAN_TEMPLATE.contains("(Headline: \"### Consultant's Tip\", followed by bold advice)"));
        assert!(MONTHLY_PLAN_TEMPLATE.ends_with("Output in English. Use Markdown formatting."));
    }

    #[test]
    fn test_subject_and_title() {
        assert_eq!(newsletter_subject("May"), "[May] Monthly Academic Master Plan");
        assert_eq!(newsletter_title("May"), "# Elite Prep – May Academic Master Plan\n\n");
    }
}
