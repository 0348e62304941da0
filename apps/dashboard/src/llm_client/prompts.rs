// Shared prompt fragments.
// Each service that needs LLM calls defines its own prompts.rs alongside it.
// This file contains cross-cutting fragments.

/// Persona line opening every consultant-voiced prompt.
pub const CONSULTANT_PERSONA: &str = "You are an expert US College Admissions Consultant (Elite Level).";

/// Appended to prompts whose output is shown to Korean-speaking families.
pub const KOREAN_OUTPUT: &str = "IMPORTANT: Always answer in Korean (한국어).";

/// Substitutes `{key}` placeholders in a prompt template in a single pass, so
/// braces inside substituted values are never expanded.
pub fn fill(template: &str, vars: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let value = after.find('}').and_then(|close| {
            let key = &after[..close];
            vars.iter()
                .find(|(k, _)| *k == key)
                .map(|(_, v)| (*v, close))
        });
        match value {
            Some((v, close)) => {
                out.push_str(v);
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
