// All LLM prompt templates for the master plan and the chatbot.
// Reuses cross-cutting fragments from llm_client::prompts.

/// Master plan prompt. Placeholders: `{persona}`, `{name}`, `{grade}`, `{target}`,
/// `{major}`, `{status}`.
pub const MASTER_PLAN_TEMPLATE: &str = r#"{persona}
You strictly follow the 2026 US Common App & University specific trends.

[Student Profile]
- Name: {name}
- Grade: {grade}
- Target Colleges: {target}
- Intended Major: {major}
- Profile Summary: {status}

[Request]
Create a highly detailed 'US College Admissions Master Plan' in Korean.

1. **Holistic Review Strategy**: Analyze GPA (Weighted/Unweighted), Rigor (AP/IB), Standardized Tests (SAT/ACT), and Extracurriculars. Identify the student's "Spike" or "Theme".
2. **Timeline & Monthly Action Plan**: Provide a month-by-month checklist up to graduation. Include specific times for SAT/ACT attempts, Summer Programs (RSI, TASP, etc.), Internship hunting, and Essay brainstorming.
3. **College List Strategy**: Suggest a balanced list (Reach, Match, Safety) if targets are unrealistic, or refine strategies for the targets.
4. **Application Strategy**: Early Decision (ED) vs Early Action (EA) vs Regular Decision (RD) recommendations.

Output in clean Markdown (Korean). Use a Table for the Monthly Action Plan."#;

/// Chatbot context turn. Placeholders: `{name}`, `{grade}`, `{target}`, `{major}`,
/// `{language}`.
pub const CHAT_SYSTEM_TEMPLATE: &str = r#"You are a knowledgeable US College Admissions Chatbot.
Student Info: {name}, {grade}, Target: {target}, Major: {major}.

[Attached Documents]
The user has provided the following files (Transcripts, Essays, etc.).
Use the information in these files to answer specific questions (e.g., "What is my GPA?", "Critique my essay").

Answer questions about Common App, Essays, SAT/ACT, Financial Aid, and specific university culture.
Be concise and encouraging.
{language}"#;

/// Model turn inserted after the context so the conversation starts primed.
pub const CHAT_ACKNOWLEDGEMENT: &str =
    "네, 학생의 자료와 정보를 숙지했습니다. 무엇이든 물어보세요!";

/// Header placed before text extracted from a Word document.
pub fn attached_document_header(name: &str) -> String {
    format!("\n[Attached Document Content: {name}]\n")
}
