//! Admissions chatbot.
//!
//! The conversation lives in the browser and is sent whole with every question.
//! The request history is: a user turn carrying the student context and documents,
//! a canned model acknowledgement, then the conversation itself.

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::errors::AppError;
use crate::generation::attachments::build_parts;
use crate::generation::prompts::{CHAT_ACKNOWLEDGEMENT, CHAT_SYSTEM_TEMPLATE};
use crate::generation::selection::AvailableDocument;
use crate::llm_client::prompts::{fill, KOREAN_OUTPUT};
use crate::llm_client::{Content, Part, TextGenerator};
use crate::markdown::markdown_to_html;
use crate::profiles::models::ProfileInput;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChatReply {
    pub reply: String,
    /// `reply` rendered for display.
    pub html: String,
    pub documents_used: Vec<String>,
}

pub fn build_chat_contents(
    input: &ProfileInput,
    documents: &[AvailableDocument],
    history: &[ChatMessage],
) -> Vec<Content> {
    let system_text = fill(
        CHAT_SYSTEM_TEMPLATE,
        &[
            ("name", input.name.trim()),
            ("grade", input.grade.label()),
            ("target", &input.target),
            ("major", &input.major),
            ("language", KOREAN_OUTPUT),
        ],
    );
    let sources: Vec<_> = documents.iter().map(|d| d.source.clone()).collect();

    let mut context = vec![Part::Text(system_text)];
    context.extend(build_parts(&sources));

    let mut contents = Vec::with_capacity(history.len() + 2);
    contents.push(Content::user(context));
    contents.push(Content::model_text(CHAT_ACKNOWLEDGEMENT));
    contents.extend(history.iter().map(|m| match m.role {
        ChatRole::User => Content::user_text(m.content.clone()),
        ChatRole::Assistant => Content::model_text(m.content.clone()),
    }));
    contents
}

/// Answers the last user message of `history`.
pub async fn answer(
    generator: &dyn TextGenerator,
    model: &str,
    input: &ProfileInput,
    documents: &[AvailableDocument],
    history: &[ChatMessage],
) -> Result<ChatReply, AppError> {
    match history.last() {
        Some(last) if last.role == ChatRole::User && !last.content.trim().is_empty() => {}
        _ => {
            return Err(AppError::Validation(
                "The conversation must end with a non-empty user message.".to_string(),
            ))
        }
    }

    let contents = build_chat_contents(input, documents, history);
    info!(
        "Chat turn {} for '{}' with {} document(s)",
        history.len(),
        input.name.trim(),
        documents.len()
    );
    let reply = generator.generate(model, &contents).await?;

    Ok(ChatReply {
        html: markdown_to_html(&reply),
        reply,
        documents_used: documents.iter().map(|d| d.label.clone()).collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::documents::Upload;
    use crate::generation::selection::available_documents;
    use crate::llm_client::Role;
    use crate::testutil::StubGenerator;
    use bytes::Bytes;

    fn user(text: &str) -> ChatMessage {
        ChatMessage {
            role: ChatRole::User,
            content: text.to_string(),
        }
    }

    fn assistant(text: &str) -> ChatMessage {
        ChatMessage {
            role: ChatRole::Assistant,
            content: text.to_string(),
        }
    }

    fn profile() -> ProfileInput {
        ProfileInput {
            name: "Alex".to_string(),
            target: "NYU".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_history_layout() {
        let uploads = [Upload {
            name: "transcript.pdf".to_string(),
            content_type: None,
            data: Bytes::from_static(b"%PDF"),
        }];
        let docs = available_documents(None, &uploads);
        let history = [
            user("Does NYU require SAT?"),
            assistant("Test-optional."),
            user("And Harvard?"),
        ];

        let contents = build_chat_contents(&profile(), &docs, &history);

        assert_eq!(contents.len(), 5);
        assert_eq!(contents[0].role, Role::User);
        assert_eq!(contents[0].parts.len(), 2);
        assert!(matches!(&contents[0].parts[0], Part::Text(t) if t.contains("Target: NYU")));
        assert_eq!(contents[1], Content::model_text(CHAT_ACKNOWLEDGEMENT));
        assert_eq!(contents[3].role, Role::Model);
        assert_eq!(contents[4], Content::user_text("And Harvard?"));
    }

    #[test]
    fn test_chat_message_roles_deserialize_lowercase() {
        let messages: Vec<ChatMessage> = serde_json::from_str(
            r#"[{"role": "user", "content": "hi"}, {"role": "assistant", "content": "hello"}]"#,
        )
        .unwrap();
        assert_eq!(messages, vec![user("hi"), assistant("hello")]);
    }

    #[tokio::test]
    async fn test_answer_returns_model_text() {
        let generator = StubGenerator::replying("NYU is test-optional.");
        let reply = answer(&generator, "flash", &profile(), &[], &[user("SAT?")])
            .await
            .unwrap();

        assert_eq!(reply.reply, "NYU is test-optional.");
        assert_eq!(reply.html, "<p>NYU is test-optional.</p>\n");
        assert_eq!(generator.calls()[0].0, "flash");
    }

    #[tokio::test]
    async fn test_answer_requires_trailing_user_message() {
        let generator = StubGenerator::replying("unused");
        for history in [vec![], vec![user("q"), assistant("a")], vec![user("   ")]] {
            let err = answer(&generator, "flash", &profile(), &[], &history)
                .await
                .unwrap_err();
            assert!(matches!(err, AppError::Validation(_)));
        }
        assert!(generator.calls().is_empty());
    }
}
