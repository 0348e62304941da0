// Generation: master plan and chatbot.
// Builds mixed text + document prompts and sends them through llm_client;
// no direct model API calls here.

pub mod attachments;
pub mod chat;
pub mod handlers;
pub mod master_plan;
pub mod prompts;
pub mod selection;
