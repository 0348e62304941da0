pub mod config;
pub mod documents;
pub mod errors;
pub mod forms;
pub mod generation;
pub mod llm_client;
pub mod markdown;
pub mod newsletter;
pub mod profiles;
pub mod routes;
pub mod state;
pub mod storage;

#[cfg(test)]
pub mod testutil;
