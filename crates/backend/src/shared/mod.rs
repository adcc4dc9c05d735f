pub mod config;
pub mod gist;
pub mod llm;
