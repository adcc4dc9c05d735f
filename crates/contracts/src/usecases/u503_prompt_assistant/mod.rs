pub mod meta_prompt;
pub mod request;
pub mod response;

pub use meta_prompt::{
    build_meta_prompt, extract_json_object, FALLBACK_CREATE_TEMPLATE, FALLBACK_IMPROVE_TEMPLATE,
};
pub use request::{AssistantMode, MetaPromptRequest};
pub use response::{MetaPromptResponse, TemplateSource};

use crate::usecases::common::UseCaseMetadata;

pub struct PromptAssistant;

impl UseCaseMetadata for PromptAssistant {
    fn usecase_index() -> &'static str {
        "u503"
    }

    fn usecase_name() -> &'static str {
        "prompt_assistant"
    }

    fn display_name() -> &'static str {
        "Prompt assistant"
    }

    fn description() -> &'static str {
        "Meta-prompt for creating a new use case or improving an existing one"
    }

    fn api_path() -> &'static str {
        "/api/u503/meta-prompt"
    }
}
