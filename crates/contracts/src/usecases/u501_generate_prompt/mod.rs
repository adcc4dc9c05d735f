pub mod request;
pub mod response;
pub mod renderer;

pub use renderer::{render_use_case, Rendering};
pub use request::GenerateRequest;
pub use response::GenerateResponse;

use crate::usecases::common::UseCaseMetadata;

pub struct GeneratePrompt;

impl UseCaseMetadata for GeneratePrompt {
    fn usecase_index() -> &'static str {
        "u501"
    }

    fn usecase_name() -> &'static str {
        "generate_prompt"
    }

    fn display_name() -> &'static str {
        "Generate prompt"
    }

    fn description() -> &'static str {
        "Fill the variable form and substitute the values into the use case template"
    }

    fn api_path() -> &'static str {
        "/api/u501/generate"
    }
}
