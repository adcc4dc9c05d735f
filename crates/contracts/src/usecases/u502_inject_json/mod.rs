pub mod injector;
pub mod request;
pub mod response;

pub use injector::{inject_use_cases, InjectError};
pub use request::InjectRequest;
pub use response::InjectReport;

use crate::usecases::common::UseCaseMetadata;

pub struct InjectJson;

impl UseCaseMetadata for InjectJson {
    fn usecase_index() -> &'static str {
        "u502"
    }

    fn usecase_name() -> &'static str {
        "inject_json"
    }

    fn display_name() -> &'static str {
        "Inject JSON"
    }

    fn description() -> &'static str {
        "Add use cases to a family from a pasted JSON object"
    }

    fn api_path() -> &'static str {
        "/api/u502/inject"
    }
}
