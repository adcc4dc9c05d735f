pub mod executor;
pub mod template_loader;

pub use executor::AssistantExecutor;
