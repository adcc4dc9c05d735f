pub mod executor;

pub use executor::GenerateExecutor;
