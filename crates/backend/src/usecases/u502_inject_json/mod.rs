pub mod executor;

pub use executor::InjectExecutor;
