pub mod document_store;
pub mod gist_api_client;
pub mod library_store;

pub use document_store::DocumentStore;
pub use gist_api_client::{GistApiClient, GistError};
pub use library_store::{LibraryStore, LoadReport, LIBRARY_STORE};
