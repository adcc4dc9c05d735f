//! Use case editor (MVVM)
//!
//! Structure:
//! - model.rs: plain form data and conversion to the persisted JSON shape
//! - view_model.rs: UseCaseEditorVm with RwSignals
//! - view.rs: Main component UseCaseEditor

mod model;
mod view;
mod view_model;

pub use view::UseCaseEditor;
pub use view_model::UseCaseEditorVm;
