pub mod api;
pub mod form;
pub mod view;
