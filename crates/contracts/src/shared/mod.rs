pub mod navigation;
pub mod placeholder;
