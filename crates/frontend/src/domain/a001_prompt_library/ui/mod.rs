pub mod details;
pub mod family_picker;
pub mod home;
pub mod list;
