pub mod aggregate;
pub mod defaults;
pub mod dto;
pub mod normalizer;
pub mod search;
