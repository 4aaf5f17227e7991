pub mod domain;
pub mod error;
pub mod parse;
pub mod patch;
pub mod section;
pub mod services;
