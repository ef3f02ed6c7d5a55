pub mod json_guard;
pub mod parse;
