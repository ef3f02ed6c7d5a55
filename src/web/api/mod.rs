pub mod inspect;
pub mod meta;
pub mod parse;
pub mod upload;
