pub mod analysis;
pub mod common;
pub mod config;
pub mod storage;
pub mod web;
