pub mod cache;
pub mod cli;
pub mod common;
pub mod config;
pub mod constants;
pub mod errors;
pub mod gateway;
pub mod guards;
pub mod mint;
pub mod preview;
pub mod provision;
pub mod setup;
pub mod show;
pub mod utils;
pub mod validate;
pub mod wallet;
