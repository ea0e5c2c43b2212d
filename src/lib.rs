pub mod cli;
pub mod client;
pub mod config;
pub mod error;
pub mod global;
pub mod meeting;
pub mod models;
pub mod tasks;

pub use error::{Error, Result};
