pub mod config;
pub mod output;
pub mod summarize;
pub mod transcript;
