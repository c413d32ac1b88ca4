pub mod config;
pub mod grading;
pub mod history;
pub mod output;
pub mod request;
