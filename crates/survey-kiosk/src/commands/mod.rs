pub mod config;
pub mod questions;
pub mod responses;
pub mod run;
