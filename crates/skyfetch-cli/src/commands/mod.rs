pub mod common;
pub mod config;
pub mod inspect;
pub mod query;
pub mod run;
pub mod show;
pub mod urls;
