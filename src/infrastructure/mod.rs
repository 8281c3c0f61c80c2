pub mod config;
pub mod engines;
pub mod http;
pub mod process;
pub mod repositories;
pub mod scratch;
pub mod transcoder;
