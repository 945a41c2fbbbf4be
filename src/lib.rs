pub mod cli;
pub mod config;
pub mod controller;
pub mod error;
pub mod output;
pub mod powercfg;
pub mod profile;
pub mod worker;
