pub mod config;
pub mod driver;
pub mod parser;
pub mod planner;
pub mod validate;
