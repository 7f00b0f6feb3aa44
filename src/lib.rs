pub mod config;
pub mod fetch;
pub mod model;
pub mod output;
pub mod parser;
pub mod traffic;
pub mod view;
