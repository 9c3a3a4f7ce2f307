#![warn(clippy::uninlined_format_args)]

pub mod json_parser;

pub use json_parser::JsonTravelParser;
