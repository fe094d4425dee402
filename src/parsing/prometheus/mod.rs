pub mod common;
pub mod remote_read_models;
pub mod remote_read_parser;
pub mod remote_write_models;
pub mod remote_write_parser;
