#![forbid(unsafe_code)]

pub mod config;
pub mod datamodel;
pub mod parsing;
pub mod storage;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
