// Shared fixtures for integration tests. Each test binary uses a subset.
#![allow(dead_code)]

pub mod builders;
pub mod strategies;
