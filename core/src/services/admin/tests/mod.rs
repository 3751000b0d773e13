//! Tests for the user administration service

#[cfg(test)]
mod service_tests;
