//! Tests for token issuance and verification

#[cfg(test)]
mod service_tests;
