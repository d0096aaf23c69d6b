//! HTTP API tests
