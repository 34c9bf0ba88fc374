//! Integration tests for jsonapi-lib's public codec surface.

mod properties_tests;
mod scenarios_tests;
