// Shared test infrastructure for integration tests.
//
// Each integration test target pulls this in with a #[path] module, so not
// every target uses every helper.
#![allow(dead_code)]


pub use test_data::*;
pub use test_database::*;
