//! Integration tests over the public library API.

mod config_tests;
mod landing_tests;
mod search_scenarios;
