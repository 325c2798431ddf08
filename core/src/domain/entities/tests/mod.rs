mod pending_tests;
mod user_tests;
