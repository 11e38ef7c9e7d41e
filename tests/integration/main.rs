//! End-to-end crawler tests against local mock servers

mod crawl_tests;
