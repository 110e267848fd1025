mod common;
mod pack_tests;
