mod json_writer_tests;
mod utils;
