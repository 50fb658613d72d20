mod incremental_merger_tests;
mod incremental_response_stream_tests;
mod operation_tests;
mod utils;
