pub mod request_trace;
