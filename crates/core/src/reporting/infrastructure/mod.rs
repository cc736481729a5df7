pub mod http_reporter;
