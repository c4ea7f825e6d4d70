pub mod cache;
pub mod quote_exception;
pub mod utils;
