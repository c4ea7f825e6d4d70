pub mod quote_config;
