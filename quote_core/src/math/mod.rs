pub mod moving_average;
pub mod rsi;
