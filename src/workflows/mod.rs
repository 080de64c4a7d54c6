pub mod aggregate;
pub mod chart;
pub mod export;
pub mod extract;
pub mod filter;
pub mod pipeline;
