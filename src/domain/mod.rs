pub mod article;
pub mod errors;
pub mod ports;
pub mod scores;
pub mod sector;
pub mod signal;
