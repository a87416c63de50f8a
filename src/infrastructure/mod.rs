pub mod core;
pub mod factory;
pub mod mock;
pub mod news;
pub mod notify;
pub mod observability;
pub mod openai;
