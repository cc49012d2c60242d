pub mod api;
pub mod fetch;
pub mod issues;
pub mod publish;
