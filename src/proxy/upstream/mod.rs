pub mod client;
pub mod tls;
