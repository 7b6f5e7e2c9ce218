pub mod client_ip;
pub mod payload;
pub mod request_id;
