pub mod alert;
pub mod geolocation;
pub mod http_transport;
