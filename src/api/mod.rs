pub mod client;
pub mod gateway;
pub mod response;
pub mod scripts;
