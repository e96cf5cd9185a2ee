pub mod credentials;
pub mod manager;
pub mod token;

pub use manager::TokenManager;
