pub mod auth;
pub mod server;
pub mod speak;
pub mod token;
