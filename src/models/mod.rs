pub mod credential;
pub mod identity;
pub mod lock;
