pub mod holder;
pub mod key_management;
