pub mod lock_registry;
