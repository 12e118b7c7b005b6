pub mod notifier;
pub mod seed;
