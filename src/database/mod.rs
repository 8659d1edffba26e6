pub mod memory;
pub mod migration;
pub mod postgres;
