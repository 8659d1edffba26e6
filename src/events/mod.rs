pub mod color;
pub mod command;
pub mod ready;
pub mod router;
pub mod updater;
