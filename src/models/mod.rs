pub mod command;
pub mod config;
pub mod display;
pub mod gateway;
pub mod giveaway;
pub mod handler;
pub mod response;
pub mod store;
