pub mod duration;
pub mod gateway;
pub mod giveaway;
pub mod options;
pub mod render;
pub mod reply;
#[cfg(test)]
pub mod testing;
pub mod winners;
