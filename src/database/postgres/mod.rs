pub mod giveaways;
