pub mod subscriptions;
pub mod trades;
pub mod users;
