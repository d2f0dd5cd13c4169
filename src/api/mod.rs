pub mod blogs;
pub mod donations;
pub mod funds;
pub mod health;
pub mod payments;
pub mod swagger;
pub mod users;
