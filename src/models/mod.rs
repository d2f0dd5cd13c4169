pub mod blog;
pub mod donation;
pub mod fund;
pub mod user;

pub use blog::*;
pub use donation::*;
pub use fund::*;
pub use user::*;
