pub mod blog_service;
pub mod donation_service;
pub mod firebase_service;
pub mod fund_service;
pub mod payment_service;
pub mod user_service;
