pub mod admin;
pub mod auth;
pub mod course;
pub mod exam;
pub mod export;
pub mod health;
pub mod question;
