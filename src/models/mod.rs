pub mod account;
pub mod audit_log;
pub mod course;
pub mod exam_window;
pub mod notification;
pub mod question;
pub mod school;
pub mod score;
