pub mod account_service;
pub mod audit_service;
pub mod course_service;
pub mod exam_service;
pub mod grading_service;
pub mod notification_service;
pub mod period_service;
pub mod question_service;
pub mod report_service;
pub mod school_service;
