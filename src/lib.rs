pub mod config;
pub mod database;
pub mod dto;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod utils;

use crate::services::{
    account_service::AccountService, audit_service::AuditService, course_service::CourseService,
    exam_service::ExamService, notification_service::NotificationService,
    period_service::PeriodService, question_service::QuestionService,
    report_service::ReportService, school_service::SchoolService,
};
use sqlx::PgPool;

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub account_service: AccountService,
    pub school_service: SchoolService,
    pub course_service: CourseService,
    pub question_service: QuestionService,
    pub period_service: PeriodService,
    pub exam_service: ExamService,
    pub report_service: ReportService,
    pub notification_service: NotificationService,
    pub audit_service: AuditService,
}

impl AppState {
    pub fn new(pool: PgPool) -> Self {
        let config = crate::config::get_config();

        let account_service = AccountService::new(pool.clone());
        let school_service = SchoolService::new(pool.clone());
        let course_service = CourseService::new(pool.clone());
        let question_service = QuestionService::new(pool.clone());
        let period_service = PeriodService::new(pool.clone());
        let exam_service = ExamService::new(pool.clone(), config.retake_policy);
        let report_service = ReportService::new(pool.clone());
        let notification_service =
            NotificationService::new(pool.clone(), config.mail_gateway_url.clone());
        let audit_service = AuditService::new(pool.clone());

        Self {
            pool,
            account_service,
            school_service,
            course_service,
            question_service,
            period_service,
            exam_service,
            report_service,
            notification_service,
            audit_service,
        }
    }
}
