pub mod auth;
pub use auth::AuthService;
pub mod trip_service;
pub use trip_service::TripService;
pub mod finance_service;
pub use finance_service::FinanceService;
pub mod report_service;
pub use report_service::ReportService;
pub mod document_service;
pub use document_service::DocumentService;
pub mod quote_service;
pub use quote_service::QuoteService;
pub mod dashboard_service;
pub use dashboard_service::DashboardService;
