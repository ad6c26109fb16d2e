pub mod user_repo;
pub use user_repo::UserRepository;
pub mod trip_repo;
pub use trip_repo::TripRepository;
pub mod itinerary_repo;
pub use itinerary_repo::ItineraryRepository;
pub mod finance_repo;
pub use finance_repo::FinanceRepository;
pub mod report_repo;
pub use report_repo::ReportRepository;
pub mod quote_repo;
pub use quote_repo::QuoteRepository;
pub mod dashboard_repo;
pub use dashboard_repo::DashboardRepository;
