pub mod auth;
pub mod dashboard;
pub mod finance;
pub mod itinerary;
pub mod quote;
pub mod report;
pub mod trip;
