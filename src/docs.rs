// src/docs.rs

use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use utoipa::OpenApi;

use crate::handlers;
use crate::models;

#[derive(OpenApi)]
#[openapi(
    paths(
        // --- Auth ---
        handlers::auth::register,
        handlers::auth::login,
        handlers::auth::get_me,

        // --- Users / Clients ---
        handlers::users::list_users,
        handlers::users::list_clients,
        handlers::users::client_details,
        handlers::users::client_financial_summary,

        // --- Trips ---
        handlers::trips::list_trips,
        handlers::trips::list_trips_with_details,
        handlers::trips::create_trip,
        handlers::trips::get_trip,
        handlers::trips::get_trip_full,
        handlers::trips::update_trip,
        handlers::trips::delete_trip,
        handlers::trips::update_trip_status,

        // --- Itineraries ---
        handlers::itineraries::list_itineraries,
        handlers::itineraries::create_itinerary,
        handlers::itineraries::update_itinerary,
        handlers::itineraries::delete_itinerary,

        // --- Finance ---
        handlers::finance::create_trip_admin,
        handlers::finance::get_trip_admin,
        handlers::finance::update_trip_admin,
        handlers::finance::create_payment,
        handlers::finance::list_payments,
        handlers::finance::delete_payment,

        // --- Reports / Notifications ---
        handlers::reports::financial_report,
        handlers::reports::export_financial_report,
        handlers::reports::payment_deadlines,

        // --- Quotes ---
        handlers::quotes::create_quote_request,
        handlers::quotes::list_quote_requests,
        handlers::quotes::update_quote_request,

        // --- Dashboard ---
        handlers::dashboard::get_stats,
    ),
    components(
        schemas(
            // --- Auth ---
            models::auth::UserRole,
            models::auth::User,
            models::auth::PartyInfo,
            models::auth::RegisterUserPayload,
            models::auth::LoginUserPayload,
            models::auth::UpdateUserPayload,
            models::auth::AuthResponse,

            // --- Trips ---
            models::trip::TripType,
            models::trip::TripStatus,
            models::trip::Trip,
            models::trip::TripWithParties,
            models::trip::TripWithFinancial,
            models::trip::ClientDetails,
            models::trip::CreateTripPayload,
            models::trip::UpdateTripPayload,
            models::trip::UpdateTripStatusPayload,
            models::trip::DeletedTripSummary,
            models::trip::DeletedCounts,

            // --- Itineraries ---
            models::itinerary::ItineraryType,
            models::itinerary::Itinerary,
            models::itinerary::CreateItineraryPayload,

            // --- Finance ---
            models::finance::AdminStatus,
            models::finance::PaymentType,
            models::finance::TripFinancialRecord,
            models::finance::Payment,
            models::finance::CreateTripAdminPayload,
            models::finance::UpdateTripAdminPayload,
            models::finance::CreatePaymentPayload,

            // --- Reports ---
            models::report::DetailedTripRow,
            models::report::ReportTotals,
            models::report::MonthlySummary,
            models::report::ReportPeriod,
            models::report::FinancialReport,
            models::report::DeadlinePriority,
            models::report::PaymentDeadlineNotification,
            models::report::PaymentDeadlines,
            models::report::ConfirmedBookings,
            models::report::PendingBookings,
            models::report::ClientFinancialStats,
            models::report::ClientFinancialSummary,

            // --- Quotes ---
            models::quote::QuoteStatus,
            models::quote::QuoteRequest,
            models::quote::CreateQuotePayload,
            models::quote::UpdateQuotePayload,

            // --- Dashboard ---
            models::dashboard::DashboardStats,
        )
    ),
    tags(
        (name = "Auth", description = "Autenticação e Registro"),
        (name = "Users", description = "Gestão de Usuários"),
        (name = "Clients", description = "Carteira de Clientes e Resumos Financeiros"),
        (name = "Trips", description = "Gestão de Viagens e Ciclo de Vida"),
        (name = "Itineraries", description = "Roteiro Dia a Dia"),
        (name = "Finance", description = "Fichas Financeiras e Pagamentos"),
        (name = "Reports", description = "Relatórios Financeiros e Exportação"),
        (name = "Notifications", description = "Vencimentos de Pagamento"),
        (name = "Quotes", description = "Pedidos de Orçamento"),
        (name = "Dashboard", description = "Indicadores por Papel")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "api_jwt",
            SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
        );
    }
}
