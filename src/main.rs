// src/main.rs

use axum::{
    middleware as axum_middleware,
    routing::{delete, get, post, put},
    Router,
};
use tokio::net::TcpListener;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

mod common;
mod config;
mod db;
mod docs;
mod handlers;
mod middleware;
mod models;
mod services;

use crate::config::AppState;
use crate::middleware::auth::auth_guard;

#[tokio::main]
async fn main() {
    // Inicializa o logger
    tracing_subscriber::fmt().with_target(false).compact().init();

    // .expect() é bom aqui: se a configuração falhar, a aplicação não deve iniciar.
    let app_state = AppState::new()
        .await
        .expect("Falha ao inicializar o estado da aplicação.");

    // Roda as migrações do SQLx na inicialização
    sqlx::migrate!()
        .run(&app_state.db_pool)
        .await
        .expect("Falha ao rodar as migrações do banco de dados.");

    tracing::info!("✅ Migrações do banco de dados executadas com sucesso!");

    // Rotas de autenticação (públicas)
    let auth_routes = Router::new()
        .route("/register", post(handlers::auth::register))
        .route("/login", post(handlers::auth::login));

    let user_routes = Router::new()
        .route("/me", get(handlers::auth::get_me))
        .route("/", get(handlers::users::list_users))
        .route(
            "/{user_id}",
            get(handlers::users::get_user)
                .put(handlers::users::update_user)
                .delete(handlers::users::delete_user),
        )
        .route("/{user_id}/block", post(handlers::users::block_user))
        .route("/{user_id}/unblock", post(handlers::users::unblock_user))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    let client_routes = Router::new()
        .route("/", get(handlers::users::list_clients))
        .route("/{client_id}/details", get(handlers::users::client_details))
        .route(
            "/{client_id}/financial-summary",
            get(handlers::users::client_financial_summary),
        )
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    let trip_routes = Router::new()
        .route(
            "/",
            get(handlers::trips::list_trips).post(handlers::trips::create_trip),
        )
        .route("/with-details", get(handlers::trips::list_trips_with_details))
        .route(
            "/{trip_id}",
            get(handlers::trips::get_trip)
                .put(handlers::trips::update_trip)
                .delete(handlers::trips::delete_trip),
        )
        .route("/{trip_id}/full", get(handlers::trips::get_trip_full))
        .route("/{trip_id}/status", put(handlers::trips::update_trip_status))
        .route(
            "/{trip_id}/itineraries",
            get(handlers::itineraries::list_itineraries),
        )
        .route(
            "/{trip_id}/admin",
            get(handlers::finance::get_trip_admin).post(handlers::finance::create_trip_admin),
        )
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    let itinerary_routes = Router::new()
        .route("/", post(handlers::itineraries::create_itinerary))
        .route(
            "/{itinerary_id}",
            put(handlers::itineraries::update_itinerary)
                .delete(handlers::itineraries::delete_itinerary),
        )
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    let trip_admin_routes = Router::new()
        .route("/{admin_id}", put(handlers::finance::update_trip_admin))
        .route(
            "/{admin_id}/payments",
            get(handlers::finance::list_payments).post(handlers::finance::create_payment),
        )
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    let payment_routes = Router::new()
        .route("/{payment_id}", delete(handlers::finance::delete_payment))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    let report_routes = Router::new()
        .route("/financial", get(handlers::reports::financial_report))
        .route(
            "/financial/export",
            get(handlers::reports::export_financial_report),
        )
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    let quote_routes = Router::new()
        .route(
            "/",
            get(handlers::quotes::list_quote_requests).post(handlers::quotes::create_quote_request),
        )
        .route("/{request_id}", put(handlers::quotes::update_quote_request))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    let dashboard_routes = Router::new()
        .route("/stats", get(handlers::dashboard::get_stats))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    let notification_routes = Router::new()
        .route(
            "/payment-deadlines",
            get(handlers::reports::payment_deadlines),
        )
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    // Combina tudo no router principal
    let app = Router::new()
        .route("/api/health", get(|| async { "OK" }))
        .nest("/api/auth", auth_routes)
        .nest("/api/users", user_routes)
        .nest("/api/clients", client_routes)
        .nest("/api/trips", trip_routes)
        .nest("/api/itineraries", itinerary_routes)
        .nest("/api/trip-admin", trip_admin_routes)
        .nest("/api/payments", payment_routes)
        .nest("/api/reports", report_routes)
        .nest("/api/quote-requests", quote_routes)
        .nest("/api/dashboard", dashboard_routes)
        .nest("/api/notifications", notification_routes)
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", docs::ApiDoc::openapi()))
        .with_state(app_state);

    // Inicia o servidor
    let addr = "0.0.0.0:3000";
    let listener = TcpListener::bind(addr)
        .await
        .expect("Falha ao iniciar o listener TCP");
    tracing::info!("🚀 Servidor escutando em {}", listener.local_addr().unwrap());
    axum::serve(listener, app).await.expect("Erro no servidor Axum");
}
