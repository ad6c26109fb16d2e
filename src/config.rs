// src/config.rs

use sqlx::{postgres::PgPoolOptions, PgPool};
use std::{env, time::Duration};

use crate::{
    common::i18n::I18nStore,
    db::{
        DashboardRepository, FinanceRepository, ItineraryRepository, QuoteRepository,
        ReportRepository, TripRepository, UserRepository,
    },
    services::{
        auth::AuthService, dashboard_service::DashboardService, document_service::DocumentService,
        finance_service::FinanceService, quote_service::QuoteService, report_service::ReportService,
        trip_service::TripService,
    },
};

#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub jwt_secret: String,
    pub i18n_store: I18nStore,

    pub auth_service: AuthService,
    pub trip_service: TripService,
    pub finance_service: FinanceService,
    pub report_service: ReportService,
    pub document_service: DocumentService,
    pub quote_service: QuoteService,
    pub dashboard_service: DashboardService,

    // O cadastro de usuários é simples o bastante para os handlers falarem
    // direto com o repositório
    pub user_repo: UserRepository,
}

impl AppState {
    pub async fn new() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let database_url = env::var("DATABASE_URL").expect("DATABASE_URL deve ser definida");
        let jwt_secret = env::var("JWT_SECRET").expect("JWT_SECRET deve ser definido");

        // Conecta ao banco de dados, usando '?' para propagar erros
        let db_pool = PgPoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(3))
            .connect(&database_url)
            .await?;

        tracing::info!("✅ Conexão com o banco de dados estabelecida com sucesso!");

        // --- Monta o gráfico de dependências ---
        let user_repo = UserRepository::new(db_pool.clone());
        let trip_repo = TripRepository::new(db_pool.clone());
        let itinerary_repo = ItineraryRepository::new(db_pool.clone());
        let finance_repo = FinanceRepository::new(db_pool.clone());
        let report_repo = ReportRepository::new(db_pool.clone());
        let quote_repo = QuoteRepository::new(db_pool.clone());
        let dashboard_repo = DashboardRepository::new(db_pool.clone());

        let auth_service = AuthService::new(user_repo.clone(), jwt_secret.clone());
        let trip_service = TripService::new(
            trip_repo.clone(),
            itinerary_repo,
            finance_repo.clone(),
            user_repo.clone(),
        );
        let finance_service = FinanceService::new(finance_repo, trip_repo);
        let report_service = ReportService::new(report_repo);
        let document_service = DocumentService::new();
        let quote_service = QuoteService::new(quote_repo);
        let dashboard_service = DashboardService::new(dashboard_repo);

        Ok(Self {
            db_pool,
            jwt_secret,
            i18n_store: I18nStore::new(),
            auth_service,
            trip_service,
            finance_service,
            report_service,
            document_service,
            quote_service,
            dashboard_service,
            user_repo,
        })
    }
}
