// src/services/quote_service.rs

use sqlx::{Executor, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::QuoteRepository,
    models::{
        auth::{User, UserRole},
        quote::{CreateQuotePayload, QuoteRequest, UpdateQuotePayload},
    },
};

#[derive(Clone)]
pub struct QuoteService {
    repo: QuoteRepository,
}

impl QuoteService {
    pub fn new(repo: QuoteRepository) -> Self {
        Self { repo }
    }

    pub async fn create<'e, E>(
        &self,
        executor: E,
        user: &User,
        payload: &CreateQuotePayload,
    ) -> Result<QuoteRequest, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let quote = self.repo.create(executor, user.id, payload).await?;
        tracing::info!("📨 Novo pedido de orçamento de {} para {}", user.email, quote.destination);
        Ok(quote)
    }

    // Cliente vê só os próprios pedidos; o escritório vê todos
    pub async fn list_for<'e, E>(
        &self,
        executor: E,
        user: &User,
    ) -> Result<Vec<QuoteRequest>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let client_filter = match user.role {
            UserRole::Client => Some(user.id),
            _ => None,
        };
        self.repo.list_scoped(executor, client_filter).await
    }

    pub async fn update<'e, E>(
        &self,
        executor: E,
        user: &User,
        quote_id: Uuid,
        payload: &UpdateQuotePayload,
    ) -> Result<QuoteRequest, AppError>
    where
        E: Executor<'e, Database = Postgres> + sqlx::Acquire<'e, Database = Postgres>,
    {
        let mut tx = executor.begin().await?;

        let quote = self
            .repo
            .find_by_id(&mut *tx, quote_id)
            .await?
            .ok_or_else(|| AppError::ResourceNotFound(format!("Quote request {quote_id}")))?;

        if user.role == UserRole::Client && quote.client_id != user.id {
            return Err(AppError::Forbidden(
                "you can only update your own quote requests".to_string(),
            ));
        }

        let updated = self
            .repo
            .update(&mut *tx, quote_id, payload.status, payload.notes.as_deref())
            .await?;

        tx.commit().await?;
        Ok(updated)
    }
}
