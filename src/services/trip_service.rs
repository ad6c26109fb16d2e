// src/services/trip_service.rs

use std::collections::HashMap;

use sqlx::{Acquire, Executor, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{FinanceRepository, ItineraryRepository, TripRepository, UserRepository},
    models::{
        auth::{User, UserRole},
        finance::AdminStatus,
        itinerary::{CreateItineraryPayload, Itinerary},
        trip::{
            ClientDetails, CreateTripPayload, DeletedCounts, DeletedTripSummary, Trip, TripStatus,
            TripWithFinancial, TripWithParties, UpdateTripPayload,
        },
    },
};

#[derive(Clone)]
pub struct TripService {
    repo: TripRepository,
    itinerary_repo: ItineraryRepository,
    finance_repo: FinanceRepository,
    user_repo: UserRepository,
}

impl TripService {
    pub fn new(
        repo: TripRepository,
        itinerary_repo: ItineraryRepository,
        finance_repo: FinanceRepository,
        user_repo: UserRepository,
    ) -> Self {
        Self {
            repo,
            itinerary_repo,
            finance_repo,
            user_repo,
        }
    }

    // Escopo de listagem por papel: admin tudo, agente e cliente só o seu
    fn scope_filters(user: &User) -> (Option<Uuid>, Option<Uuid>) {
        match user.role {
            UserRole::Admin => (None, None),
            UserRole::Agent => (Some(user.id), None),
            UserRole::Client => (None, Some(user.id)),
        }
    }

    pub async fn list_for<'e, E>(&self, executor: E, user: &User) -> Result<Vec<Trip>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let (agent_id, client_id) = Self::scope_filters(user);
        self.repo.list_scoped(executor, agent_id, client_id).await
    }

    pub async fn list_with_parties<'e, E>(
        &self,
        executor: E,
        user: &User,
    ) -> Result<Vec<TripWithParties>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let trips = self.list_for(executor, user).await?;

        // Resolve agentes e clientes de uma vez só
        let mut ids: Vec<Uuid> = trips
            .iter()
            .flat_map(|t| [t.agent_id, t.client_id])
            .collect();
        ids.sort_unstable();
        ids.dedup();

        let parties = self.user_repo.find_parties(&ids).await?;
        let by_id: HashMap<Uuid, _> = parties.into_iter().map(|p| (p.id, p)).collect();

        Ok(trips
            .into_iter()
            .map(|trip| TripWithParties {
                agent: by_id.get(&trip.agent_id).cloned(),
                client: by_id.get(&trip.client_id).cloned(),
                trip,
            })
            .collect())
    }

    /// Busca uma viagem garantindo que quem pergunta pode vê-la.
    pub async fn get_checked<'e, E>(
        &self,
        executor: E,
        user: &User,
        trip_id: Uuid,
    ) -> Result<Trip, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let trip = self
            .repo
            .find_by_id(executor, trip_id)
            .await?
            .ok_or_else(|| AppError::ResourceNotFound(format!("Trip {trip_id}")))?;

        Self::check_access(user, &trip)?;
        Ok(trip)
    }

    pub async fn get_with_parties<'e, E>(
        &self,
        executor: E,
        user: &User,
        trip_id: Uuid,
    ) -> Result<TripWithParties, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let trip = self.get_checked(executor, user, trip_id).await?;

        let parties = self.user_repo.find_parties(&[trip.agent_id, trip.client_id]).await?;
        let by_id: HashMap<Uuid, _> = parties.into_iter().map(|p| (p.id, p)).collect();

        Ok(TripWithParties {
            agent: by_id.get(&trip.agent_id).cloned(),
            client: by_id.get(&trip.client_id).cloned(),
            trip,
        })
    }

    fn check_access(user: &User, trip: &Trip) -> Result<(), AppError> {
        let allowed = match user.role {
            UserRole::Admin => true,
            UserRole::Agent => trip.agent_id == user.id,
            UserRole::Client => trip.client_id == user.id,
        };
        if !allowed {
            return Err(AppError::Forbidden(
                "you cannot access this trip".to_string(),
            ));
        }
        Ok(())
    }

    // Escrita exige ser admin ou o agente dono da viagem
    fn check_write_access(user: &User, trip: &Trip) -> Result<(), AppError> {
        if user.role == UserRole::Agent && trip.agent_id != user.id {
            return Err(AppError::Forbidden(
                "agents can only manage their own trips".to_string(),
            ));
        }
        Ok(())
    }

    pub async fn create<'e, E>(
        &self,
        executor: E,
        user: &User,
        payload: &CreateTripPayload,
    ) -> Result<Trip, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        // Quem cria a viagem vira o agente responsável
        self.repo.create(executor, user.id, payload).await
    }

    pub async fn update<'e, E>(
        &self,
        executor: E,
        user: &User,
        trip_id: Uuid,
        payload: &UpdateTripPayload,
    ) -> Result<Trip, AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        let mut tx = executor.begin().await?;

        let trip = self
            .repo
            .find_by_id(&mut *tx, trip_id)
            .await?
            .ok_or_else(|| AppError::ResourceNotFound(format!("Trip {trip_id}")))?;
        Self::check_write_access(user, &trip)?;

        let updated = self.repo.update(&mut *tx, trip_id, payload).await?;
        tx.commit().await?;

        Ok(updated)
    }

    /// Apaga a viagem e tudo que pende dela (pagamentos, ficha, roteiro),
    /// numa transação única, devolvendo a contagem por coleção.
    pub async fn delete<'e, E>(
        &self,
        executor: E,
        user: &User,
        trip_id: Uuid,
    ) -> Result<DeletedTripSummary, AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        let mut tx = executor.begin().await?;

        let trip = self
            .repo
            .find_by_id(&mut *tx, trip_id)
            .await?
            .ok_or_else(|| AppError::ResourceNotFound(format!("Trip {trip_id}")))?;
        Self::check_write_access(user, &trip)?;

        tracing::info!("🗑️ Apagando a viagem {} e tudo que depende dela...", trip_id);

        let payments = self
            .finance_repo
            .delete_payments_by_trip(&mut *tx, trip_id)
            .await?;
        let financial_records = self.finance_repo.delete_by_trip(&mut *tx, trip_id).await?;
        let itineraries = self.itinerary_repo.delete_by_trip(&mut *tx, trip_id).await?;
        let deleted = self.repo.delete(&mut *tx, trip_id).await?;

        tx.commit().await?;

        Ok(DeletedTripSummary {
            message: "Trip and all related data deleted successfully".to_string(),
            deleted_counts: DeletedCounts {
                trip: deleted,
                financial_records,
                payments,
                itineraries,
            },
        })
    }

    /// Transição de status da viagem. Repetir o status atual é um no-op
    /// aceito; fora do grafo é erro. Confirmar a viagem confirma junto a
    /// ficha financeira, se houver.
    pub async fn change_status<'e, E>(
        &self,
        executor: E,
        user: &User,
        trip_id: Uuid,
        new_status: TripStatus,
    ) -> Result<Trip, AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        let mut tx = executor.begin().await?;

        let trip = self
            .repo
            .find_by_id(&mut *tx, trip_id)
            .await?
            .ok_or_else(|| AppError::ResourceNotFound(format!("Trip {trip_id}")))?;
        Self::check_write_access(user, &trip)?;

        if trip.status == new_status {
            // Nada a fazer, nada a quebrar
            return Ok(trip);
        }

        if !trip.status.can_transition(new_status) {
            return Err(AppError::InvalidStatusTransition {
                from: trip.status.as_str().to_string(),
                to: new_status.as_str().to_string(),
            });
        }

        let updated = self.repo.update_status(&mut *tx, trip_id, new_status).await?;

        if new_status == TripStatus::Confirmed {
            let synced = self
                .finance_repo
                .set_status_by_trip(&mut *tx, trip_id, AdminStatus::Confirmed)
                .await?;
            if synced > 0 {
                tracing::info!("✅ Viagem {} confirmada - ficha financeira confirmada junto", trip_id);
            } else {
                tracing::warn!("⚠️ Viagem {} confirmada sem ficha financeira", trip_id);
            }
        }

        tx.commit().await?;

        Ok(updated)
    }

    // =========================================================================
    //  ROTEIRO
    // =========================================================================

    pub async fn list_itineraries<'e, E>(
        &self,
        executor: E,
        user: &User,
        trip_id: Uuid,
    ) -> Result<Vec<Itinerary>, AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        let mut conn = executor.acquire().await?;

        self.get_checked(&mut *conn, user, trip_id).await?;
        self.itinerary_repo.list_by_trip(&mut *conn, trip_id).await
    }

    pub async fn create_itinerary<'e, E>(
        &self,
        executor: E,
        user: &User,
        payload: &CreateItineraryPayload,
    ) -> Result<Itinerary, AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        let mut tx = executor.begin().await?;

        let trip = self
            .repo
            .find_by_id(&mut *tx, payload.trip_id)
            .await?
            .ok_or_else(|| AppError::ResourceNotFound(format!("Trip {}", payload.trip_id)))?;
        Self::check_write_access(user, &trip)?;

        let itinerary = self.itinerary_repo.create(&mut *tx, payload).await?;
        tx.commit().await?;

        Ok(itinerary)
    }

    pub async fn update_itinerary<'e, E>(
        &self,
        executor: E,
        itinerary_id: Uuid,
        payload: &CreateItineraryPayload,
    ) -> Result<Itinerary, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        self.itinerary_repo
            .update(executor, itinerary_id, payload)
            .await?
            .ok_or_else(|| AppError::ResourceNotFound(format!("Itinerary {itinerary_id}")))
    }

    pub async fn delete_itinerary<'e, E>(
        &self,
        executor: E,
        itinerary_id: Uuid,
    ) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let deleted = self.itinerary_repo.delete(executor, itinerary_id).await?;
        if deleted == 0 {
            return Err(AppError::ResourceNotFound(format!(
                "Itinerary {itinerary_id}"
            )));
        }
        Ok(())
    }

    // =========================================================================
    //  DOSSIÊ DO CLIENTE
    // =========================================================================

    pub async fn client_details<'e, E>(
        &self,
        executor: E,
        client_id: Uuid,
    ) -> Result<ClientDetails, AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        let client = self
            .user_repo
            .find_by_id(client_id)
            .await?
            .filter(|u| u.role == UserRole::Client)
            .ok_or_else(|| AppError::ResourceNotFound(format!("Client {client_id}")))?;

        let mut conn = executor.acquire().await?;

        let trips = self
            .repo
            .list_scoped(&mut *conn, None, Some(client_id))
            .await?;
        let trip_ids: Vec<Uuid> = trips.iter().map(|t| t.id).collect();
        let records = self
            .finance_repo
            .list_by_trip_ids(&mut *conn, &trip_ids)
            .await?;

        let mut by_trip: HashMap<Uuid, _> =
            records.into_iter().map(|r| (r.trip_id, r)).collect();

        Ok(ClientDetails {
            client,
            trips: trips
                .into_iter()
                .map(|trip| TripWithFinancial {
                    financial: by_trip.remove(&trip.id),
                    trip,
                })
                .collect(),
        })
    }
}
