//! Event repository for the audit trail.

use domain::models::NewEvent;
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use crate::entities::EventEntity;
use crate::metrics::QueryTimer;

/// Repository for audit event rows.
#[derive(Clone)]
pub struct EventRepository {
    pool: PgPool,
}

impl EventRepository {
    /// Creates a new EventRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Records an event inside the transaction that performs the audited
    /// change.
    pub async fn record_in(conn: &mut PgConnection, event: &NewEvent) -> Result<(), sqlx::Error> {
        let timer = QueryTimer::new("insert_event");
        let result = sqlx::query(
            r#"
            INSERT INTO events (user_id, event_type, entity_id, description)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(event.user_id)
        .bind(event.event_type.as_str())
        .bind(event.entity_id)
        .bind(&event.description)
        .execute(conn)
        .await;
        timer.record();
        result.map(|_| ())
    }

    /// Lists events recorded for an entity, oldest first.
    pub async fn find_by_entity(&self, entity_id: Uuid) -> Result<Vec<EventEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_events_by_entity");
        let result = sqlx::query_as::<_, EventEntity>(
            r#"
            SELECT id, user_id, event_type, entity_id, description, created_at
            FROM events
            WHERE entity_id = $1
            ORDER BY created_at ASC
            "#,
        )
        .bind(entity_id)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }
}
