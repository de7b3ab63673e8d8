//! PostgreSQL implementation of OrderRepository.
//!
//! The conditional status write is a single `UPDATE ... WHERE status = 'Pending'
//! RETURNING ...` statement, so Postgres row locking makes it an atomic
//! compare-and-swap: concurrent deliveries for the same order see exactly one
//! returned row between them.

use crate::domain::foundation::{DomainError, ErrorCode, OrderId};
use crate::domain::order::{ConditionalUpdate, Order, OrderStatus};
use crate::ports::OrderRepository;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

const ORDER_COLUMNS: &str = r#"id, gateway_order_id, mrc_order_id, full_name, email, location,
    phone_number, note, title, period, price, "time", status, created_at, updated_at"#;

/// PostgreSQL implementation of the OrderRepository port.
pub struct PostgresOrderRepository {
    pool: PgPool,
}

impl PostgresOrderRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Database row representation of an order.
#[derive(Debug, sqlx::FromRow)]
struct OrderRow {
    id: Uuid,
    gateway_order_id: Option<i64>,
    mrc_order_id: String,
    full_name: String,
    email: Option<String>,
    location: Option<String>,
    phone_number: String,
    note: Option<String>,
    title: String,
    period: Option<String>,
    price: Decimal,
    time: Option<String>,
    status: String,
    created_at: DateTime<Utc>,
    updated_at: Option<DateTime<Utc>>,
}

impl TryFrom<OrderRow> for Order {
    type Error = DomainError;

    fn try_from(row: OrderRow) -> Result<Self, Self::Error> {
        let status = parse_status(&row.status)?;

        Ok(Order {
            id: OrderId::from_uuid(row.id),
            gateway_order_id: row.gateway_order_id,
            mrc_order_id: row.mrc_order_id,
            full_name: row.full_name,
            email: row.email,
            location: row.location,
            phone_number: row.phone_number,
            note: row.note.unwrap_or_default(),
            title: row.title,
            period: row.period.unwrap_or_default(),
            price: row.price,
            time: row.time.unwrap_or_default(),
            status,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

fn parse_status(s: &str) -> Result<OrderStatus, DomainError> {
    s.parse::<OrderStatus>().map_err(|_| {
        DomainError::new(
            ErrorCode::DatabaseError,
            format!("Invalid status value: {}", s),
        )
    })
}

#[async_trait]
impl OrderRepository for PostgresOrderRepository {
    async fn find_by_mrc_order_id(&self, mrc_order_id: &str) -> Result<Option<Order>, DomainError> {
        let sql = format!("SELECT {} FROM orders WHERE mrc_order_id = $1", ORDER_COLUMNS);

        let row: Option<OrderRow> = sqlx::query_as(&sql)
            .bind(mrc_order_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                DomainError::new(ErrorCode::DatabaseError, format!("Failed to find order: {}", e))
            })?;

        row.map(Order::try_from).transpose()
    }

    async fn update_status_if_pending(
        &self,
        id: &OrderId,
        new_status: OrderStatus,
    ) -> Result<ConditionalUpdate, DomainError> {
        if !OrderStatus::Pending.can_transition_to(new_status) {
            return Err(DomainError::new(
                ErrorCode::InvalidStateTransition,
                format!("Cannot transition order from Pending to {}", new_status),
            ));
        }

        let sql = format!(
            "UPDATE orders SET status = $2, updated_at = $3 \
             WHERE id = $1 AND status = $4 \
             RETURNING {}",
            ORDER_COLUMNS
        );

        let row: Option<OrderRow> = sqlx::query_as(&sql)
            .bind(id.as_uuid())
            .bind(new_status.as_str())
            .bind(Utc::now())
            .bind(OrderStatus::Pending.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                DomainError::new(
                    ErrorCode::DatabaseError,
                    format!("Failed to update order status: {}", e),
                )
            })?;

        match row {
            Some(row) => Ok(ConditionalUpdate::Applied(Order::try_from(row)?)),
            None => Ok(ConditionalUpdate::NoOp),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(status: &str) -> OrderRow {
        OrderRow {
            id: Uuid::new_v4(),
            gateway_order_id: Some(12345),
            mrc_order_id: "ORDER_1700000000".to_string(),
            full_name: "Nguyen Van A".to_string(),
            email: None,
            location: None,
            phone_number: "0912345678".to_string(),
            note: None,
            title: "Remote support".to_string(),
            period: Some("1 hour".to_string()),
            price: Decimal::new(150_000, 0),
            time: None,
            status: status.to_string(),
            created_at: Utc::now(),
            updated_at: None,
        }
    }

    #[test]
    fn row_converts_with_defaults_for_nullable_text() {
        let order = Order::try_from(row("Pending")).unwrap();
        assert_eq!(order.status, OrderStatus::Pending);
        assert_eq!(order.note, "");
        assert_eq!(order.time, "");
        assert_eq!(order.period, "1 hour");
    }

    #[test]
    fn row_with_unknown_status_is_database_error() {
        let err = Order::try_from(row("Shipped")).unwrap_err();
        assert_eq!(err.code, ErrorCode::DatabaseError);
    }

    #[test]
    fn parse_status_accepts_stored_casing() {
        assert_eq!(parse_status("Completed").unwrap(), OrderStatus::Completed);
        assert_eq!(parse_status("pending").unwrap(), OrderStatus::Pending);
    }
}
