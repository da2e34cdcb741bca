use std::collections::HashMap;

use anyhow::{Context, anyhow};
use gourze_core::{AppError, ListQuery};
use gourze_db::{PgPool, fetch_page};
use gourze_models::orders::{ORDER_COLUMNS, ORDER_ITEM_COLUMNS};
use gourze_models::{CreateOrderDto, Order, OrderItem, OrderStatus, UpdateOrderDto};
use sqlx::{Postgres, QueryBuilder};
use tracing::{info, instrument};

use crate::metrics;

/// One order line with the unit price looked up from the course.
#[derive(Debug, Clone, Copy, PartialEq)]
struct PricedLine {
    course_id: i64,
    quantity: i32,
    price: f64,
}

/// Pairs each requested line with its course price.
///
/// Fails on the first course id missing from `prices`.
fn price_lines(
    dto: &CreateOrderDto,
    prices: &HashMap<i64, f64>,
) -> Result<Vec<PricedLine>, AppError> {
    dto.items
        .iter()
        .map(|item| {
            let price = prices.get(&item.course_id).copied().ok_or_else(|| {
                AppError::bad_request(anyhow!("Course {} does not exist", item.course_id))
            })?;
            Ok(PricedLine {
                course_id: item.course_id,
                quantity: item.quantity.unwrap_or(1),
                price,
            })
        })
        .collect()
}

fn order_amount(lines: &[PricedLine]) -> f64 {
    lines
        .iter()
        .map(|line| line.price * f64::from(line.quantity))
        .sum()
}

pub struct OrderService;

impl OrderService {
    async fn attach_items(db: &PgPool, orders: &mut [Order]) -> Result<(), AppError> {
        if orders.is_empty() {
            return Ok(());
        }

        let ids: Vec<i64> = orders.iter().map(|o| o.id).collect();
        let items = sqlx::query_as::<_, OrderItem>(&format!(
            "SELECT {ORDER_ITEM_COLUMNS} FROM order_items WHERE order_id = ANY($1) ORDER BY id"
        ))
        .bind(&ids[..])
        .fetch_all(db)
        .await
        .context("Failed to fetch order items")?;

        let mut by_order: HashMap<i64, Vec<OrderItem>> = HashMap::new();
        for item in items {
            by_order.entry(item.order_id).or_default().push(item);
        }
        for order in orders.iter_mut() {
            order.items = by_order.remove(&order.id).unwrap_or_default();
        }
        Ok(())
    }

    #[instrument(skip(db))]
    pub async fn list_orders(db: &PgPool, query: &ListQuery) -> Result<(Vec<Order>, i64), AppError> {
        let (mut orders, total) = fetch_page::<Order>(db, "orders", ORDER_COLUMNS, query)
            .await
            .context("Failed to fetch orders")?;
        Self::attach_items(db, &mut orders).await?;
        Ok((orders, total))
    }

    #[instrument(skip(db))]
    pub async fn get_order(db: &PgPool, id: i64) -> Result<Order, AppError> {
        let order = sqlx::query_as::<_, Order>(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(db)
        .await
        .context("Failed to fetch order")?
        .ok_or_else(|| AppError::not_found(anyhow!("Order not found")))?;

        let mut orders = [order];
        Self::attach_items(db, &mut orders).await?;
        let [order] = orders;
        Ok(order)
    }

    /// Creates an unpaid order for `buyer_id`. Unit prices are taken from the
    /// courses at this moment and the amount is their sum times quantity.
    #[instrument(skip(db, dto), fields(items = dto.items.len()))]
    pub async fn create_order(
        db: &PgPool,
        buyer_id: i64,
        dto: CreateOrderDto,
    ) -> Result<Order, AppError> {
        let mut tx = db.begin().await.context("Failed to begin transaction")?;

        let course_ids: Vec<i64> = dto.items.iter().map(|item| item.course_id).collect();
        let prices: HashMap<i64, f64> =
            sqlx::query_as::<_, (i64, f64)>("SELECT id, price FROM courses WHERE id = ANY($1)")
                .bind(&course_ids[..])
                .fetch_all(&mut *tx)
                .await
                .context("Failed to fetch course prices")?
                .into_iter()
                .collect();

        let lines = price_lines(&dto, &prices)?;
        let amount = order_amount(&lines);

        let mut order = sqlx::query_as::<_, Order>(&format!(
            "INSERT INTO orders (user_id, amount, status) VALUES ($1, $2, $3) \
             RETURNING {ORDER_COLUMNS}"
        ))
        .bind(buyer_id)
        .bind(amount)
        .bind(OrderStatus::Unpaid.as_str())
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| gourze_db::map_write_error(e, "Order already exists"))?;

        let order_id = order.id;
        let mut qb: QueryBuilder<'_, Postgres> =
            QueryBuilder::new("INSERT INTO order_items (order_id, course_id, quantity, price) ");
        qb.push_values(&lines, |mut b, line| {
            b.push_bind(order_id)
                .push_bind(line.course_id)
                .push_bind(line.quantity)
                .push_bind(line.price);
        });
        qb.push(format_args!(" RETURNING {ORDER_ITEM_COLUMNS}"));

        order.items = qb
            .build_query_as::<OrderItem>()
            .fetch_all(&mut *tx)
            .await
            .context("Failed to insert order items")?;

        tx.commit().await.context("Failed to commit order")?;

        info!(order_id = order.id, amount, "Order created");
        metrics::track_order_created(amount);
        Ok(order)
    }

    /// Applies a status change. Moving an order to `paid` enrolls the buyer
    /// in every ordered course in the same transaction.
    #[instrument(skip(db))]
    pub async fn update_order(db: &PgPool, id: i64, dto: UpdateOrderDto) -> Result<Order, AppError> {
        let Some(status) = dto.status else {
            return Self::get_order(db, id).await;
        };

        let mut tx = db.begin().await.context("Failed to begin transaction")?;

        let previous: Option<String> =
            sqlx::query_scalar("SELECT status FROM orders WHERE id = $1 FOR UPDATE")
                .bind(id)
                .fetch_optional(&mut *tx)
                .await
                .context("Failed to lock order")?;
        let previous = previous.ok_or_else(|| AppError::not_found(anyhow!("Order not found")))?;

        let mut order = sqlx::query_as::<_, Order>(&format!(
            "UPDATE orders SET status = $1, updated_at = NOW() WHERE id = $2 \
             RETURNING {ORDER_COLUMNS}"
        ))
        .bind(status.as_str())
        .bind(id)
        .fetch_one(&mut *tx)
        .await
        .context("Failed to update order")?;

        if status == OrderStatus::Paid && previous != OrderStatus::Paid.as_str() {
            let enrolled = sqlx::query(
                "INSERT INTO course_users (user_id, course_id) \
                 SELECT DISTINCT $1::BIGINT, course_id FROM order_items WHERE order_id = $2 \
                 ON CONFLICT (user_id, course_id) DO NOTHING",
            )
            .bind(order.user_id)
            .bind(id)
            .execute(&mut *tx)
            .await
            .context("Failed to enroll buyer")?
            .rows_affected();

            info!(order_id = id, user_id = order.user_id, enrolled, "Order paid");
            metrics::track_order_paid();
        }

        tx.commit().await.context("Failed to commit order update")?;

        Self::attach_items(db, std::slice::from_mut(&mut order)).await?;
        Ok(order)
    }

    #[instrument(skip(db))]
    pub async fn delete_order(db: &PgPool, id: i64) -> Result<Order, AppError> {
        let order = Self::get_order(db, id).await?;

        sqlx::query("DELETE FROM orders WHERE id = $1")
            .bind(id)
            .execute(db)
            .await
            .context("Failed to delete order")?;

        Ok(order)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gourze_models::CreateOrderItemDto;

    fn dto(items: &[(i64, Option<i32>)]) -> CreateOrderDto {
        CreateOrderDto {
            user_id: None,
            items: items
                .iter()
                .map(|&(course_id, quantity)| CreateOrderItemDto {
                    course_id,
                    quantity,
                })
                .collect(),
        }
    }

    #[test]
    fn test_amount_is_price_times_quantity() {
        let prices = HashMap::from([(1, 10.0), (2, 2.5)]);
        let lines = price_lines(&dto(&[(1, Some(2)), (2, None)]), &prices).unwrap();

        assert_eq!(lines[1].quantity, 1);
        assert_eq!(order_amount(&lines), 22.5);
    }

    #[test]
    fn test_unknown_course_rejected() {
        let prices = HashMap::from([(1, 10.0)]);
        let err = price_lines(&dto(&[(1, None), (9, None)]), &prices).unwrap_err();

        assert_eq!(err.code, "invalid-params");
        assert_eq!(err.message(), "Course 9 does not exist");
    }

    #[test]
    fn test_empty_order_amount_is_zero() {
        assert_eq!(order_amount(&[]), 0.0);
    }
}
