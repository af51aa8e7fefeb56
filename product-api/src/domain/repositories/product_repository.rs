use chrono::Utc;
use sqlx::MySqlPool;
use tracing::debug;

use crate::domain::models::product::Product;
use crate::error::AppError;

/// 查询可见范围
///
/// The soft-delete condition is written exactly once, here. Every read and
/// update goes through [`Scope::predicate`] so the filter cannot drift
/// between operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    /// Only rows whose deletion timestamp is unset.
    Live,
    /// All rows, deleted or not.
    Any,
}

impl Scope {
    fn predicate(self) -> &'static str {
        match self {
            Scope::Live => "deleted_at IS NULL",
            Scope::Any => "TRUE",
        }
    }
}

/// 产品数据访问层
///
/// Owns the connection pool; constructed once at startup and shared through
/// `AppState`. Deletion is always soft: `remove` stamps `deleted_at` and no
/// hard-delete path exists.
#[derive(Debug, Clone)]
pub struct ProductRepository {
    pool: MySqlPool,
}

impl ProductRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    pub async fn create(
        &self,
        name: &str,
        description: Option<&str>,
        price: f64,
        stock: i32,
    ) -> Result<Product, AppError> {
        let result = sqlx::query(
            r#"
            INSERT INTO products (name, description, price, stock)
            VALUES (?, ?, ?, ?)
            "#,
        )
        .bind(name)
        .bind(description)
        .bind(price)
        .bind(stock)
        .execute(&self.pool)
        .await?;

        let id = result.last_insert_id() as i64;
        debug!("created product id={}", id);

        self.fetch(id, Scope::Any)
            .await?
            .ok_or_else(|| AppError::Internal(format!("created product {} not readable", id)))
    }

    /// All live products, in no particular order.
    pub async fn find_all(&self) -> Result<Vec<Product>, AppError> {
        let sql = format!("SELECT * FROM products WHERE {}", Scope::Live.predicate());

        let products = sqlx::query_as::<_, Product>(&sql)
            .fetch_all(&self.pool)
            .await?;

        Ok(products)
    }

    /// A single live product; `None` when the id is unknown or the row is
    /// soft-deleted.
    pub async fn find_one(&self, id: i64) -> Result<Option<Product>, AppError> {
        self.fetch(id, Scope::Live).await
    }

    /// Applies only the provided fields to the live row matching `id`.
    pub async fn update(
        &self,
        id: i64,
        name: Option<String>,
        description: Option<String>,
        price: Option<f64>,
        stock: Option<i32>,
    ) -> Result<Product, AppError> {
        let mut product = self
            .fetch(id, Scope::Live)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Product with id {} not found", id)))?;

        if let Some(new_name) = name {
            product.name = new_name;
        }
        if let Some(new_description) = description {
            product.description = Some(new_description);
        }
        if let Some(new_price) = price {
            product.price = new_price;
        }
        if let Some(new_stock) = stock {
            product.stock = new_stock;
        }
        product.updated_at = Utc::now();

        // 更新时保留 live 过滤，行在读取后被删除则按未找到处理
        let sql = format!(
            r#"
            UPDATE products
            SET name = ?, description = ?, price = ?, stock = ?, updated_at = ?
            WHERE id = ? AND {}
            "#,
            Scope::Live.predicate()
        );

        let result = sqlx::query(&sql)
            .bind(&product.name)
            .bind(&product.description)
            .bind(product.price)
            .bind(product.stock)
            .bind(product.updated_at)
            .bind(product.id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!(
                "Product with id {} not found",
                id
            )));
        }

        Ok(product)
    }

    /// Stamps the deletion timestamp on the row matching `id`, whether or
    /// not it was already deleted. Re-removal is idempotent and re-stamps.
    pub async fn remove(&self, id: i64) -> Result<Product, AppError> {
        let exists = self
            .fetch(id, Scope::Any)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Product with id {} not found", id)))?;

        let sql = format!(
            "UPDATE products SET deleted_at = ? WHERE id = ? AND {}",
            Scope::Any.predicate()
        );

        let deleted_at = Utc::now();
        sqlx::query(&sql)
            .bind(deleted_at)
            .bind(exists.id)
            .execute(&self.pool)
            .await?;

        Ok(Product {
            deleted_at: Some(deleted_at),
            ..exists
        })
    }

    async fn fetch(&self, id: i64, scope: Scope) -> Result<Option<Product>, AppError> {
        let sql = format!(
            "SELECT * FROM products WHERE id = ? AND {}",
            scope.predicate()
        );

        let product = sqlx::query_as::<_, Product>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(product)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn live_scope_filters_deleted_rows() {
        assert_eq!(Scope::Live.predicate(), "deleted_at IS NULL");
    }

    #[test]
    fn any_scope_matches_everything() {
        assert_eq!(Scope::Any.predicate(), "TRUE");
    }
}
