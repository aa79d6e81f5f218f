//! Product Repository

use super::{RepoError, RepoResult};
use shared::models::Product;
use sqlx::SqlitePool;

/// New menu entry
#[derive(Debug, Clone)]
pub struct ProductCreate {
    pub name: String,
    pub description: Option<String>,
    pub image: Option<String>,
    pub price: i64,
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Product>> {
    let product = sqlx::query_as::<_, Product>(
        "SELECT id, name, description, image, price FROM products WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;
    Ok(product)
}

pub async fn create(pool: &SqlitePool, data: ProductCreate) -> RepoResult<Product> {
    if data.price < 0 {
        return Err(RepoError::Validation(format!(
            "Price cannot be negative: {}",
            data.price
        )));
    }
    let id: i64 = sqlx::query_scalar(
        "INSERT INTO products (name, description, image, price) VALUES (?, ?, ?, ?) RETURNING id",
    )
    .bind(&data.name)
    .bind(&data.description)
    .bind(&data.image)
    .bind(data.price)
    .fetch_one(pool)
    .await?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create product".into()))
}
