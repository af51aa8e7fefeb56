use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// 产品实体，与 products 表一一对应
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub price: f64,
    pub stock: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Product {
    /// A product is live while its deletion timestamp is unset.
    pub fn is_live(&self) -> bool {
        self.deleted_at.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Product {
        Product {
            id: 1,
            name: "Widget".to_string(),
            description: None,
            price: 10.0,
            stock: 0,
            created_at: Utc::now(),
            updated_at: Utc::now(),
            deleted_at: None,
        }
    }

    #[test]
    fn live_until_deleted() {
        let mut product = sample();
        assert!(product.is_live());

        product.deleted_at = Some(Utc::now());
        assert!(!product.is_live());
    }

    #[test]
    fn serializes_camel_case() {
        let value = serde_json::to_value(sample()).unwrap();
        assert!(value.get("deletedAt").is_some());
        assert!(value.get("createdAt").is_some());
        assert!(value.get("deleted_at").is_none());
        assert_eq!(value["deletedAt"], serde_json::Value::Null);
    }
}
