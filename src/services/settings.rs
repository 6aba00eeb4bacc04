//! Settings service
//!
//! Typed access to the key/value settings store. Values live as strings
//! with a declared type and are coerced on read; coercion never fails
//! (see `Setting::typed_value`).

use anyhow::{Context, Result};
use std::sync::Arc;

use crate::db::repositories::SettingsRepository;
use crate::models::{Setting, SettingValue};

/// Settings service
pub struct SettingsService {
    repo: Arc<dyn SettingsRepository>,
}

impl SettingsService {
    /// Create a new settings service
    pub fn new(repo: Arc<dyn SettingsRepository>) -> Self {
        Self { repo }
    }

    /// Get a setting coerced to a string
    pub async fn get_string(&self, key: &str) -> Result<Option<String>> {
        Ok(self.get(key).await?.map(|v| match v {
            SettingValue::Str(s) => s,
            other => other.to_storage(),
        }))
    }

    /// Get a setting coerced to an integer; unparseable values read as 0
    pub async fn get_integer(&self, key: &str) -> Result<Option<i64>> {
        Ok(self.get(key).await?.map(|v| match v {
            SettingValue::Integer(i) => i,
            other => other.to_storage().trim().parse().unwrap_or(0),
        }))
    }

    /// Get a setting coerced to a boolean; only "true" reads as true
    pub async fn get_boolean(&self, key: &str) -> Result<Option<bool>> {
        Ok(self.get(key).await?.map(|v| match v {
            SettingValue::Boolean(b) => b,
            other => other.to_storage().trim().eq_ignore_ascii_case("true"),
        }))
    }

    /// Get a setting coerced to JSON; unparseable values read as {}
    pub async fn get_json(&self, key: &str) -> Result<Option<serde_json::Value>> {
        Ok(self.get(key).await?.map(|v| match v {
            SettingValue::Json(j) => j,
            other => serde_json::from_str(&other.to_storage())
                .unwrap_or_else(|_| serde_json::json!({})),
        }))
    }

    /// Upsert a typed value. On an existing row only the value and its
    /// declared type change; description, category and visibility stay.
    pub async fn set_value(&self, key: &str, value: &SettingValue) -> Result<()> {
        self.repo
            .set_value(key, value)
            .await
            .context("Failed to set setting value")
    }

    /// Upsert a full setting row, metadata included
    pub async fn upsert(&self, setting: &Setting) -> Result<()> {
        self.repo
            .upsert(setting)
            .await
            .context("Failed to upsert setting")
    }

    /// Raw setting row by key
    pub async fn get_setting(&self, key: &str) -> Result<Option<Setting>> {
        self.repo.get(key).await.context("Failed to get setting")
    }

    /// All settings ordered by key
    pub async fn list_all(&self) -> Result<Vec<Setting>> {
        self.repo.list_all().await.context("Failed to list settings")
    }

    async fn get(&self, key: &str) -> Result<Option<SettingValue>> {
        let setting = self.repo.get(key).await.context("Failed to get setting")?;
        Ok(setting.map(|s| s.typed_value()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repositories::SqlxSettingsRepository;
    use crate::db::{create_test_pool, migrations};
    use crate::models::SettingType;
    use chrono::Utc;

    async fn setup() -> SettingsService {
        let pool = create_test_pool().await.expect("Failed to create test pool");
        migrations::run_migrations(&pool)
            .await
            .expect("Failed to run migrations");
        SettingsService::new(SqlxSettingsRepository::boxed(pool))
    }

    #[tokio::test]
    async fn test_typed_roundtrips() {
        let service = setup().await;

        service
            .set_value("site_name", &SettingValue::Str("نائبك - أخبار".to_string()))
            .await
            .unwrap();
        service
            .set_value("news_per_page", &SettingValue::Integer(10))
            .await
            .unwrap();
        service
            .set_value("enable_comments", &SettingValue::Boolean(true))
            .await
            .unwrap();
        service
            .set_value(
                "social_links",
                &SettingValue::Json(serde_json::json!({"twitter": "@naebak"})),
            )
            .await
            .unwrap();

        assert_eq!(
            service.get_string("site_name").await.unwrap(),
            Some("نائبك - أخبار".to_string())
        );
        assert_eq!(service.get_integer("news_per_page").await.unwrap(), Some(10));
        assert_eq!(service.get_boolean("enable_comments").await.unwrap(), Some(true));
        assert_eq!(
            service.get_json("social_links").await.unwrap(),
            Some(serde_json::json!({"twitter": "@naebak"}))
        );
    }

    #[tokio::test]
    async fn test_missing_key_is_none() {
        let service = setup().await;

        assert_eq!(service.get_string("missing").await.unwrap(), None);
        assert_eq!(service.get_integer("missing").await.unwrap(), None);
        assert_eq!(service.get_boolean("missing").await.unwrap(), None);
        assert_eq!(service.get_json("missing").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_coercion_never_fails() {
        let service = setup().await;

        // Declared integer, garbage stored: reads as 0
        service
            .upsert(&Setting {
                key: "broken_int".to_string(),
                value: "not a number".to_string(),
                value_type: SettingType::Integer,
                description: None,
                category: None,
                is_public: false,
                updated_at: Utc::now(),
            })
            .await
            .unwrap();

        assert_eq!(service.get_integer("broken_int").await.unwrap(), Some(0));
    }

    #[tokio::test]
    async fn test_set_value_preserves_metadata() {
        let service = setup().await;

        service
            .upsert(&Setting {
                key: "news_per_page".to_string(),
                value: "10".to_string(),
                value_type: SettingType::Integer,
                description: Some("عدد الأخبار في الصفحة".to_string()),
                category: Some("display".to_string()),
                is_public: true,
                updated_at: Utc::now(),
            })
            .await
            .unwrap();

        service
            .set_value("news_per_page", &SettingValue::Integer(25))
            .await
            .unwrap();

        let setting = service.get_setting("news_per_page").await.unwrap().unwrap();
        assert_eq!(setting.value, "25");
        assert_eq!(setting.description.as_deref(), Some("عدد الأخبار في الصفحة"));
        assert!(setting.is_public);
    }
}
