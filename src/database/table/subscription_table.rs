use async_trait::async_trait;
use sqlx::Error as DbError;
use sqlx::SqlitePool;

use super::base_table::BaseTable;
use super::table::Table;
use crate::database::model::ActiveSubscriptionRow;
use crate::database::model::SubscriptionModel;

pub struct SubscriptionTable {
    base: BaseTable,
}

impl SubscriptionTable {
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            base: BaseTable::new(pool),
        }
    }

    /// Selects the rows a notification pass operates on: non-removed
    /// subscriptions matching the given frequency (or with frequency
    /// unset when `include_unset` is true), each joined with its owner's
    /// most recently created device token.
    ///
    /// Users without a registered device token are excluded; there is
    /// nowhere to deliver to.
    pub async fn select_active_by_cadence(
        &self,
        frequency: &str,
        include_unset: bool,
    ) -> Result<Vec<ActiveSubscriptionRow>, DbError> {
        let ret = sqlx::query_as::<_, ActiveSubscriptionRow>(
            r#"
            SELECT s.user_id, s.keyword, s.location, s.language, t.token, t.platform
            FROM subscriptions s
            JOIN device_tokens t ON t.id = (
                SELECT id FROM device_tokens
                WHERE user_id = s.user_id
                ORDER BY created_at DESC, id DESC
                LIMIT 1
            )
            WHERE
                s.removed = 0 AND
                (s.frequency = ? OR (? AND s.frequency IS NULL))
            ORDER BY s.id
            "#,
        )
        .bind(frequency)
        .bind(include_unset)
        .fetch_all(&self.base.pool)
        .await?;
        Ok(ret)
    }

    pub async fn select_all_by_user_id(
        &self,
        user_id: &str,
    ) -> Result<Vec<SubscriptionModel>, DbError> {
        let ret =
            sqlx::query_as::<_, SubscriptionModel>("SELECT * FROM subscriptions WHERE user_id = ?")
                .bind(user_id)
                .fetch_all(&self.base.pool)
                .await?;
        Ok(ret)
    }

    /// Soft-deletes a subscription. Removed rows never appear in a pass.
    pub async fn mark_removed(&self, id: i64) -> Result<bool, DbError> {
        let res = sqlx::query("UPDATE subscriptions SET removed = 1 WHERE id = ?")
            .bind(id)
            .execute(&self.base.pool)
            .await?;
        Ok(res.rows_affected() > 0)
    }
}

#[async_trait]
impl Table<SubscriptionModel, i64> for SubscriptionTable {
    async fn create_table(&self) -> Result<(), DbError> {
        sqlx::query(
            r#"CREATE TABLE IF NOT EXISTS subscriptions (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id TEXT NOT NULL,
                keyword TEXT NOT NULL,
                location TEXT NOT NULL,
                language TEXT NOT NULL,
                frequency TEXT DEFAULT NULL,
                removed INTEGER NOT NULL DEFAULT 0,
                created_at TIMESTAMP NOT NULL
            )"#,
        )
        .execute(&self.base.pool)
        .await?;
        Ok(())
    }

    async fn drop_table(&self) -> Result<(), DbError> {
        sqlx::query("DROP TABLE IF EXISTS subscriptions")
            .execute(&self.base.pool)
            .await?;
        Ok(())
    }

    async fn select_all(&self) -> Result<Vec<SubscriptionModel>, DbError> {
        let ret = sqlx::query_as::<_, SubscriptionModel>("SELECT * FROM subscriptions")
            .fetch_all(&self.base.pool)
            .await?;
        Ok(ret)
    }

    async fn delete_all(&self) -> Result<(), DbError> {
        sqlx::query("DELETE FROM subscriptions")
            .execute(&self.base.pool)
            .await?;
        Ok(())
    }

    async fn select(&self, id: &i64) -> Result<SubscriptionModel, DbError> {
        let model =
            sqlx::query_as::<_, SubscriptionModel>("SELECT * FROM subscriptions WHERE id = ?")
                .bind(id)
                .fetch_one(&self.base.pool)
                .await?;
        Ok(model)
    }

    async fn insert(&self, model: &SubscriptionModel) -> Result<i64, DbError> {
        let res = sqlx::query(
            r#"INSERT INTO subscriptions
                (user_id, keyword, location, language, frequency, removed, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)"#,
        )
        .bind(&model.user_id)
        .bind(&model.keyword)
        .bind(&model.location)
        .bind(&model.language)
        .bind(&model.frequency)
        .bind(model.removed)
        .bind(model.created_at)
        .execute(&self.base.pool)
        .await?;
        Ok(res.last_insert_rowid())
    }

    async fn update(&self, model: &SubscriptionModel) -> Result<(), DbError> {
        sqlx::query(
            r#"UPDATE subscriptions
            SET user_id = ?, keyword = ?, location = ?, language = ?,
                frequency = ?, removed = ?, created_at = ?
            WHERE id = ?"#,
        )
        .bind(&model.user_id)
        .bind(&model.keyword)
        .bind(&model.location)
        .bind(&model.language)
        .bind(&model.frequency)
        .bind(model.removed)
        .bind(model.created_at)
        .bind(model.id)
        .execute(&self.base.pool)
        .await?;
        Ok(())
    }

    async fn delete(&self, id: &i64) -> Result<(), DbError> {
        sqlx::query("DELETE FROM subscriptions WHERE id = ?")
            .bind(id)
            .execute(&self.base.pool)
            .await?;
        Ok(())
    }
}
