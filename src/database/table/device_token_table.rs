use async_trait::async_trait;
use sqlx::Error as DbError;
use sqlx::SqlitePool;

use super::base_table::BaseTable;
use super::table::Table;
use crate::database::model::DeviceTokenModel;

pub struct DeviceTokenTable {
    base: BaseTable,
}

impl DeviceTokenTable {
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            base: BaseTable::new(pool),
        }
    }

    /// Returns the most recently created token for a user, if any.
    pub async fn select_latest_by_user_id(
        &self,
        user_id: &str,
    ) -> Result<Option<DeviceTokenModel>, DbError> {
        let ret = sqlx::query_as::<_, DeviceTokenModel>(
            r#"
            SELECT * FROM device_tokens
            WHERE user_id = ?
            ORDER BY created_at DESC, id DESC
            LIMIT 1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.base.pool)
        .await?;
        Ok(ret)
    }
}

#[async_trait]
impl Table<DeviceTokenModel, i64> for DeviceTokenTable {
    async fn create_table(&self) -> Result<(), DbError> {
        sqlx::query(
            r#"CREATE TABLE IF NOT EXISTS device_tokens (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id TEXT NOT NULL,
                token TEXT NOT NULL,
                platform TEXT NOT NULL,
                created_at TIMESTAMP NOT NULL,
                UNIQUE(user_id, token)
            )"#,
        )
        .execute(&self.base.pool)
        .await?;
        Ok(())
    }

    async fn drop_table(&self) -> Result<(), DbError> {
        sqlx::query("DROP TABLE IF EXISTS device_tokens")
            .execute(&self.base.pool)
            .await?;
        Ok(())
    }

    async fn select_all(&self) -> Result<Vec<DeviceTokenModel>, DbError> {
        let ret = sqlx::query_as::<_, DeviceTokenModel>("SELECT * FROM device_tokens")
            .fetch_all(&self.base.pool)
            .await?;
        Ok(ret)
    }

    async fn delete_all(&self) -> Result<(), DbError> {
        sqlx::query("DELETE FROM device_tokens")
            .execute(&self.base.pool)
            .await?;
        Ok(())
    }

    async fn select(&self, id: &i64) -> Result<DeviceTokenModel, DbError> {
        let model =
            sqlx::query_as::<_, DeviceTokenModel>("SELECT * FROM device_tokens WHERE id = ?")
                .bind(id)
                .fetch_one(&self.base.pool)
                .await?;
        Ok(model)
    }

    async fn insert(&self, model: &DeviceTokenModel) -> Result<i64, DbError> {
        let res = sqlx::query(
            r#"INSERT INTO device_tokens
                (user_id, token, platform, created_at)
            VALUES (?, ?, ?, ?)"#,
        )
        .bind(&model.user_id)
        .bind(&model.token)
        .bind(&model.platform)
        .bind(model.created_at)
        .execute(&self.base.pool)
        .await?;
        Ok(res.last_insert_rowid())
    }

    async fn update(&self, model: &DeviceTokenModel) -> Result<(), DbError> {
        sqlx::query(
            "UPDATE device_tokens SET user_id = ?, token = ?, platform = ?, created_at = ? WHERE id = ?",
        )
        .bind(&model.user_id)
        .bind(&model.token)
        .bind(&model.platform)
        .bind(model.created_at)
        .bind(model.id)
        .execute(&self.base.pool)
        .await?;
        Ok(())
    }

    async fn delete(&self, id: &i64) -> Result<(), DbError> {
        sqlx::query("DELETE FROM device_tokens WHERE id = ?")
            .bind(id)
            .execute(&self.base.pool)
            .await?;
        Ok(())
    }
}
