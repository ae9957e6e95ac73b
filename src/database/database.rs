use std::str::FromStr;

use log::debug;
use log::info;
use sqlx::SqlitePool;
use sqlx::sqlite::SqliteConnectOptions;

use crate::database::table::DeviceTokenTable;
use crate::database::table::SubscriptionTable;
use crate::database::table::Table;

pub struct Database {
    pub pool: SqlitePool,
    pub subscription_table: SubscriptionTable,
    pub device_token_table: DeviceTokenTable,
}

impl Database {
    pub async fn new(db_url: &str, db_path: &str) -> anyhow::Result<Self> {
        let path = std::path::Path::new(db_path);
        if !path.exists() {
            debug!("Database path {db_path} does not exist. Creating...");
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(path, "")?;
            info!("Created {db_path}");
        }

        debug!("Connecting to db...");
        let opts = SqliteConnectOptions::from_str(db_url)?.foreign_keys(true);
        let pool = SqlitePool::connect_with(opts).await?;
        info!("Connected to db.");

        let subscription_table = SubscriptionTable::new(pool.clone());
        let device_token_table = DeviceTokenTable::new(pool.clone());

        Ok(Self {
            pool,
            subscription_table,
            device_token_table,
        })
    }

    pub async fn run_migrations(&self) -> anyhow::Result<()> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }

    pub async fn drop_all_tables(&self) -> anyhow::Result<()> {
        self.subscription_table.drop_table().await?;
        self.device_token_table.drop_table().await?;
        Ok(())
    }

    pub async fn delete_all_tables(&self) -> anyhow::Result<()> {
        self.subscription_table.delete_all().await?;
        self.device_token_table.delete_all().await?;
        Ok(())
    }
}
