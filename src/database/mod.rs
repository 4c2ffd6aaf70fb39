use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use futures::stream::TryStreamExt;
use mongodb::bson::{doc, Bson, Document};
use mongodb::results::{DeleteResult, UpdateResult};
use mongodb::options::IndexOptions;
use mongodb::{Client, Collection, Database, IndexModel};
use serde::{Serialize, Serializer};
use serde_json::Value;
use thiserror::Error;

use crate::config::DatabaseConfig;

#[cfg(test)]
pub mod memory;

pub type StoreResult<T> = Result<T, StoreError>;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{0}")]
    Backend(String),
}

impl From<mongodb::error::Error> for StoreError {
    fn from(e: mongodb::error::Error) -> Self {
        StoreError::Backend(e.to_string())
    }
}

/// The five record kinds the marketplace persists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CollectionName {
    Users,
    Products,
    Categories,
    Bookings,
    Reports,
}

impl CollectionName {
    pub fn as_str(&self) -> &'static str {
        match self {
            CollectionName::Users => "users",
            CollectionName::Products => "products",
            CollectionName::Categories => "categories",
            CollectionName::Bookings => "bookings",
            CollectionName::Reports => "reports",
        }
    }
}

fn serialize_bson<S: Serializer>(value: &Bson, serializer: S) -> Result<S::Ok, S::Error> {
    bson_to_json(value.clone()).serialize(serializer)
}

fn serialize_opt_bson<S: Serializer>(value: &Option<Bson>, serializer: S) -> Result<S::Ok, S::Error> {
    value.clone().map(bson_to_json).serialize(serializer)
}

#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InsertAck {
    pub acknowledged: bool,
    #[serde(serialize_with = "serialize_bson")]
    #[schema(value_type = String)]
    pub inserted_id: Bson,
}

impl InsertAck {
    pub fn new(inserted_id: Bson) -> Self {
        Self { acknowledged: true, inserted_id }
    }
}

#[derive(Debug, Clone, Default, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAck {
    pub acknowledged: bool,
    pub matched_count: u64,
    pub modified_count: u64,
    pub upserted_count: u64,
    #[serde(serialize_with = "serialize_opt_bson")]
    #[schema(value_type = Option<String>)]
    pub upserted_id: Option<Bson>,
}

impl From<UpdateResult> for UpdateAck {
    fn from(result: UpdateResult) -> Self {
        Self {
            acknowledged: true,
            matched_count: result.matched_count,
            modified_count: result.modified_count,
            upserted_count: u64::from(result.upserted_id.is_some()),
            upserted_id: result.upserted_id,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DeleteAck {
    pub acknowledged: bool,
    pub deleted_count: u64,
}

impl From<DeleteResult> for DeleteAck {
    fn from(result: DeleteResult) -> Self {
        Self {
            acknowledged: true,
            deleted_count: result.deleted_count,
        }
    }
}

/// Collection-oriented persistence used by every handler.
///
/// Filters are equality matches; updates are `$set` merges.
#[async_trait]
pub trait Store: Send + Sync {
    async fn find_one(&self, name: CollectionName, filter: Document) -> StoreResult<Option<Document>>;

    async fn find_many(&self, name: CollectionName, filter: Document) -> StoreResult<Vec<Document>>;

    async fn insert_one(&self, name: CollectionName, document: Document) -> StoreResult<InsertAck>;

    async fn update_one(
        &self,
        name: CollectionName,
        filter: Document,
        set: Document,
        upsert: bool,
    ) -> StoreResult<UpdateAck>;

    async fn update_many(&self, name: CollectionName, filter: Document, set: Document) -> StoreResult<UpdateAck>;

    async fn delete_one(&self, name: CollectionName, filter: Document) -> StoreResult<DeleteAck>;

    async fn delete_many(&self, name: CollectionName, filter: Document) -> StoreResult<DeleteAck>;

    async fn ping(&self) -> StoreResult<()>;
}

#[derive(Clone)]
pub struct MongoDB {
    client: Client,
    db: Database,
    /// Set once index creation has been attempted against a live server.
    indexes_attempted: Arc<AtomicBool>,
}

impl MongoDB {
    /// Builds the connection pool. An unreachable server is logged, not fatal:
    /// requests that touch the database fail until it comes back.
    pub async fn connect(config: &DatabaseConfig) -> StoreResult<Self> {
        let mut client_options = mongodb::options::ClientOptions::parse(&config.url).await?;

        client_options.app_name = Some(env!("CARGO_PKG_NAME").to_string());
        client_options.max_pool_size = Some(20);
        client_options.min_pool_size = Some(5);
        client_options.max_idle_time = Some(std::time::Duration::from_secs(300));
        client_options.connect_timeout = Some(std::time::Duration::from_secs(5));
        client_options.server_selection_timeout = Some(std::time::Duration::from_secs(5));

        let client = Client::with_options(client_options)?;
        let db = client.database(&config.name);
        let mongodb = Self {
            client,
            db,
            indexes_attempted: Arc::new(AtomicBool::new(false)),
        };

        // The first successful ping creates the indexes.
        match mongodb.ping().await {
            Ok(()) => log::info!("✅ Database is connected: {}", config.name),
            Err(e) => {
                log::error!("❌ Database connection failed: {}", e);
                log::warn!("⚠️ Indexes not created yet; retrying on the next successful health check");
            }
        }

        Ok(mongodb)
    }

    async fn ensure_indexes(&self) {
        log::info!("🔧 Creating database indexes...");

        for (name, keys, unique) in index_plan() {
            let label = format!("{}({})", name.as_str(), keys.keys().cloned().collect::<Vec<_>>().join(", "));
            let model = IndexModel::builder()
                .keys(keys)
                .options(unique.then(|| IndexOptions::builder().unique(true).build()))
                .build();
            match self.documents(name).create_index(model).await {
                Ok(_) => log::info!("   ✅ Index created: {}", label),
                Err(e) => log::warn!("   ⚠️  Index not created {}: {}", label, e),
            }
        }
    }

    fn documents(&self, name: CollectionName) -> Collection<Document> {
        self.db.collection(name.as_str())
    }

    pub async fn shutdown(self) {
        log::info!("🔌 Closing database connections");
        self.client.shutdown().await;
    }
}

#[async_trait]
impl Store for MongoDB {
    async fn find_one(&self, name: CollectionName, filter: Document) -> StoreResult<Option<Document>> {
        Ok(self.documents(name).find_one(filter).await?)
    }

    async fn find_many(&self, name: CollectionName, filter: Document) -> StoreResult<Vec<Document>> {
        let cursor = self.documents(name).find(filter).await?;
        Ok(cursor.try_collect().await?)
    }

    async fn insert_one(&self, name: CollectionName, document: Document) -> StoreResult<InsertAck> {
        let result = self.documents(name).insert_one(document).await?;
        Ok(InsertAck::new(result.inserted_id))
    }

    async fn update_one(
        &self,
        name: CollectionName,
        filter: Document,
        set: Document,
        upsert: bool,
    ) -> StoreResult<UpdateAck> {
        let result = self
            .documents(name)
            .update_one(filter, doc! { "$set": set })
            .upsert(upsert)
            .await?;
        Ok(result.into())
    }

    async fn update_many(&self, name: CollectionName, filter: Document, set: Document) -> StoreResult<UpdateAck> {
        let result = self
            .documents(name)
            .update_many(filter, doc! { "$set": set })
            .await?;
        Ok(result.into())
    }

    async fn delete_one(&self, name: CollectionName, filter: Document) -> StoreResult<DeleteAck> {
        Ok(self.documents(name).delete_one(filter).await?.into())
    }

    async fn delete_many(&self, name: CollectionName, filter: Document) -> StoreResult<DeleteAck> {
        Ok(self.documents(name).delete_many(filter).await?.into())
    }

    async fn ping(&self) -> StoreResult<()> {
        self.db.run_command(doc! { "ping": 1 }).await?;
        if !self.indexes_attempted.swap(true, Ordering::SeqCst) {
            self.ensure_indexes().await;
        }
        Ok(())
    }
}

/// Indexes the service relies on. Natural keys (user email, report product)
/// are unique so concurrent upserts cannot create duplicates.
fn index_plan() -> Vec<(CollectionName, Document, bool)> {
    vec![
        (CollectionName::Users, doc! { "email": 1 }, true),
        (CollectionName::Users, doc! { "role": 1 }, false),
        (CollectionName::Products, doc! { "email": 1 }, false),
        (CollectionName::Products, doc! { "category": 1 }, false),
        (CollectionName::Products, doc! { "status": 1 }, false),
        (CollectionName::Bookings, doc! { "email": 1 }, false),
        (CollectionName::Bookings, doc! { "productId": 1 }, false),
        (CollectionName::Reports, doc! { "productId": 1 }, true),
    ]
}

/// Renders BSON the way clients expect it: ids as hex strings, dates as RFC 3339.
pub fn bson_to_json(value: Bson) -> Value {
    match value {
        Bson::ObjectId(oid) => Value::String(oid.to_hex()),
        Bson::DateTime(dt) => dt
            .try_to_rfc3339_string()
            .map(Value::String)
            .unwrap_or(Value::Null),
        Bson::Document(document) => document_to_json(document),
        Bson::Array(items) => Value::Array(items.into_iter().map(bson_to_json).collect()),
        other => other.into_relaxed_extjson(),
    }
}

pub fn document_to_json(document: Document) -> Value {
    Value::Object(
        document
            .into_iter()
            .map(|(key, value)| (key, bson_to_json(value)))
            .collect(),
    )
}
