//! MongoDB client and collection wrapper

use bson::{doc, oid::ObjectId, Document};
use futures_util::TryStreamExt;
use mongodb::{
    options::{IndexOptions, UpdateModifications},
    results::{DeleteResult, UpdateResult},
    Client, Collection, IndexModel,
};
use serde::{de::DeserializeOwned, Serialize};
use tracing::info;

use crate::types::InnspotError;

/// Trait for schemas that provide index definitions
pub trait IntoIndexes {
    fn into_indices() -> Vec<(Document, Option<IndexOptions>)>;
}

/// Parse a path id into an ObjectId
pub fn parse_object_id(id: &str) -> Result<ObjectId, InnspotError> {
    Ok(ObjectId::parse_str(id.trim())?)
}

/// Add server selection and connect timeouts so an unreachable MongoDB fails fast
fn with_timeouts(uri: &str) -> String {
    const TIMEOUTS: &str = "serverSelectionTimeoutMS=3000&connectTimeoutMS=3000";

    if uri.contains('?') {
        return format!("{}&{}", uri, TIMEOUTS);
    }

    // The driver requires a slash between the host list and the options
    let after_scheme = uri.split_once("://").map(|(_, rest)| rest).unwrap_or(uri);
    if after_scheme.contains('/') {
        format!("{}?{}", uri, TIMEOUTS)
    } else {
        format!("{}/?{}", uri, TIMEOUTS)
    }
}

/// MongoDB client wrapper
#[derive(Clone)]
pub struct MongoClient {
    client: Client,
    db_name: String,
}

impl MongoClient {
    /// Create a new MongoDB client
    pub async fn new(uri: &str, db_name: &str) -> Result<Self, InnspotError> {
        info!("Connecting to MongoDB database '{}'", db_name);

        let client = Client::with_uri_str(&with_timeouts(uri))
            .await
            .map_err(|e| InnspotError::Database(format!("Failed to connect to MongoDB: {}", e)))?;

        let mongo = Self {
            client,
            db_name: db_name.to_string(),
        };
        mongo.ping().await?;

        info!("Connected to MongoDB database '{}'", db_name);
        Ok(mongo)
    }

    /// Round-trip a ping to the database
    pub async fn ping(&self) -> Result<(), InnspotError> {
        self.client
            .database(&self.db_name)
            .run_command(doc! { "ping": 1 })
            .await
            .map(|_| ())
            .map_err(|e| InnspotError::Database(format!("MongoDB ping failed: {}", e)))
    }

    /// Get a typed collection
    pub async fn collection<T>(&self, name: &str) -> Result<MongoCollection<T>, InnspotError>
    where
        T: Serialize + DeserializeOwned + Unpin + Send + Sync + IntoIndexes,
    {
        MongoCollection::new(&self.client, &self.db_name, name).await
    }

    /// Close all pooled connections
    pub async fn shutdown(self) {
        self.client.shutdown().await;
        info!("MongoDB client closed");
    }
}

/// Typed MongoDB collection with automatic indexing
#[derive(Debug, Clone)]
pub struct MongoCollection<T>
where
    T: Serialize + DeserializeOwned + Unpin + Send + Sync,
{
    inner: Collection<T>,
}

impl<T> MongoCollection<T>
where
    T: Serialize + DeserializeOwned + Unpin + Send + Sync + IntoIndexes,
{
    /// Create a new collection and apply indexes
    pub async fn new(
        client: &Client,
        db_name: &str,
        collection_name: &str,
    ) -> Result<Self, InnspotError> {
        let collection = client.database(db_name).collection::<T>(collection_name);
        let mongo_collection = MongoCollection { inner: collection };

        mongo_collection.apply_indexes().await?;

        Ok(mongo_collection)
    }

    /// Apply schema-defined indexes
    async fn apply_indexes(&self) -> Result<(), InnspotError> {
        let schema_indices = T::into_indices();

        if schema_indices.is_empty() {
            return Ok(());
        }

        let indices: Vec<IndexModel> = schema_indices
            .into_iter()
            .map(|(keys, opts)| IndexModel::builder().keys(keys).options(opts).build())
            .collect();

        self.inner
            .create_indexes(indices)
            .await
            .map_err(|e| InnspotError::Database(format!("Failed to create indexes: {}", e)))?;

        Ok(())
    }

    /// Insert a document, returning the generated id
    pub async fn insert_one(&self, item: T) -> Result<ObjectId, InnspotError> {
        let result = self
            .inner
            .insert_one(item)
            .await
            .map_err(|e| InnspotError::Database(format!("Insert failed: {}", e)))?;

        result
            .inserted_id
            .as_object_id()
            .ok_or_else(|| InnspotError::Database("Failed to get inserted ID".into()))
    }

    /// Find one document by filter
    pub async fn find_one(&self, filter: Document) -> Result<Option<T>, InnspotError> {
        self.inner
            .find_one(filter)
            .await
            .map_err(|e| InnspotError::Database(format!("Find failed: {}", e)))
    }

    /// Find all documents matching a filter, optionally sorted
    pub async fn find_many(
        &self,
        filter: Document,
        sort: Option<Document>,
    ) -> Result<Vec<T>, InnspotError> {
        let mut find = self.inner.find(filter);
        if let Some(sort) = sort {
            find = find.sort(sort);
        }

        let cursor = find
            .await
            .map_err(|e| InnspotError::Database(format!("Find failed: {}", e)))?;

        cursor
            .try_collect()
            .await
            .map_err(|e| InnspotError::Database(format!("Error reading documents: {}", e)))
    }

    /// Update one document
    pub async fn update_one(
        &self,
        filter: Document,
        update: impl Into<UpdateModifications>,
    ) -> Result<UpdateResult, InnspotError> {
        self.inner
            .update_one(filter, update.into())
            .await
            .map_err(|e| InnspotError::Database(format!("Update failed: {}", e)))
    }

    /// Delete one document
    pub async fn delete_one(&self, filter: Document) -> Result<DeleteResult, InnspotError> {
        self.inner
            .delete_one(filter)
            .await
            .map_err(|e| InnspotError::Database(format!("Delete failed: {}", e)))
    }
}
