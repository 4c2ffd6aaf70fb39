use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use async_trait::async_trait;
use mongodb::bson::{oid::ObjectId, Bson, Document};

use super::{CollectionName, DeleteAck, InsertAck, Store, StoreError, StoreResult, UpdateAck};

/// In-process `Store` for tests. Writes to collections listed with
/// [`InMemoryStore::fail_writes_to`] return a backend error.
#[derive(Default)]
pub struct InMemoryStore {
    collections: Mutex<HashMap<CollectionName, Vec<Document>>>,
    failing: Mutex<HashSet<CollectionName>>,
}

fn matches(document: &Document, filter: &Document) -> bool {
    filter
        .iter()
        .all(|(key, expected)| document.get(key) == Some(expected))
}

fn apply_set(document: &mut Document, set: &Document) -> bool {
    let mut changed = false;
    for (key, value) in set {
        if document.get(key) != Some(value) {
            document.insert(key.clone(), value.clone());
            changed = true;
        }
    }
    changed
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_writes_to(&self, name: CollectionName) {
        self.failing.lock().unwrap().insert(name);
    }

    pub fn count(&self, name: CollectionName) -> usize {
        self.collections
            .lock()
            .unwrap()
            .get(&name)
            .map(Vec::len)
            .unwrap_or(0)
    }

    fn check_writable(&self, name: CollectionName) -> StoreResult<()> {
        if self.failing.lock().unwrap().contains(&name) {
            return Err(StoreError::Backend(format!("write to {} rejected", name.as_str())));
        }
        Ok(())
    }
}

#[async_trait]
impl Store for InMemoryStore {
    async fn find_one(&self, name: CollectionName, filter: Document) -> StoreResult<Option<Document>> {
        let collections = self.collections.lock().unwrap();
        Ok(collections
            .get(&name)
            .and_then(|docs| docs.iter().find(|d| matches(d, &filter)).cloned()))
    }

    async fn find_many(&self, name: CollectionName, filter: Document) -> StoreResult<Vec<Document>> {
        let collections = self.collections.lock().unwrap();
        Ok(collections
            .get(&name)
            .map(|docs| docs.iter().filter(|d| matches(d, &filter)).cloned().collect())
            .unwrap_or_default())
    }

    async fn insert_one(&self, name: CollectionName, mut document: Document) -> StoreResult<InsertAck> {
        self.check_writable(name)?;
        if !document.contains_key("_id") {
            document.insert("_id", ObjectId::new());
        }
        let id = document.get("_id").cloned().unwrap_or(Bson::Null);
        self.collections
            .lock()
            .unwrap()
            .entry(name)
            .or_default()
            .push(document);
        Ok(InsertAck::new(id))
    }

    async fn update_one(
        &self,
        name: CollectionName,
        filter: Document,
        set: Document,
        upsert: bool,
    ) -> StoreResult<UpdateAck> {
        self.check_writable(name)?;
        let mut collections = self.collections.lock().unwrap();
        let docs = collections.entry(name).or_default();

        if let Some(existing) = docs.iter_mut().find(|d| matches(d, &filter)) {
            let changed = apply_set(existing, &set);
            return Ok(UpdateAck {
                acknowledged: true,
                matched_count: 1,
                modified_count: u64::from(changed),
                ..Default::default()
            });
        }

        if !upsert {
            return Ok(UpdateAck {
                acknowledged: true,
                ..Default::default()
            });
        }

        let id = ObjectId::new();
        let mut created = filter.clone();
        created.insert("_id", id);
        apply_set(&mut created, &set);
        docs.push(created);

        Ok(UpdateAck {
            acknowledged: true,
            upserted_count: 1,
            upserted_id: Some(Bson::ObjectId(id)),
            ..Default::default()
        })
    }

    async fn update_many(&self, name: CollectionName, filter: Document, set: Document) -> StoreResult<UpdateAck> {
        self.check_writable(name)?;
        let mut collections = self.collections.lock().unwrap();
        let mut ack = UpdateAck {
            acknowledged: true,
            ..Default::default()
        };
        for document in collections
            .entry(name)
            .or_default()
            .iter_mut()
            .filter(|d| matches(d, &filter))
        {
            ack.matched_count += 1;
            if apply_set(document, &set) {
                ack.modified_count += 1;
            }
        }
        Ok(ack)
    }

    async fn delete_one(&self, name: CollectionName, filter: Document) -> StoreResult<DeleteAck> {
        self.check_writable(name)?;
        let mut collections = self.collections.lock().unwrap();
        let docs = collections.entry(name).or_default();
        let deleted_count = match docs.iter().position(|d| matches(d, &filter)) {
            Some(index) => {
                docs.remove(index);
                1
            }
            None => 0,
        };
        Ok(DeleteAck {
            acknowledged: true,
            deleted_count,
        })
    }

    async fn delete_many(&self, name: CollectionName, filter: Document) -> StoreResult<DeleteAck> {
        self.check_writable(name)?;
        let mut collections = self.collections.lock().unwrap();
        let docs = collections.entry(name).or_default();
        let before = docs.len();
        docs.retain(|d| !matches(d, &filter));
        Ok(DeleteAck {
            acknowledged: true,
            deleted_count: (before - docs.len()) as u64,
        })
    }

    async fn ping(&self) -> StoreResult<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mongodb::bson::doc;

    #[tokio::test]
    async fn test_upsert_inserts_then_merges() {
        let store = InMemoryStore::new();

        let first = store
            .update_one(CollectionName::Users, doc! { "email": "a@x.com" }, doc! { "role": "Seller" }, true)
            .await
            .unwrap();
        assert_eq!(first.upserted_count, 1);
        assert_eq!(first.matched_count, 0);

        let second = store
            .update_one(CollectionName::Users, doc! { "email": "a@x.com" }, doc! { "name": "A" }, true)
            .await
            .unwrap();
        assert_eq!(second.matched_count, 1);
        assert_eq!(second.modified_count, 1);
        assert!(second.upserted_id.is_none());

        let user = store
            .find_one(CollectionName::Users, doc! { "email": "a@x.com" })
            .await
            .unwrap()
            .unwrap();
        assert_eq!(user.get_str("role").unwrap(), "Seller");
        assert_eq!(user.get_str("name").unwrap(), "A");
        assert_eq!(store.count(CollectionName::Users), 1);
    }

    #[tokio::test]
    async fn test_identical_update_is_not_a_modification() {
        let store = InMemoryStore::new();
        let filter = doc! { "email": "a@x.com" };
        store
            .update_one(CollectionName::Users, filter.clone(), doc! { "role": "Buyer" }, true)
            .await
            .unwrap();

        let again = store
            .update_one(CollectionName::Users, filter, doc! { "role": "Buyer" }, true)
            .await
            .unwrap();
        assert_eq!(again.matched_count, 1);
        assert_eq!(again.modified_count, 0);
    }

    #[tokio::test]
    async fn test_delete_one_removes_only_first_match() {
        let store = InMemoryStore::new();
        for _ in 0..2 {
            store
                .insert_one(CollectionName::Bookings, doc! { "productId": "p1" })
                .await
                .unwrap();
        }

        let ack = store
            .delete_one(CollectionName::Bookings, doc! { "productId": "p1" })
            .await
            .unwrap();
        assert_eq!(ack.deleted_count, 1);
        assert_eq!(store.count(CollectionName::Bookings), 1);
    }

    #[tokio::test]
    async fn test_failing_collection_rejects_writes_but_allows_reads() {
        let store = InMemoryStore::new();
        store
            .insert_one(CollectionName::Products, doc! { "name": "lamp" })
            .await
            .unwrap();
        store.fail_writes_to(CollectionName::Products);

        assert!(store
            .update_many(CollectionName::Products, doc! {}, doc! { "isVerified": true })
            .await
            .is_err());
        assert_eq!(
            store.find_many(CollectionName::Products, doc! {}).await.unwrap().len(),
            1
        );
    }
}
