use mongodb::bson::{doc, oid::ObjectId, Document};

use crate::{
    database::{CollectionName, DeleteAck, Store, UpdateAck},
    utils::error::ApiResult,
};

/// Files (or refreshes) the report for a product. One report per product.
pub async fn report_product(
    store: &dyn Store,
    product_id: ObjectId,
    reporter: &str,
    mut body: Document,
) -> ApiResult<UpdateAck> {
    let product_id = product_id.to_hex();
    body.remove("_id");
    body.insert("productId", product_id.as_str());
    body.insert("reportedBy", reporter);

    Ok(store
        .update_one(CollectionName::Reports, doc! { "productId": product_id }, body, true)
        .await?)
}

pub async fn list_reports(store: &dyn Store) -> ApiResult<Vec<Document>> {
    Ok(store.find_many(CollectionName::Reports, doc! {}).await?)
}

pub async fn delete_report(store: &dyn Store, id: ObjectId) -> ApiResult<DeleteAck> {
    Ok(store
        .delete_one(CollectionName::Reports, doc! { "_id": id })
        .await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::memory::InMemoryStore;

    #[tokio::test]
    async fn test_reports_are_keyed_by_product() {
        let store = InMemoryStore::new();
        let product = ObjectId::new();

        let first = report_product(&store, product, "a@x.com", doc! { "reason": "spam" })
            .await
            .unwrap();
        let second = report_product(&store, product, "b@x.com", doc! { "reason": "fake" })
            .await
            .unwrap();
        assert_eq!(first.upserted_count, 1);
        assert_eq!(second.matched_count, 1);

        let reports = list_reports(&store).await.unwrap();
        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].get_str("reportedBy").unwrap(), "b@x.com");
        assert_eq!(reports[0].get_str("reason").unwrap(), "fake");
    }

    #[tokio::test]
    async fn test_delete_report_by_id() {
        let store = InMemoryStore::new();
        report_product(&store, ObjectId::new(), "a@x.com", doc! {}).await.unwrap();
        let id = list_reports(&store).await.unwrap()[0].get_object_id("_id").unwrap();

        assert_eq!(delete_report(&store, id).await.unwrap().deleted_count, 1);
        assert!(list_reports(&store).await.unwrap().is_empty());
    }
}
