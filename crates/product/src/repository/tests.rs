use super::{command::ProductCommandRepository, query::ProductQueryRepository};
use crate::{
    abstract_trait::product::repository::{
        ProductCommandRepositoryTrait, ProductQueryRepositoryTrait,
    },
    domain::requests::product::{CreateProductRequest, ProductChanges},
    model::product::Product,
};
use shared::errors::RepositoryError;
use sqlx::PgPool;

async fn create(repo: &ProductCommandRepository, name: &str, price: f64) -> Product {
    repo.create_product(&CreateProductRequest {
        name: name.to_string(),
        description: Some(format!("{name} description")),
        price,
    })
    .await
    .unwrap()
}

#[sqlx::test(migrations = "./migrations")]
async fn removed_rows_are_hidden_but_still_exist(pool: PgPool) {
    let command = ProductCommandRepository::new(pool.clone());
    let query = ProductQueryRepository::new(pool);

    let kept = create(&command, "Cable", 10.0).await;
    let removed = create(&command, "Lamp", 30.0).await;
    command.mark_unavailable(removed.id).await.unwrap();

    assert!(query.find_visible_by_id(kept.id).await.unwrap().is_some());
    assert!(query.find_visible_by_id(removed.id).await.unwrap().is_none());

    let mut existing = query
        .find_existing_by_ids(&[kept.id, removed.id, removed.id + 100])
        .await
        .unwrap();
    existing.sort_by_key(|p| p.id);

    assert_eq!(existing.len(), 2);
    assert_eq!(existing[0].id, kept.id);
    assert!(!existing[1].available);
}

#[sqlx::test(migrations = "./migrations")]
async fn new_rows_default_to_available(pool: PgPool) {
    let command = ProductCommandRepository::new(pool);

    let created = create(&command, "Keyboard", 49.9).await;

    assert!(created.available);
    assert!(created.created_at.is_some());
}

#[sqlx::test(migrations = "./migrations")]
async fn page_counts_and_orders_only_available_rows(pool: PgPool) {
    let command = ProductCommandRepository::new(pool.clone());
    let query = ProductQueryRepository::new(pool);

    let mut ids = Vec::new();
    for i in 1..=6 {
        ids.push(create(&command, &format!("Product {i}"), f64::from(i)).await.id);
    }
    command.mark_unavailable(ids[1]).await.unwrap();

    assert_eq!(query.count_visible().await.unwrap(), 5);

    let page: Vec<i32> = query
        .find_visible_page(2, 2)
        .await
        .unwrap()
        .into_iter()
        .map(|p| p.id)
        .collect();
    assert_eq!(page, vec![ids[3], ids[4]]);

    assert!(query.find_visible_page(10, 2).await.unwrap().is_empty());
}

#[sqlx::test(migrations = "./migrations")]
async fn update_keeps_fields_that_were_not_supplied(pool: PgPool) {
    let command = ProductCommandRepository::new(pool);
    let created = create(&command, "Mouse", 10.0).await;

    let updated = command
        .update_product(
            created.id,
            &ProductChanges {
                price: Some(12.0),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.id, created.id);
    assert_eq!(updated.name, "Mouse");
    assert_eq!(updated.description, created.description);
    assert_eq!(updated.price, 12.0);
    assert!(updated.available);
}

#[sqlx::test(migrations = "./migrations")]
async fn writes_to_a_missing_row_report_not_found(pool: PgPool) {
    let command = ProductCommandRepository::new(pool);

    let err = command.mark_unavailable(404).await.unwrap_err();
    assert!(matches!(err, RepositoryError::NotFound));

    let err = command
        .update_product(404, &ProductChanges::default())
        .await
        .unwrap_err();
    assert!(matches!(err, RepositoryError::NotFound));
}
