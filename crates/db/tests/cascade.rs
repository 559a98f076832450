//! Integration tests for cascade deletes.
//!
//! - Collection delete removes images, isolates, subcultures and experiments
//! - Isolate delete removes subcultures and linked experiments
//! - Experiments linked to two parents die with either one
//! - Unknown ids do no partial work

use assert_matches::assert_matches;
use chrono::NaiveDate;
use mycotheca_core::error::CoreError;
use mycotheca_core::experiment::ExperimentStatus;
use mycotheca_core::uploads::{ContentStore, LocalContentStore, UploadBatch, UploadedFile};
use mycotheca_db::error::StoreError;
use mycotheca_db::models::collection::CreateCollection;
use mycotheca_db::models::experiment::CreateExperiment;
use mycotheca_db::models::isolate::CreateIsolate;
use mycotheca_db::models::subculture::CreateSubculture;
use mycotheca_db::repositories::{
    CollectionRepo, ExperimentRepo, ImageRepo, IsolateRepo, SubcultureRepo,
};
use sqlx::SqlitePool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn new_collection(code: &str) -> CreateCollection {
    CreateCollection {
        code: code.to_string(),
        scientific_name: None,
        common_name: None,
        collection_date: day(2024, 4, 1),
        location: None,
        coordinates: None,
        substrate: None,
        collector: None,
        notes: None,
    }
}

async fn isolate(pool: &SqlitePool, collection_id: i64, code: &str) -> i64 {
    IsolateRepo::create(
        pool,
        &CreateIsolate {
            code: code.to_string(),
            collection_id,
            isolation_date: day(2024, 4, 2),
            culture_medium: None,
            incubation_temperature: None,
            notes: None,
        },
    )
    .await
    .unwrap()
    .id
}

async fn subculture(pool: &SqlitePool, isolate_id: i64) -> i64 {
    SubcultureRepo::create(
        pool,
        &CreateSubculture {
            isolate_id,
            subculture_date: day(2024, 4, 10),
            plate_count: Some(3),
            culture_medium: None,
            notes: None,
        },
    )
    .await
    .unwrap()
    .id
}

async fn experiment(pool: &SqlitePool, collection_id: Option<i64>, isolate_id: Option<i64>) -> i64 {
    ExperimentRepo::create(
        pool,
        &CreateExperiment {
            title: "Growth rate".into(),
            collection_id,
            isolate_id,
            start_date: Some(day(2024, 4, 20)),
            end_date: None,
            objective: None,
            methods: None,
            results: None,
            discussion: None,
            conclusions: None,
            status: ExperimentStatus::InProgress,
        },
    )
    .await
    .unwrap()
    .id
}

async fn rows_referencing_collection(pool: &SqlitePool, id: i64) -> i64 {
    sqlx::query_scalar(
        "SELECT (SELECT COUNT(*) FROM images WHERE collection_id = ?1) \
              + (SELECT COUNT(*) FROM isolates WHERE collection_id = ?1) \
              + (SELECT COUNT(*) FROM experiments WHERE collection_id = ?1)",
    )
    .bind(id)
    .fetch_one(pool)
    .await
    .unwrap()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_collection_delete_removes_full_closure(pool: SqlitePool) {
    let dir = tempfile::tempdir().unwrap();
    let store = LocalContentStore::new(dir.path());

    let batch = UploadBatch::new(
        vec![
            UploadedFile::new("a.jpg", b"a".to_vec()),
            UploadedFile::new("b.jpg", b"b".to_vec()),
        ],
        None,
    );
    let (target, images) =
        CollectionRepo::create_with_images(&pool, &store, &new_collection("COL001"), &batch)
            .await
            .unwrap();
    let other = CollectionRepo::create(&pool, &new_collection("COL002"))
        .await
        .unwrap();

    let iso_a = isolate(&pool, target.id, "ISO001").await;
    let iso_b = isolate(&pool, target.id, "ISO002").await;
    subculture(&pool, iso_a).await;
    subculture(&pool, iso_a).await;
    subculture(&pool, iso_b).await;
    experiment(&pool, Some(target.id), None).await;
    experiment(&pool, None, Some(iso_b)).await;

    // Belongs to the other collection entirely and must survive.
    let other_iso = isolate(&pool, other.id, "ISO003").await;
    let survivor = experiment(&pool, None, Some(other_iso)).await;

    let report = CollectionRepo::delete(&pool, &store, target.id).await.unwrap();

    assert_eq!(report.images, 2);
    assert_eq!(report.isolates, 2);
    assert_eq!(report.subcultures, 3);
    assert_eq!(report.experiments, 2);
    assert_eq!(rows_referencing_collection(&pool, target.id).await, 0);
    assert!(CollectionRepo::find_by_id(&pool, target.id).await.unwrap().is_none());
    assert!(IsolateRepo::find_by_id(&pool, iso_a).await.unwrap().is_none());
    assert!(SubcultureRepo::list_by_isolate(&pool, iso_a).await.unwrap().is_empty());

    // Stored bytes go with the rows.
    for image in &images {
        assert!(store.read(&image.filename).await.is_err());
    }

    assert!(ExperimentRepo::find_by_id(&pool, survivor).await.unwrap().is_some());
    assert!(IsolateRepo::find_by_id(&pool, other_iso).await.unwrap().is_some());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_isolate_delete_removes_subcultures_and_experiments(pool: SqlitePool) {
    let c = CollectionRepo::create(&pool, &new_collection("COL001"))
        .await
        .unwrap();
    let iso = isolate(&pool, c.id, "ISO001").await;
    let sub = subculture(&pool, iso).await;
    let linked = experiment(&pool, None, Some(iso)).await;
    let collection_only = experiment(&pool, Some(c.id), None).await;

    let report = IsolateRepo::delete(&pool, iso).await.unwrap();
    assert_eq!(report.subcultures, 1);
    assert_eq!(report.experiments, 1);

    assert!(SubcultureRepo::find_by_id(&pool, sub).await.unwrap().is_none());
    assert!(ExperimentRepo::find_by_id(&pool, linked).await.unwrap().is_none());
    assert!(ExperimentRepo::find_by_id(&pool, collection_only).await.unwrap().is_some());
    assert!(CollectionRepo::find_by_id(&pool, c.id).await.unwrap().is_some());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_dual_link_experiment_dies_with_either_parent(pool: SqlitePool) {
    // C and the owner of I are different collections.
    let c = CollectionRepo::create(&pool, &new_collection("COL-C"))
        .await
        .unwrap();
    let owner = CollectionRepo::create(&pool, &new_collection("COL-OWNER"))
        .await
        .unwrap();
    let unrelated = CollectionRepo::create(&pool, &new_collection("COL-X"))
        .await
        .unwrap();
    let i = isolate(&pool, owner.id, "ISO-I").await;
    let unrelated_iso = isolate(&pool, unrelated.id, "ISO-X").await;

    // Deleting unrelated parents leaves it alone.
    let exp = experiment(&pool, Some(c.id), Some(i)).await;
    IsolateRepo::delete(&pool, unrelated_iso).await.unwrap();
    let dir = tempfile::tempdir().unwrap();
    let store = LocalContentStore::new(dir.path());
    CollectionRepo::delete(&pool, &store, unrelated.id).await.unwrap();
    assert!(ExperimentRepo::find_by_id(&pool, exp).await.unwrap().is_some());

    // Deleting the collection link removes it although the isolate remains.
    CollectionRepo::delete(&pool, &store, c.id).await.unwrap();
    assert!(ExperimentRepo::find_by_id(&pool, exp).await.unwrap().is_none());
    assert!(IsolateRepo::find_by_id(&pool, i).await.unwrap().is_some());

    // And the other way round.
    let c2 = CollectionRepo::create(&pool, &new_collection("COL-C2"))
        .await
        .unwrap();
    let exp2 = experiment(&pool, Some(c2.id), Some(i)).await;
    IsolateRepo::delete(&pool, i).await.unwrap();
    assert!(ExperimentRepo::find_by_id(&pool, exp2).await.unwrap().is_none());
    assert!(CollectionRepo::find_by_id(&pool, c2.id).await.unwrap().is_some());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_delete_unknown_id_is_not_found(pool: SqlitePool) {
    let dir = tempfile::tempdir().unwrap();
    let store = LocalContentStore::new(dir.path());

    let c = CollectionRepo::create(&pool, &new_collection("COL001"))
        .await
        .unwrap();
    experiment(&pool, Some(c.id), None).await;

    assert_matches!(
        CollectionRepo::delete(&pool, &store, c.id + 100).await,
        Err(StoreError::Core(CoreError::NotFound { entity: "Collection", .. }))
    );
    assert_matches!(
        IsolateRepo::delete(&pool, 12345).await,
        Err(StoreError::Core(CoreError::NotFound { entity: "Isolate", .. }))
    );
    assert_matches!(
        ImageRepo::delete(&pool, &store, 1).await,
        Err(StoreError::Core(CoreError::NotFound { entity: "Image", .. }))
    );
    assert_eq!(ExperimentRepo::count(&pool).await.unwrap(), 1);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_leaf_deletes(pool: SqlitePool) {
    let c = CollectionRepo::create(&pool, &new_collection("COL001"))
        .await
        .unwrap();
    let iso = isolate(&pool, c.id, "ISO001").await;
    let sub = subculture(&pool, iso).await;
    let exp = experiment(&pool, Some(c.id), Some(iso)).await;

    SubcultureRepo::delete(&pool, sub).await.unwrap();
    ExperimentRepo::delete(&pool, exp).await.unwrap();

    assert_matches!(
        SubcultureRepo::delete(&pool, sub).await,
        Err(StoreError::Core(CoreError::NotFound { .. }))
    );
    assert!(IsolateRepo::find_by_id(&pool, iso).await.unwrap().is_some());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_foreign_keys_reject_dangling_rows(pool: SqlitePool) {
    let result = sqlx::query(
        "INSERT INTO subcultures (isolate_id, subculture_date, plate_count, created_at) \
         VALUES (999, '2024-01-01', 1, '2024-01-01T00:00:00+00:00')",
    )
    .execute(&pool)
    .await;
    assert!(result.is_err());
}
