use crate::db::connect;
use crate::{category, product, media_library, setting};
use sea_orm::{DatabaseConnection, EntityTrait, ActiveModelTrait, Set, QueryFilter, ColumnTrait, ModelTrait};
use anyhow::Result;
use chrono::Utc;
use migration::MigratorTrait;
use uuid::Uuid;

/// DB tests run only when a database is configured and not explicitly skipped.
fn db_tests_enabled() -> bool {
    std::env::var("SKIP_DB_TESTS").is_err() && std::env::var("DATABASE_URL").is_ok()
}

async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = connect().await?;
    migration::Migrator::up(&db, None).await?;
    Ok(db)
}

async fn insert_category(db: &DatabaseConnection, name: &str) -> Result<category::Model> {
    let now = Utc::now().into();
    let am = category::ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(name.to_string()),
        slug: Set(format!("cat-{}", Uuid::new_v4())),
        description: Set(None),
        image_url: Set(None),
        created_at: Set(now),
        updated_at: Set(now),
    };
    Ok(am.insert(db).await?)
}

#[tokio::test]
async fn test_category_delete_nulls_product_reference() -> Result<()> {
    if !db_tests_enabled() { return Ok(()); }
    let db = setup_test_db().await?;

    let cat = insert_category(&db, "Batik Tulis").await?;
    let now = Utc::now().into();
    let prod = product::ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set("Kain Parang".into()),
        slug: Set(format!("kain-parang-{}", Uuid::new_v4())),
        description: Set(None),
        price: Set(350_000),
        stock: Set(4),
        category_id: Set(Some(cat.id)),
        color_id: Set(None),
        cap_pattern_id: Set(None),
        tiedye_pattern_id: Set(None),
        image_url: Set(None),
        gallery: Set(serde_json::json!([])),
        is_featured: Set(false),
        is_active: Set(true),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(&db)
    .await?;

    let related = cat.find_related(product::Entity).all(&db).await?;
    assert!(related.iter().any(|p| p.id == prod.id));

    category::Entity::delete_by_id(cat.id).exec(&db).await?;
    let after = product::Entity::find_by_id(prod.id).one(&db).await?.expect("product survives");
    assert_eq!(after.category_id, None);

    product::Entity::delete_by_id(prod.id).exec(&db).await?;
    Ok(())
}

#[tokio::test]
async fn test_media_library_bucket_path_unique() -> Result<()> {
    if !db_tests_enabled() { return Ok(()); }
    let db = setup_test_db().await?;

    let path = format!("tests/{}.png", Uuid::new_v4());
    let row = |id: Uuid| media_library::ActiveModel {
        id: Set(id),
        bucket: Set("images".into()),
        path: Set(path.clone()),
        file_name: Set("a.png".into()),
        public_url: Set(format!("http://localhost/storage/images/{path}")),
        mime_type: Set(Some("image/png".into())),
        size_bytes: Set(10),
        alt_text: Set(None),
        created_at: Set(Utc::now().into()),
    };
    let first = row(Uuid::new_v4()).insert(&db).await?;
    assert!(row(Uuid::new_v4()).insert(&db).await.is_err());

    media_library::Entity::delete_by_id(first.id).exec(&db).await?;
    Ok(())
}

#[tokio::test]
async fn test_setting_json_round_trip() -> Result<()> {
    if !db_tests_enabled() { return Ok(()); }
    let db = setup_test_db().await?;

    let key = format!("test.{}", Uuid::new_v4().simple());
    setting::ActiveModel {
        key: Set(key.clone()),
        value: Set(serde_json::json!({"banner": "Diskon 20%", "visible": true})),
        updated_at: Set(Utc::now().into()),
    }
    .insert(&db)
    .await?;

    let found = setting::Entity::find()
        .filter(setting::Column::Key.eq(key.clone()))
        .one(&db)
        .await?
        .expect("setting stored");
    assert_eq!(found.value["visible"], serde_json::json!(true));

    setting::Entity::delete_by_id(key).exec(&db).await?;
    Ok(())
}
