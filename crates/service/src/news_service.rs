use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
};
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use common::types::Page;
use models::{news, validation};

use crate::errors::ServiceError;
use crate::pagination::Pagination;
use crate::serde_ext::double_option;

#[derive(Clone, Debug, Deserialize)]
pub struct NewsInput {
    pub title: String,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub excerpt: Option<String>,
    pub content: String,
    #[serde(default)]
    pub cover_image_url: Option<String>,
    #[serde(default)]
    pub is_published: bool,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct NewsPatch {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub excerpt: Option<Option<String>>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub cover_image_url: Option<Option<String>>,
    #[serde(default)]
    pub is_published: Option<bool>,
}

/// Admin listing, drafts included, newest first.
pub async fn list_news(db: &DatabaseConnection) -> Result<Vec<news::Model>, ServiceError> {
    Ok(news::Entity::find().order_by_desc(news::Column::CreatedAt).all(db).await?)
}

/// Storefront listing: published articles, latest `published_at` first.
pub async fn list_published_news(db: &DatabaseConnection, page: Pagination) -> Result<Page<news::Model>, ServiceError> {
    let (page_idx, per_page) = page.normalize();
    let paginator = news::Entity::find()
        .filter(news::Column::IsPublished.eq(true))
        .order_by_desc(news::Column::PublishedAt)
        .order_by_desc(news::Column::CreatedAt)
        .paginate(db, per_page);
    let total = paginator.num_items().await?;
    let items = paginator.fetch_page(page_idx).await?;
    Ok(Page { items, page: page_idx as u32 + 1, per_page: per_page as u32, total })
}

pub async fn get_news(db: &DatabaseConnection, id: Uuid) -> Result<news::Model, ServiceError> {
    news::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| ServiceError::not_found("news"))
}

/// With `published_only`, drafts are reported as not found.
pub async fn get_news_by_slug(db: &DatabaseConnection, slug: &str, published_only: bool) -> Result<news::Model, ServiceError> {
    let mut q = news::Entity::find().filter(news::Column::Slug.eq(slug));
    if published_only {
        q = q.filter(news::Column::IsPublished.eq(true));
    }
    q.one(db).await?.ok_or_else(|| ServiceError::not_found("news"))
}

pub async fn create_news(db: &DatabaseConnection, input: NewsInput) -> Result<news::Model, ServiceError> {
    let title = news::validate_title(&input.title)?;
    let slug = validation::resolve_slug(input.slug.as_deref(), &title)?;
    let now = Utc::now().into();
    let am = news::ActiveModel {
        id: Set(Uuid::new_v4()),
        title: Set(title),
        slug: Set(slug),
        excerpt: Set(validation::optional_text(input.excerpt.as_deref())),
        content: Set(news::validate_content(&input.content)?),
        cover_image_url: Set(validation::optional_url("cover_image_url", input.cover_image_url.as_deref())?),
        is_published: Set(input.is_published),
        published_at: Set(news::next_published_at(None, input.is_published, now)),
        created_at: Set(now),
        updated_at: Set(now),
    };
    let created = am.insert(db).await?;
    info!(news_id = %created.id, published = created.is_published, "news created");
    Ok(created)
}

pub async fn update_news(db: &DatabaseConnection, id: Uuid, patch: NewsPatch) -> Result<news::Model, ServiceError> {
    let current = get_news(db, id).await?;
    let now = Utc::now().into();
    let published_at = current.published_at;
    let mut am: news::ActiveModel = current.into();
    if let Some(title) = patch.title {
        am.title = Set(news::validate_title(&title)?);
    }
    if let Some(slug) = patch.slug {
        am.slug = Set(validation::resolve_slug(Some(&slug), "")?);
    }
    if let Some(excerpt) = patch.excerpt {
        am.excerpt = Set(validation::optional_text(excerpt.as_deref()));
    }
    if let Some(content) = patch.content {
        am.content = Set(news::validate_content(&content)?);
    }
    if let Some(cover) = patch.cover_image_url {
        am.cover_image_url = Set(validation::optional_url("cover_image_url", cover.as_deref())?);
    }
    if let Some(publish) = patch.is_published {
        am.is_published = Set(publish);
        am.published_at = Set(news::next_published_at(published_at, publish, now));
    }
    am.updated_at = Set(now);
    Ok(am.update(db).await?)
}

pub async fn delete_news(db: &DatabaseConnection, id: Uuid) -> Result<(), ServiceError> {
    let res = news::Entity::delete_by_id(id).exec(db).await?;
    if res.rows_affected == 0 {
        return Err(ServiceError::not_found("news"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{db_tests_enabled, get_db, unique};

    #[tokio::test]
    async fn publish_flow() -> Result<(), anyhow::Error> {
        if !db_tests_enabled() { return Ok(()); }
        let db = get_db().await?;

        let draft = create_news(&db, NewsInput {
            title: unique("Pameran Batik"),
            slug: None,
            excerpt: None,
            content: "<p>Sampai jumpa di pameran.</p>".into(),
            cover_image_url: None,
            is_published: false,
        }).await?;
        assert!(draft.published_at.is_none());
        assert!(get_news_by_slug(&db, &draft.slug, true).await.is_err());
        assert_eq!(get_news_by_slug(&db, &draft.slug, false).await?.id, draft.id);

        let published = update_news(&db, draft.id, NewsPatch { is_published: Some(true), ..Default::default() }).await?;
        let stamp = published.published_at;
        assert!(stamp.is_some());

        let page = list_published_news(&db, Pagination { page: 1, per_page: 100 }).await?;
        assert!(page.total >= 1);

        let hidden = update_news(&db, draft.id, NewsPatch { is_published: Some(false), ..Default::default() }).await?;
        assert!(!hidden.is_published);
        assert_eq!(hidden.published_at, stamp);

        delete_news(&db, draft.id).await?;
        Ok(())
    }
}
