//! Update feed service: validation, id handling and pagination over the repository.

use std::sync::Arc;

use chrono::SubsecRound;
use uuid::Uuid;

use super::SharedClock;
use crate::db::Repository;
use crate::errors::{AppError, NotFoundReason};
use crate::models::{DeleteConfirmation, Page, PageRequest, Update, UpdateRequest};

const MISSING_FIELDS: &str = "Please enter all fields";
const MISSING_KEYWORD: &str = "Keyword is required";

pub struct UpdateService {
    repo: Arc<Repository>,
    clock: SharedClock,
}

impl UpdateService {
    pub fn new(repo: Arc<Repository>, clock: SharedClock) -> Self {
        Self { repo, clock }
    }

    /// One page of the whole feed, newest first.
    pub async fn list(&self, page: PageRequest) -> Result<Page<Update>, AppError> {
        let total = self.repo.count_updates().await?;
        let updates = self.repo.list_updates(page.skip(), page.limit).await?;
        Ok(Page::new(updates, total, page))
    }

    /// One page of the updates containing `keyword`; `total` counts matches only.
    pub async fn search(
        &self,
        keyword: Option<&str>,
        page: PageRequest,
    ) -> Result<Page<Update>, AppError> {
        let keyword = keyword
            .filter(|k| !k.is_empty())
            .ok_or_else(|| AppError::Validation(MISSING_KEYWORD.to_string()))?;

        let total = self.repo.count_search(keyword).await?;
        let updates = self
            .repo
            .search_updates(keyword, page.skip(), page.limit)
            .await?;
        Ok(Page::new(updates, total, page))
    }

    pub async fn create(&self, request: UpdateRequest) -> Result<Update, AppError> {
        let fields = request
            .into_fields()
            .ok_or_else(|| AppError::Validation(MISSING_FIELDS.to_string()))?;

        let id = Uuid::new_v4().to_string();
        // Stored precision is microseconds
        let timestamp = self.clock.utc().trunc_subsecs(6);

        let update = self.repo.insert_update(&id, &fields, timestamp).await?;
        tracing::info!(update_id = %update.id, user = %update.user, "Update created");
        Ok(update)
    }

    pub async fn get(&self, id: &str) -> Result<Update, AppError> {
        let key = parse_id(id)?;
        self.repo
            .get_update(&key)
            .await?
            .ok_or_else(|| AppError::update_not_found(id, NotFoundReason::Missing))
    }

    /// Replace the text fields of an update. Concurrent edits are last-write-wins.
    pub async fn update(&self, id: &str, request: UpdateRequest) -> Result<Update, AppError> {
        let fields = request
            .into_fields()
            .ok_or_else(|| AppError::Validation(MISSING_FIELDS.to_string()))?;
        let key = parse_id(id)?;

        let update = self
            .repo
            .replace_update(&key, &fields)
            .await?
            .ok_or_else(|| AppError::update_not_found(id, NotFoundReason::Missing))?;
        tracing::info!(update_id = %update.id, "Update edited");
        Ok(update)
    }

    pub async fn delete(&self, id: &str) -> Result<DeleteConfirmation, AppError> {
        let key = parse_id(id)?;

        if !self.repo.delete_update(&key).await? {
            return Err(AppError::update_not_found(id, NotFoundReason::Missing));
        }
        tracing::info!(update_id = %key, "Update removed");
        Ok(DeleteConfirmation::default())
    }
}

/// Normalize an update id, rejecting anything that is not a UUID.
fn parse_id(id: &str) -> Result<String, AppError> {
    Uuid::parse_str(id)
        .map(|uuid| uuid.to_string())
        .map_err(|_| AppError::update_not_found(id, NotFoundReason::MalformedId))
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;
    use crate::models::PageQuery;
    use crate::services::test_support::{fixture_time, repository, request, MutableClock};

    async fn service() -> (UpdateService, Arc<MutableClock>, tempfile::TempDir) {
        let (repo, dir) = repository().await;
        let clock = Arc::new(MutableClock::new(fixture_time()));
        (UpdateService::new(repo, clock.clone()), clock, dir)
    }

    fn page(page: u32, limit: u32) -> PageRequest {
        PageQuery {
            page: Some(page),
            limit: Some(limit),
        }
        .into()
    }

    fn assert_not_found(result: Result<impl std::fmt::Debug, AppError>, expected: NotFoundReason) {
        match result {
            Err(AppError::NotFound { reason, .. }) => assert_eq!(reason, expected),
            other => panic!("expected not found, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_create_then_get_round_trips() {
        let (service, _clock, _dir) = service().await;

        let created = service
            .create(request("ana", "Shipped X", "Deployed to prod"))
            .await
            .unwrap();
        assert!(!created.id.is_empty());
        assert_eq!(created.timestamp, fixture_time());

        let fetched = service.get(&created.id).await.unwrap();
        assert_eq!(fetched, created);
    }

    #[tokio::test]
    async fn test_create_rejects_empty_fields() {
        let (service, _clock, _dir) = service().await;

        let err = service.create(request("ana", "", "body")).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
        assert_eq!(service.list(page(1, 20)).await.unwrap().total, 0);
    }

    #[tokio::test]
    async fn test_whitespace_is_valid_input() {
        let (service, _clock, _dir) = service().await;

        let created = service.create(request(" ", "t", "two words")).await.unwrap();
        assert_eq!(created.user, " ");

        let found = service.search(Some(" "), page(1, 20)).await.unwrap();
        assert_eq!(found.total, 1);
        assert_eq!(found.updates[0].id, created.id);
    }

    #[tokio::test]
    async fn test_list_pages_newest_first() {
        let (service, clock, _dir) = service().await;
        for i in 0..5 {
            service
                .create(request("u", &format!("title {i}"), "c"))
                .await
                .unwrap();
            clock.advance(Duration::minutes(1));
        }

        let first = service.list(page(1, 2)).await.unwrap();
        assert_eq!(first.total, 5);
        assert_eq!(first.pages, 3);
        let titles: Vec<&str> = first.updates.iter().map(|u| u.title.as_str()).collect();
        assert_eq!(titles, vec!["title 4", "title 3"]);

        let last = service.list(page(3, 2)).await.unwrap();
        assert_eq!(last.updates.len(), 1);
        assert_eq!(last.updates[0].title, "title 0");

        let beyond = service.list(page(9, 2)).await.unwrap();
        assert!(beyond.updates.is_empty());
        assert_eq!(beyond.total, 5);
        assert_eq!(beyond.page, 9);
    }

    #[tokio::test]
    async fn test_search_requires_keyword_and_counts_matches() {
        let (service, _clock, _dir) = service().await;
        service.create(request("ana", "Shipped X", "prod")).await.unwrap();
        service.create(request("bo", "Review", "with Ana")).await.unwrap();
        service.create(request("cy", "Lunch", "pizza")).await.unwrap();

        assert!(matches!(
            service.search(None, page(1, 20)).await,
            Err(AppError::Validation(_))
        ));
        assert!(matches!(
            service.search(Some(""), page(1, 20)).await,
            Err(AppError::Validation(_))
        ));

        let found = service.search(Some("aNa"), page(1, 1)).await.unwrap();
        assert_eq!(found.total, 2);
        assert_eq!(found.pages, 2);
        assert_eq!(found.updates.len(), 1);
        for update in &found.updates {
            let haystack = format!("{} {} {}", update.user, update.title, update.content);
            assert!(haystack.to_lowercase().contains("ana"));
        }
    }

    #[tokio::test]
    async fn test_update_keeps_timestamp() {
        let (service, clock, _dir) = service().await;
        let created = service.create(request("ana", "t", "c")).await.unwrap();

        clock.advance(Duration::hours(3));
        let edited = service
            .update(&created.id, request("ana", "t2", "c2"))
            .await
            .unwrap();

        assert_eq!(edited.title, "t2");
        assert_eq!(edited.content, "c2");
        assert_eq!(edited.timestamp, created.timestamp);
    }

    #[tokio::test]
    async fn test_update_unknown_id_mutates_nothing() {
        let (service, _clock, _dir) = service().await;
        let created = service.create(request("ana", "t", "c")).await.unwrap();

        let result = service
            .update(&Uuid::new_v4().to_string(), request("x", "y", "z"))
            .await;
        assert_not_found(result, NotFoundReason::Missing);

        let unchanged = service.get(&created.id).await.unwrap();
        assert_eq!(unchanged, created);
    }

    #[tokio::test]
    async fn test_update_validates_before_lookup() {
        let (service, _clock, _dir) = service().await;
        let err = service
            .update("not-a-uuid", request("", "y", "z"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn test_malformed_id_is_not_found() {
        let (service, _clock, _dir) = service().await;

        assert_not_found(service.get("not-a-uuid").await, NotFoundReason::MalformedId);
        assert_not_found(service.delete("42").await, NotFoundReason::MalformedId);
        assert_not_found(
            service.get(&Uuid::new_v4().to_string()).await,
            NotFoundReason::Missing,
        );
    }

    #[tokio::test]
    async fn test_delete_then_get_is_not_found() {
        let (service, _clock, _dir) = service().await;
        let created = service.create(request("ana", "t", "c")).await.unwrap();

        let confirmation = service.delete(&created.id).await.unwrap();
        assert_eq!(confirmation.message, "Update removed");

        assert_not_found(service.get(&created.id).await, NotFoundReason::Missing);
        assert_not_found(service.delete(&created.id).await, NotFoundReason::Missing);
    }

    #[tokio::test]
    async fn test_uppercase_id_resolves() {
        let (service, _clock, _dir) = service().await;
        let created = service.create(request("ana", "t", "c")).await.unwrap();

        let fetched = service.get(&created.id.to_uppercase()).await.unwrap();
        assert_eq!(fetched.id, created.id);
    }
}
