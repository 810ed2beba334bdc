//! Post aggregate behaviour against the in-memory adapters.

use std::sync::Arc;

use async_trait::async_trait;
use uuid::Uuid;

use quill_core::DomainError;
use quill_core::domain::{BlockBody, ContentBlock, Post, PostDraft, User};
use quill_core::error::RepoError;
use quill_core::ports::{BaseRepository, ObjectStore, PostRepository, StorageError};
use quill_core::services::{BookmarkService, ImageUpload, PostService};
use quill_infra::database::InMemoryPostRepository;
use quill_infra::{InMemoryDatabase, InMemoryObjectStore};

const CDN: &str = "https://cdn.test/blog";

struct Harness {
    db: InMemoryDatabase,
    store: Arc<InMemoryObjectStore>,
    posts: PostService,
    author: Uuid,
}

async fn harness() -> Harness {
    let db = InMemoryDatabase::new();
    let store = Arc::new(InMemoryObjectStore::new(CDN));
    let author = seed_user(&db, "ann").await;
    let posts = PostService::new(Arc::new(db.posts()), Arc::new(db.users()), store.clone());

    Harness {
        db,
        store,
        posts,
        author,
    }
}

async fn seed_user(db: &InMemoryDatabase, name: &str) -> Uuid {
    let user = User::new(Uuid::new_v4(), format!("{name}@example.com"), name.to_string());
    db.users().insert(user).await.unwrap().id
}

fn draft(title: &str, published: bool, content: &str) -> PostDraft {
    PostDraft {
        title: title.to_string(),
        published,
        content: content.to_string(),
    }
}

fn png(name: &str) -> ImageUpload {
    ImageUpload {
        bytes: vec![0x89, 0x50, 0x4e, 0x47],
        content_type: "image/png".to_string(),
        filename: name.to_string(),
    }
}

fn path_of(url: &str) -> &str {
    url.strip_prefix(CDN).unwrap().trim_start_matches('/')
}

#[tokio::test]
async fn create_numbers_single_text_block() {
    let h = harness().await;

    let created = h
        .posts
        .create(h.author, draft("A", true, r#"[{"type":"text","textContent":"hi"}]"#), None)
        .await
        .unwrap();

    assert_eq!(created.post.title, "A");
    assert!(created.post.published);
    assert_eq!(created.author.as_ref().unwrap().username, "ann");
    assert_eq!(created.content.len(), 1);
    assert_eq!(created.content[0].position, 1);
    assert_eq!(created.content[0].body, BlockBody::text("hi"));

    let fetched = h.posts.get(created.post.id, None).await.unwrap();
    assert_eq!(fetched.content, created.content);
}

#[tokio::test]
async fn create_ignores_client_positions() {
    let h = harness().await;
    let content = r#"[
        {"type":"text","textContent":"one","position":5},
        {"type":"text","textContent":"two","position":5},
        {"type":"text","textContent":"three","position":-2}
    ]"#;

    let created = h
        .posts
        .create(h.author, draft("A", true, content), None)
        .await
        .unwrap();

    let fetched = h.posts.get(created.post.id, None).await.unwrap();
    let order: Vec<(i32, &str)> = fetched
        .content
        .iter()
        .map(|b| (b.position, b.body.text_content().unwrap()))
        .collect();
    assert_eq!(order, vec![(1, "one"), (2, "two"), (3, "three")]);
}

#[tokio::test]
async fn create_with_image_appends_it_last() {
    let h = harness().await;

    let created = h
        .posts
        .create(
            h.author,
            draft("A", true, r#"[{"type":"text","textContent":"caption"}]"#),
            Some(png("cat.png")),
        )
        .await
        .unwrap();

    assert_eq!(created.content.len(), 2);
    let last = &created.content[1];
    assert_eq!(last.position, 2);
    let url = last.body.image_url().unwrap();
    assert_eq!(
        h.store.describe(path_of(url)).await,
        Some(("image/png".to_string(), 4))
    );
    assert!(path_of(url).starts_with(&h.author.to_string()));
}

#[tokio::test]
async fn create_rejects_blank_title_and_malformed_content() {
    let h = harness().await;

    let blank = h.posts.create(h.author, draft("  ", true, "[]"), None).await;
    assert!(matches!(blank, Err(DomainError::Validation(_))));

    let malformed = h
        .posts
        .create(h.author, draft("A", true, r#"[{"type":"text"}]"#), Some(png("a.png")))
        .await;
    assert!(matches!(malformed, Err(DomainError::MalformedContent(_))));
    assert!(h.store.is_empty().await);
    assert!(h.posts.list_owned_by(h.author).await.unwrap().is_empty());
}

#[tokio::test]
async fn update_replaces_all_blocks() {
    let h = harness().await;
    let created = h
        .posts
        .create(h.author, draft("A", true, r#"[{"type":"text","textContent":"hi"}]"#), None)
        .await
        .unwrap();
    let original_block = created.content[0].id;

    let updated = h
        .posts
        .update(
            created.post.id,
            h.author,
            draft(
                "A2",
                false,
                r#"[{"type":"text","textContent":"bye"},{"type":"text","textContent":"again"}]"#,
            ),
            None,
        )
        .await
        .unwrap();

    assert_eq!(updated.post.title, "A2");
    assert!(!updated.post.published);
    assert_eq!(updated.post.created_at, created.post.created_at);

    let stored = h
        .db
        .posts()
        .find_blocks(&[created.post.id])
        .await
        .unwrap();
    assert_eq!(stored.len(), 2);
    assert_eq!(stored[0].position, 1);
    assert_eq!(stored[0].body, BlockBody::text("bye"));
    assert_eq!(stored[1].position, 2);
    assert_eq!(stored[1].body, BlockBody::text("again"));
    assert!(stored.iter().all(|b| b.id != original_block));
}

#[tokio::test]
async fn update_by_non_owner_is_forbidden_and_changes_nothing() {
    let h = harness().await;
    let intruder = seed_user(&h.db, "eve").await;
    let created = h
        .posts
        .create(h.author, draft("A", true, r#"[{"type":"text","textContent":"hi"}]"#), None)
        .await
        .unwrap();

    let result = h
        .posts
        .update(
            created.post.id,
            intruder,
            draft("pwned", true, "[]"),
            Some(png("x.png")),
        )
        .await;

    assert!(matches!(result, Err(DomainError::Forbidden(_))));
    assert!(h.store.is_empty().await);

    let fetched = h.posts.get(created.post.id, None).await.unwrap();
    assert_eq!(fetched.post.title, "A");
    assert_eq!(fetched.content, created.content);
}

#[tokio::test]
async fn update_missing_post_is_not_found() {
    let h = harness().await;

    let result = h
        .posts
        .update(Uuid::new_v4(), h.author, draft("A", true, "[]"), None)
        .await;

    assert!(matches!(result, Err(DomainError::NotFound { .. })));
}

#[tokio::test]
async fn update_keeps_retained_images_and_drops_superseded_ones() {
    let h = harness().await;
    let created = h
        .posts
        .create(h.author, draft("A", true, "[]"), Some(png("one.png")))
        .await
        .unwrap();
    let first_url = created.content[0].body.image_url().unwrap().to_string();

    // Keep the first image and add a second.
    let content = format!(r#"[{{"type":"image","imageUrl":"{first_url}"}}]"#);
    let updated = h
        .posts
        .update(created.post.id, h.author, draft("A", true, &content), Some(png("two.png")))
        .await
        .unwrap();
    let urls: Vec<&str> = updated.image_urls().collect();
    assert_eq!(urls.len(), 2);
    assert_eq!(urls[0], first_url);
    assert_eq!(h.store.len().await, 2);
    let second_url = urls[1].to_string();

    // Drop both images.
    h.posts
        .update(created.post.id, h.author, draft("A", true, "[]"), None)
        .await
        .unwrap();
    assert!(!h.store.contains(path_of(&first_url)).await);
    assert!(!h.store.contains(path_of(&second_url)).await);
}

#[tokio::test]
async fn delete_removes_post_blocks_and_images() {
    let h = harness().await;
    let created = h
        .posts
        .create(
            h.author,
            draft("A", true, r#"[{"type":"text","textContent":"hi"}]"#),
            Some(png("cat.png")),
        )
        .await
        .unwrap();

    h.posts.delete(created.post.id, h.author).await.unwrap();

    assert!(matches!(
        h.posts.get(created.post.id, Some(h.author)).await,
        Err(DomainError::NotFound { .. })
    ));
    assert!(h.db.posts().find_blocks(&[created.post.id]).await.unwrap().is_empty());
    assert!(h.store.is_empty().await);
}

#[tokio::test]
async fn delete_by_non_owner_is_forbidden() {
    let h = harness().await;
    let intruder = seed_user(&h.db, "eve").await;
    let created = h
        .posts
        .create(h.author, draft("A", true, "[]"), None)
        .await
        .unwrap();

    let result = h.posts.delete(created.post.id, intruder).await;

    assert!(matches!(result, Err(DomainError::Forbidden(_))));
    assert!(h.posts.get(created.post.id, None).await.is_ok());
}

/// Accepts uploads but refuses every delete.
struct StickyStore(InMemoryObjectStore);

#[async_trait]
impl ObjectStore for StickyStore {
    async fn upload(
        &self,
        path: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<(), StorageError> {
        self.0.upload(path, bytes, content_type).await
    }

    async fn delete(&self, path: &str) -> Result<(), StorageError> {
        Err(StorageError::Delete {
            path: path.to_string(),
            reason: "storage unavailable".to_string(),
        })
    }

    fn public_url(&self, path: &str) -> String {
        self.0.public_url(path)
    }

    fn path_from_public_url(&self, url: &str) -> Option<String> {
        self.0.path_from_public_url(url)
    }
}

#[tokio::test]
async fn delete_succeeds_when_blob_delete_fails() {
    let db = InMemoryDatabase::new();
    let author = seed_user(&db, "ann").await;
    let posts = PostService::new(
        Arc::new(db.posts()),
        Arc::new(db.users()),
        Arc::new(StickyStore(InMemoryObjectStore::new(CDN))),
    );
    let created = posts
        .create(author, draft("A", true, "[]"), Some(png("cat.png")))
        .await
        .unwrap();

    posts.delete(created.post.id, author).await.unwrap();

    assert!(db.posts().find_by_id(created.post.id).await.unwrap().is_none());
}

#[tokio::test]
async fn foreign_image_urls_never_delete_the_owners_blob() {
    let h = harness().await;
    let mallory = seed_user(&h.db, "mallory").await;
    let victim = h
        .posts
        .create(h.author, draft("A", true, "[]"), Some(png("cat.png")))
        .await
        .unwrap();
    let victim_url = victim.content[0].body.image_url().unwrap().to_string();
    let borrowed = format!(r#"[{{"type":"image","imageUrl":"{victim_url}"}}]"#);

    // Dropped from a foreign post by update.
    let copy = h
        .posts
        .create(mallory, draft("copy", true, &borrowed), None)
        .await
        .unwrap();
    h.posts
        .update(copy.post.id, mallory, draft("copy", true, "[]"), None)
        .await
        .unwrap();
    assert!(h.store.contains(path_of(&victim_url)).await);

    // Removed with a foreign post.
    let copy = h
        .posts
        .create(mallory, draft("copy", true, &borrowed), None)
        .await
        .unwrap();
    h.posts.delete(copy.post.id, mallory).await.unwrap();
    assert!(h.store.contains(path_of(&victim_url)).await);

    // The author's own second post reusing the URL does not own it either.
    let reuse = h
        .posts
        .create(h.author, draft("reuse", true, &borrowed), None)
        .await
        .unwrap();
    h.posts.delete(reuse.post.id, h.author).await.unwrap();
    assert!(h.store.contains(path_of(&victim_url)).await);

    let fetched = h.posts.get(victim.post.id, None).await.unwrap();
    assert_eq!(fetched.content[0].body.image_url(), Some(victim_url.as_str()));
}

#[derive(Clone, Copy)]
enum DeleteFault {
    /// Another request removed the row first.
    Vanished,
    /// The store rejected the delete.
    Failed,
}

/// Post repository whose `delete` misbehaves.
struct FaultyDeletes {
    inner: InMemoryPostRepository,
    fault: DeleteFault,
}

#[async_trait]
impl BaseRepository<Post, Uuid> for FaultyDeletes {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Post>, RepoError> {
        self.inner.find_by_id(id).await
    }

    async fn insert(&self, entity: Post) -> Result<Post, RepoError> {
        self.inner.insert(entity).await
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        match self.fault {
            DeleteFault::Vanished => {
                self.inner.delete(id).await?;
                self.inner.delete(id).await
            }
            DeleteFault::Failed => Err(RepoError::Query("connection reset".to_string())),
        }
    }
}

#[async_trait]
impl PostRepository for FaultyDeletes {
    async fn find_published(&self) -> Result<Vec<Post>, RepoError> {
        self.inner.find_published().await
    }

    async fn find_by_author(&self, author_id: Uuid) -> Result<Vec<Post>, RepoError> {
        self.inner.find_by_author(author_id).await
    }

    async fn find_blocks(&self, post_ids: &[Uuid]) -> Result<Vec<ContentBlock>, RepoError> {
        self.inner.find_blocks(post_ids).await
    }

    async fn insert_with_blocks(
        &self,
        post: Post,
        blocks: Vec<ContentBlock>,
    ) -> Result<(), RepoError> {
        self.inner.insert_with_blocks(post, blocks).await
    }

    async fn replace_with_blocks(
        &self,
        post: Post,
        blocks: Vec<ContentBlock>,
    ) -> Result<(), RepoError> {
        self.inner.replace_with_blocks(post, blocks).await
    }
}

async fn faulty_harness(fault: DeleteFault) -> Harness {
    let db = InMemoryDatabase::new();
    let store = Arc::new(InMemoryObjectStore::new(CDN));
    let author = seed_user(&db, "ann").await;
    let repo = FaultyDeletes {
        inner: db.posts(),
        fault,
    };
    let posts = PostService::new(Arc::new(repo), Arc::new(db.users()), store.clone());

    Harness {
        db,
        store,
        posts,
        author,
    }
}

#[tokio::test]
async fn failed_row_delete_keeps_images() {
    let h = faulty_harness(DeleteFault::Failed).await;
    let created = h
        .posts
        .create(h.author, draft("A", true, "[]"), Some(png("cat.png")))
        .await
        .unwrap();
    let url = created.content[0].body.image_url().unwrap().to_string();

    let result = h.posts.delete(created.post.id, h.author).await;

    assert!(matches!(result, Err(DomainError::Store(_))));
    assert!(h.store.contains(path_of(&url)).await);
    assert!(h.posts.get(created.post.id, None).await.is_ok());
}

#[tokio::test]
async fn concurrently_deleted_post_is_not_found() {
    let h = faulty_harness(DeleteFault::Vanished).await;
    let created = h
        .posts
        .create(h.author, draft("A", true, "[]"), None)
        .await
        .unwrap();

    let result = h.posts.delete(created.post.id, h.author).await;

    assert!(matches!(result, Err(DomainError::NotFound { .. })));
}

#[tokio::test]
async fn drafts_are_visible_only_to_their_author() {
    let h = harness().await;
    let reader = seed_user(&h.db, "bob").await;
    let created = h
        .posts
        .create(h.author, draft("secret", false, "[]"), None)
        .await
        .unwrap();

    assert!(h.posts.get(created.post.id, Some(h.author)).await.is_ok());
    assert!(matches!(
        h.posts.get(created.post.id, Some(reader)).await,
        Err(DomainError::NotFound { .. })
    ));
    assert!(matches!(
        h.posts.get(created.post.id, None).await,
        Err(DomainError::NotFound { .. })
    ));
}

#[tokio::test]
async fn listings_filter_by_publish_flag_and_author() {
    let h = harness().await;
    let other = seed_user(&h.db, "bob").await;

    let public = h
        .posts
        .create(h.author, draft("public", true, r#"[{"type":"text","textContent":"x"}]"#), None)
        .await
        .unwrap();
    let hidden = h
        .posts
        .create(h.author, draft("hidden", false, "[]"), None)
        .await
        .unwrap();
    let foreign = h
        .posts
        .create(other, draft("foreign", true, "[]"), None)
        .await
        .unwrap();

    let published = h.posts.list_published().await.unwrap();
    assert!(published.iter().all(|p| p.post.published));
    let ids: Vec<Uuid> = published.iter().map(|p| p.post.id).collect();
    assert_eq!(ids, vec![foreign.post.id, public.post.id]);
    assert_eq!(published[1].content.len(), 1);

    let owned = h.posts.list_owned_by(h.author).await.unwrap();
    assert!(owned.iter().all(|p| p.post.author_id == h.author));
    let ids: Vec<Uuid> = owned.iter().map(|p| p.post.id).collect();
    assert_eq!(ids, vec![hidden.post.id, public.post.id]);
}

#[tokio::test]
async fn bookmarks_are_scoped_to_their_owner() {
    let h = harness().await;
    let reader = seed_user(&h.db, "bob").await;
    let bookmarks = BookmarkService::new(Arc::new(h.db.bookmarks()), Arc::new(h.db.posts()));
    let post = h
        .posts
        .create(h.author, draft("A", true, "[]"), None)
        .await
        .unwrap();

    let first = bookmarks.add(reader, post.post.id).await.unwrap();
    bookmarks.add(reader, post.post.id).await.unwrap();
    assert_eq!(bookmarks.list(reader).await.unwrap().len(), 2);
    assert!(bookmarks.list(h.author).await.unwrap().is_empty());

    let foreign_remove = bookmarks.remove(first.id, h.author).await;
    assert!(matches!(foreign_remove, Err(DomainError::NotFound { .. })));

    bookmarks.remove(first.id, reader).await.unwrap();
    assert_eq!(bookmarks.list(reader).await.unwrap().len(), 1);
}

#[tokio::test]
async fn bookmarking_missing_or_hidden_post_is_not_found() {
    let h = harness().await;
    let reader = seed_user(&h.db, "bob").await;
    let bookmarks = BookmarkService::new(Arc::new(h.db.bookmarks()), Arc::new(h.db.posts()));
    let draft_post = h
        .posts
        .create(h.author, draft("draft", false, "[]"), None)
        .await
        .unwrap();

    assert!(matches!(
        bookmarks.add(reader, Uuid::new_v4()).await,
        Err(DomainError::NotFound { .. })
    ));
    assert!(matches!(
        bookmarks.add(reader, draft_post.post.id).await,
        Err(DomainError::NotFound { .. })
    ));
}
