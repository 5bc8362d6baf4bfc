//! Feed, detail and authoring behaviour of the post service on the
//! in-memory store.

use std::sync::Arc;

use chrono::{TimeDelta, Utc};
use uuid::Uuid;

use yatube_core::domain::{Group, Post, Principal, User};
use yatube_core::error::DomainError;
use yatube_core::forms::{FieldError, PostForm};
use yatube_core::pagination::PageRequest;
use yatube_core::ports::{
    BaseRepository, GroupRepository, PostFilter, PostRepository, UserRepository,
};
use yatube_core::services::{EditorOutcome, GroupService, NewGroup, PostService};
use yatube_infra::InMemoryStore;

struct Fixture {
    users: Arc<dyn UserRepository>,
    groups: Arc<dyn GroupRepository>,
    posts: Arc<dyn PostRepository>,
    service: PostService,
}

impl Fixture {
    fn new() -> Self {
        let store = Arc::new(InMemoryStore::new());
        let users: Arc<dyn UserRepository> = store.clone();
        let groups: Arc<dyn GroupRepository> = store.clone();
        let posts: Arc<dyn PostRepository> = store;
        let service = PostService::new(posts.clone(), groups.clone(), users.clone());
        Self {
            users,
            groups,
            posts,
            service,
        }
    }

    async fn user(&self, username: &str) -> User {
        self.users
            .save(User::new(username.to_string(), "hash".to_string()))
            .await
            .unwrap()
    }

    async fn group(&self, slug: &str) -> Group {
        self.groups
            .save(Group::new(
                "Тестовая группа".to_string(),
                slug.to_string(),
                "Тестовое описание".to_string(),
            ))
            .await
            .unwrap()
    }

    async fn post(&self, author: &User, text: &str, group: Option<&Group>) -> Post {
        self.posts
            .save(Post::new(author.id, text.to_string(), group.map(|g| g.id)))
            .await
            .unwrap()
    }

    async fn total_posts(&self) -> u64 {
        self.posts.count(PostFilter::All).await.unwrap()
    }
}

fn principal(user: &User) -> Principal {
    Principal::user(user.id, user.username.clone())
}

/// One manual post plus fifteen bulk-created ones, all in `test-slug`.
async fn sixteen_posts(fx: &Fixture) -> (User, Group) {
    let author = fx.user("PagiMan").await;
    let group = fx.group("test-slug").await;
    fx.post(&author, "Текст", Some(&group)).await;
    for i in 0..15 {
        fx.post(&author, &format!("tests{i}"), Some(&group)).await;
    }
    (author, group)
}

#[tokio::test]
async fn first_page_holds_ten_posts_on_every_feed() {
    let fx = Fixture::new();
    let (author, group) = sixteen_posts(&fx).await;

    let index = fx.service.index(PageRequest::first()).await.unwrap();
    let by_group = fx
        .service
        .group_feed(&group.slug, PageRequest::first())
        .await
        .unwrap();
    let by_author = fx
        .service
        .profile_feed(&author.username, PageRequest::first())
        .await
        .unwrap();

    assert_eq!(index.len(), 10);
    assert_eq!(by_group.page.len(), 10);
    assert_eq!(by_author.page.len(), 10);
}

#[tokio::test]
async fn second_page_holds_the_remaining_six() {
    let fx = Fixture::new();
    let (author, group) = sixteen_posts(&fx).await;
    let page = PageRequest::parse(Some("2"));

    let index = fx.service.index(page).await.unwrap();
    let by_group = fx.service.group_feed(&group.slug, page).await.unwrap();
    let by_author = fx
        .service
        .profile_feed(&author.username, page)
        .await
        .unwrap();

    assert_eq!(index.len(), 6);
    assert_eq!(by_group.page.len(), 6);
    assert_eq!(by_author.page.len(), 6);
    assert_eq!(by_author.posts_count, 16);
    assert!(!index.has_next());
    assert!(index.has_previous());
}

#[tokio::test]
async fn feeds_are_newest_first_and_pages_cover_everything_once() {
    let fx = Fixture::new();
    let author = fx.user("auth").await;
    let base = Utc::now();
    for i in 0..23 {
        let mut post = Post::new(author.id, format!("post {i:02}"), None);
        post.pub_date = base - TimeDelta::minutes(i);
        fx.posts.save(post).await.unwrap();
    }

    let first = fx.service.index(PageRequest::first()).await.unwrap();
    assert_eq!(first.num_pages(), 3);

    let mut seen = Vec::new();
    for number in 1..=first.num_pages() {
        let page = fx.service.index(PageRequest::new(number)).await.unwrap();
        seen.extend(page.into_items().into_iter().map(|v| v.post.text));
    }

    let expected: Vec<String> = (0..23).map(|i| format!("post {i:02}")).collect();
    assert_eq!(seen, expected);
}

#[tokio::test]
async fn page_past_the_end_is_empty() {
    let fx = Fixture::new();
    sixteen_posts(&fx).await;

    let page = fx.service.index(PageRequest::new(9)).await.unwrap();
    assert!(page.is_empty());
    assert_eq!(page.total_count(), 16);
}

#[tokio::test]
async fn empty_site_has_one_empty_page() {
    let fx = Fixture::new();

    let page = fx.service.index(PageRequest::parse(None)).await.unwrap();
    assert!(page.is_empty());
    assert_eq!(page.num_pages(), 1);
    assert_eq!(page.total_count(), 0);
}

#[tokio::test]
async fn feed_items_carry_author_and_group() {
    let fx = Fixture::new();
    let author = fx.user("Виртуальный Автор").await;
    let group = fx.group("test_slug").await;
    let post = fx.post(&author, "Тестовый текст", Some(&group)).await;

    let page = fx.service.index(PageRequest::first()).await.unwrap();
    let view = &page.items()[0];
    assert_eq!(view.post.id, post.id);
    assert_eq!(view.post.text, "Тестовый текст");
    assert_eq!(view.author.username, "Виртуальный Автор");
    assert_eq!(view.group.as_ref().map(|g| g.id), Some(group.id));
}

#[tokio::test]
async fn unknown_slug_username_and_post_are_not_found() {
    let fx = Fixture::new();

    let group = fx.service.group_feed("missing", PageRequest::first()).await;
    let profile = fx.service.profile_feed("nobody", PageRequest::first()).await;
    let detail = fx.service.detail(Uuid::new_v4()).await;

    assert!(matches!(group, Err(DomainError::NotFound { entity_type: "group", .. })));
    assert!(matches!(profile, Err(DomainError::NotFound { entity_type: "user", .. })));
    assert!(matches!(detail, Err(DomainError::NotFound { entity_type: "post", .. })));
}

#[tokio::test]
async fn detail_counts_author_posts() {
    let fx = Fixture::new();
    let author = fx.user("auth").await;
    let post = fx.post(&author, "first", None).await;
    fx.post(&author, "second", None).await;

    let detail = fx.service.detail(post.id).await.unwrap();
    assert_eq!(detail.view.post.id, post.id);
    assert_eq!(detail.posts_count, 2);
}

#[tokio::test]
async fn create_assigns_author_and_group() {
    let fx = Fixture::new();
    let author = fx.user("Tester").await;
    let group = fx.group("test_slug").await;
    let before = fx.total_posts().await;

    let outcome = fx
        .service
        .create(&principal(&author), PostForm::new("Текст поста", Some(group.id)))
        .await
        .unwrap();

    let EditorOutcome::Saved(post) = outcome else {
        panic!("expected the post to be saved");
    };
    assert_eq!(post.author_id, author.id);
    assert_eq!(post.group_id, Some(group.id));
    assert_eq!(post.text, "Текст поста");
    assert_eq!(fx.total_posts().await, before + 1);
}

#[tokio::test]
async fn anonymous_create_is_refused() {
    let fx = Fixture::new();
    let group = fx.group("test_slug").await;

    let outcome = fx
        .service
        .create(&Principal::Anonymous, PostForm::new("Здесь бы Вася!", Some(group.id)))
        .await
        .unwrap();

    assert!(matches!(outcome, EditorOutcome::LoginRequired));
    assert_eq!(fx.total_posts().await, 0);

    let form = fx.service.create_form(&Principal::Anonymous).await.unwrap();
    assert!(matches!(form, EditorOutcome::LoginRequired));
}

#[tokio::test]
async fn token_of_deleted_user_counts_as_anonymous() {
    let fx = Fixture::new();
    let ghost = Principal::user(Uuid::new_v4(), "ghost");

    let outcome = fx
        .service
        .create(&ghost, PostForm::new("text", None))
        .await
        .unwrap();

    assert!(matches!(outcome, EditorOutcome::LoginRequired));
    assert_eq!(fx.total_posts().await, 0);
}

#[tokio::test]
async fn invalid_submission_is_re_presented_without_saving() {
    let fx = Fixture::new();
    let author = fx.user("Tester").await;
    fx.group("test_slug").await;

    let outcome = fx
        .service
        .create(&principal(&author), PostForm::new("   ", Some(Uuid::new_v4())))
        .await
        .unwrap();

    let EditorOutcome::Form(editor) = outcome else {
        panic!("expected the form back");
    };
    assert_eq!(editor.errors.for_field("text"), &[FieldError::Required]);
    assert_eq!(editor.errors.for_field("group"), &[FieldError::InvalidChoice]);
    assert_eq!(editor.form.text, "   ");
    assert_eq!(editor.groups.len(), 1);
    assert!(!editor.is_edit);
    assert_eq!(fx.total_posts().await, 0);
}

#[tokio::test]
async fn author_edits_text_and_group() {
    let fx = Fixture::new();
    let author = fx.user("Tester").await;
    let group = fx.group("test_slug").await;
    let group_2 = fx.group("test_slug_2").await;
    let post = fx.post(&author, "Пост первый", Some(&group)).await;
    let before = fx.total_posts().await;

    let outcome = fx
        .service
        .edit(
            &principal(&author),
            post.id,
            PostForm::new("Другой пост", Some(group_2.id)),
        )
        .await
        .unwrap();
    assert!(matches!(outcome, EditorOutcome::Saved(_)));

    let stored = fx.posts.find_by_id(post.id).await.unwrap().unwrap();
    assert_eq!(stored.text, "Другой пост");
    assert_eq!(stored.group_id, Some(group_2.id));
    assert_eq!(stored.pub_date, post.pub_date);
    assert_eq!(stored.author_id, author.id);
    assert_eq!(fx.total_posts().await, before);
}

#[tokio::test]
async fn author_gets_prefilled_edit_form() {
    let fx = Fixture::new();
    let author = fx.user("Tester").await;
    let group = fx.group("test_slug").await;
    let post = fx.post(&author, "Пост первый", Some(&group)).await;

    let outcome = fx
        .service
        .edit_form(&principal(&author), post.id)
        .await
        .unwrap();

    let EditorOutcome::Form(editor) = outcome else {
        panic!("expected the edit form");
    };
    assert!(editor.is_edit);
    assert_eq!(editor.post_id, Some(post.id));
    assert_eq!(editor.form, PostForm::new("Пост первый", Some(group.id)));
    assert!(editor.errors.is_empty());
}

#[tokio::test]
async fn non_author_edit_changes_nothing() {
    let fx = Fixture::new();
    let author = fx.user("HasNoName").await;
    let intruder = fx.user("Boss").await;
    let group = fx.group("test_slug").await;
    let post = fx.post(&author, "Тестовый текст", Some(&group)).await;

    let outcome = fx
        .service
        .edit(&principal(&intruder), post.id, PostForm::new("Взлом", None))
        .await
        .unwrap();
    assert!(matches!(outcome, EditorOutcome::NotAuthor { post_id } if post_id == post.id));

    let form = fx.service.edit_form(&principal(&intruder), post.id).await.unwrap();
    assert!(matches!(form, EditorOutcome::NotAuthor { .. }));

    let stored = fx.posts.find_by_id(post.id).await.unwrap().unwrap();
    assert_eq!(stored.text, "Тестовый текст");
    assert_eq!(stored.group_id, Some(group.id));
}

#[tokio::test]
async fn anonymous_edit_requires_login_before_lookup() {
    let fx = Fixture::new();

    let outcome = fx
        .service
        .edit(&Principal::Anonymous, Uuid::new_v4(), PostForm::new("x", None))
        .await
        .unwrap();

    assert!(matches!(outcome, EditorOutcome::LoginRequired));
}

#[tokio::test]
async fn deleting_group_keeps_its_posts() {
    let fx = Fixture::new();
    let author = fx.user("auth").await;
    let group = fx.group("test-slug").await;
    let post = fx.post(&author, "Тестовый пост", Some(&group)).await;

    GroupService::new(fx.groups.clone())
        .delete(&group.slug)
        .await
        .unwrap();

    let detail = fx.service.detail(post.id).await.unwrap();
    assert_eq!(detail.view.group, None);
    assert_eq!(detail.view.post.group_id, None);
    assert_eq!(fx.total_posts().await, 1);
}

#[tokio::test]
async fn deleting_author_deletes_their_posts() {
    let fx = Fixture::new();
    let author = fx.user("auth").await;
    let post = fx.post(&author, "Тестовый пост", None).await;

    fx.users.delete(author.id).await.unwrap();

    assert!(fx.posts.find_by_id(post.id).await.unwrap().is_none());
    assert_eq!(fx.total_posts().await, 0);
}

#[tokio::test]
async fn admin_removes_post() {
    let fx = Fixture::new();
    let author = fx.user("auth").await;
    let post = fx.post(&author, "spam", None).await;

    fx.service.delete(post.id).await.unwrap();
    assert_eq!(fx.total_posts().await, 0);

    let again = fx.service.delete(post.id).await;
    assert!(matches!(again, Err(DomainError::NotFound { .. })));
}

#[tokio::test]
async fn group_creation_rules() {
    let fx = Fixture::new();
    let groups = GroupService::new(fx.groups.clone());

    let created = groups
        .create(NewGroup {
            title: "  Котики ".to_string(),
            slug: "cats".to_string(),
            description: "Всё о котиках".to_string(),
        })
        .await
        .unwrap();
    assert_eq!(created.title, "Котики");

    let duplicate = groups
        .create(NewGroup {
            title: "Ещё котики".to_string(),
            slug: "cats".to_string(),
            description: "Повтор".to_string(),
        })
        .await;
    assert!(matches!(duplicate, Err(DomainError::Duplicate(_))));

    let bad_slug = groups
        .create(NewGroup {
            title: "Группа".to_string(),
            slug: "Тестовый слаг".to_string(),
            description: "desc".to_string(),
        })
        .await;
    assert!(matches!(bad_slug, Err(DomainError::Validation(_))));

    let no_description = groups
        .create(NewGroup {
            title: "Группа".to_string(),
            slug: "group".to_string(),
            description: " ".to_string(),
        })
        .await;
    assert!(matches!(no_description, Err(DomainError::Validation(_))));

    assert_eq!(groups.list().await.unwrap().len(), 1);
}
