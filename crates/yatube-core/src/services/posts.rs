//! Post feeds, detail page and the authoring workflow.

use std::collections::HashMap;
use std::sync::Arc;

use uuid::Uuid;

use crate::domain::{Author, Group, Post, PostView, Principal, User};
use crate::error::DomainError;
use crate::forms::{CleanedPost, EditorForm, FormErrors, PostForm};
use crate::pagination::{Page, PageRequest};
use crate::ports::{GroupRepository, PostFilter, PostOrder, PostRepository, UserRepository};

/// Posts of one group.
#[derive(Debug, Clone)]
pub struct GroupFeed {
    pub group: Group,
    pub page: Page<PostView>,
}

/// Posts of one author.
#[derive(Debug, Clone)]
pub struct ProfileFeed {
    pub author: Author,
    pub posts_count: u64,
    pub page: Page<PostView>,
}

/// A single post and how many posts its author has written.
#[derive(Debug, Clone)]
pub struct PostDetail {
    pub view: PostView,
    pub posts_count: u64,
}

/// Result of showing or submitting the post form.
#[derive(Debug, Clone)]
pub enum EditorOutcome {
    /// Present the form (fresh, prefilled, or with validation errors).
    Form(EditorForm),
    /// The post was written.
    Saved(Post),
    /// The caller must sign in first.
    LoginRequired,
    /// The caller is signed in but does not own the post.
    NotAuthor { post_id: Uuid },
}

/// Read and write access to posts on behalf of a principal.
#[derive(Clone)]
pub struct PostService {
    posts: Arc<dyn PostRepository>,
    groups: Arc<dyn GroupRepository>,
    users: Arc<dyn UserRepository>,
}

impl PostService {
    pub fn new(
        posts: Arc<dyn PostRepository>,
        groups: Arc<dyn GroupRepository>,
        users: Arc<dyn UserRepository>,
    ) -> Self {
        Self {
            posts,
            groups,
            users,
        }
    }

    /// Global feed.
    pub async fn index(&self, page: PageRequest) -> Result<Page<PostView>, DomainError> {
        let posts = self
            .posts
            .find_page(PostFilter::All, PostOrder::NewestFirst, page)
            .await?;
        self.resolve(posts).await
    }

    /// Feed of the group addressed by `slug`.
    pub async fn group_feed(&self, slug: &str, page: PageRequest) -> Result<GroupFeed, DomainError> {
        let group = self
            .groups
            .find_by_slug(slug)
            .await?
            .ok_or_else(|| DomainError::not_found("group", slug))?;

        let posts = self
            .posts
            .find_page(PostFilter::Group(group.id), PostOrder::NewestFirst, page)
            .await?;

        Ok(GroupFeed {
            page: self.resolve(posts).await?,
            group,
        })
    }

    /// Feed of the user addressed by `username`.
    pub async fn profile_feed(
        &self,
        username: &str,
        page: PageRequest,
    ) -> Result<ProfileFeed, DomainError> {
        let user = self
            .users
            .find_by_username(username)
            .await?
            .ok_or_else(|| DomainError::not_found("user", username))?;

        let posts = self
            .posts
            .find_page(PostFilter::Author(user.id), PostOrder::NewestFirst, page)
            .await?;

        Ok(ProfileFeed {
            author: Author::from(&user),
            posts_count: posts.total_count(),
            page: self.resolve(posts).await?,
        })
    }

    pub async fn detail(&self, post_id: Uuid) -> Result<PostDetail, DomainError> {
        let post = self.find_post(post_id).await?;
        let posts_count = self.posts.count(PostFilter::Author(post.author_id)).await?;

        let mut authors = HashMap::new();
        let mut groups = HashMap::new();
        let view = self.view(post, &mut authors, &mut groups).await?;

        Ok(PostDetail { view, posts_count })
    }

    /// Empty form for a new post.
    pub async fn create_form(&self, principal: &Principal) -> Result<EditorOutcome, DomainError> {
        if self.current_user(principal).await?.is_none() {
            return Ok(EditorOutcome::LoginRequired);
        }
        let editor = self.editor(PostForm::default(), FormErrors::default(), None).await?;
        Ok(EditorOutcome::Form(editor))
    }

    /// Publish a new post authored by the principal.
    pub async fn create(
        &self,
        principal: &Principal,
        form: PostForm,
    ) -> Result<EditorOutcome, DomainError> {
        let Some(author) = self.current_user(principal).await? else {
            return Ok(EditorOutcome::LoginRequired);
        };

        match self.clean(&form).await? {
            Ok(cleaned) => {
                let post = Post::new(author.id, cleaned.text, cleaned.group_id);
                let saved = self.posts.save(post).await?;
                Ok(EditorOutcome::Saved(saved))
            }
            Err(errors) => Ok(EditorOutcome::Form(self.editor(form, errors, None).await?)),
        }
    }

    /// Form prefilled with the post, for its author only.
    pub async fn edit_form(
        &self,
        principal: &Principal,
        post_id: Uuid,
    ) -> Result<EditorOutcome, DomainError> {
        let Some(user) = self.current_user(principal).await? else {
            return Ok(EditorOutcome::LoginRequired);
        };

        let post = self.find_post(post_id).await?;
        if !post.is_authored_by(user.id) {
            return Ok(EditorOutcome::NotAuthor { post_id });
        }

        let editor = self
            .editor(PostForm::from_post(&post), FormErrors::default(), Some(post_id))
            .await?;
        Ok(EditorOutcome::Form(editor))
    }

    /// Apply an edit; only the author may change text and group.
    pub async fn edit(
        &self,
        principal: &Principal,
        post_id: Uuid,
        form: PostForm,
    ) -> Result<EditorOutcome, DomainError> {
        let Some(user) = self.current_user(principal).await? else {
            return Ok(EditorOutcome::LoginRequired);
        };

        let mut post = self.find_post(post_id).await?;
        if !post.is_authored_by(user.id) {
            return Ok(EditorOutcome::NotAuthor { post_id });
        }

        match self.clean(&form).await? {
            Ok(cleaned) => {
                post.text = cleaned.text;
                post.group_id = cleaned.group_id;
                let saved = self.posts.save(post).await?;
                Ok(EditorOutcome::Saved(saved))
            }
            Err(errors) => Ok(EditorOutcome::Form(
                self.editor(form, errors, Some(post_id)).await?,
            )),
        }
    }

    /// Administrative removal of a post.
    pub async fn delete(&self, post_id: Uuid) -> Result<(), DomainError> {
        self.find_post(post_id).await?;
        self.posts.delete(post_id).await?;
        Ok(())
    }

    async fn find_post(&self, post_id: Uuid) -> Result<Post, DomainError> {
        self.posts
            .find_by_id(post_id)
            .await?
            .ok_or_else(|| DomainError::not_found("post", post_id))
    }

    /// The user behind the principal; a token for a deleted account
    /// counts as anonymous.
    async fn current_user(&self, principal: &Principal) -> Result<Option<User>, DomainError> {
        match principal.user_id() {
            Some(id) => Ok(self.users.find_by_id(id).await?),
            None => Ok(None),
        }
    }

    async fn clean(&self, form: &PostForm) -> Result<Result<CleanedPost, FormErrors>, DomainError> {
        let group = match form.group {
            Some(id) => self.groups.find_by_id(id).await?,
            None => None,
        };
        Ok(form.clean(group.as_ref()))
    }

    async fn editor(
        &self,
        form: PostForm,
        errors: FormErrors,
        post_id: Option<Uuid>,
    ) -> Result<EditorForm, DomainError> {
        Ok(EditorForm {
            form,
            errors,
            groups: self.groups.list().await?,
            is_edit: post_id.is_some(),
            post_id,
        })
    }

    async fn resolve(&self, page: Page<Post>) -> Result<Page<PostView>, DomainError> {
        let request = PageRequest::new(page.number());
        let total_count = page.total_count();

        let mut authors = HashMap::new();
        let mut groups = HashMap::new();
        let mut views = Vec::with_capacity(page.len());
        for post in page.into_items() {
            views.push(self.view(post, &mut authors, &mut groups).await?);
        }

        Ok(Page::new(views, request, total_count))
    }

    async fn view(
        &self,
        post: Post,
        authors: &mut HashMap<Uuid, Author>,
        groups: &mut HashMap<Uuid, Option<Group>>,
    ) -> Result<PostView, DomainError> {
        let author = match authors.get(&post.author_id) {
            Some(author) => author.clone(),
            None => {
                let user = self
                    .users
                    .find_by_id(post.author_id)
                    .await?
                    .ok_or_else(|| DomainError::not_found("user", post.author_id))?;
                let author = Author::from(&user);
                authors.insert(user.id, author.clone());
                author
            }
        };

        let group = match post.group_id {
            Some(id) => match groups.get(&id) {
                Some(group) => group.clone(),
                None => {
                    let group = self.groups.find_by_id(id).await?;
                    groups.insert(id, group.clone());
                    group
                }
            },
            None => None,
        };

        Ok(PostView {
            post,
            author,
            group,
        })
    }
}
