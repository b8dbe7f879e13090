use std::collections::{HashMap, HashSet};

use axum::Json;
use axum::extract::{Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use sea_orm::prelude::Expr;
use sea_orm::sea_query::{Func, LikeExpr, Query as SeaQuery};
use sea_orm::*;
use tracing::instrument;

use crate::entity::post::status;
use crate::entity::{category, comment, post, post_tag, post_view, tag, user};
use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::extractors::json::AppJson;
use crate::extractors::path::AppPath;
use crate::models::post::*;
use crate::state::AppState;
use crate::utils::slug::{MAX_SLUG_ATTEMPTS, candidate, slugify};

#[utoipa::path(
    post,
    path = "/api/posts",
    tag = "Posts",
    operation_id = "createPost",
    summary = "Create a new post",
    description = "Creates a post owned by the caller. The slug is derived from the title; collisions are resolved with a numeric suffix. Default status is DRAFT.",
    request_body = CreatePostRequest,
    responses(
        (status = 201, description = "Post created", body = PostResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthenticated (TOKEN_MISSING)", body = ErrorBody),
        (status = 403, description = "Invalid token (TOKEN_INVALID)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(title = %payload.title))]
pub async fn create_post(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppJson(payload): AppJson<CreatePostRequest>,
) -> Result<impl IntoResponse, AppError> {
    validate_create_post(&payload)?;

    if let Some(category_id) = payload.category_id {
        find_category(&state.db, category_id).await?;
    }
    let tag_ids = dedup_tag_ids(&payload.tag_ids);
    check_tags_exist(&state.db, &tag_ids).await?;

    let new_status = payload
        .status
        .clone()
        .unwrap_or_else(|| status::DRAFT.to_string());
    let now = chrono::Utc::now();
    let published = new_status == status::PUBLISHED;
    let base_slug = slugify(&payload.title);

    // Insert with the base slug and retry with a suffix when the unique
    // constraint fires. Each attempt is its own transaction because Postgres
    // aborts a transaction on constraint violation.
    for attempt in 0..MAX_SLUG_ATTEMPTS {
        let txn = state.db.begin().await?;

        let new_post = post::ActiveModel {
            title: Set(payload.title.trim().to_string()),
            slug: Set(candidate(&base_slug, attempt)),
            content: Set(payload.content.clone()),
            excerpt: Set(payload.excerpt.clone()),
            status: Set(new_status.clone()),
            featured: Set(payload.featured),
            published: Set(published),
            published_at: Set(published.then_some(now)),
            scheduled_at: Set(payload.scheduled_at),
            views: Set(0),
            likes: Set(0),
            meta_title: Set(payload.meta_title.clone()),
            meta_description: Set(payload.meta_description.clone()),
            keywords: Set(payload.keywords.clone()),
            author_id: Set(auth_user.user_id),
            category_id: Set(payload.category_id),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        match new_post.insert(&txn).await {
            Ok(model) => {
                link_tags(&txn, model.id, &tag_ids).await?;
                txn.commit().await?;
                return Ok((
                    StatusCode::CREATED,
                    Json(PostResponse::from_model(model, tag_ids)),
                ));
            }
            Err(e) => {
                txn.rollback().await?;
                match e.sql_err() {
                    Some(SqlErr::UniqueConstraintViolation(_)) => continue,
                    _ => return Err(AppError::from(e)),
                }
            }
        }
    }

    Err(AppError::Internal(format!(
        "Could not find a free slug for '{base_slug}' after {MAX_SLUG_ATTEMPTS} attempts"
    )))
}

#[utoipa::path(
    get,
    path = "/api/posts",
    tag = "Posts",
    operation_id = "listPosts",
    summary = "List published posts",
    description = "Public, paginated listing of published posts with category/tag/featured filters and sorting.",
    params(PostListQuery),
    responses(
        (status = 200, description = "Page of posts", body = PostListResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, query))]
pub async fn list_posts(
    State(state): State<AppState>,
    Query(query): Query<PostListQuery>,
) -> Result<Json<PostListResponse>, AppError> {
    let page = Ord::max(query.page.unwrap_or(1), 1);
    let per_page = query.per_page.unwrap_or(10).clamp(1, 100);

    let mut select = post::Entity::find().filter(post::Column::Published.eq(true));

    if let Some(ref category_slug) = query.category {
        select = select.filter(
            post::Column::CategoryId.in_subquery(
                SeaQuery::select()
                    .column(category::Column::Id)
                    .from(category::Entity)
                    .and_where(category::Column::Slug.eq(category_slug.trim()))
                    .to_owned(),
            ),
        );
    }

    if let Some(ref tags_param) = query.tags {
        let slugs = split_tag_slugs(tags_param);
        if !slugs.is_empty() {
            select = select.filter(post::Column::Id.in_subquery(tagged_post_ids(slugs)));
        }
    }

    if let Some(featured) = query.featured {
        select = select.filter(post::Column::Featured.eq(featured));
    }

    let (sort_column, sort_order) = parse_public_sort(query.sort.as_deref())?;

    let total = select
        .clone()
        .paginate(&state.db, per_page)
        .num_items()
        .await?;
    let total_pages = total.div_ceil(per_page);

    let models = select
        .order_by(sort_column, sort_order)
        .offset(Some((page - 1) * per_page))
        .limit(Some(per_page))
        .all(&state.db)
        .await?;

    let data = hydrate_post_list(&state.db, models).await?;

    Ok(Json(PostListResponse {
        data,
        pagination: Pagination {
            page,
            per_page,
            total,
            total_pages,
        },
    }))
}

#[utoipa::path(
    get,
    path = "/api/posts/{slug}",
    tag = "Posts",
    operation_id = "getPostBySlug",
    summary = "Get a published post by slug",
    description = "Public single-post lookup. Increments the view counter atomically and records a view row. Non-published posts are 404.",
    params(("slug" = String, Path, description = "Post slug")),
    responses(
        (status = 200, description = "Post details", body = PostDetailResponse),
        (status = 404, description = "Post not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, headers), fields(slug))]
pub async fn get_post_by_slug(
    State(state): State<AppState>,
    AppPath(slug): AppPath<String>,
    headers: HeaderMap,
) -> Result<Json<PostDetailResponse>, AppError> {
    let model = post::Entity::find()
        .filter(post::Column::Slug.eq(&slug))
        .filter(post::Column::Published.eq(true))
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Post not found".into()))?;

    // views = views + 1 in a single statement so concurrent reads can't
    // lose increments.
    post::Entity::update_many()
        .col_expr(post::Column::Views, Expr::col(post::Column::Views).add(1))
        .filter(post::Column::Id.eq(model.id))
        .exec(&state.db)
        .await?;

    let view = post_view::ActiveModel {
        post_id: Set(model.id),
        ip_address: Set(client_ip(&headers)),
        user_agent: Set(headers
            .get("user-agent")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)),
        created_at: Set(chrono::Utc::now()),
        ..Default::default()
    };
    view.insert(&state.db).await?;

    let views = model.views + 1;
    let detail = hydrate_post_detail(&state.db, model, views).await?;

    Ok(Json(detail))
}

#[utoipa::path(
    get,
    path = "/api/posts/admin/all",
    tag = "Posts",
    operation_id = "listOwnPosts",
    summary = "List the caller's own posts in any status",
    params(AdminPostListQuery),
    responses(
        (status = 200, description = "Page of the caller's posts", body = AdminPostListResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthenticated (TOKEN_MISSING)", body = ErrorBody),
        (status = 403, description = "Invalid token (TOKEN_INVALID)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, query), fields(user_id = auth_user.user_id))]
pub async fn list_own_posts(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Query(query): Query<AdminPostListQuery>,
) -> Result<Json<AdminPostListResponse>, AppError> {
    let page = Ord::max(query.page.unwrap_or(1), 1);
    let per_page = query.per_page.unwrap_or(10).clamp(1, 100);

    let mut select = post::Entity::find().filter(post::Column::AuthorId.eq(auth_user.user_id));

    if let Some(ref s) = query.status {
        validate_status(s)?;
        select = select.filter(post::Column::Status.eq(s));
    }

    if let Some(ref search) = query.search {
        let term = escape_like(search.trim());
        if !term.is_empty() {
            select = select.filter(
                Expr::expr(Func::lower(Expr::col(post::Column::Title)))
                    .like(LikeExpr::new(format!("%{}%", term.to_lowercase())).escape('\\')),
            );
        }
    }

    let total = select
        .clone()
        .paginate(&state.db, per_page)
        .num_items()
        .await?;
    let total_pages = total.div_ceil(per_page);

    let data = select
        .order_by_desc(post::Column::CreatedAt)
        .offset(Some((page - 1) * per_page))
        .limit(Some(per_page))
        .all(&state.db)
        .await?
        .into_iter()
        .map(AdminPostListItem::from)
        .collect();

    Ok(Json(AdminPostListResponse {
        data,
        pagination: Pagination {
            page,
            per_page,
            total,
            total_pages,
        },
    }))
}

#[utoipa::path(
    get,
    path = "/api/posts/id/{id}",
    tag = "Posts",
    operation_id = "getPostForEdit",
    summary = "Get a post by ID for editing (owner only)",
    params(("id" = i32, Path, description = "Post ID")),
    responses(
        (status = 200, description = "Post details including tag IDs", body = PostResponse),
        (status = 401, description = "Unauthenticated (TOKEN_MISSING)", body = ErrorBody),
        (status = 403, description = "Not the owner (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Post not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(id))]
pub async fn get_post_for_edit(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppPath(id): AppPath<i32>,
) -> Result<Json<PostResponse>, AppError> {
    let model = find_own_post(&state.db, id, auth_user.user_id).await?;
    let tag_ids = post_tag_ids(&state.db, model.id).await?;

    Ok(Json(PostResponse::from_model(model, tag_ids)))
}

#[utoipa::path(
    put,
    path = "/api/posts/{id}",
    tag = "Posts",
    operation_id = "updatePost",
    summary = "Update a post (owner only)",
    description = "Partial update; absent fields are unchanged. A title change regenerates the slug. The first transition to PUBLISHED sets published_at; later updates never change it.",
    params(("id" = i32, Path, description = "Post ID")),
    request_body = UpdatePostRequest,
    responses(
        (status = 200, description = "Post updated", body = PostResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthenticated (TOKEN_MISSING)", body = ErrorBody),
        (status = 403, description = "Not the owner (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Post not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(id))]
pub async fn update_post(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppPath(id): AppPath<i32>,
    AppJson(payload): AppJson<UpdatePostRequest>,
) -> Result<Json<PostResponse>, AppError> {
    validate_update_post(&payload)?;

    if payload == UpdatePostRequest::default() {
        let existing = find_own_post(&state.db, id, auth_user.user_id).await?;
        let tag_ids = post_tag_ids(&state.db, existing.id).await?;
        return Ok(Json(PostResponse::from_model(existing, tag_ids)));
    }

    if let Some(Some(category_id)) = payload.category_id {
        find_category(&state.db, category_id).await?;
    }
    let new_tag_ids = payload.tag_ids.as_deref().map(dedup_tag_ids);
    if let Some(ref ids) = new_tag_ids {
        check_tags_exist(&state.db, ids).await?;
    }

    let title_changed = payload.title.is_some();

    // Retry only makes sense while a changed title can collide on the slug.
    let attempts = if title_changed { MAX_SLUG_ATTEMPTS } else { 1 };

    for attempt in 0..attempts {
        let txn = state.db.begin().await?;

        let existing = find_own_post_for_update(&txn, id, auth_user.user_id).await?;
        let had_published_at = existing.published_at.is_some();
        let mut active: post::ActiveModel = existing.into();

        if let Some(ref title) = payload.title {
            active.title = Set(title.trim().to_string());
            active.slug = Set(candidate(&slugify(title), attempt));
        }
        if let Some(ref content) = payload.content {
            active.content = Set(content.clone());
        }
        if let Some(ref excerpt) = payload.excerpt {
            active.excerpt = Set(excerpt.clone());
        }
        if let Some(featured) = payload.featured {
            active.featured = Set(featured);
        }
        if let Some(ref category_id) = payload.category_id {
            active.category_id = Set(*category_id);
        }
        if let Some(ref scheduled_at) = payload.scheduled_at {
            active.scheduled_at = Set(*scheduled_at);
        }
        if let Some(ref v) = payload.meta_title {
            active.meta_title = Set(v.clone());
        }
        if let Some(ref v) = payload.meta_description {
            active.meta_description = Set(v.clone());
        }
        if let Some(ref v) = payload.keywords {
            active.keywords = Set(v.clone());
        }
        if let Some(ref new_status) = payload.status {
            active.status = Set(new_status.clone());
            let published = new_status == status::PUBLISHED;
            active.published = Set(published);
            if published && !had_published_at {
                active.published_at = Set(Some(chrono::Utc::now()));
            }
        }
        active.updated_at = Set(chrono::Utc::now());

        match active.update(&txn).await {
            Ok(model) => {
                let tag_ids = match new_tag_ids {
                    Some(ref ids) => {
                        post_tag::Entity::delete_many()
                            .filter(post_tag::Column::PostId.eq(model.id))
                            .exec(&txn)
                            .await?;
                        link_tags(&txn, model.id, ids).await?;
                        ids.clone()
                    }
                    None => post_tag_ids(&txn, model.id).await?,
                };
                txn.commit().await?;
                return Ok(Json(PostResponse::from_model(model, tag_ids)));
            }
            Err(e) => {
                txn.rollback().await?;
                match e.sql_err() {
                    Some(SqlErr::UniqueConstraintViolation(_)) if title_changed => continue,
                    _ => return Err(AppError::from(e)),
                }
            }
        }
    }

    Err(AppError::Internal(
        "Could not find a free slug for the new title".into(),
    ))
}

#[utoipa::path(
    delete,
    path = "/api/posts/{id}",
    tag = "Posts",
    operation_id = "deletePost",
    summary = "Delete a post (owner only)",
    description = "Deletes the post together with its tag links, comments, and view rows in one transaction.",
    params(("id" = i32, Path, description = "Post ID")),
    responses(
        (status = 200, description = "Post deleted", body = DeleteResponse),
        (status = 401, description = "Unauthenticated (TOKEN_MISSING)", body = ErrorBody),
        (status = 403, description = "Not the owner (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Post not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(id))]
pub async fn delete_post(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppPath(id): AppPath<i32>,
) -> Result<Json<DeleteResponse>, AppError> {
    let txn = state.db.begin().await?;

    let model = find_own_post_for_update(&txn, id, auth_user.user_id).await?;

    post_view::Entity::delete_many()
        .filter(post_view::Column::PostId.eq(model.id))
        .exec(&txn)
        .await?;
    comment::Entity::delete_many()
        .filter(comment::Column::PostId.eq(model.id))
        .exec(&txn)
        .await?;
    post_tag::Entity::delete_many()
        .filter(post_tag::Column::PostId.eq(model.id))
        .exec(&txn)
        .await?;
    post::Entity::delete_by_id(model.id).exec(&txn).await?;

    txn.commit().await?;

    Ok(Json(DeleteResponse {
        message: "Post deleted successfully".into(),
    }))
}

/// Sort for public listings. `newest`/`oldest` order by publication date.
pub(crate) fn parse_public_sort(sort: Option<&str>) -> Result<(post::Column, Order), AppError> {
    match sort.unwrap_or("newest") {
        "newest" => Ok((post::Column::PublishedAt, Order::Desc)),
        "oldest" => Ok((post::Column::PublishedAt, Order::Asc)),
        "title" => Ok((post::Column::Title, Order::Asc)),
        "views" => Ok((post::Column::Views, Order::Desc)),
        "likes" => Ok((post::Column::Likes, Order::Desc)),
        _ => Err(AppError::Validation(
            "sort must be one of: newest, oldest, title, views, likes".into(),
        )),
    }
}

/// Split a comma-separated tag slug list, dropping empties.
pub(crate) fn split_tag_slugs(param: &str) -> Vec<String> {
    param
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Subquery selecting IDs of posts carrying any of the given tag slugs.
pub(crate) fn tagged_post_ids(slugs: Vec<String>) -> sea_orm::sea_query::SelectStatement {
    SeaQuery::select()
        .column(post_tag::Column::PostId)
        .from(post_tag::Entity)
        .inner_join(
            tag::Entity,
            Expr::col((tag::Entity, tag::Column::Id))
                .equals((post_tag::Entity, post_tag::Column::TagId)),
        )
        .and_where(Expr::col((tag::Entity, tag::Column::Slug)).is_in(slugs))
        .to_owned()
}

/// Batch-load authors, categories, tags, and approved-comment counts for a
/// page of posts and assemble the public list items in input order.
pub(crate) async fn hydrate_post_list(
    db: &DatabaseConnection,
    models: Vec<post::Model>,
) -> Result<Vec<PostListItem>, AppError> {
    if models.is_empty() {
        return Ok(Vec::new());
    }

    let post_ids: Vec<i32> = models.iter().map(|m| m.id).collect();
    let author_ids: HashSet<i32> = models.iter().map(|m| m.author_id).collect();
    let category_ids: HashSet<i32> = models.iter().filter_map(|m| m.category_id).collect();

    let authors: HashMap<i32, String> = user::Entity::find()
        .filter(user::Column::Id.is_in(author_ids))
        .all(db)
        .await?
        .into_iter()
        .map(|u| (u.id, u.nickname))
        .collect();

    let categories: HashMap<i32, category::Model> = category::Entity::find()
        .filter(category::Column::Id.is_in(category_ids))
        .all(db)
        .await?
        .into_iter()
        .map(|c| (c.id, c))
        .collect();

    let links = post_tag::Entity::find()
        .filter(post_tag::Column::PostId.is_in(post_ids.clone()))
        .all(db)
        .await?;
    let tag_ids: HashSet<i32> = links.iter().map(|l| l.tag_id).collect();
    let tags: HashMap<i32, tag::Model> = tag::Entity::find()
        .filter(tag::Column::Id.is_in(tag_ids))
        .all(db)
        .await?
        .into_iter()
        .map(|t| (t.id, t))
        .collect();
    let mut tags_by_post: HashMap<i32, Vec<TagSummary>> = HashMap::new();
    for link in links {
        if let Some(t) = tags.get(&link.tag_id) {
            tags_by_post
                .entry(link.post_id)
                .or_default()
                .push(TagSummary::from(t.clone()));
        }
    }

    let comment_counts: HashMap<i32, i64> = comment::Entity::find()
        .filter(comment::Column::PostId.is_in(post_ids))
        .filter(comment::Column::Approved.eq(true))
        .select_only()
        .column(comment::Column::PostId)
        .column_as(comment::Column::Id.count(), "cnt")
        .group_by(comment::Column::PostId)
        .into_tuple::<(i32, i64)>()
        .all(db)
        .await?
        .into_iter()
        .collect();

    let items = models
        .into_iter()
        .map(|m| PostListItem {
            author: AuthorSummary {
                nickname: authors.get(&m.author_id).cloned().unwrap_or_default(),
            },
            category: m
                .category_id
                .and_then(|id| categories.get(&id).cloned())
                .map(CategorySummary::from),
            tags: tags_by_post.remove(&m.id).unwrap_or_default(),
            comment_count: comment_counts.get(&m.id).copied().unwrap_or(0) as u64,
            id: m.id,
            title: m.title,
            slug: m.slug,
            excerpt: m.excerpt,
            featured: m.featured,
            published_at: m.published_at,
            views: m.views,
            likes: m.likes,
        })
        .collect();

    Ok(items)
}

async fn hydrate_post_detail(
    db: &DatabaseConnection,
    model: post::Model,
    views: i32,
) -> Result<PostDetailResponse, AppError> {
    let author = user::Entity::find_by_id(model.author_id)
        .one(db)
        .await?
        .map(|u| u.nickname)
        .unwrap_or_default();

    let category = match model.category_id {
        Some(id) => category::Entity::find_by_id(id)
            .one(db)
            .await?
            .map(CategorySummary::from),
        None => None,
    };

    let tag_ids = post_tag_ids(db, model.id).await?;
    let tags = tag::Entity::find()
        .filter(tag::Column::Id.is_in(tag_ids))
        .all(db)
        .await?
        .into_iter()
        .map(TagSummary::from)
        .collect();

    let comment_count = comment::Entity::find()
        .filter(comment::Column::PostId.eq(model.id))
        .filter(comment::Column::Approved.eq(true))
        .count(db)
        .await?;

    Ok(PostDetailResponse {
        id: model.id,
        title: model.title,
        slug: model.slug,
        content: model.content,
        excerpt: model.excerpt,
        featured: model.featured,
        published_at: model.published_at,
        views,
        likes: model.likes,
        meta_title: model.meta_title,
        meta_description: model.meta_description,
        keywords: model.keywords,
        author: AuthorSummary { nickname: author },
        category,
        tags,
        comment_count,
    })
}

pub(crate) async fn find_post<C: ConnectionTrait>(db: &C, id: i32) -> Result<post::Model, AppError> {
    post::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound("Post not found".into()))
}

/// Load a post and enforce ownership: 404 when absent, 403 when owned by
/// someone else.
async fn find_own_post<C: ConnectionTrait>(
    db: &C,
    id: i32,
    user_id: i32,
) -> Result<post::Model, AppError> {
    let model = find_post(db, id).await?;
    if model.author_id != user_id {
        return Err(AppError::PermissionDenied);
    }
    Ok(model)
}

async fn find_own_post_for_update(
    txn: &DatabaseTransaction,
    id: i32,
    user_id: i32,
) -> Result<post::Model, AppError> {
    use sea_orm::sea_query::LockType;
    let model = post::Entity::find_by_id(id)
        .lock(LockType::Update)
        .one(txn)
        .await?
        .ok_or_else(|| AppError::NotFound("Post not found".into()))?;
    if model.author_id != user_id {
        return Err(AppError::PermissionDenied);
    }
    Ok(model)
}

async fn find_category<C: ConnectionTrait>(db: &C, id: i32) -> Result<(), AppError> {
    category::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::Validation(format!("Category {id} does not exist")))?;
    Ok(())
}

fn dedup_tag_ids(ids: &[i32]) -> Vec<i32> {
    let mut seen = HashSet::new();
    ids.iter().copied().filter(|id| seen.insert(*id)).collect()
}

async fn check_tags_exist<C: ConnectionTrait>(db: &C, ids: &[i32]) -> Result<(), AppError> {
    if ids.is_empty() {
        return Ok(());
    }
    let found = tag::Entity::find()
        .filter(tag::Column::Id.is_in(ids.to_vec()))
        .count(db)
        .await?;
    if found != ids.len() as u64 {
        return Err(AppError::Validation(
            "One or more tag IDs do not exist".into(),
        ));
    }
    Ok(())
}

async fn link_tags<C: ConnectionTrait>(db: &C, post_id: i32, ids: &[i32]) -> Result<(), AppError> {
    for &tag_id in ids {
        let link = post_tag::ActiveModel {
            post_id: Set(post_id),
            tag_id: Set(tag_id),
            ..Default::default()
        };
        link.insert(db).await?;
    }
    Ok(())
}

async fn post_tag_ids<C: ConnectionTrait>(db: &C, post_id: i32) -> Result<Vec<i32>, AppError> {
    let ids = post_tag::Entity::find()
        .filter(post_tag::Column::PostId.eq(post_id))
        .select_only()
        .column(post_tag::Column::TagId)
        .into_tuple::<i32>()
        .all(db)
        .await?;
    Ok(ids)
}

/// Best-effort client IP: first X-Forwarded-For hop, then X-Real-IP.
fn client_ip(headers: &HeaderMap) -> String {
    headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .or_else(|| headers.get("x-real-ip").and_then(|v| v.to_str().ok()))
        .unwrap_or("unknown")
        .to_string()
}
