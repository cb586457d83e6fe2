use axum::extract::{Path, Query, State};

use crate::api::v1::dto::posts::{ListPostsQuery, ListPostsResponse, PostData};
use crate::api::v1::response::{ApiError, ApiResponse, ErrorCode, ResponseMeta};
use crate::api::AppState;

/// `GET /api/v1/posts`
#[utoipa::path(
    get,
    path = "/api/v1/posts",
    tag = "posts",
    params(
        ("limit" = Option<u32>, Query, description = "Maximum number of posts to return"),
    ),
    responses(
        (status = 200, description = "Recent posts, newest first", body = ListPostsResponse),
        (status = 401, description = "Missing or invalid API key", body = ApiError),
    )
)]
pub async fn list_posts(
    State(state): State<AppState>,
    Query(query): Query<ListPostsQuery>,
) -> ApiResponse<ListPostsResponse> {
    let limit = query.limit.clamp(1, 100);

    let posts = match state.store.list_recent(limit).await {
        Ok(posts) => posts,
        Err(e) => return ApiResponse::from(e),
    };

    let total = match state.store.count_posts().await {
        Ok(count) => Some(count),
        Err(_) => None,
    };

    ApiResponse::success_with_meta(
        ListPostsResponse {
            posts: posts.into_iter().map(PostData::summary_of).collect(),
        },
        ResponseMeta { total },
    )
}

/// `GET /api/v1/posts/{postId}`
#[utoipa::path(
    get,
    path = "/api/v1/posts/{postId}",
    tag = "posts",
    params(
        ("postId" = i64, Path, description = "Local post id"),
    ),
    responses(
        (status = 200, description = "The post, including its body", body = PostData),
        (status = 404, description = "No such post", body = ApiError),
        (status = 401, description = "Missing or invalid API key", body = ApiError),
    )
)]
pub async fn get_post(
    State(state): State<AppState>,
    Path(post_id): Path<i64>,
) -> ApiResponse<PostData> {
    match state.store.get_post(post_id).await {
        Ok(Some(post)) => ApiResponse::success(PostData::from(post)),
        Ok(None) => ApiResponse::error(ErrorCode::NotFound, format!("Post {post_id} not found")),
        Err(e) => ApiResponse::from(e),
    }
}

/// `DELETE /api/v1/posts/{postId}`
///
/// Removes the post and, when retrieval is configured, its document in the
/// collection. A failed document removal never fails the post deletion.
#[utoipa::path(
    delete,
    path = "/api/v1/posts/{postId}",
    tag = "posts",
    params(
        ("postId" = i64, Path, description = "Local post id"),
    ),
    responses(
        (status = 200, description = "Post deleted"),
        (status = 404, description = "No such post", body = ApiError),
        (status = 401, description = "Missing or invalid API key", body = ApiError),
    )
)]
pub async fn delete_post(
    State(state): State<AppState>,
    Path(post_id): Path<i64>,
) -> ApiResponse<()> {
    match state.store.delete_post(post_id).await {
        Ok(true) => {
            if state.retrieval.is_available() {
                if let Err(e) = state.sync.delete_post_document(post_id).await {
                    tracing::error!(post_id, error = %e, "Failed to delete retrieval document");
                }
            }
            ApiResponse::success(())
        }
        Ok(false) => ApiResponse::error(ErrorCode::NotFound, format!("Post {post_id} not found")),
        Err(e) => ApiResponse::from(e),
    }
}
