//! Post list for one group.

use actix_web::{HttpResponse, web};

use pokshin_core::domain::Post;
use pokshin_shared::dto::{PostListResponse, PostSummary};

use crate::state::AppState;

pub(crate) fn summary(post: &Post) -> PostSummary {
    PostSummary {
        id: post.id,
        title: post.title.clone(),
        cp: post.cp.clone(),
        genre: post.genre.iter().map(|g| g.label().to_string()).collect(),
        pen_name: post.display_pen_name().to_string(),
        writing_date: post.writing_date,
        is_adult: post.is_adult,
        image_url: post.image_url.clone(),
    }
}

/// GET /api/archive/{group_id}
///
/// The id is not checked against the group table; an unknown group lists nothing.
pub async fn list_posts(state: web::Data<AppState>, path: web::Path<String>) -> HttpResponse {
    let group_id = path.into_inner();
    let posts = state.posts.list_by_group(&group_id).await;

    HttpResponse::Ok().json(PostListResponse {
        title: format!("{group_id} Archive"),
        posts: posts.iter().map(summary).collect(),
        group_id,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pokshin_core::domain::{GroupId, NewPost, RichText};

    use crate::handlers::test_support::{get_json, init_app, test_state};

    #[actix_web::test]
    async fn test_lists_group_newest_first() {
        let state = test_state().await;
        let first = state
            .posts
            .create(NewPost::new(GroupId::Oneus, "첫 만남", RichText::from_plain_text("a")))
            .await
            .unwrap();
        state
            .posts
            .create(NewPost::new(GroupId::Onf, "다른 그룹", RichText::from_plain_text("b")))
            .await
            .unwrap();
        let second = state
            .posts
            .create(NewPost::new(GroupId::Oneus, "두 번째", RichText::from_plain_text("c")))
            .await
            .unwrap();
        let app = init_app!(state);

        let body = get_json!(&app, "/api/archive/ONEUS");
        assert_eq!(body["title"], "ONEUS Archive");
        let posts = body["posts"].as_array().unwrap();
        assert_eq!(posts.len(), 2);
        assert_eq!(posts[0]["id"], second.id.to_string());
        assert_eq!(posts[1]["id"], first.id.to_string());
        assert_eq!(posts[0]["penName"], "Anonymous");
    }

    #[actix_web::test]
    async fn test_unknown_group_is_empty() {
        let app = init_app!(test_state().await);
        let body = get_json!(&app, "/api/archive/UNKNOWN");
        assert_eq!(body["posts"], serde_json::json!([]));
    }
}
