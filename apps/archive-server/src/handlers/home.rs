//! Landing and group picker.

use actix_web::HttpResponse;

use pokshin_core::metadata;
use pokshin_shared::dto::{GroupSummary, HomeResponse};

pub const ARCHIVE_TITLE: &str = "POKSHIN ARCHIVE";

/// GET /api/home
pub async fn home() -> HttpResponse {
    HttpResponse::Ok().json(HomeResponse {
        title: ARCHIVE_TITLE.to_string(),
        image: metadata::HOME_IMAGE.to_string(),
    })
}

/// GET /api/groups
pub async fn groups() -> HttpResponse {
    let groups: Vec<GroupSummary> = metadata::groups()
        .iter()
        .map(|meta| GroupSummary {
            id: meta.id.to_string(),
            image: meta.image.to_string(),
            color: meta.color.to_string(),
            description: meta.description.to_string(),
        })
        .collect();

    HttpResponse::Ok().json(groups)
}

#[cfg(test)]
mod tests {
    use crate::handlers::test_support::{get_json, init_app, test_state};

    #[actix_web::test]
    async fn test_home_and_groups() {
        let app = init_app!(test_state().await);

        let home = get_json!(&app, "/api/home");
        assert_eq!(home["title"], "POKSHIN ARCHIVE");

        let groups = get_json!(&app, "/api/groups");
        let ids: Vec<&str> = groups
            .as_array()
            .unwrap()
            .iter()
            .map(|g| g["id"].as_str().unwrap())
            .collect();
        assert_eq!(ids, ["ONEUS", "ONF", "VERIVERY", "P1HARMONY"]);
        assert_eq!(groups[1]["description"], "Archive for FUSE");
    }
}
