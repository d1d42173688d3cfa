//! Blog post handlers.
//!
//! POST /api/v1/posts          multipart create, optional `image` file
//! GET  /api/v1/posts          paginated list with `page`, `limit`, `search`
//! GET  /api/v1/posts/{slug}   single post

use actix_multipart::{Field, Multipart};
use actix_web::{HttpResponse, web};
use futures::TryStreamExt;

use folio_core::domain::{CreatePostInput, ImageUpload, PageRequest};
use folio_shared::dto::{ListPostsQuery, Pagination};
use folio_shared::{ApiResponse, PaginatedResponse};

use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

/// Per-field cap on multipart bodies.
const MAX_FIELD_BYTES: usize = 10 << 20;

/// POST /api/v1/posts
pub async fn create_post(
    state: web::Data<AppState>,
    mut payload: Multipart,
) -> AppResult<HttpResponse> {
    let (input, image) = read_post_form(&mut payload).await?;

    let post = state.posts.create_post_with_upload(input, image).await?;

    Ok(HttpResponse::Created().json(ApiResponse::ok_with_message(
        post,
        "Blog post created successfully",
    )))
}

/// GET /api/v1/posts?page=<int>&limit=<int>&search=<string>
pub async fn list_posts(
    state: web::Data<AppState>,
    query: web::Query<ListPostsQuery>,
) -> AppResult<HttpResponse> {
    let request = PageRequest::new(query.page(), query.limit());

    let page = state
        .posts
        .list_posts(request, query.search.as_deref())
        .await?;

    let pagination = Pagination {
        total: page.pagination.total,
        page: page.pagination.page,
        limit: page.pagination.limit,
        total_pages: page.pagination.total_pages,
    };

    Ok(HttpResponse::Ok().json(PaginatedResponse::new(
        page.data,
        pagination,
        "Blog posts retrieved successfully",
    )))
}

/// GET /api/v1/posts/{slug}
pub async fn get_post_by_slug(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let slug = path.into_inner();

    let post = state.posts.get_by_slug(&slug).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok_with_message(
        post,
        "Blog post retrieved successfully",
    )))
}

async fn read_post_form(
    payload: &mut Multipart,
) -> AppResult<(CreatePostInput, Option<ImageUpload>)> {
    let mut input = CreatePostInput::default();
    let mut image = None;

    while let Some(mut field) = payload
        .try_next()
        .await
        .map_err(|e| AppError::InvalidForm(e.to_string()))?
    {
        let name = field.name().unwrap_or_default().to_string();

        if name == "image" {
            let filename = field
                .content_disposition()
                .and_then(|cd| cd.get_filename())
                .unwrap_or_default()
                .to_string();
            let content = read_field(&mut field).await?;
            if !content.is_empty() {
                image = Some(ImageUpload { filename, content });
            }
            continue;
        }

        let value = String::from_utf8(read_field(&mut field).await?)
            .map_err(|_| AppError::InvalidForm(format!("field '{}' is not valid UTF-8", name)))?;

        match name.as_str() {
            "title" => input.title = value,
            "excerpt" => input.excerpt = value,
            "content" => input.content = value,
            "slug" => input.slug = Some(value),
            "published_at" => input.published_at = Some(value),
            other => tracing::debug!(field = %other, "Ignoring unknown form field"),
        }
    }

    Ok((input, image))
}

async fn read_field(field: &mut Field) -> AppResult<Vec<u8>> {
    let mut buf = Vec::new();
    while let Some(chunk) = field
        .try_next()
        .await
        .map_err(|e| AppError::InvalidForm(e.to_string()))?
    {
        if buf.len() + chunk.len() > MAX_FIELD_BYTES {
            return Err(AppError::BadRequest(format!(
                "form field exceeds {} bytes",
                MAX_FIELD_BYTES
            )));
        }
        buf.extend_from_slice(&chunk);
    }
    Ok(buf)
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;
    use std::sync::Arc;

    use actix_web::http::StatusCode;
    use actix_web::http::header::CONTENT_TYPE;
    use actix_web::{App, test};
    use serde_json::Value;

    use folio_infra::{InMemoryPostRepository, LocalImageStore};

    use super::*;
    use crate::handlers::configure_routes;

    const BOUNDARY: &str = "folio-test-boundary";

    async fn state(dir: &PathBuf) -> AppState {
        let images = LocalImageStore::new(dir, "/images").await.unwrap();
        AppState::new(Arc::new(InMemoryPostRepository::new()), Arc::new(images))
    }

    fn temp_dir() -> PathBuf {
        std::env::temp_dir().join(format!("folio-api-{}", uuid::Uuid::new_v4()))
    }

    fn multipart(fields: &[(&str, &str)], file: Option<(&str, &[u8])>) -> (String, Vec<u8>) {
        let mut body = Vec::new();
        for (name, value) in fields {
            body.extend_from_slice(
                format!(
                    "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
                )
                .as_bytes(),
            );
        }
        if let Some((filename, bytes)) = file {
            body.extend_from_slice(
                format!(
                    "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"image\"; filename=\"{filename}\"\r\nContent-Type: application/octet-stream\r\n\r\n"
                )
                .as_bytes(),
            );
            body.extend_from_slice(bytes);
            body.extend_from_slice(b"\r\n");
        }
        body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
        (format!("multipart/form-data; boundary={BOUNDARY}"), body)
    }

    fn create_request(fields: &[(&str, &str)], file: Option<(&str, &[u8])>) -> test::TestRequest {
        let (content_type, body) = multipart(fields, file);
        test::TestRequest::post()
            .uri("/api/v1/posts")
            .insert_header((CONTENT_TYPE, content_type))
            .set_payload(body)
    }

    fn post_fields(title: &str) -> Vec<(&str, &str)> {
        vec![
            ("title", title),
            ("excerpt", "A short summary"),
            ("content", "The full body of the post"),
        ]
    }

    #[actix_web::test]
    async fn create_then_fetch_by_slug() {
        let dir = temp_dir();
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state(&dir).await))
                .configure(configure_routes),
        )
        .await;

        let resp = test::call_service(&app, create_request(&post_fields("Hello, World!"), None).to_request()).await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["success"], true);
        assert_eq!(body["data"]["slug"], "hello-world");

        let req = test::TestRequest::get().uri("/api/v1/posts/hello-world").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["data"]["title"], "Hello, World!");
        assert_eq!(body["data"]["content"], "The full body of the post");

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[actix_web::test]
    async fn same_title_twice_yields_distinct_slugs() {
        let dir = temp_dir();
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state(&dir).await))
                .configure(configure_routes),
        )
        .await;

        let mut slugs = Vec::new();
        for _ in 0..2 {
            let resp = test::call_service(&app, create_request(&post_fields("Repeat"), None).to_request()).await;
            assert_eq!(resp.status(), StatusCode::CREATED);
            let body: Value = test::read_body_json(resp).await;
            slugs.push(body["data"]["slug"].as_str().unwrap().to_string());
        }
        assert_eq!(slugs[0], "repeat");
        assert!(slugs[1].starts_with("repeat-"));

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[actix_web::test]
    async fn missing_title_is_bad_request() {
        let dir = temp_dir();
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state(&dir).await))
                .configure(configure_routes),
        )
        .await;

        let fields = [("excerpt", "Summary"), ("content", "Body")];
        let resp = test::call_service(&app, create_request(&fields, Some(("a.png", &b"png"[..]))).to_request()).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["code"], 400);
        assert!(body["message"].as_str().unwrap().contains("required"));

        let req = test::TestRequest::get().uri("/api/v1/posts").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["pagination"]["total"], 0);
        assert!(std::fs::read_dir(&dir).unwrap().next().is_none());

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[actix_web::test]
    async fn non_multipart_body_is_bad_request() {
        let dir = temp_dir();
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state(&dir).await))
                .configure(configure_routes),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/api/v1/posts")
            .insert_header((CONTENT_TYPE, "application/json"))
            .set_payload(r#"{"title":"x"}"#)
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[actix_web::test]
    async fn upload_is_stored_and_linked() {
        let dir = temp_dir();
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state(&dir).await))
                .configure(configure_routes),
        )
        .await;

        let resp = test::call_service(
            &app,
            create_request(&post_fields("Pictured"), Some(("cover.PNG", &b"\x89PNG"[..]))).to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        let body: Value = test::read_body_json(resp).await;

        let url = body["data"]["image"].as_str().unwrap();
        let filename = url.strip_prefix("/images/").unwrap();
        assert!(filename.ends_with(".png"));
        assert_eq!(std::fs::read(dir.join(filename)).unwrap(), b"\x89PNG");

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[actix_web::test]
    async fn list_falls_back_to_default_paging() {
        let dir = temp_dir();
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state(&dir).await))
                .configure(configure_routes),
        )
        .await;

        for i in 0..3 {
            let title = format!("Post number {i}");
            let resp = test::call_service(&app, create_request(&post_fields(&title), None).to_request()).await;
            assert_eq!(resp.status(), StatusCode::CREATED);
        }

        let req = test::TestRequest::get()
            .uri("/api/v1/posts?page=abc&limit=0")
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(
            body["pagination"],
            serde_json::json!({"total": 3, "page": 1, "limit": 10, "total_pages": 1})
        );
        assert_eq!(body["data"][0]["slug"], "post-number-2");

        let req = test::TestRequest::get()
            .uri("/api/v1/posts?page=2&limit=2&search=NUMBER")
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["pagination"]["total_pages"], 2);
        assert_eq!(body["data"].as_array().unwrap().len(), 1);
        assert_eq!(body["data"][0]["slug"], "post-number-0");
        assert_eq!(body["data"][0]["excerpt"], "A short summary");
        assert!(body["data"][0].get("content").is_none());

        let req = test::TestRequest::get()
            .uri("/api/v1/posts?page=1000000000000000000&limit=10")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["data"], serde_json::json!([]));
        assert_eq!(body["pagination"]["total"], 3);

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[actix_web::test]
    async fn unknown_slug_is_not_found() {
        let dir = temp_dir();
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state(&dir).await))
                .configure(configure_routes),
        )
        .await;

        let req = test::TestRequest::get().uri("/api/v1/posts/never-created").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["code"], 404);
        assert_eq!(body["message"], "blog post with slug 'never-created' not found");

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[actix_web::test]
    async fn health_reports_ok() {
        let app = test::init_service(App::new().configure(configure_routes)).await;
        let req = test::TestRequest::get().uri("/health").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["status"], "ok");
    }
}
