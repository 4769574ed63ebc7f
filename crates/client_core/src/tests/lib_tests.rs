use super::*;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use std::sync::{Arc, Mutex};
use tokio::net::TcpListener;

fn sample_post(id: i64, title: &str) -> Post {
    Post {
        id: PostId(id),
        title: title.to_string(),
        thumbnail_url: format!("https://cdn.example/{id}.png"),
        created_at: "2024-01-01T00:00:00Z".parse().expect("timestamp"),
        categories: vec!["rust".to_string()],
        content: "<p>body</p>".to_string(),
    }
}

async fn spawn_api(router: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, router).await.expect("serve");
    });
    format!("http://{addr}")
}

#[tokio::test]
async fn list_posts_preserves_server_order() {
    let router = Router::new().route(
        "/posts",
        get(|| async {
            Json(serde_json::json!({
                "posts": [sample_post(2, "second"), sample_post(1, "first")]
            }))
        }),
    );
    let base = spawn_api(router).await;

    let posts = ApiClient::new(&base).list_posts().await.expect("post list");
    assert_eq!(
        posts.iter().map(|p| p.id.0).collect::<Vec<_>>(),
        vec![2, 1]
    );
}

#[tokio::test]
async fn list_posts_reports_http_failures_as_status_errors() {
    let router = Router::new().route(
        "/posts",
        get(|| async { StatusCode::INTERNAL_SERVER_ERROR }),
    );
    let base = spawn_api(router).await;

    let err = ApiClient::new(&base)
        .list_posts()
        .await
        .expect_err("500 must not decode");
    assert!(matches!(err, ApiClientError::Status { status: 500 }));
}

#[tokio::test]
async fn list_posts_reports_malformed_bodies_as_decode_errors() {
    let router = Router::new().route(
        "/posts",
        get(|| async { Json(serde_json::json!({ "unexpected": true })) }),
    );
    let base = spawn_api(router).await;

    let err = ApiClient::new(&base)
        .list_posts()
        .await
        .expect_err("shape mismatch must not decode");
    assert!(matches!(err, ApiClientError::Decode(_)));
}

#[tokio::test]
async fn fetch_post_returns_post_for_known_id() {
    let router = Router::new().route(
        "/posts/:id",
        get(|Path(id): Path<i64>| async move {
            Json(serde_json::json!({ "post": sample_post(id, "found") }))
        }),
    );
    let base = spawn_api(router).await;

    let post = ApiClient::new(&base)
        .fetch_post(PostId(9))
        .await
        .expect("detail fetch")
        .expect("known id");
    assert_eq!(post.id, PostId(9));
    assert_eq!(post.title, "found");
}

#[tokio::test]
async fn fetch_post_maps_http_404_to_none() {
    let router = Router::new().route("/posts/:id", get(|| async { StatusCode::NOT_FOUND }));
    let base = spawn_api(router).await;

    let post = ApiClient::new(&base)
        .fetch_post(PostId(404))
        .await
        .expect("404 is an answer, not an error");
    assert!(post.is_none());
}

#[tokio::test]
async fn fetch_post_maps_null_post_body_to_none() {
    let router = Router::new().route(
        "/posts/:id",
        get(|| async { Json(serde_json::json!({ "post": null })) }),
    );
    let base = spawn_api(router).await;

    let post = ApiClient::new(&base)
        .fetch_post(PostId(1))
        .await
        .expect("null body decodes");
    assert!(post.is_none());
}

#[tokio::test]
async fn submit_contact_posts_the_json_body() {
    let seen: Arc<Mutex<Option<ContactRequest>>> = Arc::new(Mutex::new(None));
    let seen_handle = Arc::clone(&seen);
    let router = Router::new()
        .route(
            "/contacts",
            post(
                |State(seen): State<Arc<Mutex<Option<ContactRequest>>>>,
                 Json(body): Json<ContactRequest>| async move {
                    *seen.lock().expect("capture lock") = Some(body);
                    StatusCode::OK
                },
            ),
        )
        .with_state(seen_handle);
    let base = spawn_api(router).await;

    let request = ContactRequest {
        name: "alice".to_string(),
        email: "alice@example.com".to_string(),
        message: "hello".to_string(),
    };
    ApiClient::new(&base)
        .submit_contact(&request)
        .await
        .expect("accepted");

    let captured = seen.lock().expect("capture lock").clone().expect("body");
    assert_eq!(captured.name, "alice");
    assert_eq!(captured.email, "alice@example.com");
    assert_eq!(captured.message, "hello");
}

#[tokio::test]
async fn submit_contact_rejection_carries_server_message() {
    let router = Router::new().route(
        "/contacts",
        post(|| async {
            (
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(serde_json::json!({ "message": "message too spammy" })),
            )
        }),
    );
    let base = spawn_api(router).await;

    let request = ContactRequest {
        name: "a".to_string(),
        email: "a@b.co".to_string(),
        message: "m".to_string(),
    };
    let err = ApiClient::new(&base)
        .submit_contact(&request)
        .await
        .expect_err("rejected");
    match err {
        SubmitError::Rejected(rejection) => {
            assert_eq!(rejection.status, 422);
            assert_eq!(rejection.display_message(), "message too spammy");
        }
        other => panic!("expected rejection, got {other:?}"),
    }
}

#[tokio::test]
async fn submit_contact_rejection_without_body_falls_back_to_status() {
    let router = Router::new().route(
        "/contacts",
        post(|| async { StatusCode::INTERNAL_SERVER_ERROR }),
    );
    let base = spawn_api(router).await;

    let request = ContactRequest {
        name: "a".to_string(),
        email: "a@b.co".to_string(),
        message: "m".to_string(),
    };
    let err = ApiClient::new(&base)
        .submit_contact(&request)
        .await
        .expect_err("rejected");
    match err {
        SubmitError::Rejected(rejection) => {
            assert_eq!(rejection.status, 500);
            assert!(rejection.message.is_none());
            assert_eq!(rejection.display_message(), "HTTP status 500");
        }
        other => panic!("expected rejection, got {other:?}"),
    }
}

#[tokio::test]
async fn submit_contact_transport_failure_is_not_a_rejection() {
    // Bind then drop a listener so the port is very likely closed.
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("local addr");
    drop(listener);

    let request = ContactRequest {
        name: "a".to_string(),
        email: "a@b.co".to_string(),
        message: "m".to_string(),
    };
    let err = ApiClient::new(format!("http://{addr}"))
        .submit_contact(&request)
        .await
        .expect_err("nothing is listening");
    assert!(matches!(err, SubmitError::Transport(_)));
}

#[tokio::test]
async fn fetch_image_returns_raw_bytes_from_absolute_url() {
    let router = Router::new().route(
        "/cdn/7.png",
        get(|| async { [0x89_u8, b'P', b'N', b'G'].to_vec() }),
    );
    let base = spawn_api(router).await;

    let bytes = ApiClient::new("http://unused.example")
        .fetch_image(&format!("{base}/cdn/7.png"))
        .await
        .expect("image bytes");
    assert_eq!(bytes, vec![0x89, b'P', b'N', b'G']);
}

#[tokio::test]
async fn trailing_slash_in_base_url_is_tolerated() {
    let router = Router::new().route(
        "/posts",
        get(|| async { Json(serde_json::json!({ "posts": [] })) }),
    );
    let base = spawn_api(router).await;

    let posts = ApiClient::new(format!("{base}/"))
        .list_posts()
        .await
        .expect("post list");
    assert!(posts.is_empty());
}
