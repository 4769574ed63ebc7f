use serde::{Deserialize, Serialize};

use crate::domain::Post;

/// Body of `GET /posts`. Post order is the server's; the client does
/// not reorder.
#[derive(Debug, Clone, Deserialize)]
pub struct PostsResponse {
    pub posts: Vec<Post>,
}

/// Body of `GET /posts/{id}`. A missing or null `post` means the id is
/// unknown.
#[derive(Debug, Clone, Deserialize)]
pub struct PostResponse {
    #[serde(default)]
    pub post: Option<Post>,
}

/// JSON body of `POST /contacts`. Built from validated form state only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContactRequest {
    pub name: String,
    pub email: String,
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_camel_case_post_wire_fields() {
        let body = r#"{
            "posts": [{
                "id": 7,
                "title": "Hello",
                "thumbnailUrl": "https://cdn.example/7.png",
                "createdAt": "2024-03-01T09:30:00Z",
                "categories": ["rust", "notes"],
                "content": "<p>hi</p>"
            }]
        }"#;

        let decoded: PostsResponse = serde_json::from_str(body).expect("posts body");
        assert_eq!(decoded.posts.len(), 1);
        let post = &decoded.posts[0];
        assert_eq!(post.id.0, 7);
        assert_eq!(post.thumbnail_url, "https://cdn.example/7.png");
        assert_eq!(post.categories, vec!["rust", "notes"]);
    }

    #[test]
    fn detail_body_with_null_post_decodes_to_none() {
        let decoded: PostResponse =
            serde_json::from_str(r#"{"post": null}"#).expect("detail body");
        assert!(decoded.post.is_none());

        let decoded: PostResponse = serde_json::from_str("{}").expect("empty detail body");
        assert!(decoded.post.is_none());
    }

    #[test]
    fn contact_request_serializes_flat_field_names() {
        let request = ContactRequest {
            name: "alice".to_string(),
            email: "alice@example.com".to_string(),
            message: "hi".to_string(),
        };
        let json = serde_json::to_value(&request).expect("contact body");
        assert_eq!(json["name"], "alice");
        assert_eq!(json["email"], "alice@example.com");
        assert_eq!(json["message"], "hi");
    }
}
