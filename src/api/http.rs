//! HTTP Implementation
//!
//! `BoardApi` over the REST endpoint using reqwest.

use async_trait::async_trait;
use item_order::{ItemId, OrderMap, Patch};
use reqwest::{Client, Method};
use serde::de::DeserializeOwned;
use serde::Serialize;

use super::{ApiError, ApiResult, BoardApi};
use crate::config::Config;
use crate::models::{CategoryRecord, Item};

/// REST client for one board endpoint
#[derive(Debug, Clone)]
pub struct HttpApi {
    client: Client,
    endpoint: String,
}

impl HttpApi {
    pub fn new(config: &Config) -> ApiResult<Self> {
        let client = Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| ApiError::Transport {
                method: "INIT".to_string(),
                url: config.endpoint.clone(),
                reason: e.to_string(),
            })?;

        Ok(Self {
            client,
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn send<B, T>(&self, method: Method, path: &str, body: Option<&B>) -> ApiResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = format!("{}{}", self.endpoint, path);
        tracing::debug!("{} {}", method, url);

        let mut request = self.client.request(method.clone(), &url);
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await.map_err(|e| ApiError::Transport {
            method: method.to_string(),
            url: url.clone(),
            reason: e.to_string(),
        })?;

        let status = response.status();
        let url = response.url().to_string();
        let text = response.text().await.map_err(|e| ApiError::Transport {
            method: method.to_string(),
            url: url.clone(),
            reason: e.to_string(),
        })?;

        if !status.is_success() {
            return Err(ApiError::Status {
                method: method.to_string(),
                url,
                status: status.as_u16(),
                status_text: status.canonical_reason().unwrap_or_default().to_string(),
                body: text,
            });
        }

        let text = if text.trim().is_empty() { "null" } else { text.as_str() };
        serde_json::from_str(text).map_err(|e| ApiError::Decode {
            method: method.to_string(),
            url,
            reason: e.to_string(),
        })
    }
}

#[async_trait]
impl BoardApi for HttpApi {
    async fn list_categories(&self) -> ApiResult<Vec<CategoryRecord>> {
        self.send::<(), _>(Method::GET, "/v1/categories", None).await
    }

    async fn create_category(&self, category: &CategoryRecord) -> ApiResult<()> {
        self.send::<_, serde_json::Value>(Method::POST, "/v1/categories", Some(category))
            .await
            .map(|_| ())
    }

    async fn list_items(&self) -> ApiResult<Vec<Item>> {
        self.send::<(), _>(Method::GET, "/v1/items", None).await
    }

    async fn create_item(&self, item: &Item) -> ApiResult<()> {
        self.send::<_, serde_json::Value>(Method::POST, "/v1/items", Some(item))
            .await
            .map(|_| ())
    }

    async fn delete_item(&self, id: &ItemId) -> ApiResult<()> {
        let path = format!("/v1/item/{}", id);
        self.send::<(), serde_json::Value>(Method::DELETE, &path, None)
            .await
            .map(|_| ())
    }

    async fn get_order(&self) -> ApiResult<OrderMap> {
        self.send::<(), _>(Method::GET, "/v1/itemsOrder", None).await
    }

    async fn patch_order(&self, patch: &Patch) -> ApiResult<Patch> {
        self.send(Method::PATCH, "/v1/itemsOrder", Some(patch)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::extract::Path;
    use axum::http::StatusCode;
    use axum::routing::{delete, get};
    use axum::{Json, Router};
    use item_order::NodeId;
    use serde_json::{json, Value};

    async fn spawn_server() -> HttpApi {
        let app = Router::new()
            .route(
                "/api/v1/categories",
                get(|| async { Json(json!([{ "id": "todo", "title": "To do" }, { "id": "done" }])) })
                    .post(|Json(body): Json<Value>| async move { Json(json!([body])) }),
            )
            .route(
                "/api/v1/items",
                get(|| async {
                    Json(json!([{ "id": "c1", "date": "2024-05-01", "title": "Buy milk", "text": "2l" }]))
                }),
            )
            .route(
                "/api/v1/itemsOrder",
                get(|| async { Json(json!({ "todo": "c1", "c1": "todo", "done": "done", "old": null })) })
                    .patch(|Json(body): Json<Value>| async move { Json(body) }),
            )
            .route(
                "/api/v1/item/{id}",
                delete(|Path(id): Path<String>| async move {
                    if id == "missing" {
                        Err((StatusCode::NOT_FOUND, "no such item".to_string()))
                    } else {
                        Ok(Json(json!({})))
                    }
                }),
            );

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        let config = Config {
            endpoint: format!("http://{}/api/", addr),
            ..Config::default()
        };
        HttpApi::new(&config).unwrap()
    }

    #[tokio::test]
    async fn test_fetches_board() {
        let api = spawn_server().await;

        let categories = api.list_categories().await.unwrap();
        assert_eq!(categories.len(), 2);
        assert_eq!(categories[0].title.as_deref(), Some("To do"));
        assert_eq!(categories[1].title, None);

        let items = api.list_items().await.unwrap();
        assert_eq!(items[0].text.as_deref(), Some("2l"));

        let order = api.get_order().await.unwrap();
        assert_eq!(order.len(), 3);
        assert_eq!(order.successor(&NodeId::new("c1")), Some(&NodeId::new("todo")));
    }

    #[tokio::test]
    async fn test_patch_echo_keeps_removals() {
        let api = spawn_server().await;
        let mut patch = Patch::new();
        patch.link(NodeId::new("todo"), NodeId::new("todo"));
        patch.unlink(NodeId::new("c1"));

        let echoed = api.patch_order(&patch).await.unwrap();
        assert_eq!(echoed, patch);

        let record = CategoryRecord {
            id: "new".into(),
            title: Some("New".to_string()),
        };
        api.create_category(&record).await.unwrap();
    }

    #[tokio::test]
    async fn test_error_status_is_reported() {
        let api = spawn_server().await;

        api.delete_item(&ItemId::new("c1")).await.unwrap();
        let err = api.delete_item(&ItemId::new("missing")).await.unwrap_err();

        match &err {
            ApiError::Status { method, status, body, url, .. } => {
                assert_eq!(method, "DELETE");
                assert_eq!(*status, 404);
                assert_eq!(body, "no such item");
                assert!(url.ends_with("/api/v1/item/missing"));
            }
            other => panic!("unexpected error: {:?}", other),
        }
        assert!(err.to_string().ends_with("404 (Not Found)"));
    }

    #[tokio::test]
    async fn test_unreachable_endpoint() {
        let config = Config {
            endpoint: "http://127.0.0.1:9/api".to_string(),
            ..Config::default()
        };
        let api = HttpApi::new(&config).unwrap();

        let err = api.list_items().await.unwrap_err();
        assert!(matches!(err, ApiError::Transport { .. }));
    }
}
