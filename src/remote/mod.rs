pub mod dto;
pub mod memory;

use async_trait::async_trait;
use reqwest::{Client, Response};
use tracing::info;

use crate::error::AppError;
use crate::models::Todo;

pub use memory::MemoryTodoStore;

#[derive(Clone, Debug)]
pub struct StoreConfig {
    pub base_url: String,
}

impl StoreConfig {
    pub fn new(base_url: impl Into<String>) -> Result<Self, AppError> {
        let base_url = base_url.into().trim().trim_end_matches('/').to_string();
        if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
            return Err(AppError::Config(format!(
                "TASKPAD_BASE_URL must be an http(s) URL, got {:?}",
                base_url
            )));
        }
        Ok(Self { base_url })
    }

    fn item_url(&self, id: &str) -> String {
        format!("{}/{}", self.base_url, id)
    }
}

/// One remote collection of todos.
#[async_trait]
pub trait TodoStore: Send + Sync {
    async fn list_all(&self) -> Result<Vec<Todo>, AppError>;
    async fn get(&self, id: &str) -> Result<Todo, AppError>;
    async fn create(&self, todo: &Todo) -> Result<Todo, AppError>;
    async fn update(&self, todo: &Todo) -> Result<(), AppError>;
    async fn remove(&self, id: &str) -> Result<(), AppError>;
}

pub struct CrudHttpClient {
    client: Client,
    config: StoreConfig,
}

impl CrudHttpClient {
    pub fn new(config: StoreConfig) -> Result<Self, AppError> {
        let client = Client::builder()
            .build()
            .map_err(|e| AppError::Config(format!("Failed to build http client: {}", e)))?;
        Ok(Self { client, config })
    }

    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    async fn check(response: Response) -> Result<Response, AppError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(AppError::NotFound);
        }
        let body = response.text().await.unwrap_or_default();
        Err(AppError::Remote {
            status: status.as_u16(),
            body,
        })
    }

    async fn decode<T: serde::de::DeserializeOwned>(response: Response) -> Result<T, AppError> {
        let body_text = response.text().await?;
        serde_json::from_str::<T>(&body_text).map_err(|e| {
            tracing::error!("Failed to parse store response: {}", e);
            AppError::Decode(e)
        })
    }
}

#[async_trait]
impl TodoStore for CrudHttpClient {
    async fn list_all(&self) -> Result<Vec<Todo>, AppError> {
        info!("GET {}", self.config.base_url);
        let response = self.client.get(&self.config.base_url).send().await?;
        let todos: Vec<Todo> = Self::decode(Self::check(response).await?).await?;
        info!("Fetched {} todos", todos.len());
        Ok(todos)
    }

    async fn get(&self, id: &str) -> Result<Todo, AppError> {
        let url = self.config.item_url(id);
        info!("GET {}", url);
        let response = self.client.get(&url).send().await?;
        Self::decode(Self::check(response).await?).await
    }

    async fn create(&self, todo: &Todo) -> Result<Todo, AppError> {
        info!("POST {}", self.config.base_url);
        let response = self
            .client
            .post(&self.config.base_url)
            .json(&dto::TodoPayload::from(todo))
            .send()
            .await?;
        let created: Todo = Self::decode(Self::check(response).await?).await?;
        if !created.is_persisted() {
            return Err(AppError::BadRequest(
                "Store did not assign an id to the new todo".to_string(),
            ));
        }
        Ok(created)
    }

    async fn update(&self, todo: &Todo) -> Result<(), AppError> {
        let id = todo.id.as_deref().ok_or(AppError::NotPersisted)?;
        let url = self.config.item_url(id);
        info!("PUT {}", url);
        let response = self
            .client
            .put(&url)
            .json(&dto::TodoPayload::from(todo))
            .send()
            .await?;
        // The store answers an update with an empty body; nothing to decode.
        Self::check(response).await?;
        Ok(())
    }

    async fn remove(&self, id: &str) -> Result<(), AppError> {
        let url = self.config.item_url(id);
        info!("DELETE {}", url);
        let response = self.client.delete(&url).send().await?;
        Self::check(response).await?;
        Ok(())
    }
}
