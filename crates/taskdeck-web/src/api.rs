use gloo::net::http::{Request, RequestBuilder};
use serde::Serialize;
use taskdeck_core::api::{DEFAULT_BASE_URL, Endpoint, Method, TaskApi, decode_data, decode_empty};
use taskdeck_core::error::ClientError;
use taskdeck_shared::{Stats, Task, TaskCreate, TaskId, TaskPatch};

/// Backend base URL baked in at build time.
pub fn base_url() -> &'static str {
    option_env!("TASKDECK_API_BASE").unwrap_or(DEFAULT_BASE_URL)
}

/// [`TaskApi`] over the browser's `fetch`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTaskApi {
    base_url: String,
}

impl FetchTaskApi {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }

    async fn send(
        &self,
        endpoint: Endpoint,
        body: Option<String>,
    ) -> Result<(u16, String), ClientError> {
        let url = endpoint.url(&self.base_url);
        let builder: RequestBuilder = match endpoint.method {
            Method::Get => Request::get(&url),
            Method::Post => Request::post(&url),
            Method::Put => Request::put(&url),
            Method::Delete => Request::delete(&url),
        }
        .header("Content-Type", "application/json");

        let request = match body {
            Some(body) => builder.body(body),
            None => builder.build(),
        }
        .map_err(|err| ClientError::network(err.to_string()))?;

        let response = request.send().await.map_err(|err| {
            tracing::warn!(endpoint = %endpoint, error = %err, "fetch failed before a response");
            ClientError::network(err.to_string())
        })?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|err| ClientError::network(format!("failed reading response body: {err}")))?;
        tracing::debug!(endpoint = %endpoint, status, "received response");
        Ok((status, text))
    }

    async fn send_json<B>(&self, endpoint: Endpoint, body: &B) -> Result<(u16, String), ClientError>
    where
        B: Serialize + ?Sized,
    {
        let payload = serde_json::to_string(body)
            .map_err(|err| ClientError::validation(format!("failed to encode request: {err}")))?;
        self.send(endpoint, Some(payload)).await
    }
}

impl TaskApi for FetchTaskApi {
    async fn list_tasks(&self) -> Result<Vec<Task>, ClientError> {
        let (status, body) = self.send(Endpoint::list_tasks(), None).await?;
        decode_data(status, &body)
    }

    async fn get_task(&self, id: TaskId) -> Result<Task, ClientError> {
        let (status, body) = self.send(Endpoint::get_task(id), None).await?;
        decode_data(status, &body)
    }

    async fn list_categories(&self) -> Result<Vec<String>, ClientError> {
        let (status, body) = self.send(Endpoint::categories(), None).await?;
        decode_data(status, &body)
    }

    async fn stats(&self) -> Result<Stats, ClientError> {
        let (status, body) = self.send(Endpoint::stats(), None).await?;
        decode_data(status, &body)
    }

    async fn create_task(&self, create: &TaskCreate) -> Result<Task, ClientError> {
        let (status, body) = self.send_json(Endpoint::create_task(), create).await?;
        decode_data(status, &body)
    }

    async fn update_task(&self, id: TaskId, patch: &TaskPatch) -> Result<Task, ClientError> {
        let (status, body) = self.send_json(Endpoint::update_task(id), patch).await?;
        decode_data(status, &body)
    }

    async fn delete_task(&self, id: TaskId) -> Result<(), ClientError> {
        let (status, body) = self.send(Endpoint::delete_task(id), None).await?;
        decode_empty(status, &body)
    }
}
