use serde::Serialize;
use taskdeck_shared::{
  Stats,
  Task,
  TaskCreate,
  TaskId,
  TaskPatch
};
use tracing::{
  debug,
  instrument,
  warn
};

use super::{
  Endpoint,
  Method,
  TaskApi,
  decode_data,
  decode_empty
};
use crate::error::ClientError;

/// [`TaskApi`] over `reqwest`.
#[derive(Debug, Clone)]
pub struct HttpTaskApi {
  client:   reqwest::Client,
  base_url: String
}

impl HttpTaskApi {
  pub fn new(
    base_url: impl Into<String>
  ) -> Result<Self, ClientError> {
    let client =
      reqwest::Client::builder()
        .build()
        .map_err(|err| {
          ClientError::network(format!(
            "failed building HTTP \
             client: {err}"
          ))
        })?;

    Ok(Self {
      client,
      base_url: base_url.into()
    })
  }

  pub fn base_url(&self) -> &str {
    &self.base_url
  }

  #[instrument(skip_all, fields(endpoint = %endpoint))]
  async fn send(
    &self,
    endpoint: Endpoint,
    body: Option<String>
  ) -> Result<(u16, String), ClientError> {
    let method = match endpoint.method {
      | Method::Get => reqwest::Method::GET,
      | Method::Post => {
        reqwest::Method::POST
      }
      | Method::Put => reqwest::Method::PUT,
      | Method::Delete => {
        reqwest::Method::DELETE
      }
    };
    let url =
      endpoint.url(&self.base_url);

    let mut request = self
      .client
      .request(method, url.as_str())
      .header(
        reqwest::header::CONTENT_TYPE,
        "application/json"
      );
    if let Some(body) = body {
      request = request.body(body);
    }

    let response =
      match request.send().await {
        | Ok(response) => response,
        | Err(error) => {
          warn!(url = %url, error = %error, "request failed before a response");
          return Err(ClientError::network(
            error.to_string()
          ));
        }
      };

    let status = response.status().as_u16();
    let text =
      response.text().await.map_err(
        |error| {
          ClientError::network(format!(
            "failed reading response \
             body: {error}"
          ))
        }
      )?;

    debug!(status, bytes = text.len(), "received response");
    Ok((status, text))
  }

  async fn send_json<B>(
    &self,
    endpoint: Endpoint,
    body: &B
  ) -> Result<(u16, String), ClientError>
  where
    B: Serialize + ?Sized
  {
    let payload =
      serde_json::to_string(body)
        .map_err(|err| {
          ClientError::validation(format!(
            "failed to encode request: \
             {err}"
          ))
        })?;
    self.send(endpoint, Some(payload)).await
  }
}

impl TaskApi for HttpTaskApi {
  async fn list_tasks(
    &self
  ) -> Result<Vec<Task>, ClientError> {
    let (status, body) = self
      .send(Endpoint::list_tasks(), None)
      .await?;
    decode_data(status, &body)
  }

  async fn get_task(
    &self,
    id: TaskId
  ) -> Result<Task, ClientError> {
    let (status, body) = self
      .send(Endpoint::get_task(id), None)
      .await?;
    decode_data(status, &body)
  }

  async fn list_categories(
    &self
  ) -> Result<Vec<String>, ClientError> {
    let (status, body) = self
      .send(Endpoint::categories(), None)
      .await?;
    decode_data(status, &body)
  }

  async fn stats(
    &self
  ) -> Result<Stats, ClientError> {
    let (status, body) = self
      .send(Endpoint::stats(), None)
      .await?;
    decode_data(status, &body)
  }

  async fn create_task(
    &self,
    create: &TaskCreate
  ) -> Result<Task, ClientError> {
    let (status, body) = self
      .send_json(
        Endpoint::create_task(),
        create
      )
      .await?;
    decode_data(status, &body)
  }

  async fn update_task(
    &self,
    id: TaskId,
    patch: &TaskPatch
  ) -> Result<Task, ClientError> {
    let (status, body) = self
      .send_json(
        Endpoint::update_task(id),
        patch
      )
      .await?;
    decode_data(status, &body)
  }

  async fn delete_task(
    &self,
    id: TaskId
  ) -> Result<(), ClientError> {
    let (status, body) = self
      .send(Endpoint::delete_task(id), None)
      .await?;
    decode_empty(status, &body)
  }
}
