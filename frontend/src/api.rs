use serde::de::DeserializeOwned;
use thiserror::Error;
use todo_shared::{CreateTodoRequest, ErrorBody, Todo, UpdateTodoRequest};
use uuid::Uuid;
use wasm_bindgen::JsValue;
use wasm_bindgen_futures::JsFuture;
use web_sys::{console, Request, RequestInit, Response};

/// Origin of the API; empty means the page's own origin.
const API_BASE_URL: &str = match option_env!("TODO_API_URL") {
    Some(url) => url,
    None => "",
};

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("network error: {0}")]
    Network(String),
    /// The server answered with a non-2xx status; `message` is its `error` field.
    #[error("{message}")]
    Status { status: u16, message: String },
    #[error("unexpected response: {0}")]
    Decode(#[from] serde_json::Error),
}

fn js_error(context: &str, value: JsValue) -> ClientError {
    ClientError::Network(format!("{context}: {value:?}"))
}

async fn send(method: &str, path: &str, body: Option<String>) -> Result<String, ClientError> {
    let opts = RequestInit::new();
    opts.set_method(method);
    if let Some(body) = &body {
        opts.set_body(&JsValue::from_str(body));
    }

    let url = format!("{API_BASE_URL}{path}");
    let request = Request::new_with_str_and_init(&url, &opts)
        .map_err(|e| js_error("failed to create request", e))?;
    if body.is_some() {
        request
            .headers()
            .set("Content-Type", "application/json")
            .map_err(|e| js_error("failed to set header", e))?;
    }

    let window = web_sys::window().ok_or_else(|| ClientError::Network("no window".to_string()))?;
    let response: Response = JsFuture::from(window.fetch_with_request(&request))
        .await
        .map_err(|e| js_error("failed to send request", e))?
        .into();

    let text_promise = response
        .text()
        .map_err(|e| js_error("failed to read response", e))?;
    let text = JsFuture::from(text_promise)
        .await
        .map_err(|e| js_error("failed to read response", e))?
        .as_string()
        .unwrap_or_default();

    if !response.ok() {
        let status = response.status();
        let message = serde_json::from_str::<ErrorBody>(&text)
            .map(|body| body.error)
            .unwrap_or_else(|_| format!("request failed with status {status}"));
        console::warn_1(&format!("{method} {path} -> {status}: {message}").into());
        return Err(ClientError::Status { status, message });
    }

    Ok(text)
}

async fn send_json<T: DeserializeOwned>(
    method: &str,
    path: &str,
    body: Option<String>,
) -> Result<T, ClientError> {
    let text = send(method, path, body).await?;
    Ok(serde_json::from_str(&text)?)
}

pub async fn fetch_todos() -> Result<Vec<Todo>, ClientError> {
    send_json("GET", "/api/todos", None).await
}

pub async fn create_todo(request: &CreateTodoRequest) -> Result<Todo, ClientError> {
    let body = serde_json::to_string(request)?;
    send_json("POST", "/api/todos", Some(body)).await
}

/// Sends only the fields set in `request`; the rest stay as stored.
pub async fn update_todo(id: Uuid, request: &UpdateTodoRequest) -> Result<Todo, ClientError> {
    let body = serde_json::to_string(request)?;
    send_json("PUT", &format!("/api/todos/{id}"), Some(body)).await
}

pub async fn delete_todo(id: Uuid) -> Result<(), ClientError> {
    send("DELETE", &format!("/api/todos/{id}"), None).await?;
    Ok(())
}
