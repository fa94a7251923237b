//! Client for the release-history backend.

mod error;
mod sequence;

pub use error::ApiError;
pub use sequence::{RequestSequence, Ticket};

use serde::Deserialize;
use serde::de::DeserializeOwned;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Request, RequestInit, RequestMode, Response};

use crate::layout::VisualizationData;

const DEFAULT_BASE_URL: &str = "http://localhost:8080/api";

/// Where the backend lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
	/// Base URL without a trailing slash.
	pub base_url: String,
}

impl Default for ApiConfig {
	fn default() -> Self {
		Self {
			base_url: option_env!("RELEASE_GRAPH_API")
				.unwrap_or(DEFAULT_BASE_URL)
				.trim_end_matches('/')
				.to_string(),
		}
	}
}

/// Body of `GET /health`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct HealthStatus {
	/// `"ok"` when the backend and its store are up.
	pub status: String,
}

impl HealthStatus {
	/// Whether the backend reported `ok`.
	pub fn is_ok(&self) -> bool {
		self.status == "ok"
	}
}

/// Thin `fetch` wrapper over the backend endpoints.
#[derive(Debug, Clone, Default)]
pub struct ApiClient {
	config: ApiConfig,
}

impl ApiClient {
	/// Client for the given backend.
	pub fn new(config: ApiConfig) -> Self {
		Self { config }
	}

	/// Absolute URL of an endpoint path.
	pub fn url(&self, path: &str) -> String {
		format!("{}/{}", self.config.base_url, path.trim_start_matches('/'))
	}

	/// `GET /visualization`.
	pub async fn visualization(&self) -> Result<VisualizationData, ApiError> {
		self.get_json("visualization").await
	}

	/// `GET /health`.
	pub async fn health(&self) -> Result<HealthStatus, ApiError> {
		self.get_json("health").await
	}

	/// Asks the backend to re-collect its data. Only the status matters.
	pub async fn refresh(&self) -> Result<(), ApiError> {
		self.send("POST", "refresh").await.map(|_| ())
	}

	async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
		let body = self.send("GET", path).await?;
		Ok(serde_json::from_str(&body)?)
	}

	async fn send(&self, method: &str, path: &str) -> Result<String, ApiError> {
		let url = self.url(path);
		let result = self.fetch_text(method, &url).await;
		if let Err(err) = &result {
			log::error!("{} {} failed: {}", method, url, err);
		}
		result
	}

	async fn fetch_text(&self, method: &str, url: &str) -> Result<String, ApiError> {
		let init = RequestInit::new();
		init.set_method(method);
		init.set_mode(RequestMode::Cors);
		let request = Request::new_with_str_and_init(url, &init)?;
		request.headers().set("Accept", "application/json")?;

		let window = web_sys::window().ok_or(ApiError::NoWindow)?;
		let response: Response = JsFuture::from(window.fetch_with_request(&request))
			.await?
			.dyn_into()?;
		if !response.ok() {
			return Err(ApiError::Status(response.status()));
		}

		JsFuture::from(response.text()?)
			.await?
			.as_string()
			.ok_or(ApiError::EmptyBody)
	}
}
