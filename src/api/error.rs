use thiserror::Error;
use wasm_bindgen::JsValue;

/// Failures talking to the backend.
#[derive(Debug, Error)]
pub enum ApiError {
	/// `fetch` rejected or a JS call threw.
	#[error("request failed: {0}")]
	Js(String),
	/// Non-2xx response.
	#[error("HTTP error! status: {0}")]
	Status(u16),
	/// Body was not the expected JSON.
	#[error("invalid response body: {0}")]
	Decode(#[from] serde_json::Error),
	/// Not running in a browser.
	#[error("no browser window available")]
	NoWindow,
	/// Body could not be read as text.
	#[error("response had no text body")]
	EmptyBody,
}

impl ApiError {
	/// Whether retrying the same request can succeed.
	pub fn is_retryable(&self) -> bool {
		match self {
			ApiError::Js(_) => true,
			ApiError::Status(code) => *code >= 500 || *code == 408 || *code == 429,
			ApiError::Decode(_) | ApiError::NoWindow | ApiError::EmptyBody => false,
		}
	}
}

impl From<JsValue> for ApiError {
	fn from(value: JsValue) -> Self {
		let message = value
			.as_string()
			.or_else(|| {
				js_sys::Reflect::get(&value, &JsValue::from_str("message"))
					.ok()
					.and_then(|m| m.as_string())
			})
			.unwrap_or_else(|| format!("{:?}", value));
		ApiError::Js(message)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn server_errors_are_retryable() {
		assert!(ApiError::Status(503).is_retryable());
		assert!(ApiError::Status(429).is_retryable());
		assert!(!ApiError::Status(404).is_retryable());
		assert!(!ApiError::EmptyBody.is_retryable());
	}

	#[test]
	fn decode_errors_convert() {
		let err: ApiError = serde_json::from_str::<u32>("nope").unwrap_err().into();
		assert!(matches!(err, ApiError::Decode(_)));
		assert_eq!(ApiError::Status(500).to_string(), "HTTP error! status: 500");
	}
}
