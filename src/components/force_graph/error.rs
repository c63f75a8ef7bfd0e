//! Failures of the drawing host.
//!
//! None of these are fatal: the coordinator logs them and falls back to a
//! degraded state (deferred mount, skipped paint).

use thiserror::Error;
use wasm_bindgen::JsValue;

/// Errors raised by a [`super::surface::SurfaceHost`].
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SurfaceError {
	/// The container element is missing or not attached yet.
	#[error("graph container is not available")]
	ContainerUnavailable,

	/// The canvas refused to hand out a 2D context.
	#[error("2d canvas context is not available")]
	ContextUnavailable,

	/// A DOM call threw.
	#[error("DOM error: {0}")]
	Dom(String),
}

impl From<JsValue> for SurfaceError {
	fn from(value: JsValue) -> Self {
		SurfaceError::Dom(value.as_string().unwrap_or_else(|| format!("{value:?}")))
	}
}

pub type SurfaceResult<T> = Result<T, SurfaceError>;
