//! Renderer subsystem error handling
//!
//! Helpers that turn wgpu and winit failures into `EngineError` so setup
//! code can use `?` instead of unwrapping.

use crate::error::{EngineError, EngineResult};

/// Type alias for renderer operation results
pub type RendererResult<T> = EngineResult<T>;

/// Helper trait for renderer error contexts
pub trait RendererErrorContext<T> {
    fn renderer_context(self, context: &str) -> RendererResult<T>;
}

impl<T, E> RendererErrorContext<T> for Result<T, E>
where
    E: std::fmt::Display,
{
    fn renderer_context(self, context: &str) -> RendererResult<T> {
        self.map_err(|e| EngineError::SystemError {
            component: "renderer".to_string(),
            error: format!("{}: {}", context, e),
        })
    }
}

/// Create a GPU operation error
pub fn gpu_operation_error(operation: &str, error: impl std::fmt::Display) -> EngineError {
    EngineError::GpuOperationFailed {
        operation: operation.to_string(),
        error: error.to_string(),
    }
}
