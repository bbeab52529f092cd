//! Error types.
//!
//! Shader compilation is the only hard failure once the window is up. Invalid
//! per-frame parameter input is never an error (see [`crate::host`]).

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// Pipeline stage a shader belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

impl fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShaderStage::Vertex => f.write_str("vertex"),
            ShaderStage::Fragment => f.write_str("fragment"),
        }
    }
}

/// A shader stage failed to compile.
#[derive(Debug, Clone, Error)]
#[error("{stage} shader failed to compile: {message}")]
pub struct ShaderError {
    pub stage: ShaderStage,
    /// Compiler diagnostic.
    pub message: String,
}

/// Errors that can occur during GPU initialization.
#[derive(Debug, Error)]
pub enum GpuError {
    #[error("Failed to create GPU surface: {0}")]
    SurfaceCreation(#[from] wgpu::CreateSurfaceError),

    #[error("No compatible GPU adapter found. Ensure your system has a GPU with WebGPU/Vulkan/Metal/DX12 support.")]
    NoAdapter,

    #[error("Failed to create GPU device: {0}")]
    DeviceCreation(#[from] wgpu::RequestDeviceError),

    #[error("The surface reports no supported texture formats for this adapter")]
    IncompatibleSurface,

    #[error(transparent)]
    Shader(#[from] ShaderError),
}

/// Errors loading a configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Errors that end the viewer.
#[derive(Debug, Error)]
pub enum ViewerError {
    #[error("Failed to create event loop: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),

    #[error("Failed to create window: {0}")]
    Window(#[from] winit::error::OsError),

    #[error("GPU error: {0}")]
    Gpu(#[from] GpuError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shader_error_names_stage() {
        let err = ShaderError {
            stage: ShaderStage::Fragment,
            message: "expected `;`".to_string(),
        };
        assert_eq!(err.to_string(), "fragment shader failed to compile: expected `;`");
    }

    #[test]
    fn test_shader_error_passes_through_gpu_error() {
        let err = GpuError::from(ShaderError {
            stage: ShaderStage::Vertex,
            message: "bad".to_string(),
        });
        assert_eq!(err.to_string(), "vertex shader failed to compile: bad");
    }
}
