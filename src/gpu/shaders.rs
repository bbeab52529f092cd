//! WGSL sources for the line pipelines.
//!
//! The vertex and fragment stages live in separate sources and are validated
//! independently with naga before wgpu ever sees them, so a broken stage is
//! reported by name with a readable diagnostic.

use naga::front::wgsl;
use naga::valid::{Capabilities, ValidationFlags, Validator};

use crate::error::{ShaderError, ShaderStage};

pub const VERTEX_ENTRY: &str = "vs_main";
pub const FRAGMENT_ENTRY: &str = "fs_main";

/// Transforms scaled positions by `projection * model` and forwards the
/// per-vertex color.
pub const VERTEX_SOURCE: &str = r#"
struct Scene {
    projection: mat4x4<f32>,
    model: mat4x4<f32>,
};

struct DrawParams {
    scale: f32,
    _pad0: f32,
    _pad1: f32,
    _pad2: f32,
};

@group(0) @binding(0) var<uniform> scene: Scene;
@group(1) @binding(0) var<uniform> params: DrawParams;

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) color: vec4<f32>,
};

@vertex
fn vs_main(
    @location(0) position: vec3<f32>,
    @location(1) color: vec4<f32>,
) -> VertexOutput {
    var out: VertexOutput;
    out.color = color;
    out.clip_position = scene.projection * scene.model * vec4<f32>(position * params.scale, 1.0);
    return out;
}
"#;

/// Writes the interpolated vertex color unchanged.
pub const FRAGMENT_SOURCE: &str = r#"
@fragment
fn fs_main(@location(0) color: vec4<f32>) -> @location(0) vec4<f32> {
    return color;
}
"#;

/// Parse and validate one stage, checking that it exports `entry` for `stage`.
pub fn validate_stage(source: &str, stage: ShaderStage, entry: &str) -> Result<(), ShaderError> {
    let module = wgsl::parse_str(source).map_err(|err| ShaderError {
        stage,
        message: err.emit_to_string(source),
    })?;

    let mut validator = Validator::new(ValidationFlags::all(), Capabilities::all());
    validator.validate(&module).map_err(|err| ShaderError {
        stage,
        message: format!("{err}"),
    })?;

    let naga_stage = match stage {
        ShaderStage::Vertex => naga::ShaderStage::Vertex,
        ShaderStage::Fragment => naga::ShaderStage::Fragment,
    };
    let found = module
        .entry_points
        .iter()
        .any(|ep| ep.name == entry && ep.stage == naga_stage);
    if !found {
        return Err(ShaderError {
            stage,
            message: format!("missing {stage} entry point `{entry}`"),
        });
    }

    Ok(())
}

/// Validate a vertex + fragment pair, vertex first.
pub fn validate_program(vertex: &str, fragment: &str) -> Result<(), ShaderError> {
    validate_stage(vertex, ShaderStage::Vertex, VERTEX_ENTRY)?;
    validate_stage(fragment, ShaderStage::Fragment, FRAGMENT_ENTRY)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shipped_sources_validate() {
        validate_program(VERTEX_SOURCE, FRAGMENT_SOURCE).unwrap();
    }

    #[test]
    fn test_vertex_syntax_error_names_stage() {
        let err = validate_program("fn vs_main( {", FRAGMENT_SOURCE).unwrap_err();
        assert_eq!(err.stage, ShaderStage::Vertex);
        assert!(!err.message.is_empty());
    }

    #[test]
    fn test_fragment_type_error_names_stage() {
        let broken = "@fragment fn fs_main() -> @location(0) vec4<f32> { return 1.0; }";
        let err = validate_program(VERTEX_SOURCE, broken).unwrap_err();
        assert_eq!(err.stage, ShaderStage::Fragment);
    }

    #[test]
    fn test_missing_entry_point() {
        let err = validate_stage(FRAGMENT_SOURCE, ShaderStage::Vertex, VERTEX_ENTRY).unwrap_err();
        assert_eq!(err.stage, ShaderStage::Vertex);
        assert!(err.message.contains("vs_main"));
    }
}
