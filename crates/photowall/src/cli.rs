use std::path::PathBuf;

use clap::Parser;
use renderer::{DistortionMode, GeometryKind, RenderPolicy};

#[derive(Parser, Debug)]
#[command(
    name = "photowall",
    author,
    version,
    about = "Animated GPU photo wall"
)]
pub struct Cli {
    /// Path to the gallery manifest TOML file.
    #[arg(value_name = "MANIFEST")]
    pub manifest: PathBuf,

    /// Vertex shader: inline GLSL, a file path, or an http(s) URL.
    #[arg(long, value_name = "SOURCE")]
    pub vertex: Option<String>,

    /// Fragment shader, same forms as `--vertex`.
    #[arg(long, value_name = "SOURCE")]
    pub fragment: Option<String>,

    /// Initial window size (e.g. `1280x720`).
    #[arg(long, value_name = "WIDTHxHEIGHT", value_parser = parse_size, default_value = "1920x1080")]
    pub size: (u32, u32),

    /// Draw primitive: `quad` or `strip:N` for an N-index triangle strip.
    #[arg(long, value_name = "SHAPE", value_parser = parse_geometry, default_value = "quad")]
    pub geometry: GeometryKind,

    /// Pointer distortion: `pointer` (keystone skew) or `depth` (perspective).
    #[arg(long, value_name = "MODE", value_parser = parse_distortion, default_value = "depth")]
    pub distortion: DistortionMode,

    /// Frame scheduling: `continuous` or `reactive` (redraw on input only).
    #[arg(long, value_name = "POLICY", value_parser = parse_policy, default_value = "continuous")]
    pub policy: RenderPolicy,
}

pub fn parse() -> Cli {
    Cli::parse()
}

fn parse_size(value: &str) -> Result<(u32, u32), String> {
    let (width, height) = value
        .split_once(['x', 'X'])
        .ok_or_else(|| format!("expected WIDTHxHEIGHT, got '{value}'"))?;
    let width: u32 = width
        .trim()
        .parse()
        .map_err(|_| format!("invalid width '{width}'"))?;
    let height: u32 = height
        .trim()
        .parse()
        .map_err(|_| format!("invalid height '{height}'"))?;
    if width == 0 || height == 0 {
        return Err("size dimensions must be non-zero".to_string());
    }
    Ok((width, height))
}

fn parse_geometry(value: &str) -> Result<GeometryKind, String> {
    let trimmed = value.trim();
    if trimmed.eq_ignore_ascii_case("quad") {
        return Ok(GeometryKind::Quad);
    }
    if let Some(count) = trimmed.strip_prefix("strip:") {
        let indices: u32 = count
            .parse()
            .map_err(|_| format!("invalid strip index count '{count}'"))?;
        if indices == 0 {
            return Err("strip index count must be non-zero".to_string());
        }
        return Ok(GeometryKind::Strip { indices });
    }
    Err(format!("expected 'quad' or 'strip:N', got '{value}'"))
}

fn parse_distortion(value: &str) -> Result<DistortionMode, String> {
    match value.trim().to_ascii_lowercase().as_str() {
        "pointer" | "skew" => Ok(DistortionMode::PointerSkew),
        "depth" => Ok(DistortionMode::Depth),
        other => Err(format!("expected 'pointer' or 'depth', got '{other}'")),
    }
}

fn parse_policy(value: &str) -> Result<RenderPolicy, String> {
    match value.trim().to_ascii_lowercase().as_str() {
        "continuous" => Ok(RenderPolicy::Continuous),
        "reactive" => Ok(RenderPolicy::Reactive),
        other => Err(format!("expected 'continuous' or 'reactive', got '{other}'")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_sizes() {
        assert_eq!(parse_size("1280x720"), Ok((1280, 720)));
        assert_eq!(parse_size("800X600"), Ok((800, 600)));
        assert!(parse_size("1280").is_err());
        assert!(parse_size("0x600").is_err());
    }

    #[test]
    fn parses_geometry() {
        assert_eq!(parse_geometry("quad"), Ok(GeometryKind::Quad));
        assert_eq!(
            parse_geometry("strip:100"),
            Ok(GeometryKind::Strip { indices: 100 })
        );
        assert!(parse_geometry("strip:0").is_err());
        assert!(parse_geometry("fan").is_err());
    }

    #[test]
    fn parses_distortion_and_policy() {
        assert_eq!(parse_distortion("pointer"), Ok(DistortionMode::PointerSkew));
        assert_eq!(parse_distortion("Depth"), Ok(DistortionMode::Depth));
        assert!(parse_distortion("none").is_err());
        assert_eq!(parse_policy("reactive"), Ok(RenderPolicy::Reactive));
        assert!(parse_policy("on-demand").is_err());
    }
}
