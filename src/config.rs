/// Environment-based configuration.

use crate::error::AppError;
use crate::geometry::Size;
use std::path::PathBuf;

const DEFAULT_DISPLAY_SIZE: Size = Size { width: 390.0, height: 844.0 };

#[derive(Clone, Debug)]
pub struct Config {
    pub output_dir: PathBuf,
    /// Working canvas crops are cut from; `None` crops the upright image as-is.
    pub crop_canvas: Option<(u32, u32)>,
    pub display_size: Size,
    pub log_filter: String,
    pub worker_threads: usize,
}

/// The part of [`Config`] the annotation session itself needs.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SessionConfig {
    pub crop_canvas: Option<(u32, u32)>,
}

impl Config {
    pub fn from_env() -> Result<Self, AppError> {
        let crop_canvas = match std::env::var("ANNOTATOR_CROP_CANVAS") {
            Ok(raw) => Some(parse_dimensions(&raw)?),
            Err(_) => None,
        };

        let display_size = match std::env::var("ANNOTATOR_DISPLAY_SIZE") {
            Ok(raw) => {
                let (w, h) = parse_dimensions(&raw)?;
                Size::new(w as f64, h as f64)
            }
            Err(_) => DEFAULT_DISPLAY_SIZE,
        };

        Ok(Self {
            output_dir: std::env::var("ANNOTATOR_OUTPUT_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("./crops")),
            crop_canvas,
            display_size,
            log_filter: std::env::var("ANNOTATOR_LOG")
                .unwrap_or_else(|_| "crop_annotator=info".to_string()),
            worker_threads: std::env::var("ANNOTATOR_WORKERS")
                .ok()
                .and_then(|p| p.parse().ok())
                .filter(|n: &usize| *n > 0)
                .unwrap_or_else(num_cpus::get),
        })
    }

    pub fn session(&self) -> SessionConfig {
        SessionConfig {
            crop_canvas: self.crop_canvas,
        }
    }
}

/// Parse `WIDTHxHEIGHT` into positive pixel dimensions.
pub fn parse_dimensions(raw: &str) -> Result<(u32, u32), AppError> {
    let (w, h) = raw
        .trim()
        .split_once(['x', 'X'])
        .ok_or_else(|| AppError::Config(format!("Expected WIDTHxHEIGHT, got {raw:?}")))?;

    let parse = |s: &str| {
        s.trim()
            .parse::<u32>()
            .ok()
            .filter(|v| *v > 0)
            .ok_or_else(|| AppError::Config(format!("Invalid dimension {s:?} in {raw:?}")))
    };

    Ok((parse(w)?, parse(h)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_dimensions() {
        assert_eq!(parse_dimensions("384x640").unwrap(), (384, 640));
        assert_eq!(parse_dimensions(" 10X20 ").unwrap(), (10, 20));
    }

    #[test]
    fn rejects_malformed_dimensions() {
        assert!(matches!(parse_dimensions("384"), Err(AppError::Config(_))));
        assert!(matches!(parse_dimensions("0x10"), Err(AppError::Config(_))));
        assert!(matches!(parse_dimensions("ax10"), Err(AppError::Config(_))));
    }
}
