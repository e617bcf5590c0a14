//! Image resolver: maps CMS image references to CDN URLs.
//!
//! Asset references have the form `image-<assetId>-<width>x<height>-<format>`.
//! The resolver is pure: identical inputs always yield the identical URL.

use std::fmt::Write;

use serde::{Deserialize, Serialize};

pub const DEFAULT_QUALITY: u8 = 75;
const CDN_BASE: &str = "https://cdn.sanity.io/images";
const BLUR_PLACEHOLDER_WIDTH: u32 = 20;
const BLUR_PLACEHOLDER_STRENGTH: u32 = 50;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ImageError {
    #[error("malformed image asset reference: {0:?}")]
    MalformedRef(String),
}

impl crate::error::ErrorCode for ImageError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::MalformedRef(_) => "E_IMAGE_REF",
        }
    }
}

// =============================================================================
// IMAGE SOURCE
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetRef {
    #[serde(rename = "_ref")]
    pub reference: String,
}

/// Crop insets as fractions of the original dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ImageCrop {
    pub top: f64,
    pub bottom: f64,
    pub left: f64,
    pub right: f64,
}

/// Opaque image reference as stored on a document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageSource {
    pub asset: AssetRef,
    #[serde(default)]
    pub crop: Option<ImageCrop>,
    #[serde(default)]
    pub alt: Option<String>,
}

impl ImageSource {
    #[must_use]
    pub fn from_ref(reference: impl Into<String>) -> Self {
        Self { asset: AssetRef { reference: reference.into() }, crop: None, alt: None }
    }
}

// =============================================================================
// OPTIONS
// =============================================================================

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImageOptions {
    pub width: Option<u32>,
    pub height: Option<u32>,
    /// 1..=100, out-of-range values are clamped. Defaults to [`DEFAULT_QUALITY`].
    pub quality: Option<u8>,
    pub auto_format: bool,
    pub blur: Option<u32>,
}

impl ImageOptions {
    #[must_use]
    pub fn width(width: u32) -> Self {
        Self { width: Some(width), ..Self::default() }
    }

    #[must_use]
    pub fn with_height(mut self, height: u32) -> Self {
        self.height = Some(height);
        self
    }

    #[must_use]
    pub fn with_quality(mut self, quality: u8) -> Self {
        self.quality = Some(quality);
        self
    }

    #[must_use]
    pub fn with_auto_format(mut self) -> Self {
        self.auto_format = true;
        self
    }

    #[must_use]
    pub fn with_blur(mut self, blur: u32) -> Self {
        self.blur = Some(blur);
        self
    }

    fn effective_quality(&self) -> u8 {
        self.quality.unwrap_or(DEFAULT_QUALITY).clamp(1, 100)
    }
}

// =============================================================================
// ASSET PARSING
// =============================================================================

#[derive(Debug, PartialEq, Eq)]
struct ParsedAsset<'a> {
    id: &'a str,
    width: u32,
    height: u32,
    format: &'a str,
}

fn parse_asset_ref(reference: &str) -> Result<ParsedAsset<'_>, ImageError> {
    let malformed = || ImageError::MalformedRef(reference.to_owned());

    let rest = reference.strip_prefix("image-").ok_or_else(malformed)?;
    let (rest, format) = rest.rsplit_once('-').ok_or_else(malformed)?;
    let (id, dims) = rest.rsplit_once('-').ok_or_else(malformed)?;
    let (w, h) = dims.split_once('x').ok_or_else(malformed)?;
    let width = w.parse::<u32>().map_err(|_| malformed())?;
    let height = h.parse::<u32>().map_err(|_| malformed())?;

    if id.is_empty() || format.is_empty() || width == 0 || height == 0 {
        return Err(malformed());
    }
    Ok(ParsedAsset { id, width, height, format })
}

/// Pixel rectangle `(left, top, width, height)` for a crop, if it trims anything.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn crop_rect(crop: &ImageCrop, width: u32, height: u32) -> Option<(u32, u32, u32, u32)> {
    let (w, h) = (f64::from(width), f64::from(height));
    let left = (crop.left.clamp(0.0, 1.0) * w).round();
    let top = (crop.top.clamp(0.0, 1.0) * h).round();
    let rect_w = (w - crop.right.clamp(0.0, 1.0) * w - left).round();
    let rect_h = (h - crop.bottom.clamp(0.0, 1.0) * h - top).round();

    if rect_w <= 0.0 || rect_h <= 0.0 {
        return None;
    }
    let rect = (left as u32, top as u32, rect_w as u32, rect_h as u32);
    if rect == (0, 0, width, height) { None } else { Some(rect) }
}

// =============================================================================
// RESOLVER
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageResolver {
    project_id: String,
    dataset: String,
}

impl ImageResolver {
    #[must_use]
    pub fn new(project_id: impl Into<String>, dataset: impl Into<String>) -> Self {
        Self { project_id: project_id.into(), dataset: dataset.into() }
    }

    /// Build the CDN URL for `source` with the requested transform.
    ///
    /// # Errors
    ///
    /// Returns [`ImageError::MalformedRef`] if the asset reference cannot be parsed.
    pub fn resolve(&self, source: &ImageSource, options: &ImageOptions) -> Result<String, ImageError> {
        let asset = parse_asset_ref(&source.asset.reference)?;

        let mut url = format!(
            "{CDN_BASE}/{}/{}/{}-{}x{}.{}",
            self.project_id, self.dataset, asset.id, asset.width, asset.height, asset.format
        );

        let mut params: Vec<String> = Vec::new();
        if let Some((left, top, w, h)) = source
            .crop
            .as_ref()
            .and_then(|c| crop_rect(c, asset.width, asset.height))
        {
            params.push(format!("rect={left},{top},{w},{h}"));
        }
        if let Some(w) = options.width {
            params.push(format!("w={w}"));
        }
        if let Some(h) = options.height {
            params.push(format!("h={h}"));
        }
        if let Some(blur) = options.blur {
            params.push(format!("blur={blur}"));
        }
        params.push(format!("q={}", options.effective_quality()));
        if options.auto_format {
            params.push("auto=format".to_owned());
        }

        let _ = write!(url, "?{}", params.join("&"));
        Ok(url)
    }

    /// Responsive image at `width`.
    ///
    /// # Errors
    ///
    /// See [`ImageResolver::resolve`].
    pub fn image_url(&self, source: &ImageSource, width: u32, quality: u8) -> Result<String, ImageError> {
        self.resolve(source, &ImageOptions::width(width).with_quality(quality))
    }

    /// Image cropped to `width` x `height`.
    ///
    /// # Errors
    ///
    /// See [`ImageResolver::resolve`].
    pub fn cropped_image_url(
        &self,
        source: &ImageSource,
        width: u32,
        height: u32,
        quality: u8,
    ) -> Result<String, ImageError> {
        self.resolve(source, &ImageOptions::width(width).with_height(height).with_quality(quality))
    }

    /// Image at `width` with automatic format negotiation.
    ///
    /// # Errors
    ///
    /// See [`ImageResolver::resolve`].
    pub fn optimized_image_url(&self, source: &ImageSource, width: u32, quality: u8) -> Result<String, ImageError> {
        self.resolve(source, &ImageOptions::width(width).with_quality(quality).with_auto_format())
    }

    /// Tiny blurred rendition used as a loading placeholder.
    ///
    /// # Errors
    ///
    /// See [`ImageResolver::resolve`].
    pub fn blur_placeholder(&self, source: &ImageSource) -> Result<String, ImageError> {
        self.resolve(source, &ImageOptions::width(BLUR_PLACEHOLDER_WIDTH).with_blur(BLUR_PLACEHOLDER_STRENGTH))
    }
}

#[cfg(test)]
#[path = "image_test.rs"]
mod tests;
