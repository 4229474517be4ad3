//! Job files: per-run calibration and outline inputs.
//!
//! A job file is optional JSON that supplies what a pin table cannot:
//!
//! ```json
//! {
//!   "chip_size": { "width_um": 1200, "height_um": 900 },
//!   "anchors": { "min": { "x": 280, "y": 500 }, "max": { "x": 470, "y": 400 } },
//!   "image_rect": { "left": 280, "top": 400, "right": 470, "bottom": 500 },
//!   "outline": { "leads": [ ... ] }
//! }
//! ```
//!
//! Every field is optional. Explicit `anchors` win over `image_rect`; with
//! neither, the image rectangle is derived from the chip size and centred in
//! the outline's inner frame.

use std::path::Path;

use serde::Deserialize;
use tracing::debug;

use crate::config::CalibrationConfig;
use crate::error::{InputError, InputResult};
use crate::geometry::{CalibrationAnchors, ChipSize, Rect};
use crate::package::PackageOutline;

/// Calibration and outline inputs for one render.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Job {
    /// Die size.
    #[serde(default)]
    pub chip_size: Option<ChipSize>,
    /// Explicit calibration anchors.
    #[serde(default)]
    pub anchors: Option<CalibrationAnchors>,
    /// Displayed die image rectangle, before edge offsets.
    #[serde(default)]
    pub image_rect: Option<Rect>,
    /// Custom package outline; the standard outline when absent.
    #[serde(default)]
    pub outline: Option<PackageOutline>,
}

impl Job {
    /// Reads a job file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or does not match the job schema.
    pub fn load(path: &Path) -> InputResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|source| InputError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&contents).map_err(|source| InputError::Json {
            path: path.to_path_buf(),
            source,
        })
    }

    /// The package outline to draw onto.
    #[must_use]
    pub fn outline(&self) -> PackageOutline {
        self.outline.clone().unwrap_or_default()
    }

    /// Resolves the calibration anchors for `chip`.
    ///
    /// Returns `None` when no anchors or image rectangle are given and no
    /// image rectangle can be derived (invalid chip size, or an outline with
    /// an empty side).
    #[must_use]
    pub fn resolve_anchors(
        &self,
        chip: Option<&ChipSize>,
        outline: &PackageOutline,
        calibration: &CalibrationConfig,
    ) -> Option<CalibrationAnchors> {
        if let Some(anchors) = self.anchors {
            debug!("Using explicit calibration anchors");
            return Some(anchors);
        }

        let rect = self.image_rect.or_else(|| {
            let chip = chip.filter(|c| c.is_valid())?;
            let frame = outline.inner_frame()?;
            let (width, height) = chip.pixel_size(calibration.px_per_um_x, calibration.px_per_um_y);
            Some(Rect::centred_in(&frame, width, height))
        })?;

        debug!(
            left = rect.left,
            top = rect.top,
            right = rect.right,
            bottom = rect.bottom,
            "Deriving anchors from image rectangle"
        );
        Some(CalibrationAnchors::from_image_rect(&rect, &calibration.offsets))
    }
}
