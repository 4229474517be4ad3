//! Render reports: the scene plus run metadata, as JSON or a text summary.

use std::fmt::Write as _;
use std::io::{self, Write};
use std::path::Path;

use serde::Serialize;

use crate::error::{InputError, InputResult};
use crate::geometry::ChipSize;
use crate::render::Scene;

/// Timestamp format used in reports.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Current local time in [`TIMESTAMP_FORMAT`].
#[must_use]
pub fn now_timestamp() -> String {
    chrono::Local::now().format(TIMESTAMP_FORMAT).to_string()
}

/// A rendered scene with the inputs it was produced from.
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    /// Local time the report was generated.
    pub generated_at: String,
    /// Die size used for mapping.
    pub chip_size: Option<ChipSize>,
    /// The rendered scene.
    pub scene: Scene,
}

impl Report {
    /// Wraps a scene, stamping it with the current time.
    #[must_use]
    pub fn new(chip_size: Option<ChipSize>, scene: Scene) -> Self {
        Self {
            generated_at: now_timestamp(),
            chip_size,
            scene,
        }
    }

    /// Writes the report as pretty JSON to `path`, or to stdout when `None`.
    ///
    /// # Errors
    ///
    /// Returns an error if the destination cannot be created or written.
    pub fn write_json(&self, path: Option<&Path>) -> InputResult<()> {
        let target = path.unwrap_or_else(|| Path::new("<stdout>"));
        let write_error = |source: io::Error| InputError::Write {
            path: target.to_path_buf(),
            source,
        };

        let mut writer: Box<dyn Write> = match path {
            Some(p) => Box::new(io::BufWriter::new(
                std::fs::File::create(p).map_err(write_error)?,
            )),
            None => Box::new(io::stdout().lock()),
        };

        serde_json::to_writer_pretty(&mut writer, self)
            .map_err(|e| write_error(io::Error::from(e)))?;
        writeln!(writer).map_err(write_error)?;
        writer.flush().map_err(write_error)
    }

    /// Human-readable summary of the scene and its conflicts.
    #[must_use]
    pub fn summary(&self) -> String {
        let scene = &self.scene;
        let mut out = String::new();

        let _ = writeln!(out, "generated: {}", self.generated_at);
        if let Some(chip) = self.chip_size {
            let _ = writeln!(out, "chip: {} um x {} um", chip.width_um, chip.height_um);
        }
        let _ = writeln!(
            out,
            "pins: {} drawn, {} wired, {} invalid",
            scene.dots.len(),
            scene.connectors.len(),
            scene.invalid_pins.len()
        );
        if scene.two_rings {
            let _ = writeln!(out, "rings: two (scope {})", scene.line_scope);
        } else {
            let _ = writeln!(out, "rings: single (scope locked to {})", scene.line_scope);
        }

        for entry in &scene.invalid_pins {
            let _ = writeln!(out, "  invalid: {entry}");
        }
        for conflict in &scene.corner_conflicts {
            let _ = writeln!(
                out,
                "  corner conflict: {}/{}",
                conflict.labels[0], conflict.labels[1]
            );
        }
        for crossing in &scene.crossings {
            let _ = writeln!(out, "  crossing: {} x {}", crossing.first, crossing.second);
        }

        if scene.has_conflicts() {
            let _ = writeln!(
                out,
                "conflicts: {} wire(s) flagged",
                scene.conflicting_connectors()
            );
        } else {
            let _ = writeln!(out, "conflicts: none");
        }
        out
    }
}
