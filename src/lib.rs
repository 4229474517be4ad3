//! bondpad-mapper: bond-pad to package-lead mapping with wire conflict checks
//!
//! This library takes a table of die bond-pad coordinates, maps them onto a
//! scaled package diagram, and works out how each pad is wired to its lead.
//!
//! # Architecture
//!
//! The core is a pure, synchronous transform. Every render recomputes the
//! scene from its inputs:
//!
//! - **Mapping**: die micrometres to display space via two calibration anchors
//! - **Side classification**: nearest edge of the pin cloud's bounding box
//! - **Ring detection**: single or dual concentric pad rows, per-pin inner/outer
//! - **Styling**: ring-aware colours, dot radius and wire width
//! - **Conflicts**: crossing wires and over-subscribed package corners
//!
//! File formats (CSV pin tables, JSON job and config files) live at the edges
//! and are the only places errors can occur.
//!
//! # Modules
//!
//! - [`config`]: Configuration loading and validation
//! - [`error`]: Error types
//! - [`geometry`]: Points, rectangles, segment intersection, coordinate mapping
//! - [`layout`]: Side and ring classification
//! - [`package`]: Lead label boxes and the standard outline
//! - [`pins`]: Pin records and CSV pin tables
//! - [`render`]: Scene assembly, styling and conflict detection
//! - [`job`]: Per-run calibration inputs
//! - [`report`]: JSON and text output

pub mod config;
pub mod error;
pub mod geometry;
pub mod job;
pub mod layout;
pub mod package;
pub mod pins;
pub mod render;
pub mod report;
