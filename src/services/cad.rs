//! CAD service — DXF export and import of the trajectory for CNC tooling.
//!
//! DESIGN
//! ======
//! The trajectory is written as one LWPOLYLINE on the `STROKES` layer of an
//! R2010 drawing whose units are millimeters. Y is negated so the drawing is
//! upright in CAD space. Import reads every LWPOLYLINE in entity order and
//! chains their vertices into a single trajectory; other entity kinds are
//! skipped. The unit and axis mapping lives in `canvas::persist`.
//!
//! ERROR HANDLING
//! ==============
//! DXF read and write failures carry the offending path. An empty session is
//! refused before anything is written, and a file with no polyline vertices
//! leaves the session untouched.

use std::path::{Path, PathBuf};

use canvas::doc::DocError;
use canvas::engine::{Action, Session};
use canvas::persist;
use dxf::entities::{Entity, EntityType, LwPolyline};
use dxf::enums::{AcadVersion, Units};
use dxf::tables::Layer;
use dxf::{Color, Drawing, DxfError, LwPolylineVertex};
use tracing::{debug, info};

/// Layer that holds exported trajectories.
pub const STROKES_LAYER: &str = "STROKES";

// =============================================================================
// TYPES
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum CadError {
    #[error("failed to read DXF {}: {source}", .path.display())]
    Read { path: PathBuf, source: DxfError },
    #[error("failed to write DXF {}: {source}", .path.display())]
    Write { path: PathBuf, source: DxfError },
    #[error("no LWPOLYLINE vertices found in {}", .path.display())]
    NoPolyline { path: PathBuf },
    #[error(transparent)]
    Doc(#[from] DocError),
}

// =============================================================================
// EXPORT
// =============================================================================

/// Build the DXF drawing for the session's trajectory.
pub fn to_drawing(session: &Session) -> Result<Drawing, CadError> {
    let vertices = persist::to_cad_vertices(session.trajectory())?;

    let mut drawing = Drawing::new();
    drawing.header.version = AcadVersion::R2010;
    drawing.header.default_drawing_units = Units::Millimeters;
    drawing.add_layer(Layer { name: STROKES_LAYER.to_string(), color: Color::from_index(7), ..Default::default() });

    let polyline = LwPolyline {
        vertices: vertices.into_iter().map(|(x, y)| LwPolylineVertex { x, y, ..Default::default() }).collect(),
        ..Default::default()
    };
    let mut entity = Entity::new(EntityType::LwPolyline(polyline));
    entity.common.layer = STROKES_LAYER.to_string();
    drawing.add_entity(entity);
    Ok(drawing)
}

/// Write the session's trajectory to `path` as DXF.
pub fn export_dxf(session: &Session, path: &Path) -> Result<(), CadError> {
    let drawing = to_drawing(session)?;
    drawing.save_file(path).map_err(|source| CadError::Write { path: path.to_path_buf(), source })?;
    info!(points = session.trajectory().len(), path = %path.display(), "trajectory exported as DXF");
    Ok(())
}

// =============================================================================
// IMPORT
// =============================================================================

/// Chained LWPOLYLINE vertices of `drawing`, in millimeters.
fn polyline_vertices(drawing: &Drawing) -> Vec<(f64, f64)> {
    let mut vertices = Vec::new();
    let mut skipped = 0usize;
    for entity in drawing.entities() {
        match &entity.specific {
            EntityType::LwPolyline(polyline) => vertices.extend(polyline.vertices.iter().map(|v| (v.x, v.y))),
            _ => skipped += 1,
        }
    }
    if skipped > 0 {
        debug!(skipped, "non-polyline DXF entities ignored");
    }
    vertices
}

/// Replace the session's trajectory with the polylines in the DXF file at `path`.
pub fn import_dxf(session: &mut Session, path: &Path) -> Result<Vec<Action>, CadError> {
    let drawing = Drawing::load_file(path).map_err(|source| CadError::Read { path: path.to_path_buf(), source })?;
    let vertices = polyline_vertices(&drawing);
    if vertices.is_empty() {
        return Err(CadError::NoPolyline { path: path.to_path_buf() });
    }

    let trajectory = persist::from_cad_vertices(vertices)?;
    let actions = session.load_trajectory(trajectory);
    info!(points = session.trajectory().len(), path = %path.display(), "trajectory imported from DXF");
    Ok(actions)
}

#[cfg(test)]
#[path = "cad_test.rs"]
mod tests;
