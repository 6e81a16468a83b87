//! Host-side services around a canvas session: JSON and text persistence,
//! DXF export for CAD tools, and scripted event replay.

pub mod cad;
pub mod persistence;
pub mod replay;
