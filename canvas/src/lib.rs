//! Drawing, measuring and persistence core for the centimeter-scaled canvas.
//!
//! The crate owns everything that does not touch a real display: converting
//! between pixel and centimeter space, the ordered trajectory of drawn points,
//! the draw/ruler input state machine, and the JSON document used to save and
//! restore a drawing. A host (the `trajectory` binary, or any UI) feeds pointer
//! events into [`engine::Session`] and reacts to the [`engine::Action`]s it
//! returns.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`engine`] | Session state and event handlers |
//! | [`doc`] | Trajectory store and validated canvas size |
//! | [`persist`] | JSON document model, serialize/deserialize, text and CAD vertex export |
//! | [`units`] | Points and pixel/centimeter conversion |
//! | [`input`] | Input modes and scripted session events |
//! | [`ruler`] | Two-point distance measurement |
//! | [`consts`] | Shared numeric constants (density, canvas limits) |

pub mod consts;
pub mod doc;
pub mod engine;
pub mod input;
pub mod persist;
pub mod ruler;
pub mod units;
