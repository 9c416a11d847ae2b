// Library root
// -----------
// This crate exposes a small library surface for the CLI. The binary
// (`main.rs`) uses these modules to send a recording to the emotion
// prediction service and show what it answered.
//
// Module responsibilities:
// - `config`: endpoint settings (defaults, config file, env, flags).
// - `asset`: the chosen file and its media type gate.
// - `api`: HTTP interaction with the prediction service.
// - `glyph`, `render`: turning results and failures into panels.
// - `session`: the per-submission state machine.
// - `ui`: the interactive terminal flows.
pub mod api;
pub mod asset;
pub mod config;
pub mod error;
pub mod glyph;
pub mod logging;
pub mod render;
pub mod session;
pub mod ui;
