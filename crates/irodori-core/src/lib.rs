//! irodori-core: frame-budgeted color-space scatter (sans-IO).
//!
//! Maps each distinct quantized color of an image to a positioned,
//! scaled representor in 3D RGB space: position encodes the channel
//! values, scale encodes how often the color occurs. Processing is
//! cooperative — the host's frame loop drives a [`ColorScene`] one
//! [`tick`](scene::ColorScene::tick) at a time, and both the pixel scan
//! and the teardown suspend themselves to keep per-frame work bounded.
//!
//! This crate has **no I/O dependencies** — it operates on in-memory
//! images and notifies in-process observers. File and terminal
//! interaction lives in the `irodori` CLI; export serialization in
//! `irodori-export`.

pub mod cleanup;
pub mod clock;
pub mod decode;
pub mod events;
pub mod pool;
pub mod registry;
pub mod scan;
pub mod scene;
pub mod types;

pub use clock::{Clock, FrameClock};
pub use decode::decode_rgba;
pub use events::{SceneObserver, SubscriberId};
pub use pool::{Representor, RepresentorId, RepresentorPool, RetireMode};
pub use registry::ColorRegistry;
pub use scene::{ColorScene, TickOutcome};
pub use types::{
    ColorKey, Placement, RepeatPolicy, RepresentorPrototype, RgbaImage, ScanSummary, SceneConfig,
    SceneError, Vec3,
};
