//! Camera frame types and capture sources.

pub mod frame;
pub mod source;

pub use frame::Frame;
pub use source::{CameraSource, FramePhase, MockCameraSource, SyntheticCamera};
