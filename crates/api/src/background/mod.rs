//! Background tasks: scheduled refresh and retention sweeps.
//!
//! Each task runs on a tokio interval and stops promptly when its
//! [`tokio_util::sync::CancellationToken`] is triggered during
//! graceful shutdown.

pub mod refresh;
pub mod retention;
