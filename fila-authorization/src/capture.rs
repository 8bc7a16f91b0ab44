use async_trait::async_trait;

use crate::artifact::RawArtifact;

/// Runtime capability probe deciding which capture strategy to offer.
pub trait DeviceProbe: Send + Sync {
    fn is_mobile(&self) -> bool;
}

/// User-agent sniffing, the same heuristic the browser shell uses.
pub struct UserAgentProbe {
    user_agent: String,
}

impl UserAgentProbe {
    pub fn new(user_agent: impl Into<String>) -> Self {
        Self {
            user_agent: user_agent.into(),
        }
    }
}

impl DeviceProbe for UserAgentProbe {
    fn is_mobile(&self) -> bool {
        ["Android", "iPhone", "iPad", "iPod", "Mobile"]
            .iter()
            .any(|marker| self.user_agent.contains(marker))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CaptureError {
    #[error("Captura cancelada")]
    Cancelled,

    #[error("No se pudo acceder a la cámara: {0}")]
    CameraUnavailable(String),

    #[error("No hay imagen disponible para capturar")]
    NoFrame,
}

/// A way of obtaining the signed authorization artifact. Every strategy
/// hands back a `RawArtifact`; validation and attachment happen downstream
/// on the single shared accept path.
#[async_trait]
pub trait ArtifactSource: Send + Sync {
    async fn acquire(&self) -> Result<RawArtifact, CaptureError>;
}

/// Hint forwarded to the platform file picker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureHint {
    /// Prefer the environment-facing camera.
    Environment,
    /// Plain file selection.
    None,
}

#[async_trait]
pub trait FilePicker: Send + Sync {
    async fn pick(&self, hint: CaptureHint) -> Result<RawArtifact, CaptureError>;
}

/// Mobile strategy: delegate to the device's native capture affordance via
/// a file input carrying the environment-camera hint.
pub struct NativeCaptureIntent<P: FilePicker> {
    picker: P,
}

impl<P: FilePicker> NativeCaptureIntent<P> {
    pub fn new(picker: P) -> Self {
        Self { picker }
    }
}

#[async_trait]
impl<P: FilePicker> ArtifactSource for NativeCaptureIntent<P> {
    async fn acquire(&self) -> Result<RawArtifact, CaptureError> {
        self.picker.pick(CaptureHint::Environment).await
    }
}

/// A live camera stream. `stop_all_tracks` must be safe to call more than
/// once.
pub trait CameraStream: Send {
    /// Snapshot of the current video frame as an encoded JPEG still.
    fn current_frame(&mut self) -> Option<Vec<u8>>;
    fn stop_all_tracks(&mut self);
}

pub trait CameraOpener: Send + Sync {
    type Stream: CameraStream;
    fn open(&self) -> Result<Self::Stream, CaptureError>;
}

/// Scoped ownership of a camera stream: acquired on open, and the tracks
/// are stopped on every exit path, including drop during an early return
/// or a navigation-away teardown.
pub struct CameraStreamGuard<S: CameraStream> {
    stream: Option<S>,
}

impl<S: CameraStream> CameraStreamGuard<S> {
    pub fn new(stream: S) -> Self {
        Self {
            stream: Some(stream),
        }
    }

    /// Freeze the current frame into a still image artifact.
    pub fn snapshot(&mut self) -> Result<RawArtifact, CaptureError> {
        let stream = self.stream.as_mut().ok_or(CaptureError::Cancelled)?;
        let bytes = stream.current_frame().ok_or(CaptureError::NoFrame)?;
        Ok(RawArtifact {
            file_name: "captura_autorizacion.jpg".to_string(),
            mime_type: "image/jpeg".to_string(),
            bytes,
        })
    }

    /// Explicit release, for the user-cancel path.
    pub fn release(mut self) {
        if let Some(mut stream) = self.stream.take() {
            stream.stop_all_tracks();
        }
    }
}

impl<S: CameraStream> Drop for CameraStreamGuard<S> {
    fn drop(&mut self) {
        if let Some(mut stream) = self.stream.take() {
            stream.stop_all_tracks();
        }
    }
}

/// Desktop strategy: in-page preview with an explicit manual capture that
/// snapshots the live frame. The guard guarantees the stream is released
/// whether the snapshot succeeds or not.
pub struct CameraPreviewCapture<O: CameraOpener> {
    opener: O,
}

impl<O: CameraOpener> CameraPreviewCapture<O> {
    pub fn new(opener: O) -> Self {
        Self { opener }
    }
}

#[async_trait]
impl<O: CameraOpener> ArtifactSource for CameraPreviewCapture<O> {
    async fn acquire(&self) -> Result<RawArtifact, CaptureError> {
        let stream = match self.opener.open() {
            Ok(stream) => stream,
            Err(err) => {
                // Permission failures are logged, never shown to the user
                tracing::warn!(error = %err, "camera stream could not be opened");
                return Err(err);
            }
        };
        let mut guard = CameraStreamGuard::new(stream);
        guard.snapshot()
        // guard drops here: tracks stop on success and failure alike
    }
}

/// Pick the capture strategy for the current device.
pub fn select_source<'a>(
    probe: &dyn DeviceProbe,
    native: &'a dyn ArtifactSource,
    preview: &'a dyn ArtifactSource,
) -> &'a dyn ArtifactSource {
    if probe.is_mobile() {
        native
    } else {
        preview
    }
}
