//! Error type shared by the render loop and its host bindings.

/// Error returned by fallible rendering, viewport and collaborator calls.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RenderError {
    /// No global `window` (not running in a browser page).
    #[error("browser window unavailable")]
    WindowUnavailable,
    /// The canvas element did not yield a 2D rendering context.
    #[error("2d rendering context unavailable")]
    ContextUnavailable,
    /// A canvas call was rejected by the host (e.g. a negative arc radius).
    #[error("canvas call failed: {0}")]
    Canvas(String),
    /// The simulation collaborator raised during `step`, `world` or `train`.
    #[error("simulation failed: {0}")]
    Simulation(String),
    /// The value returned by `world()` is not a valid snapshot.
    #[error("invalid world snapshot: {0}")]
    Snapshot(String),
    /// The host refused to schedule the next frame.
    #[error("failed to schedule frame: {0}")]
    Schedule(String),
    /// The render loop is already borrowed, e.g. a call re-entered from inside a frame.
    #[error("render loop is busy")]
    Busy,
    /// Render options passed by the host are unusable.
    #[error("invalid render options: {0}")]
    Options(String),
}
