//! Error taxonomy for engine construction and render execution.

/// Failures surfaced by [`crate::Viz`].
///
/// Every failure path yields exactly one of these kinds; no error is retried
/// internally and no partial render output is ever returned.
#[derive(Debug, thiserror::Error)]
pub enum VizError {
    /// No JavaScript engine could be constructed, or the capture hook or
    /// layout script failed to evaluate. Fatal; retrying will not help.
    #[error("engine initialization failed: {reason}")]
    Initialization {
        /// Why every backend attempt failed.
        reason: String,
    },

    /// The layout script reported one or more diagnostics through its output
    /// primitive before aborting. The diagnostics are the primary message,
    /// newline-joined in emission order.
    #[error("{diagnostics}")]
    ExecutionWithDiagnostics {
        /// Joined diagnostic lines captured during this call.
        diagnostics: String,
        /// The underlying guest-runtime failure.
        cause: String,
    },

    /// The guest runtime failed without emitting any diagnostics.
    #[error("layout script execution failed in {engine}: {cause}")]
    ExecutionNoDiagnostics {
        /// Identification string of the active engine.
        engine: String,
        /// The underlying guest-runtime failure.
        cause: String,
    },

    /// Reading the diagnostic buffer itself failed after a primary execution
    /// failure.
    #[error("could not read diagnostics from {engine}: {reason}")]
    DiagnosticRead {
        /// Identification string of the active engine.
        engine: String,
        /// Why the buffer could not be read.
        reason: String,
    },

    /// The bundled layout script resource is unusable.
    #[error("bundled layout script unusable: {reason}")]
    ScriptResource {
        /// What the sanity check found.
        reason: String,
    },

    /// The facade was used after `release()`.
    #[error("engine already released")]
    Released,
}
