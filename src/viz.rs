//! The public render facade.

use crate::engine::{self, ScriptEngine};
use crate::error::VizError;
use crate::script;

/// Renders Graphviz DOT descriptions to SVG markup through an embedded
/// JavaScript engine preloaded with the bundled layout script.
///
/// Exactly one engine instance lives behind each `Viz`, bound to the thread
/// that created it. The type is `!Send`; callers that render in parallel
/// create one instance per thread. Calls are synchronous and blocking, with
/// no internal timeout — a hang in the guest script blocks the caller, so
/// bounded latency has to be enforced externally.
pub struct Viz {
    engine: Option<Box<dyn ScriptEngine>>,
    version: String,
}

impl Viz {
    /// Creates a facade over the first engine that initializes successfully,
    /// trying V8 first and QuickJS as the fallback.
    ///
    /// # Errors
    ///
    /// Returns [`VizError::ScriptResource`] if the bundled script is
    /// unusable, or [`VizError::Initialization`] once every compiled-in
    /// engine has failed to come up.
    pub fn create() -> Result<Self, VizError> {
        let engine = engine::create_engine()?;
        let version = format!(
            "{}, layout script {}",
            engine.identification(),
            script::SCRIPT_VERSION
        );
        tracing::debug!(engine = %version, "engine initialized");
        Ok(Self {
            engine: Some(engine),
            version,
        })
    }

    /// Renders one graph description, returning the SVG markup produced by
    /// the layout script. The request passes through unparsed and is never
    /// mutated; all-or-nothing, no partial output.
    ///
    /// # Errors
    ///
    /// Returns [`VizError::ExecutionWithDiagnostics`] when the script
    /// reported through its output primitive before failing,
    /// [`VizError::ExecutionNoDiagnostics`] when it failed silently,
    /// [`VizError::DiagnosticRead`] if the diagnostic buffer could not be
    /// read after a failure, and [`VizError::Released`] after `release`.
    pub fn execute(&mut self, graph: &str) -> Result<String, VizError> {
        let engine = self.engine.as_mut().ok_or(VizError::Released)?;
        let markup = engine.execute(graph)?;
        tracing::debug!(bytes = markup.len(), "render completed");
        Ok(markup)
    }

    /// Human-readable identification of the active engine and script
    /// version, for diagnostics only. Stable and non-empty for the lifetime
    /// of this instance, including after [`Viz::release`].
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Releases the engine and any native resources behind it. Idempotent;
    /// also runs automatically when the facade goes out of scope, so every
    /// exit path tears the engine down exactly once.
    pub fn release(&mut self) {
        if let Some(mut engine) = self.engine.take() {
            engine.release();
        }
    }
}

impl Drop for Viz {
    fn drop(&mut self) {
        self.release();
    }
}
