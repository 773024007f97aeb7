//! Embedded JavaScript engines hosting the layout script.
//!
//! Each backend binds the same narrow contract to a different embedding
//! technology: a V8 isolate via `deno_core` and a QuickJS context via
//! `rquickjs`. The guest runtime's own object model never crosses this
//! boundary; requests and results are plain text.

#[cfg(feature = "quickjs")]
pub(crate) mod quickjs;
#[cfg(feature = "v8")]
pub(crate) mod v8;

use crate::error::VizError;
use crate::script;

/// Declares the diagnostic buffer and rebinds the script's `print` primitive
/// to append into it. Must be evaluated strictly before the layout script,
/// which may emit diagnostics during its own initialization.
pub(crate) const CAPTURE_HOOK: &str =
    "globalThis.messages = []; globalThis.print = function (line) { messages.push(String(line)); };";

/// Empties the diagnostic buffer. Run at the start of every execute call so
/// captured messages are only ever attributable to the most recent run.
pub(crate) const RESET_DIAGNOSTICS: &str = "messages.length = 0;";

/// Joins the buffered diagnostics in emission order. Only evaluated after a
/// primary failure; the common case is success and never pays for the read.
pub(crate) const READ_DIAGNOSTICS: &str = "messages.join(\"\\n\")";

/// The operation set every engine binding implements.
///
/// Initialization is each implementation's constructor: a constructor that
/// fails leaves nothing behind to release. Engines have thread affinity, not
/// thread safety; the concrete types are `!Send`, so the compiler enforces
/// single-thread use.
pub(crate) trait ScriptEngine {
    /// Clears the diagnostic buffer, invokes the script's entry function
    /// with `request` as its sole argument and returns the result coerced
    /// to text.
    fn execute(&mut self, request: &str) -> Result<String, VizError>;

    /// Human-readable description of the engine and runtime version. Never
    /// parsed by callers; stays valid after `release`.
    fn identification(&self) -> String;

    /// Frees the guest context and any native resources behind it.
    /// Idempotent; a no-op once the engine has been torn down.
    fn release(&mut self);
}

/// Constructs the first engine that initializes successfully, in fixed
/// preference order: V8 first, QuickJS as fallback.
pub(crate) fn create_engine() -> Result<Box<dyn ScriptEngine>, VizError> {
    let source = script::source()?;
    let mut reasons: Vec<String> = Vec::new();

    #[cfg(feature = "v8")]
    match v8::V8Engine::new(source) {
        Ok(engine) => return Ok(Box::new(engine)),
        Err(err) => {
            tracing::warn!(error = %err, "V8 engine failed to initialize, trying fallback");
            reasons.push(format!("V8: {err}"));
        }
    }

    #[cfg(feature = "quickjs")]
    match quickjs::QuickJsEngine::new(source) {
        Ok(engine) => return Ok(Box::new(engine)),
        Err(err) => {
            tracing::warn!(error = %err, "QuickJS engine failed to initialize");
            reasons.push(format!("QuickJS: {err}"));
        }
    }

    Err(VizError::Initialization {
        reason: reasons.join("; "),
    })
}
