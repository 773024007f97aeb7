//! V8 binding via `deno_core`.
//!
//! The preferred engine: a native isolate with the layout script evaluated
//! once at construction. Requests cross the boundary as a JSON-escaped call
//! expression so no guest object handles are held on the Rust side.

use deno_core::{FastString, JsRuntime, RuntimeOptions, v8};

use crate::engine::{CAPTURE_HOOK, READ_DIAGNOSTICS, RESET_DIAGNOSTICS, ScriptEngine};
use crate::error::VizError;
use crate::script;

pub(crate) struct V8Engine {
    runtime: Option<JsRuntime>,
    identification: String,
}

impl V8Engine {
    /// Builds a fresh isolate, evaluates the capture hook and then the
    /// layout script, leaving the entry function ready to invoke.
    pub(crate) fn new(script_source: &'static str) -> Result<Self, VizError> {
        let mut runtime = JsRuntime::new(RuntimeOptions::default());
        let identification = format!("V8 {} (deno_core)", v8::V8::get_version());

        // The hook must run first: the script may print during its own
        // initialization and those lines belong in the buffer.
        if let Err(err) = runtime.execute_script("<capture-hook>", FastString::from_static(CAPTURE_HOOK)) {
            return Err(VizError::Initialization {
                reason: format!("evaluating capture hook in {identification}: {err}"),
            });
        }
        if let Err(err) = runtime.execute_script("<layout-script>", FastString::from_static(script_source)) {
            return Err(VizError::Initialization {
                reason: format!("evaluating layout script in {identification}: {err}"),
            });
        }

        Ok(Self {
            runtime: Some(runtime),
            identification,
        })
    }
}

impl ScriptEngine for V8Engine {
    fn execute(&mut self, request: &str) -> Result<String, VizError> {
        let runtime = self.runtime.as_mut().ok_or(VizError::Released)?;

        let encoded = serde_json::to_string(request).map_err(|err| VizError::ExecutionNoDiagnostics {
            engine: self.identification.clone(),
            cause: format!("request could not be encoded for the guest: {err}"),
        })?;
        let call = format!("{}({encoded})", script::ENTRY_FUNCTION);

        let outcome = match runtime.execute_script("<reset-diagnostics>", FastString::from_static(RESET_DIAGNOSTICS)) {
            Ok(_) => runtime.execute_script("<render>", FastString::from(call)),
            Err(err) => Err(err),
        };

        match outcome {
            Ok(value) => {
                let scope = &mut runtime.handle_scope();
                let local = v8::Local::new(scope, value);
                Ok(local.to_rust_string_lossy(scope))
            }
            Err(err) => Err(enrich_failure(runtime, &self.identification, err.to_string())),
        }
    }

    fn identification(&self) -> String {
        self.identification.clone()
    }

    fn release(&mut self) {
        if self.runtime.take().is_some() {
            tracing::trace!("released V8 isolate");
        }
    }
}

/// Reads the diagnostic buffer after a primary failure and picks the error
/// kind accordingly.
fn enrich_failure(runtime: &mut JsRuntime, identification: &str, cause: String) -> VizError {
    match runtime.execute_script("<read-diagnostics>", FastString::from_static(READ_DIAGNOSTICS)) {
        Ok(value) => {
            let scope = &mut runtime.handle_scope();
            let local = v8::Local::new(scope, value);
            let diagnostics = local.to_rust_string_lossy(scope);
            if diagnostics.is_empty() {
                VizError::ExecutionNoDiagnostics {
                    engine: identification.to_owned(),
                    cause,
                }
            } else {
                VizError::ExecutionWithDiagnostics { diagnostics, cause }
            }
        }
        Err(err) => VizError::DiagnosticRead {
            engine: identification.to_owned(),
            reason: err.to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ECHO: &str = "globalThis.Viz = function (req) { return '<svg>' + req + '</svg>'; };";
    const PRINTING_FAILURE: &str =
        "globalThis.Viz = function () { print('first line'); print('second line'); throw new Error('boom'); };";
    const SILENT_FAILURE: &str = "globalThis.Viz = function () { throw new Error('quiet'); };";
    const NOISY_INIT: &str =
        "print('loading'); globalThis.Viz = function () { throw new Error('late'); };";
    const BUFFER_CLOBBER: &str =
        "globalThis.Viz = function () { globalThis.messages = null; throw new Error('boom'); };";

    #[test]
    fn executes_the_entry_function() {
        let mut engine = V8Engine::new(ECHO).unwrap();
        assert_eq!(engine.execute("x").unwrap(), "<svg>x</svg>");
    }

    #[test]
    fn joins_diagnostics_in_emission_order() {
        let mut engine = V8Engine::new(PRINTING_FAILURE).unwrap();
        match engine.execute("x") {
            Err(VizError::ExecutionWithDiagnostics { diagnostics, .. }) => {
                assert_eq!(diagnostics, "first line\nsecond line");
            }
            other => panic!("expected diagnostics failure, got {other:?}"),
        }
    }

    #[test]
    fn silent_failures_carry_the_identification() {
        let mut engine = V8Engine::new(SILENT_FAILURE).unwrap();
        match engine.execute("x") {
            Err(VizError::ExecutionNoDiagnostics { engine: id, .. }) => {
                assert!(id.contains("V8"));
            }
            other => panic!("expected silent failure, got {other:?}"),
        }
    }

    #[test]
    fn unreadable_buffer_is_a_diagnostic_read_failure() {
        // The script destroys the buffer before throwing, so the read after
        // the primary failure fails too.
        let mut engine = V8Engine::new(BUFFER_CLOBBER).unwrap();
        match engine.execute("x") {
            Err(VizError::DiagnosticRead { engine: id, .. }) => {
                assert!(id.contains("V8"));
            }
            other => panic!("expected a diagnostic-read failure, got {other:?}"),
        }
    }

    #[test]
    fn init_time_diagnostics_are_reset_before_each_call() {
        // The script prints while loading; the reset at the start of the
        // call discards that line, so the failure is a silent one.
        let mut engine = V8Engine::new(NOISY_INIT).unwrap();
        assert!(matches!(
            engine.execute("x"),
            Err(VizError::ExecutionNoDiagnostics { .. })
        ));
    }

    #[test]
    fn broken_script_fails_initialization() {
        assert!(matches!(
            V8Engine::new("this is not javascript"),
            Err(VizError::Initialization { .. })
        ));
    }

    #[test]
    fn release_is_idempotent() {
        let mut engine = V8Engine::new(ECHO).unwrap();
        engine.release();
        engine.release();
        assert!(matches!(engine.execute("x"), Err(VizError::Released)));
        assert!(!engine.identification().is_empty());
    }
}
