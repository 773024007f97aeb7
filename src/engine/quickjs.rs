//! QuickJS binding via `rquickjs`.
//!
//! The fallback engine: a lightweight bytecode interpreter with no native
//! isolate to manage. Guest exceptions are formatted to text inside the
//! context scope so no guest values escape the boundary.

use rquickjs::convert::Coerced;
use rquickjs::{CatchResultExt, Context, Function, Runtime};

use crate::engine::{CAPTURE_HOOK, READ_DIAGNOSTICS, RESET_DIAGNOSTICS, ScriptEngine};
use crate::error::VizError;
use crate::script;

pub(crate) struct QuickJsEngine {
    // Context before runtime so teardown drops them in that order.
    handle: Option<(Context, Runtime)>,
    identification: String,
}

impl QuickJsEngine {
    /// Builds a fresh runtime and context, evaluates the capture hook and
    /// then the layout script.
    pub(crate) fn new(script_source: &str) -> Result<Self, VizError> {
        let runtime = Runtime::new().map_err(|err| VizError::Initialization {
            reason: format!("creating QuickJS runtime: {err}"),
        })?;
        let context = Context::full(&runtime).map_err(|err| VizError::Initialization {
            reason: format!("creating QuickJS context: {err}"),
        })?;

        context.with(|ctx| {
            ctx.eval::<(), _>(CAPTURE_HOOK)
                .catch(&ctx)
                .map_err(|err| VizError::Initialization {
                    reason: format!("evaluating capture hook in QuickJS: {err}"),
                })?;
            ctx.eval::<(), _>(script_source)
                .catch(&ctx)
                .map_err(|err| VizError::Initialization {
                    reason: format!("evaluating layout script in QuickJS: {err}"),
                })
        })?;

        Ok(Self {
            handle: Some((context, runtime)),
            identification: "QuickJS (rquickjs)".to_owned(),
        })
    }
}

impl ScriptEngine for QuickJsEngine {
    fn execute(&mut self, request: &str) -> Result<String, VizError> {
        let (context, _) = self.handle.as_ref().ok_or(VizError::Released)?;
        let identification = self.identification.clone();

        context.with(|ctx| {
            let attempt: Result<String, String> = (|| {
                ctx.eval::<(), _>(RESET_DIAGNOSTICS)
                    .catch(&ctx)
                    .map_err(|err| err.to_string())?;
                let entry: Function = ctx
                    .globals()
                    .get(script::ENTRY_FUNCTION)
                    .catch(&ctx)
                    .map_err(|err| err.to_string())?;
                let Coerced(markup) = entry
                    .call::<_, Coerced<String>>((request,))
                    .catch(&ctx)
                    .map_err(|err| err.to_string())?;
                Ok(markup)
            })();

            attempt.map_err(|cause| {
                match ctx.eval::<Coerced<String>, _>(READ_DIAGNOSTICS).catch(&ctx) {
                    Ok(Coerced(diagnostics)) if !diagnostics.is_empty() => {
                        VizError::ExecutionWithDiagnostics { diagnostics, cause }
                    }
                    Ok(_) => VizError::ExecutionNoDiagnostics {
                        engine: identification,
                        cause,
                    },
                    Err(err) => VizError::DiagnosticRead {
                        engine: identification,
                        reason: err.to_string(),
                    },
                }
            })
        })
    }

    fn identification(&self) -> String {
        self.identification.clone()
    }

    fn release(&mut self) {
        if self.handle.take().is_some() {
            tracing::trace!("released QuickJS context");
        }
    }
}
