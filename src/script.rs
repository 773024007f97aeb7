//! The bundled layout script resource.
//!
//! The script is embedded at compile time and treated as an opaque,
//! read-only blob for the process lifetime. The only knowledge this crate
//! has of it is the name of its entry function and its version label.

use crate::error::VizError;

/// Name of the global entry function the script must define. It takes the
/// graph description as its sole argument and returns SVG markup.
pub(crate) const ENTRY_FUNCTION: &str = "Viz";

/// Version label of the bundled script, for identification strings.
pub(crate) const SCRIPT_VERSION: &str = "vizlite-0.4.0";

const SOURCE: &str = include_str!("../assets/vizlite-0.4.js");

/// Returns the layout script source.
///
/// # Errors
///
/// Returns [`VizError::ScriptResource`] if the embedded blob is empty or
/// does not define the entry function.
pub(crate) fn source() -> Result<&'static str, VizError> {
    if SOURCE.trim().is_empty() {
        return Err(VizError::ScriptResource {
            reason: format!("{SCRIPT_VERSION} is empty"),
        });
    }
    if !SOURCE.contains(ENTRY_FUNCTION) {
        return Err(VizError::ScriptResource {
            reason: format!("{SCRIPT_VERSION} does not define `{ENTRY_FUNCTION}`"),
        });
    }
    Ok(SOURCE)
}
