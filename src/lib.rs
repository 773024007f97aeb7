// Only allow lints that are either transitive-dependency noise or
// genuinely opinionated style choices that don't indicate real issues.
#![allow(
    // Transitive dependency version mismatches between the embedded engines
    // are out of our control
    clippy::multiple_crate_versions
)]

//! # dotviz
//!
//! Graphviz DOT to SVG rendering, driven by a bundled JavaScript layout
//! script executed inside an embedded JS engine.
//!
//! The DOT text and the SVG output both pass through unparsed; the layout
//! work happens entirely in the script. What this crate provides is the
//! hosting: engine selection (V8 via `deno_core` first, QuickJS via
//! `rquickjs` as fallback), bootstrap of the diagnostic-capture hook and the
//! layout script, one render call per request, recovery of the script's
//! diagnostic output on failure, and deterministic teardown of the engine's
//! native resources.
//!
//! ```no_run
//! use dotviz::Viz;
//!
//! # fn main() -> Result<(), dotviz::VizError> {
//! let mut viz = Viz::create()?;
//! let svg = viz.execute("digraph { a -> b }")?;
//! assert!(svg.starts_with("<svg"));
//! # Ok(())
//! # }
//! ```
//!
//! One `Viz` per thread: engines have thread affinity, not thread safety,
//! and the types are `!Send` accordingly.

#[cfg(not(any(feature = "v8", feature = "quickjs")))]
compile_error!("at least one engine feature (`v8` or `quickjs`) must be enabled");

mod engine;
pub mod error;
mod script;
mod viz;

pub use error::VizError;
pub use viz::Viz;
