//! Result rendering
//!
//! Pure functions from validated analysis results to HTML. Every call
//! produces a complete replacement for the results region; nothing is patched
//! incrementally.
//!
//! - **Monophonic** (`monophonic`): instrument panel, pitch preview, notes
//! - **Stems** (`stems`): one card per stem with inline or disclosed detail
//! - **Disclosure** (`disclosure`): per-stem expand/collapse state machine

pub mod disclosure;
pub mod html;
pub mod instrument;
pub mod monophonic;
pub mod stems;

pub use disclosure::{DisclosurePanel, DisclosureState};
pub use instrument::{confidence_percent, display_name, DetailStyle};
pub use monophonic::{render_monophonic, PITCH_PREVIEW_ROWS};
pub use stems::{detail_policy, render_stems, stem_icon, DetailPolicy, StemsPanel};
