//! # swfix-core
//!
//! Shared library for the SWBF2 DX12 fix toolkit containing the settings
//! document patcher, the catalog of fix plans, and the report types used to
//! tally fix runs.
//!
//! This crate is used by the engine, the CLI, and the GUI companion app.
//! It has zero dependencies on OS APIs, UI frameworks, or the file system.
//!
//! # What is this toolkit fixing? (for beginners)
//!
//! STAR WARS Battlefront II (2017) ships a DX12 render path that crashes at
//! startup on many systems and corrupts menu/HUD rendering whenever the
//! resolution scale is not exactly 100%.  The community fix is not a binary
//! patch: it is a coordinated set of plain-text settings edits plus a pair of
//! registry mitigation flags.
//!
//! This crate defines:
//!
//! - **`domain::document`** – The patch primitive.  Frostbite settings files
//!   are line-oriented (`GstRender.Dx12Enabled 1`); patching means removing
//!   every line for a key and appending the fixed value, which makes the
//!   operation idempotent.
//!
//! - **`domain::plan`** – The concrete edits the fix ships, expressed as
//!   data: which file gets which key/value pairs, and which registry flags
//!   accompany them.
//!
//! - **`domain::report`** – Step-by-step outcome tallies.  Every fix step
//!   reports applied/skipped/failed independently; a run succeeds when at
//!   least one step applied.

pub mod domain;

// Re-export the most-used types at the crate root so callers can write
// `swfix_core::SettingsDocument` instead of the full module path.
pub use domain::document::{EditBatch, SettingEdit, SettingsDocument};
pub use domain::plan::{
    complete_fix_plans, game_config_plan, mitigation_flags, ui_fix_plans, ui_fix_profile,
    ui_registry_flags, FixPlan, RegistryData, RegistryFlag, RegistryHive, SettingsTarget,
    TargetRoot, GAME_EXECUTABLE, GAME_PROCESS_NAMES, UI_FIX_PROFILE_FILE,
};
pub use domain::report::{
    CheckReport, CheckStatus, FixReport, StepReport, StepStatus, VerifyReport,
};
