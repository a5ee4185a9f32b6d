//! Catalog of the concrete fixes: settings plans and registry flags.
//!
//! Everything the fix changes on a machine is declared here as data.  The
//! engine walks these catalogs; nothing else in the workspace hard-codes a
//! setting name or registry path.
//!
//! The values come from the community DX12 fix for STAR WARS Battlefront II
//! and are intentionally exact — the game's settings parser is strict about
//! the numeric formats it wrote itself (`1.200000`, not `1.2`, in the
//! profile file).

use crate::domain::document::{EditBatch, SettingsDocument};

/// File name of the game executable, used both as the install-folder marker
/// and as the process image name to watch for.
pub const GAME_EXECUTABLE: &str = "starwarsbattlefrontii.exe";

/// Process image names the game can run under (retail and trial SKUs).
pub const GAME_PROCESS_NAMES: [&str; 2] =
    ["starwarsbattlefrontii.exe", "starwarsbattlefrontii_trial.exe"];

/// File name of the generated reference profile (see [`ui_fix_profile`]).
pub const UI_FIX_PROFILE_FILE: &str = "UI_Fix_Profile";

/// `MitigationOptions` value that disables Control Flow Guard for an image.
///
/// CFG is the exploit mitigation that the game's DX12 shader pipeline trips
/// over; Windows honours this per-image override from the Image File
/// Execution Options key (same effect as unticking CFG for the exe in the
/// Exploit Protection UI).
const CFG_MITIGATION_OFF: u64 = 0x1000000000000;

// ── Settings targets ──────────────────────────────────────────────────────────

/// Which directory a settings file lives under.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetRoot {
    /// The game installation directory (next to the executable).
    GameDir,
    /// The per-user settings directory under Documents.
    SettingsDir,
}

/// The settings files the fix patches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingsTarget {
    /// `<settings dir>/BootOptions`, read before the renderer starts.
    BootOptions,
    /// `<settings dir>/ProfileOptions_profile`, the per-profile options.
    ProfileOptions,
    /// `<game dir>/Scripts/Win32Game.cfg`, install-wide overrides.
    GameConfig,
}

impl SettingsTarget {
    /// The root directory this target resolves against.
    pub fn root(self) -> TargetRoot {
        match self {
            SettingsTarget::BootOptions | SettingsTarget::ProfileOptions => {
                TargetRoot::SettingsDir
            }
            SettingsTarget::GameConfig => TargetRoot::GameDir,
        }
    }

    /// Path of the target file relative to its root, using `/` separators
    /// (joined per-component by the resolver).
    pub fn relative_components(self) -> &'static [&'static str] {
        match self {
            SettingsTarget::BootOptions => &["BootOptions"],
            SettingsTarget::ProfileOptions => &["ProfileOptions_profile"],
            SettingsTarget::GameConfig => &["Scripts", "Win32Game.cfg"],
        }
    }

    /// Bare file name of the target.
    pub fn file_name(self) -> &'static str {
        match self {
            SettingsTarget::BootOptions => "BootOptions",
            SettingsTarget::ProfileOptions => "ProfileOptions_profile",
            SettingsTarget::GameConfig => "Win32Game.cfg",
        }
    }
}

/// A named edit batch bound to the settings file it patches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixPlan {
    /// Short human-readable step name shown in reports.
    pub name: &'static str,
    /// One-line description of what the plan changes.
    pub summary: &'static str,
    pub target: SettingsTarget,
    pub batch: EditBatch,
}

// ── Settings plan catalog ─────────────────────────────────────────────────────

/// BootOptions: force the UI onto its native-resolution path under DX12.
pub fn ui_boot_plan() -> FixPlan {
    FixPlan {
        name: "UI boot options",
        summary: "native-resolution UI rendering flags in BootOptions",
        target: SettingsTarget::BootOptions,
        batch: EditBatch::from_pairs(&[
            ("GstRender.EnableDx12", "1"),
            ("GstRender.UI.ForceNativeResolution", "1"),
            ("GstRender.UI.DisableScaling", "1"),
            ("GstRender.UI.UseSeparateRenderTarget", "1"),
            ("GstRender.UI.ForceScreenDepth", "1"),
        ]),
    }
}

/// BootOptions: DX12-specific UI pipeline workarounds.
pub fn dx12_boot_plan() -> FixPlan {
    FixPlan {
        name: "DX12 UI boot options",
        summary: "DX12 descriptor-heap and compatibility flags in BootOptions",
        target: SettingsTarget::BootOptions,
        batch: EditBatch::from_pairs(&[
            ("GstRender.Dx12.UIDescriptorHeap", "512"),
            ("GstRender.Dx12.UIForceSRGB", "1"),
            ("GstRender.Dx12.UIDisableBuffering", "1"),
            ("GstRender.Dx12.UISingleThreaded", "1"),
            ("GstRender.Dx12.UICompatMode", "1"),
        ]),
    }
}

/// ProfileOptions: decouple the UI render target from the 3D scale.
pub fn render_profile_plan() -> FixPlan {
    FixPlan {
        name: "render profile",
        summary: "separate UI render target and scale in ProfileOptions",
        target: SettingsTarget::ProfileOptions,
        batch: EditBatch::from_pairs(&[
            ("GstRender.ResolutionScale", "1.200000"),
            ("GstRender.UI.ResolutionScale", "1.000000"),
            ("GstRender.UI.BypassScaling", "1"),
            ("GstRender.SeparateUIContext", "1"),
            ("GstRender.UIRenderTargetMultiplier", "1.0"),
        ]),
    }
}

/// ProfileOptions: stop the HUD, menu, and text layers from being rescaled.
pub fn hud_profile_plan() -> FixPlan {
    FixPlan {
        name: "HUD scaling profile",
        summary: "per-layer UI scaling disables in ProfileOptions",
        target: SettingsTarget::ProfileOptions,
        batch: EditBatch::from_pairs(&[
            ("GstRender.HUD.DisableScaling", "1"),
            ("GstRender.Menu.DisableScaling", "1"),
            ("GstRender.Text.DisableScaling", "1"),
            ("GstRender.UI.AntiAliasing", "0"),
            ("GstRender.UI.FilterMode", "0"),
        ]),
    }
}

/// Win32Game.cfg: enable the DX12 renderer install-wide.
pub fn game_config_plan() -> FixPlan {
    FixPlan {
        name: "DX12 game settings",
        summary: "DX12 renderer enable in Scripts/Win32Game.cfg",
        target: SettingsTarget::GameConfig,
        batch: EditBatch::from_pairs(&[
            ("GstRender.Dx12Enabled", "1"),
            ("GstRender.EnableDx12", "1"),
            ("GstRender.ResolutionScale", "1.2"),
            ("GstRender.UIResolutionScale", "1.0"),
        ]),
    }
}

/// The four settings plans of the UI artifact fix, in application order.
pub fn ui_fix_plans() -> Vec<FixPlan> {
    vec![
        ui_boot_plan(),
        dx12_boot_plan(),
        render_profile_plan(),
        hud_profile_plan(),
    ]
}

/// Every settings plan of the complete DX12 fix: the game config enable
/// first, then the UI plans.
pub fn complete_fix_plans() -> Vec<FixPlan> {
    let mut plans = vec![game_config_plan()];
    plans.extend(ui_fix_plans());
    plans
}

/// A standalone reference profile containing every UI fix setting, written
/// next to the live profile so players can diff or manually copy values.
pub fn ui_fix_profile() -> SettingsDocument {
    let mut doc = SettingsDocument::new();
    doc.push_line("// UI-optimized DX12 profile generated by swfix");
    for plan in ui_fix_plans() {
        doc.apply(&plan.batch);
    }
    doc
}

// ── Registry flags ────────────────────────────────────────────────────────────

/// Registry hive a flag is written under.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistryHive {
    /// HKEY_LOCAL_MACHINE — requires elevation to write.
    LocalMachine,
    /// HKEY_CURRENT_USER.
    CurrentUser,
}

/// Typed payload of a registry value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistryData {
    Dword(u32),
    Qword(u64),
}

/// One write-only registry value.  The toolkit never reads registry state
/// back; flags are applied blindly and re-applied on every run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistryFlag {
    pub hive: RegistryHive,
    /// Key path below the hive, backslash-separated.
    pub key_path: String,
    pub value_name: String,
    pub data: RegistryData,
}

/// Per-image CFG mitigation overrides for both game SKUs (HKLM, QWORD).
///
/// Written under `Image File Execution Options\<exe>` so the loader applies
/// them no matter how the game is launched.
pub fn mitigation_flags() -> Vec<RegistryFlag> {
    GAME_PROCESS_NAMES
        .iter()
        .map(|exe| RegistryFlag {
            hive: RegistryHive::LocalMachine,
            key_path: format!(
                "SOFTWARE\\Microsoft\\Windows NT\\CurrentVersion\\Image File Execution Options\\{exe}"
            ),
            value_name: "MitigationOptions".to_string(),
            data: RegistryData::Qword(CFG_MITIGATION_OFF),
        })
        .collect()
}

/// Per-user UI rendering hints the game reads at startup (HKCU, DWORD).
pub fn ui_registry_flags() -> Vec<RegistryFlag> {
    let key_path = "Software\\EA Games\\STAR WARS Battlefront II".to_string();
    vec![
        RegistryFlag {
            hive: RegistryHive::CurrentUser,
            key_path: key_path.clone(),
            value_name: "GstRender.UI.ForceNativeRes".to_string(),
            data: RegistryData::Dword(1),
        },
        RegistryFlag {
            hive: RegistryHive::CurrentUser,
            key_path,
            value_name: "GstRender.UI.DisableHWScaling".to_string(),
            data: RegistryData::Dword(1),
        },
    ]
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ui_fix_plans_touch_only_settings_dir_targets() {
        for plan in ui_fix_plans() {
            assert_eq!(plan.target.root(), TargetRoot::SettingsDir, "{}", plan.name);
        }
    }

    #[test]
    fn test_complete_fix_plans_start_with_game_config() {
        let plans = complete_fix_plans();
        assert_eq!(plans[0].target, SettingsTarget::GameConfig);
        assert_eq!(plans.len(), 5);
    }

    #[test]
    fn test_game_config_target_resolves_under_scripts() {
        assert_eq!(
            SettingsTarget::GameConfig.relative_components(),
            &["Scripts", "Win32Game.cfg"]
        );
        assert_eq!(SettingsTarget::GameConfig.root(), TargetRoot::GameDir);
    }

    #[test]
    fn test_plans_do_not_repeat_keys_within_a_batch() {
        for plan in complete_fix_plans() {
            let mut keys: Vec<&str> = plan
                .batch
                .edits()
                .iter()
                .map(|e| e.key.as_str())
                .collect();
            let before = keys.len();
            keys.sort_unstable();
            keys.dedup();
            assert_eq!(before, keys.len(), "duplicate key in {}", plan.name);
        }
    }

    #[test]
    fn test_ui_fix_profile_contains_every_ui_setting() {
        let profile = ui_fix_profile();
        for plan in ui_fix_plans() {
            for edit in plan.batch.edits() {
                assert_eq!(
                    profile.value_of(&edit.key),
                    Some(edit.value.as_str()),
                    "{} missing from profile",
                    edit.key
                );
            }
        }
        // Comment header survives because it is not a settings line.
        assert!(profile.lines()[0].starts_with("//"));
    }

    #[test]
    fn test_mitigation_flags_cover_both_game_skus() {
        let flags = mitigation_flags();
        assert_eq!(flags.len(), 2);
        for flag in &flags {
            assert_eq!(flag.hive, RegistryHive::LocalMachine);
            assert_eq!(flag.value_name, "MitigationOptions");
            assert_eq!(flag.data, RegistryData::Qword(0x1000000000000));
            assert!(flag.key_path.contains("Image File Execution Options"));
        }
        assert!(flags[0].key_path.ends_with("starwarsbattlefrontii.exe"));
        assert!(flags[1].key_path.ends_with("starwarsbattlefrontii_trial.exe"));
    }

    #[test]
    fn test_ui_registry_flags_are_current_user_dwords() {
        let flags = ui_registry_flags();
        assert_eq!(flags.len(), 2);
        for flag in &flags {
            assert_eq!(flag.hive, RegistryHive::CurrentUser);
            assert_eq!(flag.data, RegistryData::Dword(1));
            assert!(flag.key_path.starts_with("Software\\EA Games"));
        }
    }
}
