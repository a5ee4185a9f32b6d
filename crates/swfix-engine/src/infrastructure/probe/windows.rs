//! System probe backed by the Win32 API.
//!
//! The Windows version is read from the registry
//! (`HKLM\SOFTWARE\Microsoft\Windows NT\CurrentVersion`) rather than
//! from `GetVersionExW`, which lies to unmanifested processes.
//! `CurrentMajorVersionNumber` only exists on Windows 10 and later, so
//! its absence already tells the verifier the OS is too old.

#![cfg(target_os = "windows")]

use std::ffi::OsStr;
use std::iter::once;
use std::os::windows::ffi::OsStrExt;
use std::path::Path;

use windows::core::PCWSTR;
use windows::Win32::Storage::FileSystem::GetDiskFreeSpaceExW;
use windows::Win32::System::Registry::{
    RegGetValueW, HKEY_LOCAL_MACHINE, RRF_RT_REG_DWORD, RRF_RT_REG_SZ,
};
use windows::Win32::UI::Shell::IsUserAnAdmin;

use crate::application::verify_system::{OsInfo, SystemProbe};

const CURRENT_VERSION_KEY: &str = r"SOFTWARE\Microsoft\Windows NT\CurrentVersion";

/// The real probe, backed by Win32 calls.
pub struct WindowsSystemProbe;

impl SystemProbe for WindowsSystemProbe {
    fn os_info(&self) -> OsInfo {
        OsInfo {
            family: "windows".to_string(),
            major: read_version_dword("CurrentMajorVersionNumber"),
            build: read_build_number(),
        }
    }

    fn is_elevated(&self) -> Option<bool> {
        // SAFETY: IsUserAnAdmin takes no arguments and only inspects the
        // calling thread's token.
        Some(unsafe { IsUserAnAdmin() }.as_bool())
    }

    fn free_space(&self, path: &Path) -> Option<u64> {
        let wide_path = wide(path.as_os_str());
        let mut available: u64 = 0;

        // SAFETY: wide_path is NUL-terminated and outlives the call;
        // `available` is a valid out pointer for the duration of the call.
        unsafe {
            GetDiskFreeSpaceExW(
                PCWSTR(wide_path.as_ptr()),
                Some(&mut available),
                None,
                None,
            )
        }
        .ok()?;

        Some(available)
    }
}

/// Reads a `REG_DWORD` value from the `CurrentVersion` key.
fn read_version_dword(value_name: &str) -> Option<u32> {
    let wide_key = wide(OsStr::new(CURRENT_VERSION_KEY));
    let wide_value = wide(OsStr::new(value_name));
    let mut data: u32 = 0;
    let mut size = std::mem::size_of::<u32>() as u32;

    // SAFETY: both name buffers are NUL-terminated, `data` is a valid
    // 4-byte buffer, and `size` describes it.
    let status = unsafe {
        RegGetValueW(
            HKEY_LOCAL_MACHINE,
            PCWSTR(wide_key.as_ptr()),
            PCWSTR(wide_value.as_ptr()),
            RRF_RT_REG_DWORD,
            None,
            Some((&mut data as *mut u32).cast()),
            Some(&mut size),
        )
    };

    status.is_ok().then_some(data)
}

/// Reads `CurrentBuildNumber` (a `REG_SZ` such as `"22631"`) and parses it.
fn read_build_number() -> Option<u32> {
    let wide_key = wide(OsStr::new(CURRENT_VERSION_KEY));
    let wide_value = wide(OsStr::new("CurrentBuildNumber"));
    let mut data = [0u16; 16];
    let mut size = (data.len() * std::mem::size_of::<u16>()) as u32;

    // SAFETY: the name buffers are NUL-terminated and `data`/`size`
    // describe a valid 32-byte buffer.
    let status = unsafe {
        RegGetValueW(
            HKEY_LOCAL_MACHINE,
            PCWSTR(wide_key.as_ptr()),
            PCWSTR(wide_value.as_ptr()),
            RRF_RT_REG_SZ,
            None,
            Some(data.as_mut_ptr().cast()),
            Some(&mut size),
        )
    };

    if !status.is_ok() {
        return None;
    }

    let len = data.iter().position(|&c| c == 0).unwrap_or(data.len());
    String::from_utf16_lossy(&data[..len]).parse().ok()
}

/// Encodes a string as a NUL-terminated UTF-16 buffer for Win32 calls.
fn wide(s: &OsStr) -> Vec<u16> {
    s.encode_wide().chain(once(0)).collect()
}
