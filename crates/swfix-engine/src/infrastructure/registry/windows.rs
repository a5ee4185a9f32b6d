//! Windows registry writer: `RegCreateKeyExW` + `RegSetValueExW`.

#![cfg(target_os = "windows")]

use std::ffi::OsStr;
use std::os::windows::ffi::OsStrExt;

use windows::core::PCWSTR;
use windows::Win32::Foundation::ERROR_ACCESS_DENIED;
use windows::Win32::System::Registry::{
    RegCloseKey, RegCreateKeyExW, RegSetValueExW, HKEY, HKEY_CURRENT_USER, HKEY_LOCAL_MACHINE,
    KEY_WRITE, REG_DWORD, REG_OPTION_NON_VOLATILE, REG_QWORD, REG_VALUE_TYPE,
};

use swfix_core::{RegistryData, RegistryFlag, RegistryHive};

use crate::application::apply_fixes::{RegistryError, RegistryWriter};

/// Writes flags to the live registry.  Values are written little-endian,
/// the registry's native byte order.
pub struct WindowsRegistryWriter;

impl RegistryWriter for WindowsRegistryWriter {
    fn set_flag(&self, flag: &RegistryFlag) -> Result<(), RegistryError> {
        let hive = match flag.hive {
            RegistryHive::LocalMachine => HKEY_LOCAL_MACHINE,
            RegistryHive::CurrentUser => HKEY_CURRENT_USER,
        };
        let subkey = wide(&flag.key_path);
        let mut key = HKEY::default();

        // SAFETY: subkey is NUL-terminated and outlives the call; key
        // receives the opened handle on success.
        let status = unsafe {
            RegCreateKeyExW(
                hive,
                PCWSTR(subkey.as_ptr()),
                0,
                PCWSTR::null(),
                REG_OPTION_NON_VOLATILE,
                KEY_WRITE,
                None,
                &mut key,
                None,
            )
        };
        classify(status, flag)?;

        let name = wide(&flag.value_name);
        let (kind, bytes): (REG_VALUE_TYPE, Vec<u8>) = match flag.data {
            RegistryData::Dword(value) => (REG_DWORD, value.to_le_bytes().to_vec()),
            RegistryData::Qword(value) => (REG_QWORD, value.to_le_bytes().to_vec()),
        };

        // SAFETY: name is NUL-terminated and bytes lives across the call.
        let status =
            unsafe { RegSetValueExW(key, PCWSTR(name.as_ptr()), 0, kind, Some(bytes.as_slice())) };
        // SAFETY: key was opened by RegCreateKeyExW above.
        let _ = unsafe { RegCloseKey(key) };
        classify(status, flag)
    }
}

/// Maps a registry status to the error taxonomy; access-denied gets its
/// own variant so orchestration can explain the elevation requirement.
fn classify(
    status: windows::Win32::Foundation::WIN32_ERROR,
    flag: &RegistryFlag,
) -> Result<(), RegistryError> {
    if status == ERROR_ACCESS_DENIED {
        return Err(RegistryError::AccessDenied {
            key: flag.key_path.clone(),
        });
    }
    status.ok().map_err(|e| RegistryError::Os {
        key: flag.key_path.clone(),
        message: e.message(),
    })
}

/// NUL-terminated UTF-16 for the W-suffixed APIs.
fn wide(value: &str) -> Vec<u16> {
    OsStr::new(value)
        .encode_wide()
        .chain(std::iter::once(0))
        .collect()
}
