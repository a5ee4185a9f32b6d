//! Toolhelp32-based process inspection.

#![cfg(target_os = "windows")]

use windows::Win32::Foundation::{CloseHandle, HANDLE};
use windows::Win32::System::Diagnostics::ToolHelp::{
    CreateToolhelp32Snapshot, Process32FirstW, Process32NextW, PROCESSENTRY32W,
    TH32CS_SNAPPROCESS,
};
use windows::Win32::System::Threading::{
    OpenProcess, SetPriorityClass, HIGH_PRIORITY_CLASS, PROCESS_SET_INFORMATION,
};

use crate::application::watch_game::{ProcessError, ProcessHit, ProcessInspector};

/// Inspector backed by Toolhelp32 snapshots.
pub struct WindowsProcessInspector;

impl ProcessInspector for WindowsProcessInspector {
    fn processes_named(&self, name: &str) -> Result<Vec<ProcessHit>, ProcessError> {
        // SAFETY: a successful snapshot returns an owned handle, closed below.
        let snapshot: HANDLE = unsafe { CreateToolhelp32Snapshot(TH32CS_SNAPPROCESS, 0) }
            .map_err(|e| ProcessError::Snapshot(e.message()))?;

        let mut hits = Vec::new();
        let mut entry = PROCESSENTRY32W {
            dwSize: std::mem::size_of::<PROCESSENTRY32W>() as u32,
            ..Default::default()
        };

        // SAFETY: dwSize is initialized and the snapshot handle is valid;
        // an Err from either call means the end of the list.
        let mut more = unsafe { Process32FirstW(snapshot, &mut entry) }.is_ok();
        while more {
            let exe_name = utf16_name(&entry.szExeFile);
            if exe_name.eq_ignore_ascii_case(name) {
                hits.push(ProcessHit {
                    pid: entry.th32ProcessID,
                    name: exe_name,
                });
            }
            // SAFETY: same handle and entry as above.
            more = unsafe { Process32NextW(snapshot, &mut entry) }.is_ok();
        }

        // SAFETY: snapshot was opened by this function.
        let _ = unsafe { CloseHandle(snapshot) };
        Ok(hits)
    }

    fn boost_priority(&self, pid: u32) -> Result<(), ProcessError> {
        // SAFETY: a successful open returns an owned handle, closed below.
        let handle = unsafe { OpenProcess(PROCESS_SET_INFORMATION, false, pid) }
            .map_err(|e| ProcessError::Open {
                pid,
                message: e.message(),
            })?;
        // SAFETY: handle carries PROCESS_SET_INFORMATION access.
        let result = unsafe { SetPriorityClass(handle, HIGH_PRIORITY_CLASS) };
        // SAFETY: handle was opened above.
        let _ = unsafe { CloseHandle(handle) };
        result.map_err(|e| ProcessError::Priority {
            pid,
            message: e.message(),
        })
    }
}

/// Image name from a NUL-terminated UTF-16 buffer.
fn utf16_name(buffer: &[u16]) -> String {
    let len = buffer.iter().position(|&c| c == 0).unwrap_or(buffer.len());
    String::from_utf16_lossy(&buffer[..len])
}
