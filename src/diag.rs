//! Fatal-path diagnostics.
//!
//! This is the only component that can end the process, and it runs exactly
//! when the OS has refused to give us memory, so nothing here may allocate,
//! not even indirectly through formatting machinery. Messages are fixed
//! literals pushed straight at the error stream.

/// Exit status used on every unrecoverable failure.
const EXIT_STATUS: i32 = 2;

/// Writes `message` to the process's error stream and terminates.
///
/// If the write itself fails, one best-effort fallback write is attempted
/// before terminating. Either way this function does not return.
pub(crate) fn fatal(message: &str) -> ! {
    if !platform::write_stderr(message.as_bytes()) {
        platform::write_stderr(b"logging failed\n");
    }

    platform::terminate()
}

#[cfg(unix)]
mod platform {
    use std::os::raw::c_void;

    pub fn write_stderr(bytes: &[u8]) -> bool {
        let written = unsafe {
            libc::write(
                libc::STDERR_FILENO,
                bytes.as_ptr() as *const c_void,
                bytes.len(),
            )
        };

        written == bytes.len() as isize
    }

    pub fn terminate() -> ! {
        unsafe { libc::_exit(super::EXIT_STATUS) }
    }
}

#[cfg(windows)]
mod platform {
    use windows::Win32::Storage::FileSystem::WriteFile;
    use windows::Win32::System::Console::{GetStdHandle, STD_ERROR_HANDLE};
    use windows::Win32::System::Threading::ExitProcess;

    pub fn write_stderr(bytes: &[u8]) -> bool {
        unsafe {
            let Ok(handle) = GetStdHandle(STD_ERROR_HANDLE) else {
                return false;
            };

            let mut written = 0u32;

            WriteFile(handle, Some(bytes), Some(&mut written), None).is_ok()
                && written as usize == bytes.len()
        }
    }

    pub fn terminate() -> ! {
        unsafe { ExitProcess(super::EXIT_STATUS as u32) }
    }
}

#[cfg(test)]
mod tests {
    use super::platform;

    #[test]
    fn stderr_accepts_writes() {
        // The happy path of `fatal` without the terminating part.
        assert!(platform::write_stderr(b""));
    }
}
