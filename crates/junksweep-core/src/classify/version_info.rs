/// Best-effort version-metadata probe for Windows binaries.
///
/// Reads `FileDescription` / `ProductName` from a PE file's version
/// resource so classified executables can show "Google Chrome" instead
/// of a generic "Executable program". Every failure path returns `None`
/// — the caller always has a table-based fallback description.
///
/// On non-Windows targets the probe is a no-op; binary version
/// resources are a PE concept.

#[cfg(windows)]
pub fn file_description(path: &std::path::Path) -> Option<String> {
    use std::ffi::c_void;
    use std::os::windows::ffi::OsStrExt;
    use std::path::Path;
    use windows::core::PCWSTR;
    use windows::Win32::Storage::FileSystem::{
        GetFileVersionInfoSizeW, GetFileVersionInfoW, VerQueryValueW,
    };

    // Language/codepage blocks tried in order: US English Unicode,
    // US English multilingual, then neutral Unicode.
    const LANG_BLOCKS: [&str; 3] = ["040904B0", "040904E4", "000004B0"];
    const FIELDS: [&str; 2] = ["FileDescription", "ProductName"];

    fn wide(path: &Path) -> Vec<u16> {
        path.as_os_str()
            .encode_wide()
            .chain(std::iter::once(0))
            .collect()
    }

    let wide_path = wide(path);
    let len = unsafe { GetFileVersionInfoSizeW(PCWSTR(wide_path.as_ptr()), None) };
    if len == 0 {
        return None;
    }

    let mut block = vec![0u8; len as usize];
    let loaded = unsafe {
        GetFileVersionInfoW(
            PCWSTR(wide_path.as_ptr()),
            0,
            len,
            block.as_mut_ptr().cast::<c_void>(),
        )
    };
    if loaded.is_err() {
        return None;
    }

    for lang in LANG_BLOCKS {
        for field in FIELDS {
            let query: Vec<u16> = format!(r"\StringFileInfo\{lang}\{field}")
                .encode_utf16()
                .chain(std::iter::once(0))
                .collect();

            let mut value: *mut c_void = std::ptr::null_mut();
            let mut value_len = 0u32;
            let found = unsafe {
                VerQueryValueW(
                    block.as_ptr().cast::<c_void>(),
                    PCWSTR(query.as_ptr()),
                    &mut value,
                    &mut value_len,
                )
            };

            // value_len is in u16 units and includes the terminator.
            if found.as_bool() && !value.is_null() && value_len > 1 {
                let chars = unsafe {
                    std::slice::from_raw_parts(value.cast::<u16>(), value_len as usize)
                };
                let text =
                    String::from_utf16_lossy(chars.split(|&c| c == 0).next().unwrap_or(&[]));
                let text = text.trim();
                if !text.is_empty() {
                    return Some(text.to_owned());
                }
            }
        }
    }

    None
}

#[cfg(not(windows))]
pub fn file_description(_path: &std::path::Path) -> Option<String> {
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    /// The probe must never panic and must fall back cleanly on files
    /// that carry no version resource.
    #[test]
    fn probe_tolerates_non_pe_files() {
        assert_eq!(file_description(std::path::Path::new("Cargo.toml")), None);
        assert_eq!(
            file_description(std::path::Path::new("/definitely/not/here.exe")),
            None
        );
    }
}
