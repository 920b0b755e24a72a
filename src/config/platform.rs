use serde::{Deserialize, Serialize};

/// Host description captured once at startup and reused by the summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlatformInfo {
    pub platform: String,
    pub platform_release: String,
    pub machine: String,
}

impl PlatformInfo {
    pub fn detect() -> Self {
        #[cfg(unix)]
        {
            if let Some(info) = detect_uname() {
                return info;
            }
        }
        Self {
            platform: system_name().to_string(),
            platform_release: String::new(),
            machine: std::env::consts::ARCH.to_string(),
        }
    }
}

/// OS name in the style of `uname -s`.
fn system_name() -> &'static str {
    match std::env::consts::OS {
        "linux" => "Linux",
        "macos" => "Darwin",
        "windows" => "Windows",
        "freebsd" => "FreeBSD",
        "netbsd" => "NetBSD",
        "openbsd" => "OpenBSD",
        other => other,
    }
}

#[cfg(unix)]
fn detect_uname() -> Option<PlatformInfo> {
    let mut uts: libc::utsname = unsafe { std::mem::zeroed() };
    let ret = unsafe { libc::uname(&mut uts) };
    if ret != 0 {
        return None;
    }
    Some(PlatformInfo {
        platform: c_field(&uts.sysname),
        platform_release: c_field(&uts.release),
        machine: c_field(&uts.machine),
    })
}

#[cfg(unix)]
fn c_field(field: &[libc::c_char]) -> String {
    let bytes: Vec<u8> = field
        .iter()
        .take_while(|&&c| c != 0)
        .map(|&c| c as u8)
        .collect();
    String::from_utf8_lossy(&bytes).into_owned()
}
