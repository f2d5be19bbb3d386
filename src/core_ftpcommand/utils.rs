use chrono::{DateTime, Datelike, Local, Timelike};
use std::path::PathBuf;
use std::time::SystemTime;

use crate::constants::EOL;

/// True when the virtual path ends in `/`: the synthetic root itself or the
/// root of a device (`/ux0:/`).
pub fn path_is_at_root(path: &str) -> bool {
    path.ends_with('/')
}

/// True for the device shorthand form `name:/...` (first segment ends with a
/// colon and a path follows).
pub fn has_device_prefix(arg: &str) -> bool {
    match arg.find('/') {
        Some(idx) if idx > 0 => arg[..idx].ends_with(':'),
        _ => false,
    }
}

/// Resolves a command argument against the session's working path.
///
/// Leading `/` means an absolute virtual path, the `name:/...` shorthand is
/// rooted with a single `/`, anything else is joined onto `cur_path`.
pub fn build_virtual_path(cur_path: &str, arg: &str) -> String {
    if arg.starts_with('/') {
        arg.to_string()
    } else if has_device_prefix(arg) {
        format!("/{}", arg)
    } else if path_is_at_root(cur_path) {
        // At a device root the separator is already there
        format!("{}{}", cur_path, arg)
    } else {
        format!("{}/{}", cur_path, arg)
    }
}

/// Translates a virtual path into the native device-qualified path under
/// `base_dir`. The synthetic root has no native counterpart.
pub fn to_native_path(base_dir: &str, virtual_path: &str) -> Option<PathBuf> {
    let stripped = virtual_path.strip_prefix('/')?;
    if stripped.is_empty() {
        return None;
    }
    Some(PathBuf::from(base_dir).join(stripped))
}

/// Moves a virtual path one level up, in place.
///
/// At the synthetic root nothing changes; at a device root (`/ux0:/`) the
/// path collapses to `/`; otherwise the last segment is dropped, restoring
/// the trailing `/` when a bare device prefix remains.
pub fn dir_up(path: &mut String) {
    if path.len() == 1 {
        path.clear();
        path.push('/');
        return;
    }
    if path_is_at_root(path) {
        path.clear();
        path.push('/');
        return;
    }
    if let Some(idx) = path.rfind('/') {
        path.truncate(idx);
    }
    if path.rfind('/') == Some(0) {
        path.push('/');
    }
}

/// Renders one UNIX-style listing line.
///
/// Directories show as `drwxr-xr-x`, files as `-rw-r--r--`; owner and group
/// are always `vita`. The timestamp column is `HH:MM` for the current year,
/// the year otherwise.
pub fn gen_list_line(name: &str, is_dir: bool, size: u64, mtime: SystemTime) -> String {
    const MONTHS: [&str; 12] = [
        "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
    ];

    let mtime: DateTime<Local> = mtime.into();
    let yt = if mtime.year() == Local::now().year() {
        format!("{:02}:{:02}", mtime.hour(), mtime.minute())
    } else {
        format!("{:04}", mtime.year())
    };

    format!(
        "{}{} 1 vita vita {} {} {:<2} {} {}{}",
        if is_dir { 'd' } else { '-' },
        if is_dir { "rwxr-xr-x" } else { "rw-r--r--" },
        size,
        MONTHS[mtime.month0() as usize],
        mtime.day(),
        yt,
        name,
        EOL
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absolute_argument_wins() {
        assert_eq!(build_virtual_path("/ux0:/dir", "/ur0:/file"), "/ur0:/file");
    }

    #[test]
    fn device_shorthand_is_rooted() {
        assert_eq!(build_virtual_path("/", "ux0:/file.bin"), "/ux0:/file.bin");
        assert_eq!(
            build_virtual_path("/ur0:/", "savedata0:/slot0"),
            "/savedata0:/slot0"
        );
    }

    #[test]
    fn bare_device_name_is_joined_relative() {
        // No slash after the colon: not shorthand
        assert_eq!(build_virtual_path("/", "ux0:"), "/ux0:");
    }

    #[test]
    fn relative_argument_joins_cwd() {
        assert_eq!(
            build_virtual_path("/ux0:/", "file.bin"),
            "/ux0:/file.bin"
        );
        assert_eq!(
            build_virtual_path("/ux0:/dir", "file.bin"),
            "/ux0:/dir/file.bin"
        );
    }

    #[test]
    fn dir_up_stays_at_synthetic_root() {
        let mut path = String::from("/");
        dir_up(&mut path);
        assert_eq!(path, "/");
    }

    #[test]
    fn dir_up_collapses_device_root() {
        let mut path = String::from("/ux0:/");
        dir_up(&mut path);
        assert_eq!(path, "/");
    }

    #[test]
    fn dir_up_restores_device_root_slash() {
        let mut path = String::from("/ux0:/folder");
        dir_up(&mut path);
        assert_eq!(path, "/ux0:/");
    }

    #[test]
    fn dir_up_drops_one_segment() {
        let mut path = String::from("/ux0:/a/b");
        dir_up(&mut path);
        assert_eq!(path, "/ux0:/a");
    }

    #[test]
    fn native_path_strips_leading_slash() {
        assert_eq!(
            to_native_path("/srv", "/ux0:/file.bin"),
            Some(PathBuf::from("/srv/ux0:/file.bin"))
        );
        assert_eq!(to_native_path("/srv", "/"), None);
    }

    #[test]
    fn list_line_marks_directories() {
        let line = gen_list_line("folder", true, 0, SystemTime::now());
        assert!(line.starts_with("drwxr-xr-x 1 vita vita 0 "));
        assert!(line.ends_with("folder\r\n"));
        // Same-year timestamps use HH:MM
        assert!(line.contains(':'));
    }

    #[test]
    fn list_line_shows_year_for_old_files() {
        let line = gen_list_line("old.bin", false, 123, SystemTime::UNIX_EPOCH);
        let epoch_year = DateTime::<Local>::from(SystemTime::UNIX_EPOCH).year();
        assert!(line.starts_with("-rw-r--r-- 1 vita vita 123 "));
        assert!(line.contains(&format!(" {} ", epoch_year)));
    }
}
