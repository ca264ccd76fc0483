//! Desktop stand-in for "view" intents: files passed on the command line.

use std::ffi::OsStr;
use std::path::Path;

use tracing::{debug, warn};
use url::Url;

use crate::capture::Intent;
use crate::reference::FILE_SCHEME;

/// Turn a process argv into "view" intents.
///
/// The first element is the program path and is skipped, as are flags.
/// Relative paths are resolved against `cwd`, which for a forwarded second
/// instance is that instance's working directory. Arguments that are not
/// valid Unicode or that name a non-`file` URI are skipped.
pub fn view_intents<I, S>(args: I, cwd: &Path) -> Vec<Intent>
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    args.into_iter()
        .skip(1)
        .filter_map(|arg| {
            let arg = arg.as_ref();
            match arg.to_str() {
                Some(arg) => arg_reference(arg, cwd),
                None => {
                    warn!("Skipping non-Unicode argument {:?}", arg);
                    None
                }
            }
        })
        .map(Intent::view)
        .collect()
}

fn arg_reference(arg: &str, cwd: &Path) -> Option<String> {
    if arg.is_empty() || arg.starts_with('-') {
        return None;
    }

    let url = match Url::parse(arg) {
        Ok(url) => url,
        // Plain path, absolute or relative.
        Err(_) => return Some(cwd.join(arg).to_string_lossy().into_owned()),
    };

    match url.scheme() {
        FILE_SCHEME => Some(arg.to_string()),
        // `C:\shots\a.png` parses with the drive letter as its scheme.
        drive if drive.len() == 1 => Some(arg.to_string()),
        other => {
            debug!("Skipping argument with unsupported scheme {}", other);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_program_name_and_flags_are_skipped() {
        let intents = view_intents(["pixglance", "--verbose", "-x"], Path::new("/home/u"));
        assert!(intents.is_empty());
    }

    #[test]
    fn test_absolute_and_uri_arguments_pass_through() {
        let intents = view_intents(
            ["pixglance", "/tmp/a.png", "file:///tmp/b.png"],
            Path::new("/home/u"),
        );
        assert_eq!(
            intents,
            vec![Intent::view("/tmp/a.png"), Intent::view("file:///tmp/b.png")]
        );
    }

    #[test]
    fn test_relative_paths_use_cwd() {
        let intents = view_intents(["pixglance", "shots/c.png"], Path::new("/home/u"));
        let expected = Path::new("/home/u").join("shots/c.png");
        assert_eq!(intents, vec![Intent::view(expected.to_string_lossy())]);
    }

    #[test]
    fn test_windows_drive_paths_pass_through() {
        let intents = view_intents(["pixglance", "C:\\shots\\a.png"], Path::new("/home/u"));
        assert_eq!(intents, vec![Intent::view("C:\\shots\\a.png")]);
    }

    #[test]
    fn test_non_file_uris_are_skipped() {
        let intents = view_intents(
            ["pixglance", "https://x/a.png", "mailto:a@b.c", "/tmp/d.png"],
            Path::new("/home/u"),
        );
        assert_eq!(intents, vec![Intent::view("/tmp/d.png")]);
    }

    #[cfg(unix)]
    #[test]
    fn test_non_unicode_arguments_are_skipped() {
        use std::ffi::OsString;
        use std::os::unix::ffi::OsStringExt;

        let args = vec![
            OsString::from("pixglance"),
            OsString::from_vec(b"/tmp/\xff.png".to_vec()),
            OsString::from("/tmp/e.png"),
        ];
        let intents = view_intents(args, Path::new("/home/u"));
        assert_eq!(intents, vec![Intent::view("/tmp/e.png")]);
    }
}
