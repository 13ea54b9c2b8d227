use std::io::Write;
use std::process::Command;

use log::debug;

use crate::prelude::*;

const DEFAULT_EDITOR: &str = "vi";

/// Split an `$EDITOR` value into program and arguments, shell-style, so
/// values like `code --wait` work. Unset or blank means `vi`.
pub fn editor_command(value: Option<&str>) -> Result<(String, Vec<String>)> {
    let value = value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .unwrap_or(DEFAULT_EDITOR);

    let mut parts = shlex::split(value).ok_or_else(|| eyre!(Error::EditorNotFound(value.into())))?;
    if parts.is_empty() {
        return Err(eyre!(Error::EditorNotFound(value.into())));
    }
    let program = parts.remove(0);
    Ok((program, parts))
}

/// Open `initial` in the user's `$EDITOR` and return the saved text.
pub fn edit_text(initial: &str) -> Result<String> {
    let editor = std::env::var("EDITOR").ok();
    edit_text_with(initial, editor.as_deref())
}

fn edit_text_with(initial: &str, editor: Option<&str>) -> Result<String> {
    let (program, args) = editor_command(editor)?;
    let resolved =
        which::which(&program).map_err(|_| eyre!(Error::EditorNotFound(program.clone())))?;

    let mut file = tempfile::Builder::new()
        .prefix("pdftoc_")
        .suffix(".txt")
        .tempfile()?;
    file.write_all(initial.as_bytes())?;
    file.flush()?;

    debug!("launching {} on {}", resolved.display(), file.path().display());
    let status = Command::new(&resolved)
        .args(&args)
        .arg(file.path())
        .status()
        .wrap_err_with(|| f!("failed to launch {}", resolved.display()))?;
    if !status.success() {
        return Err(eyre!(Error::EditorFailed(program, status.to_string())));
    }

    // Editors may replace the file instead of writing in place.
    std::fs::read_to_string(file.path()).wrap_err("cannot read the edited TOC")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_editor_defaults_to_vi() {
        assert_eq!(editor_command(None).unwrap(), ("vi".to_string(), vec![]));
        assert_eq!(editor_command(Some("  ")).unwrap().0, "vi");
    }

    #[test]
    fn test_editor_value_is_split_shell_style() {
        assert_eq!(
            editor_command(Some("code --wait")).unwrap(),
            ("code".to_string(), vec!["--wait".to_string()])
        );
        assert_eq!(
            editor_command(Some("'/opt/My Editor/bin/edit' -n")).unwrap(),
            ("/opt/My Editor/bin/edit".to_string(), vec!["-n".to_string()])
        );
    }

    #[test]
    fn test_unbalanced_quotes_rejected() {
        assert!(editor_command(Some("vim \"unterminated")).is_err());
    }

    #[test]
    fn test_missing_editor_is_reported() {
        let err = edit_text_with("Intro  (p. 1)\n", Some("pdftoc-no-such-editor")).unwrap_err();
        assert_eq!(err.to_string(), "editor not found: pdftoc-no-such-editor");
    }

    #[cfg(unix)]
    #[test]
    fn test_untouched_file_comes_back() {
        let text = "Intro  (p. 1)\n  Scope  (p. 2)\n";
        assert_eq!(edit_text_with(text, Some("true")).unwrap(), text);
    }

    #[cfg(unix)]
    #[test]
    fn test_failing_editor_is_an_error() {
        let err = edit_text_with("Intro  (p. 1)\n", Some("false")).unwrap_err();
        assert!(err.to_string().starts_with("editor false exited with"));
    }
}
