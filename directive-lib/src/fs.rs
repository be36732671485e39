use std::{
    fs::create_dir_all,
    io::{self, Write},
    path::{Path, PathBuf},
};

use tempfile::NamedTempFile;
use xdg::BaseDirectories;

/// Returns the path to the directive configuration directory. If it doesn't exist when this
/// function is called, it will be created.
pub fn config_dir() -> io::Result<PathBuf> {
    let path = xdg_prefix().get_config_home().ok_or_else(missing_home)?;

    create_dir_all(&path)?;

    Ok(path)
}

/// Returns the path to the directive state directory. If it doesn't exist when this function is
/// called, it will be created.
pub fn state_dir() -> io::Result<PathBuf> {
    let path = xdg_prefix().get_state_home().ok_or_else(missing_home)?;

    create_dir_all(&path)?;

    Ok(path)
}

/// Location of the editor's user settings file, where applied instructions are written.
pub fn editor_settings_path() -> io::Result<PathBuf> {
    let config_home = BaseDirectories::new()
        .get_config_home()
        .ok_or_else(missing_home)?;

    Ok(config_home.join("Code").join("User").join("settings.json"))
}

/// Replace the contents of `path` in one step.
///
/// The data is written to a temporary file next to `path` and renamed over it, so readers see
/// either the old or the new contents, never a partial write.
pub fn write_atomic(path: &Path, contents: &[u8]) -> io::Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    create_dir_all(dir)?;

    let mut file = NamedTempFile::new_in(dir)?;
    file.write_all(contents)?;
    file.as_file().sync_all()?;
    file.persist(path).map_err(|err| err.error)?;

    Ok(())
}

fn xdg_prefix() -> BaseDirectories {
    BaseDirectories::with_prefix("directive")
}

fn missing_home() -> io::Error {
    io::Error::new(io::ErrorKind::NotFound, "$HOME must exist")
}

#[cfg(test)]
mod test {
    use std::fs;

    use tempfile::tempdir;

    use super::*;

    #[test]
    fn test_write_atomic_creates_parents() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("state.toml");

        write_atomic(&path, b"a = 1\n").unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "a = 1\n");
    }

    #[test]
    fn test_write_atomic_replaces() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("settings.json");

        write_atomic(&path, b"old").unwrap();
        write_atomic(&path, b"new").unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "new");
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
    }
}
