//! Fixture file loading.

use std::fs;
use std::path::Path;

use crate::{parse_fixture, NumberingFixture, SpecError};

/// Load a single fixture file.
pub fn load_fixture(path: &Path) -> Result<NumberingFixture, SpecError> {
    let content = fs::read_to_string(path).map_err(|e| SpecError::Load {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;
    parse_fixture(&content, &path.display().to_string())
}

/// Load all fixtures under `dir` (glob: **/*.toml), sorted by relative path.
pub fn load_all_fixtures(dir: &Path) -> Result<Vec<(String, NumberingFixture)>, SpecError> {
    let mut fixtures = Vec::new();
    load_fixtures_recursive(dir, dir, &mut fixtures)?;
    fixtures.sort_by(|a, b| a.0.cmp(&b.0));
    Ok(fixtures)
}

fn load_fixtures_recursive(
    base: &Path,
    dir: &Path,
    fixtures: &mut Vec<(String, NumberingFixture)>,
) -> Result<(), SpecError> {
    if !dir.is_dir() {
        return Ok(());
    }

    for entry in fs::read_dir(dir).map_err(|e| SpecError::Load {
        path: dir.display().to_string(),
        message: e.to_string(),
    })? {
        let entry = entry.map_err(|e| SpecError::Load {
            path: dir.display().to_string(),
            message: e.to_string(),
        })?;
        let path = entry.path();

        if path.is_dir() {
            load_fixtures_recursive(base, &path, fixtures)?;
        } else if path.extension().map_or(false, |e| e == "toml") {
            let relative = path.strip_prefix(base).unwrap_or(&path);
            let fixture = load_fixture(&path)?;
            fixtures.push((relative.display().to_string(), fixture));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_load_fixture() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("fixtures")
            .join("article-sections.toml");
        let fixture = load_fixture(&path).unwrap();
        assert!(fixture.title.is_some());
    }

    #[test]
    fn test_load_all_fixtures_sorted() {
        let dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures");
        let fixtures = load_all_fixtures(&dir).unwrap();
        assert!(fixtures.len() >= 4);
        let names: Vec<&str> = fixtures.iter().map(|(n, _)| n.as_str()).collect();
        let mut sorted = names.clone();
        sorted.sort();
        assert_eq!(names, sorted);
    }

    #[test]
    fn test_skips_other_files() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("notes.txt"), "not a fixture").unwrap();
        let mut file = fs::File::create(dir.path().join("one.toml")).unwrap();
        writeln!(file, "blocks = [\"1. A\"]").unwrap();

        let fixtures = load_all_fixtures(dir.path()).unwrap();
        assert_eq!(fixtures.len(), 1);
        assert_eq!(fixtures[0].0, "one.toml");
    }

    #[test]
    fn test_missing_directory_is_empty() {
        let fixtures = load_all_fixtures(Path::new("/nonexistent/fixtures")).unwrap();
        assert!(fixtures.is_empty());
    }
}
