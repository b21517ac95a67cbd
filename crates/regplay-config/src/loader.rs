use std::path::{Path, PathBuf};

use anyhow::Context;
use tracing::debug;

use crate::Config;

/// Where regplay looks for `config.toml`, machine-wide first and the
/// current project last.
fn discovered_layers() -> Vec<PathBuf> {
    let mut paths = vec![PathBuf::from("/etc/regplay/config.toml")];
    paths.extend(dirs::home_dir().map(|h| h.join(".config/regplay/config.toml")));
    paths.extend(dirs::config_dir().map(|c| c.join("regplay/config.toml")));
    paths.push(PathBuf::from(".regplay/config.toml"));
    paths.push(PathBuf::from("regplay.toml"));
    paths
}

/// Build the effective settings.  Every discovered file that exists is
/// overlaid in order, then `explicit` (from `--config`), which must exist.
/// Keys nobody sets keep their built-in defaults.
pub fn load(explicit: Option<&Path>) -> anyhow::Result<Config> {
    let mut settings = toml::Table::new();
    let mut sources = Vec::new();

    let found = discovered_layers().into_iter().filter(|p| p.is_file());
    for path in found.chain(explicit.map(Path::to_path_buf)) {
        debug!(path = %path.display(), "applying config layer");
        overlay(&mut settings, read_layer(&path)?);
        sources.push(path.display().to_string());
    }

    toml::Value::Table(settings).try_into().with_context(|| {
        if sources.is_empty() {
            "built-in regplay defaults are inconsistent".to_string()
        } else {
            format!("bad regplay settings in {}", sources.join(", "))
        }
    })
}

fn read_layer(path: &Path) -> anyhow::Result<toml::Table> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("cannot open regplay config {}", path.display()))?;
    raw.parse::<toml::Table>()
        .with_context(|| format!("regplay config {} is not valid TOML", path.display()))
}

/// Lay `layer` over `base`.  Sections (`[matcher]`, `[engine]`, ...) merge
/// key by key; any other value in `layer` replaces the one below it.
fn overlay(base: &mut toml::Table, layer: toml::Table) {
    for (key, value) in layer {
        let toml::Value::Table(above) = value else {
            base.insert(key, value);
            continue;
        };
        if let Some(toml::Value::Table(below)) = base.get_mut(&key) {
            overlay(below, above);
            continue;
        }
        base.insert(key, toml::Value::Table(above));
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;
    use crate::MatcherKind;

    fn table(s: &str) -> toml::Table {
        s.parse().unwrap()
    }

    #[test]
    fn later_layer_replaces_scalars() {
        let mut base = table("x = 1");
        overlay(&mut base, table("x = 2"));
        assert_eq!(base["x"].as_integer(), Some(2));
    }

    #[test]
    fn sections_merge_key_by_key() {
        let mut base = table("[matcher]\nbase_url = \"http://a:8000\"\ntimeout_ms = 900");
        overlay(&mut base, table("[matcher]\nbase_url = \"http://b:8000\""));
        assert_eq!(base["matcher"]["base_url"].as_str(), Some("http://b:8000"));
        assert_eq!(base["matcher"]["timeout_ms"].as_integer(), Some(900));
    }

    #[test]
    fn missing_explicit_file_is_reported_by_path() {
        let err = load(Some(Path::new("/tmp/regplay_nonexistent_config_xyz.toml"))).unwrap_err();
        assert!(format!("{err:#}").contains("regplay_nonexistent_config_xyz.toml"));
    }

    #[test]
    fn explicit_file_overrides_defaults() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            f,
            "[matcher]\nprovider = \"mock\"\nmax_matches = 10\n\n[engine]\nmin_pending_ms = 0"
        )
        .unwrap();
        let cfg = load(Some(f.path())).unwrap();
        assert_eq!(cfg.matcher.provider, MatcherKind::Mock);
        assert_eq!(cfg.matcher.max_matches, 10);
        assert_eq!(cfg.engine.min_pending_ms, 0);
        assert_eq!(cfg.engine.debounce_ms, 250);
    }

    #[test]
    fn mistyped_value_names_the_offending_file() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        writeln!(f, "[engine]\ndebounce_ms = \"soon\"").unwrap();
        let err = load(Some(f.path())).unwrap_err();
        assert!(err.to_string().contains(&f.path().display().to_string()));
    }

    #[test]
    fn broken_toml_is_rejected() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        writeln!(f, "[engine").unwrap();
        let err = load(Some(f.path())).unwrap_err();
        assert!(err.to_string().contains("not valid TOML"));
    }
}
