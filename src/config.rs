use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::api::DEFAULT_PAGE_SIZE;

pub(crate) const DB_ENV: &str = "EMPTUI_DB";
pub(crate) const LOG_ENV: &str = "EMPTUI_LOG";

const DEFAULT_LATENCY_MS: u64 = 500;

/// Runtime settings, resolved from flags, then environment, then defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Settings {
    pub(crate) db_path: PathBuf,
    pub(crate) log_path: PathBuf,
    pub(crate) page_size: u32,
    pub(crate) latency: Duration,
}

impl Settings {
    /// Pull the global flags out of `args`, leaving the subcommand and its own arguments.
    pub(crate) fn from_args(args: &mut Vec<String>) -> Result<Self> {
        let data_dir = data_dir()?;
        Self::resolve(args, std::env::var(DB_ENV).ok(), &data_dir)
    }

    fn resolve(args: &mut Vec<String>, env_db: Option<String>, data_dir: &Path) -> Result<Self> {
        let db_flag = take_flag(args, "--db")?;
        let page_size = take_flag(args, "--page-size")?
            .map(|v| {
                v.parse::<u32>()
                    .ok()
                    .filter(|n| *n > 0)
                    .with_context(|| format!("Invalid --page-size: {v}"))
            })
            .transpose()?
            .unwrap_or(DEFAULT_PAGE_SIZE);
        let latency_ms = take_flag(args, "--latency-ms")?
            .map(|v| {
                v.parse::<u64>()
                    .with_context(|| format!("Invalid --latency-ms: {v}"))
            })
            .transpose()?
            .unwrap_or(DEFAULT_LATENCY_MS);

        let db_path = db_flag
            .or(env_db.filter(|p| !p.is_empty()))
            .map(|p| PathBuf::from(crate::run::shellexpand(&p)))
            .unwrap_or_else(|| data_dir.join("emptui.db"));

        Ok(Self {
            db_path,
            log_path: data_dir.join("emptui.log"),
            page_size,
            latency: Duration::from_millis(latency_ms),
        })
    }
}

/// Remove `flag <value>` from `args`, returning the value.
fn take_flag(args: &mut Vec<String>, flag: &str) -> Result<Option<String>> {
    let Some(pos) = args.iter().position(|a| a == flag) else {
        return Ok(None);
    };
    if pos + 1 >= args.len() {
        anyhow::bail!("{flag} needs a value");
    }
    let value = args.remove(pos + 1);
    args.remove(pos);
    Ok(Some(value))
}

fn data_dir() -> Result<PathBuf> {
    let proj_dirs = directories::ProjectDirs::from("com", "emptui", "EmpTUI")
        .ok_or_else(|| anyhow::anyhow!("Could not determine data directory"))?;
    let data_dir = proj_dirs.data_dir();
    std::fs::create_dir_all(data_dir)
        .with_context(|| format!("Failed to create data directory: {}", data_dir.display()))?;
    Ok(data_dir.to_path_buf())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_defaults() {
        let mut a = args(&["emptui"]);
        let s = Settings::resolve(&mut a, None, Path::new("/data")).unwrap();
        assert_eq!(s.db_path, PathBuf::from("/data/emptui.db"));
        assert_eq!(s.log_path, PathBuf::from("/data/emptui.log"));
        assert_eq!(s.page_size, DEFAULT_PAGE_SIZE);
        assert_eq!(s.latency, Duration::from_millis(500));
        assert_eq!(a, args(&["emptui"]));
    }

    #[test]
    fn test_flags_are_consumed() {
        let mut a = args(&[
            "emptui",
            "--page-size",
            "10",
            "transactions",
            "--db",
            "/tmp/x.db",
            "--latency-ms",
            "0",
            "--page",
            "2",
        ]);
        let s = Settings::resolve(&mut a, None, Path::new("/data")).unwrap();
        assert_eq!(s.page_size, 10);
        assert_eq!(s.db_path, PathBuf::from("/tmp/x.db"));
        assert!(s.latency.is_zero());
        assert_eq!(a, args(&["emptui", "transactions", "--page", "2"]));
    }

    #[test]
    fn test_flag_beats_env() {
        let mut a = args(&["emptui", "--db", "/flag.db"]);
        let s = Settings::resolve(&mut a, Some("/env.db".into()), Path::new("/data")).unwrap();
        assert_eq!(s.db_path, PathBuf::from("/flag.db"));

        let mut b = args(&["emptui"]);
        let s = Settings::resolve(&mut b, Some("/env.db".into()), Path::new("/data")).unwrap();
        assert_eq!(s.db_path, PathBuf::from("/env.db"));
    }

    #[test]
    fn test_bad_values_rejected() {
        let mut a = args(&["emptui", "--page-size", "0"]);
        assert!(Settings::resolve(&mut a, None, Path::new("/data")).is_err());

        let mut b = args(&["emptui", "--latency-ms", "soon"]);
        assert!(Settings::resolve(&mut b, None, Path::new("/data")).is_err());

        let mut c = args(&["emptui", "--db"]);
        assert!(Settings::resolve(&mut c, None, Path::new("/data")).is_err());
    }
}
