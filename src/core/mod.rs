pub mod advisor;
pub mod error;
pub mod input;
pub mod language;
pub mod profile;
pub mod report;
pub mod score;
pub mod tables;

use crate::config::{CONFIG_FILE_NAME, Config, LoadedConfig};
use crate::core::profile::CandidateProfile;
use crate::core::report::{CategoryLine, ConfigSummary, FinalReport, ProfileFailure, ProfileReport};
use crate::core::score::{ScoreCategory, ScoreEngine};
use crate::core::tables::PointTables;
use crate::utils::fs as fs_utils;
use anyhow::{Context, Result, bail};
use std::borrow::Cow;
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunProfile {
    Full,
    ScoreOnly,
    AdviceOnly,
}

/// Built-in tables unless `[tables].path` points somewhere else.
pub fn load_tables(loaded: &LoadedConfig, cwd: &Path) -> Result<Cow<'static, PointTables>> {
    match loaded.config.tables.override_path(&loaded.base_dir(cwd)) {
        Some(path) => Ok(Cow::Owned(PointTables::load(&path)?)),
        None => Ok(Cow::Borrowed(PointTables::builtin())),
    }
}

/// Files the run itself reads (the config and a table override); a batch walk never scores them.
pub fn support_files(loaded: &LoadedConfig, cwd: &Path) -> Vec<PathBuf> {
    let tables = loaded.config.tables.override_path(&loaded.base_dir(cwd));
    loaded
        .source
        .iter()
        .cloned()
        .chain(tables)
        .filter_map(|path| path.canonicalize().ok())
        .collect()
}

/// Score one profile file, or every profile file under a directory.
pub fn run_profiles(
    target: &Path,
    cfg: &Config,
    tables: &PointTables,
    run: RunProfile,
    skip: &[PathBuf],
) -> Result<FinalReport> {
    if !target.exists() {
        bail!("path does not exist: {}", target.display());
    }

    let engine = ScoreEngine::new(tables);
    let mut profiles = Vec::new();
    let mut failures = Vec::new();

    if target.is_dir() {
        let root = target
            .canonicalize()
            .with_context(|| format!("failed to canonicalize {}", target.display()))?;
        let files = collect_profile_files(&root, cfg, skip);
        if files.is_empty() {
            bail!(
                "no profile files ({}) found under {}",
                cfg.scan.extensions.join(", "),
                root.display()
            );
        }

        for path in files {
            let source = fs_utils::relative_path(&root, &path);
            match load_profile(&path) {
                Ok(profile) => {
                    tracing::info!(source = %source, "scoring profile");
                    profiles.push(evaluate_profile(source, profile, &engine, cfg, run));
                }
                Err(err) => {
                    tracing::warn!(source = %source, "skipping invalid profile");
                    failures.push(ProfileFailure {
                        source,
                        error: format!("{err:#}"),
                    });
                }
            }
        }
    } else {
        let profile = load_profile(target)?;
        let source = target.display().to_string();
        profiles.push(evaluate_profile(source, profile, &engine, cfg, run));
    }

    let exit = report::evaluate_exit(&profiles, &failures, cfg);

    Ok(FinalReport {
        run,
        tables_version: tables.version.clone(),
        profiles,
        failures,
        config: ConfigSummary::from(cfg),
        exit,
    })
}

pub fn load_profile(path: &Path) -> Result<CandidateProfile> {
    let input = fs_utils::read_profile(path)?;
    CandidateProfile::try_from(&input)
        .with_context(|| format!("invalid profile {}", path.display()))
}

pub fn evaluate_profile(
    source: String,
    profile: CandidateProfile,
    engine: &ScoreEngine<'_>,
    cfg: &Config,
    run: RunProfile,
) -> ProfileReport {
    let result = engine.score(&profile);
    let with_spouse = profile.has_spouse();

    let categories = ScoreCategory::ALL
        .into_iter()
        .filter(|category| with_spouse || *category != ScoreCategory::SpousePartner)
        .map(|category| CategoryLine {
            category,
            points: result.breakdown.get(category),
            ceiling: category.ceiling(engine.tables(), with_spouse),
        })
        .collect();

    let wants_advice = match run {
        RunProfile::Full => cfg.advice.enabled,
        RunProfile::ScoreOnly => false,
        RunProfile::AdviceOnly => true,
    };
    let analysis = wants_advice.then(|| {
        let mut analysis = advisor::analyze(&profile, result.score, &result.breakdown);
        if cfg.advice.max_suggestions > 0 {
            analysis.suggestions.truncate(cfg.advice.max_suggestions);
        }
        analysis
    });

    ProfileReport {
        source,
        standing: score::standing_for_score(result.score),
        profile,
        result,
        categories,
        analysis,
    }
}

fn collect_profile_files(root: &Path, cfg: &Config, skip: &[PathBuf]) -> Vec<PathBuf> {
    let max_bytes = cfg.scan.max_file_size_kb.saturating_mul(1024);
    let mut files = Vec::new();

    for entry in WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| should_visit(entry, &cfg.scan.exclude))
        .filter_map(Result::ok)
    {
        if !entry.file_type().is_file() {
            continue;
        }
        if entry.file_name() == CONFIG_FILE_NAME || skip.iter().any(|path| path == entry.path()) {
            tracing::debug!(path = %entry.path().display(), "skipping support file");
            continue;
        }
        if !fs_utils::has_extension(entry.path(), &cfg.scan.extensions) {
            continue;
        }

        let too_large = entry
            .metadata()
            .map(|metadata| metadata.len() > max_bytes)
            .unwrap_or(true);
        if too_large {
            tracing::warn!(path = %entry.path().display(), "skipping oversized or unreadable file");
            continue;
        }

        files.push(entry.into_path());
    }

    files
}

fn should_visit(entry: &DirEntry, excludes: &[String]) -> bool {
    if !entry.file_type().is_dir() {
        return true;
    }

    let dir_name = entry.file_name().to_string_lossy();
    !excludes
        .iter()
        .any(|excluded| excluded.eq_ignore_ascii_case(&dir_name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    const PROFILE_TOML: &str = r#"
age = 30
education = "bachelor"
canadianWorkExperience = "none"

[firstLanguage]
speaking = 9
listening = 9
reading = 9
writing = 9
"#;

    #[test]
    fn scores_a_directory_and_collects_failures() {
        let dir = tempfile::tempdir().expect("tempdir");
        fs::write(dir.path().join("alice.toml"), PROFILE_TOML).expect("write profile");
        fs::write(
            dir.path().join("broken.json"),
            r#"{"age": 30, "education": "doctorate", "firstLanguage": {"speaking": 9, "listening": 9, "reading": 9, "writing": 9}, "canadianWorkExperience": "none"}"#,
        )
        .expect("write profile");
        fs::write(dir.path().join("notes.md"), "not a profile").expect("write notes");
        fs::create_dir(dir.path().join("target")).expect("mkdir");
        fs::write(dir.path().join("target").join("skip.toml"), "garbage").expect("write");

        let report = run_profiles(
            dir.path(),
            &Config::default(),
            PointTables::builtin(),
            RunProfile::Full,
            &[],
        )
        .expect("batch run");

        assert_eq!(report.profiles.len(), 1);
        assert_eq!(report.profiles[0].source, "alice.toml");
        assert_eq!(report.profiles[0].result.score, 399);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].source, "broken.json");
        assert!(!report.exit.ok);
    }

    #[test]
    fn score_only_skips_the_advisor() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("alice.toml");
        fs::write(&path, PROFILE_TOML).expect("write profile");

        let report = run_profiles(
            &path,
            &Config::default(),
            PointTables::builtin(),
            RunProfile::ScoreOnly,
            &[],
        )
        .expect("single run");
        assert!(report.profiles[0].analysis.is_none());
        assert_eq!(report.profiles[0].categories.len(), 3);
        assert!(report.exit.ok);
    }

    #[test]
    fn max_suggestions_truncates_advice() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("alice.toml");
        fs::write(&path, PROFILE_TOML).expect("write profile");

        let mut cfg = Config::default();
        cfg.advice.max_suggestions = 2;
        let report = run_profiles(&path, &cfg, PointTables::builtin(), RunProfile::Full, &[])
            .expect("run");
        let analysis = report.profiles[0].analysis.as_ref().expect("advice");
        assert_eq!(analysis.suggestions.len(), 2);
    }

    #[test]
    fn empty_directory_is_an_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let err = run_profiles(
            dir.path(),
            &Config::default(),
            PointTables::builtin(),
            RunProfile::Full,
            &[],
        )
        .expect_err("nothing to score");
        assert!(err.to_string().contains("no profile files"));
    }

    #[test]
    fn batch_walk_skips_the_config_and_table_override() {
        let dir = tempfile::tempdir().expect("tempdir");
        fs::write(dir.path().join("alice.toml"), PROFILE_TOML).expect("write profile");
        let settings = dir.path().join("settings.toml");
        fs::write(&settings, "[tables]\npath = \"grid.toml\"\n").expect("write config");
        let grid = PointTables::builtin().to_toml_string().expect("serializable");
        fs::write(dir.path().join("grid.toml"), grid).expect("write tables");

        let loaded = crate::config::load_config(Some(&settings), dir.path()).expect("config");
        let tables = load_tables(&loaded, dir.path()).expect("override tables");
        let skip = support_files(&loaded, dir.path());
        assert_eq!(skip.len(), 2);

        let report = run_profiles(dir.path(), &loaded.config, &tables, RunProfile::Full, &skip)
            .expect("batch run");
        assert_eq!(report.profiles.len(), 1);
        assert_eq!(report.profiles[0].source, "alice.toml");
        assert!(report.failures.is_empty(), "{:?}", report.failures);
        assert!(report.exit.ok);
    }

    #[test]
    fn invalid_single_profile_is_fatal() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("bad.toml");
        fs::write(&path, PROFILE_TOML.replace("bachelor", "doctorate")).expect("write");
        let err = load_profile(&path).expect_err("invalid education");
        assert!(format!("{err:#}").contains("doctorate"));
    }
}
