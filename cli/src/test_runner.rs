//! Runner for `.test.md` conversion fixtures.
//!
//! A fixture is TOML frontmatter between `---` lines followed by the markup
//! to convert. The file's final newline is not part of the markup.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use examdoc::{Document, Run, Theme};

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExpectedRun {
    pub text: String,
    #[serde(default)]
    pub bold: Option<bool>,
    #[serde(default)]
    pub italic: Option<bool>,
    #[serde(default)]
    pub underline: Option<bool>,
    #[serde(default)]
    pub font_size: Option<u32>,
    /// `#RRGGBB`, compared case-insensitively.
    #[serde(default)]
    pub color: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TestConfig {
    /// Human-readable test description.
    #[serde(default)]
    pub description: Option<String>,

    /// Theme file, relative to the fixture.
    #[serde(default)]
    pub theme: Option<PathBuf>,

    /// Expected number of blocks.
    #[serde(default)]
    pub expect_blocks: Option<usize>,

    /// Expected plain-text rendering (trailing whitespace ignored).
    #[serde(default)]
    pub expect_text: Option<String>,

    /// Expected editor JSON, compared structurally.
    #[serde(default)]
    pub expect_json: Option<String>,

    /// Expected runs across all blocks, in order. Only the fields given are
    /// checked, but the run count must match exactly.
    #[serde(default)]
    pub expect_runs: Option<Vec<ExpectedRun>>,
}

/// Parse a `.test.md` file into its TOML config and markup source.
fn parse_test_file(content: &str) -> Result<(TestConfig, &str), String> {
    let content = content.trim_start_matches('\u{feff}'); // strip BOM

    if !content.starts_with("---") {
        return Err("missing opening --- frontmatter delimiter".into());
    }

    let after_open = &content[3..];
    let after_open = after_open
        .strip_prefix('\n')
        .or_else(|| after_open.strip_prefix("\r\n"))
        .unwrap_or(after_open);

    let close_pos = after_open
        .find("\n---")
        .ok_or("missing closing --- frontmatter delimiter")?;

    let toml_str = after_open[..close_pos].trim_end_matches('\r');
    let rest_start = close_pos + 4; // skip \n---
    let rest = &after_open[rest_start..];
    let source = rest
        .strip_prefix("\r\n")
        .or_else(|| rest.strip_prefix('\n'))
        .unwrap_or(rest);
    let source = source.strip_suffix('\n').unwrap_or(source);

    let config: TestConfig =
        toml::from_str(toml_str).map_err(|e| format!("TOML parse error: {}", e))?;

    Ok((config, source))
}

pub enum TestOutcome {
    Pass,
    Fail(String),
}

pub struct TestResult {
    pub path: PathBuf,
    pub description: Option<String>,
    pub outcome: TestOutcome,
}

fn run_single_test(path: &Path) -> TestResult {
    let fail = |description: Option<String>, reason: String| TestResult {
        path: path.to_path_buf(),
        description,
        outcome: TestOutcome::Fail(reason),
    };

    // 1. Read file
    let content = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) => return fail(None, format!("cannot read file: {}", e)),
    };

    // 2. Parse frontmatter
    let (config, source) = match parse_test_file(&content) {
        Ok(pair) => pair,
        Err(e) => return fail(None, format!("frontmatter error: {}", e)),
    };

    let description = config.description.clone();

    // 3. Resolve theme
    let theme = match &config.theme {
        None => Theme::default(),
        Some(rel) => {
            let theme_path = path.parent().unwrap_or(Path::new(".")).join(rel);
            let loaded = std::fs::read_to_string(&theme_path)
                .map_err(|e| format!("cannot read theme {}: {}", theme_path.display(), e))
                .and_then(|s| Theme::from_toml_str(&s).map_err(|e| e.to_string()));
            match loaded {
                Ok(theme) => theme,
                Err(reason) => return fail(description, reason),
            }
        }
    };

    // 4. Convert
    let doc = examdoc::convert_with(source, &theme);

    // 5. Check expectations
    let checks = [
        config.expect_blocks.and_then(|n| check_blocks(&doc, n)),
        config
            .expect_text
            .as_deref()
            .and_then(|t| check_text(&doc, t)),
        config
            .expect_json
            .as_deref()
            .and_then(|j| check_json(&doc, j)),
        config
            .expect_runs
            .as_deref()
            .and_then(|r| check_runs(&doc, r)),
    ];

    let reasons: Vec<String> = checks.into_iter().flatten().collect();
    let outcome = if reasons.is_empty() {
        TestOutcome::Pass
    } else {
        TestOutcome::Fail(reasons.join("\n"))
    };

    TestResult {
        path: path.to_path_buf(),
        description,
        outcome,
    }
}

fn check_blocks(doc: &Document, expected: usize) -> Option<String> {
    let actual = doc.block_count();
    (actual != expected).then(|| format!("expected {} block(s), got {}", expected, actual))
}

fn check_text(doc: &Document, expected: &str) -> Option<String> {
    let actual = doc.to_string();
    let actual = actual.trim_end();
    let expected = expected.trim_end();
    (actual != expected).then(|| {
        format!(
            "text mismatch\n  expected: {:?}\n  actual:   {:?}",
            expected, actual
        )
    })
}

fn check_json(doc: &Document, expected: &str) -> Option<String> {
    let expected: serde_json::Value = match serde_json::from_str(expected) {
        Ok(v) => v,
        Err(e) => return Some(format!("expect_json is not valid JSON: {}", e)),
    };
    let actual = match serde_json::to_value(doc) {
        Ok(v) => v,
        Err(e) => return Some(format!("cannot serialize document: {}", e)),
    };
    (actual != expected).then(|| format!("json mismatch\n  expected: {}\n  actual:   {}", expected, actual))
}

/// Check that actual runs match expectations. Returns `Some(reason)` on mismatch.
fn check_runs(doc: &Document, expected: &[ExpectedRun]) -> Option<String> {
    let actual: Vec<&Run> = doc.runs().collect();

    if actual.len() != expected.len() {
        let actual_texts: Vec<String> = actual.iter().map(|r| format!("  - {:?}", r.text)).collect();
        return Some(format!(
            "expected {} run(s), got {}\n  actual runs:\n{}",
            expected.len(),
            actual.len(),
            if actual_texts.is_empty() {
                "    (none)".to_string()
            } else {
                actual_texts.join("\n")
            }
        ));
    }

    for (i, (run, want)) in actual.iter().zip(expected).enumerate() {
        let format = &run.character_format;
        if run.text != want.text {
            return Some(format!(
                "run[{}]: expected text {:?}, got {:?}",
                i, want.text, run.text
            ));
        }
        let flags = [
            ("bold", want.bold, format.is_bold()),
            ("italic", want.italic, format.is_italic()),
            ("underline", want.underline, format.is_underline()),
        ];
        for (name, want_flag, got) in flags {
            if let Some(want_flag) = want_flag {
                if want_flag != got {
                    return Some(format!(
                        "run[{}] {:?}: expected {}={}, got {}",
                        i, run.text, name, want_flag, got
                    ));
                }
            }
        }
        if let Some(size) = want.font_size {
            if size != format.font_size {
                return Some(format!(
                    "run[{}] {:?}: expected font size {}, got {}",
                    i, run.text, size, format.font_size
                ));
            }
        }
        if let Some(color) = &want.color {
            let got = format.font_color.to_string();
            if !got.eq_ignore_ascii_case(color) {
                return Some(format!(
                    "run[{}] {:?}: expected color {}, got {}",
                    i, run.text, color, got
                ));
            }
        }
    }

    None
}

/// Discover `.test.md` files grouped by category (subfolder relative to root).
/// Files directly in `root` get category "" (uncategorized).
/// Returns a BTreeMap so categories are sorted alphabetically.
fn discover_categorized(root: &Path) -> BTreeMap<String, Vec<PathBuf>> {
    let mut categories: BTreeMap<String, Vec<PathBuf>> = BTreeMap::new();
    collect_tests(root, root, &mut categories);
    for files in categories.values_mut() {
        files.sort();
    }
    categories
}

fn collect_tests(dir: &Path, root: &Path, out: &mut BTreeMap<String, Vec<PathBuf>>) {
    let Ok(entries) = std::fs::read_dir(dir) else {
        log::warn!("cannot read fixture directory {}", dir.display());
        return;
    };
    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            collect_tests(&path, root, out);
        } else if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
            if name.ends_with(".test.md") {
                let category = path
                    .parent()
                    .and_then(|p| p.strip_prefix(root).ok())
                    .map(|p| p.to_string_lossy().replace('\\', "/"))
                    .unwrap_or_default();
                out.entry(category).or_default().push(path);
            }
        }
    }
}

/// List available categories for the given test path.
pub fn list_categories(path: &Path) {
    if path.is_file() {
        eprintln!("(single file, no categories)");
        return;
    }

    let categories = discover_categorized(path);
    if categories.is_empty() {
        eprintln!("no .test.md files found in {}", path.display());
        return;
    }

    eprintln!("available categories:");
    for (cat, files) in &categories {
        let label = if cat.is_empty() { "(root)" } else { cat.as_str() };
        eprintln!("  {} ({} tests)", label, files.len());
    }
}

fn paint(s: &str, code: &str, no_color: bool) -> String {
    if no_color {
        s.to_string()
    } else {
        format!("\x1b[{}m{}\x1b[0m", code, s)
    }
}

fn label_for<'a>(result: &'a TestResult) -> &'a str {
    result.description.as_deref().unwrap_or_else(|| {
        result
            .path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("?")
    })
}

/// Select the categories to run. Unknown names are warned about and skipped.
fn filter_categories<'c>(
    all: &'c BTreeMap<String, Vec<PathBuf>>,
    requested: &[String],
) -> BTreeMap<&'c str, &'c Vec<PathBuf>> {
    if requested.is_empty() {
        return all.iter().map(|(k, v)| (k.as_str(), v)).collect();
    }
    let mut filtered = BTreeMap::new();
    for requested in requested {
        let req = requested.trim_matches('/');
        let mut found = false;
        for (cat, files) in all {
            if cat == req || cat.starts_with(&format!("{}/", req)) {
                filtered.insert(cat.as_str(), files);
                found = true;
            }
        }
        if !found {
            eprintln!(
                "warning: category '{}' not found (available: {})",
                req,
                all.keys()
                    .map(|k| if k.is_empty() { "(root)" } else { k.as_str() })
                    .collect::<Vec<_>>()
                    .join(", ")
            );
        }
    }
    filtered
}

/// Run all `.test.md` files under `path` (or a single file).
/// If `categories` is non-empty, only run tests in those categories.
/// Returns exit code: 0 = all pass, 1 = any failure.
pub fn run_tests(path: &Path, no_color: bool, categories: &[String]) -> i32 {
    let groups: Vec<(String, Vec<PathBuf>)> = if path.is_file() {
        vec![(String::new(), vec![path.to_path_buf()])]
    } else {
        let all_categories = discover_categorized(path);
        if all_categories.is_empty() {
            eprintln!("no .test.md files found in {}", path.display());
            return 1;
        }
        let selected = filter_categories(&all_categories, categories);
        if selected.is_empty() {
            eprintln!("no matching categories found");
            return 1;
        }
        selected
            .into_iter()
            .map(|(cat, files)| (cat.to_string(), files.clone()))
            .collect()
    };

    let mut passed = 0usize;
    let mut failures: Vec<TestResult> = Vec::new();

    for (cat, files) in &groups {
        if !path.is_file() {
            let header = if cat.is_empty() { "(root)" } else { cat.as_str() };
            eprintln!();
            eprintln!("{}", paint(header, "1", no_color));
        }

        for file in files {
            let result = run_single_test(file);
            match &result.outcome {
                TestOutcome::Pass => {
                    passed += 1;
                    eprintln!("  {}  {}", paint("PASS", "32", no_color), label_for(&result));
                }
                TestOutcome::Fail(_) => {
                    eprintln!("  {}  {}", paint("FAIL", "31", no_color), label_for(&result));
                    failures.push(result);
                }
            }
        }
    }

    if !failures.is_empty() {
        eprintln!();
        eprintln!("failures:");
        for f in &failures {
            eprintln!();
            eprintln!("  --- {} ---", f.path.display());
            if let TestOutcome::Fail(reason) = &f.outcome {
                for line in reason.lines() {
                    eprintln!("  {}", line);
                }
            }
        }
    }

    let failed = failures.len();
    eprintln!();
    if failed == 0 {
        eprintln!(
            "test result: {}. {} passed, 0 failed",
            paint("ok", "32", no_color),
            passed
        );
        0
    } else {
        eprintln!(
            "test result: {}. {} passed, {} failed (of {})",
            paint("FAILED", "31", no_color),
            passed,
            failed,
            passed + failed
        );
        1
    }
}
