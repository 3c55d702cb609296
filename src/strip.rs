//! Removal of logging calls from a TypeScript source file.
//!
//! The stripper works on plain text, in four passes applied in order:
//! 1. logging statements whose argument list holds no `)` are removed with a
//!    bounded pattern (the list may span lines): whole lines go with their
//!    line break, a statement sharing a line with other code is cut out of it,
//! 2. a line scan drops any remaining line that opens a logging call and, when
//!    that line does not also close the statement with `);`, every following
//!    line up to and including the first one that does,
//! 3. dead field declarations (the log file path member) are removed,
//! 4. namespace imports (`import * as fs from 'fs';`) are removed when none of
//!    their usages survive in the text.
//!
//! Lines that are not part of a removed statement are kept byte for byte and
//! in order. Running the stripper on its own output changes nothing.
//!
//! Calls with nested parentheses or string literals containing `);` may be
//! cut short by the line scan; there is no real parser behind this.

use std::fs;
use std::io::Write;
use std::path::Path;

use lazy_static::lazy_static;
use regex::Regex;
use serde::Deserialize;
use tempfile::NamedTempFile;
use tracing::{debug, info};

use crate::error::{Result, ToolError};

lazy_static! {
    static ref NAMESPACE_IMPORT: Regex = Regex::new(
        r#"(?m)^[ \t]*import \* as ([A-Za-z_$][\w$]*) from ["']([^"']+)["'];[ \t]*(?:\r?\n|$)"#
    )
    .unwrap();
}

const STATEMENT_END: &str = ");";

/// A namespace import that may be pruned once its usages are gone.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ImportRule {
    pub binding: String,
    pub module: String,
    /// Substrings that keep the import alive. Empty means `<binding>.` not
    /// preceded by an identifier character or a dot.
    #[serde(default)]
    pub usages: Vec<String>,
}

impl ImportRule {
    pub fn new(binding: &str, module: &str, usages: &[&str]) -> Self {
        Self {
            binding: binding.to_string(),
            module: module.to_string(),
            usages: usages.iter().map(|u| u.to_string()).collect(),
        }
    }

    pub fn is_used_in(&self, text: &str) -> bool {
        if self.usages.is_empty() {
            let member = format!("{}.", self.binding);
            return text.match_indices(&member).any(|(at, _)| {
                text[..at]
                    .chars()
                    .next_back()
                    .is_none_or(|c| !(c.is_alphanumeric() || c == '_' || c == '$' || c == '.'))
            });
        }
        self.usages.iter().any(|usage| text.contains(usage.as_str()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StripRules {
    /// The call expression to strip, without the opening parenthesis.
    pub call: String,
    pub dead_fields: Vec<String>,
    pub imports: Vec<ImportRule>,
}

impl Default for StripRules {
    fn default() -> Self {
        Self {
            call: "this.log".to_string(),
            dead_fields: vec!["private logFilePath: string;".to_string()],
            imports: vec![
                ImportRule::new("fs", "fs", &["fs.appendFileSync", "fs.existsSync"]),
                ImportRule::new("path", "path", &["path.join"]),
            ],
        }
    }
}

impl StripRules {
    fn opener(&self) -> String {
        format!("{}(", self.call)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StripReport {
    pub single_line_calls: usize,
    pub multi_line_calls: usize,
    /// Lines dropped by the line scan, call lines included.
    pub lines_dropped: usize,
    pub dead_fields: usize,
    pub pruned_imports: Vec<String>,
    pub changed: bool,
}

impl StripReport {
    pub fn calls_removed(&self) -> usize {
        self.single_line_calls + self.multi_line_calls
    }
}

#[derive(Debug, Clone)]
pub struct StripOutcome {
    pub text: String,
    pub report: StripReport,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteMode {
    InPlace,
    DryRun,
}

/// Pass 1: statements `<call>(...);` without a `)` in the arguments. A
/// statement alone on its line takes the line with it; one that ends a line
/// takes the blanks before it; anywhere else only the statement and the
/// blanks after it go.
pub fn strip_single_line_calls(text: &str, rules: &StripRules) -> Result<(String, usize)> {
    let call = regex::escape(&rules.call);
    let whole_line = Regex::new(&format!(r"(?m)^[ \t]*{call}\([^)]*\);[ \t]*(?:\r?\n|$)"))?;
    let line_end = Regex::new(&format!(r"(?m)[ \t]*{call}\([^)]*\);[ \t]*(\r?)$"))?;
    let inline = Regex::new(&format!(r"{call}\([^)]*\);[ \t]*"))?;

    let mut removed = whole_line.find_iter(text).count();
    let current = whole_line.replace_all(text, "");
    removed += line_end.find_iter(&current).count();
    let current = line_end.replace_all(&current, "${1}");
    removed += inline.find_iter(&current).count();
    let current = inline.replace_all(&current, "").into_owned();
    Ok((current, removed))
}

/// Pass 2: returns the text, the number of calls and the number of lines dropped.
pub fn strip_multi_line_calls(text: &str, rules: &StripRules) -> (String, usize, usize) {
    let opener = rules.opener();
    let mut kept: Vec<&str> = Vec::new();
    let mut inside_call = false;
    let mut calls = 0;
    let mut dropped = 0;
    for line in text.split('\n') {
        if inside_call {
            dropped += 1;
            if line.contains(STATEMENT_END) {
                inside_call = false;
            }
            continue;
        }
        if line.contains(&opener) {
            calls += 1;
            dropped += 1;
            inside_call = !line.contains(STATEMENT_END);
            continue;
        }
        kept.push(line);
    }
    if inside_call {
        debug!(calls, "unterminated call ran to the end of the text");
    }
    (kept.join("\n"), calls, dropped)
}

/// Pass 3
pub fn remove_dead_fields(text: &str, rules: &StripRules) -> Result<(String, usize)> {
    let mut current = text.to_string();
    let mut removed = 0;
    for field in &rules.dead_fields {
        let declaration = Regex::new(&format!(
            r"(?m)^[ \t]*{}[ \t]*(?:\r?\n|$)",
            regex::escape(field)
        ))?;
        removed += declaration.find_iter(&current).count();
        current = declaration.replace_all(&current, "").into_owned();
    }
    Ok((current, removed))
}

/// Pass 4: returns the text and the bindings whose import line was removed.
pub fn prune_imports(text: &str, rules: &StripRules) -> (String, Vec<String>) {
    let mut current = text.to_string();
    let mut pruned = Vec::new();
    for rule in &rules.imports {
        if rule.is_used_in(&current) {
            debug!(binding = %rule.binding, "import still in use");
            continue;
        }
        let mut hit = false;
        current = NAMESPACE_IMPORT
            .replace_all(&current, |caps: &regex::Captures| {
                if caps[1] == *rule.binding && caps[2] == *rule.module {
                    hit = true;
                    String::new()
                } else {
                    caps[0].to_string()
                }
            })
            .into_owned();
        if hit {
            pruned.push(rule.binding.clone());
        }
    }
    (current, pruned)
}

pub fn strip(text: &str, rules: &StripRules) -> Result<StripOutcome> {
    let (current, single_line_calls) = strip_single_line_calls(text, rules)?;
    let (current, multi_line_calls, lines_dropped) = strip_multi_line_calls(&current, rules);
    let (current, dead_fields) = remove_dead_fields(&current, rules)?;
    let (current, pruned_imports) = prune_imports(&current, rules);
    let report = StripReport {
        single_line_calls,
        multi_line_calls,
        lines_dropped,
        dead_fields,
        pruned_imports,
        changed: current != text,
    };
    Ok(StripOutcome { text: current, report })
}

/// Strip the file at `path`. In place, the new text goes to a temporary file
/// next to the original which is then renamed over it; an unchanged file is
/// left alone.
pub fn strip_file(path: &Path, rules: &StripRules, mode: WriteMode) -> Result<StripReport> {
    let original = fs::read_to_string(path).map_err(|e| ToolError::io(path, "read", e))?;
    let StripOutcome { text, report } = strip(&original, rules)?;
    info!(
        path = %path.display(),
        calls = report.calls_removed(),
        lines = report.lines_dropped,
        fields = report.dead_fields,
        imports = ?report.pruned_imports,
        "stripped"
    );
    if !report.changed {
        info!(path = %path.display(), "nothing to strip");
        return Ok(report);
    }
    match mode {
        WriteMode::DryRun => debug!(path = %path.display(), "dry run, file left untouched"),
        WriteMode::InPlace => replace_contents(path, &text)?,
    }
    Ok(report)
}

fn replace_contents(path: &Path, text: &str) -> Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let permissions = fs::metadata(path)
        .map_err(|e| ToolError::io(path, "stat", e))?
        .permissions();
    let mut staged =
        NamedTempFile::new_in(dir).map_err(|e| ToolError::io(dir, "create temporary file", e))?;
    staged
        .write_all(text.as_bytes())
        .map_err(|e| ToolError::io(staged.path(), "write", e))?;
    staged
        .as_file()
        .sync_all()
        .map_err(|e| ToolError::io(staged.path(), "sync", e))?;
    fs::set_permissions(staged.path(), permissions)
        .map_err(|e| ToolError::io(staged.path(), "set permissions", e))?;
    staged
        .persist(path)
        .map_err(|e| ToolError::io(path, "rename", e.error))?;
    debug!(path = %path.display(), bytes = text.len(), "replaced");
    Ok(())
}
