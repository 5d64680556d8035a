use std::borrow::Cow;

use crate::diff::result::DiffLine;

/// Configures line normalization before diffing.
///
/// The defaults compare lines verbatim.
#[derive(Debug, Clone, Default)]
pub struct DiffOptions {
    /// Trim leading and trailing whitespace from every line.
    pub trim: bool,
    /// Drop empty lines (after trimming, when enabled).
    pub ignore_blank: bool,
    /// Drop comment lines starting with `!` (IOS) or `#` (RouterOS).
    pub ignore_comments: bool,
}

/// Diff two command lists verbatim.
pub fn diff_commands_detailed<S: AsRef<str>>(previous: &[S], next: &[S]) -> Vec<DiffLine> {
    diff_with_options(previous, next, &DiffOptions::default())
}

/// Diff two command lists after applying the normalization in `opts`.
pub fn diff_with_options<S: AsRef<str>>(
    previous: &[S],
    next: &[S],
    opts: &DiffOptions,
) -> Vec<DiffLine> {
    let prev = normalize(previous, opts);
    let next = normalize(next, opts);
    let table = lcs_table(&prev, &next);
    let script = backtrack(&prev, &next, &table);
    merge_changes(script)
}

fn normalize<'a, S: AsRef<str>>(lines: &'a [S], opts: &DiffOptions) -> Vec<Cow<'a, str>> {
    lines
        .iter()
        .map(|line| {
            let raw = line.as_ref();
            if opts.trim {
                Cow::Borrowed(raw.trim())
            } else {
                Cow::Borrowed(raw)
            }
        })
        .filter(|line| !(opts.ignore_blank && line.trim().is_empty()))
        .filter(|line| !(opts.ignore_comments && is_comment(line)))
        .collect()
}

fn is_comment(line: &str) -> bool {
    let trimmed = line.trim_start();
    trimmed.starts_with('!') || trimmed.starts_with('#')
}

/// `table[i][j]` is the LCS length of `prev[..i]` and `next[..j]`.
fn lcs_table(prev: &[Cow<'_, str>], next: &[Cow<'_, str>]) -> Vec<Vec<usize>> {
    let mut table = vec![vec![0usize; next.len() + 1]; prev.len() + 1];
    for i in 1..=prev.len() {
        for j in 1..=next.len() {
            table[i][j] = if prev[i - 1] == next[j - 1] {
                table[i - 1][j - 1] + 1
            } else {
                table[i - 1][j].max(table[i][j - 1])
            };
        }
    }
    table
}

fn backtrack(
    prev: &[Cow<'_, str>],
    next: &[Cow<'_, str>],
    table: &[Vec<usize>],
) -> Vec<DiffLine> {
    let mut out = Vec::with_capacity(prev.len().max(next.len()));
    let (mut i, mut j) = (prev.len(), next.len());

    while i > 0 || j > 0 {
        if i > 0 && j > 0 && prev[i - 1] == next[j - 1] {
            out.push(DiffLine::Same {
                text: prev[i - 1].to_string(),
            });
            i -= 1;
            j -= 1;
        } else if j > 0 && (i == 0 || table[i][j - 1] >= table[i - 1][j]) {
            out.push(DiffLine::Add {
                text: next[j - 1].to_string(),
            });
            j -= 1;
        } else {
            out.push(DiffLine::Remove {
                text: prev[i - 1].to_string(),
            });
            i -= 1;
        }
    }

    out.reverse();
    out
}

/// Fold every adjacent `(remove, add)` pair into a single change line.
///
/// Only direct neighbours merge; a remove separated from its add by any other
/// line stays a remove.
fn merge_changes(script: Vec<DiffLine>) -> Vec<DiffLine> {
    let mut out = Vec::with_capacity(script.len());
    let mut iter = script.into_iter().peekable();

    while let Some(line) = iter.next() {
        match line {
            DiffLine::Remove { text: previous } => {
                if matches!(iter.peek(), Some(DiffLine::Add { .. })) {
                    if let Some(DiffLine::Add { text: next }) = iter.next() {
                        out.push(DiffLine::change(previous, next));
                    }
                } else {
                    out.push(DiffLine::Remove { text: previous });
                }
            }
            other => out.push(other),
        }
    }

    out
}
