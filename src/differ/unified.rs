//! Line-based unified diff computation.

use std::fmt::Write;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tag {
    Equal,
    Delete,
    Insert,
}

/// An opcode covering `a[a1..a2]` and `b[b1..b2]` with one edit tag.
#[derive(Debug, Clone, Copy)]
struct Opcode {
    tag: Tag,
    a1: usize,
    a2: usize,
    b1: usize,
    b2: usize,
}

/// Computes a unified diff between two texts, returning the raw diff lines.
///
/// Returns an empty vector when the texts have no differing lines. The first
/// two lines of a non-empty result are the `--- {from_file}` and
/// `+++ {to_file}` headers.
pub(super) fn unified_diff(
    a: &str,
    b: &str,
    from_file: &str,
    to_file: &str,
    context: usize,
) -> Vec<String> {
    let a_lines: Vec<&str> = a.lines().collect();
    let b_lines: Vec<&str> = b.lines().collect();

    let groups = grouped_opcodes(&opcodes(&a_lines, &b_lines), context);
    if groups.is_empty() {
        return Vec::new();
    }

    let mut out = Vec::new();
    out.push(format!("--- {}", from_file));
    out.push(format!("+++ {}", to_file));

    for group in &groups {
        let (first, last) = match (group.first(), group.last()) {
            (Some(first), Some(last)) => (first, last),
            _ => continue,
        };

        let mut header = String::from("@@ -");
        write_range(&mut header, first.a1, last.a2);
        header.push_str(" +");
        write_range(&mut header, first.b1, last.b2);
        header.push_str(" @@");
        out.push(header);

        for op in group {
            match op.tag {
                Tag::Equal => {
                    for line in &a_lines[op.a1..op.a2] {
                        out.push(format!(" {}", line));
                    }
                }
                Tag::Delete => {
                    for line in &a_lines[op.a1..op.a2] {
                        out.push(format!("-{}", line));
                    }
                }
                Tag::Insert => {
                    for line in &b_lines[op.b1..op.b2] {
                        out.push(format!("+{}", line));
                    }
                }
            }
        }
    }

    out
}

/// Writes a unified-diff range for the half-open line interval [start, stop).
fn write_range(out: &mut String, start: usize, stop: usize) {
    let length = stop - start;
    if length == 1 {
        let _ = write!(out, "{}", start + 1);
    } else {
        // An empty range points at the line before the insertion position.
        let beginning = if length == 0 { start } else { start + 1 };
        let _ = write!(out, "{},{}", beginning, length);
    }
}

/// Produces coalesced edit opcodes from a longest-common-subsequence walk.
///
/// Within a replaced region all deletions precede all insertions, which is
/// what the unified format renders.
fn opcodes(a: &[&str], b: &[&str]) -> Vec<Opcode> {
    let n = a.len();
    let m = b.len();

    // lcs[i][j] holds the LCS length of a[i..] and b[j..].
    let mut lcs = vec![vec![0u32; m + 1]; n + 1];
    for i in (0..n).rev() {
        for j in (0..m).rev() {
            lcs[i][j] = if a[i] == b[j] {
                lcs[i + 1][j + 1] + 1
            } else {
                lcs[i + 1][j].max(lcs[i][j + 1])
            };
        }
    }

    let mut ops: Vec<Opcode> = Vec::new();
    let push = |ops: &mut Vec<Opcode>, tag: Tag, a1: usize, a2: usize, b1: usize, b2: usize| {
        if let Some(last) = ops.last_mut() {
            if last.tag == tag && last.a2 == a1 && last.b2 == b1 {
                last.a2 = a2;
                last.b2 = b2;
                return;
            }
        }
        ops.push(Opcode { tag, a1, a2, b1, b2 });
    };

    let (mut i, mut j) = (0, 0);
    while i < n && j < m {
        if a[i] == b[j] {
            push(&mut ops, Tag::Equal, i, i + 1, j, j + 1);
            i += 1;
            j += 1;
        } else if lcs[i + 1][j] >= lcs[i][j + 1] {
            push(&mut ops, Tag::Delete, i, i + 1, j, j);
            i += 1;
        } else {
            push(&mut ops, Tag::Insert, i, i, j, j + 1);
            j += 1;
        }
    }
    if i < n {
        push(&mut ops, Tag::Delete, i, n, j, j);
    }
    if j < m {
        push(&mut ops, Tag::Insert, i, i, j, m);
    }

    ops
}

/// Groups opcodes into hunks, trimming equal runs to the context width.
///
/// Returns no groups when the inputs are identical.
fn grouped_opcodes(ops: &[Opcode], context: usize) -> Vec<Vec<Opcode>> {
    let mut codes: Vec<Opcode> = ops.to_vec();
    if codes.iter().all(|op| op.tag == Tag::Equal) {
        return Vec::new();
    }

    // Clamp the leading and trailing equal runs to the context width.
    if let Some(first) = codes.first_mut() {
        if first.tag == Tag::Equal {
            first.a1 = first.a1.max(first.a2.saturating_sub(context));
            first.b1 = first.b1.max(first.b2.saturating_sub(context));
        }
    }
    if let Some(last) = codes.last_mut() {
        if last.tag == Tag::Equal {
            last.a2 = last.a2.min(last.a1 + context);
            last.b2 = last.b2.min(last.b1 + context);
        }
    }

    let mut groups: Vec<Vec<Opcode>> = Vec::new();
    let mut group: Vec<Opcode> = Vec::new();

    for op in codes {
        let mut op = op;
        // A large equal run ends the current hunk and starts the next one.
        if op.tag == Tag::Equal && op.a2 - op.a1 > 2 * context && !group.is_empty() {
            group.push(Opcode {
                tag: Tag::Equal,
                a1: op.a1,
                a2: (op.a1 + context).min(op.a2),
                b1: op.b1,
                b2: (op.b1 + context).min(op.b2),
            });
            groups.push(std::mem::take(&mut group));
            op.a1 = op.a1.max(op.a2.saturating_sub(context));
            op.b1 = op.b1.max(op.b2.saturating_sub(context));
        }
        group.push(op);
    }

    if !group.is_empty() && !(group.len() == 1 && group[0].tag == Tag::Equal) {
        groups.push(group);
    }

    groups
}
