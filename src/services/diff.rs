//! # 라인 diff 엔진
//!
//! 두 텍스트를 줄 단위로 비교하여 추가/삭제/유지 줄의 목록을 만듭니다.
//! 챕터 버전 비교와 제출 요청(submit request) 리뷰 화면이 이 결과를 그립니다.
//!
//! ## 알고리즘
//! ```text
//! 1. 두 입력을 '\n'으로 나눈다
//! 2. LCS(최장 공통 부분 수열) DP 테이블을 채운다 (O(m·n) 메모리)
//! 3. dp[m][n]에서 역추적하여 LCS 줄 목록을 복원한다
//! 4. (원본, 수정본, LCS) 세 포인터로 걸으며 줄마다 종류를 붙인다
//! ```
//!
//! Myers diff가 아니므로 줄 순서가 뒤바뀐 경우 최소 편집보다 많은 변경을 보고할 수 있습니다.
//! 추가/삭제 통계는 이 방식 기준으로 정의됩니다.
//!
//! HTML이 섞인 입력은 호출하는 쪽에서 먼저 `strip_html()`을 거쳐야 합니다.

use std::sync::LazyLock;

use regex::Regex;

use crate::models::{DiffKind, DiffLine, DiffStats, DiffView, DiffViewMode, SplitRow};

static TAG_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[^>]*>").expect("tag pattern is a valid regex"));

/// 마크업을 평문으로 정규화합니다.
///
/// 1. `<...>` 태그를 모두 제거
/// 2. `&nbsp;` `&lt;` `&gt;` `&amp;` 네 가지 엔티티만 이 순서로 복원
/// 3. 앞뒤 공백 제거
///
/// `&amp;`를 마지막에 풀기 때문에 `&amp;lt;`는 `&lt;`로 한 번만 복원됩니다.
/// 그 밖의 엔티티(`&quot;` 등)는 그대로 남습니다.
pub fn strip_html(input: &str) -> String {
    let without_tags = TAG_PATTERN.replace_all(input, "");
    without_tags
        .replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&amp;", "&")
        .trim()
        .to_string()
}

/// 텍스트를 줄 목록으로 나눕니다. 빈 문자열은 0줄입니다.
fn split_lines(text: &str) -> Vec<&str> {
    if text.is_empty() {
        Vec::new()
    } else {
        text.split('\n').collect()
    }
}

/// `(m+1) × (n+1)` LCS 길이 테이블을 1차원 배열로 펼친 것
///
/// `cells[i * width + j]` = 원본 앞 i줄과 수정본 앞 j줄의 LCS 길이
struct LcsTable {
    width: usize,
    cells: Vec<usize>,
}

impl LcsTable {
    fn build(original: &[&str], modified: &[&str]) -> Self {
        let width = modified.len() + 1;
        let mut cells = vec![0usize; (original.len() + 1) * width];

        for i in 1..=original.len() {
            for j in 1..=modified.len() {
                cells[i * width + j] = if original[i - 1] == modified[j - 1] {
                    cells[(i - 1) * width + (j - 1)] + 1
                } else {
                    cells[(i - 1) * width + j].max(cells[i * width + (j - 1)])
                };
            }
        }

        Self { width, cells }
    }

    fn get(&self, i: usize, j: usize) -> usize {
        self.cells[i * self.width + j]
    }
}

/// LCS 줄 목록을 복원합니다. 길이가 같으면 위쪽(원본 쪽) 이웃으로 이동합니다.
fn longest_common_subsequence<'a>(original: &[&'a str], modified: &[&'a str]) -> Vec<&'a str> {
    let table = LcsTable::build(original, modified);
    let mut lcs = Vec::with_capacity(table.get(original.len(), modified.len()));

    let (mut i, mut j) = (original.len(), modified.len());
    while i > 0 && j > 0 {
        if original[i - 1] == modified[j - 1] {
            lcs.push(original[i - 1]);
            i -= 1;
            j -= 1;
        } else if table.get(i - 1, j) >= table.get(i, j - 1) {
            i -= 1;
        } else {
            j -= 1;
        }
    }

    lcs.reverse();
    lcs
}

/// 두 텍스트의 LCS 길이(줄 수)
pub fn lcs_length(original: &str, modified: &str) -> usize {
    let original = split_lines(original);
    let modified = split_lines(modified);
    LcsTable::build(&original, &modified).get(original.len(), modified.len())
}

/// 두 텍스트의 라인 diff를 계산합니다.
///
/// 한 구간에서 삭제와 추가가 함께 일어나면 삭제 줄이 먼저 나옵니다.
///
/// ```text
/// original = "line1\nline2\nline3"
/// modified = "line1\nlineX\nline3"
///
///   line1   (1, 1)
/// - line2   (2, -)
/// + lineX   (-, 2)
///   line3   (3, 3)
/// ```
pub fn compute_diff(original: &str, modified: &str) -> Vec<DiffLine> {
    let old_lines = split_lines(original);
    let new_lines = split_lines(modified);
    let lcs = longest_common_subsequence(&old_lines, &new_lines);

    let mut diff = Vec::with_capacity(old_lines.len().max(new_lines.len()));
    let (mut i, mut j, mut k) = (0usize, 0usize, 0usize);
    let (mut old_no, mut new_no) = (0usize, 0usize);

    while i < old_lines.len() || j < new_lines.len() {
        let anchor = lcs.get(k).copied();
        match (old_lines.get(i).copied(), new_lines.get(j).copied()) {
            (Some(old), Some(new)) if anchor == Some(old) && anchor == Some(new) => {
                old_no += 1;
                new_no += 1;
                diff.push(DiffLine::unchanged(old, old_no, new_no));
                i += 1;
                j += 1;
                k += 1;
            }
            (Some(old), _) if anchor != Some(old) => {
                old_no += 1;
                diff.push(DiffLine::removed(old, old_no));
                i += 1;
            }
            (_, Some(new)) => {
                new_no += 1;
                diff.push(DiffLine::added(new, new_no));
                j += 1;
            }
            (Some(old), None) => {
                old_no += 1;
                diff.push(DiffLine::removed(old, old_no));
                i += 1;
            }
            (None, None) => break,
        }
    }

    diff
}

/// diff 결과에서 추가/삭제 줄 수를 셉니다.
pub fn calculate_stats(diff: &[DiffLine]) -> DiffStats {
    let (additions, deletions) = diff.iter().fold((0, 0), |(add, del), line| match line.kind {
        DiffKind::Add => (add + 1, del),
        DiffKind::Remove => (add, del + 1),
        DiffKind::Unchanged => (add, del),
    });
    DiffStats::new(additions, deletions)
}

/// "텍스트로 복사"용 직렬화. 줄마다 `+` / `-` / 공백 접두사를 붙입니다.
pub fn render_patch_text(diff: &[DiffLine]) -> String {
    diff.iter()
        .map(|line| format!("{}{}", line.prefix(), line.content))
        .collect::<Vec<_>>()
        .join("\n")
}

/// 분할 보기 행을 만듭니다.
///
/// 연속된 삭제 줄과 그 뒤의 추가 줄을 한 행씩 짝지어 왼쪽/오른쪽에 놓고,
/// 남는 쪽은 반대편 칸을 비워 둡니다. 유지 줄은 양쪽에 같은 줄이 들어갑니다.
pub fn split_rows(diff: &[DiffLine]) -> Vec<SplitRow> {
    let mut rows = Vec::with_capacity(diff.len());
    let mut removed: Vec<DiffLine> = Vec::new();
    let mut added: Vec<DiffLine> = Vec::new();

    for line in diff {
        match line.kind {
            DiffKind::Remove => {
                if !added.is_empty() {
                    flush_change_block(&mut rows, &mut removed, &mut added);
                }
                removed.push(line.clone());
            }
            DiffKind::Add => added.push(line.clone()),
            DiffKind::Unchanged => {
                flush_change_block(&mut rows, &mut removed, &mut added);
                rows.push(SplitRow {
                    left: Some(line.clone()),
                    right: Some(line.clone()),
                });
            }
        }
    }
    flush_change_block(&mut rows, &mut removed, &mut added);

    rows
}

fn flush_change_block(
    rows: &mut Vec<SplitRow>,
    removed: &mut Vec<DiffLine>,
    added: &mut Vec<DiffLine>,
) {
    let height = removed.len().max(added.len());
    let mut left = removed.drain(..);
    let mut right = added.drain(..);
    for _ in 0..height {
        rows.push(SplitRow {
            left: left.next(),
            right: right.next(),
        });
    }
}

/// diff를 계산하고 요청한 보기 모드에 맞는 응답을 만듭니다.
pub fn build_view(original: &str, modified: &str, mode: DiffViewMode) -> DiffView {
    let lines = compute_diff(original, modified);
    let stats = calculate_stats(&lines);
    let patch_text = render_patch_text(&lines);

    let (lines, rows) = match mode {
        DiffViewMode::Unified => (Some(lines), None),
        DiffViewMode::Split => (None, Some(split_rows(&lines))),
    };

    DiffView {
        mode,
        stats,
        lines,
        rows,
        patch_text,
    }
}

/// 줄 수를 셉니다. `compute_diff()`가 나누는 방식과 같습니다.
pub fn line_count(text: &str) -> usize {
    split_lines(text).len()
}

/// `compute_diff()`가 만들 LCS 테이블의 칸 수 `(m+1)·(n+1)`. 넘치면 `usize::MAX`.
pub fn lcs_table_cells(original: &str, modified: &str) -> usize {
    (line_count(original) + 1).saturating_mul(line_count(modified) + 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(diff: &[DiffLine]) -> Vec<DiffKind> {
        diff.iter().map(|l| l.kind).collect()
    }

    #[test]
    fn table_cells_grow_with_the_product_of_both_sides() {
        assert_eq!(lcs_table_cells("", ""), 1);
        assert_eq!(lcs_table_cells("a\nb\nc", "x"), 4 * 2);

        let five_thousand = vec!["line"; 5000].join("\n");
        assert_eq!(lcs_table_cells(&five_thousand, &five_thousand), 5001 * 5001);
    }

    /// 테스트 전용 기준 LCS 길이 (2차원 Vec, 역추적 없음)
    fn reference_lcs_len(a: &[&str], b: &[&str]) -> usize {
        let mut dp = vec![vec![0usize; b.len() + 1]; a.len() + 1];
        for i in 0..a.len() {
            for j in 0..b.len() {
                dp[i + 1][j + 1] = if a[i] == b[j] {
                    dp[i][j] + 1
                } else {
                    dp[i][j + 1].max(dp[i + 1][j])
                };
            }
        }
        dp[a.len()][b.len()]
    }

    fn is_subsequence(needle: &[&str], haystack: &[&str]) -> bool {
        let mut rest = haystack.iter();
        needle.iter().all(|n| rest.any(|h| h == n))
    }

    /// 원본 쪽 줄(삭제+유지)과 수정본 쪽 줄(추가+유지)이 입력을 그대로 재구성하는지,
    /// 유지 줄이 진짜 LCS 길이만큼 나오는지 검사합니다.
    fn assert_diff_properties(original: &str, modified: &str) {
        let diff = compute_diff(original, modified);
        let a = split_lines(original);
        let b = split_lines(modified);

        let old_side: Vec<&str> = diff
            .iter()
            .filter(|l| l.kind != DiffKind::Add)
            .map(|l| l.content.as_str())
            .collect();
        let new_side: Vec<&str> = diff
            .iter()
            .filter(|l| l.kind != DiffKind::Remove)
            .map(|l| l.content.as_str())
            .collect();
        assert_eq!(old_side, a, "old side of {original:?} -> {modified:?}");
        assert_eq!(new_side, b, "new side of {original:?} -> {modified:?}");

        let common: Vec<&str> = diff
            .iter()
            .filter(|l| l.kind == DiffKind::Unchanged)
            .map(|l| l.content.as_str())
            .collect();
        assert!(is_subsequence(&common, &a));
        assert!(is_subsequence(&common, &b));
        assert_eq!(common.len(), reference_lcs_len(&a, &b));
        assert_eq!(lcs_length(original, modified), common.len());

        assert!(diff.iter().all(DiffLine::is_well_formed));

        let stats = calculate_stats(&diff);
        assert_eq!(stats.additions, b.len() - common.len());
        assert_eq!(stats.deletions, a.len() - common.len());
        assert_eq!(stats.total_changes, stats.additions + stats.deletions);
    }

    #[test]
    fn single_line_replacement_lists_removal_before_addition() {
        let diff = compute_diff("line1\nline2\nline3", "line1\nlineX\nline3");

        assert_eq!(
            diff,
            vec![
                DiffLine::unchanged("line1", 1, 1),
                DiffLine::removed("line2", 2),
                DiffLine::added("lineX", 2),
                DiffLine::unchanged("line3", 3, 3),
            ]
        );
        assert_eq!(calculate_stats(&diff), DiffStats::new(1, 1));
        assert_eq!(calculate_stats(&diff).total_changes, 2);
    }

    #[test]
    fn identical_inputs_are_all_unchanged() {
        for text in ["", "one", "a\nb\nc", "dup\ndup\n\ndup", "trailing\n"] {
            let diff = compute_diff(text, text);
            assert!(diff.iter().all(|l| l.kind == DiffKind::Unchanged), "{text:?}");
            assert_eq!(calculate_stats(&diff), DiffStats::new(0, 0));
            assert_eq!(diff.len(), line_count(text));
        }
    }

    #[test]
    fn empty_original_yields_only_additions() {
        let diff = compute_diff("", "first\nsecond");
        assert_eq!(
            diff,
            vec![DiffLine::added("first", 1), DiffLine::added("second", 2)]
        );
    }

    #[test]
    fn empty_modified_yields_only_removals() {
        let diff = compute_diff("first\nsecond", "");
        assert_eq!(
            diff,
            vec![DiffLine::removed("first", 1), DiffLine::removed("second", 2)]
        );
    }

    #[test]
    fn line_numbers_advance_per_side() {
        let diff = compute_diff("a\nb\nc\nd", "a\nc\nx\ny\nd");
        assert_eq!(
            diff,
            vec![
                DiffLine::unchanged("a", 1, 1),
                DiffLine::removed("b", 2),
                DiffLine::unchanged("c", 3, 2),
                DiffLine::added("x", 3),
                DiffLine::added("y", 4),
                DiffLine::unchanged("d", 4, 5),
            ]
        );
    }

    #[test]
    fn trailing_newline_counts_as_an_empty_line() {
        let diff = compute_diff("a", "a\n");
        assert_eq!(kinds(&diff), vec![DiffKind::Unchanged, DiffKind::Add]);
        assert_eq!(diff[1].content, "");
    }

    #[test]
    fn reordered_and_duplicate_lines_keep_lcs_properties() {
        let cases = [
            ("a\nb\nc", "c\nb\na"),
            ("x\nx\nx", "x\ny\nx"),
            ("a\nb\na\nb", "b\na\nb\na"),
            ("", ""),
            ("\n\n", "\n"),
            ("해\n달\n별", "달\n별\n해"),
        ];
        for (original, modified) in cases {
            assert_diff_properties(original, modified);
        }
    }

    #[test]
    fn generated_inputs_keep_lcs_properties() {
        // 작은 알파벳으로 만든 결정적 의사난수 입력
        let alphabet = ["a", "b", "c", ""];
        let mut seed: u32 = 0x2545_f491;
        let mut next = || {
            seed ^= seed << 13;
            seed ^= seed >> 17;
            seed ^= seed << 5;
            seed
        };

        for _ in 0..200 {
            let mut make = || {
                let len = (next() % 7) as usize;
                (0..len)
                    .map(|_| alphabet[(next() % alphabet.len() as u32) as usize])
                    .collect::<Vec<_>>()
                    .join("\n")
            };
            let original = make();
            let modified = make();
            assert_diff_properties(&original, &modified);
        }
    }

    #[test]
    fn strip_html_removes_tags_and_decodes_known_entities() {
        assert_eq!(strip_html("<p>Hello&nbsp;<b>world</b></p>"), "Hello world");
        assert_eq!(strip_html("a &lt;tag&gt; &amp; b"), "a <tag> & b");
        assert_eq!(strip_html("&amp;lt;"), "&lt;");
        assert_eq!(strip_html("&quot;kept&quot;"), "&quot;kept&quot;");
        assert_eq!(strip_html("  <br/>  "), "");
    }

    #[test]
    fn strip_html_on_plain_text_only_trims() {
        for text in ["plain", "  padded text \n", "line1\nline2", "5 > 3", ""] {
            assert_eq!(strip_html(text), text.trim(), "{text:?}");
        }
    }

    #[test]
    fn patch_text_uses_prefixes() {
        let diff = compute_diff("keep\nold", "keep\nnew");
        assert_eq!(render_patch_text(&diff), " keep\n-old\n+new");
    }

    #[test]
    fn split_rows_pair_removals_with_additions() {
        let diff = compute_diff("a\nb\nc\nd", "a\nB\nd\ne");
        let rows = split_rows(&diff);

        assert_eq!(rows.len(), 5);
        assert_eq!(rows[0].left, rows[0].right);
        assert_eq!(rows[1].left, Some(DiffLine::removed("b", 2)));
        assert_eq!(rows[1].right, Some(DiffLine::added("B", 2)));
        assert_eq!(rows[2].left, Some(DiffLine::removed("c", 3)));
        assert_eq!(rows[2].right, None);
        assert_eq!(rows[3].left, Some(DiffLine::unchanged("d", 4, 3)));
        assert_eq!(rows[4].left, None);
        assert_eq!(rows[4].right, Some(DiffLine::added("e", 4)));
    }

    #[test]
    fn build_view_fills_the_requested_layout() {
        let unified = build_view("a", "b", DiffViewMode::Unified);
        assert!(unified.lines.is_some() && unified.rows.is_none());
        assert_eq!(unified.stats, DiffStats::new(1, 1));
        assert_eq!(unified.patch_text, "-a\n+b");

        let split = build_view("a", "b", DiffViewMode::Split);
        assert!(split.lines.is_none());
        assert_eq!(split.rows.map(|r| r.len()), Some(1));
    }

    #[test]
    fn malformed_lines_are_detected() {
        let mut line = DiffLine::added("x", 1);
        assert!(line.is_well_formed());
        line.old_line_number = Some(1);
        assert!(!line.is_well_formed());
        assert!(!DiffLine::unchanged("x", 0, 1).is_well_formed());
    }
}
