//! Comparator properties over realistic captures

mod common;

use colorsnap::compare::render_report;
use colorsnap::{compare, tokens, DiffKind, DiffValue, OutputFormat};
use common::{tagged_template_tokens, tok};

#[test]
fn test_capture_equals_itself() {
    let tokens = tagged_template_tokens();
    let result = compare(&tokens, &tokens);
    assert!(result.identical);
    assert_eq!(render_report(&result), "");
}

#[test]
fn test_serialized_baseline_compares_identical() {
    let tokens = tagged_template_tokens();
    for format in [OutputFormat::Pretty, OutputFormat::Compact] {
        let text = tokens::serialize(&tokens, format).unwrap();
        let reloaded = tokens::deserialize(&text).unwrap();
        assert!(compare(&tokens, &reloaded).identical);
    }
}

#[test]
fn test_identical_flag_tracks_diffs() {
    let base = tagged_template_tokens();
    let mut changed = base.clone();
    changed[3].content = "span".to_string();

    for (a, b) in [(&base, &base), (&base, &changed), (&changed, &base)] {
        let result = compare(a, b);
        assert_eq!(result.identical, result.diffs.is_empty());
    }
}

#[test]
fn test_length_mismatch_symmetric() {
    let base = tagged_template_tokens();
    let shorter = base[..4].to_vec();

    let forward = compare(&base, &shorter);
    let backward = compare(&shorter, &base);

    assert_eq!(forward.diffs.len(), 1);
    assert_eq!(backward.diffs.len(), 1);
    assert_eq!(forward.diffs[0].index, 4);
    assert_eq!(backward.diffs[0].index, 4);
    assert_eq!(forward.diffs[0].expected, DiffValue::Length(6));
    assert_eq!(forward.diffs[0].actual, DiffValue::Length(4));
    assert_eq!(backward.diffs[0].expected, DiffValue::Length(4));
    assert_eq!(backward.diffs[0].actual, DiffValue::Length(6));
}

#[test]
fn test_host_short_keys_compare_equal_to_canonical() {
    let raw = r##"[{"c":"html","t":"entity.name.function.tagged-template.js","r":{"Dark+":"#dcdcaa"}}]"##;
    let from_host = tokens::deserialize(raw).unwrap();
    let canonical = vec![tok(
        "html",
        "entity.name.function.tagged-template.js",
        &[("Dark+", "#dcdcaa")],
    )];
    assert!(compare(&canonical, &from_host).identical);
}

#[test]
fn test_theme_added_in_current_is_reported() {
    let base = vec![tok("a", "x", &[("Dark+", "#fff")])];
    let current = vec![tok("a", "x", &[("Dark+", "#fff"), ("Light+", "#000")])];
    let result = compare(&base, &current);
    assert_eq!(result.count(DiffKind::Theme), 1);
    assert_eq!(result.count(DiffKind::Content), 0);
}

#[test]
fn test_report_lists_every_difference() {
    let base = tagged_template_tokens();
    let mut current = base.clone();
    current[0].scope = "source.js variable.function.js".to_string();
    current[3]
        .theme_colors
        .insert("Dark+".to_string(), "#4ec9b0".to_string());

    let result = compare(&base, &current);
    let report = render_report(&result);

    assert_eq!(result.summary(), "2 differences (0 content, 1 scope, 1 theme)");
    assert!(report.starts_with("Difference 1 at token 0:\n  Type: scope\n"));
    assert!(report.contains("Difference 2 at token 3:\n  Type: theme\n"));
    assert!(report.contains("\"Dark+\":\"#4ec9b0\""));
}
