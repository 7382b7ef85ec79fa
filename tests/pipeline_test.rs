use std::fs;

use encoding_rs::GBK;
use mdmatch::records::{load_records, ColumnPolicy};
use mdmatch::{run, MdMatchError};

mod common;
use common::TestContext;

#[test]
fn test_date_prefix_and_punctuation_match() {
    let ctx = TestContext::new();
    ctx.add_article("[2025-06-06] Intro-to Kernels!!.md", "# Kernels");
    ctx.write_table("序号,标题\n1,[2025-01-01] Intro to Kernels.md\n");

    let report = run(&ctx.config()).expect("run");
    assert_eq!(report.summary.used_files, 1);
    assert!(report.summary.unmatched.is_empty());
    assert!(report.summary.unused_files.is_empty());
    assert!(ctx.output_path.exists());
}

#[test]
fn test_colliding_files_second_always_unused() {
    let ctx = TestContext::new();
    let shared = "开源内核安全修炼之一二三四五六七八九十甲乙丙丁戊己庚辛壬癸子丑寅卯";
    ctx.add_article(&format!("[2025-01-01] {}上篇.md", shared), "first");
    ctx.add_article(&format!("[2025-01-02] {}下篇.md", shared), "second");
    ctx.write_table(&format!("id,标题\n1,{}上篇\n2,{}下篇\n", shared, shared));

    let report = run(&ctx.config()).expect("run");
    let summary = &report.summary;

    assert_eq!(summary.total_files, 2);
    assert_eq!(summary.distinct_keys, 1);
    assert_eq!(summary.collision_buckets, 1);
    assert_eq!(summary.used_files, 1);
    assert!(summary.unmatched.is_empty());
    assert_eq!(
        summary.unused_files,
        vec![format!("[2025-01-02] {}下篇.md", shared)]
    );
}

#[test]
fn test_unmatched_title_display_row() {
    let ctx = TestContext::new();
    ctx.add_article("Known.md", "known");
    ctx.write_table("id,Title\n1,Known\n2,Known\n3,Unknown piece\n");

    let report = run(&ctx.config()).expect("run");
    let summary = &report.summary;

    // The duplicate "Known" row is dropped but row numbers keep their input position
    assert_eq!(summary.total_records, 2);
    assert_eq!(summary.unmatched.len(), 1);
    assert_eq!(summary.unmatched[0].display_row, 4);
    assert_eq!(summary.unmatched[0].title, "Unknown piece");
}

#[test]
fn test_empty_directory() {
    let ctx = TestContext::new();
    ctx.write_table("id,标题\n1,One\n2,Two\n");

    let report = run(&ctx.config()).expect("run");
    let summary = &report.summary;

    assert_eq!(summary.total_files, 0);
    assert_eq!(summary.used_files, 0);
    assert_eq!(summary.unmatched.len(), 2);
    assert!(summary.unused_files.is_empty());
    assert!(ctx.output_path.exists());
}

#[test]
fn test_malformed_table_writes_nothing() {
    let ctx = TestContext::new();
    ctx.add_article("One.md", "one");
    ctx.write_table_bytes(&[0x69, 0x64, 0x2c, 0xff, 0xff, 0x0a]);

    let err = run(&ctx.config()).expect_err("must abort");
    assert!(err.is_table_failure(), "unexpected error: {}", err);
    assert!(!ctx.output_path.exists());
}

#[test]
fn test_missing_directory_writes_nothing() {
    let ctx = TestContext::new();
    ctx.write_table("id,标题\n1,One\n");
    fs::remove_dir(&ctx.source_dir).expect("remove dir");

    let err = run(&ctx.config()).expect_err("must abort");
    assert!(matches!(err, MdMatchError::SourceDirMissing(_)));
    assert!(!ctx.output_path.exists());
}

#[test]
fn test_gbk_table_loads_like_utf8() {
    let ctx = TestContext::new();
    let csv = "序号,标题,作者\n1,内核安全,张三\n2,内核安全,李四\n3,漏洞分析,王五\n";
    let (encoded, _, had_errors) = GBK.encode(csv);
    assert!(!had_errors);
    ctx.write_table_bytes(&encoded);

    let loaded = load_records(&ctx.table_path, &ColumnPolicy::default()).expect("load");
    assert_eq!(loaded.title_column.name, "标题");
    assert_eq!(loaded.duplicates_removed, 1);
    assert_eq!(loaded.table.len(), 2);
    assert_eq!(loaded.table.records[1].fields, vec!["3", "漏洞分析", "王五"]);
}

#[test]
fn test_repeated_runs_are_byte_identical() {
    let ctx = TestContext::new();
    ctx.add_article("[2025-01-01] Alpha.md", "alpha");
    ctx.add_article("[2025-01-02] Beta.md", "beta");
    ctx.add_article("Orphan.md", "orphan");
    ctx.write_table("id,Title\n1,Alpha\n2,Beta\n3,Gamma\n");

    run(&ctx.config()).expect("first run");
    let first = fs::read(&ctx.output_path).expect("read first");
    run(&ctx.config()).expect("second run");
    let second = fs::read(&ctx.output_path).expect("read second");

    assert_eq!(first, second);
}

#[test]
fn test_row_count_equals_distinct_titles() {
    let ctx = TestContext::new();
    ctx.write_table("id,Title\n1,a\n2,b\n3,a\n4,c\n5,b\n6,\n7,\n");

    let loaded = load_records(&ctx.table_path, &ColumnPolicy::default()).expect("load");
    let titles: Vec<&str> = loaded
        .table
        .records
        .iter()
        .map(|r| r.fields[1].as_str())
        .collect();
    assert_eq!(titles, vec!["a", "b", "c", ""]);
}
