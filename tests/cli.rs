use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

const HEADER: &str = "time,host,label,testcase,test,fill,entries,branches,elements,ms,cpu";

fn timeplot(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_timeplot"))
        .args(args)
        .output()
        .expect("failed to run timeplot")
}

fn write_csv(dir: &Path, name: &str, rows: &[&str]) -> PathBuf {
    let path = dir.join(name);
    let mut text = String::from(HEADER);
    text.push('\n');
    for row in rows {
        text.push_str(row);
        text.push('\n');
    }
    fs::write(&path, text).unwrap();
    path
}

fn s(p: &Path) -> &str {
    p.to_str().unwrap()
}

#[test]
fn unreadable_input_exits_with_one_and_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("missing.csv");
    let out = dir.path().join("missing.svg");

    let result = timeplot(&[s(&missing)]);
    assert_eq!(result.status.code(), Some(1));
    assert!(!out.exists());
}

#[test]
fn missing_label_column_exits_with_two() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nolabel.csv");
    fs::write(
        &path,
        "time,host,testcase,test,fill,entries,branches,elements,ms,cpu\nt,h,tc,t,F,1,1,10,1,1\n",
    )
    .unwrap();

    let result = timeplot(&["--no-plot", s(&path)]);
    assert_eq!(result.status.code(), Some(2));
}

#[test]
fn bad_binning_is_a_usage_error() {
    let result = timeplot(&["--binning", "0:0:0", "a.csv"]);
    assert_eq!(result.status.code(), Some(2));
}

#[test]
fn summary_reports_the_two_series_example() {
    let dir = tempfile::tempdir().unwrap();
    let a = write_csv(
        dir.path(),
        "a.csv",
        &[
            "2021-03-04 10:00:00,node1,foo,tc,t,F,1,1,1000,10,10",
            "2021-03-04 10:00:01,node1,bar,tc,t,F,1,1,1000,20,20",
        ],
    );
    let b = write_csv(
        dir.path(),
        "b.csv",
        &[
            "2021-03-04 11:00:00,node2,foo,tc,t,F,1,1,1000,15,15",
            "2021-03-04 11:00:01,node2,bar,tc,t,F,1,1,1000,20,20",
            "2021-03-04 11:00:02,node2,bar,tc,t,F,1,1,0,20,20",
        ],
    );
    let summary = dir.path().join("summary.json");

    let result = timeplot(&[
        "--no-plot",
        "--summary",
        s(&summary),
        "--legends",
        "before,after",
        s(&a),
        s(&b),
    ]);
    assert_eq!(result.status.code(), Some(0));
    assert!(!dir.path().join("a.svg").exists());

    let stdout = String::from_utf8_lossy(&result.stdout);
    assert!(stdout.contains("before"));
    assert!(stdout.contains("15000.000"));

    let value: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&summary).unwrap()).unwrap();
    assert_eq!(value["labels"], serde_json::json!(["foo", "bar"]));
    assert_eq!(value["rejected"], 1);
    assert_eq!(value["series"][0]["name"], "before");
    assert_eq!(value["series"][0]["buckets"][0]["mean"], 10000.0);
    assert_eq!(value["series"][1]["buckets"][0]["mean"], 15000.0);
    assert_eq!(value["series"][1]["buckets"][1]["count"], 1);
    assert!(value["series"][1]["buckets"][1].get("stderr").is_none());
}

#[test]
fn separator_joins_files_into_one_series() {
    let dir = tempfile::tempdir().unwrap();
    let a = write_csv(dir.path(), "a.csv", &["t,h,foo,tc,t,F,1,1,1000,10,10"]);
    let a2 = write_csv(dir.path(), "a2.csv", &["t,h,foo,tc,t,F,1,1,1000,12,12"]);
    let b = write_csv(dir.path(), "b.csv", &["t,h,foo,tc,t,F,1,1,1000,15,15"]);
    let summary = dir.path().join("summary.json");

    let result = timeplot(&[
        "--no-plot",
        "--summary",
        s(&summary),
        s(&a),
        s(&a2),
        ":",
        s(&b),
    ]);
    assert_eq!(result.status.code(), Some(0));

    let value: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&summary).unwrap()).unwrap();
    assert_eq!(value["series"].as_array().unwrap().len(), 2);
    assert_eq!(value["series"][0]["rows"], 2);
    assert_eq!(value["series"][0]["buckets"][0]["count"], 2);
    assert_eq!(value["series"][0]["buckets"][0]["mean"], 11000.0);
    assert!(value["series"][0]["buckets"][0]["stderr"].as_f64().unwrap() > 0.0);
}

#[test]
fn zero_byte_input_exits_with_one() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("empty.csv");
    fs::write(&path, "").unwrap();

    let result = timeplot(&["--no-plot", s(&path)]);
    assert_eq!(result.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&result.stderr).contains("no rows"));
}

fn two_label_input(dir: &Path) -> PathBuf {
    write_csv(
        dir,
        "a.csv",
        &[
            "2021-03-04 10:00:00,node1,foo,tc,t,F,1,1,1000,10,10",
            "2021-03-04 10:00:01,node1,bar,tc,t,F,1,1,1000,20,20",
        ],
    )
}

#[test]
fn default_document_is_svg_with_stacked_pages() {
    let dir = tempfile::tempdir().unwrap();
    let a = two_label_input(dir.path());

    let result = timeplot(&["-d", s(&a)]);
    assert_eq!(result.status.code(), Some(0));

    // Bar page plus one distribution page per bucket, 800 px each.
    let svg = fs::read_to_string(dir.path().join("a.svg")).unwrap();
    assert!(!svg.is_empty());
    assert!(svg.contains(r#"width="1200""#));
    assert!(svg.contains(r#"height="2400""#));
}

#[test]
fn png_extension_writes_png() {
    let dir = tempfile::tempdir().unwrap();
    let a = two_label_input(dir.path());
    let out = dir.path().join("chart.png");

    let result = timeplot(&["-o", s(&out), s(&a)]);
    assert_eq!(result.status.code(), Some(0));
    let bytes = fs::read(&out).unwrap();
    assert!(bytes.starts_with(b"\x89PNG"));
    assert!(!dir.path().join("a.svg").exists());
}

#[test]
fn unsupported_extension_exits_with_one_and_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let a = two_label_input(dir.path());
    let out = dir.path().join("x.pdf");

    let result = timeplot(&["-o", s(&out), s(&a)]);
    assert_eq!(result.status.code(), Some(1));
    assert!(!out.exists());
}
