use std::collections::HashSet;
use std::path::{Path, PathBuf};

use fsviz::config::platform::PlatformInfo;
use fsviz::config::settings::{RenderSettings, Settings};
use fsviz::core::analyzer::Analyzer;
use fsviz::core::events::{create_event_channel, Event};
use fsviz::core::extractor::{extract, file_extension, SystemClassifier};
use fsviz::core::hierarchy::HierarchyGraph;
use fsviz::core::scanner::Scanner;
use fsviz::export::csv::render_csv;
use fsviz::export::json::export_summary;
use fsviz::export::report::{
    write_reports, ArtifactStatus, METADATA_FILE, STRUCTURE_FILE, SUMMARY_FILE,
};
use fsviz::models::record::FileRecord;
use fsviz::models::scan_result::{ScanErrorType, ScanResult};
use fsviz::models::summary::human_readable_size;
use fsviz::Error;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Create a unique temporary directory for a test.
fn make_test_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("fsviz_test_{}", name));
    let _ = std::fs::remove_dir_all(&dir); // clean up from previous runs
    std::fs::create_dir_all(&dir).expect("create test dir");
    dir
}

/// Remove a temporary test directory.
fn cleanup(dir: &PathBuf) {
    let _ = std::fs::remove_dir_all(dir);
}

/// Write `len` bytes to `path`, creating parent directories.
fn write_file(path: &Path, len: usize) {
    std::fs::create_dir_all(path.parent().expect("parent")).expect("create parents");
    std::fs::write(path, vec![b'x'; len]).expect("write file");
}

fn scan(dir: &Path, settings: Settings) -> ScanResult {
    let (event_tx, _rx) = create_event_channel();
    let scanner = Scanner::new(settings, event_tx);
    scanner.scan(dir).expect("scan should succeed")
}

fn relative_paths(result: &ScanResult, root: &Path) -> Vec<String> {
    result
        .records
        .iter()
        .map(|r| {
            Path::new(&r.path)
                .strip_prefix(root)
                .expect("record under root")
                .to_string_lossy()
                .replace('\\', "/")
        })
        .collect()
}

fn small_render() -> RenderSettings {
    RenderSettings {
        width: 64,
        height: 48,
        margin: 4,
        layout_iterations: 5,
        ..Default::default()
    }
}

fn test_platform() -> PlatformInfo {
    PlatformInfo {
        platform: "Linux".into(),
        platform_release: "6.1.0".into(),
        machine: "x86_64".into(),
    }
}

fn record(path: &str, size: u64, is_system_file: bool) -> FileRecord {
    let p = Path::new(path);
    FileRecord {
        path: path.to_string(),
        os_path: PathBuf::from(path),
        filename: p.file_name().unwrap().to_string_lossy().into_owned(),
        directory: p.parent().unwrap().to_string_lossy().into_owned(),
        size_bytes: size,
        creation_time: chrono::Local::now(),
        file_extension: file_extension(p),
        is_system_file,
    }
}

// ---------------------------------------------------------------------------
// 1. test_scan_basic – walk a small tree with the real Scanner
// ---------------------------------------------------------------------------

#[test]
fn test_scan_basic() {
    let dir = make_test_dir("scan_basic");

    write_file(&dir.join("hello.txt"), 11);
    write_file(&dir.join("subdir/nested.txt"), 14);
    write_file(&dir.join("subdir/deeper/data.bin"), 100);

    let result = scan(&dir, Settings::default());

    assert_eq!(result.total_files(), 3);
    assert_eq!(result.total_size, 125);
    let summed: u64 = result.records.iter().map(|r| r.size_bytes).sum();
    assert_eq!(result.total_size, summed, "total must equal the sum of record sizes");
    assert_eq!(result.dirs_visited, 3);
    assert_eq!(result.scan_path, dir);
    assert!(result.errors.is_empty(), "no errors expected: {:?}", result.errors);

    let unique: HashSet<&str> = result.records.iter().map(|r| r.path.as_str()).collect();
    assert_eq!(unique.len(), result.records.len(), "one record per file");

    cleanup(&dir);
}

// ---------------------------------------------------------------------------
// 2. test_scan_preorder – files of a directory come before its subtrees
// ---------------------------------------------------------------------------

#[test]
fn test_scan_preorder() {
    let dir = make_test_dir("scan_preorder");

    write_file(&dir.join("top.txt"), 1);
    write_file(&dir.join("a/f1"), 1);
    write_file(&dir.join("a/inner/x"), 1);
    write_file(&dir.join("b/f2"), 1);

    let result = scan(&dir, Settings::default());
    assert_eq!(
        relative_paths(&result, &dir),
        vec!["top.txt", "a/f1", "a/inner/x", "b/f2"]
    );

    cleanup(&dir);
}

// ---------------------------------------------------------------------------
// 3. test_scan_excludes – excluded names are pruned at every depth
// ---------------------------------------------------------------------------

#[test]
fn test_scan_excludes() {
    let dir = make_test_dir("scan_excludes");

    write_file(&dir.join("keep/a.txt"), 5);
    write_file(&dir.join(".git/objects/ab/cdef"), 50);
    write_file(&dir.join("sub/node_modules/pkg/index.js"), 70);
    write_file(&dir.join("sub/b.txt"), 7);
    // Only directories are matched by name.
    write_file(&dir.join("sub/temp"), 3);

    let result = scan(&dir, Settings::default());
    let paths = relative_paths(&result, &dir);

    assert_eq!(paths, vec!["keep/a.txt", "sub/b.txt", "sub/temp"]);
    assert!(paths.iter().all(|p| !p.contains(".git") && !p.contains("node_modules")));
    assert_eq!(result.total_size, 15);

    // Custom exclusion list replaces the defaults.
    let settings = Settings {
        exclude_dirs: vec!["keep".to_string()],
        ..Default::default()
    };
    let result = scan(&dir, settings);
    let paths = relative_paths(&result, &dir);
    assert!(paths.iter().any(|p| p.starts_with(".git/")));
    assert!(paths.iter().all(|p| !p.starts_with("keep/")));

    cleanup(&dir);
}

// ---------------------------------------------------------------------------
// 4. test_scan_missing_path – a missing start path is fatal
// ---------------------------------------------------------------------------

#[test]
fn test_scan_missing_path() {
    let dir = make_test_dir("scan_missing").join("does_not_exist");

    let (event_tx, _rx) = create_event_channel();
    let scanner = Scanner::new(Settings::default(), event_tx);
    match scanner.scan(&dir) {
        Err(Error::StartPathNotFound(p)) => assert_eq!(p, dir),
        other => panic!("expected StartPathNotFound, got {:?}", other.map(|r| r.total_files())),
    }

    cleanup(&dir.parent().unwrap().to_path_buf());
}

// ---------------------------------------------------------------------------
// 5. test_scan_empty_dir – no files, no visualization, zero summary
// ---------------------------------------------------------------------------

#[test]
fn test_scan_empty_dir() {
    let dir = make_test_dir("scan_empty");
    std::fs::create_dir_all(dir.join("only/dirs/here")).unwrap();
    let out = make_test_dir("scan_empty_out");

    let result = scan(&dir, Settings::default());
    assert_eq!(result.total_files(), 0);
    assert_eq!(result.total_size, 0);

    let outcome = write_reports(&result.records, &out, &small_render(), &test_platform())
        .expect("reports should be written");

    assert!(matches!(outcome.structure, ArtifactStatus::Skipped(_)));
    assert!(!out.join(STRUCTURE_FILE).exists());
    assert!(outcome.metadata.is_written());
    assert!(outcome.summary.is_written());

    let summary: serde_json::Value =
        serde_json::from_slice(&std::fs::read(out.join(SUMMARY_FILE)).unwrap()).unwrap();
    assert_eq!(summary["total_files"], 0);
    assert_eq!(summary["total_size_bytes"], 0);
    assert_eq!(summary["file_types"], serde_json::json!({}));

    let csv = std::fs::read_to_string(out.join(METADATA_FILE)).unwrap();
    assert_eq!(csv.lines().count(), 1, "header only");

    cleanup(&dir);
    cleanup(&out);
}

// ---------------------------------------------------------------------------
// 6. test_count_first – the counting pass matches the main pass
// ---------------------------------------------------------------------------

#[test]
fn test_count_first() {
    let dir = make_test_dir("count_first");

    write_file(&dir.join("a/1.txt"), 1);
    write_file(&dir.join("a/2.txt"), 2);
    write_file(&dir.join("b/c/3.txt"), 3);
    write_file(&dir.join("node_modules/skip.js"), 4);

    let settings = Settings {
        count_first: true,
        progress_every: 1,
        ..Default::default()
    };
    let (event_tx, mut rx) = create_event_channel();
    let scanner = Scanner::new(settings, event_tx);
    assert_eq!(scanner.count_files(&dir), 3);

    let result = scanner.scan(&dir).unwrap();
    assert_eq!(result.total_files(), 3);

    let snapshot = scanner.progress().snapshot();
    assert_eq!(snapshot.files_expected, Some(3));
    assert_eq!(snapshot.files_processed, 3);
    assert_eq!(snapshot.total_size, 6);
    assert_eq!(snapshot.percent(), Some(100.0));

    let mut counted = None;
    let mut progress_events = 0;
    let mut completed = false;
    while let Ok(event) = rx.try_recv() {
        match event {
            Event::FilesCounted { total } => counted = Some(total),
            Event::Progress { .. } => progress_events += 1,
            Event::ScanCompleted { total_files, total_size, .. } => {
                assert_eq!(total_files, 3);
                assert_eq!(total_size, 6);
                completed = true;
            }
            _ => {}
        }
    }
    assert_eq!(counted, Some(3));
    assert_eq!(progress_events, 3);
    assert!(completed);

    cleanup(&dir);
}

// ---------------------------------------------------------------------------
// 7. test_directory_links_not_followed
// ---------------------------------------------------------------------------

#[cfg(unix)]
#[test]
fn test_directory_links_not_followed() {
    let dir = make_test_dir("links");

    write_file(&dir.join("real/file.txt"), 10);
    std::os::unix::fs::symlink(dir.join("real"), dir.join("linked_dir")).unwrap();
    std::os::unix::fs::symlink(dir.join("real/file.txt"), dir.join("linked_file")).unwrap();
    std::os::unix::fs::symlink(dir.join("missing"), dir.join("dangling")).unwrap();

    let result = scan(&dir, Settings::default());
    let paths = relative_paths(&result, &dir);

    assert_eq!(paths, vec!["linked_file", "real/file.txt"]);
    // File links report their target's size.
    assert_eq!(result.total_size, 20);
    // The dangling link is handed to the extractor and skipped.
    assert_eq!(result.errors.len(), 1);
    assert!(result.errors[0].path.ends_with("dangling"));

    cleanup(&dir);
}

// ---------------------------------------------------------------------------
// 7b. test_unreadable_entries – locked directories are pruned, locked files skipped
// ---------------------------------------------------------------------------

#[cfg(unix)]
#[test]
fn test_unreadable_entries() {
    use std::os::unix::fs::PermissionsExt;

    // access(2) always grants read to root.
    if unsafe { libc::geteuid() } == 0 {
        return;
    }

    let dir = make_test_dir("unreadable");
    write_file(&dir.join("open.txt"), 4);
    write_file(&dir.join("locked.txt"), 8);
    write_file(&dir.join("locked_dir/secret.txt"), 16);
    write_file(&dir.join("locked_dir/deeper/more.txt"), 32);

    let lock = |p: &Path, mode: u32| {
        std::fs::set_permissions(p, std::fs::Permissions::from_mode(mode)).unwrap();
    };
    lock(&dir.join("locked.txt"), 0o000);
    lock(&dir.join("locked_dir"), 0o000);

    let result = scan(&dir, Settings::default());

    lock(&dir.join("locked_dir"), 0o755);
    lock(&dir.join("locked.txt"), 0o644);

    assert_eq!(relative_paths(&result, &dir), vec!["open.txt"]);
    assert_eq!(result.total_size, 4);
    assert!(result
        .records
        .iter()
        .all(|r| !Path::new(&r.path).starts_with(dir.join("locked_dir"))));
    // The locked directory is pruned, not listed and then failed.
    assert_eq!(result.dirs_visited, 1);

    let denied: Vec<&Path> = result
        .errors
        .iter()
        .filter(|e| e.error_type == ScanErrorType::PermissionDenied)
        .map(|e| e.path.as_path())
        .collect();
    assert_eq!(denied.len(), 2, "{:?}", result.errors);
    assert!(denied.contains(&dir.join("locked.txt").as_path()));
    assert!(denied.contains(&dir.join("locked_dir").as_path()));

    cleanup(&dir);
}

// ---------------------------------------------------------------------------
// 8. test_extract_metadata – fields of a single record
// ---------------------------------------------------------------------------

#[test]
fn test_extract_metadata() {
    let dir = make_test_dir("extract");
    let path = dir.join("Archive.TAR.GZ");
    write_file(&path, 42);

    let classifier = SystemClassifier::new(vec!["/nowhere/".to_string()]);
    let record = extract(&path, &classifier).expect("record");

    assert_eq!(record.filename, "Archive.TAR.GZ");
    assert_eq!(Path::new(&record.directory), dir.as_path());
    assert_eq!(record.size_bytes, 42);
    assert_eq!(record.os_path, path);
    assert_eq!(record.file_extension, ".gz");
    assert!(!record.is_system_file);

    let err = extract(&dir.join("vanished.txt"), &classifier).expect_err("no record");
    assert!(err.path.ends_with("vanished.txt"));

    cleanup(&dir);
}

#[test]
fn test_file_extension() {
    assert_eq!(file_extension(Path::new("/a/b/report.PDF")), ".pdf");
    assert_eq!(file_extension(Path::new("/a/b/archive.tar.gz")), ".gz");
    assert_eq!(file_extension(Path::new("/a/b/.bashrc")), "");
    assert_eq!(file_extension(Path::new("/a/b/Makefile")), "");
}

// ---------------------------------------------------------------------------
// 9. test_system_classifier – substring heuristic
// ---------------------------------------------------------------------------

#[test]
fn test_system_classifier() {
    let settings = Settings::default();
    let classifier = SystemClassifier::new(settings.system_prefixes);

    assert!(classifier.is_system_file(Path::new("/usr/lib/libc.so")));
    assert!(classifier.is_system_file(Path::new("/etc/hosts")));
    assert!(classifier.is_system_file(Path::new("/Users/me/Library/Prefs/x.plist")));
    assert!(classifier.is_system_file(Path::new(r"C:\Windows\System32\kernel32.dll")));
    assert!(classifier.is_system_file(Path::new(r"C:\Program Files (x86)\App\app.exe")));

    assert!(!classifier.is_system_file(Path::new("/home/me/notes.txt")));
    // Prefixes need the surrounding separators.
    assert!(!classifier.is_system_file(Path::new("/home/me/usr")));
    assert!(!classifier.is_system_file(Path::new("/home/me/binary/x")));
}

// ---------------------------------------------------------------------------
// 10. test_analyzer_summary
// ---------------------------------------------------------------------------

#[test]
fn test_analyzer_summary() {
    let records = vec![
        record("/home/u/a.txt", 10, false),
        record("/home/u/b.TXT", 20, false),
        record("/usr/bin/tool", 30, true),
        record("/home/u/c.rs", 40, false),
    ];

    let summary = Analyzer::summarize(&records, &test_platform());
    assert_eq!(summary.total_files, 4);
    assert_eq!(summary.total_size_bytes, 100);
    assert_eq!(summary.system_files_count, 1);
    assert_eq!(summary.user_files_count, 3);
    assert_eq!(summary.file_types.get(".txt"), Some(&2));
    assert_eq!(summary.file_types.get(".rs"), Some(&1));
    assert_eq!(summary.file_types.get(""), Some(&1));
    assert_eq!(summary.system_info, test_platform());

    let top = Analyzer::top_extensions(&records, 2);
    assert_eq!(top, vec![(".txt".to_string(), 2), ("".to_string(), 1)]);
}

// ---------------------------------------------------------------------------
// 11. test_summary_json – integer counts and expected keys
// ---------------------------------------------------------------------------

#[test]
fn test_summary_json() {
    let dir = make_test_dir("summary_json");
    let records = vec![record("/home/u/a.txt", 10, false), record("/etc/conf", 5, true)];
    let summary = Analyzer::summarize(&records, &test_platform());

    let path = dir.join("summary.json");
    export_summary(&summary, &path).expect("export should succeed");

    let value: serde_json::Value = serde_json::from_slice(&std::fs::read(&path).unwrap()).unwrap();
    for key in [
        "total_files",
        "total_size_bytes",
        "system_files_count",
        "user_files_count",
    ] {
        assert!(value[key].is_u64(), "{key} should be an integer");
    }
    assert_eq!(value["total_size_bytes"], 15);
    assert_eq!(value["file_types"][".txt"], 1);
    assert!(value["scan_time"].is_string());
    assert_eq!(value["system_info"]["platform"], "Linux");
    assert_eq!(value["system_info"]["platform_release"], "6.1.0");
    assert_eq!(value["system_info"]["machine"], "x86_64");

    cleanup(&dir);
}

// ---------------------------------------------------------------------------
// 12. test_csv – header, row layout and quoting
// ---------------------------------------------------------------------------

#[test]
fn test_csv() {
    let records = vec![
        record("/home/u/plain.txt", 12, false),
        record("/home/u/with, comma \"q\".md", 3, true),
    ];
    let csv = render_csv(&records);
    let lines: Vec<&str> = csv.lines().collect();

    assert_eq!(
        lines[0],
        "path,filename,directory,size_bytes,creation_time,file_extension,is_system_file"
    );
    assert!(lines[1].starts_with("/home/u/plain.txt,plain.txt,/home/u,12,"));
    assert!(lines[1].ends_with(",.txt,False"));
    assert!(lines[2].starts_with(
        "\"/home/u/with, comma \"\"q\"\".md\",\"with, comma \"\"q\"\".md\",/home/u,3,"
    ));
    assert!(lines[2].ends_with(",.md,True"));
}

#[test]
fn test_csv_creation_time() {
    use chrono::TimeZone;

    let mut whole = record("/home/u/a.txt", 1, false);
    whole.creation_time = chrono::Local.timestamp_opt(1_700_000_000, 0).unwrap();
    let mut fractional = record("/home/u/b.txt", 1, false);
    fractional.creation_time = chrono::Local
        .timestamp_opt(1_700_000_000, 123_456_000)
        .unwrap();

    let iso = whole.creation_time_iso();
    assert_eq!(iso.len(), "YYYY-MM-DDTHH:MM:SS".len(), "{iso}");
    assert!(!iso.contains('.'));

    let iso = fractional.creation_time_iso();
    assert!(iso.ends_with(".123456"), "{iso}");
    assert_eq!(iso.len(), "YYYY-MM-DDTHH:MM:SS.ffffff".len());

    let csv = render_csv(&[whole.clone()]);
    assert!(csv.contains(&format!(",{},", whole.creation_time_iso())));
}

// ---------------------------------------------------------------------------
// 13. test_write_reports – all three artifacts from a real scan
// ---------------------------------------------------------------------------

#[test]
fn test_write_reports() {
    let dir = make_test_dir("reports_src");
    let out = make_test_dir("reports_out").join("nested/output");

    write_file(&dir.join("a/f1"), 100);
    write_file(&dir.join("b/f2"), 300);

    let result = scan(&dir, Settings::default());
    let render = small_render();
    let outcome = write_reports(&result.records, &out, &render, &test_platform()).unwrap();

    assert!(outcome.structure.is_written(), "{:?}", outcome.structure);
    assert!(outcome.metadata.is_written());
    assert!(outcome.summary.is_written());
    assert_eq!(outcome.stats.total_files, 2);
    assert_eq!(outcome.stats.total_size_bytes, 400);

    let img = image::open(out.join(STRUCTURE_FILE)).expect("png decodes").to_rgb8();
    assert_eq!(img.dimensions(), (render.width, render.height));
    assert_eq!(img.get_pixel(0, 0).0, render.background);

    let csv = std::fs::read_to_string(out.join(METADATA_FILE)).unwrap();
    assert_eq!(csv.lines().count(), 3);

    cleanup(&dir);
    cleanup(&out.parent().unwrap().parent().unwrap().to_path_buf());
}

// ---------------------------------------------------------------------------
// 14. test_end_to_end_hierarchy – graph built from a scanned tree
// ---------------------------------------------------------------------------

#[test]
fn test_end_to_end_hierarchy() {
    let dir = make_test_dir("hierarchy_e2e");
    write_file(&dir.join("a/f1"), 100);
    write_file(&dir.join("b/f2"), 300);

    let result = scan(&dir, Settings::default());
    let graph = HierarchyGraph::build(&result.records);

    let key = |rel: &str| {
        if rel.is_empty() {
            dir.to_string_lossy().into_owned()
        } else {
            dir.join(rel).to_string_lossy().into_owned()
        }
    };

    let root = graph.index_of(&key("")).expect("root node");
    let a = graph.index_of(&key("a")).expect("a node");
    let f2 = graph.index_of(&key("b/f2")).expect("f2 node");

    assert_eq!(graph.descendant_size(root), 400);
    assert_eq!(graph.descendant_size(a), 100);
    assert_eq!(graph.max_size(), Some(300));

    let ratios = graph.ratios().unwrap();
    assert!((ratios[f2] - 1.0).abs() < f64::EPSILON);
    assert_eq!(graph.roots().len(), 1);

    cleanup(&dir);
}

// ---------------------------------------------------------------------------
// 15. test_app_run – the async pipeline end to end
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_app_run() {
    let dir = make_test_dir("app_run_src");
    let out = make_test_dir("app_run_out");
    write_file(&dir.join("docs/readme.md"), 64);
    write_file(&dir.join("src/main.rs"), 128);

    let settings = Settings {
        start_path: dir.clone(),
        output_dir: out.clone(),
        count_first: true,
        render: small_render(),
        ..Default::default()
    };
    let app = fsviz::app::App::new(settings, test_platform());
    let outcome = app.run().await.expect("run should succeed");

    assert!(outcome.structure.is_written());
    assert_eq!(outcome.stats.total_files, 2);
    assert!(out.join(STRUCTURE_FILE).exists());
    assert!(out.join(METADATA_FILE).exists());
    assert!(out.join(SUMMARY_FILE).exists());

    let missing = Settings {
        start_path: dir.join("nope"),
        output_dir: out.clone(),
        ..Default::default()
    };
    let err = fsviz::app::App::new(missing, test_platform())
        .run()
        .await
        .expect_err("missing start path must fail");
    assert!(matches!(
        err.downcast_ref::<Error>(),
        Some(Error::StartPathNotFound(_))
    ));

    cleanup(&dir);
    cleanup(&out);
}

// ---------------------------------------------------------------------------
// 16. test_human_readable_size
// ---------------------------------------------------------------------------

#[test]
fn test_human_readable_size() {
    assert_eq!(human_readable_size(0), "0 B");
    assert_eq!(human_readable_size(1023), "1023 B");
    assert_eq!(human_readable_size(1536), "1.50 KB");
    assert_eq!(human_readable_size(1024 * 1024 * 1024), "1.00 GB");
}

// ---------------------------------------------------------------------------
// 17. test_settings_default
// ---------------------------------------------------------------------------

#[test]
fn test_settings_default() {
    let s = Settings::default();

    assert_eq!(s.exclude_dirs, vec![".git", "node_modules", "__pycache__", "temp"]);
    assert!(s.is_excluded("node_modules"));
    assert!(!s.is_excluded("node_modules2"));
    assert_eq!(s.system_prefixes.len(), 9);
    assert!(!s.count_first);
    assert_eq!(s.render.layout_iterations, 25);
    assert_eq!(s.render.edge_color, [0x30, 0x30, 0x30]);
    assert_eq!(s.render.background, [0, 0, 0]);
}
