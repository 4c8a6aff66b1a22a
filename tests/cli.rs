//! End-to-end runs of the `bedsim` binary, with a fake `ailist` on the `PATH`.

use bedsim::test_utilities::{random_ranges, tiled_segmentation, write_bedfile, write_script, FAKE_AILIST};
use std::ffi::OsString;
use std::fs;
use std::path::Path;
use std::process::{Command, Output};

fn path_with(dir: &Path) -> OsString {
    let mut paths = vec![dir.to_path_buf()];
    if let Some(path) = std::env::var_os("PATH") {
        paths.extend(std::env::split_paths(&path));
    }
    std::env::join_paths(paths).expect("could not build PATH")
}

/// Run `bedsim` on a project under `root`, with `bin_dir` prepended to the `PATH`.
fn run_bedsim(root: &Path, bin_dir: &Path, extra_args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_bedsim"))
        .env("PATH", path_with(bin_dir))
        .arg("--input")
        .arg(root.join("input"))
        .arg("--output")
        .arg(root.join("output"))
        .arg("--project")
        .arg(root.join("project.csv"))
        .args(extra_args)
        .output()
        .expect("could not run bedsim")
}

fn setup_project(root: &Path) {
    let bin_dir = root.join("bin");
    fs::create_dir_all(&bin_dir).unwrap();
    write_script(&bin_dir, "ailist", FAKE_AILIST);

    fs::write(
        root.join("universe.bed"),
        "chr1\t0\t10\nchr1\t10\t20\nchr1\t20\t30\nchr1\t30\t40\n",
    )
    .unwrap();
    fs::create_dir_all(root.join("data")).unwrap();
    fs::write(root.join("data/a.bed"), "chr1\t0\t10\nchr1\t20\t30\n").unwrap();
    fs::write(root.join("data/b.bed"), "chr1\t0\t10\n").unwrap();

    let a_dir = root.join("input/a");
    fs::create_dir_all(&a_dir).unwrap();
    fs::write(a_dir.join("a_rep1.bed"), "chr1\t0\t10\nchr1\t20\t30\n").unwrap();
    fs::write(a_dir.join("a_rep2.bed"), "chr1\t10\t20\nchr1\t30\t40\n").unwrap();
    fs::create_dir_all(root.join("input/b")).unwrap();

    fs::write(
        root.join("project.csv"),
        "sample_name,base_path,file,universe\na,data,a.bed,universe.bed\nb,data,b.bed,universe.bed\n",
    )
    .unwrap();
}

#[test]
fn test_full_run_writes_four_tables() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();
    setup_project(root);

    let output = run_bedsim(root, &root.join("bin"), &[]);
    assert!(
        output.status.success(),
        "bedsim failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    for metric in ["jaccard", "coverage", "euclidean", "cosine"] {
        let table = root.join("output").join(format!("{}_results.txt", metric));
        let contents = fs::read_to_string(&table).unwrap();
        assert_eq!(contents, "a,b\n1.0,\n0.0,\n", "unexpected {} table", metric);
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Processing sample a"));
    assert!(stdout.contains("no replicate files found for sample 'b'"));
    assert!(!stdout.contains("Jaccard:"));
}

#[test]
fn test_verbose_logs_scores() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();
    setup_project(root);

    let output = run_bedsim(root, &root.join("bin"), &["-v"]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Jaccard:"));
    assert!(stdout.contains("Cosine:"));
}

#[test]
fn test_random_replicates_score_in_range() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();
    let bin_dir = root.join("bin");
    fs::create_dir_all(&bin_dir).unwrap();
    write_script(&bin_dir, "ailist", FAKE_AILIST);

    write_bedfile(root.join("universe.bed"), &tiled_segmentation(10_000));
    write_bedfile(root.join("orig.bed"), &random_ranges(50));
    let sample_dir = root.join("input/s");
    fs::create_dir_all(&sample_dir).unwrap();
    for i in 1..=3 {
        write_bedfile(sample_dir.join(format!("s_rep{}.bed", i)), &random_ranges(40));
    }
    fs::write(
        root.join("project.csv"),
        "sample_name,file,universe\ns,orig.bed,universe.bed\n",
    )
    .unwrap();

    let output = run_bedsim(root, &bin_dir, &[]);
    assert!(
        output.status.success(),
        "bedsim failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    for metric in ["jaccard", "coverage", "euclidean", "cosine"] {
        let table = root.join("output").join(format!("{}_results.txt", metric));
        let contents = fs::read_to_string(&table).unwrap();
        let mut lines = contents.lines();
        assert_eq!(lines.next(), Some("s"));
        let scores: Vec<f64> = lines.map(|line| line.parse().unwrap()).collect();
        assert_eq!(scores.len(), 3);
        assert!(scores.iter().all(|&score| (0.0..=1.0).contains(&score)));
    }
}

#[test]
fn test_missing_engine_exits_with_error() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();
    setup_project(root);
    let empty_bin = root.join("empty_bin");
    fs::create_dir_all(&empty_bin).unwrap();

    let output = Command::new(env!("CARGO_BIN_EXE_bedsim"))
        .env("PATH", &empty_bin)
        .arg("-i")
        .arg(root.join("input"))
        .arg("-o")
        .arg(root.join("output"))
        .arg("-p")
        .arg(root.join("project.csv"))
        .output()
        .expect("could not run bedsim");

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Command 'ailist' not callable. Install ailist to continue."));
    assert!(!root.join("output").exists());
}

#[test]
fn test_invalid_manifest_exits_with_error() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();
    setup_project(root);
    fs::write(root.join("project.csv"), "sample_name,file\na,a.bed\n").unwrap();

    let output = run_bedsim(root, &root.join("bin"), &[]);
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).starts_with("Error: "));
}
