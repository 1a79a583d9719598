// Copyright (c) 2025, Tom Ouellette
// Licensed under the MIT License

use std::path::{Path, PathBuf};

use assert_cmd::Command;
use image::{Rgb, RgbImage};
use predicates::prelude::*;

fn dataset(root: &str, stems: &[(&str, bool)]) -> PathBuf {
    let root = PathBuf::from(root);
    let _ = std::fs::remove_dir_all(&root);

    std::fs::create_dir_all(root.join("images/train")).unwrap();
    std::fs::create_dir_all(root.join("labels/train")).unwrap();

    for (stem, labelled) in stems {
        RgbImage::from_pixel(100, 80, Rgb([200, 100, 50]))
            .save(root.join(format!("images/train/{}.png", stem)))
            .unwrap();

        if *labelled {
            std::fs::write(
                root.join(format!("labels/train/{}.txt", stem)),
                "0 0.1 0.1 0.3 0.1 0.3 0.3 0.1 0.3\n",
            )
            .unwrap();
        }
    }

    root
}

fn tessera() -> Command {
    Command::cargo_bin("tessera").unwrap()
}

fn split_args(root: &Path) -> Vec<String> {
    vec![
        "split".to_string(),
        root.display().to_string(),
        "--tile-size".to_string(),
        "64".to_string(),
        "--overlap".to_string(),
        "14".to_string(),
        "--image-format".to_string(),
        "png".to_string(),
        "--threads".to_string(),
        "2".to_string(),
    ]
}

#[test]
pub fn test_plan() {
    tessera()
        .args(["plan", "--height", "1000", "--width", "1000"])
        .assert()
        .success()
        .stdout(predicate::str::contains("padding: bottom=140 right=140"))
        .stdout(predicate::str::contains("canvas: height=1140 width=1140"))
        .stdout(predicate::str::contains("tiles: 4 (2 x 2)"));
}

#[test]
pub fn test_plan_invalid_overlap() {
    tessera()
        .args(["plan", "--height", "100", "--width", "100", "--tile-size", "64", "--overlap", "64"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("ERROR"));
}

#[test]
pub fn test_split() {
    let root = dataset("TEST_CLI_SPLIT", &[("a", true), ("b", true)]);

    tessera().args(split_args(&root)).assert().success();

    let split = root.join("split");
    for name in ["a_0.png", "a_3.png", "b_0.png", "b_3.png"] {
        assert!(split.join("images/train").join(name).is_file());
    }

    let first = std::fs::read_to_string(split.join("labels/train/a_0.txt")).unwrap();
    assert!(first.starts_with("0 0.15625 0.125"));

    let counts = std::fs::read_to_string(split.join("split_counts.tsv")).unwrap();
    assert_eq!(counts.lines().count(), 2);
    assert!(counts.lines().all(|line| line.ends_with("\t4\t1")));

    assert!(split.join("canvas/train/a.json").is_file());
    assert!(!split.join("split_errors.tsv").exists());

    // The square only lies in patch 0 of each image
    let diagnostics = std::fs::read_to_string(split.join("split_diagnostics.tsv")).unwrap();
    let rows: Vec<Vec<&str>> = diagnostics.lines().map(|l| l.split('\t').collect()).collect();
    assert_eq!(rows.len(), 6);
    assert!(rows[0][0].ends_with("a.png"));
    assert_eq!(
        rows.iter().take(3).map(|r| r[1]).collect::<Vec<&str>>(),
        vec!["1", "2", "3"]
    );
    assert!(rows.iter().all(|r| r[2] == "outside-bounds"));
    assert!(rows.iter().all(|r| r[3] == "0 0.1 0.1 0.3 0.1 0.3 0.3 0.1 0.3"));

    // Rerunning must not pick up the patches written above
    tessera().args(split_args(&root)).assert().success();

    let counts = std::fs::read_to_string(split.join("split_counts.tsv")).unwrap();
    assert_eq!(counts.lines().count(), 2);

    std::fs::remove_dir_all(root).unwrap();
}

#[test]
pub fn test_split_distorted_label_report() {
    let root = dataset("TEST_CLI_SPLIT_DISTORTED", &[("a", true)]);
    let bowtie = "1 0.4 0.1 0.7 0.3 0.7 0.1 0.4 0.3";
    std::fs::write(root.join("labels/train/a.txt"), format!("{}\n", bowtie)).unwrap();

    tessera().args(split_args(&root)).assert().success();

    let split = root.join("split");
    let diagnostics = std::fs::read_to_string(split.join("split_diagnostics.tsv")).unwrap();
    let labels = std::fs::read_to_string(split.join("labels/train/a_0.txt")).unwrap();

    std::fs::remove_dir_all(root).unwrap();

    let rows: Vec<Vec<&str>> = diagnostics.lines().map(|l| l.split('\t').collect()).collect();
    assert_eq!(rows.len(), 4);
    for (index, row) in rows.iter().enumerate() {
        assert!(row[0].ends_with("a.png"));
        assert_eq!(row[1], index.to_string());
        assert_eq!(row[2], "distorted-polygon");
        assert_eq!(row[3], bowtie);
    }
    assert!(labels.is_empty());
}

#[test]
pub fn test_split_missing_labels() {
    let root = dataset("TEST_CLI_SPLIT_MISSING", &[("a", true), ("b", false)]);

    tessera()
        .args(split_args(&root))
        .assert()
        .failure()
        .stderr(predicate::str::contains("MissingLabelsError"));

    let split = root.join("split");
    let errors = std::fs::read_to_string(split.join("split_errors.tsv")).unwrap();
    let a_written = split.join("images/train/a_0.png").is_file();
    let b_written = split.join("images/train/b_0.png").exists();

    std::fs::remove_dir_all(root).unwrap();

    assert!(errors.contains("b.png"));
    assert!(a_written);
    assert!(!b_written);
}

#[test]
pub fn test_split_explicit_output() {
    let root = dataset("TEST_CLI_SPLIT_OUTPUT", &[("a", true)]);
    let output = root.join("patches");

    let mut args = split_args(&root);
    args.extend(["--output".to_string(), output.display().to_string()]);

    tessera().args(&args).assert().success();

    let written = output.join("images/train/a_0.png").is_file();
    let report = output.join("split_counts.tsv").is_file();

    std::fs::remove_dir_all(root).unwrap();

    assert!(written);
    assert!(report);
}

#[test]
pub fn test_split_invalid_arguments() {
    let root = dataset("TEST_CLI_SPLIT_INVALID", &[("a", true)]);

    let folder = root.display().to_string();

    tessera()
        .args(["split", folder.as_str(), "--image-format", "gif"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("ConfigError"));

    std::fs::remove_dir_all(root).unwrap();

    tessera()
        .args(["split", "does_not_exist"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("does not exist"));
}
