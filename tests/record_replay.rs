//! Cassette replay integration tests. Zero network I/O.
//!
//! All tests set `CARDGEN_REPLAY` to a cassette file path so that the binary
//! never contacts a live API endpoint.

use std::path::{Path, PathBuf};

use assert_cmd::Command;
use base64::Engine;
use predicates::prelude::*;

fn cmd(cassette: &Path, work_dir: &Path) -> Command {
    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("cardgen");
    cmd.env("CARDGEN_REPLAY", cassette)
        .env("CARDGEN_CONFIG", "/nonexistent/cardgen.toml")
        .env_remove("CARDGEN_REC")
        .env_remove("OPENAI_API_KEY")
        .current_dir(work_dir);
    cmd
}

fn png_base64(width: u32, height: u32) -> String {
    let img = image::DynamicImage::new_rgb8(width, height);
    let mut buf = std::io::Cursor::new(Vec::<u8>::new());
    img.write_to(&mut buf, image::ImageFormat::Png).unwrap();
    base64::engine::general_purpose::STANDARD.encode(buf.into_inner())
}

/// Write a cassette with one generate call and one fetch call.
fn happy_cassette(dir: &Path, width: u32, height: u32) -> PathBuf {
    let b64 = png_base64(width, height);
    let content = format!(
        "name: card-test\n\
         recorded_at: \"2026-02-01T00:00:00Z\"\n\
         commit: test\n\
         interactions:\n\
         \x20 - seq: 0\n\
         \x20   port: image_generator\n\
         \x20   method: generate\n\
         \x20   input: {{}}\n\
         \x20   output:\n\
         \x20     Ok:\n\
         \x20       url: https://images.example/card.png\n\
         \x20 - seq: 1\n\
         \x20   port: image_fetcher\n\
         \x20   method: fetch\n\
         \x20   input: {{}}\n\
         \x20   output:\n\
         \x20     Ok:\n\
         \x20       data: {b64}\n\
         \x20       content_type: image/png\n"
    );
    let path = dir.join("card.cassette.yaml");
    std::fs::write(&path, content).unwrap();
    path
}

fn pdf_files(dir: &Path) -> Vec<PathBuf> {
    std::fs::read_dir(dir)
        .unwrap()
        .flatten()
        .map(|e| e.path())
        .filter(|p| p.extension().is_some_and(|e| e == "pdf"))
        .collect()
}

#[test]
fn split_card_from_cassette() {
    let dir = tempfile::tempdir().unwrap();
    let cassette = happy_cassette(dir.path(), 16, 16);

    cmd(&cassette, dir.path())
        .args(["card", "--age", "30", "--gender", "woman", "--name", "Alice"])
        .assert()
        .success()
        .stderr(predicate::str::contains("Saved: birthday_card.pdf"));

    let out = dir.path().join("birthday_card.pdf");
    let data = std::fs::read(&out).unwrap();
    assert!(data.starts_with(b"%PDF"), "output should be a PDF");

    let doc = lopdf::Document::load(&out).unwrap();
    assert_eq!(doc.get_pages().len(), 1);
}

#[test]
fn centered_card_uses_its_default_name() {
    let dir = tempfile::tempdir().unwrap();
    let cassette = happy_cassette(dir.path(), 32, 16);

    cmd(&cassette, dir.path())
        .args(["card", "--age", "5", "--layout", "centered"])
        .assert()
        .success();

    assert_eq!(pdf_files(dir.path()), vec![dir.path().join("generated_image.pdf")]);
}

#[test]
fn explicit_output_and_archive() {
    let dir = tempfile::tempdir().unwrap();
    let cassette = happy_cassette(dir.path(), 8, 8);
    let out = dir.path().join("alice.pdf");
    let archive = dir.path().join("imgs");

    cmd(&cassette, dir.path())
        .args(["card", "--age", "7", "-o", out.to_str().unwrap()])
        .args(["--archive-dir", archive.to_str().unwrap()])
        .assert()
        .success();

    assert!(out.exists());
    let archived: Vec<_> = std::fs::read_dir(&archive).unwrap().flatten().collect();
    assert_eq!(archived.len(), 1);
    let name = archived[0].file_name();
    assert!(
        name.to_string_lossy().ends_with(".png"),
        "archived image should be PNG: {name:?}"
    );
}

#[test]
fn provider_error_writes_no_pdf() {
    let dir = tempfile::tempdir().unwrap();
    let cassette = dir.path().join("error.cassette.yaml");
    std::fs::write(
        &cassette,
        "name: error-test\n\
         recorded_at: \"2026-02-01T00:00:00Z\"\n\
         commit: test\n\
         interactions:\n\
         \x20 - seq: 0\n\
         \x20   port: image_generator\n\
         \x20   method: generate\n\
         \x20   input: {}\n\
         \x20   output:\n\
         \x20     Err:\n\
         \x20       status: 400\n\
         \x20       message: content_policy_violation\n",
    )
    .unwrap();

    cmd(&cassette, dir.path())
        .args(["card", "--age", "30", "--name", "Alice"])
        .assert()
        .failure()
        .stderr(
            predicate::str::contains("Error: Generation error (400): content_policy_violation")
                .and(predicate::str::contains("Saved:").not()),
        );

    assert!(pdf_files(dir.path()).is_empty());
}

#[test]
fn undecodable_image_writes_no_pdf() {
    let dir = tempfile::tempdir().unwrap();
    let cassette = dir.path().join("garbage.cassette.yaml");
    let garbage =
        base64::engine::general_purpose::STANDARD.encode(b"<html>not an image</html>");
    std::fs::write(
        &cassette,
        format!(
            "name: garbage-test\n\
             recorded_at: \"2026-02-01T00:00:00Z\"\n\
             commit: test\n\
             interactions:\n\
             \x20 - seq: 0\n\
             \x20   port: image_generator\n\
             \x20   method: generate\n\
             \x20   input: {{}}\n\
             \x20   output:\n\
             \x20     Ok:\n\
             \x20       url: https://images.example/card.png\n\
             \x20 - seq: 1\n\
             \x20   port: image_fetcher\n\
             \x20   method: fetch\n\
             \x20   input: {{}}\n\
             \x20   output:\n\
             \x20     Ok:\n\
             \x20       data: {garbage}\n"
        ),
    )
    .unwrap();

    cmd(&cassette, dir.path())
        .args(["card", "--age", "30"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Decode error"));

    assert!(pdf_files(dir.path()).is_empty());
}

#[test]
fn missing_cassette_is_config_error() {
    let dir = tempfile::tempdir().unwrap();
    cmd(&dir.path().join("absent.yaml"), dir.path())
        .args(["card", "--age", "30"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to load cassette"));
}
