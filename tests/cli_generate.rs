//! CLI integration tests for `generate`, `resource`, the legacy `-g` flag and
//! piped stdin.
//!
//! Every run passes a config that disables the external encoder so output
//! does not depend on whether `qrencode` is installed.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use tempfile::TempDir;

fn qr_binary() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_mcp-server-qrcode"))
}

fn builtin_config(dir: &Path) -> PathBuf {
    let path = dir.join("qrcode.toml");
    std::fs::write(&path, "[encoder]\nexternal = false\n").expect("should write config");
    path
}

/// Run the binary with the given arguments and return (stdout, stderr, exit code).
fn run(args: &[&str]) -> (String, String, i32) {
    let temp = TempDir::new().expect("should create temp dir");
    let config = builtin_config(temp.path());
    let output = Command::new(qr_binary())
        .arg("--config")
        .arg(&config)
        .args(args)
        .stdin(Stdio::null())
        .output()
        .expect("Failed to execute mcp-server-qrcode");
    (
        String::from_utf8_lossy(&output.stdout).to_string(),
        String::from_utf8_lossy(&output.stderr).to_string(),
        output.status.code().unwrap_or(-1),
    )
}

/// Run with `input` piped to stdin and no arguments besides the config.
fn run_piped(input: &str) -> (String, String, i32) {
    let temp = TempDir::new().expect("should create temp dir");
    let config = builtin_config(temp.path());
    let mut child = Command::new(qr_binary())
        .arg("--config")
        .arg(&config)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("Failed to spawn mcp-server-qrcode");

    child.stdin.take().expect("no stdin").write_all(input.as_bytes()).expect("write stdin");
    let output = child.wait_with_output().expect("wait for process");
    (
        String::from_utf8_lossy(&output.stdout).to_string(),
        String::from_utf8_lossy(&output.stderr).to_string(),
        output.status.code().unwrap_or(-1),
    )
}

// ============================================================================
// generate
// ============================================================================

#[test]
fn test_generate_text_default() {
    let (stdout, _, code) = run(&["generate", "-c", "https://example.com"]);
    assert_eq!(code, 0);
    assert!(stdout.contains('█'), "should print glyphs");
}

#[test]
fn test_generate_image_to_file() {
    let temp = TempDir::new().unwrap();
    let out = temp.path().join("qr.png");
    let out_str = out.to_str().unwrap();

    let (stdout, _, code) =
        run(&["generate", "-c", "hello", "-f", "image", "-s", "300", "-e", "H", "-o", out_str]);
    assert_eq!(code, 0);
    assert!(stdout.contains("QR code image saved to"));

    let bytes = std::fs::read(&out).unwrap();
    assert_eq!(&bytes[0..4], &[0x89, 0x50, 0x4E, 0x47]);
}

#[test]
fn test_generate_image_to_stdout_is_base64() {
    let (stdout, _, code) = run(&["generate", "-c", "hello", "-f", "image"]);
    assert_eq!(code, 0);
    assert!(stdout.trim().starts_with("iVBORw0KGgo"), "base64 PNG expected, got {}", stdout);
}

#[test]
fn test_generate_missing_content() {
    let (_, stderr, code) = run(&["generate"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("No content provided"));
}

#[test]
fn test_generate_size_out_of_range() {
    let (_, stderr, code) = run(&["generate", "-c", "x", "-s", "50"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("between 100 and 1000"));
}

#[test]
fn test_generate_invalid_level() {
    let (_, _, code) = run(&["generate", "-c", "x", "-e", "Z"]);
    assert_eq!(code, 1);
}

// ============================================================================
// resource
// ============================================================================

#[test]
fn test_resource_to_file() {
    let temp = TempDir::new().unwrap();
    let out = temp.path().join("contact.png");

    let (stdout, _, code) =
        run(&["resource", "qrcode://contact?name=John%20Doe", "-o", out.to_str().unwrap()]);
    assert_eq!(code, 0);
    assert!(stdout.contains("QR code image saved to"));
    assert!(out.exists());
}

#[test]
fn test_resource_without_output_prints_summary() {
    let (stdout, _, code) = run(&["resource", "qrcode://sample"]);
    assert_eq!(code, 0);
    assert!(stdout.contains("QR Code generated successfully."));
    assert!(stdout.contains("Resource URI: qrcode://sample"));
    assert!(stdout.contains("--output"));
}

#[test]
fn test_resource_wrong_scheme() {
    let (_, stderr, code) = run(&["resource", "https://example.com"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("must start with qrcode://"));
    assert!(stderr.contains("Examples:"));
}

#[test]
fn test_resource_missing_parameter() {
    let (_, stderr, code) = run(&["resource", "qrcode://wifi?password=x"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("Missing required parameter: ssid"));
}

// ============================================================================
// legacy flags and piped stdin
// ============================================================================

#[test]
fn test_legacy_generate_flag() {
    let (stdout, _, code) = run(&["-g", "legacy content", "-s", "300", "-e", "L"]);
    assert_eq!(code, 0);
    assert!(stdout.contains('█'));
}

#[test]
fn test_piped_stdin() {
    let (stdout, _, code) = run_piped("  piped content \n");
    assert_eq!(code, 0);
    assert!(stdout.contains('█'));
}

#[test]
fn test_piped_empty_stdin() {
    let (_, stderr, code) = run_piped("   \n");
    assert_eq!(code, 1);
    assert!(stderr.contains("No content provided"));
}

#[test]
fn test_bad_config_fails() {
    let temp = TempDir::new().unwrap();
    let config = temp.path().join("bad.toml");
    std::fs::write(&config, "[defaults]\nsize = 5\n").unwrap();

    let output = Command::new(qr_binary())
        .args(["--config", config.to_str().unwrap(), "generate", "-c", "x"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("defaults.size"));
}
