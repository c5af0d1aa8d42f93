//! End-to-end tests for the dump command.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;

use psi_cli::commands::run_dump;

// Header, one extended toolbar record: line at top with a floating
// "mainToolBar" (x=10 y=20 w=200 h=24).
fn sample_blob() -> String {
    use psi_layout::FloatingRect;
    use psi_layout::header::{TOOLBAR_STATE_MARKER_EX, build_header};

    let mut data = build_header().to_vec();
    data.push(TOOLBAR_STATE_MARKER_EX);
    data.extend(1i32.to_be_bytes());
    data.extend(2i32.to_be_bytes());
    data.extend(1i32.to_be_bytes());
    let name: Vec<u8> = "mainToolBar"
        .encode_utf16()
        .flat_map(u16::to_be_bytes)
        .collect();
    data.extend((name.len() as u32).to_be_bytes());
    data.extend(name);
    data.push(1);
    data.extend(0i32.to_be_bytes());
    data.extend((-1i32).to_be_bytes());
    let (geom0, geom1) = FloatingRect::floating(10, 20, 200, 24).pack();
    data.extend(geom0.to_be_bytes());
    data.extend(geom1.to_be_bytes());
    STANDARD.encode(&data)
}

#[test]
fn test_dump_floating_toolbar() {
    let text = run_dump(&sample_blob()).unwrap();
    insta::assert_snapshot!(text, @r"
    state version 0
    toolbar layout (extended): 1 line(s)
    [line 0: top]
      - name: mainToolBar
        pos: top
        shown: true
        item_pos: 0
        item_size: -1
        rect: floating:true x:10 y:20 w:200 h:24
    ");
}

#[test]
fn test_header_only_blob() {
    assert_eq!(run_dump("AAAA/wAAAAA=").unwrap(), "state version 0\n");
}

#[test]
fn test_invalid_blob_reports_error() {
    let error = run_dump("AAAA/gAAAAA=").unwrap_err();
    let message = format!("{error:#}");
    assert!(message.starts_with("decode toolbar state"), "{message}");
    assert!(message.contains("0xfe") || message.contains("254"), "{message}");
}

#[test]
fn test_garbage_is_rejected() {
    assert!(run_dump("%%%").is_err());
}
