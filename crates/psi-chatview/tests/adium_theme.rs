//! Loading Adium message styles from bundle directories.

use std::fs;
use std::path::Path;

use chrono::{DateTime, FixedOffset};
use tempfile::TempDir;

use psi_chatview::adium::AdiumTheme;
use psi_chatview::model::ChatEvent;
use psi_chatview::model::HostRecord;
use psi_chatview::{ChatViewError, Dialect, Outcome, Session, StaticHost};

const PLIST: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<!DOCTYPE plist PUBLIC "-//Apple//DTD PLIST 1.0//EN" "http://www.apple.com/DTDs/PropertyList-1.0.dtd">
<plist version="1.0">
<dict>
	<key>CFBundleName</key>
	<string>Minimal</string>
	<key>DefaultVariant</key>
	<string>Dark</string>
	<key>DefaultBackgroundColor</key>
	<string>ffffff</string>
	<key>DefaultBackgroundColor:Dark</key>
	<string>202020</string>
	<key>DefaultFontFamily</key>
	<string>Helvetica</string>
	<key>DefaultFontSize</key>
	<integer>12</integer>
	<key>DisableCombineConsecutive</key>
	<true/>
</dict>
</plist>
"#;

fn write(root: &Path, relative: &str, contents: &str) {
    let path = root.join(relative);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, contents).unwrap();
}

fn bundle() -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();
    write(root, "Contents/Info.plist", PLIST);
    write(root, "Contents/Resources/main.css", "body {}");
    write(
        root,
        "Contents/Resources/header.HTML",
        "<h1>%chatName%</h1>",
    );
    write(root, "Contents/Resources/Footer.html", "<footer/>");
    write(root, "Contents/Resources/Topic.html", "<h2>topic of %chatName%</h2>");
    write(
        root,
        "Contents/Resources/Incoming/Content.html",
        r#"<div class="%messageClasses%"><b>%sender%</b> %message%</div><div id="insert"></div>"#,
    );
    write(
        root,
        "Contents/Resources/Status.html",
        r#"<div class="status">%message%</div>"#,
    );
    write(root, "Contents/Resources/Incoming/buddy_icon.png", "png");
    dir
}

fn opened() -> DateTime<FixedOffset> {
    DateTime::parse_from_rfc3339("2024-05-06T09:07:00+00:00").unwrap()
}

#[test]
fn test_load_bundle() {
    let dir = bundle();
    let theme = AdiumTheme::load(dir.path()).unwrap();
    assert_eq!(theme.name(), Some("Minimal"));
    // no Template.html: the built-in page is used
    assert_eq!(theme.version(), 4);
    assert_eq!(theme.resource("Header.html"), Some("<h1>%chatName%</h1>"));
    assert!(theme.resource("Outgoing/Content.html").is_none());
    assert_eq!(
        theme.avatars().incoming_buddy.as_deref(),
        Some("Incoming/buddy_icon.png")
    );
    assert_eq!(theme.avatars().outgoing_buddy, None);
    assert_eq!(theme.plist().get_str("DefaultBackgroundColor"), Some("202020"));
}

#[test]
fn test_theme_config() {
    let dir = bundle();
    let config = AdiumTheme::load(dir.path()).unwrap().theme_config();
    assert_eq!(config.dialect, Dialect::Adium);
    assert!(!config.grouping);
    assert!(config.templates.contains_key("Incoming/Content.html"));
    assert!(config.templates.contains_key("Status.html"));
    assert!(!config.templates.contains_key("Header.html"));
}

#[test]
fn test_session_html() {
    let dir = bundle();
    let theme = AdiumTheme::load(dir.path()).unwrap();
    let html = theme.session_html(
        "Room <1>",
        "http://localhost/theme/",
        &StaticHost::new(false),
        opened(),
        "<script/>",
    );

    assert!(html.contains(r#"<base href="http://localhost/theme/">"#));
    assert!(html.contains(r#"@import url( "main.css" );"#));
    assert!(html.contains(r#"@import url( "Variants/Dark.css" );"#));
    assert!(html.contains("<h1>Room &lt;1&gt;</h1>"));
    assert!(html.contains("<script/><footer/>"));
    assert!(html.contains(
        r#"<head><style type="text/css" media="screen,print">body { background-color:#202020 }</style>"#
    ));
    assert!(html.contains(r#"<body style="font-family:Helvetica;font-size:12pt">"#));
    assert!(!html.contains("%@"));
}

#[test]
fn test_header_variables_resolve() {
    let dir = bundle();
    write(
        dir.path(),
        "Contents/Resources/header.HTML",
        "<h1>%chatName%</h1><img src=\"%incomingIconPath%\"/><img src=\"%outgoingIconPath%\"/>\
         <p>%dateOpened% %time% %shortTime{HH:mm}% %timeOpened%</p>",
    );
    write(
        dir.path(),
        "Contents/Resources/Footer.html",
        "<footer>%dateOpened{yyyy-MM-dd}%</footer>",
    );
    write(dir.path(), "Contents/Resources/incoming_icon.png", "png");
    let theme = AdiumTheme::load(dir.path()).unwrap();

    let html = theme.session_html("c", "/", &StaticHost::new(false), opened(), "");
    assert!(html.contains(
        r#"<h1>c</h1><img src="incoming_icon.png"/><img src="qrc:/psi/default_avatar"/>"#
    ));
    assert!(html.contains("<p>Monday May 6, 2024 9:07 09:07 9:07</p>"));
    assert!(html.contains("<footer>2024-05-06</footer>"));

    let mut host = StaticHost::new(false);
    host.local_image = Some("avatar:me".to_string());
    let html = theme.session_html("c", "/", &host, opened(), "");
    assert!(html.contains(r#"<img src="avatar:me"/>"#));
}

#[test]
fn test_topic_used_in_group_chat() {
    let dir = bundle();
    let theme = AdiumTheme::load(dir.path()).unwrap();
    let html = theme.session_html("room", "/", &StaticHost::new(true), opened(), "");
    assert!(html.contains("<h2>topic of room</h2>"));
    assert!(!html.contains("<h1>"));
}

#[test]
fn test_version_two_template() {
    let dir = bundle();
    write(
        dir.path(),
        "Contents/Resources/Template.html",
        "<html><head></head><body>%@|%@|%@|%@|%@</body></html>",
    );
    let theme = AdiumTheme::load(dir.path()).unwrap();
    assert_eq!(theme.version(), 2);
    let html = theme.session_html("c", "base/", &StaticHost::new(false), opened(), "");
    assert!(html.contains("<body>base/|main.css|<h1>c</h1>|<footer/>|</body>"));
}

#[test]
fn test_declared_version_wins_over_guess() {
    let dir = bundle();
    write(
        dir.path(),
        "Contents/Info.plist",
        &PLIST.replace(
            "</dict>",
            "<key>MessageViewVersion</key><integer>3</integer></dict>",
        ),
    );
    write(dir.path(), "Contents/Resources/Template.html", "<html>%@</html>");
    assert_eq!(AdiumTheme::load(dir.path()).unwrap().version(), 3);
}

#[test]
fn test_transparent_background_skips_colour() {
    let dir = bundle();
    write(
        dir.path(),
        "Contents/Info.plist",
        &PLIST.replace(
            "</dict>",
            "<key>DefaultBackgroundIsTransparent</key><true/></dict>",
        ),
    );
    let theme = AdiumTheme::load(dir.path()).unwrap();
    assert!(theme.is_transparent());
    let html = theme.session_html("c", "/", &StaticHost::new(false), opened(), "");
    assert!(!html.contains("background-color"));
}

#[test]
fn test_missing_bundle_parts() {
    let dir = tempfile::tempdir().unwrap();
    assert!(matches!(
        AdiumTheme::load(&dir.path().join("absent")),
        Err(ChatViewError::ThemeNotFound(_))
    ));
    assert!(matches!(
        AdiumTheme::load(dir.path()),
        Err(ChatViewError::MissingResource(_))
    ));
}

#[test]
fn test_render_with_loaded_style() {
    let dir = bundle();
    let theme = AdiumTheme::load(dir.path()).unwrap();
    let mut session = Session::new(StaticHost::new(false)).with_opened(opened());
    session.init(theme.theme_config()).unwrap();

    let outcome = session.receive(HostRecord::Message(ChatEvent::chat("alice", "hi", false)));
    assert!(matches!(outcome, Outcome::Appended { grouped: false }));
    let outcome = session.receive(HostRecord::Message(ChatEvent::chat("alice", "again", false)));
    assert!(matches!(outcome, Outcome::Appended { grouped: false }));

    let html = session.to_html();
    assert!(html.contains("<b>alice</b> hi</div>"));
    assert!(html.contains("<b>alice</b> again</div>"));
    assert!(html.contains(r#"class="incoming"#));
}
