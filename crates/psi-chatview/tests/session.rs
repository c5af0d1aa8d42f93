//! Session behaviour: grouping, replacement, error isolation and previews.

use serde_json::{Value, json};

use psi_chatview::model::{ChatEvent, HostRecord, MessageType, ReplaceEvent};
use psi_chatview::{
    ChatViewError, DOUBLE_INIT_MESSAGE, Outcome, PreviewKind, ProxyDecision, Segment, Session,
    SessionState, StaticHost, Template, ThemeConfig, Transcript,
};

fn config() -> ThemeConfig {
    ThemeConfig::default()
        .with_template("receivedMessage", "<p>%sender%: %message%</p>%next%")
        .with_template("sentMessage", r#"<p class="me">%sender%: %message%</p>%next%"#)
        .with_template("messageGroupping", "<p>%message%</p>%next%")
        .with_template("sys", "<i>%message%</i>")
}

fn session() -> Session<StaticHost> {
    let mut session = Session::new(StaticHost::new(false));
    session.init(config()).unwrap();
    session
}

fn chat(sender: &str, text: &str) -> HostRecord {
    HostRecord::Message(ChatEvent::chat(sender, text, false))
}

fn grouped(outcome: &Outcome) -> bool {
    match outcome {
        Outcome::Appended { grouped } => *grouped,
        other => panic!("expected an appended event, got {other:?}"),
    }
}

#[test]
fn test_consecutive_messages_are_grouped() {
    let mut session = session();
    assert!(!grouped(&session.receive(chat("alice", "one"))));
    assert!(grouped(&session.receive(chat("alice", "two"))));
    assert!(grouped(&session.receive(chat("alice", "three"))));
    assert_eq!(
        session.to_html(),
        "<p>alice: one</p><p>two</p><p>three</p>"
    );
}

#[test]
fn test_any_key_change_breaks_grouping() {
    let mutations: Vec<(&str, fn(&mut ChatEvent))> = vec![
        ("userid", |event| event.userid = Some("bob".to_string())),
        ("local", |event| event.local = true),
        ("emote", |event| event.emote = true),
    ];
    for (field, mutate) in mutations {
        let mut session = session();
        session.receive(chat("alice", "one"));
        let mut next = ChatEvent::chat("alice", "two", false);
        mutate(&mut next);
        let outcome = session.receive(HostRecord::Message(next));
        assert!(!grouped(&outcome), "changed {field} should start a new group");
    }
}

#[test]
fn test_non_chat_events_stop_grouping() {
    let mut session = session();
    session.receive(chat("alice", "one"));
    let mut notice = ChatEvent::new(MessageType::System);
    notice.message = Some("alice is away".to_string());
    assert!(!grouped(&session.receive(HostRecord::Message(notice))));
    assert!(!grouped(&session.receive(chat("alice", "two"))));
    assert_eq!(
        session.to_html(),
        "<p>alice: one</p><i>alice is away</i><p>alice: two</p>"
    );
}

#[test]
fn test_trackbar_and_clear_stop_grouping() {
    let mut session = session();
    session.receive(chat("alice", "one"));
    assert!(matches!(
        session.receive(HostRecord::Trackbar),
        Outcome::TrackbarMoved
    ));
    assert!(!grouped(&session.receive(chat("alice", "two"))));
    session.receive(HostRecord::Trackbar);
    assert_eq!(
        session.to_html(),
        "<p>alice: one</p><p>alice: two</p><hr/>"
    );

    assert!(matches!(session.receive(HostRecord::Clear), Outcome::Cleared));
    assert!(session.transcript().is_empty());
    assert!(!grouped(&session.receive(chat("alice", "three"))));
}

#[test]
fn test_grouping_disabled() {
    let mut session = Session::new(StaticHost::new(false));
    session.init(config().with_grouping(false)).unwrap();
    session.receive(chat("alice", "one"));
    assert!(!grouped(&session.receive(chat("alice", "two"))));
}

#[test]
fn test_no_continuation_template_means_no_grouping() {
    let mut session = Session::new(StaticHost::new(false));
    session
        .init(ThemeConfig::default().with_template("receivedMessage", "<p>%message%</p>%next%"))
        .unwrap();
    session.receive(chat("alice", "one"));
    assert!(!grouped(&session.receive(chat("alice", "two"))));
}

#[test]
fn test_replace_round_trip() {
    let mut session = session();
    let mut original = ChatEvent::chat("alice", "helo", false);
    original.id = Some("m1".to_string());
    session.receive(HostRecord::Message(original));
    assert_eq!(
        session.to_html(),
        r#"<p>alice: <psims mid="r:m1"></psims>helo<psime mid="r:m1"></psime></p>"#
    );

    let outcome = session.receive_json(
        r#"{"type":"replace","replaceId":"m1","mtype":"message","sender":"alice",
            "userid":"alice","id":"m2","message":"hello"}"#,
    );
    assert!(matches!(outcome, Outcome::Replaced));
    assert_eq!(
        session.to_html(),
        r#"<p>alice: <psims mid="r:m2"></psims>hello<psime mid="r:m2"></psime></p>"#
    );

    // The new id is the one to replace next.
    let mut again = ChatEvent::chat("alice", "hello!", false);
    again.id = Some("m3".to_string());
    let outcome = session.receive(HostRecord::Replace(ReplaceEvent {
        replace_id: "m2".to_string(),
        event: again,
    }));
    assert!(matches!(outcome, Outcome::Replaced));
    assert!(session.to_html().contains("hello!"));
    assert!(!session.to_html().contains("m2"));
}

#[test]
fn test_empty_id_gets_no_replace_markers() {
    let mut session = session();
    let mut original = ChatEvent::chat("alice", "plain", false);
    original.id = Some(String::new());
    session.receive(HostRecord::Message(original));
    assert_eq!(session.to_html(), "<p>alice: plain</p>");

    // A replacement with an empty id keeps the replaced id.
    let mut first = ChatEvent::chat("bob", "helo", false);
    first.id = Some("b1".to_string());
    session.receive(HostRecord::Message(first));
    let outcome = session.receive_json(
        r#"{"type":"replace","replaceId":"b1","mtype":"message","sender":"bob",
            "userid":"bob","id":"","message":"hello"}"#,
    );
    assert!(matches!(outcome, Outcome::Replaced));
    insta::assert_snapshot!(
        session.to_html(),
        @r#"<p>alice: plain</p><p>bob: <psims mid="r:b1"></psims>hello<psime mid="r:b1"></psime></p>"#
    );
}

#[test]
fn test_local_time_stamps_render() {
    let mut session = Session::new(StaticHost::new(false));
    session
        .init(config().with_template(
            "receivedMessage",
            "<p>[%time{HH:mm:ss}%] %sender%: %message%</p>%next%",
        ))
        .unwrap();
    let outcome = session.receive_json(
        r#"{"type":"message","mtype":"message","sender":"alice","userid":"alice",
            "time":"2024-03-01T10:15:30.123","message":"on time"}"#,
    );
    assert!(matches!(outcome, Outcome::Appended { grouped: false }));
    insta::assert_snapshot!(session.to_html(), @"<p>[10:15:30] alice: on time</p>");
}

#[test]
fn test_replace_keys_by_sender_in_group_chat() {
    let mut session = Session::new(StaticHost::new(true));
    session.init(config()).unwrap();
    let mut original = ChatEvent::chat("alice", "x", false);
    original.id = Some("7".to_string());
    session.receive(HostRecord::Message(original));
    assert!(session.to_html().contains(r#"<psims mid="alice:7">"#));
}

#[test]
fn test_replace_miss_appends_message() {
    let mut session = session();
    session.receive(chat("alice", "one"));
    let outcome = session.receive(HostRecord::Replace(ReplaceEvent {
        replace_id: "unknown".to_string(),
        event: ChatEvent::chat("bob", "fresh", false),
    }));
    assert!(matches!(outcome, Outcome::Appended { grouped: false }));
    assert!(session.to_html().ends_with("<p>bob: fresh</p>"));
}

#[test]
fn test_records_before_init_show_banner() {
    let mut session = Session::new(StaticHost::new(false));
    assert_eq!(session.state(), SessionState::Idle);
    assert!(matches!(
        session.receive(chat("alice", "hi")),
        Outcome::NotInitialized
    ));
    let html = session.to_html();
    assert!(html.contains("A try to output data while theme is not inited."));
    assert!(html.contains("output is impossible.<br/>Check if your theme"));
}

#[test]
fn test_init_is_one_shot() {
    let mut session = session();
    assert_eq!(session.state(), SessionState::Active);
    assert!(matches!(
        session.init(config()),
        Err(ChatViewError::AlreadyInitialized)
    ));
    assert!(session.to_html().contains(DOUBLE_INIT_MESSAGE));
    assert_eq!(session.state(), SessionState::Active);
}

#[test]
fn test_failures_are_isolated() {
    let mut session = session();
    let outcome = session.receive_json(r#"{"type":"js","name":"missing","args":[]}"#);
    assert!(matches!(
        outcome,
        Outcome::Failed(ChatViewError::UnknownHook(ref name)) if name == "missing"
    ));
    let outcome = session.receive(HostRecord::Message(ChatEvent::new(MessageType::FtReq)));
    assert!(matches!(
        outcome,
        Outcome::Failed(ChatViewError::TemplateNotFound { .. })
    ));
    assert!(session.receive_json("{not json").is_failure());

    assert!(!grouped(&session.receive(chat("alice", "still here"))));
    let html = session.to_html();
    assert_eq!(html.matches("APPEND ERROR: ").count(), 3);
    assert!(html.contains("APPEND ERROR: unknown hook: missing"));
    assert!(html.ends_with("<p>alice: still here</p>"));
}

#[test]
fn test_hooks_are_called_by_name() {
    let mut session = session();
    session.hooks_mut().register_hook(
        "note",
        |transcript: &mut Transcript, args: &[Value]| -> psi_chatview::Result<()> {
            let text = args.first().and_then(Value::as_str).unwrap_or_default();
            transcript.append(vec![Segment::Html(format!("<b>{text}</b>"))]);
            Ok(())
        },
    );
    let outcome = session.receive(
        HostRecord::from_value(json!({"type": "js", "name": "note", "args": ["hi"]})).unwrap(),
    );
    assert!(matches!(outcome, Outcome::HookCalled));
    assert_eq!(session.to_html(), "<b>hi</b>");
}

#[test]
fn test_var_handler_overrides_template_variable() {
    let mut session = session();
    session
        .hooks_mut()
        .register_var("sender", |event: &ChatEvent| {
            event.sender.as_deref().unwrap_or_default().to_uppercase()
        });
    session.receive(chat("alice", "hi"));
    assert_eq!(session.to_html(), "<p>ALICE: hi</p>");
}

#[test]
fn test_proxy_can_stop_or_restyle() {
    let mut session = session();
    session.hooks_mut().set_proxy(|record: &HostRecord| match record {
        HostRecord::Message(event) if event.message.as_deref() == Some("spam") => {
            ProxyDecision::Stop
        }
        HostRecord::Message(event) if event.sender.as_deref() == Some("bot") => {
            ProxyDecision::Render(Template::parse("<tt>%message%</tt>"))
        }
        _ => ProxyDecision::Continue,
    });
    assert!(matches!(session.receive(chat("eve", "spam")), Outcome::Stopped));
    session.receive(chat("bot", "beep"));
    session.receive(chat("bot", "boop"));
    assert_eq!(session.to_html(), "<tt>beep</tt><tt>boop</tt>");
}

#[test]
fn test_avatars_and_receipts() {
    let mut session = Session::new(StaticHost::new(true));
    session.init(config()).unwrap();
    let outcome = session.receive_json(
        r#"{"type":"avatar","sender":"bob","avatar":"avatar://bob"}"#,
    );
    assert!(matches!(outcome, Outcome::Updated));
    assert_eq!(session.users().avatar_for_nick("bob"), Some("avatar://bob"));

    session.receive_json(r#"{"type":"receipt","id":"m1"}"#);
    assert!(session.is_delivered("m1"));
    assert!(!session.is_delivered("m2"));

    session.receive_json(r#"{"type":"settings","fontSize":12}"#);
    assert_eq!(session.settings().get("fontSize"), Some(&json!(12)));

    assert!(matches!(
        session.receive_json(r#"{"type":"bogus"}"#),
        Outcome::Ignored
    ));
}

#[test]
fn test_image_link_preview_by_extension() {
    let mut session = session();
    session.receive(chat(
        "alice",
        r#"look <a href="https://example.org/cat.png">cat</a>"#,
    ));
    let html = session.to_html();
    assert!(html.contains(r#"<a href="https://example.org/cat.png">cat</a><div class="psi-preview"><img src="https://example.org/cat.png""#));
    assert_eq!(session.host().header_requests.len(), 1);
}

#[test]
fn test_youtube_link_needs_no_header_request() {
    let mut session = session();
    session.receive(chat(
        "alice",
        r#"<a href="https://www.youtube.com/watch?v=dQw4w9WgXcQ">video</a>"#,
    ));
    assert!(session.host().header_requests.is_empty());
    let link = session
        .transcript()
        .segments()
        .iter()
        .find_map(|segment| match segment {
            Segment::Link(link) => Some(link),
            _ => None,
        })
        .unwrap();
    assert_eq!(
        link.preview,
        Some(PreviewKind::Youtube {
            video_id: "dQw4w9WgXcQ".to_string()
        })
    );
}

#[test]
fn test_deferred_headers_completed_by_tranend() {
    let mut host = StaticHost::new(false);
    host.deferred_headers = true;
    let mut session = Session::new(host);
    session.init(config()).unwrap();
    session.receive(chat("alice", r#"<a href="https://example.org/clip">clip</a>"#));
    assert!(!session.to_html().contains("psi-preview"));
    let (transaction, url) = session.host().header_requests[0].clone();
    assert_eq!(url, "https://example.org/clip");

    let outcome = session.receive(
        HostRecord::from_value(json!({
            "type": "tranend",
            "id": transaction,
            "value": {"Content-Type": "video/mp4"}
        }))
        .unwrap(),
    );
    assert!(matches!(outcome, Outcome::Updated));
    assert!(session.to_html().contains(r#"<video controls src="https://example.org/clip""#));

    // A second answer for the same transaction is ignored.
    let outcome = session.receive(
        HostRecord::from_value(json!({"type": "tranend", "id": transaction, "value": {}}))
            .unwrap(),
    );
    assert!(matches!(outcome, Outcome::Ignored));
}

#[test]
fn test_local_message_pins_scroller() {
    let mut session = session();
    session.scroller_mut().on_scroll(&psi_chatview::Viewport::new(1000, 300, 0));
    assert!(!session.scroller().at_bottom());
    session.receive(chat("alice", "incoming"));
    assert!(!session.scroller().is_animating());
    session.receive(HostRecord::Message(ChatEvent::chat("me", "outgoing", true)));
    assert!(session.scroller().at_bottom());
    assert!(session.scroller().is_animating());
}

#[test]
fn test_icons_become_images() {
    let mut session = session();
    session.receive(chat("alice", r#"<icon name="psi/smile" text=":)"/>"#));
    assert_eq!(
        session.to_html(),
        r#"<p>alice: <img src="icon:psi/smile" title=":)"/></p>"#
    );
}
