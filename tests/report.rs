use mcsinfo::{format_server_info, strip_color_codes, Motd, RawPayload, StatusError};
use serde_json::json;

fn lines(report: &str) -> Vec<&str> {
    report.split('\n').collect()
}

#[test]
fn full_payload_report() {
    let report = format_server_info(
        r#"{"version":"1.20","protocol":765,"playersOnline":3,"maxPlayers":20,"ping":42,"motd":"§aWelcome§r!"}"#,
    )
    .unwrap();

    assert_eq!(
        lines(&report),
        [
            "🖥️ 服务器信息:",
            "版本: 1.20",
            "协议: 765",
            "玩家: 3/20",
            "延迟: 42ms",
            "标语: Welcome!",
        ]
    );
}

#[test]
fn absent_motd_renders_empty() {
    let report = format_server_info(json!({"version": "1.20"})).unwrap();
    assert_eq!(lines(&report)[5], "标语: ");
}

#[test]
fn empty_motd_string_renders_empty() {
    let report = format_server_info(json!({"motd": ""})).unwrap();
    assert_eq!(lines(&report)[5], "标语: ");
}

#[test]
fn missing_version_and_ping_use_defaults() {
    let report = format_server_info(json!({"protocol": 47, "motd": {"text": "hi"}})).unwrap();
    let lines = lines(&report);

    assert_eq!(lines[1], "版本: 未知");
    assert_eq!(lines[4], "延迟: 0ms");
    assert_eq!(lines[5], "标语: hi");
}

#[test]
fn textual_protocol_is_kept() {
    let report = format_server_info(json!({"protocol": "1.20-pre"})).unwrap();
    assert_eq!(lines(&report)[2], "协议: 1.20-pre");
}

#[test]
fn structured_and_textual_inputs_agree() {
    let value = json!({
        "version": "Velocity 3.3.0",
        "playersOnline": 12,
        "maxPlayers": 500,
        "motd": [{"text": "§cRed", "extra": [" and ", {"text": "§9blue"}]}, "§r!"]
    });

    let from_value = format_server_info(RawPayload::Structured(value.clone())).unwrap();
    let from_text = format_server_info(value.to_string()).unwrap();

    assert_eq!(from_value, from_text);
    assert_eq!(lines(&from_value)[5], "标语: Red and blue!");
}

#[test]
fn malformed_payload_produces_no_report() {
    for bad in ["{\"version\": \"1.20\"", "not json", "", "{,}"] {
        let err = format_server_info(bad).unwrap_err();
        assert!(
            matches!(err, StatusError::Decode(_) | StatusError::Empty),
            "{bad:?} gave {err}"
        );
    }
}

#[test]
fn normalizer_properties() {
    let cases = [
        (json!("Hello"), "Hello"),
        (json!({"text": "Hi"}), "Hi"),
        (
            json!({"text": "A", "extra": [{"text": "B"}, {"text": "C", "extra": [{"text": "D"}]}]}),
            "ABCD",
        ),
        (json!([{"text": "X"}, "Y"]), "XY"),
    ];

    for (value, expected) in cases {
        assert_eq!(Motd::from_value(&value).normalize(), expected, "{value}");
    }
}

#[test]
fn stripper_leaves_plain_text_alone() {
    for text in ["", "Welcome!", "§ alone", "50§ off", "§g§z", "line\nbreak\ttab"] {
        assert_eq!(strip_color_codes(text), text);
        assert_eq!(strip_color_codes(&strip_color_codes(text)), text);
    }
}
