#![allow(clippy::unwrap_used, clippy::expect_used)]

use daybrief_core::*;

// ---------------------------------------------------------------------------
// 1. Error Display and From impls
// ---------------------------------------------------------------------------

#[test]
fn error_display_and_from_impls() {
    let platform_err = DaybriefError::Platform("channel_not_found".to_string());
    assert_eq!(platform_err.to_string(), "Platform error: channel_not_found");

    let completion_err = DaybriefError::Completion("401 Unauthorized".to_string());
    assert_eq!(
        completion_err.to_string(),
        "Completion error: 401 Unauthorized"
    );

    let config_err = DaybriefError::Config("missing bot_token".to_string());
    assert_eq!(config_err.to_string(), "Config error: missing bot_token");

    let json_err: DaybriefError = serde_json::from_str::<serde_json::Value>("{not json")
        .unwrap_err()
        .into();
    assert!(matches!(json_err, DaybriefError::Json(_)));

    let io_err: DaybriefError =
        std::io::Error::new(std::io::ErrorKind::NotFound, "gone").into();
    assert_eq!(io_err.to_string(), "IO error: gone");
}

// ---------------------------------------------------------------------------
// 2. Message records survive a JSON trip with their exact timestamp text
// ---------------------------------------------------------------------------

#[test]
fn message_keeps_timestamp_text_through_json() {
    let msg = Message::new("U1", "hi", "1712345678.000200".parse().unwrap());
    let json = serde_json::to_string(&msg).unwrap();
    assert!(json.contains("\"1712345678.000200\""));

    let back: Message = serde_json::from_str(&json).unwrap();
    assert_eq!(back, msg);
    assert_eq!(back.ts.as_str(), "1712345678.000200");
}

// ---------------------------------------------------------------------------
// 3. Today's window is a full day
// ---------------------------------------------------------------------------

#[test]
fn today_window_spans_a_day() {
    let window = DayWindow::today().unwrap();
    let span = window.latest - window.oldest;
    // 23h, 24h or 25h days minus the closing second.
    assert!([82_799, 86_399, 89_999].contains(&span), "span was {span}");
}
