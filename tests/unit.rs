//! Unit tests for routing keys, the response recorder and small helpers.
mod common;
use common::*;
use michi::error::{FunnelConversionError, MediaError};
use michi::prelude::*;

#[test]
fn test_rating_routing_keys() {
    let key = |n: u8| routing_key(&Answer::from(n), AnswerType::Rating);
    assert_eq!(key(1), "low");
    assert_eq!(key(2), "low");
    assert_eq!(key(3), "medium");
    assert_eq!(key(4), "medium");
    assert_eq!(key(5), "high");
}

#[test]
fn test_choice_and_yes_no_routing_keys() {
    assert_eq!(
        routing_key(&Answer::from(0usize), AnswerType::MultipleChoice),
        "0"
    );
    assert_eq!(
        routing_key(&Answer::from(12usize), AnswerType::MultipleChoice),
        "12"
    );
    assert_eq!(routing_key(&Answer::Bool(true), AnswerType::YesNo), "yes");
    assert_eq!(routing_key(&Answer::Bool(false), AnswerType::YesNo), "no");
}

#[test]
fn test_other_answer_types_route_by_default() {
    for answer_type in [
        AnswerType::None,
        AnswerType::Button,
        AnswerType::Text,
        AnswerType::Email,
    ] {
        assert_eq!(routing_key(&Answer::from("hello"), answer_type), "default");
        assert_eq!(routing_key(&Answer::Bool(true), answer_type), "default");
    }
    // Shape that does not fit the declared type
    assert_eq!(routing_key(&Answer::from("yes"), AnswerType::YesNo), "default");
    assert_eq!(
        routing_key(&Answer::from("1"), AnswerType::MultipleChoice),
        "default"
    );
}

#[test]
fn test_answer_type_wire_names() {
    assert_eq!(AnswerType::from_wire("yesno"), Some(AnswerType::YesNo));
    assert_eq!(
        AnswerType::from_wire("multipleChoice"),
        Some(AnswerType::MultipleChoice)
    );
    assert_eq!(AnswerType::from_wire("slider"), None);
    assert_eq!(AnswerType::YesNo.to_string(), "yesno");
    assert_eq!(
        serde_json::to_string(&AnswerType::MultipleChoice).unwrap(),
        "\"multipleChoice\""
    );
}

#[test]
fn test_recorder_is_append_only() {
    let graph = graph(
        vec![
            routes(video("Q", AnswerType::YesNo), &[("yes", "Y"), ("no", "N")]),
            video("Y", AnswerType::None),
            video("N", AnswerType::None),
        ],
        &[],
        &[],
    );
    let mut recorder = ResponseRecorder::new();

    let next = recorder.record_and_route(&graph, "Q", Answer::Bool(false), AnswerType::YesNo);
    assert_eq!(next, Some("N".to_string()));
    let first = recorder.responses()[0].clone();

    let next = recorder.record_and_route(&graph, "Y", Answer::from("ok"), AnswerType::Button);
    assert_eq!(next, None);

    assert_eq!(recorder.len(), 2);
    assert_eq!(recorder.responses()[0], first);
    assert_eq!(recorder.responses()[1].node_id, "Y");
    assert_eq!(recorder.responses()[1].answer_type, AnswerType::Button);
    assert!(recorder.responses()[0].timestamp <= recorder.responses()[1].timestamp);
}

#[test]
fn test_response_serializes_with_iso_timestamp() {
    let graph = linear_chain();
    let mut recorder = ResponseRecorder::new();
    recorder.record_and_route(&graph, "B", Answer::from("continue"), AnswerType::Button);

    let json = serde_json::to_value(&recorder.responses()[0]).unwrap();
    assert_eq!(json["nodeId"], "B");
    assert_eq!(json["answer"], "continue");
    assert_eq!(json["answerType"], "button");
    let timestamp = json["timestamp"].as_str().unwrap();
    assert!(chrono::DateTime::parse_from_rfc3339(timestamp).is_ok());
}

#[test]
fn test_embed_host_opens_on_funnel_started() {
    let mut host = EmbedHost::new();
    assert!(!host.handle_message(r#"{"type":"video_progress"}"#));
    assert!(!host.handle_message("not json"));
    assert!(!host.is_modal_open());

    assert!(host.handle_message(r#"{"type":"funnel_started"}"#));
    assert!(host.is_modal_open());
    // Already open
    assert!(!host.handle_message(r#"{"type":"funnel_started"}"#));

    host.close();
    assert!(!host.is_modal_open());
    assert_eq!(
        EmbedMessage::from_value(&serde_json::json!({ "type": "funnel_started" })),
        Some(EmbedMessage::FunnelStarted)
    );
}

#[test]
fn test_config_defaults_fill_missing_fields() {
    let config: PlayerConfig = serde_json::from_str(r#"{ "transitionMs": 150 }"#).unwrap();
    assert_eq!(config.transition_ms, 150);
    assert_eq!(config.default_reveal_delay, 0.0);
    assert!(config.muted_fallback);
    assert_eq!(
        PlayerConfig::default().transition_duration(),
        std::time::Duration::from_millis(300)
    );
}

#[test]
fn test_error_display() {
    let err = FunnelConversionError::InvalidNodeType {
        node_id: "n1".to_string(),
        type_name: "quiz".to_string(),
    };
    assert!(err.to_string().contains("n1"));
    assert!(err.to_string().contains("quiz"));
    assert!(MediaError::Autoplay.to_string().contains("autoplay"));
}

#[test]
fn test_whole_number_answers_serialize_as_integers() {
    assert_eq!(
        serde_json::to_value(Answer::from(4u8)).unwrap(),
        serde_json::json!(4)
    );
    assert_eq!(serde_json::to_string(&Answer::from(0usize)).unwrap(), "0");
    assert_eq!(serde_json::to_string(&Answer::Number(2.5)).unwrap(), "2.5");

    let graph = graph(
        vec![routes(video("R", AnswerType::Rating), &[("default", "E")]), end("E")],
        &[],
        &[],
    );
    let mut recorder = ResponseRecorder::new();
    recorder.record_and_route(&graph, "R", Answer::from(4u8), AnswerType::Rating);

    let json = serde_json::to_string(recorder.responses()).unwrap();
    assert!(json.contains(r#""answer":4,"#));
    let restored: Vec<Response> = serde_json::from_str(&json).unwrap();
    assert_eq!(restored[0].answer, Answer::Number(4.0));
}
