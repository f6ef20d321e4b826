//! End-to-end walks through complete funnels.
mod common;
use common::*;
use michi::data::{VisitorAction, VisitorScript};
use michi::prelude::*;
use std::sync::Arc;

#[test]
fn test_linear_video_chain() {
    let graph = linear_chain();
    let mut player = FunnelPlayer::new(Arc::clone(&graph));

    player.start();
    assert_eq!(player.current_node_id(), Some("A"));

    player.on_media(MediaEvent::time_update("A", 5.0, 10.0));
    player.on_media(MediaEvent::ended("A"));
    player.finish_transition();
    assert_eq!(player.current_node_id(), Some("B"));

    player.press_button();
    player.finish_transition();
    assert!(player.is_completed());
    assert_eq!(player.current_node_id(), Some("C"));
}

#[test]
fn test_multiple_choice_branch() {
    let graph = graph(
        vec![
            start(),
            routes(choice("Q", &["yes", "no"]), &[("0", "Y"), ("1", "N")]),
            end("Y"),
            end("N"),
        ],
        &[("start", "Q")],
        &[],
    );

    let mut player = started(&graph);
    player.choose(0);
    assert_eq!(player.finish_transition(), Step::Completed("Y".to_string()));

    let mut player = started(&graph);
    player.choose(1);
    assert_eq!(player.finish_transition(), Step::Completed("N".to_string()));
}

#[test]
fn test_yes_no_default_fallback() {
    let graph = graph(
        vec![
            start(),
            routes(video("R", AnswerType::YesNo), &[("default", "Z")]),
            end("Z"),
        ],
        &[("start", "R")],
        &[],
    );

    for yes in [true, false] {
        let mut player = started(&graph);
        assert_eq!(
            player.answer_yes_no(yes),
            Step::Transitioning {
                from: "R".to_string(),
                to: "Z".to_string()
            }
        );
        assert_eq!(player.responses()[0].answer, Answer::Bool(yes));
    }
}

#[test]
fn test_lead_capture_stores_fields_verbatim() {
    let graph = graph(
        vec![start(), lead("L", &["firstName", "email"]), end("E")],
        &[("start", "L")],
        &["start", "L", "E"],
    );
    let mut player = started(&graph);

    let fields = lead_data(&[("firstName", "Max"), ("email", "m@x.com")]);
    player.submit_lead(fields.clone());
    assert_eq!(player.finish_transition(), Step::Completed("E".to_string()));

    let submission = player.submission().unwrap();
    assert_eq!(submission.lead_data, Some(fields));
    assert_eq!(submission.end_node_id.as_deref(), Some("E"));
}

#[test]
fn test_sample_funnel_with_sample_script() {
    let graph = Arc::new(FunnelGraph::new(
        FunnelData::from_json(SAMPLE_FUNNEL_JSON).unwrap(),
    ));
    let script: VisitorScript =
        serde_json::from_str(include_str!("../data/script.json")).unwrap();
    let mut player = FunnelPlayer::new(Arc::clone(&graph));

    let steps = script.play_on(&mut player);

    let visited: Vec<_> = steps.iter().filter_map(|s| s.node_id.as_deref()).collect();
    assert_eq!(
        visited,
        [
            "intro",
            "experience",
            "experience",
            "strategy",
            "strategy",
            "commitment",
            "commitment",
            "lead",
            "done"
        ]
    );
    assert_eq!(steps[2].step, Step::ControlsRevealed);

    assert!(player.is_completed());
    let answered: Vec<_> = player
        .responses()
        .iter()
        .map(|r| r.node_id.as_str())
        .collect();
    assert_eq!(answered, ["experience", "strategy", "commitment"]);
    assert_eq!(
        player.lead_data().and_then(|d| d.get("firstName")).map(String::as_str),
        Some("Max")
    );
}

#[test]
fn test_sample_funnel_low_rating_goes_to_nurture() {
    let graph = Arc::new(FunnelGraph::new(
        FunnelData::from_json(SAMPLE_FUNNEL_JSON).unwrap(),
    ));
    let script = VisitorScript {
        actions: vec![
            VisitorAction::Start,
            VisitorAction::Watch { seconds: None },
            VisitorAction::Watch { seconds: None },
            VisitorAction::Choose { index: 2 },
            VisitorAction::Watch { seconds: None },
            VisitorAction::YesNo { yes: true },
            VisitorAction::Watch { seconds: None },
            VisitorAction::Rate { rating: 2 },
            VisitorAction::Watch { seconds: None },
            VisitorAction::Text {
                value: "max@example.com".to_string(),
            },
        ],
    };
    let mut player = FunnelPlayer::new(Arc::clone(&graph));
    script.play_on(&mut player);

    assert_eq!(player.current_node_id(), Some("done"));
    let last = player.responses().last().unwrap();
    assert_eq!(last.node_id, "nurture");
    assert_eq!(last.answer, Answer::from("max@example.com"));
    assert!(player.lead_data().is_none());
    assert!(player.submission().is_some());
}

#[test]
fn test_passive_visitor_stops_at_first_question() {
    let graph = Arc::new(FunnelGraph::new(
        FunnelData::from_json(SAMPLE_FUNNEL_JSON).unwrap(),
    ));
    let mut player = FunnelPlayer::new(Arc::clone(&graph));
    let steps = VisitorScript::passive(3).play_on(&mut player);

    assert_eq!(steps.len(), 4);
    // The multiple-choice node waits for an answer however long it is watched
    assert_eq!(player.current_node_id(), Some("experience"));
    assert!(player.buttons_visible());
    assert!(player.responses().is_empty());
}

#[test]
fn test_long_watch_finishes_with_bounded_updates() {
    let graph = linear_chain();
    let mut player = started(&graph);

    let step = michi::data::script::apply(
        &mut player,
        &VisitorAction::Watch {
            seconds: Some(1.0e15),
        },
    );
    assert!(matches!(step, Step::Transitioning { .. }));
    player.finish_transition();
    assert_eq!(player.current_node_id(), Some("B"));
}

#[test]
fn test_long_watch_still_reveals_controls() {
    let graph = graph(
        vec![
            start(),
            with_delay(video("Q", AnswerType::YesNo), 4.0),
            end("E"),
        ],
        &[("start", "Q"), ("Q", "E")],
        &[],
    );
    let mut player = started(&graph);

    let step = michi::data::script::apply(
        &mut player,
        &VisitorAction::Watch {
            seconds: Some(3.0e7),
        },
    );
    assert_eq!(step, Step::ControlsRevealed);
    assert_eq!(player.progress(), 100.0);
}

#[test]
fn test_unplayable_watch_durations_are_ignored() {
    let graph = linear_chain();
    let mut player = started(&graph);

    for seconds in [f64::NAN, f64::INFINITY, -5.0] {
        let step = michi::data::script::apply(
            &mut player,
            &VisitorAction::Watch {
                seconds: Some(seconds),
            },
        );
        assert_eq!(step, Step::Ignored);
    }
    assert_eq!(player.current_node_id(), Some("A"));
    assert_eq!(player.progress(), 0.0);
}
