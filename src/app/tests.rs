use std::path::PathBuf;

use super::*;
use crate::audio::{SinkEvent, SinkEventKind};
use crate::cover::{ArtReply, CoverArt, ResolveOutcome};
use crate::library::ScanError;
use crate::playback::{PlayerState, SeekTarget};
use crate::playlist::Direction;
use crate::session::{SessionState, Volume};
use crate::testing::{Call, FakeSink, Journal, RecordingFetcher, catalog, fakes};

type TestApp = App<FakeSink, RecordingFetcher>;

fn app_with(session: SessionState) -> (TestApp, RecordingFetcher, Journal) {
    let (sink, fetcher, journal) = fakes();
    let app = App::new(sink, fetcher.clone(), session);
    journal.borrow_mut().clear();
    (app, fetcher, journal)
}

fn app() -> (TestApp, RecordingFetcher, Journal) {
    app_with(SessionState::default())
}

fn album() -> PathBuf {
    PathBuf::from("/music")
}

fn sink_event(app: &TestApp, kind: SinkEventKind) -> SinkEvent {
    SinkEvent {
        binding: app.controller().binding(),
        kind,
    }
}

fn current_name(app: &TestApp) -> Option<String> {
    app.playlist().current().map(|t| t.name.clone())
}

#[test]
fn loading_a_catalog_binds_the_first_track_and_requests_its_art() {
    let (mut app, fetcher, _) = app();
    app.on_catalog_loaded(album(), catalog(&[("a", 100.0), ("b", 100.0)]));

    assert_eq!(current_name(&app).as_deref(), Some("a"));
    assert_eq!(app.player_state(), PlayerState::Playing);
    assert_eq!(fetcher.requests().len(), 1);
    assert_eq!(fetcher.requests()[0].path, PathBuf::from("/music/a.mp3"));
    assert_eq!(app.session().directory, Some(album()));
    assert_eq!(app.session().current_index, Some(0));
    assert!(app.take_session_dirty());
    assert!(!app.take_session_dirty());
}

#[test]
fn track_end_advances_and_resets_time() {
    let (mut app, fetcher, _) = app();
    app.on_catalog_loaded(album(), catalog(&[("a", 100.0), ("b", 100.0)]));

    app.on_sink_event(sink_event(&app, SinkEventKind::TimeUpdate { current_secs: 99.0 }));
    assert_eq!(app.runtime().current_time_secs, 99.0);

    app.on_sink_event(sink_event(&app, SinkEventKind::Ended));

    assert_eq!(current_name(&app).as_deref(), Some("b"));
    assert_eq!(app.runtime().current_time_secs, 0.0);
    assert_eq!(app.player_state(), PlayerState::Playing);
    assert_eq!(app.session().current_index, Some(1));
    let last = fetcher.requests().pop().unwrap();
    assert_eq!(last.path, PathBuf::from("/music/b.mp3"));
}

#[test]
fn track_end_on_last_track_wraps_to_first() {
    let (mut app, _, _) = app();
    app.on_catalog_loaded(album(), catalog(&[("a", 1.0), ("b", 1.0), ("c", 1.0)]));
    assert!(app.jump_to(2));

    app.on_sink_event(sink_event(&app, SinkEventKind::Ended));
    assert_eq!(app.playlist().current_index(), Some(0));
}

#[test]
fn empty_directory_leaves_transport_inert() {
    let (mut app, fetcher, journal) = app();
    app.on_catalog_loaded(album(), catalog(&[]));

    assert!(app.playlist().current().is_none());
    assert_eq!(app.player_state(), PlayerState::Idle);
    assert_eq!(app.cover().art, CoverArt::Placeholder);
    assert!(app.status.is_some());
    journal.borrow_mut().clear();

    app.toggle_play_pause();
    app.seek(SeekTarget::Fraction(0.5));
    assert!(!app.on_user_navigate(Direction::Next));
    assert!(!app.on_user_navigate(Direction::Previous));
    app.on_track_ended();

    assert!(journal.borrow().is_empty());
    assert!(fetcher.requests().is_empty());
    assert_eq!(app.session().directory, Some(album()));
    assert_eq!(app.session().current_index, None);
}

#[test]
fn stale_art_reply_is_discarded_after_navigation() {
    let (mut app, fetcher, _) = app();
    app.on_catalog_loaded(album(), catalog(&[("a", 1.0), ("b", 1.0)]));
    let for_a = fetcher.requests()[0].clone();

    assert!(app.on_user_navigate(Direction::Next));
    let outcome = app.on_art_reply(ArtReply {
        ticket: for_a.ticket,
        art: CoverArt::Placeholder,
    });

    assert_eq!(outcome, ResolveOutcome::Stale);
    assert_eq!(app.cover().art, CoverArt::Placeholder);
    assert_eq!(app.cover().track_path, Some(PathBuf::from("/music/b.mp3")));
}

#[test]
fn rebind_happens_before_the_art_request() {
    let (mut app, _, journal) = app();
    app.on_catalog_loaded(album(), catalog(&[("a", 1.0), ("b", 1.0)]));
    journal.borrow_mut().clear();

    app.on_user_navigate(Direction::Next);

    let calls = journal.borrow().clone();
    let load = calls
        .iter()
        .position(|c| matches!(c, Call::Load { .. }))
        .unwrap();
    let art = calls
        .iter()
        .position(|c| matches!(c, Call::RequestArt { .. }))
        .unwrap();
    assert!(load < art, "{calls:?}");
}

#[test]
fn restored_index_applies_to_the_restored_directory() {
    let (mut app, _, _) = app_with(SessionState {
        directory: Some(album()),
        current_index: Some(2),
        volume: Volume::new(30),
    });
    app.on_catalog_loaded(album(), catalog(&[("a", 1.0), ("b", 1.0), ("c", 1.0)]));

    assert_eq!(current_name(&app).as_deref(), Some("c"));
    assert_eq!(app.runtime().volume.percent(), 30);
}

#[test]
fn out_of_range_restored_index_falls_back_to_first_track() {
    let (mut app, _, _) = app_with(SessionState {
        directory: Some(album()),
        current_index: Some(5),
        volume: Volume::DEFAULT,
    });
    app.on_catalog_loaded(album(), catalog(&[("a", 1.0), ("b", 1.0), ("c", 1.0)]));

    assert_eq!(app.playlist().current_index(), Some(0));
    assert_eq!(app.session().current_index, Some(0));
}

#[test]
fn restored_index_is_ignored_for_another_directory_and_used_once() {
    let (mut app, _, _) = app_with(SessionState {
        directory: Some(album()),
        current_index: Some(1),
        volume: Volume::DEFAULT,
    });
    app.on_catalog_loaded(PathBuf::from("/other"), catalog(&[("a", 1.0), ("b", 1.0)]));
    assert_eq!(app.playlist().current_index(), Some(0));

    app.on_catalog_loaded(album(), catalog(&[("a", 1.0), ("b", 1.0)]));
    assert_eq!(app.playlist().current_index(), Some(0));
}

#[test]
fn relative_directory_is_recorded_absolute_and_matches_the_restored_session() {
    let cwd = std::env::current_dir().unwrap();
    let (mut app, _, _) = app_with(SessionState {
        directory: Some(cwd.clone()),
        current_index: Some(1),
        volume: Volume::DEFAULT,
    });

    let request = app.request_scan(PathBuf::from("."));
    assert_eq!(request.directory, cwd);
    assert!(app.on_scan_finished(
        request.ticket,
        request.directory,
        Ok(catalog(&[("a", 1.0), ("b", 1.0)]))
    ));

    assert_eq!(app.playlist().current_index(), Some(1));
    assert_eq!(app.session().directory, Some(cwd.clone()));

    let nested = app.request_scan(PathBuf::from("music"));
    assert_eq!(nested.directory, cwd.join("music"));
}

#[test]
fn volume_changes_flow_into_the_session() {
    let (mut app, _, _) = app();
    app.take_session_dirty();

    assert_eq!(app.set_volume(70).percent(), 70);
    assert_eq!(app.session().volume.percent(), 70);
    assert!(app.take_session_dirty());

    assert_eq!(app.nudge_volume(45).percent(), 100);
    assert_eq!(app.nudge_volume(-120).percent(), 0);
    assert_eq!(app.session_snapshot().volume, Volume::new(0));
}

#[test]
fn navigation_updates_the_session_index() {
    let (mut app, _, _) = app();
    app.on_catalog_loaded(album(), catalog(&[("a", 1.0), ("b", 1.0), ("c", 1.0)]));

    app.on_user_navigate(Direction::Previous);
    assert_eq!(app.session().current_index, Some(2));
    app.on_user_navigate(Direction::Next);
    assert_eq!(app.session().current_index, Some(0));
}

#[test]
fn stale_scan_results_are_dropped() {
    let (mut app, _, _) = app();
    let first = app.request_scan(PathBuf::from("/first"));
    let second = app.request_scan(PathBuf::from("/second"));

    assert!(!app.on_scan_finished(first.ticket, first.directory, Ok(catalog(&[("x", 1.0)]))));
    assert!(app.playlist().is_empty());
    assert!(app.scan_pending());

    assert!(app.on_scan_finished(
        second.ticket,
        second.directory.clone(),
        Ok(catalog(&[("y", 1.0)]))
    ));
    assert!(!app.scan_pending());
    assert_eq!(current_name(&app).as_deref(), Some("y"));
    assert_eq!(app.session().directory, Some(second.directory));
}

#[test]
fn failed_scan_keeps_the_current_playlist() {
    let (mut app, _, _) = app();
    app.on_catalog_loaded(album(), catalog(&[("a", 1.0), ("b", 1.0)]));
    app.on_user_navigate(Direction::Next);
    app.take_session_dirty();

    let req = app.request_scan(PathBuf::from("/nope"));
    let loaded = app.on_scan_finished(
        req.ticket,
        req.directory.clone(),
        Err(ScanError::NotADirectory(req.directory)),
    );

    assert!(!loaded);
    assert_eq!(current_name(&app).as_deref(), Some("b"));
    assert_eq!(app.session().directory, Some(album()));
    assert!(!app.take_session_dirty());
    assert!(app.status.as_deref().unwrap().contains("/nope"));
}

#[test]
fn navigation_waits_for_a_pending_scan_but_track_end_does_not() {
    let (mut app, _, _) = app();
    app.on_catalog_loaded(album(), catalog(&[("a", 1.0), ("b", 1.0)]));
    app.request_scan(PathBuf::from("/elsewhere"));

    assert!(!app.on_user_navigate(Direction::Next));
    assert!(!app.jump_to(1));
    assert_eq!(app.playlist().current_index(), Some(0));

    app.on_sink_event(sink_event(&app, SinkEventKind::Ended));
    assert_eq!(app.playlist().current_index(), Some(1));
}

#[test]
fn load_failure_reports_without_skipping() {
    let (mut app, _, _) = app();
    app.on_catalog_loaded(album(), catalog(&[("a", 1.0), ("b", 1.0)]));

    app.on_sink_event(sink_event(&app, SinkEventKind::LoadFailed("corrupt".into())));

    assert_eq!(app.playlist().current_index(), Some(0));
    assert_eq!(app.player_state(), PlayerState::Paused);
    assert!(app.status.as_deref().unwrap().contains("corrupt"));
}

#[test]
fn stop_pauses_and_rewinds() {
    let (mut app, _, journal) = app();
    app.on_catalog_loaded(album(), catalog(&[("a", 100.0)]));
    app.on_sink_event(sink_event(&app, SinkEventKind::TimeUpdate { current_secs: 40.0 }));
    journal.borrow_mut().clear();

    app.stop();
    assert_eq!(*journal.borrow(), vec![Call::Pause, Call::Seek(0.0)]);
    assert_eq!(app.player_state(), PlayerState::Paused);
    assert_eq!(app.runtime().current_time_secs, 0.0);
}

#[test]
fn blank_prompt_counts_as_cancelled() {
    let (mut app, _, _) = app();
    app.open_prompt();
    assert_eq!(app.mode, Mode::DirectoryPrompt);
    app.prompt.push_str("   ");
    assert_eq!(app.submit_prompt(), None);
    assert_eq!(app.mode, Mode::Normal);

    app.open_prompt();
    app.prompt.push_str("/music/album");
    assert_eq!(app.submit_prompt(), Some(PathBuf::from("/music/album")));
    assert!(app.prompt.is_empty());
}

#[test]
fn tilde_expands_to_home() {
    assert_eq!(expand_tilde("/abs/path"), PathBuf::from("/abs/path"));
    if let Some(home) = std::env::var_os("HOME") {
        assert_eq!(expand_tilde("~/Music"), PathBuf::from(home).join("Music"));
    }
}
