use super::*;
use crate::testing::catalog;

fn playlist_of(n: usize) -> Playlist {
    let names: Vec<String> = (0..n).map(|i| format!("t{i}")).collect();
    let specs: Vec<(&str, f64)> = names.iter().map(|n| (n.as_str(), 60.0)).collect();
    let mut p = Playlist::new();
    p.set_catalog(catalog(&specs), None);
    p
}

#[test]
fn next_n_times_returns_to_start() {
    for n in 1..=5 {
        for start in 0..n {
            let mut p = playlist_of(n);
            assert!(p.jump_to(start));
            for _ in 0..n {
                p.next();
            }
            assert_eq!(p.current_index(), Some(start), "n={n} start={start}");
        }
    }
}

#[test]
fn previous_then_next_is_identity() {
    for n in 2..=5 {
        for start in 0..n {
            let mut p = playlist_of(n);
            p.jump_to(start);
            p.previous();
            p.next();
            assert_eq!(p.current_index(), Some(start));
            p.next();
            p.previous();
            assert_eq!(p.current_index(), Some(start));
        }
    }
}

#[test]
fn single_track_navigation_is_identity() {
    let mut p = playlist_of(1);
    p.next();
    assert_eq!(p.current_index(), Some(0));
    p.previous();
    assert_eq!(p.current_index(), Some(0));
}

#[test]
fn empty_playlist_navigation_is_a_no_op() {
    let mut p = playlist_of(0);
    p.next();
    p.previous();
    p.step(Direction::Next);
    assert!(p.current().is_none());
    assert_eq!(p.current_index(), None);
    assert!(!p.jump_to(0));
}

#[test]
fn wraps_in_both_directions() {
    let mut p = playlist_of(3);
    p.jump_to(2);
    p.next();
    assert_eq!(p.current_index(), Some(0));
    p.previous();
    assert_eq!(p.current_index(), Some(2));
}

#[test]
fn restored_index_is_used_only_when_in_range() {
    let mut p = Playlist::new();
    p.set_catalog(catalog(&[("a", 1.0), ("b", 1.0), ("c", 1.0)]), Some(2));
    assert_eq!(p.current().unwrap().name, "c");

    p.set_catalog(catalog(&[("a", 1.0), ("b", 1.0)]), Some(2));
    assert_eq!(p.current_index(), Some(0));

    p.set_catalog(catalog(&[]), Some(0));
    assert_eq!(p.current_index(), None);
}

#[test]
fn current_track_ordinal_matches_cursor() {
    let mut p = playlist_of(4);
    p.jump_to(3);
    assert_eq!(p.current().unwrap().ordinal, 3);
    p.next();
    assert_eq!(p.current().unwrap().ordinal, 0);
}
