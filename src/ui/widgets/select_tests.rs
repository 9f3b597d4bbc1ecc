#![allow(clippy::unwrap_used)]

use super::select::{InputSelect, SelectItem};

fn parse(name: &&'static str) -> SelectItem {
    SelectItem {
        value: name.to_lowercase(),
        label: name.to_string(),
    }
}

fn select() -> InputSelect<&'static str> {
    let mut s = InputSelect::new("Fruit", "Loading fruit", "Any", parse);
    s.set_items(vec!["Any", "Apple", "Banana", "Apricot"]);
    s
}

#[test]
fn test_display_text() {
    let mut s = select();
    assert_eq!(s.display_text(), "Any");
    s.set_loading(true);
    assert_eq!(s.display_text(), "Loading fruit...");
}

#[test]
fn test_cannot_open_while_loading_or_empty() {
    let mut s = select();
    s.set_loading(true);
    assert!(!s.open());
    assert!(!s.is_open());

    let mut empty: InputSelect<&'static str> = InputSelect::new("Fruit", "Loading", "Any", parse);
    assert!(!empty.open());
}

#[test]
fn test_loading_closes_open_select() {
    let mut s = select();
    assert!(s.open());
    s.set_loading(true);
    assert!(!s.is_open());
}

#[test]
fn test_open_highlights_current_selection() {
    let mut s = select();
    s.select("Banana");
    assert!(s.open());
    assert_eq!(s.highlighted(), 2);
}

#[test]
fn test_filter_is_case_insensitive() {
    let mut s = select();
    s.open();
    s.push_filter('A');
    s.push_filter('p');
    let labels: Vec<String> = s.visible().into_iter().map(|(_, i)| i.label).collect();
    assert_eq!(labels, vec!["Apple", "Apricot"]);

    s.pop_filter();
    s.pop_filter();
    assert_eq!(s.visible().len(), 4);
}

#[test]
fn test_confirm_picks_from_filtered_list() {
    let mut s = select();
    s.open();
    s.push_filter('a');
    s.push_filter('p');
    s.highlight_next();
    s.highlight_next();
    assert_eq!(s.highlighted(), 1);
    assert_eq!(s.confirm(), Some("Apricot"));
    assert_eq!(s.selected(), &"Apricot");
    assert!(!s.is_open());
    assert_eq!(s.filter(), "");
}

#[test]
fn test_confirm_with_no_match() {
    let mut s = select();
    s.select("Banana");
    s.open();
    s.push_filter('z');
    assert_eq!(s.confirm(), None);
    assert_eq!(s.selected(), &"Banana");
}

#[test]
fn test_reset_restores_default() {
    let mut s = select();
    s.select("Apple");
    s.reset();
    assert_eq!(s.selected(), &"Any");
    assert_eq!(s.items().len(), 4);
}
