use super::*;
use crate::action::Action;
use crate::tui_event::{BackendCommand, BackendEvent};
use artpick_core::fetch::MockPageSource;
use artpick_core::{FetchTicket, Page, PageRequest};

/// App wired to a command channel, with page 1 already loaded.
fn test_app() -> (App, mpsc::UnboundedReceiver<BackendCommand>) {
    let session = SelectionSession::new(12, Some(120));
    let mut app = App::new(session, Theme::hacker(), vec![12, 24, 48]);
    let (tx, mut rx) = mpsc::unbounded_channel();
    app.backend_cmd_tx = Some(tx);
    app.start();
    deliver_next(&mut app, &mut rx);
    (app, rx)
}

/// Answer the most recently queued fetch from a synthetic 120-record catalog.
fn deliver_next(app: &mut App, rx: &mut mpsc::UnboundedReceiver<BackendCommand>) -> FetchTicket {
    let mut last = None;
    while let Ok(BackendCommand::FetchPage(ticket)) = rx.try_recv() {
        last = Some(ticket);
    }
    let ticket = last.expect("no fetch was requested");
    app.handle_backend_event(page_event(ticket));
    ticket
}

fn page_event(ticket: FetchTicket) -> BackendEvent {
    let source = MockPageSource::new(120);
    BackendEvent::PageFetched {
        ticket,
        page: Page {
            records: source.page_records(ticket.request),
            total: Some(120),
        },
    }
}

fn selected_ids(app: &App) -> Vec<u64> {
    let mut ids: Vec<u64> = app.session.selection().ids().collect();
    ids.sort_unstable();
    ids
}

// ── loading ─────────────────────────────────────────────────────

#[test]
fn start_loads_first_page() {
    let (app, _rx) = test_app();
    assert!(!app.session.is_loading());
    assert_eq!(app.session.records().len(), 12);
    assert_eq!(app.display_order.len(), 12);
    assert_eq!(app.record_range(), (1, 12));
}

#[test]
fn stale_backend_event_is_ignored() {
    let (mut app, mut rx) = test_app();
    app.update(Action::NextPage);
    let BackendCommand::FetchPage(stale) = rx.try_recv().unwrap();
    app.update(Action::NextPage);
    let BackendCommand::FetchPage(latest) = rx.try_recv().unwrap();

    app.handle_backend_event(page_event(stale));
    assert!(app.session.is_loading());

    app.handle_backend_event(page_event(latest));
    assert!(!app.session.is_loading());
    assert_eq!(app.session.page_number(), 3);
    assert_eq!(app.session.records()[0].id, 25);
}

#[test]
fn failed_fetch_shows_empty_page() {
    let (mut app, mut rx) = test_app();
    app.update(Action::NextPage);
    let BackendCommand::FetchPage(ticket) = rx.try_recv().unwrap();
    app.handle_backend_event(BackendEvent::PageFailed {
        ticket,
        error: "boom".into(),
    });
    assert!(!app.session.is_loading());
    assert!(app.session.records().is_empty());
    assert_eq!(app.record_range(), (0, 0));
}

// ── manual selection ────────────────────────────────────────────

#[test]
fn toggle_row_checks_and_unchecks() {
    let (mut app, _rx) = test_app();
    app.update(Action::MoveDown);
    app.update(Action::ToggleRow);
    assert_eq!(selected_ids(&app), vec![2]);
    app.update(Action::ToggleRow);
    assert!(app.session.selection().is_empty());
}

#[test]
fn toggle_all_visible_flips_whole_page() {
    let (mut app, _rx) = test_app();
    app.update(Action::ToggleAllVisible);
    assert_eq!(app.session.selection().len(), 12);
    app.update(Action::ToggleAllVisible);
    assert!(app.session.selection().is_empty());
}

#[test]
fn edits_blocked_while_loading() {
    let (mut app, mut rx) = test_app();
    app.update(Action::NextPage);
    assert!(app.session.is_loading());
    app.update(Action::ToggleRow);
    app.update(Action::ToggleAllVisible);
    assert!(app.session.selection().is_empty());
    deliver_next(&mut app, &mut rx);
    app.update(Action::ToggleRow);
    assert_eq!(selected_ids(&app), vec![13]);
}

#[test]
fn selection_survives_paging() {
    let (mut app, mut rx) = test_app();
    app.update(Action::ToggleRow);
    app.update(Action::NextPage);
    deliver_next(&mut app, &mut rx);
    app.update(Action::ToggleRow);
    app.update(Action::PrevPage);
    deliver_next(&mut app, &mut rx);
    assert_eq!(selected_ids(&app), vec![1, 13]);
    assert!(app.session.is_selected(1));
}

// ── quick pick ──────────────────────────────────────────────────

fn type_pick(app: &mut App, text: &str) {
    app.update(Action::OpenQuickPick);
    assert_eq!(app.input_mode, InputMode::QuickPick);
    for c in text.chars() {
        app.update(Action::TextInput(c));
    }
    app.update(Action::TextConfirm);
}

#[test]
fn quick_pick_fills_current_page_and_plans_next() {
    let (mut app, mut rx) = test_app();
    type_pick(&mut app, "14");
    assert_eq!(app.input_mode, InputMode::Normal);
    assert!(!app.quick_pick.active);
    assert_eq!(app.session.selection().len(), 12);
    assert_eq!(app.session.pending(), 2);

    app.update(Action::NextPage);
    deliver_next(&mut app, &mut rx);
    assert_eq!(app.session.selection().len(), 14);
    assert_eq!(app.session.pending(), 0);
    assert!(!app.session.is_auto_fill());
    assert!(app.session.is_selected(13));
    assert!(app.session.is_selected(14));
    assert!(!app.session.is_selected(15));
}

#[test]
fn quick_pick_zero_clears() {
    let (mut app, _rx) = test_app();
    app.update(Action::ToggleAllVisible);
    type_pick(&mut app, "0");
    assert!(app.session.selection().is_empty());
}

#[test]
fn quick_pick_negative_treated_as_zero() {
    let (mut app, _rx) = test_app();
    app.update(Action::ToggleRow);
    type_pick(&mut app, "-5");
    assert!(app.session.selection().is_empty());
}

#[test]
fn quick_pick_cancel_leaves_selection() {
    let (mut app, _rx) = test_app();
    app.update(Action::ToggleRow);
    app.update(Action::OpenQuickPick);
    app.update(Action::TextInput('9'));
    app.update(Action::TextCancel);
    assert_eq!(app.input_mode, InputMode::Normal);
    assert_eq!(selected_ids(&app), vec![1]);
}

#[test]
fn manual_toggle_cancels_plan() {
    let (mut app, mut rx) = test_app();
    type_pick(&mut app, "20");
    app.update(Action::ToggleRow);
    assert!(!app.session.is_auto_fill());
    assert_eq!(app.session.selection().len(), 11);

    app.update(Action::NextPage);
    deliver_next(&mut app, &mut rx);
    assert_eq!(app.session.selection().len(), 11);
}

// ── paging ──────────────────────────────────────────────────────

#[test]
fn paging_stays_in_bounds() {
    let (mut app, mut rx) = test_app();
    app.update(Action::PrevPage);
    assert!(rx.try_recv().is_err());

    app.update(Action::LastPage);
    deliver_next(&mut app, &mut rx);
    assert_eq!(app.session.page_number(), 10);
    app.update(Action::NextPage);
    assert!(rx.try_recv().is_err());

    app.update(Action::FirstPage);
    deliver_next(&mut app, &mut rx);
    assert_eq!(app.session.page_number(), 1);
}

#[test]
fn cycle_page_size_realigns_offset() {
    let (mut app, mut rx) = test_app();
    app.goto_page(4);
    deliver_next(&mut app, &mut rx);
    assert_eq!(app.session.window().offset, 36);

    app.update(Action::CyclePageSize);
    let ticket = deliver_next(&mut app, &mut rx);
    assert_eq!(ticket.request, PageRequest { page: 2, limit: 24 });
    assert_eq!(app.session.window().offset, 24);

    app.update(Action::CyclePageSize);
    app.update(Action::CyclePageSize);
    let ticket = deliver_next(&mut app, &mut rx);
    assert_eq!(ticket.request.limit, 12);
}

#[test]
fn reload_requests_same_page() {
    let (mut app, mut rx) = test_app();
    app.update(Action::Reload);
    assert!(app.session.is_loading());
    let ticket = deliver_next(&mut app, &mut rx);
    assert_eq!(ticket.request.page, 1);
    assert!(!app.session.is_loading());
}

// ── display ─────────────────────────────────────────────────────

#[test]
fn sort_keeps_cursor_on_same_record() {
    let (mut app, _rx) = test_app();
    app.update(Action::GoBottom);
    let id = app.record_at_cursor().map(|r| r.id);
    app.update(Action::CycleSort);
    assert_eq!(app.record_at_cursor().map(|r| r.id), id);
    app.update(Action::ReverseSort);
    assert_eq!(app.record_at_cursor().map(|r| r.id), id);
    assert!(app.sort_reversed);
}

#[test]
fn sort_does_not_change_fetch_order() {
    let (mut app, _rx) = test_app();
    app.update(Action::ReverseSort);
    assert_eq!(app.session.records()[0].id, 1);
    assert_eq!(app.display_records().next().map(|r| r.id), Some(12));
}

#[test]
fn cursor_movement_is_clamped() {
    let (mut app, _rx) = test_app();
    app.update(Action::MoveUp);
    assert_eq!(app.cursor, 0);
    for _ in 0..20 {
        app.update(Action::MoveDown);
    }
    assert_eq!(app.cursor, 11);
}

#[test]
fn selection_panel_toggles() {
    let (mut app, _rx) = test_app();
    app.update(Action::ToggleSelectionPanel);
    assert!(app.selection_panel_visible);
    app.update(Action::ToggleSelectionPanel);
    assert!(!app.selection_panel_visible);
}

#[test]
fn resize_sets_scroll_distance() {
    let (mut app, _rx) = test_app();
    app.update(Action::Resize(120, 12));
    assert_eq!(app.visible_rows, 5);
    app.update(Action::ScrollDown);
    assert_eq!(app.cursor, 5);
    app.update(Action::ScrollDown);
    app.update(Action::ScrollDown);
    assert_eq!(app.cursor, 11);
    app.update(Action::ScrollUp);
    assert_eq!(app.cursor, 6);
}

// ── overlays ────────────────────────────────────────────────────

#[test]
fn quit_requires_confirmation() {
    let (mut app, _rx) = test_app();
    assert!(!app.update(Action::Quit));
    assert!(app.confirm_quit);
    app.update(Action::NavigateBack);
    assert!(!app.confirm_quit);
    assert!(!app.should_quit);

    app.update(Action::Quit);
    assert!(app.update(Action::Quit));
    assert!(app.should_quit);
}

#[test]
fn help_swallows_other_actions() {
    let (mut app, _rx) = test_app();
    app.update(Action::ToggleHelp);
    assert!(app.show_help);
    app.update(Action::ToggleRow);
    assert!(app.session.selection().is_empty());
    app.update(Action::NavigateBack);
    assert!(!app.show_help);
}
