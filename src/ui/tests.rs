use super::*;
use crate::app::{Focus, Model, PendingDelete, Screen, ToastLevel};
use crate::editor::EditorBuffer;
use crate::store::{MemoDraft, RecordKind, Store, UserDraft};
use ratatui::Terminal;
use ratatui::backend::TestBackend;
use ratatui::buffer::Buffer;

fn create_test_terminal() -> Terminal<TestBackend> {
    let backend = TestBackend::new(100, 30);
    Terminal::new(backend).unwrap()
}

fn model_with_records() -> Model {
    let mut store = Store::in_memory();
    store
        .create_memo(&MemoDraft::new("Groceries", "- milk\n- eggs"))
        .unwrap();
    store
        .create_memo(&MemoDraft::new("Ideas", "**bold** plan"))
        .unwrap();
    store
        .create_user(&UserDraft::new("Ada Lovelace", "ada@example.com"))
        .unwrap();
    let mut model = Model::new(Screen::Memos, (100, 30));
    model.set_records(store.memos(), store.users());
    model
}

fn draw(model: &mut Model) -> Buffer {
    let mut terminal = create_test_terminal();
    terminal.draw(|frame| render(model, frame)).unwrap();
    terminal.backend().buffer().clone()
}

fn screen_text(buffer: &Buffer) -> String {
    (0..buffer.area.height)
        .map(|row| {
            (0..buffer.area.width)
                .map(|col| buffer[(col, row)].symbol())
                .collect::<String>()
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[test]
fn test_render_shows_memo_cards() {
    let mut model = model_with_records();
    let text = screen_text(&draw(&mut model));

    assert!(text.contains("Memos (2)"));
    assert!(text.contains("Groceries"));
    assert!(text.contains("milk eggs"), "excerpt is flattened");
    assert!(text.contains("bold plan"), "excerpt has no markup");
    assert!(!text.contains("**bold**"));
    assert!(text.contains("New memo"));
}

#[test]
fn test_render_header_marks_screens() {
    let mut model = model_with_records();
    let text = screen_text(&draw(&mut model));
    assert!(text.contains("1:Memos"));
    assert!(text.contains("2:Users"));
}

#[test]
fn test_render_empty_memo_list() {
    let mut model = Model::new(Screen::Memos, (100, 30));
    let text = screen_text(&draw(&mut model));
    assert!(text.contains("No memos yet"));
}

#[test]
fn test_render_users_screen() {
    let mut model = model_with_records();
    model.screen = Screen::Users;
    let text = screen_text(&draw(&mut model));

    assert!(text.contains("Users (1)"));
    assert!(text.contains("Ada Lovelace"));
    assert!(text.contains("<ada@example.com>"));
    assert!(text.contains("Email"));
}

#[test]
fn test_render_content_editor_has_gutter() {
    let mut model = model_with_records();
    model.memo_form.content = EditorBuffer::from_text("- one\n- two");
    model.focus = Focus::Content;
    let text = screen_text(&draw(&mut model));

    assert!(text.contains("1 - one"));
    assert!(text.contains("2 - two"));
    assert!(text.contains("EDIT"));
    assert!(text.contains("Ln 1, Col 1"));
}

#[test]
fn test_render_preview_uses_depth_markers() {
    let mut model = model_with_records();
    model.memo_form.content = EditorBuffer::from_text("- a\n  - b\n    - c");
    model.memo_form.preview = true;
    let text = screen_text(&draw(&mut model));

    assert!(text.contains("Preview"));
    assert!(text.contains("• a"));
    assert!(text.contains("○ b"));
    assert!(text.contains("▪ c"));
}

#[test]
fn test_render_preview_clamps_scroll() {
    let mut model = model_with_records();
    model.memo_form.content = EditorBuffer::from_text("# Title\n\nbody");
    model.memo_form.preview = true;
    model.memo_form.preview_scroll = 500;
    draw(&mut model);

    assert_eq!(model.memo_form.preview_scroll, 0);
}

#[test]
fn test_render_empty_preview() {
    let mut model = model_with_records();
    model.memo_form.preview = true;
    let text = screen_text(&draw(&mut model));
    assert!(text.contains("Nothing to preview"));
}

#[test]
fn test_render_error_banner() {
    let mut model = model_with_records();
    model.error = Some("title is required".to_string());
    let text = screen_text(&draw(&mut model));
    assert!(text.contains("Error: title is required"));
}

#[test]
fn test_render_toast() {
    let mut model = model_with_records();
    model.show_toast(ToastLevel::Info, "Memo saved");
    let text = screen_text(&draw(&mut model));
    assert!(text.contains("[info] Memo saved"));
}

#[test]
fn test_render_delete_confirmation() {
    let mut model = model_with_records();
    model.pending_delete = Some(PendingDelete {
        kind: RecordKind::Memo,
        id: 1,
        label: "Groceries".to_string(),
    });
    let text = screen_text(&draw(&mut model));
    assert!(text.contains("Delete memo \"Groceries\"?"));
}

#[test]
fn test_render_survives_tiny_terminal() {
    let mut model = model_with_records();
    model.memo_form.preview = true;
    model.memo_form.content = EditorBuffer::from_text("# heading\n\ntext");
    let mut terminal = Terminal::new(TestBackend::new(8, 4)).unwrap();
    terminal.draw(|frame| render(&mut model, frame)).unwrap();
}

#[test]
fn test_split_main_columns_covers_area() {
    let area = ratatui::layout::Rect::new(0, 0, 100, 10);
    let columns = split_main_columns(area);
    assert_eq!(columns[0].width + columns[1].width, 100);
    assert_eq!(columns[0].width, 40);
}
