//! End-to-end editing session: type a list memo, save it, reopen the data
//! file and preview it.

use memopad::app::{App, Focus, Message, Model};
use memopad::document::{Document, LineType};
use memopad::store::Store;
use tempfile::tempdir;

fn type_text(app: &mut App, model: &mut Model, text: &str) {
    for ch in text.chars() {
        app.dispatch(model, Message::InsertChar(ch));
    }
}

#[test]
fn test_list_memo_survives_reopen() {
    let dir = tempdir().unwrap();
    let data = dir.path().join("data").join("memopad.json");

    let mut app = App::new(Store::open(&data).unwrap());
    let mut model = app.initial_model((80, 24));
    app.dispatch(&mut model, Message::ResetForm);
    assert_eq!(model.focus, Focus::Title);

    type_text(&mut app, &mut model, "Packing");
    app.dispatch(&mut model, Message::InsertNewline);
    assert_eq!(model.focus, Focus::Content);

    type_text(&mut app, &mut model, "- clothes");
    app.dispatch(&mut model, Message::InsertNewline);
    app.dispatch(&mut model, Message::Indent);
    type_text(&mut app, &mut model, "socks");
    app.dispatch(&mut model, Message::InsertNewline);
    app.dispatch(&mut model, Message::Outdent);
    type_text(&mut app, &mut model, "books");
    app.dispatch(&mut model, Message::Submit);

    assert!(model.error.is_none(), "unexpected error: {:?}", model.error);

    let reopened = Store::open(&data).unwrap();
    let memos = reopened.memos();
    assert_eq!(memos.len(), 1);
    assert_eq!(memos[0].title, "Packing");
    assert_eq!(memos[0].content, "- clothes\n  - socks\n- books");

    let lines = Document::parse(&memos[0].content).layout(40);
    let rendered: Vec<&str> = lines.iter().map(|line| line.content()).collect();
    assert_eq!(rendered, vec!["• clothes", "  ○ socks", "• books"]);
    assert!(
        lines
            .iter()
            .all(|line| matches!(line.line_type(), LineType::ListItem(_)))
    );
}

#[test]
fn test_enter_on_empty_bullet_leaves_list() {
    let mut app = App::new(Store::in_memory());
    let mut model = app.initial_model((80, 24));
    model.focus = Focus::Content;

    type_text(&mut app, &mut model, "- one");
    app.dispatch(&mut model, Message::InsertNewline);
    app.dispatch(&mut model, Message::InsertNewline);
    type_text(&mut app, &mut model, "after");

    assert_eq!(model.memo_form.content.text(), "- one\n- \nafter");
}

#[test]
fn test_users_persist_in_same_file() {
    let dir = tempdir().unwrap();
    let data = dir.path().join("memopad.json");

    let mut app = App::new(Store::open(&data).unwrap());
    let mut model = app.initial_model((80, 24));
    app.dispatch(&mut model, Message::ShowScreen(memopad::app::Screen::Users));
    app.dispatch(&mut model, Message::ResetForm);
    type_text(&mut app, &mut model, "Grace Hopper");
    app.dispatch(&mut model, Message::InsertNewline);
    type_text(&mut app, &mut model, "grace@example.com");
    app.dispatch(&mut model, Message::Submit);

    let reopened = Store::open(&data).unwrap();
    let users = reopened.users();
    assert_eq!(users.len(), 1);
    assert_eq!(users[0].email, "grace@example.com");
}
