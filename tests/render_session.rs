//! End-to-end pipeline tests: mutate the tree through the public API,
//! paint into an in-memory stream, and check what reached the "terminal".

use std::cell::RefCell;
use std::io::{self, Write};
use std::rc::Rc;

use ember_tui::{Error, Session, SessionOptions, StyleKey};

#[derive(Clone, Default)]
struct SharedOutput(Rc<RefCell<Vec<u8>>>);

impl SharedOutput {
    fn take_string(&self) -> String {
        let mut buf = self.0.borrow_mut();
        let s = String::from_utf8_lossy(&buf).into_owned();
        buf.clear();
        s
    }

    fn is_empty(&self) -> bool {
        self.0.borrow().is_empty()
    }
}

impl Write for SharedOutput {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.borrow_mut().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

fn session_with(out: &SharedOutput, cols: u16, rows: u16) -> Session {
    Session::new(SessionOptions {
        output: Some(Box::new(out.clone())),
        size: Some(Box::new(move || (cols, rows))),
        raw_mode: false,
        hide_cursor: false,
        ..Default::default()
    })
    .unwrap()
}

#[test]
fn column_element_stacks_text_children_row_by_row() {
    let out = SharedOutput::default();
    let mut session = session_with(&out, 80, 24);
    let tree = session.tree();
    let root = session.root();

    {
        let mut tree = tree.borrow_mut();
        let a = tree.create_element("box").unwrap();
        tree.set_property(a, "style:flexDirection", "column").unwrap();
        let first = tree.create_text("a");
        let second = tree.create_text("b");
        tree.append_child(root, a).unwrap();
        tree.append_child(a, first).unwrap();
        tree.append_child(a, second).unwrap();
    }

    assert!(session.paint().unwrap());
    let frame = out.take_string();

    // "a" on row 0, "b" on row 1, in that order.
    let a_pos = frame.find("\x1b[1;1Ha").expect("a at row 0");
    let b_pos = frame.find("\x1b[2;1Hb").expect("b at row 1");
    assert!(a_pos < b_pos);

    // Painting the unchanged tree again produces zero terminal writes.
    assert!(!session.paint().unwrap());
    assert!(out.is_empty());
}

#[test]
fn percentage_width_resolves_against_parent() {
    let out = SharedOutput::default();
    let session = session_with(&out, 120, 40);
    let tree = session.tree();
    let root = session.root();

    let child = {
        let mut tree = tree.borrow_mut();
        let parent = tree.create_element("box").unwrap();
        tree.set_property(parent, "style:width", 100u16).unwrap();
        tree.set_property(parent, "style:height", 10u16).unwrap();
        let child = tree.create_element("box").unwrap();
        tree.set_property(child, "style:width", "50%").unwrap();
        tree.set_property(child, "style:height", 2u16).unwrap();
        tree.append_child(root, parent).unwrap();
        tree.append_child(parent, child).unwrap();
        tree.compute_layout(120, 40).unwrap();
        child
    };

    let tree = tree.borrow();
    assert_eq!(tree.layout_box(child).unwrap().width, 50);
}

#[test]
fn malformed_percentage_is_rejected_and_prior_width_kept() {
    let out = SharedOutput::default();
    let session = session_with(&out, 80, 24);
    let tree = session.tree();
    let root = session.root();

    let mut tree = tree.borrow_mut();
    let el = tree.create_element("box").unwrap();
    tree.append_child(root, el).unwrap();
    tree.set_property(el, "style:width", "50%").unwrap();

    let err = tree.set_property(el, "style:width", "what%").unwrap_err();
    assert!(matches!(err, Error::Configuration { .. }));

    assert_eq!(
        tree.style(el).unwrap().dimension(StyleKey::Width),
        ember_tui::Dimension::Percent(50.0)
    );
}

#[test]
fn text_updates_produce_new_frames_only_when_content_changes() {
    let out = SharedOutput::default();
    let mut session = session_with(&out, 80, 24);
    let tree = session.tree();
    let root = session.root();

    let text = {
        let mut tree = tree.borrow_mut();
        let text = tree.create_text("tick 0");
        tree.append_child(root, text).unwrap();
        text
    };

    session.paint().unwrap();
    assert!(out.take_string().contains("tick 0"));

    tree.borrow_mut().set_text(text, "tick 1").unwrap();
    session.paint().unwrap();
    assert!(out.take_string().contains("tick 1"));

    // Setting identical content recomposes an identical frame: no write.
    tree.borrow_mut().set_text(text, "tick 1").unwrap();
    assert!(!session.paint().unwrap());
    assert!(out.is_empty());
}

#[test]
fn structural_violation_surfaces_and_leaves_order_intact() {
    let out = SharedOutput::default();
    let session = session_with(&out, 80, 24);
    let tree = session.tree();
    let root = session.root();

    let mut tree = tree.borrow_mut();
    let a = tree.create_text("a");
    let b = tree.create_text("b");
    let foreign = tree.create_text("foreign");
    tree.append_child(root, a).unwrap();
    tree.append_child(root, b).unwrap();

    // An anchor that was never attached to root.
    let stray = tree.create_text("stray");
    let err = tree.insert_before(root, foreign, stray).unwrap_err();
    assert!(matches!(err, Error::Structural(_)));
    assert_eq!(tree.children(root), &[a, b]);
}

#[test]
fn focus_tokens_route_through_session_registry() {
    let out = SharedOutput::default();
    let mut session = session_with(&out, 80, 24);
    let focus = session.focus();

    let t1 = focus.borrow_mut().register();
    let t2 = focus.borrow_mut().register();
    let t3 = focus.borrow_mut().register();
    assert_eq!(focus.borrow().current(), Some(t1));

    // Unregistering the current token slides focus to the next one.
    focus.borrow_mut().unregister(t1);
    assert_eq!(focus.borrow().current(), Some(t2));

    // Tab / Shift+Tab arrive as decoded key events.
    session.feed_input(b"\t");
    assert_eq!(focus.borrow().current(), Some(t3));
    session.feed_input(b"\x1b[Z");
    assert_eq!(focus.borrow().current(), Some(t2));
}

#[test]
fn widget_handlers_observe_focus_through_predicates() {
    let out = SharedOutput::default();
    let mut session = session_with(&out, 80, 24);
    let focus = session.focus();
    let input = session.input();

    let t1 = focus.borrow_mut().register();
    let t2 = focus.borrow_mut().register();

    let seen_by_first: Rc<RefCell<Vec<String>>> = Rc::new(RefCell::new(Vec::new()));
    let seen_by_second: Rc<RefCell<Vec<String>>> = Rc::new(RefCell::new(Vec::new()));

    {
        let focus = focus.clone();
        let seen = seen_by_first.clone();
        input.borrow_mut().subscribe_when(
            move || focus.borrow().is_focused(t1),
            move |event| seen.borrow_mut().push(event.raw.clone()),
        );
    }
    {
        let focus = focus.clone();
        let seen = seen_by_second.clone();
        input.borrow_mut().subscribe_when(
            move || focus.borrow().is_focused(t2),
            move |event| seen.borrow_mut().push(event.raw.clone()),
        );
    }

    session.feed_input(b"x");
    focus.borrow_mut().focus(t2);
    session.feed_input(b"y");

    assert_eq!(*seen_by_first.borrow(), vec!["x".to_string()]);
    assert_eq!(*seen_by_second.borrow(), vec!["y".to_string()]);
}

#[test]
fn ctrl_c_then_teardown_restores_cleanly() {
    let out = SharedOutput::default();
    let mut session = session_with(&out, 80, 24);

    session.feed_input(b"\x03");
    assert!(!session.is_running());
    session.teardown().unwrap();
}
