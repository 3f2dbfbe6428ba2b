//! Minimal ember-tui session: a padded panel with a styled title.
//!
//! Run with `cargo run --example hello`; quit with Ctrl+C.

use ember_tui::{Session, SessionOptions};

fn main() -> ember_tui::Result<()> {
    let mut session = Session::new(SessionOptions::default())?;
    let tree = session.tree();
    let root = session.root();

    {
        let mut tree = tree.borrow_mut();
        let panel = tree.create_element("box")?;
        tree.set_property(panel, "style:flexDirection", "column")?;
        tree.set_property(panel, "style:padding", 1u16)?;

        let title = tree.create_element("text")?;
        tree.set_property(title, "color", "cyan")?;
        tree.set_property(title, "bold", true)?;
        let title_text = tree.create_text("ember-tui");
        let hint = tree.create_text("press ctrl+c to quit");

        tree.append_child(root, panel)?;
        tree.append_child(panel, title)?;
        tree.append_child(title, title_text)?;
        tree.append_child(panel, hint)?;
    }

    session.run()?;
    session.teardown()
}
