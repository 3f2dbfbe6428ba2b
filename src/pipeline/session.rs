//! Render session - the explicitly passed context object.
//!
//! A [`Session`] wires the whole pipeline together: the shared scene tree
//! the reconciler mutates, the focus registry and input router widgets
//! subscribe to, the coalescing paint scheduler, the frame writer, and
//! the terminal lifecycle guard. Widgets receive clones of the shared
//! handles from whoever constructed the session: there is no ambient
//! global state anywhere in the crate.
//!
//! The reactive boundary is exactly one effect: it reads the tree's
//! revision signal and asks the scheduler for a paint. Mutations are
//! therefore safe from inside reactive effects: the render effect never
//! touches the tree, and the paint itself runs later, from the loop.
//!
//! ```ignore
//! let mut session = Session::new(SessionOptions::default())?;
//! let tree = session.tree();
//! let root = session.root();
//! {
//!     let mut tree = tree.borrow_mut();
//!     let text = tree.create_text("hello");
//!     tree.append_child(root, text)?;
//! }
//! session.run()?;       // blocks until Ctrl+C or stop()
//! session.teardown()?;
//! ```

use std::cell::{Cell, RefCell};
use std::io::{self, Write};
use std::rc::Rc;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::time::Instant;

use spark_signals::effect;

use crate::engine::{NodeId, SceneTree};
use crate::error::{Error, Result};
use crate::renderer::{compose, FrameWriter};
use crate::state::{FocusRegistry, InputDecoder, InputRouter, KeyCode, Modifier};

use super::reader::{self, InputMessage};
use super::scheduler::{PaintScheduler, FRAME_INTERVAL};
use super::terminal::{detect_size, TerminalGuard};

// =============================================================================
// OPTIONS
// =============================================================================

/// Construction options for a render session.
pub struct SessionOptions {
    /// Terminal output stream. Defaults to stdout.
    pub output: Option<Box<dyn Write>>,
    /// Terminal size source. Defaults to querying the real terminal.
    pub size: Option<Box<dyn Fn() -> (u16, u16)>>,
    /// Enable raw mode on setup (skipped when stdin is not a TTY).
    pub raw_mode: bool,
    /// Hide the cursor while the session is live.
    pub hide_cursor: bool,
    /// Install the global Ctrl+C handler that stops the session.
    pub exit_on_ctrl_c: bool,
    /// Install Tab / Shift+Tab focus cycling.
    pub tab_navigation: bool,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            output: None,
            size: None,
            raw_mode: true,
            hide_cursor: true,
            exit_on_ctrl_c: true,
            tab_navigation: true,
        }
    }
}

// =============================================================================
// SESSION
// =============================================================================

/// One render session: scene tree, focus, input, scheduling, terminal.
pub struct Session {
    tree: Rc<RefCell<SceneTree>>,
    root: NodeId,
    focus: Rc<RefCell<FocusRegistry>>,
    input: Rc<RefCell<InputRouter>>,
    scheduler: Rc<PaintScheduler>,
    writer: FrameWriter,
    output: Box<dyn Write>,
    size: Box<dyn Fn() -> (u16, u16)>,
    decoder: InputDecoder,
    terminal: TerminalGuard,
    running: Rc<Cell<bool>>,
    stop_render_effect: Option<Box<dyn FnOnce()>>,
    input_rx: Option<Receiver<InputMessage>>,
}

impl Session {
    /// Build the session, enter the terminal, and register the render
    /// effect with the reactive scheduler.
    pub fn new(options: SessionOptions) -> Result<Self> {
        let tree = Rc::new(RefCell::new(SceneTree::new()?));
        let root = tree.borrow().root();
        let focus = Rc::new(RefCell::new(FocusRegistry::new()));
        let input = Rc::new(RefCell::new(InputRouter::new()));
        let scheduler = Rc::new(PaintScheduler::new());
        let running = Rc::new(Cell::new(true));

        // The one render effect. It observes the revision signal and asks
        // for a paint; the scheduler absorbs bursts into a single frame.
        let revision = tree.borrow().revision();
        let effect_scheduler = scheduler.clone();
        let stop = effect(move || {
            let _ = revision.get();
            effect_scheduler.request();
        });

        let mut output: Box<dyn Write> = options
            .output
            .unwrap_or_else(|| Box::new(io::stdout()));
        let size = options
            .size
            .unwrap_or_else(|| Box::new(detect_size) as Box<dyn Fn() -> (u16, u16)>);

        let mut terminal = TerminalGuard::new();
        terminal.setup(&mut *output, options.raw_mode, options.hide_cursor)?;

        if options.exit_on_ctrl_c {
            let running = running.clone();
            input.borrow_mut().subscribe(move |event| {
                if event.is_ctrl() && event.code == KeyCode::Char('c') {
                    running.set(false);
                }
            });
        }
        if options.tab_navigation {
            let focus = focus.clone();
            input.borrow_mut().subscribe(move |event| {
                if event.code == KeyCode::Tab {
                    if event.modifiers.contains(Modifier::SHIFT) {
                        focus.borrow_mut().focus_previous();
                    } else {
                        focus.borrow_mut().focus_next();
                    }
                }
            });
        }

        Ok(Self {
            tree,
            root,
            focus,
            input,
            scheduler,
            writer: FrameWriter::new(),
            output,
            size,
            decoder: InputDecoder::new(),
            terminal,
            running,
            stop_render_effect: Some(Box::new(stop)),
            input_rx: None,
        })
    }

    // =========================================================================
    // Shared handles (the widget-layer boundary)
    // =========================================================================

    /// The shared scene tree: the only surface reconciler effects call.
    pub fn tree(&self) -> Rc<RefCell<SceneTree>> {
        self.tree.clone()
    }

    /// The root element representing the viewport.
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// The session's focus registry.
    pub fn focus(&self) -> Rc<RefCell<FocusRegistry>> {
        self.focus.clone()
    }

    /// The session's input router.
    pub fn input(&self) -> Rc<RefCell<InputRouter>> {
        self.input.clone()
    }

    // =========================================================================
    // Input
    // =========================================================================

    /// Decode one raw byte chunk and dispatch every completed event.
    ///
    /// Chunks are handled synchronously to completion; no two dispatches
    /// ever interleave.
    pub fn feed_input(&mut self, bytes: &[u8]) {
        for event in self.decoder.decode(bytes) {
            InputRouter::dispatch(&self.input, &event);
        }
    }

    /// Resolve any buffered partial escape sequence (poll timeout hit).
    pub fn flush_pending_input(&mut self) {
        for event in self.decoder.flush_pending() {
            InputRouter::dispatch(&self.input, &event);
        }
    }

    // =========================================================================
    // Painting
    // =========================================================================

    /// Ask for a coalesced repaint (Idle -> Scheduled).
    pub fn request_paint(&self) {
        self.scheduler.request();
    }

    /// Paint immediately: layout at the current terminal size, compose,
    /// diff against the previous frame, write if changed.
    ///
    /// Returns whether the terminal was written to. On error the frame is
    /// abandoned and the previous frame stays on screen.
    pub fn paint(&mut self) -> Result<bool> {
        let (cols, rows) = (self.size)();
        let frame = {
            let mut tree = self.tree.borrow_mut();
            tree.compute_layout(cols, rows)?;
            compose(&tree)?
        };
        self.scheduler.cancel();
        self.writer
            .present(&mut *self.output, &frame)
            .map_err(Error::paint)
    }

    /// Run the scheduled paint if its deadline has passed.
    pub fn paint_if_due(&mut self) -> Result<bool> {
        if self.scheduler.take_if_due(Instant::now()) {
            self.paint()
        } else {
            Ok(false)
        }
    }

    // =========================================================================
    // Event loop
    // =========================================================================

    /// Spawn the stdin reader thread feeding this session.
    pub fn start_input_reader(&mut self) -> Result<()> {
        let (tx, rx) = mpsc::channel();
        reader::spawn(tx)?;
        self.input_rx = Some(rx);
        Ok(())
    }

    /// One loop iteration: wait briefly for input, dispatch it, paint if
    /// due. Returns whether the session is still running.
    pub fn tick(&mut self) -> Result<bool> {
        if !self.running.get() {
            return Ok(false);
        }

        let received = match &self.input_rx {
            Some(rx) => {
                let timeout = self
                    .scheduler
                    .due_in(Instant::now())
                    .unwrap_or(FRAME_INTERVAL);
                Some(rx.recv_timeout(timeout))
            }
            None => None,
        };
        match received {
            Some(Ok(InputMessage::Data(bytes))) => self.feed_input(&bytes),
            Some(Ok(InputMessage::Closed)) | Some(Err(RecvTimeoutError::Disconnected)) => {
                self.input_rx = None;
            }
            Some(Err(RecvTimeoutError::Timeout)) => {
                // A lone ESC (or other stuck bytes) resolves on timeout.
                if self.decoder.has_pending() {
                    self.flush_pending_input();
                }
            }
            None => {}
        }

        self.paint_if_due()?;
        Ok(self.running.get())
    }

    /// Blocking event loop: runs until Ctrl+C or [`Session::stop`].
    ///
    /// Paint failures are reported and survived: the previous frame stays
    /// on screen and the loop continues; the next mutation retries
    /// naturally. Everything else aborts the loop.
    pub fn run(&mut self) -> Result<()> {
        if self.input_rx.is_none() {
            self.start_input_reader()?;
        }
        self.request_paint();
        loop {
            match self.tick() {
                Ok(true) => {
                    // With stdin closed there is no channel to park on;
                    // pace the loop explicitly instead of spinning.
                    if self.input_rx.is_none() {
                        let wait = self
                            .scheduler
                            .due_in(Instant::now())
                            .unwrap_or(FRAME_INTERVAL);
                        std::thread::sleep(wait);
                    }
                }
                Ok(false) => break,
                Err(err) if err.is_recoverable() => {
                    tracing::error!(error = %err, "paint failed; previous frame retained");
                }
                Err(err) => return Err(err),
            }
        }
        Ok(())
    }

    /// Request a graceful stop; the loop exits on its next iteration.
    pub fn stop(&self) {
        self.running.set(false);
    }

    pub fn is_running(&self) -> bool {
        self.running.get()
    }

    // =========================================================================
    // Teardown
    // =========================================================================

    /// Tear the session down: cancel any pending paint, stop the render
    /// effect, release every layout handle, restore the terminal.
    ///
    /// A restore failure comes back as [`Error::Teardown`] after all other
    /// cleanup has already happened; callers are free to ignore it.
    pub fn teardown(mut self) -> Result<()> {
        self.shutdown()
    }

    fn shutdown(&mut self) -> Result<()> {
        self.running.set(false);
        self.scheduler.cancel();
        if let Some(stop) = self.stop_render_effect.take() {
            stop();
        }
        self.tree.borrow_mut().release_handles();
        self.terminal.restore(&mut *self.output)
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        // Abnormal-exit path; explicit teardown() already did all this.
        self.scheduler.cancel();
        if let Some(stop) = self.stop_render_effect.take() {
            stop();
        }
        // TerminalGuard restores raw mode and the cursor in its own Drop.
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Default)]
    struct SharedOutput(Rc<RefCell<Vec<u8>>>);

    impl SharedOutput {
        fn take_string(&self) -> String {
            let mut buf = self.0.borrow_mut();
            let s = String::from_utf8_lossy(&buf).into_owned();
            buf.clear();
            s
        }

        fn len(&self) -> usize {
            self.0.borrow().len()
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

    fn headless(out: &SharedOutput) -> Session {
        Session::new(SessionOptions {
            output: Some(Box::new(out.clone())),
            size: Some(Box::new(|| (80, 24))),
            raw_mode: false,
            hide_cursor: false,
            ..Default::default()
        })
        .unwrap()
    }

    #[test]
    fn test_paint_writes_composed_frame() {
        let out = SharedOutput::default();
        let mut session = headless(&out);
        let tree = session.tree();
        let root = session.root();
        {
            let mut tree = tree.borrow_mut();
            let text = tree.create_text("hello");
            tree.append_child(root, text).unwrap();
        }

        assert!(session.paint().unwrap());
        let written = out.take_string();
        assert!(written.contains("hello"));
    }

    #[test]
    fn test_second_paint_without_mutation_writes_nothing() {
        let out = SharedOutput::default();
        let mut session = headless(&out);
        let tree = session.tree();
        let root = session.root();
        {
            let mut tree = tree.borrow_mut();
            let text = tree.create_text("same");
            tree.append_child(root, text).unwrap();
        }

        assert!(session.paint().unwrap());
        out.take_string();

        assert!(!session.paint().unwrap());
        assert_eq!(out.len(), 0);
    }

    #[test]
    fn test_mutation_schedules_paint() {
        let out = SharedOutput::default();
        let mut session = headless(&out);
        session.paint().unwrap();

        let tree = session.tree();
        let root = session.root();
        {
            let mut tree = tree.borrow_mut();
            let text = tree.create_text("new");
            tree.append_child(root, text).unwrap();
        }
        // The render effect observed the revision bump.
        assert!(session.scheduler.is_scheduled());
    }

    #[test]
    fn test_ctrl_c_stops_session() {
        let out = SharedOutput::default();
        let mut session = headless(&out);
        assert!(session.is_running());

        session.feed_input(b"\x03");
        assert!(!session.is_running());
    }

    #[test]
    fn test_tab_cycles_focus() {
        let out = SharedOutput::default();
        let mut session = headless(&out);
        let focus = session.focus();
        let t1 = focus.borrow_mut().register();
        let t2 = focus.borrow_mut().register();

        assert_eq!(focus.borrow().current(), Some(t1));
        session.feed_input(b"\t");
        assert_eq!(focus.borrow().current(), Some(t2));
        session.feed_input(b"\x1b[Z");
        assert_eq!(focus.borrow().current(), Some(t1));
    }

    #[test]
    fn test_paint_failure_leaves_previous_frame() {
        let out = SharedOutput::default();
        let mut session = headless(&out);
        let tree = session.tree();
        let root = session.root();
        let span = {
            let mut tree = tree.borrow_mut();
            let span = tree.create_element("text").unwrap();
            let text = tree.create_text("ok");
            tree.append_child(root, span).unwrap();
            tree.append_child(span, text).unwrap();
            span
        };

        session.paint().unwrap();
        out.take_string();

        // Break the next paint with a malformed pulled-at-paint color.
        tree.borrow_mut().set_property(span, "color", "#bogus").unwrap();
        let err = session.paint().unwrap_err();
        assert!(matches!(err, Error::Paint(_)));
        assert_eq!(out.len(), 0, "no partial frame may reach the terminal");

        // Recovery: fix the property, paint succeeds again.
        tree.borrow_mut().set_property(span, "color", "red").unwrap();
        assert!(session.paint().unwrap());
    }

    #[test]
    fn test_teardown_is_clean() {
        let out = SharedOutput::default();
        let session = headless(&out);
        session.teardown().unwrap();
    }
}
