//! Headless driver: reads commands, dispatches them to the store and runs the
//! resulting effects until every gateway response has come back.

mod command;
mod dialogs;

use std::collections::VecDeque;
use std::io::{self, BufRead, Write};
use std::sync::mpsc::Receiver;

use arcade_ide::kernel::editor::Surface;
use arcade_ide::kernel::services::adapters::{AppMessage, AsyncRuntime};
use arcade_ide::kernel::{Action, Effect, OutputLevel, Store};

pub use command::{parse, Command, HELP};
pub use dialogs::StdinDialogs;

pub struct Shell {
    store: Store,
    runtime: AsyncRuntime,
    rx: Receiver<AppMessage>,
    pending: usize,
    last_title: String,
}

impl Shell {
    pub fn new(store: Store, runtime: AsyncRuntime, rx: Receiver<AppMessage>) -> Self {
        let last_title = store.state().window_title();
        Self {
            store,
            runtime,
            rx,
            pending: 0,
            last_title,
        }
    }

    /// `initial` runs after the remembered folder has been reopened.
    pub fn run<W: Write>(&mut self, out: &mut W, initial: Option<Action>) -> io::Result<()> {
        let mark = self.store.state().output.mark();
        let startup = self.store.startup();
        self.drive(startup.effects, initial.into_iter().collect());
        self.report(out, mark)?;
        writeln!(out, "{} (type 'help' for commands)", self.last_title)?;

        let stdin = io::stdin();
        let mut line = String::new();
        loop {
            write!(out, "> ")?;
            out.flush()?;
            line.clear();
            // Unlocked per line so pickers can read stdin while an effect runs.
            if stdin.lock().read_line(&mut line)? == 0 {
                break;
            }

            let command = match parse(&line, self.store.state()) {
                Ok(Some(command)) => command,
                Ok(None) => continue,
                Err(e) => {
                    writeln!(out, "error: {}", e)?;
                    continue;
                }
            };
            match command {
                Command::Quit => break,
                Command::Help => writeln!(out, "{}", HELP)?,
                Command::Tabs => self.print_tabs(out)?,
                Command::Tree => self.print_tree(out)?,
                Command::Recent => self.print_recent(out)?,
                Command::Show => self.print_active(out)?,
                Command::Dispatch(action) => {
                    let mark = self.store.state().output.mark();
                    self.dispatch(action);
                    self.report(out, mark)?;
                }
            }
        }

        self.shutdown();
        Ok(())
    }

    fn dispatch(&mut self, action: Action) {
        self.drive(Vec::new(), VecDeque::from([action]));
    }

    fn drive(&mut self, effects: Vec<Effect>, mut queue: VecDeque<Action>) {
        self.execute(effects);
        loop {
            while let Some(action) = queue.pop_front() {
                let result = self.store.dispatch(action);
                self.execute(result.effects);
            }
            if self.pending == 0 {
                break;
            }
            match self.rx.recv() {
                Ok(message) => {
                    self.pending -= 1;
                    queue.push_back(message.into_action());
                }
                Err(e) => {
                    tracing::error!(error = %e, "runtime channel closed");
                    self.pending = 0;
                }
            }
        }
    }

    fn execute(&mut self, effects: Vec<Effect>) {
        for effect in effects {
            if self.runtime.execute(effect) {
                self.pending += 1;
            }
        }
    }

    fn shutdown(&mut self) {
        let effects = self.store.shutdown();
        tracing::info!(count = effects.len(), "flushing settings");
        self.drive(effects, VecDeque::new());
    }

    fn report<W: Write>(&mut self, out: &mut W, mark: u64) -> io::Result<()> {
        let state = self.store.state();
        for line in state.output.since(mark) {
            let tag = match line.level {
                OutputLevel::Info => "info",
                OutputLevel::Success => "ok",
                OutputLevel::Warning => "warn",
                OutputLevel::Error => "error",
            };
            writeln!(out, "[{}] {}", tag, line.text)?;
        }
        if let Some(confirm) = &state.ui.close_confirm {
            writeln!(
                out,
                "{} has unsaved changes: confirm save|discard|cancel",
                confirm.name
            )?;
        }
        if state.ui.confirm_dialog.visible {
            writeln!(out, "{} (yes/no)", state.ui.confirm_dialog.message)?;
        }

        let title = state.window_title();
        if title != self.last_title {
            writeln!(out, "-- {}", title)?;
            self.last_title = title;
        }
        Ok(())
    }

    fn print_tabs<W: Write>(&self, out: &mut W) -> io::Result<()> {
        let session = &self.store.state().session;
        if session.is_empty() {
            return writeln!(out, "no open documents");
        }
        for (i, doc) in session.documents().iter().enumerate() {
            let active = if session.active() == Some(doc.id()) { "*" } else { " " };
            let dirty = if doc.is_dirty() { "●" } else { " " };
            let location = doc
                .path()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| "(unsaved)".to_string());
            writeln!(out, "{}{} {:>2} {}  {}", active, dirty, i + 1, doc.name(), location)?;
        }
        Ok(())
    }

    fn print_tree<W: Write>(&self, out: &mut W) -> io::Result<()> {
        let explorer = &self.store.state().explorer;
        let Some(root) = explorer.root() else {
            return writeln!(out, "no folder open");
        };
        writeln!(out, "{}", root.display())?;
        for row in &explorer.rows {
            let marker = match (row.is_dir, row.is_expanded) {
                (true, true) => "v ",
                (true, false) => "> ",
                (false, _) => "  ",
            };
            writeln!(
                out,
                "{}{}{}",
                "  ".repeat(row.depth as usize + 1),
                marker,
                row.name.to_string_lossy()
            )?;
        }
        Ok(())
    }

    fn print_recent<W: Write>(&self, out: &mut W) -> io::Result<()> {
        let recent = &self.store.state().config.recent_folders;
        if recent.is_empty() {
            return writeln!(out, "no recent folders");
        }
        for path in recent {
            writeln!(out, "{}", path.display())?;
        }
        Ok(())
    }

    fn print_active<W: Write>(&self, out: &mut W) -> io::Result<()> {
        let session = &self.store.state().session;
        match session.viewport().mounted() {
            None => writeln!(out, "(no document open)"),
            Some(Surface::Preview(id)) => match session.registry().preview(id) {
                Some(preview) => writeln!(
                    out,
                    "[{} preview] {}",
                    preview.kind.label(),
                    preview.path.display()
                ),
                None => Ok(()),
            },
            Some(Surface::Model(id)) => {
                let Some(model) = session.registry().model(id) else {
                    return Ok(());
                };
                let (row, col) = model.buffer().cursor();
                writeln!(
                    out,
                    "{} [{}] cursor {}:{}",
                    model.uri(),
                    model.language().language_id(),
                    row,
                    col
                )?;
                write!(out, "{}", model.content())?;
                writeln!(out)
            }
        }
    }
}
