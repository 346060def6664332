use crate::pipeline::{
    Analysis, InputText, Pipeline, PipelineEvent, PipelineMessage, SubmissionId,
};
use crate::translate::Translation;
use crate::ui;
use crate::ui::widgets::icon::HelpIcon;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::backend::Backend;
use ratatui::Terminal;
use std::collections::BTreeSet;
use std::time::Duration;
use tokio::sync::mpsc;

pub const EMPTY_INPUT_MESSAGE: &str = "Empty field. Please enter some text.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Main,
    Help,
}

/// What the main window is showing, derived from the UI state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Nothing shown, nothing running.
    Idle,
    /// At least one analysis in flight; any previous result stays visible.
    Pending,
    /// A result is shown and can be cleared.
    Resolved,
}

/// A blocking popup. While open it swallows every key except dismissal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dialog {
    pub title: String,
    pub message: String,
}

#[derive(Debug, Clone)]
pub struct AppOptions {
    pub tick_rate: Duration,
    pub shutdown_grace: Duration,
}

impl Default for AppOptions {
    fn default() -> Self {
        Self {
            tick_rate: Duration::from_millis(100),
            shutdown_grace: Duration::from_millis(500),
        }
    }
}

pub struct App {
    pipeline: Pipeline,
    messages: mpsc::UnboundedReceiver<PipelineMessage>,
    options: AppOptions,
    help_icon: Option<HelpIcon>,
    input: String,
    result: Option<Analysis>,
    latest_translation: Option<Translation>,
    pending: BTreeSet<SubmissionId>,
    clear_visible: bool,
    screen: Screen,
    dialog: Option<Dialog>,
    should_quit: bool,
}

impl App {
    pub fn new(
        pipeline: Pipeline,
        messages: mpsc::UnboundedReceiver<PipelineMessage>,
        options: AppOptions,
        help_icon: Option<HelpIcon>,
    ) -> Self {
        Self {
            pipeline,
            messages,
            options,
            help_icon,
            input: String::new(),
            result: None,
            latest_translation: None,
            pending: BTreeSet::new(),
            clear_visible: false,
            screen: Screen::Main,
            dialog: None,
            should_quit: false,
        }
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn result(&self) -> Option<&Analysis> {
        self.result.as_ref()
    }

    pub fn latest_translation(&self) -> Option<&Translation> {
        self.latest_translation.as_ref()
    }

    pub fn clear_visible(&self) -> bool {
        self.clear_visible
    }

    pub fn screen(&self) -> Screen {
        self.screen
    }

    pub fn dialog(&self) -> Option<&Dialog> {
        self.dialog.as_ref()
    }

    pub fn help_icon(&self) -> Option<&HelpIcon> {
        self.help_icon.as_ref()
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    pub fn translator_name(&self) -> &str {
        self.pipeline.translator_name()
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub fn phase(&self) -> Phase {
        if !self.pending.is_empty() {
            Phase::Pending
        } else if self.result.is_some() {
            Phase::Resolved
        } else {
            Phase::Idle
        }
    }

    pub fn handle_event(&mut self, event: Event) {
        match event {
            Event::Key(key) if key.kind == KeyEventKind::Press => self.handle_key(key),
            Event::Paste(text) => self.paste(&text),
            _ => {}
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.modifiers.contains(KeyModifiers::CONTROL)
            && matches!(key.code, KeyCode::Char('c') | KeyCode::Char('q'))
        {
            self.should_quit = true;
            return;
        }

        if self.dialog.is_some() {
            if matches!(key.code, KeyCode::Enter | KeyCode::Esc) {
                self.dialog = None;
            }
            return;
        }

        match self.screen {
            Screen::Main => self.handle_main_key(key),
            Screen::Help => self.handle_help_key(key),
        }
    }

    fn handle_main_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Enter if key.modifiers.contains(KeyModifiers::ALT) => self.input.push('\n'),
            KeyCode::Enter => self.analyze(),
            KeyCode::F(1) => self.show_help(),
            KeyCode::Char('l') if key.modifiers.contains(KeyModifiers::CONTROL) => self.clear(),
            KeyCode::Char(c)
                if !key
                    .modifiers
                    .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) =>
            {
                self.input.push(c)
            }
            KeyCode::Backspace => {
                self.input.pop();
            }
            _ => {}
        }
    }

    fn handle_help_key(&mut self, key: KeyEvent) {
        if matches!(key.code, KeyCode::Esc | KeyCode::Enter | KeyCode::F(1)) {
            self.return_to_main();
        }
    }

    fn paste(&mut self, text: &str) {
        if self.dialog.is_none() && self.screen == Screen::Main {
            self.input.push_str(&text.replace("\r\n", "\n"));
        }
    }

    /// Validate the input and hand it to the pipeline.
    pub fn analyze(&mut self) {
        match InputText::parse(&self.input) {
            Some(input) => {
                let id = self.pipeline.submit(input);
                self.pending.insert(id);
            }
            None => {
                tracing::debug!("rejected empty submission");
                self.dialog = Some(Dialog {
                    title: "Error".to_string(),
                    message: EMPTY_INPUT_MESSAGE.to_string(),
                });
            }
        }
    }

    /// Back to Idle from any state. Results of analyses still in flight are
    /// dropped when they arrive.
    pub fn clear(&mut self) {
        if !self.pending.is_empty() {
            tracing::debug!(abandoned = self.pending.len(), "clearing with analyses in flight");
        }
        self.input.clear();
        self.result = None;
        self.latest_translation = None;
        self.pending.clear();
        self.clear_visible = false;
    }

    pub fn show_help(&mut self) {
        self.screen = Screen::Help;
    }

    pub fn return_to_main(&mut self) {
        self.screen = Screen::Main;
    }

    /// Apply one pipeline message. Only called on the UI thread.
    pub fn apply(&mut self, message: PipelineMessage) {
        let id = message.submission;
        let tracked = self.pending.contains(&id);

        match message.event {
            PipelineEvent::Translated(translation) => {
                if tracked {
                    self.latest_translation = Some(translation);
                }
            }
            PipelineEvent::Resolved(analysis) => {
                if !tracked {
                    tracing::debug!(submission = %id, "dropping result of cleared analysis");
                    return;
                }
                self.pending.remove(&id);
                // Last one to finish wins the label
                self.result = Some(analysis);
                self.clear_visible = true;
            }
            PipelineEvent::Failed(error) => {
                if !tracked {
                    return;
                }
                self.pending.remove(&id);
                self.result = None;
                self.clear_visible = false;
                self.dialog = Some(Dialog {
                    title: error.title().to_string(),
                    message: error.detail(),
                });
            }
        }

        if self.pending.is_empty() {
            self.latest_translation = None;
        }
    }

    /// Apply every message that has already arrived.
    pub fn pump(&mut self) {
        while let Ok(message) = self.messages.try_recv() {
            self.apply(message);
        }
    }

    /// Wait for the next pipeline message and apply it. Returns `false` once
    /// the channel is closed.
    pub async fn next_message(&mut self) -> bool {
        match self.messages.recv().await {
            Some(message) => {
                self.apply(message);
                true
            }
            None => false,
        }
    }

    /// Draw, poll input, apply pipeline results; until the user quits.
    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> anyhow::Result<()> {
        tracing::info!(
            workers = self.pipeline.workers(),
            translator = self.pipeline.translator_name(),
            "ui started"
        );

        while !self.should_quit {
            terminal.draw(|frame| ui::draw(frame, self))?;

            if event::poll(self.options.tick_rate)? {
                self.handle_event(event::read()?);
            }
            self.pump();
        }

        Ok(())
    }

    pub async fn shutdown(&mut self) {
        let cancelled = self.pipeline.shutdown(self.options.shutdown_grace).await;
        tracing::info!(cancelled, "ui stopped");
    }
}
