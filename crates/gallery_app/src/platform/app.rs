use std::io::{BufRead, Write};
use std::time::{Duration, Instant};

use gallery_core::{update, GalleryState, Msg, Query};
use gallery_logging::gallery_warn;

use super::config::GalleryConfig;
use super::effects::EffectRunner;
use super::ui::commands::{parse_command, Command, HELP};
use super::ui::render::render;

const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Line-oriented stand-in for the photo grid screen.
pub struct GalleryApp<W: Write> {
    state: GalleryState,
    runner: EffectRunner,
    out: W,
    columns: usize,
    image_field: String,
    settle_timeout: Duration,
}

impl<W: Write> GalleryApp<W> {
    pub fn new(config: &GalleryConfig, runner: EffectRunner, out: W) -> Self {
        let settle_timeout = Duration::from_millis(
            config
                .service
                .connect_timeout_ms
                .saturating_add(config.service.request_timeout_ms),
        );
        Self {
            state: GalleryState::with_policy(config.delete),
            runner,
            out,
            columns: config.columns,
            image_field: config.image_field.clone(),
            settle_timeout,
        }
    }

    pub fn run<R: BufRead>(&mut self, input: R, query: Query) -> anyhow::Result<()> {
        self.dispatch(Msg::QueryChanged(query));
        self.settle();
        self.render(false)?;

        for line in input.lines() {
            let line = line?;
            match parse_command(&line) {
                Ok(Command::Quit) => break,
                Ok(Command::Help) => writeln!(self.out, "{HELP}")?,
                Ok(Command::Show) => self.render(true)?,
                Ok(Command::Dispatch(msg)) => {
                    self.dispatch(msg);
                    self.settle();
                    self.render(false)?;
                }
                Err(message) => writeln!(self.out, "{message}")?,
            }
        }
        self.out.flush()?;
        Ok(())
    }

    fn dispatch(&mut self, msg: Msg) {
        let state = std::mem::take(&mut self.state);
        let (state, effects) = update(state, msg);
        self.state = state;
        self.runner.enqueue(effects);
    }

    /// Feeds engine results back in until no fetch or delete is outstanding.
    fn settle(&mut self) {
        let deadline = Instant::now() + self.settle_timeout;
        while self.state.is_busy() {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                gallery_warn!("Gave up waiting for outstanding requests");
                break;
            }
            if let Some(msg) = self.runner.next_msg(remaining.min(POLL_INTERVAL)) {
                self.dispatch(msg);
            }
        }
    }

    fn render(&mut self, force: bool) -> std::io::Result<()> {
        if !self.state.consume_dirty() && !force {
            return Ok(());
        }
        for line in render(&self.state.view(), self.columns, &self.image_field) {
            writeln!(self.out, "{line}")?;
        }
        self.out.flush()
    }
}
