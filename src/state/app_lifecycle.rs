//! Application lifecycle: construction and the main event loop.

use color_eyre::Result;
use crossterm::event::{self, Event, KeyEventKind};
use ratatui::Frame;
use std::time::{Duration, Instant};
use tokio::sync::mpsc;
use tracing::info;

use crate::graph::ClickTracker;
use crate::services::{CreatorScanner, NameQueue};
use crate::tui::Tui;
use crate::ui;

use super::{Action, App, AppConfig, Services, Session, StartupOptions, UiState};

/// Redraw and housekeeping interval.
const TICK_RATE: Duration = Duration::from_millis(100);

impl App {
    /// Creates the app from the configuration on disk and the command line.
    ///
    /// # Errors
    /// Returns an error if an HTTP client cannot be built.
    pub fn new(startup_options: StartupOptions) -> Result<Self> {
        let mut config = AppConfig::load();
        startup_options.apply(&mut config);
        let services = Services::from_config(&config).map_err(|e| e.into_report())?;
        info!(
            transfers = %config.transfers_api_url,
            rpc = %config.rpc_url,
            "services configured"
        );
        Ok(Self::with_services(config, services, startup_options))
    }

    /// Creates the app around already-built services.
    #[must_use]
    pub fn with_services(
        config: AppConfig,
        services: Services,
        startup_options: StartupOptions,
    ) -> Self {
        let (message_tx, message_rx) = mpsc::unbounded_channel();
        let names = NameQueue::new(services.names, config.name_delay(), message_tx.clone());
        let scanner = CreatorScanner::new(services.events, config.scan_config());

        let mut ui = UiState::new();
        if let Some(address) = &startup_options.address {
            ui.address_input.clone_from(address);
        }

        Self {
            session: Session::new(),
            ui,
            clicks: ClickTracker::new(config.double_click()),
            config,
            exit: false,
            message_tx,
            message_rx,
            transfers: services.transfers,
            names,
            scanner,
            startup_options: Some(startup_options),
        }
    }

    /// Runs the main application loop.
    ///
    /// # Errors
    /// Returns an error if the terminal operations fail.
    pub async fn run(&mut self, terminal: &mut Tui) -> Result<()> {
        let mut last_tick = Instant::now();
        terminal.draw(|frame| self.draw(frame))?;
        self.process_startup();

        while !self.exit {
            self.process_messages();
            self.poll_clicks(Instant::now());

            let timeout = TICK_RATE
                .checked_sub(last_tick.elapsed())
                .unwrap_or(Duration::ZERO);

            if event::poll(timeout)? {
                match event::read()? {
                    Event::Key(key)
                        if matches!(key.kind, KeyEventKind::Press | KeyEventKind::Repeat) =>
                    {
                        self.handle_key_event(key);
                    }
                    Event::Mouse(mouse) => self.handle_mouse_event(mouse, Instant::now()),
                    Event::Resize(_, _) => {
                        terminal.draw(|frame| self.draw(frame))?;
                    }
                    _ => {}
                }
            }

            if last_tick.elapsed() >= TICK_RATE {
                self.ui.tick_toast();
                terminal.draw(|frame| self.draw(frame))?;
                last_tick = Instant::now();
            }

            // Yield so spawned fetches make progress between polls.
            tokio::task::yield_now().await;
        }

        Ok(())
    }

    /// Renders a frame, remembering where the graph canvas went.
    fn draw(&mut self, frame: &mut Frame) {
        self.ui.graph_area = ui::graph_canvas_area(frame.area());
        ui::render(self, frame);
    }

    /// Loads the address given on the command line, if any.
    pub(crate) fn process_startup(&mut self) {
        let Some(options) = self.startup_options.take() else {
            return;
        };
        if let Some(address) = options.address {
            self.dispatch(Action::LoadRequested(address));
        }
    }
}
