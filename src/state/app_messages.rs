//! Session dispatch, side effects and background message processing.

use std::sync::Arc;

use tracing::{debug, warn};

use super::{Action, App, AppMessage, Command};
use crate::graph::Viewport;
use crate::services::ScanEvent;

impl App {
    /// Applies `action` to the session and carries out the commands it emits.
    pub(crate) fn dispatch(&mut self, action: Action) {
        let commands = self.session.dispatch(action);
        for command in commands {
            self.run_command(command);
        }
        if self.session.take_needs_fit() {
            self.clicks.cancel();
            self.fit_view();
            self.ui.detail_index = 0;
        }
        let rows = self.session.detail().len();
        if self.ui.detail_index >= rows {
            self.ui.detail_index = rows.saturating_sub(1);
        }
    }

    fn run_command(&self, command: Command) {
        match command {
            Command::FetchTransfers { address, mode } => {
                debug!(%address, ?mode, "fetching transfers");
                let source = Arc::clone(&self.transfers);
                let message_tx = self.message_tx.clone();
                tokio::spawn(async move {
                    let message = match source.fetch_transfers(&address).await {
                        Ok(transfers) => AppMessage::TransfersLoaded {
                            address,
                            mode,
                            transfers,
                        },
                        Err(error) => {
                            warn!(%address, %error, "transfer fetch failed");
                            AppMessage::TransfersFailed {
                                address,
                                mode,
                                message: error.to_string(),
                            }
                        }
                    };
                    let _ = message_tx.send(message);
                });
            }
            Command::ResolveNames(addresses) => {
                let queued = self.names.enqueue(addresses);
                debug!(queued, "name lookups queued");
            }
            Command::ScanCreators(addresses) => {
                let scanner = self.scanner.clone();
                let message_tx = self.message_tx.clone();
                tokio::spawn(async move {
                    scanner.scan(addresses, message_tx).await;
                });
            }
        }
    }

    /// Drains every pending background message into the session.
    pub(crate) fn process_messages(&mut self) {
        while let Ok(message) = self.message_rx.try_recv() {
            self.handle_message(message);
        }
    }

    pub(crate) fn handle_message(&mut self, message: AppMessage) {
        let action = match message {
            AppMessage::TransfersLoaded {
                address,
                mode,
                transfers,
            } => Action::TransfersLoaded {
                address,
                mode,
                transfers,
            },
            AppMessage::TransfersFailed {
                address,
                mode,
                message,
            } => Action::TransfersFailed {
                address,
                mode,
                message,
            },
            AppMessage::Name(resolved) => Action::NameResolved(resolved),
            AppMessage::Scan(ScanEvent::AddressScanned {
                address,
                coins,
                done,
                total,
            }) => Action::ScanProgress {
                address,
                coins,
                done,
                total,
            },
            AppMessage::Scan(ScanEvent::Finished(report)) => Action::ScanFinished(report),
        };
        self.dispatch(action);
    }

    /// Fits the viewport around every node position.
    pub(crate) fn fit_view(&mut self) {
        let points = self.session.elements().nodes.iter().map(|n| n.position);
        self.ui.viewport = Viewport::fit(points, self.ui.graph_area);
    }
}
