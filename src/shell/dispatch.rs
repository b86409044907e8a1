use std::sync::Arc;
use std::time::Duration;

use crossbeam_channel::{unbounded, Receiver, Sender};
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tracing::debug;

use crate::analyzer::{AnalysisResult, DiagramAnalyzer, OutgoingMime, VisionClient, DEFAULT_TIMEOUT};
use crate::model::PhysicsModelData;
use crate::shell::{AnalysisTicket, AppShell, ShellError};

#[derive(Debug)]
pub struct AnalysisOutcome {
    pub token: super::RequestToken,
    pub result: AnalysisResult<PhysicsModelData>,
}

/// Runs analyses on the tokio runtime and hands results back to the UI thread
/// over a channel, which the UI drains once per frame.
pub struct AnalysisDispatcher {
    runtime: Handle,
    client: Arc<dyn VisionClient>,
    outgoing_mime: OutgoingMime,
    timeout: Duration,
    result_tx: Sender<AnalysisOutcome>,
    result_rx: Receiver<AnalysisOutcome>,
    task: Option<JoinHandle<()>>,
}

impl AnalysisDispatcher {
    pub fn new(runtime: Handle, client: Arc<dyn VisionClient>) -> Self {
        let (result_tx, result_rx) = unbounded();
        Self {
            runtime,
            client,
            outgoing_mime: OutgoingMime::default(),
            timeout: DEFAULT_TIMEOUT,
            result_tx,
            result_rx,
            task: None,
        }
    }

    pub fn with_outgoing_mime(mut self, outgoing_mime: OutgoingMime) -> Self {
        self.outgoing_mime = outgoing_mime;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Starts an analysis for whatever the shell currently holds
    pub fn start(&mut self, shell: &mut AppShell) -> Result<(), ShellError> {
        let ticket = shell.begin_analysis()?;
        self.dispatch(ticket);
        Ok(())
    }

    pub fn dispatch(&mut self, ticket: AnalysisTicket) {
        self.cancel();

        let analyzer = DiagramAnalyzer::new(self.client.clone(), ticket.api_key)
            .with_outgoing_mime(self.outgoing_mime)
            .with_timeout(self.timeout);
        let result_tx = self.result_tx.clone();
        let token = ticket.token;
        let image = ticket.image;

        self.task = Some(self.runtime.spawn(async move {
            let result = analyzer.analyze(&image.bytes, &image.mime_type).await;
            let _ = result_tx.send(AnalysisOutcome { token, result });
        }));
    }

    /// Aborts the in-flight task, if any. Its result is never delivered.
    pub fn cancel(&mut self) {
        if let Some(task) = self.task.take() {
            if !task.is_finished() {
                debug!("Aborting in-flight analysis");
                task.abort();
            }
        }
    }

    pub fn is_busy(&self) -> bool {
        self.task.as_ref().is_some_and(|t| !t.is_finished())
    }

    /// Applies every pending outcome to the shell. Returns how many were accepted.
    pub fn poll(&mut self, shell: &mut AppShell) -> usize {
        let mut applied = 0;
        while let Ok(outcome) = self.result_rx.try_recv() {
            if shell.complete_analysis(outcome.token, outcome.result) {
                applied += 1;
            }
        }
        applied
    }
}

impl Drop for AnalysisDispatcher {
    fn drop(&mut self) {
        self.cancel();
    }
}
