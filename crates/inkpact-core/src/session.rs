//! The signing session.
//!
//! A [`SigningSession`] owns exactly one recorder/workflow pair and drives
//! the full flow: open → identify → capture → acknowledge → submit.
//! Device context collection starts at open and runs opportunistically in
//! parallel with Identity-step interaction; the latest result is
//! snapshotted at submit time (last-write-wins). Dropping the session
//! aborts the collection task and abandons any in-flight network future,
//! so a closed dialog produces no orphaned effects.

use std::sync::Arc;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use inkpact_capture::{CaptureUpdate, Point, SignatureMetadata, StrokeRecorder};
use inkpact_consent::{
    ConsentWorkflow, Notary, Party, Witness, WorkflowConfig, WorkflowState,
};
use inkpact_evidence::{DeviceContext, EvidencePackage, EvidencePackageBuilder};

use crate::config::SessionConfig;
use crate::context::{self, DeviceContextCollector};
use crate::endpoints::{Contract, ContractProvider, SubmissionEndpoint, SubmissionReceipt};
use crate::error::Result;
use crate::gateway::{build_submission_request, SubmissionGateway};

/// The durable outcome of one successful submission.
#[derive(Clone, Debug)]
pub struct SubmittedEvidence {
    /// The evidence package frozen at submit time.
    pub package: EvidencePackage,
    /// The endpoint's acknowledgement.
    pub receipt: SubmissionReceipt,
}

/// One interactive signing session.
///
/// Owns the capture, the workflow, and the endpoint handles. One session
/// means one capture — there are no concurrent writers to a signature.
pub struct SigningSession<C, S>
where
    C: DeviceContextCollector + 'static,
    S: SubmissionEndpoint,
{
    config: SessionConfig,
    recorder: StrokeRecorder,
    workflow: ConsentWorkflow,
    gateway: SubmissionGateway<S>,
    collector: Arc<C>,
    contract: Contract,
    context_rx: watch::Receiver<Option<DeviceContext>>,
    context_task: JoinHandle<()>,
    last_transport_error: Option<String>,
}

impl<C, S> SigningSession<C, S>
where
    C: DeviceContextCollector + 'static,
    S: SubmissionEndpoint,
{
    /// Open a session for a contract.
    ///
    /// Validates the configuration, fetches the contract (the document
    /// version whose hash the evidence will record), and starts the
    /// opportunistic device-context task. The provider is only needed
    /// here; the session holds no handle to it afterwards.
    ///
    /// # Errors
    ///
    /// Fails on invalid configuration, unsupported canvas geometry, or a
    /// contract fetch error.
    pub async fn open<P: ContractProvider>(
        config: SessionConfig,
        collector: C,
        provider: P,
        submission: S,
        contract_id: &str,
    ) -> Result<Self> {
        config.validate()?;
        let contract = provider.get_contract(contract_id).await?;
        info!(contract = %contract.id, "signing session opened");

        let recorder = StrokeRecorder::new(
            config.canvas_width,
            config.canvas_height,
            config.pen_color,
            config.pen_width,
        )?;
        let workflow = ConsentWorkflow::new(WorkflowConfig {
            consent: config.consent.clone(),
            attestors: config.attestors,
        });
        let gateway = SubmissionGateway::new(submission, config.submission_timeout);

        let collector = Arc::new(collector);
        let (context_tx, context_rx) = watch::channel(None);
        let task_collector = Arc::clone(&collector);
        let geolocation_timeout = config.geolocation_timeout;
        let context_task = tokio::spawn(async move {
            let context = context::collect(task_collector.as_ref(), geolocation_timeout).await;
            // Last write wins; the session snapshots at submit time.
            let _ = context_tx.send(Some(context));
        });

        Ok(Self {
            config,
            recorder,
            workflow,
            gateway,
            collector,
            contract,
            context_rx,
            context_task,
            last_transport_error: None,
        })
    }

    /// The loaded contract.
    pub fn contract(&self) -> &Contract {
        &self.contract
    }

    /// The current workflow state.
    pub fn state(&self) -> &WorkflowState {
        self.workflow.state()
    }

    /// Whether the capture has no sealed strokes.
    pub fn is_empty(&self) -> bool {
        self.recorder.is_empty()
    }

    /// Metadata for the sealed capture.
    pub fn metadata(&self) -> &SignatureMetadata {
        self.recorder.metadata()
    }

    /// The most recent transport failure, for display beside the retry
    /// control.
    pub fn last_transport_error(&self) -> Option<&str> {
        self.last_transport_error.as_deref()
    }

    /// The current composited raster as PNG bytes, for embedding.
    pub fn raster_png(&self) -> Result<Vec<u8>> {
        Ok(self.recorder.render_png()?)
    }

    /// Select the signing party.
    pub fn set_party(&mut self, party: Party) {
        self.workflow.set_party(party);
    }

    /// Identity → Capture.
    pub fn proceed_to_capture(&mut self) -> Result<()> {
        self.workflow.begin_capture()?;
        Ok(())
    }

    /// Open a stroke. Pointer handling is synchronous and never blocks on
    /// network I/O.
    pub fn begin_stroke(&mut self, point: Point) -> Result<CaptureUpdate> {
        Ok(self.recorder.begin(point)?)
    }

    /// Extend the open stroke; only the incremental segment is rendered.
    pub fn extend_stroke(&mut self, point: Point) -> Result<CaptureUpdate> {
        Ok(self.recorder.extend(point)?)
    }

    /// Seal the open stroke.
    pub fn end_stroke(&mut self) -> Result<CaptureUpdate> {
        Ok(self.recorder.end()?)
    }

    /// Remove the last sealed stroke.
    pub fn undo_stroke(&mut self) -> Result<CaptureUpdate> {
        Ok(self.recorder.undo()?)
    }

    /// Discard all strokes.
    pub fn clear_capture(&mut self) -> Result<CaptureUpdate> {
        Ok(self.recorder.clear()?)
    }

    /// Enter or replace the witness record.
    pub fn set_witness(&mut self, witness: Option<Witness>) {
        self.workflow.set_witness(witness);
    }

    /// Enter or replace the notary record.
    pub fn set_notary(&mut self, notary: Option<Notary>) {
        self.workflow.set_notary(notary);
    }

    /// Capture → LegalAcknowledgment. Signature and attestor checks run
    /// and report together.
    pub fn proceed_to_acknowledgment(&mut self) -> Result<()> {
        self.workflow
            .begin_acknowledgment(self.recorder.is_empty())?;
        Ok(())
    }

    /// Record acceptance of a consent key at the current time.
    pub fn accept_consent(&mut self, key: impl Into<String>) {
        self.workflow
            .accept_consent(key, current_timestamp_ms());
    }

    /// Withdraw a previously accepted consent key.
    pub fn withdraw_consent(&mut self, key: &str) {
        self.workflow.withdraw_consent(key);
    }

    /// Step back one state without discarding entered data.
    pub fn back(&mut self) -> Result<()> {
        self.workflow.back()?;
        Ok(())
    }

    /// Submit the signature.
    ///
    /// Freezes the latest device context (last-write-wins), builds the
    /// evidence package, serializes the wire request, and commits the
    /// workflow on endpoint acceptance. On failure the workflow returns to
    /// `LegalAcknowledgment` with the capture retained — the user retries
    /// explicitly; nothing auto-retries.
    pub async fn submit(&mut self) -> Result<SubmittedEvidence> {
        self.workflow
            .begin_submission(self.recorder.is_empty())?;

        let device_context = self.snapshot_device_context().await;

        let mut builder = EvidencePackageBuilder::new(self.contract.id.as_str())
            .document_hash(self.contract.content_hash.clone())
            .consents(
                self.config.consent.required_keys().to_vec(),
                self.workflow.consents().to_vec(),
            )
            .witness(self.workflow.witness().cloned())
            .notary(self.workflow.notary().cloned())
            .device_context(device_context)
            .capture(
                self.recorder.capture().clone(),
                self.config.canvas_width,
                self.config.canvas_height,
            );
        if let Some(party) = self.workflow.party() {
            builder = builder.party(party.clone());
        }

        let package = match builder.build(None) {
            Ok(package) => package,
            Err(err) => {
                // Leave Submitting the same way a transport failure would.
                let _ = self.workflow.fail_submission(err.to_string());
                let _ = self.workflow.resume_after_failure();
                return Err(err.into());
            }
        };

        let request = build_submission_request(
            &self.contract,
            &package.snapshot.party,
            package.snapshot.raster_png.clone(),
            package.snapshot.metadata.clone(),
            package.snapshot.witness.clone(),
            package.snapshot.notary.clone(),
        );

        match self
            .gateway
            .submit_and_commit(&mut self.workflow, &request)
            .await
        {
            Ok(receipt) => {
                self.last_transport_error = None;
                Ok(SubmittedEvidence { package, receipt })
            }
            Err(err) => {
                self.last_transport_error = Some(err.to_string());
                Err(err)
            }
        }
    }

    /// Snapshot the latest collected device context, last-write-wins.
    ///
    /// When collection is still in flight the snapshot waits out its
    /// bounded window once, then degrades to [`DeviceContext::unknown`] —
    /// context trouble never blocks submission indefinitely.
    async fn snapshot_device_context(&mut self) -> DeviceContext {
        if let Some(context) = self.context_rx.borrow().clone() {
            return context;
        }
        let bounded = tokio::time::timeout(
            self.config.geolocation_timeout,
            self.context_rx.wait_for(|value| value.is_some()),
        );
        match bounded.await {
            Ok(Ok(guard)) => guard.clone().unwrap_or_else(DeviceContext::unknown),
            _ => DeviceContext::unknown(),
        }
    }

    /// Reset for a reopened dialog: back to `Identity`, capture cleared,
    /// consents and attestors discarded. No leakage between sessions.
    pub fn reset(&mut self) -> Result<()> {
        debug!("session reset");
        self.workflow.reset();
        self.recorder.clear()?;
        self.last_transport_error = None;
        Ok(())
    }

    /// Close the session, aborting background work.
    pub fn close(self) {
        // Drop handles the rest.
    }

    /// The context collector handle (shared with the background task).
    pub fn collector(&self) -> &Arc<C> {
        &self.collector
    }
}

impl<C, S> Drop for SigningSession<C, S>
where
    C: DeviceContextCollector + 'static,
    S: SubmissionEndpoint,
{
    fn drop(&mut self) {
        // Abandoned sessions must not leave the collection task running.
        self.context_task.abort();
    }
}

fn current_timestamp_ms() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}
