//! Test generation pipeline.
//!
//! A run walks one feature through four stages:
//!
//! ```text
//! ┌─────────┐ synthesize_plan ┌─────────┐ synthesize_code ┌─────────┐  commit  ┌─────────┐
//! │  STORY  │────────────────▶│  PLAN   │────────────────▶│  CODE   │─────────▶│  DONE   │
//! └─────────┘◀────────────────└─────────┘◀────────────────└─────────┘          └─────────┘
//!                 go_back                     go_back
//! ```
//!
//! Only the commit writes durable state; everything before it lives in the
//! run and disappears on [`Pipeline::reset`].
//!
//! # Concurrency
//!
//! A [`Pipeline`] is a cheap, cloneable handle to shared run state, so a host
//! can call [`Pipeline::cancel`] or [`Pipeline::reset`] from another task
//! while an advance is suspended on the backend. Each run has at most one
//! outstanding call; other actions are refused with [`PilotError::Busy`]
//! until it settles. Every call carries a cancellation token and the run's
//! epoch at the time it started. Reset and cancel bump the epoch, so a
//! response arriving afterwards is discarded instead of applied.
//! Cancel does not release a commit whose durable append has started.
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use testpilot_core::{
//!     generation::{GenerationClient, TemplateBackend},
//!     params::CreateProject,
//!     pipeline::{PipelineBuilder, Stage},
//!     store::{ArtifactStore, MemoryStore},
//! };
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let store = Arc::new(MemoryStore::new());
//! let project = CreateProject {
//!     name: "Shop".to_string(),
//!     base_url: "https://shop.example.com".to_string(),
//!     ..Default::default()
//! }
//! .into_project(store.generate_id(), jiff::Timestamp::now());
//! store.save_project(&project).await?;
//!
//! let pipeline = PipelineBuilder::new(store, GenerationClient::new(TemplateBackend::new()))
//!     .build(&project.id)
//!     .await?;
//!
//! pipeline.set_story("Checkout Flow", "As a shopper, I want to pay for my cart.")?;
//! pipeline.advance().await?; // plan
//! pipeline.advance().await?; // code
//! let test_case = pipeline.commit().await?;
//!
//! assert_eq!(pipeline.view().stage, Stage::Done);
//! assert_eq!(test_case.filename, "checkout-flow.spec.ts");
//! # Ok(())
//! # }
//! ```

use std::{
    future::Future,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};

use jiff::Timestamp;
use log::{debug, info, warn};
use tokio_util::sync::CancellationToken;

use crate::{
    error::{PilotError, Result},
    generation::{count_scenarios, GeneratedFile, GenerationClient},
    models::{Project, TestCase, TestCaseStatus},
    store::ArtifactStore,
};

pub mod builder;
pub mod committer;
pub mod stage;
pub mod view;


pub use builder::{PipelineBuilder, PipelineConfig};
pub use committer::{RepositoryCommitter, SimulatedCommitter};
pub use stage::Stage;
pub use view::{LastError, RunView};

/// Mutable state of a run.
#[derive(Debug, Default)]
struct RunState {
    stage: Stage,
    title: String,
    description: String,
    plan: String,
    scenario_count: u32,
    files: Vec<GeneratedFile>,
    commit_hash: Option<String>,
    last_error: Option<LastError>,
    outstanding: Option<CancellationToken>,
    epoch: u64,
    /// The commit's durable append is in flight.
    storing: bool,
}

impl RunState {
    fn expect_stage(&self, expected: Stage, action: &str) -> Result<()> {
        if self.stage == expected {
            Ok(())
        } else {
            Err(PilotError::invalid_transition(self.stage, action))
        }
    }

    fn primary_file(&self) -> Result<&GeneratedFile> {
        let file = self.files.first().ok_or_else(|| {
            PilotError::validation("files").with_reason("no generated file to commit")
        })?;
        if file.filename.trim().is_empty() {
            return Err(PilotError::validation("filename").with_reason("must not be empty"));
        }
        if file.content.trim().is_empty() {
            return Err(PilotError::validation("content").with_reason("must not be empty"));
        }
        Ok(file)
    }

    /// Stage the run moves to once the current stage's call succeeds.
    fn forward(&self, action: &str) -> Result<Stage> {
        self.stage
            .next()
            .ok_or_else(|| PilotError::invalid_transition(self.stage, action))
    }

    /// Whether the gate out of the current stage holds.
    fn gate(&self) -> Result<()> {
        match self.stage {
            Stage::Story => {
                required("title", &self.title)?;
                required("description", &self.description)
            }
            Stage::Plan => required("plan", &self.plan),
            Stage::Code => self.primary_file().map(|_| ()),
            Stage::Done => Err(PilotError::invalid_transition(Stage::Done, "advance")),
        }
    }

    fn clear(&mut self) {
        self.stage = Stage::Story;
        self.title.clear();
        self.description.clear();
        self.plan.clear();
        self.scenario_count = 0;
        self.files.clear();
        self.commit_hash = None;
        self.last_error = None;
    }

    /// Cancels the outstanding call, if any, and invalidates its response.
    fn abandon_call(&mut self) -> bool {
        self.epoch += 1;
        self.storing = false;
        match self.outstanding.take() {
            Some(token) => {
                token.cancel();
                true
            }
            None => false,
        }
    }

    fn view(&self, project_id: &str) -> RunView {
        RunView {
            project_id: project_id.to_string(),
            stage: self.stage,
            can_advance: self.outstanding.is_none() && self.gate().is_ok(),
            busy: self.outstanding.is_some(),
            last_error: self.last_error.clone(),
            title: self.title.clone(),
            description: self.description.clone(),
            plan: self.plan.clone(),
            scenario_count: self.scenario_count,
            files: self.files.clone(),
            commit_hash: self.commit_hash.clone(),
        }
    }
}

fn required(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        Err(PilotError::validation(field).with_reason("must not be empty"))
    } else {
        Ok(())
    }
}

/// Claim on the single outstanding call of a run.
struct Ticket {
    token: CancellationToken,
    epoch: u64,
}

struct Inner {
    project_id: String,
    store: Arc<dyn ArtifactStore>,
    client: GenerationClient,
    committer: Option<Arc<dyn RepositoryCommitter>>,
    config: PipelineConfig,
    state: Mutex<RunState>,
}

/// Handle to the generation run of one project.
#[derive(Clone)]
pub struct Pipeline {
    inner: Arc<Inner>,
}

impl Pipeline {
    pub(crate) fn new(
        project_id: String,
        store: Arc<dyn ArtifactStore>,
        client: GenerationClient,
        committer: Option<Arc<dyn RepositoryCommitter>>,
        config: PipelineConfig,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                project_id,
                store,
                client,
                committer,
                config,
                state: Mutex::new(RunState::default()),
            }),
        }
    }

    /// Project the run commits into.
    pub fn project_id(&self) -> &str {
        &self.inner.project_id
    }

    /// Snapshot of the run.
    pub fn view(&self) -> RunView {
        self.state().view(&self.inner.project_id)
    }

    /// Sets the feature title and description. Only allowed in STORY.
    ///
    /// Values are not validated here; the gate out of STORY checks them.
    pub fn set_story(&self, title: &str, description: &str) -> Result<RunView> {
        self.update(|state| {
            state.expect_stage(Stage::Story, "set the story")?;
            state.title = title.to_string();
            state.description = description.to_string();
            Ok(())
        })
    }

    /// Replaces the plan text and recounts its scenarios. Only allowed in
    /// PLAN.
    pub fn edit_plan(&self, plan: &str) -> Result<RunView> {
        self.update(|state| {
            state.expect_stage(Stage::Plan, "edit the plan")?;
            state.plan = plan.to_string();
            state.scenario_count = count_scenarios(plan);
            Ok(())
        })
    }

    /// Steps back one stage.
    ///
    /// Going back from PLAN discards the plan; going back from CODE discards
    /// the generated files and keeps the plan.
    pub fn go_back(&self) -> Result<RunView> {
        self.update(|state| {
            let previous = state
                .stage
                .previous()
                .ok_or_else(|| PilotError::invalid_transition(state.stage, "go back"))?;
            match state.stage {
                Stage::Plan => {
                    state.plan.clear();
                    state.scenario_count = 0;
                }
                Stage::Code => state.files.clear(),
                Stage::Story | Stage::Done => {}
            }
            info!("run {}: {} -> {previous}", self.inner.project_id, state.stage);
            state.stage = previous;
            Ok(())
        })
    }

    /// Advances one stage.
    ///
    /// STORY synthesizes a plan, PLAN synthesizes code and CODE commits. On
    /// failure the run stays where it was and records the error.
    ///
    /// # Errors
    ///
    /// - `PilotError::Validation` if the gate out of the stage fails
    /// - `PilotError::InvalidTransition` from DONE
    /// - `PilotError::Busy` if another call is outstanding
    /// - `PilotError::Generation` or `PilotError::Cancelled` from the backend
    /// - persistence errors from the commit
    pub async fn advance(&self) -> Result<RunView> {
        let stage = self.state().stage;
        match stage {
            Stage::Story => self.synthesize_plan().await,
            Stage::Plan => self.synthesize_code().await,
            Stage::Code => self.commit().await.map(|_| self.view()),
            Stage::Done => Err(self.fail(PilotError::invalid_transition(stage, "advance"))),
        }
    }

    /// Commits the primary generated file as a new test case of the project.
    ///
    /// The commit identifier comes from the repository committer when it
    /// provides one, else from the store. The test case append is the only
    /// durable write of a run. Once it starts, [`Pipeline::cancel`] no longer
    /// releases the call, so the run stays busy until the write settles. A
    /// reset while it is in flight lets the write land but leaves the run in
    /// STORY.
    ///
    /// # Errors
    ///
    /// - `PilotError::InvalidTransition` outside CODE
    /// - `PilotError::Validation` if there is no non-empty generated file
    /// - `PilotError::ProjectNotFound` if the project no longer resolves
    /// - store and committer errors; the run stays in CODE
    pub async fn commit(&self) -> Result<TestCase> {
        let ((title, file, next), ticket) = self.begin("commit", |state| {
            state.expect_stage(Stage::Code, "commit")?;
            let file = state.primary_file()?.clone();
            Ok((state.title.clone(), file, state.forward("commit")?))
        })?;

        let result = async {
            let test_case = self
                .race(&ticket, self.prepare_commit(&title, &file))
                .await?;
            self.start_storing(&ticket)?;
            self.append(&test_case).await?;
            Ok::<_, PilotError>(test_case)
        }
        .await;

        let (mut state, test_case) = self.settle(&ticket, result)?;
        info!(
            "run {}: committed {} as {}",
            self.inner.project_id, test_case.filename, test_case.commit_hash
        );
        state.commit_hash = Some(test_case.commit_hash.clone());
        state.stage = next;
        Ok(test_case)
    }

    /// Clears the run back to an empty STORY stage, abandoning any
    /// outstanding call.
    pub fn reset(&self) -> RunView {
        let mut state = self.state();
        if state.abandon_call() {
            warn!("run {}: reset abandoned an outstanding call", self.inner.project_id);
        }
        state.clear();
        info!("run {}: reset", self.inner.project_id);
        state.view(&self.inner.project_id)
    }

    /// Cancels the outstanding call without touching the run's content.
    ///
    /// Returns false when nothing was outstanding, or when the outstanding
    /// call is a commit whose durable append already started.
    pub fn cancel(&self) -> bool {
        let mut state = self.state();
        if state.storing {
            info!(
                "run {}: commit is being stored, not cancelled",
                self.inner.project_id
            );
            return false;
        }
        let cancelled = state.abandon_call();
        if cancelled {
            info!("run {}: cancelled outstanding call", self.inner.project_id);
            state.last_error = Some(LastError::from(&PilotError::Cancelled));
        }
        cancelled
    }

    async fn synthesize_plan(&self) -> Result<RunView> {
        let ((title, description, next), ticket) = self.begin("synthesize_plan", |state| {
            state.expect_stage(Stage::Story, "advance")?;
            state.gate()?;
            Ok((
                state.title.clone(),
                state.description.clone(),
                state.forward("advance")?,
            ))
        })?;

        let call = self.inner.client.synthesize_plan(&description, &title);
        let result = self.race(&ticket, self.bounded(call)).await;

        let (mut state, plan) = self.settle(&ticket, result)?;
        state.plan = plan.plan_markdown;
        state.scenario_count = plan.scenario_count;
        info!(
            "run {}: {} -> {next} ({} scenarios)",
            self.inner.project_id, state.stage, state.scenario_count
        );
        state.stage = next;
        Ok(state.view(&self.inner.project_id))
    }

    async fn synthesize_code(&self) -> Result<RunView> {
        let ((title, plan, next), ticket) = self.begin("synthesize_code", |state| {
            state.expect_stage(Stage::Plan, "advance")?;
            state.gate()?;
            Ok((
                state.title.clone(),
                state.plan.clone(),
                state.forward("advance")?,
            ))
        })?;

        let call = async {
            let project = self.load_project().await?;
            let call = self.inner.client.synthesize_code(
                &plan,
                &title,
                &project.base_url,
                project.test_language,
            );
            self.bounded(call).await
        };
        let result = self.race(&ticket, call).await;

        let (mut state, code) = self.settle(&ticket, result)?;
        state.files = code.files;
        state.scenario_count = code.scenario_count;
        info!(
            "run {}: {} -> {next} ({} files)",
            self.inner.project_id,
            state.stage,
            state.files.len()
        );
        state.stage = next;
        Ok(state.view(&self.inner.project_id))
    }

    async fn load_project(&self) -> Result<Project> {
        self.inner
            .store
            .get_project(&self.inner.project_id)
            .await?
            .ok_or_else(|| PilotError::ProjectNotFound {
                id: self.inner.project_id.clone(),
            })
    }

    async fn prepare_commit(&self, title: &str, file: &GeneratedFile) -> Result<TestCase> {
        let project = self.load_project().await?;

        let committed = match &self.inner.committer {
            Some(committer) => {
                let message = format!("Add {title} tests");
                committer.commit(&project, file, &message).await?
            }
            None => None,
        };
        let commit_hash = committed.unwrap_or_else(|| self.inner.store.generate_commit_hash());

        Ok(TestCase {
            id: self.inner.store.generate_id(),
            title: title.to_string(),
            filename: file.filename.clone(),
            content: file.content.clone(),
            created_at: Timestamp::now(),
            commit_hash,
            status: TestCaseStatus::Committed,
        })
    }

    async fn append(&self, test_case: &TestCase) -> Result<()> {
        let appended = self
            .inner
            .store
            .append_test_case(&self.inner.project_id, test_case)
            .await?;
        if appended {
            Ok(())
        } else {
            Err(PilotError::ProjectNotFound {
                id: self.inner.project_id.clone(),
            })
        }
    }

    fn state(&self) -> MutexGuard<'_, RunState> {
        self.inner
            .state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn fail(&self, err: PilotError) -> PilotError {
        self.state().last_error = Some(LastError::from(&err));
        err
    }

    /// Applies a synchronous action, recording its outcome.
    fn update<F>(&self, apply: F) -> Result<RunView>
    where
        F: FnOnce(&mut RunState) -> Result<()>,
    {
        let mut state = self.state();
        let result = if state.outstanding.is_some() {
            Err(PilotError::Busy)
        } else {
            apply(&mut state)
        };
        match result {
            Ok(()) => {
                state.last_error = None;
                Ok(state.view(&self.inner.project_id))
            }
            Err(err) => {
                state.last_error = Some(LastError::from(&err));
                Err(err)
            }
        }
    }

    /// Claims the run's outstanding call after `prepare` validates the state
    /// and extracts the call's inputs.
    fn begin<T, F>(&self, action: &str, prepare: F) -> Result<(T, Ticket)>
    where
        F: FnOnce(&RunState) -> Result<T>,
    {
        let mut state = self.state();
        let prepared = if state.outstanding.is_some() {
            Err(PilotError::Busy)
        } else {
            prepare(&state)
        };

        match prepared {
            Ok(inputs) => {
                debug!("run {}: {action} started", self.inner.project_id);
                let token = CancellationToken::new();
                state.outstanding = Some(token.clone());
                let ticket = Ticket {
                    token,
                    epoch: state.epoch,
                };
                Ok((inputs, ticket))
            }
            Err(err) => {
                state.last_error = Some(LastError::from(&err));
                Err(err)
            }
        }
    }

    /// Bounds a backend call by the configured timeout.
    async fn bounded<T>(&self, call: impl Future<Output = Result<T>>) -> Result<T> {
        match self.inner.config.generation_timeout {
            Some(limit) => tokio::time::timeout(limit, call).await.unwrap_or_else(|_| {
                Err(PilotError::generation(format!("timed out after {limit:?}")))
            }),
            None => call.await,
        }
    }

    /// Runs `call` until it completes or the ticket is cancelled.
    async fn race<T>(&self, ticket: &Ticket, call: impl Future<Output = Result<T>>) -> Result<T> {
        tokio::select! {
            biased;
            () = ticket.token.cancelled() => Err(PilotError::Cancelled),
            result = call => result,
        }
    }

    /// Marks the commit's durable append as started, unless the call was
    /// abandoned first.
    fn start_storing(&self, ticket: &Ticket) -> Result<()> {
        let mut state = self.state();
        if state.epoch != ticket.epoch {
            return Err(PilotError::Cancelled);
        }
        state.storing = true;
        Ok(())
    }

    /// Releases the outstanding call and records its outcome.
    ///
    /// A response for an abandoned call is dropped and reported as
    /// `Cancelled` without touching the run.
    fn settle<T>(
        &self,
        ticket: &Ticket,
        result: Result<T>,
    ) -> Result<(MutexGuard<'_, RunState>, T)> {
        let mut state = self.state();
        if state.epoch != ticket.epoch {
            warn!(
                "run {}: discarding response for an abandoned call",
                self.inner.project_id
            );
            return Err(PilotError::Cancelled);
        }

        state.outstanding = None;
        state.storing = false;
        match result {
            Ok(value) => {
                state.last_error = None;
                Ok((state, value))
            }
            Err(err) => {
                state.last_error = Some(LastError::from(&err));
                Err(err)
            }
        }
    }
}
