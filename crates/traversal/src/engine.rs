//! The route traversal engine.

use std::time::Duration;

use audit::{AuditEvent, AuditTrail};
use common::{ShipmentId, WorkflowId};

use crate::checkpoint::{CheckpointStore, TraversalCheckpoint};
use crate::compensation::{CompensationSlot, HopMove};
use crate::error::TraversalError;
use crate::executor::HopExecutor;
use crate::retry::{BackoffPolicy, RetryPolicy};
use crate::route::Route;
use crate::services::{CarrierService, ResetService, RoutingService};
use crate::state::TraversalState;

/// Tunable policies for one traversal run.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Bounded retry applied to forward hops.
    pub move_policy: RetryPolicy,
    /// Bounded retry applied to compensating hops.
    pub compensate_policy: RetryPolicy,
    /// Backoff between traversal retry cycles.
    pub backoff: BackoffPolicy,
    /// Accumulated reset-fallback wait after which a warning is emitted.
    /// The wait itself stays unbounded.
    pub reset_wait_ceiling: Duration,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            move_policy: RetryPolicy::default(),
            compensate_policy: RetryPolicy::default(),
            backoff: BackoffPolicy::default(),
            reset_wait_ceiling: Duration::from_secs(3600),
        }
    }
}

/// Drives one shipment along its route, one hop at a time.
///
/// The engine owns the traversal position exclusively: at most one hop
/// (forward or compensating) is in flight at any time, and the loop itself
/// is the mutual-exclusion mechanism. On an exhausted forward failure it
/// either retries in place (at the origin), compensates the most recently
/// completed hop, or — when the compensation itself cannot be completed —
/// resets the shipment to its origin and restarts from scratch. A
/// checkpoint is persisted after every state transition so a restarted
/// process resumes without re-executing completed hops.
pub struct TraversalEngine<R, C, F, K>
where
    R: RoutingService,
    C: CarrierService,
    F: ResetService,
    K: CheckpointStore,
{
    routing: R,
    executor: HopExecutor<C>,
    reset: F,
    checkpoints: K,
    backoff: BackoffPolicy,
    reset_wait_ceiling: Duration,
    trail: AuditTrail,
}

impl<R, C, F, K> TraversalEngine<R, C, F, K>
where
    R: RoutingService,
    C: CarrierService,
    F: ResetService,
    K: CheckpointStore,
{
    /// Creates an engine with default policies.
    pub fn new(routing: R, carrier: C, reset: F, checkpoints: K) -> Self {
        Self::with_config(routing, carrier, reset, checkpoints, EngineConfig::default())
    }

    /// Creates an engine with explicit policies.
    pub fn with_config(
        routing: R,
        carrier: C,
        reset: F,
        checkpoints: K,
        config: EngineConfig,
    ) -> Self {
        Self {
            routing,
            executor: HopExecutor::with_policies(
                carrier,
                config.move_policy,
                config.compensate_policy,
            ),
            reset,
            checkpoints,
            backoff: config.backoff,
            reset_wait_ceiling: config.reset_wait_ceiling,
            trail: AuditTrail::new(),
        }
    }

    /// Returns a handle to this traversal's audit trail.
    ///
    /// The handle stays valid while the traversal runs; snapshots taken
    /// mid-flight observe a prefix of the final sequence.
    pub fn audit_trail(&self) -> AuditTrail {
        self.trail.clone()
    }

    /// Executes the traversal for a shipment handle, returning the
    /// completion message once the final waypoint is reached.
    #[tracing::instrument(skip(self))]
    pub async fn execute(self, shipment_handle: &str) -> Result<String, TraversalError> {
        metrics::counter!("traversal_executions_total").increment(1);
        let started = std::time::Instant::now();
        let workflow_id = WorkflowId::for_handle(shipment_handle);

        let (route, mut state) = match self.checkpoints.load(&workflow_id).await? {
            Some(cp) => {
                tracing::info!(
                    %workflow_id,
                    index = cp.state.current_index(),
                    "resuming traversal from checkpoint"
                );
                for event in cp.trail {
                    self.trail.append(event);
                }
                (cp.route, cp.state)
            }
            None => {
                let route = self.routing.fetch_route(shipment_handle).await?;
                tracing::info!(%workflow_id, %route, "starting traversal");

                let shipment_id = self.routing.create_shipment(shipment_handle).await?;
                tracing::info!(%shipment_id, "shipment created");

                let state = TraversalState::new(shipment_id);
                self.trail.append(AuditEvent::created(shipment_handle));
                self.save_checkpoint(&workflow_id, shipment_handle, &route, &state)
                    .await?;
                (route, state)
            }
        };

        let shipment_id = state.shipment_id();
        let mut slot = CompensationSlot::new();

        while state.current_index() < route.final_index() {
            // Register how to undo arriving at the current waypoint; there
            // is nothing to undo at the origin.
            slot.clear();
            if !state.at_origin() {
                slot.register(HopMove::new(
                    route.waypoint(state.current_index()),
                    route.waypoint(state.current_index() - 1),
                ));
            }

            let from = route.waypoint(state.current_index()).to_string();
            let to = route.waypoint(state.current_index() + 1).to_string();
            tracing::info!(
                %from,
                %to,
                index = state.current_index(),
                cycle = state.retry_cycle(),
                "attempting hop"
            );

            match self.executor.execute_move(shipment_id, &from, &to).await {
                Ok(()) => {
                    metrics::counter!("hops_moved_total").increment(1);
                    self.trail.append(AuditEvent::moved(&from, &to));
                    state.advance();
                    if state.current_index() == route.final_index() {
                        self.trail
                            .append(AuditEvent::completed(route.origin(), route.destination()));
                    }
                    self.save_checkpoint(&workflow_id, shipment_handle, &route, &state)
                        .await?;
                    tracing::info!(%to, index = state.current_index(), "hop completed");
                }
                Err(TraversalError::HopExhausted { reason, .. }) => {
                    metrics::counter!("hop_failures_total").increment(1);
                    tracing::warn!(%from, %to, %reason, "hop exhausted its retry budget");
                    self.trail
                        .append(AuditEvent::failed(&from, &to, reason.as_str()));
                    self.save_checkpoint(&workflow_id, shipment_handle, &route, &state)
                        .await?;

                    if state.at_origin() {
                        // Nothing to roll back on the very first hop; retry
                        // the same hop in place with growing backoff. The
                        // checkpoint lands before the wait so a crash
                        // mid-backoff resumes with the grown cycle.
                        state.retry_in_place();
                        self.save_checkpoint(&workflow_id, shipment_handle, &route, &state)
                            .await?;
                        let wait = self.backoff.delay(state.retry_cycle());
                        tracing::info!(
                            cycle = state.retry_cycle(),
                            wait_ms = wait.as_millis() as u64,
                            "retrying first hop in place"
                        );
                        tokio::time::sleep(wait).await;
                    } else if let Some(reverse) = slot.take() {
                        self.compensate_or_reset(
                            &workflow_id,
                            shipment_handle,
                            &route,
                            reverse,
                            &mut state,
                        )
                        .await?;
                    }
                }
                Err(other) => return Err(other),
            }
        }

        self.checkpoints.remove(&workflow_id).await?;

        metrics::histogram!("traversal_duration_seconds").record(started.elapsed().as_secs_f64());
        metrics::counter!("traversals_completed").increment(1);

        let message = format!(
            "Shipment {shipment_handle} delivered successfully to {}",
            route.destination()
        );
        tracing::info!(destination = route.destination(), "traversal completed");
        Ok(message)
    }

    /// Executes the registered compensation; on success steps the state
    /// back one waypoint, on exhausted failure invokes the reset fallback
    /// and restarts from the origin. Every transition is checkpointed
    /// before any backoff wait begins.
    async fn compensate_or_reset(
        &self,
        workflow_id: &WorkflowId,
        shipment_handle: &str,
        route: &Route,
        reverse: HopMove,
        state: &mut TraversalState,
    ) -> Result<(), TraversalError> {
        let shipment_id = state.shipment_id();
        match self
            .executor
            .execute_compensation(shipment_id, &reverse.from, &reverse.to)
            .await
        {
            Ok(()) => {
                metrics::counter!("compensations_total").increment(1);
                let reason = format!(
                    "Rolling back from {} to {} to compensate forward move",
                    reverse.from, reverse.to
                );
                self.trail
                    .append(AuditEvent::compensated(&reverse.from, &reverse.to, reason));
                state.backtrack();
                self.save_checkpoint(workflow_id, shipment_handle, route, state)
                    .await?;

                let wait = self.backoff.delay(state.retry_cycle());
                tracing::info!(
                    cycle = state.retry_cycle(),
                    wait_ms = wait.as_millis() as u64,
                    index = state.current_index(),
                    "resuming after compensation"
                );
                tokio::time::sleep(wait).await;
            }
            Err(err) => {
                metrics::counter!("resets_total").increment(1);
                tracing::error!(
                    error = %err,
                    "compensation exhausted its retry budget, resetting shipment to origin"
                );
                self.run_reset_fallback(shipment_id).await;
                state.reset_to_origin();
                self.save_checkpoint(workflow_id, shipment_handle, route, state)
                    .await?;
            }
        }
        Ok(())
    }

    /// Blocks until the reset fallback succeeds.
    ///
    /// The wait is unbounded; crossing the configured ceiling only emits a
    /// warning and a metric, it never gives up.
    async fn run_reset_fallback(&self, shipment_id: ShipmentId) {
        let mut cycle: u32 = 0;
        let mut total_wait = Duration::ZERO;
        let mut ceiling_crossed = false;

        loop {
            match self.reset.reset_to_origin(shipment_id).await {
                Ok(()) => {
                    tracing::info!(%shipment_id, "shipment reset to origin");
                    return;
                }
                Err(err) => {
                    cycle += 1;
                    let wait = self.backoff.delay(cycle);
                    total_wait += wait;
                    if !ceiling_crossed && total_wait > self.reset_wait_ceiling {
                        ceiling_crossed = true;
                        metrics::counter!("reset_wait_ceiling_exceeded_total").increment(1);
                        tracing::warn!(
                            %shipment_id,
                            waited_ms = total_wait.as_millis() as u64,
                            "reset fallback wait exceeded the configured ceiling"
                        );
                    }
                    tracing::error!(
                        attempt = cycle,
                        error = %err,
                        wait_ms = wait.as_millis() as u64,
                        "reset attempt failed, retrying"
                    );
                    tokio::time::sleep(wait).await;
                }
            }
        }
    }

    async fn save_checkpoint(
        &self,
        workflow_id: &WorkflowId,
        shipment_handle: &str,
        route: &Route,
        state: &TraversalState,
    ) -> Result<(), TraversalError> {
        self.checkpoints
            .save(TraversalCheckpoint {
                workflow_id: workflow_id.clone(),
                shipment_handle: shipment_handle.to_string(),
                route: route.clone(),
                state: state.clone(),
                trail: self.trail.snapshot(),
            })
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checkpoint::InMemoryCheckpointStore;
    use crate::services::{InMemoryCarrierService, InMemoryResetService, InMemoryRoutingService};
    use audit::AuditEventKind;

    type TestEngine = TraversalEngine<
        InMemoryRoutingService,
        InMemoryCarrierService,
        InMemoryResetService,
        InMemoryCheckpointStore,
    >;

    fn setup(
        route: &[&str],
    ) -> (
        TestEngine,
        InMemoryRoutingService,
        InMemoryCarrierService,
        InMemoryResetService,
        InMemoryCheckpointStore,
    ) {
        let routing = InMemoryRoutingService::with_route(route);
        let carrier = InMemoryCarrierService::new();
        let reset = InMemoryResetService::new();
        let checkpoints = InMemoryCheckpointStore::new();
        let engine = TraversalEngine::new(
            routing.clone(),
            carrier.clone(),
            reset.clone(),
            checkpoints.clone(),
        );
        (engine, routing, carrier, reset, checkpoints)
    }

    fn kinds(trail: &AuditTrail) -> Vec<AuditEventKind> {
        trail.snapshot().iter().map(|e| e.kind).collect()
    }

    #[tokio::test(start_paused = true)]
    async fn happy_path_emits_created_moves_completed() {
        let (engine, _, carrier, _, checkpoints) =
            setup(&["Mumbai", "Delhi", "Jaipur", "Bangalore"]);
        let trail = engine.audit_trail();

        let message = engine.execute("ORDER-001").await.unwrap();
        assert!(message.contains("Bangalore"));
        assert!(message.contains("delivered successfully"));

        // N + 1 events for N = 4 waypoints.
        assert_eq!(
            kinds(&trail),
            vec![
                AuditEventKind::Created,
                AuditEventKind::Moved,
                AuditEventKind::Moved,
                AuditEventKind::Moved,
                AuditEventKind::Completed,
            ]
        );

        let events = trail.snapshot();
        let completed = events.last().unwrap();
        assert_eq!(completed.from.as_deref(), Some("Mumbai"));
        assert_eq!(completed.to.as_deref(), Some("Bangalore"));

        // Compensation never invoked; checkpoint retired.
        assert!(carrier.compensations().is_empty());
        assert_eq!(checkpoints.checkpoint_count().await, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn hops_are_attempted_in_route_order() {
        let (engine, _, carrier, _, _) = setup(&["Mumbai", "Delhi", "Jaipur", "Bangalore"]);
        engine.execute("ORDER-001").await.unwrap();

        assert_eq!(
            carrier.moves(),
            vec![
                HopMove::new("Mumbai", "Delhi"),
                HopMove::new("Delhi", "Jaipur"),
                HopMove::new("Jaipur", "Bangalore"),
            ]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn mid_route_failure_compensates_one_hop_and_recovers() {
        let (engine, _, carrier, _, _) = setup(&["Mumbai", "Delhi", "Jaipur", "Bangalore"]);
        let trail = engine.audit_trail();
        // Exhaust the 3-attempt budget once, then succeed.
        carrier.fail_moves("Delhi", "Jaipur", 3);

        let message = engine.execute("ORDER-001").await.unwrap();
        assert!(message.contains("Bangalore"));

        // Exactly one compensation, rolling back Delhi -> Mumbai.
        assert_eq!(
            carrier.compensations(),
            vec![HopMove::new("Delhi", "Mumbai")]
        );

        // Mumbai -> Delhi re-travelled once after the rollback.
        assert_eq!(carrier.move_attempts("Mumbai", "Delhi"), 2);
        // 3 failed attempts plus the eventual success.
        assert_eq!(carrier.move_attempts("Delhi", "Jaipur"), 4);

        // The event right after FAILED is the matching COMPENSATED.
        let events = trail.snapshot();
        let failed_at = events
            .iter()
            .position(|e| e.kind == AuditEventKind::Failed)
            .unwrap();
        let compensated = &events[failed_at + 1];
        assert_eq!(compensated.kind, AuditEventKind::Compensated);
        assert_eq!(compensated.from.as_deref(), Some("Delhi"));
        assert_eq!(compensated.to.as_deref(), Some("Mumbai"));
    }

    #[tokio::test(start_paused = true)]
    async fn origin_failure_retries_in_place_without_compensation() {
        let (engine, _, carrier, _, _) = setup(&["A", "B"]);
        let trail = engine.audit_trail();
        // Two exhausted cycles (3 attempts each), then success.
        carrier.fail_moves("A", "B", 6);

        let message = engine.execute("ORDER-001").await.unwrap();
        assert!(message.contains("B"));

        assert_eq!(
            kinds(&trail),
            vec![
                AuditEventKind::Created,
                AuditEventKind::Failed,
                AuditEventKind::Failed,
                AuditEventKind::Moved,
                AuditEventKind::Completed,
            ]
        );
        assert!(carrier.compensations().is_empty());
        assert_eq!(carrier.move_attempts("A", "B"), 7);
    }

    #[tokio::test(start_paused = true)]
    async fn failed_compensation_resets_to_origin_and_restarts() {
        let (engine, _, carrier, reset, _) = setup(&["Mumbai", "Delhi", "Jaipur", "Bangalore"]);
        let trail = engine.audit_trail();
        carrier.fail_moves("Delhi", "Jaipur", 3);
        // The rollback itself exhausts its 3-attempt budget.
        carrier.fail_compensations("Delhi", "Mumbai", 3);

        let message = engine.execute("ORDER-001").await.unwrap();
        assert!(message.contains("Bangalore"));

        // Reset fallback invoked exactly once, then traversal restarted
        // with a fresh attempt at the first hop.
        assert_eq!(reset.reset_count(), 1);
        assert_eq!(carrier.move_attempts("Mumbai", "Delhi"), 2);

        // The trail keeps its original CREATED event and gains nothing
        // out of order: no COMPENSATED was ever recorded.
        let events = trail.snapshot();
        assert_eq!(events[0].kind, AuditEventKind::Created);
        let created_count = events
            .iter()
            .filter(|e| e.kind == AuditEventKind::Created)
            .count();
        assert_eq!(created_count, 1);
        assert!(!events.iter().any(|e| e.kind == AuditEventKind::Compensated));
    }

    #[tokio::test(start_paused = true)]
    async fn reset_fallback_retries_until_it_succeeds() {
        let (engine, _, carrier, reset, _) = setup(&["Mumbai", "Delhi", "Jaipur"]);
        carrier.fail_moves("Delhi", "Jaipur", 3);
        carrier.fail_compensations("Delhi", "Mumbai", 3);
        reset.fail_next(4);

        let message = engine.execute("ORDER-001").await.unwrap();
        assert!(message.contains("Jaipur"));
        assert_eq!(reset.attempt_count(), 5);
        assert_eq!(reset.reset_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn repeated_backtracking_grows_the_retry_cycle() {
        let (engine, _, carrier, _, _) = setup(&["A", "B", "C"]);
        let trail = engine.audit_trail();
        // B -> C exhausts its budget twice before succeeding; each cycle
        // compensates back to A and re-travels A -> B.
        carrier.fail_moves("B", "C", 6);

        engine.execute("ORDER-001").await.unwrap();

        assert_eq!(carrier.move_attempts("A", "B"), 3);
        assert_eq!(carrier.move_attempts("B", "C"), 7);
        assert_eq!(carrier.compensations().len(), 2);

        let events = trail.snapshot();
        let compensated: Vec<_> = events
            .iter()
            .filter(|e| e.kind == AuditEventKind::Compensated)
            .collect();
        assert_eq!(compensated.len(), 2);
        for event in compensated {
            assert_eq!(event.from.as_deref(), Some("B"));
            assert_eq!(event.to.as_deref(), Some("A"));
        }
    }

    #[tokio::test]
    async fn route_fetch_failure_is_fatal_setup_error() {
        let (engine, routing, carrier, _, _) = setup(&["A", "B"]);
        let trail = engine.audit_trail();
        routing.set_fail_on_fetch(true);

        let err = engine.execute("ORDER-001").await.unwrap_err();
        assert!(matches!(err, TraversalError::Routing(_)));
        assert!(trail.is_empty());
        assert!(carrier.moves().is_empty());
    }

    #[tokio::test]
    async fn too_short_route_is_rejected_before_the_loop() {
        let (engine, _, carrier, _, _) = setup(&["A"]);
        let trail = engine.audit_trail();

        let err = engine.execute("ORDER-001").await.unwrap_err();
        assert!(matches!(err, TraversalError::InvalidRoute { len: 1 }));
        assert!(trail.is_empty());
        assert!(carrier.moves().is_empty());
    }

    #[tokio::test]
    async fn shipment_creation_failure_is_fatal_setup_error() {
        let (engine, routing, carrier, _, _) = setup(&["A", "B"]);
        let trail = engine.audit_trail();
        routing.set_fail_on_create(true);

        let err = engine.execute("ORDER-001").await.unwrap_err();
        assert!(matches!(err, TraversalError::ShipmentCreation(_)));
        assert!(trail.is_empty());
        assert!(carrier.moves().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn resume_from_checkpoint_skips_completed_hops() {
        let (engine, routing, carrier, _, checkpoints) =
            setup(&["Mumbai", "Delhi", "Jaipur", "Bangalore"]);
        let trail = engine.audit_trail();

        // A prior run completed two hops before the process stopped.
        let shipment_id = common::ShipmentId::new(9);
        let mut state = TraversalState::new(shipment_id);
        state.advance();
        state.advance();
        checkpoints
            .save(TraversalCheckpoint {
                workflow_id: WorkflowId::for_handle("ORDER-001"),
                shipment_handle: "ORDER-001".to_string(),
                route: Route::new(vec![
                    "Mumbai".into(),
                    "Delhi".into(),
                    "Jaipur".into(),
                    "Bangalore".into(),
                ])
                .unwrap(),
                state,
                trail: vec![
                    AuditEvent::created("ORDER-001"),
                    AuditEvent::moved("Mumbai", "Delhi"),
                    AuditEvent::moved("Delhi", "Jaipur"),
                ],
            })
            .await
            .unwrap();

        let message = engine.execute("ORDER-001").await.unwrap();
        assert!(message.contains("Bangalore"));

        // No completed hop is re-executed and no new shipment is created.
        assert_eq!(carrier.move_attempts("Mumbai", "Delhi"), 0);
        assert_eq!(carrier.move_attempts("Delhi", "Jaipur"), 0);
        assert_eq!(carrier.move_attempts("Jaipur", "Bangalore"), 1);
        assert_eq!(routing.shipment_count(), 0);

        assert_eq!(
            kinds(&trail),
            vec![
                AuditEventKind::Created,
                AuditEventKind::Moved,
                AuditEventKind::Moved,
                AuditEventKind::Moved,
                AuditEventKind::Completed,
            ]
        );
        assert_eq!(checkpoints.checkpoint_count().await, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn checkpoint_is_durable_before_the_backoff_wait() {
        let routing = InMemoryRoutingService::with_route(&["A", "B", "C"]);
        let carrier = InMemoryCarrierService::new();
        let checkpoints = InMemoryCheckpointStore::new();
        // Zero retry intervals so the only wait left is the cycle backoff,
        // where the run parks while we inspect the store.
        let instant = RetryPolicy {
            max_attempts: 3,
            initial_interval: Duration::ZERO,
            max_interval: Duration::ZERO,
        };
        let engine = TraversalEngine::with_config(
            routing,
            carrier.clone(),
            InMemoryResetService::new(),
            checkpoints.clone(),
            EngineConfig {
                move_policy: instant.clone(),
                compensate_policy: instant,
                ..EngineConfig::default()
            },
        );
        carrier.fail_moves("B", "C", 3);

        let run = tokio::spawn(engine.execute("ORDER-001"));

        // Let the run progress to the post-compensation backoff; time stays
        // frozen while this loop is runnable, so the run cannot get past
        // the sleep before we look.
        let workflow_id = WorkflowId::for_handle("ORDER-001");
        let mut parked = None;
        for _ in 0..10_000 {
            if let Some(cp) = checkpoints.load(&workflow_id).await.unwrap()
                && cp
                    .trail
                    .iter()
                    .any(|e| e.kind == AuditEventKind::Compensated)
            {
                parked = Some(cp);
                break;
            }
            tokio::task::yield_now().await;
        }
        let cp = parked.expect("no checkpoint recorded the compensation");

        // The shipment has physically rolled back to A and the durable
        // checkpoint agrees: backtracked index, FAILED and COMPENSATED
        // already on the persisted trail.
        assert_eq!(carrier.compensations(), vec![HopMove::new("B", "A")]);
        assert_eq!(cp.state.current_index(), 0);
        assert_eq!(
            cp.trail.iter().map(|e| e.kind).collect::<Vec<_>>(),
            vec![
                AuditEventKind::Created,
                AuditEventKind::Moved,
                AuditEventKind::Failed,
                AuditEventKind::Compensated,
            ]
        );

        let message = run.await.unwrap().unwrap();
        assert!(message.contains("C"));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn trail_can_be_read_while_traversal_runs() {
        let (engine, _, _, _, _) = setup(&["A", "B", "C"]);
        let trail = engine.audit_trail();

        let run = tokio::spawn(async move { engine.execute("ORDER-001").await });

        // Poll the shared handle mid-traversal: every snapshot must be an
        // ordered prefix of the final sequence.
        let mut last_len = 0;
        loop {
            let snapshot = trail.snapshot();
            assert!(snapshot.len() >= last_len);
            if let Some(first) = snapshot.first() {
                assert_eq!(first.kind, AuditEventKind::Created);
            }
            last_len = snapshot.len();
            if snapshot
                .iter()
                .any(|e| e.kind == AuditEventKind::Completed)
            {
                break;
            }
            tokio::task::yield_now().await;
        }

        let message = run.await.unwrap().unwrap();
        assert!(message.contains("C"));
    }
}
