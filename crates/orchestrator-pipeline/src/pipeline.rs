use crate::builtins;
use crate::collaborators::{Database, FlowEngine, Ingestor};
use crate::dedup::DedupTable;
use crate::swarm;
use crate::telemetry::TelemetryBuilder;
use log::{info, warn};
use orchestrator_classifier::{ClassificationCache, Classifier};
use orchestrator_core::{Intent, PipelineResult, RequestContext, ResultType, UnifiedMessage};
use orchestrator_flows::{first_match, FlowInput};
use orchestrator_gating::{run_gates, GatingConfigCache, RateLimitStore};
use orchestrator_media::backend::{OcrBackend, SpeechToTextBackend, VisionBackend};
use orchestrator_media::{enrich_with_document_extract, enrich_with_ocr, enrich_with_vision_description, enrich_with_voice_transcription};
use orchestrator_provider::{CallOptions, CallRequest, ChatMessage, FailoverRouter};
use orchestrator_router::IntentRouter;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;

const SILENT_SENTINEL: &str = "<<silent>>";
const HEALTH_MONITOR_INTERVAL: Duration = Duration::from_secs(60);

/// Everything `Pipeline::init` needs to wire up the composition root's
/// collaborators. Grouped as one struct per spec §9's "explicit
/// `init(options)` lifecycle" design note, so callers build it once
/// rather than threading a dozen constructor arguments.
pub struct PipelineOptions {
    pub provider_router: Arc<FailoverRouter>,
    pub intent_router: Arc<IntentRouter>,
    pub database: Arc<dyn Database>,
    pub flow_engine: Arc<dyn FlowEngine>,
    pub ingestor: Arc<dyn Ingestor>,
    pub gating_config: GatingConfigCache,
    pub rate_limit_store: Arc<dyn RateLimitStore>,
    pub ocr_backend: Option<Arc<dyn OcrBackend>>,
    pub vision_backends: Vec<Arc<dyn VisionBackend>>,
    pub voice_backends: Vec<Arc<dyn SpeechToTextBackend>>,
}

/// The `process(message, context)` entrypoint and its supervised
/// background tasks — spec §4.1.
pub struct Pipeline {
    provider_router: Arc<FailoverRouter>,
    intent_router: Arc<IntentRouter>,
    database: Arc<dyn Database>,
    flow_engine: Arc<dyn FlowEngine>,
    ingestor: Arc<dyn Ingestor>,
    gating_config: GatingConfigCache,
    rate_limit_store: Arc<dyn RateLimitStore>,
    ocr_backend: Option<Arc<dyn OcrBackend>>,
    vision_backends: Vec<Arc<dyn VisionBackend>>,
    voice_backends: Vec<Arc<dyn SpeechToTextBackend>>,
    dedup: DedupTable,
    classification_cache: ClassificationCache,
    health_monitor: Option<JoinHandle<()>>,
}

impl Pipeline {
    /// Acquires shared collaborators and spawns the ~60s provider health
    /// monitor. Call once from the composition root.
    pub fn init(options: PipelineOptions) -> Self {
        let health_monitor = Some(options.provider_router.spawn_health_monitor(HEALTH_MONITOR_INTERVAL));
        Self {
            provider_router: options.provider_router,
            intent_router: options.intent_router,
            database: options.database,
            flow_engine: options.flow_engine,
            ingestor: options.ingestor,
            gating_config: options.gating_config,
            rate_limit_store: options.rate_limit_store,
            ocr_backend: options.ocr_backend,
            vision_backends: options.vision_backends,
            voice_backends: options.voice_backends,
            dedup: DedupTable::new(),
            classification_cache: ClassificationCache::default(),
            health_monitor,
        }
    }

    /// Stops the health monitor ticker. Supervised child processes (async
    /// CLI executions) are owned by `orchestrator-cli-exec` and are out of
    /// scope here.
    pub fn shutdown(&mut self) {
        if let Some(handle) = self.health_monitor.take() {
            handle.abort();
        }
    }

    pub async fn process(&self, message: UnifiedMessage, context: RequestContext) -> PipelineResult {
        let message = message.normalize();
        let mut telemetry = TelemetryBuilder::new(message.id.clone(), message.platform.0.clone());

        // Step 2: deduplicate.
        if self.dedup.check_and_mark(&message).await {
            return self.finish(telemetry, PipelineResult::duplicate());
        }

        // Step 3: gate.
        let gating_config = match self.gating_config.get(&context.user_id).await {
            Ok(config) => config,
            Err(err) => {
                warn!("gating config load failed, failing open: {err}");
                orchestrator_gating::GatingConfig::default()
            }
        };
        let is_reply_to_bot = self.database.is_reply_to_bot(&message).await.unwrap_or_else(|err| {
            warn!("is_reply_to_bot lookup failed, assuming false: {err}");
            false
        });
        if let Some((gate, reason)) =
            run_gates(&message, &gating_config, self.rate_limit_store.as_ref(), is_reply_to_bot).await
        {
            return self.finish(telemetry, PipelineResult::gated(gate, reason));
        }

        // Step 4: classify.
        let classify_config = self
            .database
            .classify_config(context.agent_id.as_deref())
            .await
            .unwrap_or_default();
        let agent_name = self
            .database
            .agent_name(context.agent_id.as_deref())
            .await
            .unwrap_or_default();

        let fingerprint = ClassificationCache::fingerprint(&message.platform.0, &message.content);
        let classification = match self.classification_cache.get(&fingerprint).await {
            Some(cached) => cached,
            None => {
                let computed = Classifier::classify(&message, &classify_config, &agent_name);
                self.classification_cache.put(fingerprint, computed.clone()).await;
                computed
            }
        };
        telemetry.record_classification(&classification);

        match classification.intent {
            Intent::Skip => return self.finish(telemetry, PipelineResult::no_action("skipped:classification")),
            Intent::Passive => {
                self.spawn_ingestion(message, context);
                return self.finish(telemetry, PipelineResult::new(ResultType::PassiveIngested));
            }
            Intent::Active => {}
        }

        // Step 5: media enrichment (ACTIVE only).
        let settings = self
            .database
            .user_tool_settings(&context.user_id)
            .await
            .unwrap_or_default();
        let mut message = message;
        let pending_response = self.enrich(&mut message, &settings).await;

        // Step 6: flow triggers, evaluated on the enriched message before
        // any pending analysis response is emitted.
        match self.database.flow_triggers(&context).await {
            Ok(triggers) => {
                if let Some(trigger) = first_match(&triggers, &message) {
                    let input = FlowInput::new(trigger.flow_id.clone(), message.clone(), serde_json::Value::Null);
                    return match self.flow_engine.execute(input).await {
                        Ok(response) => self.finish(
                            telemetry,
                            PipelineResult::new(ResultType::FlowExecuted).with_response(response),
                        ),
                        Err(err) => {
                            warn!("flow engine failed: {err}");
                            self.finish(telemetry, PipelineResult::error(err.to_string()))
                        }
                    };
                }
            }
            Err(err) => warn!("flow trigger lookup failed, skipping flow check: {err}"),
        }

        // Step 7: pending analysis emit.
        if let Some(response) = pending_response {
            return self.finish(
                telemetry,
                PipelineResult::new(ResultType::AiResponse).with_response(response),
            );
        }

        // Step 8: built-in commands.
        if let Some(result) = builtins::handle(
            &message.content,
            &context,
            self.database.as_ref(),
            self.provider_router.health(),
        )
        .await
        {
            return self.finish(telemetry, result);
        }

        // Step 9: intent router.
        let session_id = context.conversation_id.clone().unwrap_or_else(|| message.from.clone());
        let now_ms = message.timestamp;
        let router_result = self
            .intent_router
            .route(&message.content, context.clone(), &session_id, &settings, now_ms)
            .await;
        if router_result.result_type != ResultType::NoAction {
            return self.finish(telemetry, router_result);
        }

        // Step 10: swarm check.
        match self.database.swarm_agents(&context.user_id).await {
            Ok(agents) => {
                if let Some(agent) = swarm::match_agent(&agents, &message.content) {
                    info!("swarm delegated to {}", agent.agent_id);
                    return self.finish(
                        telemetry,
                        PipelineResult::new(ResultType::SwarmDelegated)
                            .with_metadata(serde_json::json!({ "agentId": agent.agent_id })),
                    );
                }
            }
            Err(err) => warn!("swarm agent lookup failed, skipping swarm check: {err}"),
        }

        // Step 11: direct AI fallback.
        let call_request = CallRequest {
            messages: vec![ChatMessage::user(message.content.clone())],
            user_id: Some(context.user_id.clone()),
            ..Default::default()
        };
        match self.provider_router.process(call_request, CallOptions::default()).await {
            Ok(result) => {
                telemetry.record_task_tier(&format!("{:?}", result.classification.tier), result.classification.confidence);
                telemetry.record_provider_call(&[result.provider.clone()], Some(&result.provider), result.usage);
                if result.content.to_lowercase().contains(SILENT_SENTINEL) {
                    self.finish(telemetry, PipelineResult::silent())
                } else {
                    self.finish(
                        telemetry,
                        PipelineResult::new(ResultType::AiResponse).with_response(result.content),
                    )
                }
            }
            Err(err) => {
                warn!("direct AI fallback exhausted all providers: {err}");
                self.finish(telemetry, PipelineResult::error(err.to_string()))
            }
        }
    }

    /// Fire-and-forget ingestion handoff for a PASSIVE message (spec §4.1
    /// step 4). Errors are captured via logging only; the pipeline never
    /// awaits this task.
    fn spawn_ingestion(&self, message: UnifiedMessage, context: RequestContext) {
        let ingestor = Arc::clone(&self.ingestor);
        tokio::spawn(async move {
            if let Err(err) = ingestor.ingest(message, context).await {
                warn!("passive ingestion failed: {err}");
            }
        });
    }

    /// Ordered image-OCR/vision, document-extract, voice-transcribe
    /// enrichment (spec §4.1 step 5 / §4.6). Returns the pending response
    /// text for the first enricher that fired, held until flows have been
    /// consulted.
    async fn enrich(&self, message: &mut UnifiedMessage, settings: &orchestrator_router::UserToolSettings) -> Option<String> {
        if settings.ocr_enabled {
            if let Some(backend) = &self.ocr_backend {
                match enrich_with_ocr(message, backend.as_ref(), &self.provider_router).await {
                    Ok(true) => return Some(message.content.clone()),
                    Ok(false) => {}
                    Err(err) => warn!("ocr enrichment failed, proceeding unenriched: {err}"),
                }
            }
        }
        if settings.vision_enabled && !self.vision_backends.is_empty() {
            let backends: Vec<&dyn VisionBackend> = self.vision_backends.iter().map(|b| b.as_ref()).collect();
            match enrich_with_vision_description(message, &backends).await {
                Ok(true) => return Some(message.content.clone()),
                Ok(false) => {}
                Err(err) => warn!("vision enrichment failed, proceeding unenriched: {err}"),
            }
        }
        if settings.document_extract_enabled {
            match enrich_with_document_extract(message).await {
                Ok(true) => return Some(message.content.clone()),
                Ok(false) => {}
                Err(err) => warn!("document extract failed, proceeding unenriched: {err}"),
            }
        }
        if settings.voice_transcription_enabled && !self.voice_backends.is_empty() {
            let backends: Vec<&dyn SpeechToTextBackend> = self.voice_backends.iter().map(|b| b.as_ref()).collect();
            match enrich_with_voice_transcription(message, &backends, settings.voice_language.as_deref()).await {
                Ok(true) => return Some(message.content.clone()),
                Ok(false) => {}
                Err(err) => warn!("voice transcription failed, proceeding unenriched: {err}"),
            }
        }
        None
    }

    fn finish(&self, telemetry: TelemetryBuilder, result: PipelineResult) -> PipelineResult {
        telemetry.finish(result.result_type);
        result
    }
}
