//! Shared server state: configuration, turn runner, sessions, collaborators.

use std::sync::Arc;
use std::time::Duration;

use tourguide_ai::{
    Dispatcher, GenerationClient, GenerationRequest, PromptTemplate, RateLimiter, SessionStore,
    SharedState, TurnRunner,
};
use tourguide_common::SessionId;
use tourguide_config::{DataConfig, TourGuideConfig};
use tourguide_knowledge::{ImageIndex, Intent, TourismData};
use tourguide_weather::WeatherClient;
use tracing::{info, warn};

use crate::render::context_block;

/// Tourism text and image index. Either may be missing; the matching
/// feature is then off and a warning is shown to every visitor.
#[derive(Debug, Default)]
pub struct Knowledge {
    pub tourism: Option<TourismData>,
    pub images: Option<ImageIndex>,
}

impl Knowledge {
    /// Load both files, returning a visitor-facing warning per missing one.
    pub fn load(data: &DataConfig) -> (Self, Vec<String>) {
        let mut warnings = Vec::new();

        let tourism = match TourismData::load(&data.tourism_path()) {
            Ok(t) => Some(t),
            Err(e) => {
                warn!(error = %e, "Tourism data disabled");
                warnings.push(format!("⚠️ Không có dữ liệu du lịch: {e}"));
                None
            }
        };
        let images = match ImageIndex::load(&data.images_path()) {
            Ok(i) => Some(i),
            Err(e) => {
                warn!(error = %e, "Image index disabled");
                warnings.push(format!("⚠️ Không có dữ liệu hình ảnh: {e}"));
                None
            }
        };

        (Self { tourism, images }, warnings)
    }

    /// The place mentioned in `text`, by tourism data first, then by image index.
    pub fn lookup_place(&self, text: &str) -> Option<String> {
        self.tourism
            .as_ref()
            .and_then(|t| t.lookup_place(text))
            .map(|p| p.name.clone())
            .or_else(|| {
                self.images
                    .as_ref()
                    .and_then(|i| i.lookup_place(text))
                    .map(str::to_owned)
            })
    }

    pub fn description(&self, place: &str) -> Option<&str> {
        self.tourism
            .as_ref()
            .and_then(|t| t.description(place))
            .filter(|d| !d.is_empty())
    }

    pub fn images_for(&self, place: &str) -> &[String] {
        self.images
            .as_ref()
            .map(|i| i.images_for(place))
            .unwrap_or(&[])
    }
}

pub struct App {
    pub config: TourGuideConfig,
    pub template: PromptTemplate,
    pub runner: TurnRunner,
    pub sessions: SessionStore,
    pub knowledge: Knowledge,
    pub weather: Option<WeatherClient>,
    /// Shown to each visitor after `session_ready`.
    pub warnings: Vec<String>,
}

impl App {
    pub fn new(config: TourGuideConfig, client: Arc<dyn GenerationClient>) -> Self {
        let template = PromptTemplate {
            question_label: config.prompt.question_label.clone(),
            instruction: config.prompt.instruction.clone(),
            context_token_budget: config.prompt.context_token_budget.map(|b| b as usize),
        };

        let dispatcher = Dispatcher::new(client)
            .with_call_timeout(Duration::from_secs(config.provider.timeout_secs.into()))
            .with_artifacts(config.prompt.strip_artifacts.clone());
        let limiter = RateLimiter::new(config.rate_limit.max_requests_per_window as usize)
            .with_window(Duration::from_secs(config.rate_limit.window_secs.into()));
        let runner = TurnRunner::new(dispatcher, limiter);

        let (knowledge, mut warnings) = Knowledge::load(&config.data);
        let weather = if config.weather.enabled {
            match WeatherClient::new() {
                Ok(client) => Some(
                    client
                        .with_base_url(config.weather.base_url.clone())
                        .with_timeout(Duration::from_secs(config.weather.timeout_secs.into()))
                        .with_ttl(Duration::from_secs(config.weather.cache_ttl_secs.into())),
                ),
                Err(e) => {
                    warn!(error = %e, "Weather panel disabled");
                    warnings.push(crate::render::WEATHER_UNAVAILABLE.to_string());
                    None
                }
            }
        } else {
            None
        };

        info!(
            model = %config.provider.model,
            ceiling = config.rate_limit.max_requests_per_window,
            window_secs = config.rate_limit.window_secs,
            weather = weather.is_some(),
            "Tour guide ready"
        );

        Self {
            config,
            template,
            runner,
            sessions: SessionStore::new(),
            knowledge,
            weather,
            warnings,
        }
    }

    /// Clear history, topic and rate-limit log of a connected session. The
    /// session is re-registered first if the reaper dropped it meanwhile.
    pub async fn reset_session(&self, id: &SessionId, state: &SharedState) {
        self.sessions.keep_alive(id, state).await;
        state.lock().await.reset();
        info!(session = %id, "Session reset");
    }

    /// Build the model request for one question.
    pub fn request_for(&self, question: &str, intent: Intent, place: Option<&str>) -> GenerationRequest {
        let reference = place.and_then(|p| self.knowledge.description(p).map(|d| (p, d)));
        GenerationRequest::new(
            &self.template,
            &self.config.prompt.system_prompt,
            Some(context_block(intent, reference)),
            question,
            &self.config.provider.model,
            self.config.provider.max_output_tokens,
        )
    }
}
