//! Handling of one `ask`: topic, place, model call, then images and weather.

use std::sync::Arc;

use tokio::sync::mpsc::UnboundedSender;
use tokio_util::sync::CancellationToken;
use tourguide_ai::{GenerationResult, SharedState, TurnOutcome};
use tourguide_common::new_correlation_id;
use tourguide_knowledge::{resolve_intent, Intent};
use tourguide_weather::WeatherReport;
use tracing::{debug, info};

use crate::app::App;
use crate::protocol::ServerMessage;
use crate::render;

pub async fn handle_ask(
    app: Arc<App>,
    session: SharedState,
    text: String,
    tx: UnboundedSender<ServerMessage>,
    cancel: CancellationToken,
) {
    let question = text.trim();
    if question.is_empty() {
        let _ = tx.send(ServerMessage::Error {
            message: "Câu hỏi trống.".into(),
        });
        return;
    }

    let turn_id = new_correlation_id();
    let last = session.lock().await.last_topic().and_then(Intent::from_topic);
    let intent = resolve_intent(question, last);
    let place = app.knowledge.lookup_place(question);

    if app.config.logging.log_content {
        debug!(turn = %turn_id, question, "Question received");
    }
    info!(turn = %turn_id, intent = %intent, place = ?place, "Turn started");

    let request = app.request_for(question, intent, place.as_deref());
    let outcome = app
        .runner
        .run(&session, &request, &cancel, |partial| {
            let _ = tx.send(ServerMessage::Partial {
                turn_id: turn_id.clone(),
                text: partial.to_string(),
            });
        })
        .await;

    let result = match outcome {
        TurnOutcome::Rejected { retry_after_secs } => {
            let _ = tx.send(ServerMessage::RateLimited {
                turn_id,
                message: render::rate_limited_text(retry_after_secs),
                retry_after_secs,
            });
            return;
        }
        TurnOutcome::Completed(result) => result,
    };
    // Only admitted turns move the topic.
    session.lock().await.set_last_topic(intent.as_str());

    info!(turn = %turn_id, status = result.status(), "Turn finished");
    let _ = tx.send(ServerMessage::Answer {
        turn_id: turn_id.clone(),
        status: result.status().to_string(),
        text: render::answer_text(&result),
    });

    if matches!(result, GenerationResult::TransportError { .. }) || cancel.is_cancelled() {
        return;
    }

    if let Some(place) = place {
        let urls: Vec<String> = app
            .knowledge
            .images_for(&place)
            .iter()
            .take(app.config.data.max_images as usize)
            .cloned()
            .collect();
        if !urls.is_empty() {
            let _ = tx.send(ServerMessage::Images {
                turn_id: turn_id.clone(),
                place,
                urls,
            });
        }
    }

    if let Some(weather) = &app.weather {
        let cfg = &app.config.weather;
        let message = match weather.get_weather(cfg.latitude, cfg.longitude).await {
            WeatherReport::Known(forecast) => ServerMessage::Weather {
                turn_id,
                location: cfg.location_name.clone(),
                temperature_c: Some(forecast.temperature_c),
                precipitation_probability: forecast.precipitation_now(),
            },
            WeatherReport::Unknown => ServerMessage::Warning {
                message: render::WEATHER_UNAVAILABLE.into(),
            },
        };
        let _ = tx.send(message);
    }
}
