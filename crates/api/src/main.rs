use anyhow::Context;
use axum::{
    extract::rejection::FormRejection,
    extract::{Form, State},
    response::Html,
    routing::{get, post},
    Router,
};
use std::fs::OpenOptions;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use uuid::Uuid;

use storecast_core::domain::contract::PredictionRequest;
use storecast_core::model::Forecaster;

mod view;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let settings = storecast_core::config::Settings::from_env()?;
    let _sentry_guard = init_sentry(&settings);

    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&settings.log_file)
        .with_context(|| format!("failed to open log file at {}", settings.log_file.display()))?;

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(Arc::new(log_file)),
        )
        .with(sentry_tracing::layer())
        .init();

    tracing::info!("application started");

    let forecaster: Option<Arc<dyn Forecaster>> =
        match storecast_core::model::loader::load_pipeline(&settings.model_path) {
            Ok(pipeline) => {
                tracing::info!(
                    model_name = pipeline.model_name(),
                    model_version = pipeline.model_version(),
                    path = %settings.model_path.display(),
                    "model pipeline loaded"
                );
                let pipeline: Arc<dyn Forecaster> = Arc::new(pipeline);
                Some(pipeline)
            }
            Err(e) => {
                sentry_anyhow::capture_anyhow(&e);
                tracing::error!(
                    error = %e,
                    path = %settings.model_path.display(),
                    "failed to load model; starting with predictions disabled"
                );
                None
            }
        };

    let state = AppState { forecaster };

    let app = Router::new()
        .route("/healthz", get(healthz))
        .route("/", get(index))
        .route("/predict", post(predict))
        .with_state(state)
        .layer(TraceLayer::new_for_http());

    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(3000);
    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], port));

    tracing::info!(%addr, "api listening");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn healthz() -> &'static str {
    "ok"
}

#[derive(Clone)]
struct AppState {
    forecaster: Option<Arc<dyn Forecaster>>,
}

impl AppState {
    fn model(&self) -> Option<(&str, &str)> {
        self.forecaster
            .as_deref()
            .map(|f| (f.model_name(), f.model_version()))
    }
}

async fn index(State(state): State<AppState>) -> Html<String> {
    let banner = if state.forecaster.is_some() {
        view::Banner::None
    } else {
        view::Banner::ModelUnavailable
    };

    Html(view::page(&view::FormValues::default(), banner, state.model()))
}

async fn predict(
    State(state): State<AppState>,
    payload: Result<Form<PredictionRequest>, FormRejection>,
) -> Html<String> {
    let request_id = Uuid::new_v4();

    let Some(forecaster) = state.forecaster.as_deref() else {
        tracing::error!(%request_id, "prediction requested while model is unavailable");
        return Html(view::page(
            &view::FormValues::default(),
            view::Banner::ModelUnavailable,
            None,
        ));
    };
    let model = Some((forecaster.model_name(), forecaster.model_version()));

    let Form(payload) = match payload {
        Ok(form) => form,
        Err(rejection) => {
            tracing::error!(%request_id, error = %rejection, "prediction form body was malformed");
            return Html(view::page(
                &view::FormValues::default(),
                view::Banner::PredictionFailed,
                model,
            ));
        }
    };

    let values = view::FormValues::from_request(&payload);

    let record = match payload.validate_and_into_record() {
        Ok(record) => record,
        Err(e) => {
            sentry_anyhow::capture_anyhow(&e);
            tracing::error!(%request_id, error = %e, "prediction input rejected");
            return Html(view::page(&values, view::Banner::PredictionFailed, model));
        }
    };

    tracing::info!(%request_id, record = ?record, "prediction input received");

    match forecaster.predict(&record) {
        Ok(forecast) => {
            // Match the display convention of the historical app: whole units,
            // truncated toward zero.
            let predicted_sales = forecast.trunc() as i64;
            tracing::info!(%request_id, predicted_sales, "prediction generated");
            Html(view::page(
                &values,
                view::Banner::Prediction(predicted_sales),
                model,
            ))
        }
        Err(e) => {
            sentry_anyhow::capture_anyhow(&e);
            tracing::error!(%request_id, error = %e, "prediction failed");
            Html(view::page(&values, view::Banner::PredictionFailed, model))
        }
    }
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
}

fn init_sentry(settings: &storecast_core::config::Settings) -> Option<sentry::ClientInitGuard> {
    let dsn = settings.sentry_dsn.as_deref()?;
    Some(sentry::init((
        dsn,
        sentry::ClientOptions {
            release: sentry::release_name!(),
            ..Default::default()
        },
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use storecast_core::domain::record::StoreRecord;
    use storecast_core::model::artifact::PipelineArtifact;

    struct FailingModel;

    impl Forecaster for FailingModel {
        fn model_name(&self) -> &str {
            "failing"
        }

        fn model_version(&self) -> &str {
            "0"
        }

        fn predict(&self, _record: &StoreRecord) -> anyhow::Result<f64> {
            anyhow::bail!("synthetic inference failure")
        }
    }

    fn artifact_state() -> AppState {
        let artifact: PipelineArtifact = serde_json::from_value(serde_json::json!({
            "format_version": 1,
            "model_name": "sales_pipeline",
            "model_version": "test",
            "trained_at": "2026-07-28T04:12:09Z",
            "intercept": 100.0,
            "categorical": {
                "storetype": {"a": 10.0, "b": 20.0, "c": 30.0, "d": 40.0},
                "assortment": {"a": 1.0, "b": 2.0, "c": 3.0},
                "stateholiday": {"0": 0.0, "a": -100.0, "b": -200.0, "c": -300.0},
                "promo": {"0": -50.0, "1": 50.0}
            },
            "numeric": {
                "customers": {"mean": 0.0, "std": 1.0, "weight": 2.0},
                "competitiondistance": {"mean": 0.0, "std": 1.0, "weight": -0.5}
            }
        }))
        .unwrap();

        let pipeline: Arc<dyn Forecaster> =
            Arc::new(artifact.validate_and_into_pipeline().unwrap());
        AppState {
            forecaster: Some(pipeline),
        }
    }

    fn request() -> PredictionRequest {
        serde_json::from_value(serde_json::json!({
            "storetype": "b",
            "assortment": "a",
            "stateholiday": "0",
            "customers": "650",
            "competitiondistance": "450",
            "promo": "1",
        }))
        .unwrap()
    }

    #[tokio::test]
    async fn degraded_state_disables_predictions() {
        let state = AppState { forecaster: None };

        let Html(page) = index(State(state.clone())).await;
        assert!(page.contains("Model could not be loaded"));
        assert!(page.contains("disabled"));

        let Html(page) = predict(State(state), Ok(Form(request()))).await;
        assert!(page.contains("Model could not be loaded"));
    }

    #[tokio::test]
    async fn prediction_matches_calling_the_pipeline_directly() {
        let state = artifact_state();
        let expected = state
            .forecaster
            .as_deref()
            .unwrap()
            .predict(&request().validate_and_into_record().unwrap())
            .unwrap();

        let Html(page) = predict(State(state), Ok(Form(request()))).await;
        assert!(page.contains(&view::format_sales(expected.trunc() as i64)));
        assert!(page.contains("Predicted store sales"));
    }

    #[tokio::test]
    async fn invalid_input_surfaces_the_generic_failure_message() {
        let mut payload = request();
        payload.promo = "7".to_string();

        let Html(page) = predict(State(artifact_state()), Ok(Form(payload))).await;
        assert!(page.contains("Prediction failed. Please check input values."));
    }

    #[tokio::test]
    async fn inference_failure_surfaces_the_generic_failure_message() {
        let state = AppState {
            forecaster: Some(Arc::new(FailingModel)),
        };

        let Html(page) = predict(State(state), Ok(Form(request()))).await;
        assert!(page.contains("Prediction failed. Please check input values."));
        assert!(!page.contains("synthetic inference failure"));
    }

    #[tokio::test]
    async fn submitted_values_are_preserved_in_the_form() {
        let Html(page) = predict(State(artifact_state()), Ok(Form(request()))).await;
        assert!(page.contains(r#"value="650""#));
        assert!(page.contains(r#"value="450""#));
    }
}
