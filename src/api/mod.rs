use axum::{
    Router,
    extract::{
        Json, Query,
        rejection::{JsonRejection, QueryRejection},
    },
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use clap::{Args, ValueEnum};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fs;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::net::TcpListener;

use crate::core::{
    AnalysisError, AnalysisReport, AnalysisRequest, ConfigSnapshot, Currency, PortfolioComponent,
    RetirementAsset, parse_currency, portfolios_for, retirement_assets_for, run_analysis,
    templates,
};

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
pub enum CliCurrency {
    Gbp,
    Usd,
    Eur,
}

impl From<CliCurrency> for Currency {
    fn from(value: CliCurrency) -> Self {
        match value {
            CliCurrency::Gbp => Currency::Gbp,
            CliCurrency::Usd => Currency::Usd,
            CliCurrency::Eur => Currency::Eur,
        }
    }
}

/// Request body for `/api/analyze` and the file read by `analyze --config`.
///
/// Every field is optional and layered over the defaults. Explicit component lists win over
/// templates.
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AnalyzePayload {
    years_to_retirement: Option<u32>,
    retirement_length: Option<u32>,
    currency: Option<String>,
    withdrawal_rates: Option<Vec<f64>>,
    template: Option<String>,
    retirement_template: Option<String>,
    portfolios: Option<Vec<PortfolioComponent>>,
    retirement_portfolios: Option<Vec<RetirementAsset>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ExportPayload {
    template: Option<String>,
    portfolios: Option<Vec<PortfolioComponent>>,
}

#[derive(Args, Debug, Clone, Default)]
pub struct AnalyzeArgs {
    #[arg(
        long,
        value_name = "FILE",
        help = "JSON request with the same fields as the /api/analyze body"
    )]
    pub config: Option<PathBuf>,
    #[arg(long, help = "Years of contributions before retirement [default: 15]")]
    pub years_to_retirement: Option<u32>,
    #[arg(long, help = "Years the retirement portfolio must last [default: 30]")]
    pub retirement_length: Option<u32>,
    #[arg(long, value_enum, help = "Display currency [default: gbp]")]
    pub currency: Option<CliCurrency>,
    #[arg(
        long = "withdrawal-rate",
        value_name = "PERCENT",
        help = "Annual withdrawal rate in percent, repeatable [default: 3 4 5]"
    )]
    pub withdrawal_rates: Vec<f64>,
    #[arg(long, help = "Accumulation template: conservative, balanced or aggressive")]
    pub template: Option<String>,
    #[arg(long, help = "Retirement template: conservative, moderate or balanced")]
    pub retirement_template: Option<String>,
}

#[derive(Args, Debug, Clone, Default)]
pub struct ExportArgs {
    #[arg(long, value_name = "FILE", help = "JSON request whose portfolios are exported")]
    pub config: Option<PathBuf>,
    #[arg(long, help = "Accumulation template to export instead of the defaults")]
    pub template: Option<String>,
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    BadRequest(String),

    #[error(transparent)]
    Analysis(#[from] AnalysisError),

    #[error("failed to read {}: {source}", .path.display())]
    ConfigFile {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid JSON in {}: {source}", .path.display())]
    ConfigJson {
        path: PathBuf,
        source: serde_json::Error,
    },
}

impl AppError {
    fn status(&self) -> StatusCode {
        match self {
            AppError::Analysis(AnalysisError::Serialization(_)) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            _ => StatusCode::BAD_REQUEST,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        error_response(self.status(), &self.to_string())
    }
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

/// Fully-defaulted request fields before they are checked and resolved.
#[derive(Debug, Clone)]
struct RequestDraft {
    years_to_retirement: u32,
    retirement_length: u32,
    currency: String,
    withdrawal_rates_percent: Vec<f64>,
    template: Option<String>,
    retirement_template: Option<String>,
    portfolios: Option<Vec<PortfolioComponent>>,
    retirement_portfolios: Option<Vec<RetirementAsset>>,
}

fn default_draft() -> RequestDraft {
    RequestDraft {
        years_to_retirement: 15,
        retirement_length: 30,
        currency: Currency::Gbp.code().to_string(),
        withdrawal_rates_percent: vec![3.0, 4.0, 5.0],
        template: None,
        retirement_template: None,
        portfolios: None,
        retirement_portfolios: None,
    }
}

fn apply_payload(draft: &mut RequestDraft, payload: AnalyzePayload) {
    if let Some(v) = payload.years_to_retirement {
        draft.years_to_retirement = v;
    }
    if let Some(v) = payload.retirement_length {
        draft.retirement_length = v;
    }
    if let Some(v) = payload.currency {
        draft.currency = v;
    }
    if let Some(v) = payload.withdrawal_rates {
        draft.withdrawal_rates_percent = v;
    }
    if let Some(v) = payload.template {
        draft.template = Some(v);
    }
    if let Some(v) = payload.retirement_template {
        draft.retirement_template = Some(v);
    }
    if let Some(v) = payload.portfolios {
        draft.portfolios = Some(v);
    }
    if let Some(v) = payload.retirement_portfolios {
        draft.retirement_portfolios = Some(v);
    }
}

impl From<AnalyzeArgs> for AnalyzePayload {
    fn from(args: AnalyzeArgs) -> Self {
        AnalyzePayload {
            years_to_retirement: args.years_to_retirement,
            retirement_length: args.retirement_length,
            currency: args.currency.map(|c| Currency::from(c).code().to_string()),
            withdrawal_rates: (!args.withdrawal_rates.is_empty()).then_some(args.withdrawal_rates),
            template: args.template,
            retirement_template: args.retirement_template,
            portfolios: None,
            retirement_portfolios: None,
        }
    }
}

/// Longest horizon either phase accepts from a request.
const MAX_HORIZON_YEARS: u32 = 100;

fn build_request(draft: RequestDraft) -> Result<AnalysisRequest, String> {
    if draft.years_to_retirement > MAX_HORIZON_YEARS {
        return Err(format!(
            "--years-to-retirement must be between 0 and {MAX_HORIZON_YEARS}"
        ));
    }

    if draft.retirement_length > MAX_HORIZON_YEARS {
        return Err(format!(
            "--retirement-length must be between 0 and {MAX_HORIZON_YEARS}"
        ));
    }

    for rate in &draft.withdrawal_rates_percent {
        if !rate.is_finite() || !(0.0..=100.0).contains(rate) {
            return Err("--withdrawal-rate must be between 0 and 100".to_string());
        }
    }

    let currency = parse_currency(&draft.currency).map_err(|e| e.to_string())?;

    let portfolios = match draft.portfolios {
        Some(list) => list,
        None => portfolios_for(draft.template.as_deref()).map_err(|e| e.to_string())?,
    };
    let retirement_assets = match draft.retirement_portfolios {
        Some(list) => list,
        None => retirement_assets_for(draft.retirement_template.as_deref())
            .map_err(|e| e.to_string())?,
    };

    Ok(AnalysisRequest {
        years_to_retirement: draft.years_to_retirement,
        retirement_years: draft.retirement_length,
        currency,
        withdrawal_rates: draft
            .withdrawal_rates_percent
            .iter()
            .map(|rate| rate / 100.0)
            .collect(),
        portfolios,
        retirement_assets,
    })
}

fn request_from_payload(payload: AnalyzePayload) -> Result<AnalysisRequest, String> {
    let mut draft = default_draft();
    apply_payload(&mut draft, payload);
    build_request(draft)
}

fn read_payload<T: DeserializeOwned>(path: &Path) -> Result<T, AppError> {
    let raw = fs::read_to_string(path).map_err(|source| AppError::ConfigFile {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&raw).map_err(|source| AppError::ConfigJson {
        path: path.to_path_buf(),
        source,
    })
}

/// Config file first, then command line flags on top.
pub fn analyze_from_args(args: AnalyzeArgs) -> Result<AnalysisReport, AppError> {
    let mut draft = default_draft();
    if let Some(path) = &args.config {
        apply_payload(&mut draft, read_payload::<AnalyzePayload>(path)?);
    }
    apply_payload(&mut draft, args.into());
    let request = build_request(draft).map_err(AppError::BadRequest)?;
    Ok(run_analysis(&request)?)
}

pub fn export_from_args(args: ExportArgs) -> Result<ConfigSnapshot, AppError> {
    let mut payload = match &args.config {
        Some(path) => read_payload::<ExportPayload>(path)?,
        None => ExportPayload::default(),
    };
    if args.template.is_some() {
        payload.template = args.template;
        payload.portfolios = None;
    }
    snapshot_from_payload(payload)
}

fn analyze(payload: AnalyzePayload) -> Result<AnalysisReport, AppError> {
    let request = request_from_payload(payload).map_err(AppError::BadRequest)?;
    Ok(run_analysis(&request)?)
}

fn snapshot_from_payload(payload: ExportPayload) -> Result<ConfigSnapshot, AppError> {
    let portfolios = match payload.portfolios {
        Some(list) => list,
        None => portfolios_for(payload.template.as_deref())?,
    };
    Ok(ConfigSnapshot::capture(&portfolios))
}

pub fn router() -> Router {
    Router::new()
        .route(
            "/api/analyze",
            get(analyze_get_handler).post(analyze_post_handler),
        )
        .route("/api/templates", get(templates_handler))
        .route("/api/export", post(export_handler))
        .fallback(not_found_handler)
}

pub async fn run_http_server(port: u16) -> std::io::Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = TcpListener::bind(addr).await?;
    tracing::info!(%addr, "retirement projection API listening");
    tracing::info!("local access: http://127.0.0.1:{port}/api/analyze");

    axum::serve(listener, router()).await
}

async fn not_found_handler() -> Response {
    error_response(StatusCode::NOT_FOUND, "Not found")
}

async fn analyze_get_handler(query: Result<Query<AnalyzePayload>, QueryRejection>) -> Response {
    match query {
        Ok(Query(payload)) => analyze_handler_impl(payload),
        Err(rejection) => rejected_request(&rejection.body_text()),
    }
}

async fn analyze_post_handler(body: Result<Json<AnalyzePayload>, JsonRejection>) -> Response {
    match body {
        Ok(Json(payload)) => analyze_handler_impl(payload),
        Err(rejection) => rejected_request(&rejection.body_text()),
    }
}

fn rejected_request(msg: &str) -> Response {
    tracing::warn!(error = %msg, "malformed request");
    error_response(StatusCode::BAD_REQUEST, msg)
}

fn analyze_handler_impl(payload: AnalyzePayload) -> Response {
    match analyze(payload) {
        Ok(report) => {
            tracing::info!(
                final_value = report.final_value,
                scenarios = report.scenarios.len(),
                "analysis completed"
            );
            json_response(StatusCode::OK, report)
        }
        Err(err) => {
            tracing::warn!(error = %err, "analysis rejected");
            err.into_response()
        }
    }
}

async fn templates_handler() -> Response {
    json_response(StatusCode::OK, templates::catalog())
}

async fn export_handler(body: Result<Json<ExportPayload>, JsonRejection>) -> Response {
    let payload = match body {
        Ok(Json(payload)) => payload,
        Err(rejection) => return rejected_request(&rejection.body_text()),
    };

    match snapshot_from_payload(payload) {
        Ok(snapshot) => {
            tracing::info!(
                components = snapshot.portfolios.len(),
                "configuration exported"
            );
            json_response(StatusCode::OK, snapshot)
        }
        Err(err) => {
            tracing::warn!(error = %err, "export rejected");
            err.into_response()
        }
    }
}

fn json_response<T: Serialize>(status: StatusCode, body: T) -> Response {
    let mut response = (status, Json(body)).into_response();
    response.headers_mut().insert(
        header::CACHE_CONTROL,
        header::HeaderValue::from_static("no-store"),
    );
    response
}

fn error_response(status: StatusCode, msg: &str) -> Response {
    json_response(
        status,
        ErrorResponse {
            error: msg.to_string(),
        },
    )
}
