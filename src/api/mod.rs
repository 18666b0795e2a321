use axum::{
    Router,
    extract::{
        Json, Query,
        rejection::{JsonRejection, QueryRejection},
    },
    http::{StatusCode, header},
    response::{Html, IntoResponse, Response},
    routing::get,
};
use clap::{Args, ValueEnum};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::core::{FinancialInputs, ProjectionResult, ProjectionSummary, run_projection};

const INDEX_HTML: &str = include_str!("../../web/index.html");
const STYLES_CSS: &str = include_str!("../../web/styles.css");
const APP_JS: &str = include_str!("../../web/app.js");

const CHART_X_LABEL: &str = "Age";
const CHART_Y_LABEL: &str = "Portfolio Value ($)";

const MAX_AGE: i32 = 150;

#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}

#[derive(Args, Debug, Clone, PartialEq)]
pub struct ServeArgs {
    #[arg(long, env = "FIRE_HOST", default_value = "0.0.0.0")]
    pub host: String,
    #[arg(long, env = "FIRE_PORT", default_value_t = 8080)]
    pub port: u16,
}

#[derive(Args, Debug, Clone, PartialEq)]
pub struct ProjectionArgs {
    #[arg(long, allow_negative_numbers = true, help = "Starting balance")]
    pub initial_capital: f64,
    #[arg(
        long,
        allow_negative_numbers = true,
        help = "Fixed contribution made every month of the accumulation phase"
    )]
    pub monthly_contribution: f64,
    #[arg(
        long,
        allow_negative_numbers = true,
        help = "Expected annual growth rate in percent, e.g. 7"
    )]
    pub annual_growth_rate: f64,
    #[arg(long, help = "Years of contributions, counted from the first simulated month")]
    pub contribution_years: i32,
    #[arg(long, allow_negative_numbers = true)]
    pub current_age: i32,
    #[arg(long, help = "Age at which monthly withdrawals begin")]
    pub draw_down_age: i32,
    #[arg(long, default_value_t = 0.0)]
    pub monthly_draw_amount: f64,
    #[arg(long, help = "Last simulated age")]
    pub expected_death_age: i32,
    #[arg(long, default_value_t = 0.0, help = "Pension or social security income per month")]
    pub monthly_pension: f64,
    #[arg(long)]
    pub expected_pension_age: i32,
}

#[derive(Args, Debug, Clone, PartialEq)]
pub struct ProjectCommand {
    #[command(flatten)]
    pub params: ProjectionArgs,
    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,
    #[arg(long, help = "Print every month instead of one row per year")]
    pub monthly: bool,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct ProjectionPayload {
    initial_capital: Option<f64>,
    monthly_contribution: Option<f64>,
    annual_growth_rate: Option<f64>,
    contribution_years: Option<i32>,
    current_age: Option<i32>,
    draw_down_age: Option<i32>,
    monthly_draw_amount: Option<f64>,
    expected_death_age: Option<i32>,
    monthly_pension: Option<f64>,
    expected_pension_age: Option<i32>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ProjectionResponse<'a> {
    months: &'a [usize],
    years: &'a [f64],
    ages: Vec<f64>,
    principal: &'a [f64],
    contributions: &'a [f64],
    take_home: &'a [f64],
    title: String,
    x_label: &'static str,
    y_label: &'static str,
    summary: ProjectionSummary,
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

fn build_inputs(args: ProjectionArgs) -> Result<FinancialInputs, String> {
    for (name, value) in [
        ("--initial-capital", args.initial_capital),
        ("--monthly-contribution", args.monthly_contribution),
        ("--annual-growth-rate", args.annual_growth_rate),
        ("--monthly-draw-amount", args.monthly_draw_amount),
        ("--monthly-pension", args.monthly_pension),
    ] {
        if !value.is_finite() {
            return Err(format!("{name} must be a finite number"));
        }
    }

    // The monthly growth factor must stay positive.
    if args.annual_growth_rate <= -1200.0 {
        return Err("--annual-growth-rate must be > -1200".to_string());
    }

    if args.expected_death_age > MAX_AGE {
        return Err(format!("--expected-death-age must be <= {MAX_AGE}"));
    }

    if args.monthly_draw_amount < 0.0 {
        return Err("--monthly-draw-amount must be >= 0".to_string());
    }

    if args.monthly_pension < 0.0 {
        return Err("--monthly-pension must be >= 0".to_string());
    }

    Ok(FinancialInputs {
        initial_capital: args.initial_capital,
        monthly_contribution: args.monthly_contribution,
        annual_growth_rate: args.annual_growth_rate / 100.0,
        contribution_years: args.contribution_years,
        current_age: args.current_age,
        draw_down_age: args.draw_down_age,
        monthly_draw_amount: args.monthly_draw_amount,
        expected_death_age: args.expected_death_age,
        monthly_pension: args.monthly_pension,
        expected_pension_age: args.expected_pension_age,
    })
}

fn require<T>(value: Option<T>, name: &str) -> Result<T, String> {
    value.ok_or_else(|| format!("missing parameter: {name}"))
}

fn args_from_payload(payload: ProjectionPayload) -> Result<ProjectionArgs, String> {
    Ok(ProjectionArgs {
        initial_capital: require(payload.initial_capital, "initialCapital")?,
        monthly_contribution: require(payload.monthly_contribution, "monthlyContribution")?,
        annual_growth_rate: require(payload.annual_growth_rate, "annualGrowthRate")?,
        contribution_years: require(payload.contribution_years, "contributionYears")?,
        current_age: require(payload.current_age, "currentAge")?,
        draw_down_age: require(payload.draw_down_age, "drawDownAge")?,
        monthly_draw_amount: require(payload.monthly_draw_amount, "monthlyDrawAmount")?,
        expected_death_age: require(payload.expected_death_age, "expectedDeathAge")?,
        monthly_pension: require(payload.monthly_pension, "monthlyPension")?,
        expected_pension_age: require(payload.expected_pension_age, "expectedPensionAge")?,
    })
}

fn compute(args: ProjectionArgs) -> Result<(FinancialInputs, ProjectionResult), String> {
    let inputs = build_inputs(args)?;
    let result = run_projection(&inputs).map_err(|e| e.to_string())?;
    Ok((inputs, result))
}

pub fn run_project_command(command: ProjectCommand) -> Result<String, String> {
    let (inputs, result) = compute(command.params)?;
    match command.format {
        OutputFormat::Table => Ok(render_table(&inputs, &result, command.monthly)),
        OutputFormat::Json => {
            let response = build_projection_response(&inputs, &result);
            serde_json::to_string_pretty(&response)
                .map_err(|e| format!("Failed to encode projection: {e}"))
        }
    }
}

pub fn create_router() -> Router {
    Router::new()
        .route("/", get(index_handler))
        .route("/index.html", get(index_handler))
        .route("/styles.css", get(styles_handler))
        .route("/app.js", get(app_js_handler))
        .route("/health", get(health_handler))
        .route(
            "/api/projection",
            get(projection_get_handler).post(projection_post_handler),
        )
        .fallback(not_found_handler)
        .layer(TraceLayer::new_for_http())
}

pub async fn run_http_server(args: ServeArgs) -> std::io::Result<()> {
    let listener = TcpListener::bind((args.host.as_str(), args.port)).await?;
    let addr: SocketAddr = listener.local_addr()?;
    info!("FIRE projection server listening on http://{addr}");
    info!("Local access: http://127.0.0.1:{}/", addr.port());

    axum::serve(listener, create_router()).await
}

async fn index_handler() -> impl IntoResponse {
    with_cache_control(Html(INDEX_HTML))
}

async fn styles_handler() -> impl IntoResponse {
    with_cache_control((
        [(header::CONTENT_TYPE, "text/css; charset=utf-8")],
        STYLES_CSS,
    ))
}

async fn app_js_handler() -> impl IntoResponse {
    with_cache_control((
        [(
            header::CONTENT_TYPE,
            "application/javascript; charset=utf-8",
        )],
        APP_JS,
    ))
}

async fn health_handler() -> Response {
    json_response(
        StatusCode::OK,
        HealthResponse {
            status: "ok",
            version: env!("CARGO_PKG_VERSION"),
        },
    )
}

async fn not_found_handler() -> Response {
    error_response(StatusCode::NOT_FOUND, "Not found")
}

async fn projection_get_handler(
    payload: Result<Query<ProjectionPayload>, QueryRejection>,
) -> Response {
    match payload {
        Ok(Query(payload)) => projection_handler_impl(payload),
        Err(rejection) => bad_request(&format!("Invalid query parameters: {rejection}")),
    }
}

async fn projection_post_handler(
    payload: Result<Json<ProjectionPayload>, JsonRejection>,
) -> Response {
    match payload {
        Ok(Json(payload)) => projection_handler_impl(payload),
        Err(rejection) => bad_request(&format!("Invalid JSON payload: {rejection}")),
    }
}

fn projection_handler_impl(payload: ProjectionPayload) -> Response {
    let (inputs, result) = match args_from_payload(payload).and_then(compute) {
        Ok(computed) => computed,
        Err(msg) => return bad_request(&msg),
    };

    info!(
        months = result.len(),
        current_age = inputs.current_age,
        expected_death_age = inputs.expected_death_age,
        "served projection"
    );
    json_response(StatusCode::OK, build_projection_response(&inputs, &result))
}

fn build_projection_response<'a>(
    inputs: &FinancialInputs,
    result: &'a ProjectionResult,
) -> ProjectionResponse<'a> {
    let start_age = f64::from(inputs.current_age);
    ProjectionResponse {
        months: &result.months,
        years: &result.years,
        ages: result.years.iter().map(|year| start_age + year).collect(),
        principal: &result.principal,
        contributions: &result.contributions,
        take_home: &result.take_home,
        title: format!(
            "Retirement Projection (Initial: ${:.2}, Growth: {:.2}%)",
            inputs.initial_capital,
            inputs.annual_growth_rate * 100.0
        ),
        x_label: CHART_X_LABEL,
        y_label: CHART_Y_LABEL,
        summary: result.summary(inputs.current_age),
    }
}

fn render_table(inputs: &FinancialInputs, result: &ProjectionResult, monthly: bool) -> String {
    let mut out = format!(
        "{:>6} {:>7} {:>16} {:>16} {:>12}\n",
        "month", "age", "principal", "contributions", "take-home"
    );
    let start_age = f64::from(inputs.current_age);
    for row in result.rows().filter(|row| monthly || row.month % 12 == 0) {
        out.push_str(&format!(
            "{:>6} {:>7.2} {:>16.2} {:>16.2} {:>12.2}\n",
            row.month,
            start_age + row.year,
            row.principal,
            row.contributions,
            row.take_home
        ));
    }

    let summary = result.summary(inputs.current_age);
    out.push('\n');
    out.push_str(&format!("final balance:       {:.2}\n", summary.final_balance));
    out.push_str(&format!("peak balance:        {:.2}\n", summary.peak_balance));
    out.push_str(&format!(
        "total contributions: {:.2}\n",
        summary.total_contributions
    ));
    match summary.depleted_at_age {
        Some(age) => out.push_str(&format!("money runs out at age {age:.2}\n")),
        None => out.push_str("money lasts through the whole horizon\n"),
    }
    out
}

fn with_cache_control<R: IntoResponse>(response: R) -> Response {
    let mut response = response.into_response();
    response.headers_mut().insert(
        header::CACHE_CONTROL,
        header::HeaderValue::from_static("no-store"),
    );
    response
}

fn json_response<T: Serialize>(status: StatusCode, body: T) -> Response {
    with_cache_control((status, Json(body)))
}

fn bad_request(msg: &str) -> Response {
    warn!(error = msg, "rejected projection request");
    error_response(StatusCode::BAD_REQUEST, msg)
}

fn error_response(status: StatusCode, msg: &str) -> Response {
    json_response(
        status,
        ErrorResponse {
            error: msg.to_string(),
        },
    )
}

#[cfg(test)]
fn args_from_json(json: &str) -> Result<ProjectionArgs, String> {
    let payload = serde_json::from_str::<ProjectionPayload>(json)
        .map_err(|e| format!("Invalid API JSON payload: {e}"))?;
    args_from_payload(payload)
}
