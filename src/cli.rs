use std::env;
use std::fs;
use std::sync::Arc;

use anyhow::{anyhow, bail, Context, Result};
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use serde::Deserialize;

use crate::core::config::Settings;
use crate::services::assessment_import;
use crate::services::auth_provider::AuthClient;
use crate::services::session::{AuthEvent, SessionContext, SessionSubscription};

const USAGE: &str = "usage: assessctl [--api <base-url>] <validate <file> | import <file> | answers <id>>";

enum Command {
    Validate(String),
    Import(String),
    Answers(String),
}

struct Args {
    api_base: String,
    command: Command,
}

#[derive(Debug, Deserialize)]
struct ImportReply {
    assessment: ImportedRecord,
    warnings: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct ImportedRecord {
    id: String,
    title: String,
}

#[derive(Debug, Deserialize)]
struct ReviewReply {
    title: String,
    sections: Vec<ReviewSection>,
}

#[derive(Debug, Deserialize)]
struct ReviewSection {
    name: String,
    answers: Vec<ReviewLine>,
}

#[derive(Debug, Deserialize)]
struct ReviewLine {
    question_id: i64,
    display: String,
}

fn parse_args() -> Result<Args> {
    let mut api_base = env::var("ASSESSCTL_API_BASE")
        .unwrap_or_else(|_| "http://localhost:8000/api/v1".to_string());
    let mut positional = Vec::new();

    let mut args = env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--api" => {
                api_base = args.next().ok_or_else(|| anyhow!("--api missing value"))?;
            }
            "-h" | "--help" => bail!(USAGE),
            _ => positional.push(arg),
        }
    }

    let command = match positional.as_slice() {
        [command, file] if command == "validate" => Command::Validate(file.clone()),
        [command, file] if command == "import" => Command::Import(file.clone()),
        [command, id] if command == "answers" => Command::Answers(id.clone()),
        _ => bail!(USAGE),
    };

    Ok(Args { api_base: api_base.trim_end_matches('/').to_string(), command })
}

pub async fn run_cli() -> Result<()> {
    dotenvy::dotenv().ok();
    let args = parse_args()?;

    match args.command {
        Command::Validate(path) => {
            let raw = read_document(&path)?;
            let imported = assessment_import::parse_document(&raw)
                .map_err(|err| anyhow!("{path}: {err}"))?;
            print_warnings(&imported.warnings);
            println!("{path}: ok ({} section(s))", imported.document.sections.len());
            Ok(())
        }
        Command::Import(path) => {
            let raw = read_document(&path)?;
            let local = assessment_import::parse_document(&raw)
                .map_err(|err| anyhow!("{path}: {err}"))?;
            print_warnings(&local.warnings);
            with_session(|client, token| import(client, &args.api_base, token, raw)).await
        }
        Command::Answers(id) => {
            with_session(|client, token| answers(client, &args.api_base, token, id)).await
        }
    }
}

fn read_document(path: &str) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("Failed to read {path}"))
}

fn print_warnings(warnings: &[String]) {
    for warning in warnings {
        eprintln!("warning: {warning}");
    }
}

/// Signs in for the duration of `action` and always signs out afterwards.
async fn with_session<F, Fut>(action: F) -> Result<()>
where
    F: FnOnce(reqwest::Client, String) -> Fut,
    Fut: std::future::Future<Output = Result<()>>,
{
    let settings = Settings::load().context("Invalid configuration")?;
    crate::core::telemetry::init_tracing(&settings)?;

    let email = env::var("ASSESSCTL_EMAIL").context("ASSESSCTL_EMAIL is not set")?;
    let password = env::var("ASSESSCTL_PASSWORD").context("ASSESSCTL_PASSWORD is not set")?;

    let provider = Arc::new(AuthClient::from_settings(&settings)?);
    let session = SessionContext::new(provider);
    let mut subscription = session.subscribe();

    session.initialize(None).await.context("Failed to initialize session")?;
    session.sign_in(&email, &password).await.context("Sign-in failed")?;
    log_events(&mut subscription);

    let token = session.access_token().await.ok_or_else(|| anyhow!("No active session"))?;
    let result = action(reqwest::Client::new(), token).await;

    if let Err(err) = session.sign_out().await {
        tracing::warn!(error = %err, "Sign-out failed");
    }
    log_events(&mut subscription);
    subscription.unsubscribe();

    result
}

fn log_events(subscription: &mut SessionSubscription) {
    while let Some(event) = subscription.try_next() {
        match event {
            AuthEvent::Initialized(user) => {
                tracing::debug!(signed_in = user.is_some(), "Session initialized");
            }
            AuthEvent::SignedIn(user) => {
                tracing::info!(user_id = %user.id, email = ?user.email, "Signed in");
            }
            AuthEvent::SignedOut => tracing::info!("Signed out"),
        }
    }
}

async fn import(client: reqwest::Client, api_base: &str, token: String, raw: String) -> Result<()> {
    let response = client
        .post(format!("{api_base}/admin/assessments"))
        .header(AUTHORIZATION, format!("Bearer {token}"))
        .header(CONTENT_TYPE, "application/json")
        .body(raw)
        .send()
        .await
        .context("Failed to reach the assessment API")?;

    let status = response.status();
    let body = response.text().await.context("Failed to read import response")?;
    if !status.is_success() {
        bail!("import failed ({status}): {body}");
    }

    let reply: ImportReply = serde_json::from_str(&body).context("Unexpected import response")?;
    print_warnings(&reply.warnings);
    println!("{}\t{}", reply.assessment.id, reply.assessment.title);
    Ok(())
}

async fn answers(client: reqwest::Client, api_base: &str, token: String, id: String) -> Result<()> {
    let response = client
        .get(format!("{api_base}/admin/answers/{id}"))
        .header(AUTHORIZATION, format!("Bearer {token}"))
        .send()
        .await
        .context("Failed to reach the assessment API")?;

    let status = response.status();
    let body = response.text().await.context("Failed to read answer review")?;
    if !status.is_success() {
        bail!("answer review failed ({status}): {body}");
    }

    let review: ReviewReply = serde_json::from_str(&body).context("Unexpected review response")?;
    println!("{}", review.title);
    for section in review.sections {
        println!("[{}]", section.name);
        for line in section.answers {
            println!("  {}. {}", line.question_id, line.display);
        }
    }
    Ok(())
}
