//! Drive the profile wizard from the command line.
//!
//! ```text
//! kismet-wizard [USER_ID] [ANSWERS_JSON]
//! ```
//!
//! `ANSWERS_JSON` is an object of draft field values applied before walking
//! forward through the steps. A string `profile_image` is treated as a path
//! to a local photo.

use std::process::ExitCode;
use std::sync::Arc;

use kismet_api::{HttpProfileApi, ProfileApi};
use kismet_core::draft::fields;
use kismet_core::i18n::EnglishOnly;
use kismet_store::{DraftStore, FileStore};
use kismet_wizard::answers::load_answers;
use kismet_wizard::{telemetry, AdvanceOutcome, AppContext, FormEngine, SubmitOutcome, WizardConfig};
use serde_json::{Map, Value};

#[tokio::main]
async fn main() -> ExitCode {
    telemetry::init_tracing();

    let config = WizardConfig::from_env();
    let mut args = std::env::args().skip(1);
    let user_id = args.next();
    let answers_path = args.next();

    let mut api = match HttpProfileApi::new(config.api_url.clone(), config.api_timeout()) {
        Ok(api) => api,
        Err(e) => {
            tracing::error!(error = %e, "Failed to build profile API client");
            return ExitCode::FAILURE;
        }
    };
    api.set_token(config.api_token.clone());

    let ctx = Arc::new(AppContext::new(user_id, Arc::new(EnglishOnly)));
    if ctx.user_id().is_some() && config.api_token.is_some() {
        match api.fetch_profile().await {
            Ok(profile) => ctx.set_profile(profile).await,
            Err(e) => tracing::warn!(error = %e, "Could not load current profile"),
        }
    }

    let store = DraftStore::new(Arc::new(FileStore::new(&config.draft_dir)));
    let mut engine = FormEngine::new(ctx, Arc::new(api), store, &config);
    engine.initialize().await;

    if let Some(path) = answers_path {
        match load_answers(&path).await {
            Ok(answers) => apply_answers(&mut engine, answers).await,
            Err(e) => {
                tracing::error!(error = %e, "Failed to read answers");
                engine.shutdown().await;
                return ExitCode::FAILURE;
            }
        }
    }

    let code = walk(&mut engine).await;
    engine.shutdown().await;
    code
}

async fn apply_answers(engine: &mut FormEngine, answers: Map<String, Value>) {
    for (field, value) in answers {
        let result = match value {
            Value::String(path) if field == fields::PROFILE_IMAGE => engine.select_image(path).await,
            other => engine.set_value(&field, other),
        };
        if let Err(e) = result {
            tracing::warn!(error = %e, field = %field, "Ignoring answer");
        }
    }
}

async fn walk(engine: &mut FormEngine) -> ExitCode {
    loop {
        if let Some((title, _)) = engine.step_heading() {
            if let Some((current, total)) = engine.progress() {
                println!("[{current}/{total}] {title}");
            }
        }

        match engine.advance().await {
            AdvanceOutcome::Moved(_) => continue,
            AdvanceOutcome::Blocked { .. } => {
                print_panel(engine);
                return ExitCode::FAILURE;
            }
            AdvanceOutcome::Submitted(SubmitOutcome::Completed { photo_error }) => {
                println!("Profile saved.");
                if let Some(message) = photo_error {
                    println!("{message}");
                }
                return ExitCode::SUCCESS;
            }
            AdvanceOutcome::Submitted(_) => {
                print_panel(engine);
                return ExitCode::FAILURE;
            }
            AdvanceOutcome::Ignored => return ExitCode::FAILURE,
        }
    }
}

fn print_panel(engine: &FormEngine) {
    if let Some(notice) = engine.error_panel().current() {
        println!("{}", notice.render());
    }
}
