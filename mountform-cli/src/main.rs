//! Validates a sign-up form from the command line.
//!
//! ```text
//! mountform-cli username=ada email=ada@example.com age=36 newsletter=true
//! ```
//!
//! Each argument is `field=value`; values are parsed as JSON when possible
//! and taken as strings otherwise. Set `MOUNTFORM_LOG` to change the log
//! level (default `info`).

use std::collections::BTreeMap;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use log::{error, info};
use mountform_lib::prelude::*;
use serde_json::Value;
use simplelog::{ColorChoice, Config, LevelFilter, TermLogger, TerminalMode};

fn signup_config() -> Result<FormConfig, ConfigError> {
    FormConfig::builder()
        .mount_point("forms.signup")
        .field(
            "username",
            FieldConfig::new()
                .default_value("")
                .validator(|value: &Value, _: &FieldStates, _: &Value| {
                    match value.as_str() {
                        Some(name) if name.len() < 3 => {
                            ValidationOutcome::RejectedWithText("Too short".into())
                        }
                        Some(_) => ValidationOutcome::Accepted,
                        None => ValidationOutcome::Rejected,
                    }
                })
                .prop("label", "Username"),
        )
        .field(
            "email",
            FieldConfig::new()
                .default_value("")
                .async_validator(|value: &Value, _: &FieldStates, _: &Value| {
                    let value = value.clone();
                    async move {
                        tokio::time::sleep(Duration::from_millis(50)).await;
                        match value.as_str() {
                            Some(email) if email.contains('@') => Ok(()),
                            _ => Err(Some("Not an email address".to_string())),
                        }
                    }
                })
                .prop("label", "Email"),
        )
        .field(
            "age",
            FieldConfig::new()
                .validator(|value: &Value, _: &FieldStates, _: &Value| {
                    value.as_i64().is_some_and(|age| age >= 18)
                })
                .on_change(|event| info!("age is now {}", event.input.value)),
        )
        .field("newsletter", FieldConfig::new().default_value(false))
        .build()
}

fn parse_args(args: impl Iterator<Item = String>) -> Result<BTreeMap<String, Value>, String> {
    args.map(|arg| {
        let (field, raw) = arg
            .split_once('=')
            .ok_or_else(|| format!("expected field=value, got {arg:?}"))?;
        let value = serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()));
        Ok((field.to_string(), value))
    })
    .collect()
}

fn log_level() -> LevelFilter {
    std::env::var("MOUNTFORM_LOG")
        .ok()
        .and_then(|level| level.parse().ok())
        .unwrap_or(LevelFilter::Info)
}

#[tokio::main]
async fn main() -> ExitCode {
    if let Err(e) = TermLogger::init(
        log_level(),
        Config::default(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    ) {
        eprintln!("Error: {}", e);
    }

    let config = match signup_config() {
        Ok(config) => Arc::new(config),
        Err(e) => {
            error!("invalid form configuration: {}", e);
            return ExitCode::FAILURE;
        }
    };
    let update = match parse_args(std::env::args().skip(1)) {
        Ok(update) => update,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::from(2);
        }
    };

    let store = Arc::new(MemoryStore::new([InputsReducer::new(config.clone())]));
    let form = Form::new(config, store.clone());

    let outcome = form.update_and_validate(update, Meta::new()).await;
    for diagnostic in form.take_diagnostics() {
        println!("warning: {}", diagnostic);
    }
    let code = match outcome {
        Ok(inputs) => {
            println!("valid: {}", inputs.keys().cloned().collect::<Vec<_>>().join(", "));
            ExitCode::SUCCESS
        }
        Err(invalid) => {
            for (field, input) in &invalid.inputs {
                match &input.error_text {
                    Some(text) => println!("{field}: {text}"),
                    None => println!("{field}: invalid"),
                }
            }
            ExitCode::FAILURE
        }
    };

    match serde_json::to_string_pretty(&store.get_state()) {
        Ok(state) => println!("{state}"),
        Err(e) => error!("failed to render store state: {}", e),
    }
    code
}
