//! Task-queue connection settings.
//!
//! `CELERY_BROKER_URL` wins over the deprecated `BROKER_URL`; the result backend
//! defaults to the broker.

use invenio_config::ConfigMap;
use invenio_telemetry::WarningAction;
use serde_json::Value;
use tracing::info;
use url::Url;

use super::string_setting;
use crate::application::{Application, Extension};
use crate::error::{AppError, AppResult};

/// Broker used when nothing configures one.
pub const DEFAULT_BROKER_URL: &str = "redis://localhost:6379/0";

const BROKER_URL: &str = "CELERY_BROKER_URL";
const LEGACY_BROKER_URL: &str = "BROKER_URL";
const RESULT_BACKEND: &str = "CELERY_RESULT_BACKEND";
const ALWAYS_EAGER: &str = "CELERY_TASK_ALWAYS_EAGER";

/// Resolved task-queue connection settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskQueueSettings {
    /// Message broker URL.
    pub broker_url: Url,
    /// Result backend URL; defaults to the broker.
    pub result_backend: Url,
    /// Run tasks inline instead of dispatching them.
    pub always_eager: bool,
}

/// Resolves the task-queue settings and writes the effective values back to the config.
#[derive(Debug, Default)]
pub struct TaskQueueExtension;

impl Extension for TaskQueueExtension {
    fn name(&self) -> &'static str {
        "task_queue"
    }

    fn init_app(&mut self, app: &mut Application) -> AppResult<()> {
        let settings = resolve(app.config(), invenio_telemetry::warning_action())?;
        let config = app.config_mut();
        config.set_default(BROKER_URL, Value::from(settings.broker_url.as_str()));
        config.set_default(RESULT_BACKEND, Value::from(settings.result_backend.as_str()));
        config.set_default(ALWAYS_EAGER, Value::Bool(settings.always_eager));
        info!(
            broker = %redacted(&settings.broker_url),
            always_eager = settings.always_eager,
            "task queue configured"
        );
        app.insert_state(settings);
        Ok(())
    }
}

fn resolve(config: &ConfigMap, warnings: WarningAction) -> AppResult<TaskQueueSettings> {
    let broker = match string_setting(config, BROKER_URL)? {
        Some(url) => (BROKER_URL, url),
        None => match string_setting(config, LEGACY_BROKER_URL)? {
            Some(url) => {
                invenio_telemetry::deprecated_with(
                    warnings,
                    "BROKER_URL is deprecated; use CELERY_BROKER_URL",
                )
                .map_err(|err| AppError::telemetry("task_queue.deprecation", err))?;
                (LEGACY_BROKER_URL, url)
            }
            None => (BROKER_URL, DEFAULT_BROKER_URL),
        },
    };
    let broker_url = parse_url(broker.0, broker.1)?;
    let result_backend = match string_setting(config, RESULT_BACKEND)? {
        Some(url) => parse_url(RESULT_BACKEND, url)?,
        None => broker_url.clone(),
    };
    let always_eager = match config.get(ALWAYS_EAGER) {
        None | Some(Value::Null) => false,
        Some(Value::Bool(flag)) => *flag,
        Some(other) => {
            return Err(AppError::InvalidConfig {
                field: ALWAYS_EAGER,
                reason: "not_a_bool",
                value: Some(other.to_string()),
            });
        }
    };
    Ok(TaskQueueSettings {
        broker_url,
        result_backend,
        always_eager,
    })
}

fn parse_url(field: &'static str, value: &str) -> AppResult<Url> {
    Url::parse(value).map_err(|_| AppError::InvalidConfig {
        field,
        reason: "invalid_url",
        value: Some(value.to_string()),
    })
}

fn redacted(url: &Url) -> String {
    let mut shown = url.clone();
    if shown.password().is_some() && shown.set_password(Some("***")).is_ok() {
        return shown.to_string();
    }
    url.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use invenio_config::ConfigSource;
    use serde_json::json;

    fn config(pairs: &[(&str, Value)]) -> ConfigMap {
        let mut config = ConfigMap::new();
        for (key, value) in pairs {
            config.insert(*key, value.clone(), ConfigSource::Override);
        }
        config
    }

    #[test]
    fn defaults_to_local_redis() -> AppResult<()> {
        let settings = resolve(&ConfigMap::new(), WarningAction::Ignore)?;
        assert_eq!(settings.broker_url.as_str(), DEFAULT_BROKER_URL);
        assert_eq!(settings.result_backend, settings.broker_url);
        assert!(!settings.always_eager);
        Ok(())
    }

    #[test]
    fn explicit_settings_are_used() -> AppResult<()> {
        let explicit = config(&[
            (BROKER_URL, json!("amqp://guest:guest@mq:5672//")),
            (RESULT_BACKEND, json!("redis://cache:6379/1")),
            (ALWAYS_EAGER, json!(true)),
        ]);
        let settings = resolve(&explicit, WarningAction::Ignore)?;
        assert_eq!(settings.broker_url.scheme(), "amqp");
        assert_eq!(settings.result_backend.as_str(), "redis://cache:6379/1");
        assert!(settings.always_eager);
        Ok(())
    }

    #[test]
    fn current_key_wins_over_legacy_key() -> AppResult<()> {
        let both = config(&[
            (BROKER_URL, json!("redis://new:6379/0")),
            (LEGACY_BROKER_URL, json!("redis://old:6379/0")),
        ]);
        let settings = resolve(&both, WarningAction::Ignore)?;
        assert_eq!(settings.broker_url.host_str(), Some("new"));
        Ok(())
    }

    #[test]
    fn legacy_key_is_still_honoured() -> AppResult<()> {
        let legacy = config(&[(LEGACY_BROKER_URL, json!("redis://old:6379/0"))]);
        let settings = resolve(&legacy, WarningAction::Ignore)?;
        assert_eq!(settings.broker_url.host_str(), Some("old"));
        Ok(())
    }

    #[test]
    fn legacy_key_fails_when_warnings_are_errors() {
        let legacy = config(&[(LEGACY_BROKER_URL, json!("redis://old:6379/0"))]);
        assert!(matches!(
            resolve(&legacy, WarningAction::Error),
            Err(AppError::Telemetry {
                operation: "task_queue.deprecation",
                source: invenio_telemetry::TelemetryError::DeprecationDenied { .. },
            })
        ));

        let current = config(&[(BROKER_URL, json!("redis://new:6379/0"))]);
        assert!(resolve(&current, WarningAction::Error).is_ok());
    }

    #[test]
    fn invalid_values_are_rejected() {
        let bad_url = resolve(
            &config(&[(BROKER_URL, json!("not a url"))]),
            WarningAction::Ignore,
        );
        assert!(matches!(
            bad_url,
            Err(AppError::InvalidConfig {
                field: BROKER_URL,
                reason: "invalid_url",
                ..
            })
        ));
        let bad_type = resolve(
            &config(&[(BROKER_URL, json!(6379))]),
            WarningAction::Ignore,
        );
        assert!(matches!(
            bad_type,
            Err(AppError::InvalidConfig {
                reason: "not_a_string",
                ..
            })
        ));
        let bad_flag = resolve(
            &config(&[(ALWAYS_EAGER, json!("yes"))]),
            WarningAction::Ignore,
        );
        assert!(matches!(
            bad_flag,
            Err(AppError::InvalidConfig {
                reason: "not_a_bool",
                ..
            })
        ));
    }

    #[test]
    fn passwords_are_masked_in_logs() -> Result<(), url::ParseError> {
        let url = Url::parse("amqp://user:hunter2@mq:5672//")?;
        let shown = redacted(&url);
        assert!(!shown.contains("hunter2"));
        assert!(shown.contains("user:***@mq"));
        Ok(())
    }
}
