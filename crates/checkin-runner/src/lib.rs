//! # checkin-runner
//!
//! OCR-guided daily check-in for browser games. Describe the account,
//! labels and timings in YAML; the runner drives Chrome, finds each label
//! on screen and clicks through the flow.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use checkin_runner::{Config, Runner};
//!
//! # #[tokio::main]
//! # async fn main() -> checkin_runner::Result<()> {
//! let config = Config::load("config.yaml")?;
//! let mut runner = Runner::launch(&config).await?;
//! let result = runner.run(&config).await?;
//! runner.close().await?;
//! println!("Success: {}", result.success);
//! # Ok(())
//! # }
//! ```

mod config;
mod driver;
pub mod i18n;
pub mod ocr;
mod runner;

pub use config::{
    Account, BrowserConfig, Config, MailSettings, OcrConfig, OnFailure, ParamDef, Params,
    StepTiming, TargetUrl, Timing, Viewport,
};
pub use driver::EokaDriver;
pub use i18n::Labels;
pub use runner::{CheckIn, CheckInReport, RunResult, Runner};

/// Result type for checkin-runner operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur during config loading or a check-in.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("config error: {0}")]
    Config(String),

    #[error("yaml parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("browser error: {0}")]
    Browser(#[from] eoka::Error),

    #[error(transparent)]
    Checkin(#[from] checkin_core::Error),

    #[error("mail error: {0}")]
    Mail(#[from] checkin_mail::Error),
}

impl Error {
    /// See [`checkin_core::Error::is_capability_failure`].
    pub fn is_capability_failure(&self) -> bool {
        match self {
            Self::Browser(_) => true,
            Self::Checkin(e) => e.is_capability_failure(),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &str = r#"
name: "Test"
target:
  url: "https://example.com"
account:
  username: "alice"
  password: "hunter2"
"#;

    #[test]
    fn test_parse_minimal_config() {
        let config = Config::parse(MINIMAL).unwrap();
        assert_eq!(config.name, "Test");
        assert_eq!(config.target.url, "https://example.com");
        assert_eq!(config.locale, "zh-CN");
        assert!(config.claim);
        assert!(!config.browser.headless);
        assert!(config.screenshot_dir.is_none());
        assert!(config.on_failure.mail.is_none());
        assert_eq!(config.on_failure.screenshot, "final.png");
        assert_eq!(config.ocr.language, "chi_sim");
    }

    #[test]
    fn test_parse_viewport_config() {
        let yaml = r#"
name: "Test"
browser:
  headless: true
  viewport:
    width: 1920
    height: 1080
  proxy: "http://localhost:8080"
  user_agent: "Custom UA"
target:
  url: "https://example.com"
account:
  username: "alice"
  password: "hunter2"
"#;
        let config = Config::parse(yaml).unwrap();
        assert!(config.browser.headless);
        assert_eq!(config.browser.proxy, Some("http://localhost:8080".into()));
        assert_eq!(config.browser.user_agent, Some("Custom UA".into()));
        assert_eq!(
            config.browser.viewport(),
            Viewport {
                width: 1920,
                height: 1080
            }
        );
    }

    #[test]
    fn test_default_viewport() {
        let config = Config::parse(MINIMAL).unwrap();
        assert_eq!(config.browser.viewport(), Viewport::default());
        assert_eq!(config.browser.viewport().width, 1200);
        assert_eq!(config.browser.viewport().height, 800);
    }

    #[test]
    fn test_timing_defaults() {
        let config = Config::parse(MINIMAL).unwrap();
        let timing = &config.timing;
        assert_eq!(timing.username_field, StepTiming::new(20, 5));
        assert_eq!(timing.password_field, StepTiming::new(4, 2));
        assert_eq!(timing.login_button, StepTiming::new(4, 2));
        assert_eq!(timing.monthly_pass, StepTiming::new(10, 5));
        assert_eq!(timing.claim_button, StepTiming::new(10, 2));
        assert_eq!(timing.login_settle_secs, 10);
        assert_eq!(timing.panel_settle_secs, 2);
    }

    #[test]
    fn test_partial_timing_override() {
        let yaml = format!(
            "{}timing:\n  claim_button:\n    attempts: 3\n    delay_secs: 1\n  login_settle_secs: 0\n",
            MINIMAL
        );
        let config = Config::parse(&yaml).unwrap();
        assert_eq!(config.timing.claim_button, StepTiming::new(3, 1));
        assert_eq!(config.timing.login_settle_secs, 0);
        assert_eq!(config.timing.username_field, StepTiming::new(20, 5));
    }

    #[test]
    fn test_step_timing_request() {
        let request = StepTiming::new(10, 5).request("月势御守", "monthly pass");
        assert_eq!(request.pattern, "月势御守");
        assert_eq!(request.mode, checkin_core::MatchMode::Exact);
        assert_eq!(request.max_attempts, 10);
        assert_eq!(request.retry_delay, std::time::Duration::from_secs(5));
        assert_eq!(request.step, "monthly pass");
    }

    #[test]
    fn test_validation_missing_name() {
        let yaml = r#"
target:
  url: "https://example.com"
account:
  username: "alice"
  password: "hunter2"
"#;
        assert!(Config::parse(yaml).is_err());
    }

    #[test]
    fn test_validation_empty_url() {
        let yaml = MINIMAL.replace("https://example.com", "");
        let err = Config::parse(&yaml).unwrap_err();
        assert!(err.to_string().contains("target.url"));
    }

    #[test]
    fn test_validation_empty_password() {
        let yaml = MINIMAL.replace("hunter2", "");
        let err = Config::parse(&yaml).unwrap_err();
        assert!(err.to_string().contains("account.password"));
    }

    #[test]
    fn test_validation_zero_attempts() {
        let yaml = format!(
            "{}timing:\n  monthly_pass:\n    attempts: 0\n    delay_secs: 5\n",
            MINIMAL
        );
        let err = Config::parse(&yaml).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("timing.monthly_pass"), "{}", msg);
        assert!(msg.contains("at least 1"), "{}", msg);
    }

    #[test]
    fn test_validation_unknown_locale() {
        let yaml = format!("{}locale: \"xx-YY\"\n", MINIMAL);
        let err = Config::parse(&yaml).unwrap_err();
        assert!(err.to_string().contains("unknown locale"));
    }

    #[test]
    fn test_unknown_locale_with_full_overrides() {
        let yaml = format!(
            r#"{}locale: "en"
labels:
  username: "Email"
  password: "Password"
  login: "Play"
  monthly_pass: "Monthly Pass"
  claim: "Claim"
"#,
            MINIMAL
        );
        let config = Config::parse(&yaml).unwrap();
        let labels = config.labels().unwrap();
        assert_eq!(labels.login, "Play");
        assert_eq!(labels.claim, "Claim");
    }

    #[test]
    fn test_validation_incomplete_mail() {
        let yaml = format!(
            r#"{}on_failure:
  mail:
    smtp_server: ""
    username: "bot@example.com"
    password: "secret"
    receiver: "ops@example.com"
"#,
            MINIMAL
        );
        let err = Config::parse(&yaml).unwrap_err();
        assert!(err.to_string().contains("smtp_server"));
    }

    #[test]
    fn test_parse_on_failure_mail() {
        let yaml = format!(
            r#"{}on_failure:
  screenshot: "shots/{{timestamp}}.png"
  mail:
    smtp_server: "smtp.example.com"
    username: "bot@example.com"
    password: "secret"
    receiver: "ops@example.com"
"#,
            MINIMAL
        );
        let config = Config::parse(&yaml).unwrap();
        let mail = config.on_failure.mail.as_ref().unwrap();
        assert_eq!(mail.smtp_port, 465);
        assert!(!format!("{:?}", mail).contains("secret"));

        let mail_config: checkin_mail::MailConfig = mail.into();
        assert_eq!(mail_config.smtp_server, "smtp.example.com");
        assert_eq!(mail_config.smtp_port, 465);

        let path = config.on_failure.screenshot_path();
        let name = path.file_name().unwrap().to_str().unwrap();
        assert!(!name.contains("{timestamp}"));
        assert!(path.starts_with("shots"));
    }

    #[test]
    fn test_account_debug_is_redacted() {
        let config = Config::parse(MINIMAL).unwrap();
        let debug = format!("{:?}", config.account);
        assert!(debug.contains("alice"));
        assert!(!debug.contains("hunter2"));
    }

    #[test]
    fn test_params_substitution() {
        let yaml = r#"
name: "Check-in"
params:
  user:
    required: true
  pass:
    required: true
target:
  url: "https://game.example.com/"
account:
  username: "${user}"
  password: "${pass}"
"#;
        let params = Params::new().set("user", "alice").set("pass", "hunter2");
        let config = Config::parse_with_params(yaml, &params).unwrap();
        assert_eq!(config.account.username, "alice");
        assert_eq!(config.account.password, "hunter2");
    }

    #[test]
    fn test_params_missing_required() {
        let yaml = r#"
name: "Check-in"
params:
  pass:
    required: true
target:
  url: "https://game.example.com/"
account:
  username: "alice"
  password: "${pass}"
"#;
        let err = Config::parse(yaml).unwrap_err();
        assert!(err.to_string().contains("pass"));
    }

    #[test]
    fn test_params_in_target_url() {
        let yaml = r#"
name: "Test"
params:
  server:
    default: "game"
target:
  url: "https://${server}.example.com"
account:
  username: "alice"
  password: "hunter2"
"#;
        let config = Config::parse(yaml).unwrap();
        assert_eq!(config.target.url, "https://game.example.com");

        let params = Params::new().set("server", "cn");
        let config = Config::parse_with_params(yaml, &params).unwrap();
        assert_eq!(config.target.url, "https://cn.example.com");
    }

    #[test]
    fn test_discover_prefers_local_config() {
        let dir = tempfile::tempdir().unwrap();
        assert!(Config::discover(dir.path()).is_err());

        std::fs::write(dir.path().join("config.yaml"), MINIMAL).unwrap();
        assert_eq!(
            Config::discover(dir.path()).unwrap(),
            dir.path().join("config.yaml")
        );

        std::fs::write(dir.path().join("config.local.yaml"), MINIMAL).unwrap();
        assert_eq!(
            Config::discover(dir.path()).unwrap(),
            dir.path().join("config.local.yaml")
        );
    }

    #[test]
    fn test_load_missing_file() {
        let err = Config::load("does/not/exist.yaml").unwrap_err();
        assert!(err.to_string().contains("does/not/exist.yaml"));
    }

    #[test]
    fn test_load_example_config() {
        let params = Params::new()
            .set("username", "alice")
            .set("password", "hunter2");
        let config = Config::load_with_params("configs/example.yaml", &params).unwrap();
        assert_eq!(config.name, "Majsoul daily check-in");
        assert_eq!(config.account.username, "alice");
        assert!(config.on_failure.mail.is_none());
    }

    #[test]
    fn test_capability_failure_classification() {
        let exhausted: Error = checkin_core::Error::LocatorExhausted {
            pattern: "领取辉玉".into(),
            step: "claim reward".into(),
            attempts: 10,
        }
        .into();
        assert!(!exhausted.is_capability_failure());

        let broken: Error =
            checkin_core::Error::from(checkin_core::DriverError::Session("gone".into())).into();
        assert!(broken.is_capability_failure());

        assert!(!Error::Config("bad".into()).is_capability_failure());
    }
}
