//! On-screen labels the scenario looks for, per game locale.

use serde::Deserialize;

use crate::{Error, Result};

struct LocaleTable {
    code: &'static str,
    username: &'static str,
    password: &'static str,
    login: &'static str,
    monthly_pass: &'static str,
    claim: &'static str,
    failure_subject: &'static str,
    screenshot_caption: &'static str,
}

const LOCALES: &[LocaleTable] = &[LocaleTable {
    code: "zh-CN",
    username: "账号/邮箱",
    password: "密码",
    login: "进入游戏",
    monthly_pass: "月势御守",
    claim: "领取辉玉",
    failure_subject: "雀魂每日签到失败",
    screenshot_caption: "执行截图：",
}];

const FALLBACK_SUBJECT: &str = "Daily check-in failed";
const FALLBACK_CAPTION: &str = "Screenshot:";

/// Resolved label set used by a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Labels {
    pub username: String,
    pub password: String,
    pub login: String,
    pub monthly_pass: String,
    pub claim: String,
    pub failure_subject: String,
    pub screenshot_caption: String,
}

/// `labels:` section of the config; every field replaces the table entry.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LabelOverrides {
    pub username: Option<String>,
    pub password: Option<String>,
    pub login: Option<String>,
    pub monthly_pass: Option<String>,
    pub claim: Option<String>,
    pub failure_subject: Option<String>,
    pub screenshot_caption: Option<String>,
}

impl LabelOverrides {
    /// True when every on-screen label is overridden.
    fn covers_screen(&self) -> bool {
        self.username.is_some()
            && self.password.is_some()
            && self.login.is_some()
            && self.monthly_pass.is_some()
            && self.claim.is_some()
    }
}

impl Labels {
    /// Built-in labels for `locale`, if the table has it.
    pub fn builtin(locale: &str) -> Option<Self> {
        LOCALES
            .iter()
            .find(|t| t.code.eq_ignore_ascii_case(locale))
            .map(|t| Self {
                username: t.username.into(),
                password: t.password.into(),
                login: t.login.into(),
                monthly_pass: t.monthly_pass.into(),
                claim: t.claim.into(),
                failure_subject: t.failure_subject.into(),
                screenshot_caption: t.screenshot_caption.into(),
            })
    }

    /// Locale codes with built-in labels.
    pub fn locales() -> impl Iterator<Item = &'static str> {
        LOCALES.iter().map(|t| t.code)
    }

    /// Table entry for `locale` with `overrides` applied.
    ///
    /// A locale missing from the table is accepted only when the overrides
    /// name every on-screen label.
    pub fn resolve(locale: &str, overrides: &LabelOverrides) -> Result<Self> {
        let base = match Self::builtin(locale) {
            Some(labels) => labels,
            None if overrides.covers_screen() => Self {
                username: String::new(),
                password: String::new(),
                login: String::new(),
                monthly_pass: String::new(),
                claim: String::new(),
                failure_subject: FALLBACK_SUBJECT.into(),
                screenshot_caption: FALLBACK_CAPTION.into(),
            },
            None => {
                let known: Vec<_> = Self::locales().collect();
                return Err(Error::Config(format!(
                    "unknown locale '{}' (built-in: {}); override all labels to use it",
                    locale,
                    known.join(", ")
                )));
            }
        };

        let pick = |o: &Option<String>, d: String| o.clone().unwrap_or(d);
        Ok(Self {
            username: pick(&overrides.username, base.username),
            password: pick(&overrides.password, base.password),
            login: pick(&overrides.login, base.login),
            monthly_pass: pick(&overrides.monthly_pass, base.monthly_pass),
            claim: pick(&overrides.claim, base.claim),
            failure_subject: pick(&overrides.failure_subject, base.failure_subject),
            screenshot_caption: pick(&overrides.screenshot_caption, base.screenshot_caption),
        })
    }
}
