pub mod params;
pub mod schema;

pub use params::{ParamDef, Params};
pub use schema::{
    Account, BrowserConfig, Config, MailSettings, OcrConfig, OnFailure, StepTiming, TargetUrl,
    Timing, Viewport,
};
