use std::time::{Duration, Instant};

use checkin_core::{anchored, execute, Action, Driver, ScreenSearch};
use tracing::info;

use crate::config::Config;
use crate::i18n::Labels;
use crate::Result;

/// Outcome of a completed check-in.
#[derive(Debug, Clone)]
pub struct CheckInReport {
    pub steps_completed: usize,
    /// Whether the claim control was clicked.
    pub claimed: bool,
    pub duration: Duration,
}

/// The fixed login → monthly pass → claim flow.
pub struct CheckIn<'a> {
    config: &'a Config,
    labels: Labels,
    steps_completed: usize,
}

impl<'a> CheckIn<'a> {
    pub fn new(config: &'a Config, labels: Labels) -> Self {
        Self {
            config,
            labels,
            steps_completed: 0,
        }
    }

    /// Steps finished so far, also meaningful after a failed run.
    pub fn steps_completed(&self) -> usize {
        self.steps_completed
    }

    pub async fn run<D>(&mut self, driver: &mut D, search: &ScreenSearch) -> Result<CheckInReport>
    where
        D: Driver + ?Sized,
    {
        let start = Instant::now();
        let timing = &self.config.timing;
        let labels = &self.labels;

        driver.navigate(&self.config.target.url).await.map_err(checkin_core::Error::from)?;
        self.steps_completed += 1;

        // Login form
        let username = search
            .search(&*driver, &timing.username_field.request(&labels.username, "login"))
            .await?;
        let password = search
            .search(&*driver, &timing.password_field.request(&labels.password, "login"))
            .await?;
        let login = search
            .search(&*driver, &timing.login_button.request(&labels.login, "login"))
            .await?;
        self.steps_completed += 1;

        let account = &self.config.account;
        execute(
            driver,
            &anchored(
                username.center(),
                vec![
                    Action::click().with_delay_secs(1),
                    Action::send_keys([account.username.as_str()]).with_delay_secs(2),
                ],
            ),
        )
        .await?;
        execute(
            driver,
            &anchored(
                password.center(),
                vec![
                    Action::click().with_delay_secs(1),
                    Action::send_keys([account.password.as_str()]).with_delay_secs(2),
                ],
            ),
        )
        .await?;
        execute(
            driver,
            &anchored(login.center(), vec![Action::click().with_delay_secs(1)]),
        )
        .await?;
        self.steps_completed += 1;
        info!("login submitted as {}", account.username);

        settle(timing.login_settle_secs).await;

        // Monthly pass panel
        let panel = search
            .search(&*driver, &timing.monthly_pass.request(&labels.monthly_pass, "monthly pass"))
            .await?;
        execute(
            driver,
            &anchored(panel.center(), vec![Action::click().with_delay_secs(2)]),
        )
        .await?;
        self.steps_completed += 1;

        settle(timing.panel_settle_secs).await;

        // Claim
        let claim = search
            .search(&*driver, &timing.claim_button.request(&labels.claim, "claim reward"))
            .await?;
        self.steps_completed += 1;

        let claimed = if self.config.claim {
            execute(
                driver,
                &anchored(claim.center(), vec![Action::click().with_delay_secs(2)]),
            )
            .await?;
            self.steps_completed += 1;
            info!("reward claimed");
            true
        } else {
            info!("claim control found at {}, claiming disabled", claim);
            false
        };

        Ok(CheckInReport {
            steps_completed: self.steps_completed,
            claimed,
            duration: start.elapsed(),
        })
    }
}

async fn settle(secs: u64) {
    if secs > 0 {
        info!("waiting {}s for the UI to settle", secs);
        tokio::time::sleep(Duration::from_secs(secs)).await;
    }
}
