use tracing::debug;

use crate::action::Action;
use crate::driver::Driver;
use crate::Result;

/// Run `actions` in order against the driver.
///
/// After each action its delay is slept. The first driver error stops the
/// sequence; the remaining actions are not attempted.
pub async fn execute<D>(driver: &mut D, actions: &[Action]) -> Result<()>
where
    D: Driver + ?Sized,
{
    for (i, action) in actions.iter().enumerate() {
        debug!("Executing action {}/{}: {}", i + 1, actions.len(), action.name());
        match action {
            Action::Move { dx, dy, .. } => driver.move_pointer_by(*dx, *dy).await?,
            Action::Click { .. } => driver.click().await?,
            Action::SendKeys { keys, .. } => driver.send_keys(keys).await?,
        }

        let delay = action.delay();
        if !delay.is_zero() {
            debug!("{} done, waiting {:?}", action.name(), delay);
            tokio::time::sleep(delay).await;
        }
    }
    Ok(())
}
