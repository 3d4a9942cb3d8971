use crate::geometry::Point;
use std::fmt;
use std::time::Duration;

/// A primitive UI action, executed once by [`crate::execute`].
///
/// Every variant carries the time to wait after it ran, so UI transitions
/// can settle before the next action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Move the pointer by a relative offset.
    Move { dx: i32, dy: i32, delay: Duration },
    /// Click at the current pointer position.
    Click { delay: Duration },
    /// Type keystrokes into the focused element.
    SendKeys { keys: Vec<String>, delay: Duration },
}

impl Action {
    pub fn move_by(dx: i32, dy: i32) -> Self {
        Self::Move {
            dx,
            dy,
            delay: Duration::ZERO,
        }
    }

    /// Move from the pointer's home position to `point`.
    pub fn move_to(point: Point) -> Self {
        Self::move_by(point.x, point.y)
    }

    /// Undo [`Action::move_to`] for the same point.
    pub fn move_back(point: Point) -> Self {
        Self::move_by(-point.x, -point.y)
    }

    pub fn click() -> Self {
        Self::Click {
            delay: Duration::ZERO,
        }
    }

    pub fn send_keys<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::SendKeys {
            keys: keys.into_iter().map(Into::into).collect(),
            delay: Duration::ZERO,
        }
    }

    pub fn with_delay(mut self, value: Duration) -> Self {
        match &mut self {
            Self::Move { delay, .. } | Self::Click { delay } | Self::SendKeys { delay, .. } => {
                *delay = value
            }
        }
        self
    }

    pub fn with_delay_secs(self, secs: u64) -> Self {
        self.with_delay(Duration::from_secs(secs))
    }

    pub fn delay(&self) -> Duration {
        match self {
            Self::Move { delay, .. } | Self::Click { delay } | Self::SendKeys { delay, .. } => {
                *delay
            }
        }
    }

    /// Short name for logging.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Move { .. } => "move",
            Self::Click { .. } => "click",
            Self::SendKeys { .. } => "send_keys",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Move { dx, dy, .. } => write!(f, "move({}, {})", dx, dy)?,
            Self::Click { .. } => f.write_str("click")?,
            // Keystrokes may be credentials.
            Self::SendKeys { keys, .. } => write!(f, "send_keys({} string(s))", keys.len())?,
        }
        let delay = self.delay();
        if !delay.is_zero() {
            write!(f, " then wait {:?}", delay)?;
        }
        Ok(())
    }
}

/// Wrap `actions` in a move to `point` and a move back, so the pointer ends
/// where it started.
pub fn anchored(point: Point, actions: Vec<Action>) -> Vec<Action> {
    let mut out = Vec::with_capacity(actions.len() + 2);
    out.push(Action::move_to(point));
    out.extend(actions);
    out.push(Action::move_back(point));
    out
}
