use crate::CancelToken;

/// Result of one [`ScrollSettle::poll`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SettleStatus {
    /// Nothing is being waited on.
    Idle,
    /// The sentinel moved since the previous frame.
    Pending,
    /// The sentinel held still across two consecutive frames. Reported once per wait.
    Settled,
}

#[derive(Clone, Debug)]
struct Wait {
    token: CancelToken,
    last: f64,
}

/// Frame-polled "wait for scroll to stop" detector.
///
/// Started when the rendered body leaves the viewport (typically a scrollbar drag that outruns
/// the visibility watcher). The host samples the top sentinel once per animation frame; equality
/// between consecutive samples means scrolling stopped. No timers are involved.
#[derive(Clone, Debug, Default)]
pub struct ScrollSettle {
    wait: Option<Wait>,
}

impl ScrollSettle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_pending(&self) -> bool {
        self.wait
            .as_ref()
            .is_some_and(|w| !w.token.is_cancelled())
    }

    /// Starts waiting from the sentinel at `position`.
    ///
    /// A wait already in progress is replaced: its token is cancelled and the sample restarts,
    /// so overlapping drag events still settle only once.
    pub fn start(&mut self, position: f64) -> CancelToken {
        if let Some(prev) = self.wait.take() {
            prev.token.cancel();
        }
        let token = CancelToken::new();
        vtrace!(position, "ScrollSettle::start");
        self.wait = Some(Wait {
            token: token.clone(),
            last: position,
        });
        token
    }

    /// Feeds this frame's sentinel position.
    pub fn poll(&mut self, position: f64) -> SettleStatus {
        let Some(wait) = self.wait.as_mut() else {
            return SettleStatus::Idle;
        };
        if wait.token.is_cancelled() {
            self.wait = None;
            return SettleStatus::Idle;
        }
        if wait.last == position {
            vtrace!(position, "ScrollSettle: settled");
            self.wait = None;
            return SettleStatus::Settled;
        }
        wait.last = position;
        SettleStatus::Pending
    }

    pub fn cancel(&mut self) {
        if let Some(wait) = self.wait.take() {
            wait.token.cancel();
        }
    }
}
