//! The control loop.
//!
//! Two periodic timers post events into one intake; a single loop drains it
//! and renders the active screen whenever no event is pending.
//!
//! ```text
//!  update timer ──┐
//!                 ├──► EventIntake ──► Scheduler::step ──► Draw ─► encode ─► transmit
//!  switch timer ──┘                         │
//!                                           ├── Update  → every screen's update()
//!                                           └── Switch  → next screen
//! ```
//!
//! Each event kind has a one-slot channel. A tick that finds its slot full
//! is dropped, so at most one event of each kind is ever pending.
//!
//! The loop itself is blocking (bus I/O and sleeps) and runs on a dedicated
//! thread; the timers are tokio tasks.

use std::sync::Arc;
use std::thread;
use std::time::Duration;

use log::{debug, trace, warn};
use tokio::sync::mpsc::{self, error::TryRecvError, error::TrySendError};
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};

use crate::canvas::Canvas;
use crate::config::SchedulerConfig;
use crate::frame::{Frame, FrameMirror};
use crate::manager::ScreenManager;
use crate::panel::{encode, Panel};
use crate::traits::{BusDevice, Publisher};

// ============================================================================
// Events
// ============================================================================

/// Something the control loop must handle before the next render.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Event {
    /// Refresh every screen's state.
    Update,
    /// Advance to the next screen.
    Switch,
}

/// Posting side of the event intake. Cheap to clone.
#[derive(Clone, Debug)]
pub struct EventSender {
    update: mpsc::Sender<()>,
    switch: mpsc::Sender<()>,
}

impl EventSender {
    /// Posts an event without waiting.
    ///
    /// Returns `false` if an event of the same kind is already pending (the
    /// new one is coalesced into it) or the loop is gone.
    pub fn post(&self, event: Event) -> bool {
        let tx = match event {
            Event::Update => &self.update,
            Event::Switch => &self.switch,
        };
        match tx.try_send(()) {
            Ok(()) => true,
            Err(TrySendError::Full(())) => {
                trace!("{:?} already pending", event);
                false
            }
            Err(TrySendError::Closed(())) => false,
        }
    }
}

/// Receiving side of the event intake, owned by the control loop.
#[derive(Debug)]
pub struct EventIntake {
    update: mpsc::Receiver<()>,
    switch: mpsc::Receiver<()>,
}

impl EventIntake {
    /// Takes one pending event without waiting. Updates are checked first.
    pub fn poll(&mut self) -> Option<Event> {
        if take(&mut self.update) {
            return Some(Event::Update);
        }
        if take(&mut self.switch) {
            return Some(Event::Switch);
        }
        None
    }
}

fn take(rx: &mut mpsc::Receiver<()>) -> bool {
    match rx.try_recv() {
        Ok(()) => true,
        Err(TryRecvError::Empty | TryRecvError::Disconnected) => false,
    }
}

/// Creates a connected sender/intake pair.
pub fn event_channel() -> (EventSender, EventIntake) {
    let (update_tx, update_rx) = mpsc::channel(1);
    let (switch_tx, switch_rx) = mpsc::channel(1);
    (
        EventSender {
            update: update_tx,
            switch: switch_tx,
        },
        EventIntake {
            update: update_rx,
            switch: switch_rx,
        },
    )
}

/// Spawns the update and switch timers on the current tokio runtime.
///
/// The first tick of each timer fires one full period after the call.
pub fn spawn_timers(sender: EventSender, config: &SchedulerConfig) -> [JoinHandle<()>; 2] {
    debug!(
        "starting timers: update every {:?}, switch every {:?}",
        config.update_period(),
        config.switch_period()
    );
    [
        tokio::spawn(tick(sender.clone(), Event::Update, config.update_period())),
        tokio::spawn(tick(sender, Event::Switch, config.switch_period())),
    ]
}

async fn tick(sender: EventSender, event: Event, period: Duration) {
    let mut interval = interval_at(Instant::now() + period, period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
    loop {
        interval.tick().await;
        sender.post(event);
        if sender.update.is_closed() {
            debug!("control loop gone, stopping {:?} timer", event);
            return;
        }
    }
}

// ============================================================================
// Control Loop
// ============================================================================

/// What one [`Scheduler::step`] did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Step {
    /// Ran every screen's update.
    Updated,
    /// Switched to the next screen.
    Switched,
    /// Drew, encoded and transmitted the active screen.
    Rendered,
    /// Drew and encoded, but the bus rejected the frame.
    RenderFailed,
}

/// Owns the manager, the panel and the canvas; the only caller of draw,
/// encode and transmit.
pub struct Scheduler<B> {
    manager: ScreenManager,
    panel: Panel<B>,
    canvas: Canvas,
    mirror: Arc<FrameMirror>,
    last_frame: Frame,
    intake: EventIntake,
    frame_interval: Duration,
}

impl<B: BusDevice> Scheduler<B> {
    /// Assembles a loop. The canvas takes the panel's geometry.
    pub fn new(
        manager: ScreenManager,
        panel: Panel<B>,
        mirror: Arc<FrameMirror>,
        intake: EventIntake,
        frame_interval: Duration,
    ) -> Self {
        let (w, h) = (panel.width(), panel.height());
        Self {
            manager,
            panel,
            canvas: Canvas::new(w, h),
            mirror,
            last_frame: Frame::blank(w, h),
            intake,
            frame_interval,
        }
    }

    /// The screen manager.
    pub fn manager(&self) -> &ScreenManager {
        &self.manager
    }

    /// The panel.
    pub fn panel(&self) -> &Panel<B> {
        &self.panel
    }

    /// Mutable access to the panel.
    pub fn panel_mut(&mut self) -> &mut Panel<B> {
        &mut self.panel
    }

    /// The most recently encoded frame.
    pub fn last_frame(&self) -> &Frame {
        &self.last_frame
    }

    /// Runs one iteration: services one pending event, or renders once.
    pub fn step(&mut self) -> Step {
        match self.intake.poll() {
            Some(Event::Update) => {
                let publisher = Publisher::new(&self.mirror, &self.last_frame);
                self.manager.update_all(&publisher);
                Step::Updated
            }
            Some(Event::Switch) => {
                self.manager.next();
                Step::Switched
            }
            None => self.render(),
        }
    }

    /// Loops forever, sleeping one frame interval after every render.
    pub fn run(mut self) -> ! {
        debug!("control loop started ({} screens)", self.manager.len());
        loop {
            match self.step() {
                Step::Rendered | Step::RenderFailed => thread::sleep(self.frame_interval),
                Step::Updated | Step::Switched => {}
            }
        }
    }

    fn render(&mut self) -> Step {
        self.manager.current().draw(&mut self.canvas);
        self.last_frame = encode(&self.canvas);
        match self.panel.transmit(&self.last_frame) {
            Ok(()) => Step::Rendered,
            Err(e) => {
                warn!("dropped frame for {}: {}", self.manager.current().name(), e);
                Step::RenderFailed
            }
        }
    }
}

impl<B> core::fmt::Debug for Scheduler<B> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Scheduler")
            .field("manager", &self.manager)
            .field("frame_interval", &self.frame_interval)
            .finish_non_exhaustive()
    }
}
