//! Scripted hardware backend for host-side runs and tests.
//!
//! Each [`SimFrame`] describes the probe environment for one loop iteration.
//! The backend moves to the next frame whenever the family-select channel is
//! sampled, which is the first thing every iteration does; the last frame
//! repeats once the script runs out.

use crate::display::DisplayState;
use crate::hardware::{
    AnalogSampler, Channel, Delay, EdgeCapture, HardwareError, Indicator, LineDriver,
};
use crate::oscillation::EdgeHandler;

/// How the external circuit treats the probe line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineBehavior {
    /// Actively held at a level, resisting the pull line
    Driven(bool),
    /// Nothing attached, follows whatever is forced
    Floating,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PullState {
    Released,
    High,
    Low,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimFrame {
    pub select: u16,
    pub probe: u16,
    pub line: LineBehavior,
    /// Line toggles fast enough to produce edges in any window
    pub toggling: bool,
}

impl SimFrame {
    pub fn driven(select: u16, probe: u16, level: bool) -> Self {
        Self {
            select,
            probe,
            line: LineBehavior::Driven(level),
            toggling: false,
        }
    }

    pub fn floating(select: u16, probe: u16) -> Self {
        Self {
            select,
            probe,
            line: LineBehavior::Floating,
            toggling: false,
        }
    }

    pub fn toggling(mut self) -> Self {
        self.toggling = true;
        self
    }
}

#[derive(Debug)]
pub struct SimulatedHardware {
    frames: Vec<SimFrame>,
    cursor: Option<usize>,
    pull: PullState,
    armed: bool,
    pending: bool,
    handler: Option<EdgeHandler>,
    shown: Vec<DisplayState>,
    elapsed_us: u64,
    edges_fired: u64,
}

impl SimulatedHardware {
    pub fn new(frames: Vec<SimFrame>) -> Self {
        Self {
            frames,
            cursor: None,
            pull: PullState::Released,
            armed: false,
            pending: false,
            handler: None,
            shown: Vec::new(),
            elapsed_us: 0,
            edges_fired: 0,
        }
    }

    fn frame(&self) -> Result<&SimFrame, HardwareError> {
        self.frames
            .get(self.cursor.unwrap_or(0))
            .ok_or_else(|| HardwareError::Backend("no frames scripted".to_string()))
    }

    fn advance(&mut self) {
        let last = self.frames.len().saturating_sub(1);
        self.cursor = Some(self.cursor.map_or(0, |c| (c + 1).min(last)));
    }

    fn fire(&mut self) {
        if let Some(handler) = &self.handler {
            handler.on_edge();
            self.edges_fired += 1;
        }
    }

    /// Every state handed to the indicator, oldest first
    pub fn shown(&self) -> &[DisplayState] {
        &self.shown
    }

    pub fn pull(&self) -> PullState {
        self.pull
    }

    pub fn is_armed(&self) -> bool {
        self.armed
    }

    pub fn elapsed_us(&self) -> u64 {
        self.elapsed_us
    }

    pub fn edges_fired(&self) -> u64 {
        self.edges_fired
    }
}

impl AnalogSampler for SimulatedHardware {
    fn sample(&mut self, channel: Channel) -> Result<u16, HardwareError> {
        if channel == Channel::FamilySelect {
            self.advance();
        }
        let frame = self.frame()?;
        Ok(match channel {
            Channel::FamilySelect => frame.select,
            Channel::Probe => frame.probe,
        })
    }
}

impl LineDriver for SimulatedHardware {
    fn drive_high(&mut self) -> Result<(), HardwareError> {
        self.pull = PullState::High;
        Ok(())
    }

    fn drive_low(&mut self) -> Result<(), HardwareError> {
        self.pull = PullState::Low;
        Ok(())
    }

    fn release(&mut self) -> Result<(), HardwareError> {
        self.pull = PullState::Released;
        Ok(())
    }

    fn read_level(&mut self) -> Result<bool, HardwareError> {
        let frame = self.frame()?;
        Ok(match (frame.line, self.pull) {
            (LineBehavior::Driven(level), _) => level,
            (LineBehavior::Floating, PullState::High) => true,
            (LineBehavior::Floating, PullState::Low) => false,
            (LineBehavior::Floating, PullState::Released) => frame.probe > 511,
        })
    }
}

impl EdgeCapture for SimulatedHardware {
    fn attach(&mut self, handler: EdgeHandler) {
        self.handler = Some(handler);
    }

    fn clear_pending(&mut self) -> Result<(), HardwareError> {
        self.pending = false;
        Ok(())
    }

    fn arm(&mut self, channel: Channel) -> Result<(), HardwareError> {
        if channel != Channel::Probe {
            return Err(HardwareError::Backend(format!(
                "edge capture is not wired to the {} channel",
                channel
            )));
        }
        self.armed = true;
        if self.pending {
            self.pending = false;
            self.fire();
        }
        Ok(())
    }

    fn disarm(&mut self, _channel: Channel) -> Result<(), HardwareError> {
        self.armed = false;
        Ok(())
    }
}

impl Indicator for SimulatedHardware {
    fn show(&mut self, state: DisplayState) -> Result<(), HardwareError> {
        self.shown.push(state);
        Ok(())
    }
}

impl Delay for SimulatedHardware {
    fn delay_us(&mut self, micros: u32) {
        self.elapsed_us += u64::from(micros);
        let toggling = self.frame().is_ok_and(|f| f.toggling);
        if !toggling {
            return;
        }
        if self.armed {
            self.fire();
        } else {
            self.pending = true;
        }
    }
}
