//! Scripted platform for driving a [`Shell`](crate::Shell) without a window
//! system.  Each `poll_events` call hands out the next queued batch.

use std::collections::VecDeque;

use lumen_gl::testing::RecordingDriver;

use crate::error::{Result, ShellError};
use crate::platform::{Platform, ShellEvent};

#[derive(Debug, Default)]
pub struct HeadlessPlatform {
    gl: RecordingDriver,
    framebuffer: (u32, u32),
    script: VecDeque<Vec<ShellEvent>>,
    swap_interval: Option<bool>,
    swaps: usize,
    polls: usize,
    fail_swaps: bool,
    fail_swap_interval: bool,
}

impl HeadlessPlatform {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            framebuffer: (width, height),
            ..Self::default()
        }
    }

    /// Queue the events returned by one future poll.
    pub fn queue(&mut self, batch: Vec<ShellEvent>) {
        self.script.push_back(batch);
    }

    pub fn fail_swaps(&mut self, fail: bool) {
        self.fail_swaps = fail;
    }

    pub fn fail_swap_interval(&mut self, fail: bool) {
        self.fail_swap_interval = fail;
    }

    /// Last interval applied, `None` if never set.
    pub fn swap_interval(&self) -> Option<bool> {
        self.swap_interval
    }

    /// Swap attempts, failed ones included.
    pub fn swaps(&self) -> usize {
        self.swaps
    }

    pub fn polls(&self) -> usize {
        self.polls
    }
}

impl Platform for HeadlessPlatform {
    type Gl = RecordingDriver;

    fn gl(&self) -> &RecordingDriver {
        &self.gl
    }

    fn name(&self) -> &str {
        "None"
    }

    fn framebuffer_size(&self) -> (u32, u32) {
        self.framebuffer
    }

    fn set_swap_interval(&mut self, vsync: bool) -> Result<()> {
        if self.fail_swap_interval {
            return Err(ShellError::Surface("headless swap interval refused".to_string()));
        }
        self.swap_interval = Some(vsync);
        Ok(())
    }

    fn swap_buffers(&mut self) -> Result<()> {
        self.swaps += 1;
        if self.fail_swaps {
            return Err(ShellError::Surface("headless swap failure".to_string()));
        }
        Ok(())
    }

    fn poll_events(&mut self, events: &mut Vec<ShellEvent>) {
        self.polls += 1;
        let batch = self.script.pop_front().unwrap_or_default();
        for event in &batch {
            if let ShellEvent::FramebufferSize { width, height } = *event {
                self.framebuffer = (width, height);
            }
        }
        events.extend(batch);
    }
}
