//! Off-screen display surface
//!
//! Plays back a script of input batches, one batch per frame, and keeps the
//! last presented frame for inspection. Once the script runs out it reports
//! [`SurfaceEvent::Quit`] so a loop driven by it always terminates.

use std::collections::VecDeque;

use tiny_skia::Pixmap;

use crate::platform::{DisplaySurface, SurfaceError, SurfaceEvent, check_frame_size};

#[derive(Debug)]
pub struct HeadlessSurface {
    width: u32,
    height: u32,
    script: VecDeque<Vec<SurfaceEvent>>,
    presented: usize,
    last_frame: Option<Pixmap>,
}

impl HeadlessSurface {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            script: VecDeque::new(),
            presented: 0,
            last_frame: None,
        }
    }

    /// Queues the events returned by one future poll
    pub fn push_frame(&mut self, events: Vec<SurfaceEvent>) -> &mut Self {
        self.script.push_back(events);
        self
    }

    /// Queues `count` polls with no input
    pub fn idle_frames(&mut self, count: usize) -> &mut Self {
        for _ in 0..count {
            self.script.push_back(Vec::new());
        }
        self
    }

    pub fn presented(&self) -> usize {
        self.presented
    }

    pub fn last_frame(&self) -> Option<&Pixmap> {
        self.last_frame.as_ref()
    }
}

impl DisplaySurface for HeadlessSurface {
    fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn poll_events(&mut self) -> Result<Vec<SurfaceEvent>, SurfaceError> {
        Ok(self
            .script
            .pop_front()
            .unwrap_or_else(|| vec![SurfaceEvent::Quit]))
    }

    fn present(&mut self, frame: &Pixmap) -> Result<(), SurfaceError> {
        check_frame_size(frame, self.size())?;
        self.presented += 1;
        match &mut self.last_frame {
            Some(last) => last.data_mut().copy_from_slice(frame.data()),
            None => self.last_frame = Some(frame.clone()),
        }
        Ok(())
    }
}
