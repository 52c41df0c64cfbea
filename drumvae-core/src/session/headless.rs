use crate::{
    audio::sequencer::{ManualClock, StepSequencer},
    foundation::core::{LATENT_DIMS, Point, TimeMs},
    foundation::error::{DrumVaeError, DrumVaeResult},
    model::pattern::{Cell, Gate},
    render::backend::{BackendKind, FrameRGBA, RenderBackend, RenderSettings, create_backend},
    render::plan::DrawList,
    scene::composer::SceneComposer,
    session::fixture::{DueReply, FixtureReply, FixtureServer},
    session::script::{SessionEvent, SessionScript, TimedEvent},
};

/// Drives a [`SceneComposer`] from a [`SessionScript`] without a browser: a manual clock stands
/// in for wall time, a [`StepSequencer`] for audio and a [`FixtureServer`] for the network.
pub struct HeadlessSession {
    script: SessionScript,
    events: Vec<TimedEvent>,
    next_event: usize,
    now: TimeMs,
    clock: ManualClock,
    sequencer: StepSequencer,
    server: FixtureServer,
    composer: SceneComposer,
    backend: Box<dyn RenderBackend>,
}

impl HeadlessSession {
    pub fn new(script: SessionScript, settings: &RenderSettings) -> DrumVaeResult<Self> {
        script.validate()?;

        let clock = ManualClock::new();
        let sequencer = StepSequencer::new(clock.clone(), script.config.bpm);
        let server = FixtureServer::new(
            clock.clone(),
            script.latency_ms,
            script.config.seed,
            script.responses.iter().cloned(),
        );
        let mut composer = SceneComposer::new(
            script.config.clone(),
            script.viewport,
            Box::new(sequencer.clone()),
            Box::new(server.clone()),
        )?;
        composer.start()?;

        let mut events = script.events.clone();
        events.sort_by(|a, b| a.at_ms.total_cmp(&b.at_ms));

        let backend = create_backend(BackendKind::Cpu, settings)?;
        Ok(Self {
            script,
            events,
            next_event: 0,
            now: TimeMs(0.0),
            clock,
            sequencer,
            server,
            composer,
            backend,
        })
    }

    pub fn script(&self) -> &SessionScript {
        &self.script
    }

    pub fn composer(&self) -> &SceneComposer {
        &self.composer
    }

    pub fn composer_mut(&mut self) -> &mut SceneComposer {
        &mut self.composer
    }

    pub fn sequencer(&self) -> &StepSequencer {
        &self.sequencer
    }

    pub fn server(&self) -> &FixtureServer {
        &self.server
    }

    pub fn now(&self) -> TimeMs {
        self.now
    }

    /// Apply every scripted event and server reply up to `now`, in time order.
    pub fn advance_to(&mut self, now: TimeMs) -> DrumVaeResult<()> {
        if now < self.now {
            return Err(DrumVaeError::validation(format!(
                "session time cannot go backwards ({} -> {})",
                self.now.0, now.0
            )));
        }
        while let Some(ev) = self.events.get(self.next_event) {
            if ev.at_ms > now.0 {
                break;
            }
            let at = TimeMs(ev.at_ms);
            let event = ev.event.clone();
            self.next_event += 1;
            self.deliver_until(at)?;
            self.clock.set(at);
            self.apply(&event)?;
        }
        self.deliver_until(now)?;
        self.clock.set(now);
        self.now = now;
        Ok(())
    }

    /// Deliver replies in due order; replies to requests issued while delivering are picked up
    /// too when already due.
    fn deliver_until(&mut self, t: TimeMs) -> DrumVaeResult<()> {
        loop {
            let replies = self.server.take_due(t);
            if replies.is_empty() {
                return Ok(());
            }
            for DueReply { due, ticket, reply } in replies {
                self.clock.set(due);
                match reply {
                    FixtureReply::Respond(r) => {
                        let outcome = self.composer.on_response(ticket, r)?;
                        tracing::debug!(seq = ticket.seq, ?outcome, "fixture reply delivered");
                    }
                    FixtureReply::Fail(reason) => self.composer.on_request_failed(ticket, &reason),
                }
            }
        }
    }

    fn apply(&mut self, event: &SessionEvent) -> DrumVaeResult<()> {
        tracing::debug!(?event, at = self.clock.now().0, "session event");
        let c = &mut self.composer;
        match *event {
            SessionEvent::DismissSplash => c.dismiss_splash(),
            SessionEvent::Press { x, y } => c.pointer_down(Point::new(x, y))?,
            SessionEvent::Move { x, y } => c.pointer_move(Point::new(x, y))?,
            SessionEvent::Release { x, y } => c.pointer_up(Point::new(x, y))?,
            SessionEvent::PressCell { step, channel } => {
                let p = c.cell_point(Cell::new(step, channel)?);
                c.pointer_move(p)?;
                c.pointer_down(p)?;
                c.pointer_up(p)?;
            }
            SessionEvent::DragLatent { dim, value } => {
                if dim >= LATENT_DIMS {
                    return Err(DrumVaeError::validation(format!(
                        "drag dimension {dim} out of range 0..{LATENT_DIMS}"
                    )));
                }
                let from = c.latent_point(dim, 0.0);
                let to = c.latent_point(dim, value);
                c.pointer_down(from)?;
                c.pointer_move(to)?;
                c.pointer_up(to)?;
            }
            SessionEvent::Key { key } => c.key(key)?,
            SessionEvent::SetGate { gate } => c.set_gate(Gate::new(gate)?)?,
            SessionEvent::SetTempo { bpm } => c.set_tempo(bpm)?,
        }
        Ok(())
    }

    /// Advance to `now` and build that frame's draw list.
    pub fn plan_at(&mut self, now: TimeMs) -> DrumVaeResult<DrawList> {
        self.advance_to(now)?;
        self.composer.frame(now)
    }

    #[tracing::instrument(skip(self), fields(t = now.0))]
    pub fn render_frame_at(&mut self, now: TimeMs) -> DrumVaeResult<FrameRGBA> {
        let list = self.plan_at(now)?;
        self.backend.render_list(&list)
    }

    /// Render every frame of the script, handing each to `sink` as it is produced.
    pub fn render_frames_with(
        &mut self,
        mut sink: impl FnMut(u64, FrameRGBA) -> DrumVaeResult<()>,
    ) -> DrumVaeResult<()> {
        let count = self.script.frame_count();
        let interval = self.script.frame_interval_ms();
        tracing::info!(frames = count, fps = self.script.fps, "rendering session");
        for i in 0..count {
            let frame = self.render_frame_at(TimeMs(i as f64 * interval))?;
            sink(i, frame)?;
        }
        Ok(())
    }

    /// Render every frame of the script into memory.
    pub fn render_frames(&mut self) -> DrumVaeResult<Vec<FrameRGBA>> {
        let mut out = Vec::with_capacity(self.script.frame_count() as usize);
        self.render_frames_with(|_, f| {
            out.push(f);
            Ok(())
        })?;
        Ok(out)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/headless.rs"]
mod tests;
