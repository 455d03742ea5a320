//! `Agent` — one venue visitor and its state machine.

use tracing::{debug, error, info, warn};
use vs_core::{AgentId, AgentRng, AreaMask, Point, RoomId, Tick};
use vs_nav::NavigationAdapter;
use vs_rooms::RoomView;

use crate::{AgentEnv, AgentError, AgentResult, AgentState, QueueRole, Transition};

// ── Scheduling and lifecycle ──────────────────────────────────────────────────

/// What the agent is waiting for before its next step.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Wake {
    /// A timer: step again at this tick.
    At(Tick),
    /// Step once the navigation adapter reports arrival.
    OnArrival,
    /// Step via [`Agent::on_service_complete`] when the counter finishes.
    OnServiceComplete,
    /// Nothing further (retired or never initialised).
    Never,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Lifecycle {
    /// Constructed but not yet initialised.
    Dormant,
    Active,
    /// Retired into a [`LifecyclePool`](crate::LifecyclePool); may respawn.
    Pooled,
    /// Retired without a pool, or failed initialisation.  Terminal.
    Destroyed,
}

/// How a room visit is spent.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum UsageMode {
    /// Walk between sampled points inside the room.
    InRoom,
    /// Roam around the room anchor.
    Outside,
}

/// Periodic behaviour owned by the current state.  Reset on every
/// transition, which is what cancels the previous state's timers.
#[derive(Copy, Clone, Debug, PartialEq)]
enum Activity {
    Idle,
    Wander { until: Tick },
    Usage { until: Tick, mode: UsageMode },
}

// ── Agent ─────────────────────────────────────────────────────────────────────

/// A single visitor.
///
/// The agent owns its navigation adapter and RNG; everything shared arrives
/// through [`AgentEnv`] at each call.  Methods return the agent's next
/// [`Wake`], which the caller must honour.  Timers carry the value of
/// [`epoch`](Self::epoch) at scheduling time; a timer whose epoch no longer
/// matches belongs to a state the agent has left and must be dropped.
pub struct Agent {
    id:               AgentId,
    state:            AgentState,
    assigned_room:    Option<RoomId>,
    in_queue:         bool,
    awaiting_service: bool,
    activity:         Activity,
    wake:             Wake,
    epoch:            u64,
    lifecycle:        Lifecycle,
    nav:              Option<Box<dyn NavigationAdapter>>,
    rng:              AgentRng,
    outbox:           Vec<Transition>,
}

impl Agent {
    /// A dormant agent.  `nav` may be `None`, in which case
    /// [`initialize`](Self::initialize) fails.
    pub fn new(id: AgentId, global_seed: u64, nav: Option<Box<dyn NavigationAdapter>>) -> Self {
        Self {
            id,
            state:            AgentState::MovingToQueue,
            assigned_room:    None,
            in_queue:         false,
            awaiting_service: false,
            activity:         Activity::Idle,
            wake:             Wake::Never,
            epoch:            0,
            lifecycle:        Lifecycle::Dormant,
            nav,
            rng:              AgentRng::new(global_seed, id),
            outbox:           Vec::new(),
        }
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    pub fn id(&self) -> AgentId {
        self.id
    }

    pub fn state(&self) -> AgentState {
        self.state
    }

    pub fn assigned_room(&self) -> Option<RoomId> {
        self.assigned_room
    }

    pub fn in_queue(&self) -> bool {
        self.in_queue
    }

    pub fn awaiting_service(&self) -> bool {
        self.awaiting_service
    }

    pub fn role(&self) -> QueueRole {
        QueueRole::for_room(self.assigned_room)
    }

    pub fn wake(&self) -> Wake {
        self.wake
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    pub fn lifecycle(&self) -> Lifecycle {
        self.lifecycle
    }

    pub fn is_active(&self) -> bool {
        self.lifecycle == Lifecycle::Active
    }

    pub fn usage_mode(&self) -> Option<UsageMode> {
        match self.activity {
            Activity::Usage { mode, .. } => Some(mode),
            _ => None,
        }
    }

    pub fn nav(&self) -> Option<&dyn NavigationAdapter> {
        self.nav.as_deref()
    }

    pub fn nav_mut(&mut self) -> Option<&mut (dyn NavigationAdapter + 'static)> {
        self.nav.as_deref_mut()
    }

    pub fn position(&self) -> Option<Point> {
        self.nav.as_deref().map(|n| n.position())
    }

    /// Status label for the current state.
    pub fn description(&self) -> String {
        self.state.description(self.assigned_room)
    }

    /// Take the transitions recorded since the last call.
    pub fn drain_transitions(&mut self) -> Vec<Transition> {
        std::mem::take(&mut self.outbox)
    }

    // ── Lifecycle ─────────────────────────────────────────────────────────

    /// Spawn (or respawn) at the environment's spawn anchor.
    ///
    /// Resets all visit state, then starts wandering or queueing at random.
    ///
    /// # Errors
    ///
    /// A missing navigation adapter, queue coordinator, or spawn anchor.  The
    /// agent is left [`Lifecycle::Destroyed`] and must not be stepped.
    pub fn initialize(&mut self, env: &AgentEnv<'_>, now: Tick) -> AgentResult<Wake> {
        let checked = match (self.nav.as_deref_mut(), env.queue, env.spawn_anchor) {
            (None, _, _)          => Err(AgentError::MissingNavigation(self.id)),
            (_, None, _)          => Err(AgentError::MissingQueue(self.id)),
            (_, _, None)          => Err(AgentError::MissingSpawnAnchor(self.id)),
            (Some(nav), Some(_), Some(spawn)) => {
                nav.warp(spawn);
                Ok(())
            }
        };
        if let Err(e) = checked {
            self.lifecycle = Lifecycle::Destroyed;
            self.wake = Wake::Never;
            return Err(e);
        }

        self.assigned_room = None;
        self.in_queue = false;
        self.awaiting_service = false;

        let wander = self.rng.gen_bool(env.behavior.initial_wander_prob);
        let first = if wander { AgentState::Wandering } else { AgentState::MovingToQueue };
        // Not yet active, so this is recorded as a spawn.
        self.transition(first, now);
        self.lifecycle = Lifecycle::Active;
        debug!(agent = %self.id, state = %first, "agent spawned");

        Ok(if wander {
            self.start_wandering(env, now)
        } else {
            self.try_join_queue(env, now)
        })
    }

    /// Advance the state machine after a timer fired or arrival was
    /// reported.
    pub fn step(&mut self, env: &AgentEnv<'_>, now: Tick) -> Wake {
        if !self.is_active() {
            return Wake::Never;
        }
        match self.state {
            AgentState::Wandering => self.wander_step(env, now),
            AgentState::MovingToQueue | AgentState::ReportingRoom => self.try_join_queue(env, now),
            AgentState::WaitingInQueue if self.awaiting_service => self.wake,
            AgentState::WaitingInQueue => self.poll_queue(env, now),
            AgentState::MovingToRoom => {
                if self.has_arrived() {
                    self.enter_using_room(env, now)
                } else {
                    self.set_wake(Wake::OnArrival)
                }
            }
            AgentState::UsingRoom => self.usage_step(env, now),
            AgentState::ReturningToSpawn => {
                if self.has_arrived() {
                    self.recycle(env, now, false)
                } else {
                    self.set_wake(Wake::OnArrival)
                }
            }
        }
    }

    /// The counter finished this agent's session.  Branches on the role:
    /// a vacancy report releases the held room and heads home, an assignment
    /// request tries to reserve a room.
    pub fn on_service_complete(&mut self, env: &AgentEnv<'_>, now: Tick) -> Wake {
        if !self.is_active() || !self.awaiting_service {
            return self.wake;
        }
        self.awaiting_service = false;
        self.in_queue = false;
        if let Some(queue) = env.queue {
            queue.leave(self.id);
        }

        match self.role() {
            QueueRole::VacancyReport => {
                if let Some(room) = self.assigned_room.take() {
                    if env.registry.release(room, self.id) {
                        info!(agent = %self.id, room = %room, "room reported vacant");
                    } else {
                        debug!(agent = %self.id, room = %room, "reported room was no longer held");
                    }
                }
                self.enter_returning(env, now)
            }
            QueueRole::Assignment => match env.registry.try_reserve_random(self.id, self.rng.inner()) {
                Some(room) => {
                    debug!(agent = %self.id, room = %room, "room assigned");
                    self.assigned_room = Some(room);
                    self.enter_moving_to_room(env, now)
                }
                None => {
                    debug!(agent = %self.id, "no free room");
                    self.wander_or_leave(env, now)
                }
            },
        }
    }

    /// The agent left the navigable surface: release everything and retire
    /// immediately, whatever the state.
    pub fn force_recycle(&mut self, env: &AgentEnv<'_>, now: Tick) -> Wake {
        if !self.is_active() {
            return Wake::Never;
        }
        warn!(agent = %self.id, state = %self.state, "agent left the navigable surface, recycling");
        self.recycle(env, now, true)
    }

    // ── Transitions ───────────────────────────────────────────────────────

    fn transition(&mut self, to: AgentState, now: Tick) {
        let from = self.is_active().then_some(self.state);
        self.activity = Activity::Idle;
        self.epoch += 1;
        self.state = to;
        debug!(
            agent  = %self.id,
            from   = ?from,
            to     = %to,
            status = %to.description(self.assigned_room),
            "state transition"
        );
        self.outbox.push(Transition {
            tick:  now,
            agent: self.id,
            from,
            to:    Some(to),
            room:  self.assigned_room,
        });
    }

    fn set_wake(&mut self, wake: Wake) -> Wake {
        self.wake = wake;
        wake
    }

    fn schedule_in(&mut self, env: &AgentEnv<'_>, now: Tick, secs: f32) -> Wake {
        let ticks = env.clock.ticks_for_secs(secs).max(1);
        self.set_wake(Wake::At(now + ticks))
    }

    fn has_arrived(&self) -> bool {
        self.nav.as_deref().map_or(true, |n| n.has_arrived())
    }

    fn wander_or_leave(&mut self, env: &AgentEnv<'_>, now: Tick) -> Wake {
        if self.rng.gen_bool(env.behavior.refusal_wander_prob) {
            self.enter_wandering(env, now)
        } else {
            self.enter_returning(env, now)
        }
    }

    // ── Wandering ─────────────────────────────────────────────────────────

    fn enter_wandering(&mut self, env: &AgentEnv<'_>, now: Tick) -> Wake {
        self.transition(AgentState::Wandering, now);
        self.start_wandering(env, now)
    }

    fn start_wandering(&mut self, env: &AgentEnv<'_>, now: Tick) -> Wake {
        let secs = self.rng.secs_between(env.behavior.wander_secs);
        let until = now + env.clock.ticks_for_secs(secs);
        self.activity = Activity::Wander { until };
        self.wander_step(env, now)
    }

    fn wander_step(&mut self, env: &AgentEnv<'_>, now: Tick) -> Wake {
        let until = match self.activity {
            Activity::Wander { until } => until,
            _ => now,
        };
        if now >= until {
            debug!(agent = %self.id, "wandering over, heading home");
            return self.enter_returning(env, now);
        }
        self.roam_on_ground(env);
        let wait = self.rng.secs_between(env.behavior.wander_step_secs);
        self.schedule_in(env, now, wait)
    }

    /// One free-roam destination on the Ground area around the agent.
    fn roam_on_ground(&mut self, env: &AgentEnv<'_>) {
        let Some(nav) = self.nav.as_deref_mut() else { return };
        if !nav.has_area(AreaMask::GROUND_AREA) {
            error!(agent = %self.id, "no Ground navigation area, skipping wander step");
            return;
        }
        let center = nav.position();
        let radius = env.behavior.free_roam_radius;
        match env.behavior.sampler().sample_free_roam(&*nav, center, radius, AreaMask::GROUND, &mut self.rng) {
            Some(point) => nav.set_destination(point),
            None => debug!(agent = %self.id, "no free-roam point found"),
        }
    }

    // ── Queue ─────────────────────────────────────────────────────────────

    fn try_join_queue(&mut self, env: &AgentEnv<'_>, now: Tick) -> Wake {
        let Some(queue) = env.queue else {
            return self.enter_returning(env, now);
        };
        if queue.try_join(self.id) {
            self.in_queue = true;
            self.transition(AgentState::WaitingInQueue, now);
            if let (Some(nav), Some(slot)) = (self.nav.as_deref_mut(), queue.slot_position(self.id)) {
                nav.set_destination(slot);
            }
            return self.schedule_in(env, now, env.behavior.queue_poll_secs);
        }

        match self.role() {
            QueueRole::Assignment => {
                debug!(agent = %self.id, "queue refused");
                self.wander_or_leave(env, now)
            }
            QueueRole::VacancyReport => {
                // Wait by the counter for a free place in line.
                if let Some(nav) = self.nav.as_deref_mut() {
                    nav.set_destination(queue.counter_position());
                }
                let wait = self.rng.secs_between(env.behavior.report_retry_secs);
                debug!(agent = %self.id, retry_in_secs = wait, "queue refused vacancy report, retrying");
                self.schedule_in(env, now, wait)
            }
        }
    }

    fn poll_queue(&mut self, env: &AgentEnv<'_>, now: Tick) -> Wake {
        let Some(queue) = env.queue else {
            return self.enter_returning(env, now);
        };
        let Some(slot) = queue.slot_position(self.id) else {
            warn!(agent = %self.id, "dropped from the queue before service");
            self.in_queue = false;
            return match self.role() {
                QueueRole::Assignment    => self.wander_or_leave(env, now),
                QueueRole::VacancyReport => self.enter_reporting(env, now),
            };
        };

        let arrived = match self.nav.as_deref_mut() {
            Some(nav) => {
                if nav.destination() != Some(slot) {
                    nav.set_destination(slot);
                }
                nav.has_arrived()
            }
            None => true,
        };
        if arrived && queue.can_receive_service(self.id) && queue.start_service(self.id, now) {
            self.awaiting_service = true;
            debug!(agent = %self.id, role = ?self.role(), "service started");
            return self.set_wake(Wake::OnServiceComplete);
        }
        self.schedule_in(env, now, env.behavior.queue_poll_secs)
    }

    // ── Room ──────────────────────────────────────────────────────────────

    fn enter_moving_to_room(&mut self, env: &AgentEnv<'_>, now: Tick) -> Wake {
        self.transition(AgentState::MovingToRoom, now);
        let anchor = self.assigned_room.and_then(|id| env.registry.lookup(id)).map(|v| v.anchor);
        // A room that vanished already is caught on arrival.
        if let (Some(nav), Some(anchor)) = (self.nav.as_deref_mut(), anchor) {
            nav.set_destination(anchor);
        }
        self.set_wake(Wake::OnArrival)
    }

    /// The assigned room, while the registry still lists this agent as its
    /// holder.
    fn held_room(&self, env: &AgentEnv<'_>) -> Option<RoomView> {
        self.assigned_room.and_then(|id| env.registry.lookup_held(id, self.id))
    }

    fn enter_using_room(&mut self, env: &AgentEnv<'_>, now: Tick) -> Wake {
        if self.held_room(env).is_none() {
            error!(
                agent = %self.id,
                room  = ?self.assigned_room,
                "assigned room is no longer held, skipping to vacancy report"
            );
            return self.enter_reporting(env, now);
        }

        self.transition(AgentState::UsingRoom, now);
        let secs = self.rng.secs_between(env.behavior.usage_secs);
        let until = now + env.clock.ticks_for_secs(secs);
        let mode = if self.rng.gen_bool(env.behavior.stay_in_room_prob) {
            UsageMode::InRoom
        } else {
            UsageMode::Outside
        };
        self.activity = Activity::Usage { until, mode };
        debug!(agent = %self.id, room = ?self.assigned_room, mode = ?mode, secs, "using room");
        self.usage_step(env, now)
    }

    fn usage_step(&mut self, env: &AgentEnv<'_>, now: Tick) -> Wake {
        let Activity::Usage { until, mode } = self.activity else {
            return self.enter_reporting(env, now);
        };
        if now >= until {
            debug!(agent = %self.id, room = ?self.assigned_room, "visit over");
            return self.enter_reporting(env, now);
        }
        let Some(room) = self.held_room(env) else {
            error!(agent = %self.id, room = ?self.assigned_room, "room lost during use");
            return self.enter_reporting(env, now);
        };
        let Some(nav) = self.nav.as_deref_mut() else {
            return self.enter_reporting(env, now);
        };
        let sampler = env.behavior.sampler();

        if mode == UsageMode::InRoom {
            match sampler.sample_within_radius(&*nav, room.anchor, room.size, AreaMask::ALL, &mut self.rng) {
                Some(point) => {
                    nav.set_destination(point);
                    let wait = self.rng.secs_between(env.behavior.in_room_step_secs);
                    return self.schedule_in(env, now, wait);
                }
                None => {
                    warn!(agent = %self.id, room = %room.id, "no walkable point inside room, wandering outside");
                    self.activity = Activity::Usage { until, mode: UsageMode::Outside };
                }
            }
        }

        let level = nav.position().y;
        let radius = env.behavior.outside_radius;
        if let Some(point) =
            sampler.sample_free_roam_level(&*nav, room.anchor, radius, level, AreaMask::ALL, &mut self.rng)
        {
            nav.set_destination(point);
        }
        let wait = self.rng.secs_between(env.behavior.outside_step_secs);
        self.schedule_in(env, now, wait)
    }

    /// Queue again, this time to report the held room vacant.  The room
    /// stays reserved until the counter has processed the report.
    fn enter_reporting(&mut self, env: &AgentEnv<'_>, now: Tick) -> Wake {
        self.transition(AgentState::ReportingRoom, now);
        self.try_join_queue(env, now)
    }

    // ── Leaving ───────────────────────────────────────────────────────────

    fn enter_returning(&mut self, env: &AgentEnv<'_>, now: Tick) -> Wake {
        self.transition(AgentState::ReturningToSpawn, now);
        if let (Some(nav), Some(spawn)) = (self.nav.as_deref_mut(), env.spawn_anchor) {
            nav.set_destination(spawn);
        }
        self.set_wake(Wake::OnArrival)
    }

    fn recycle(&mut self, env: &AgentEnv<'_>, now: Tick, forced: bool) -> Wake {
        self.cleanup(env);
        self.outbox.push(Transition {
            tick:  now,
            agent: self.id,
            from:  Some(self.state),
            to:    None,
            room:  None,
        });
        self.lifecycle = match env.pool {
            Some(pool) => {
                pool.return_to_pool(self.id);
                Lifecycle::Pooled
            }
            None => Lifecycle::Destroyed,
        };
        info!(agent = %self.id, forced, lifecycle = ?self.lifecycle, "agent retired");
        self.set_wake(Wake::Never)
    }

    /// Shared by normal and forced recycling: cancel behaviour, give back
    /// the room, and get out of the queue.
    fn cleanup(&mut self, env: &AgentEnv<'_>) {
        self.activity = Activity::Idle;
        self.epoch += 1;
        if let Some(room) = self.assigned_room.take() {
            if env.registry.release(room, self.id) {
                info!(agent = %self.id, room = %room, "released held room during cleanup");
            }
        }
        self.in_queue = false;
        self.awaiting_service = false;
        if let Some(queue) = env.queue {
            queue.leave(self.id);
        }
    }
}
