#![forbid(unsafe_code)]

//! The proof view: session state machine, layout and gesture routing.
//!
//! # Session states
//!
//! | State    | Condition                    | Renders                          |
//! |----------|------------------------------|----------------------------------|
//! | Loading  | no snapshot delivered yet    | loading label                    |
//! | Active   | `is_finished == false`       | hypotheses, separators, goals    |
//! | Finished | a finished snapshot was seen | completion label and exit button |
//!
//! Finished is terminal until unmount. Active is re-entered on every
//! non-finishing snapshot.
//!
//! # Layout (Active)
//!
//! ```text
//!   H: A                hypotheses, snapshot order
//!   H2: A -> B
//! ──────────────(1/2)
//!   C                   goals reversed: deepest first
//! ──────────────(2/2)
//!   B                   current goal, the only goal drop target
//! ```
//!
//! # Input
//!
//! Raw events go through a [`GestureRecognizer`]. A drag that starts on a
//! hypothesis carries its name; each hover tick re-runs the accept test of
//! the target under the pointer; release commits only if that test passed.
//! Right click opens the entity's suggestion menu at the pointer, double
//! click runs its default suggestion, `Ctrl+Z` submits the undo tactic.
//!
//! The view keeps no copy of proof content: only the bridge's snapshot, the
//! snapshot it last drew (to resolve pointer positions), and transient UI
//! state.

use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::sync::Arc;

use pdeck_core::engine::ProofEngine;
use pdeck_core::event::{Event, KeyCode, KeyEvent, KeyEventKind, MouseButton};
use pdeck_core::geometry::{Position, Rect};
use pdeck_core::gesture::GestureRecognizer;
use pdeck_core::semantic_event::SemanticEvent;
use pdeck_core::state::ProofState;
use pdeck_core::tactic::Entity;
use pdeck_render::cell::CellFlags;
use pdeck_render::frame::{Frame, HitData, HitGrid, HitId, HitRegion};
use pdeck_runtime::bridge::StateBridge;
use pdeck_runtime::config::ViewConfig;
use pdeck_runtime::program::{Cmd, Model};
use pdeck_widgets::button::Button;
use pdeck_widgets::dnd::{DndManager, DragPayload, DragSource, DropOutcome, DropTarget};
use pdeck_widgets::goal::{GoalRow, GoalSeparator};
use pdeck_widgets::hypothesis::HypothesisRow;
use pdeck_widgets::menu::ContextMenu;
use pdeck_widgets::{Affordance, Widget};
use tracing::{debug, info};
use web_time::Instant;

use crate::translator::{CommitOutcome, Translator};

/// Hit id of hypothesis rows; data is the index into `monitor.hyps`.
pub const HYP_HIT: HitId = HitId::new(1);
/// Hit id of the current goal row.
pub const GOAL_HIT: HitId = HitId::new(2);
/// Hit id of the open menu; row data is the item index.
pub const MENU_HIT: HitId = HitId::new(3);
/// Hit id of the exit button.
pub const EXIT_HIT: HitId = HitId::new(4);

// ---------------------------------------------------------------------------
// Options and messages
// ---------------------------------------------------------------------------

/// What the host passes to [`ProofView::mount`].
pub struct ViewOptions {
    on_finish: Box<dyn FnOnce()>,
    config: ViewConfig,
}

impl ViewOptions {
    /// `on_finish` runs once, when the user acknowledges a finished session.
    pub fn new(on_finish: impl FnOnce() + 'static) -> Self {
        Self {
            on_finish: Box::new(on_finish),
            config: ViewConfig::default(),
        }
    }

    #[must_use]
    pub fn config(mut self, config: ViewConfig) -> Self {
        self.config = config;
        self
    }
}

impl std::fmt::Debug for ViewOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ViewOptions")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

/// Messages understood by [`ProofView`].
#[derive(Debug, Clone)]
pub enum Msg {
    /// A raw input event, timestamped on arrival.
    Input(Event, Instant),
    /// Tear down the engine subscription and any pending gesture.
    Unmount,
}

impl From<Event> for Msg {
    fn from(event: Event) -> Self {
        Self::Input(event, Instant::now())
    }
}

/// Session state derived from the latest snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Session {
    Loading,
    Active(Arc<ProofState>),
    Finished,
}

// ---------------------------------------------------------------------------
// Drag-and-drop capabilities
// ---------------------------------------------------------------------------

struct HypSource<'a>(&'a str);

impl DragSource for HypSource<'_> {
    fn drag_payload(&self) -> Option<DragPayload> {
        Some(DragPayload::new(self.0))
    }
}

/// A hypothesis or the current goal, as seen by the drag manager.
struct EntityTarget<'a> {
    entity: Entity,
    translator: &'a Translator,
}

impl<'a> EntityTarget<'a> {
    fn resolve(entity: Option<Entity>, translator: &'a Translator) -> Option<Self> {
        entity.map(|entity| Self { entity, translator })
    }
}

impl DropTarget for EntityTarget<'_> {
    type Key = Entity;

    fn key(&self) -> Entity {
        self.entity.clone()
    }

    fn can_accept(&self, payload: &DragPayload) -> bool {
        self.translator.is_legal_drop(&payload.source, &self.entity)
    }

    fn on_drop(&self, payload: &DragPayload) {
        self.translator.commit_drop(&payload.source, &self.entity);
    }
}

// ---------------------------------------------------------------------------
// ProofView
// ---------------------------------------------------------------------------

/// The mounted proof view. Implements [`Model`].
pub struct ProofView {
    translator: Translator,
    bridge: StateBridge,
    config: ViewConfig,
    on_finish: Option<Box<dyn FnOnce()>>,
    gestures: GestureRecognizer,
    dnd: DndManager<Entity>,
    menu: Option<ContextMenu>,
    finished: Cell<bool>,
    drawn: RefCell<Drawn>,
    last_outcome: Option<CommitOutcome>,
}

/// What the last render put on screen.
#[derive(Default)]
struct Drawn {
    state: Option<Arc<ProofState>>,
    hits: Option<HitGrid>,
}

impl ProofView {
    /// Subscribe to `engine` and build the view.
    pub fn mount<E: ProofEngine + 'static>(engine: E, options: ViewOptions) -> Self {
        Self::mount_rc(Rc::new(engine), options)
    }

    /// [`mount`](Self::mount) for an engine that is already shared.
    pub fn mount_rc(engine: Rc<dyn ProofEngine>, options: ViewOptions) -> Self {
        let ViewOptions { on_finish, config } = options;
        let mut bridge = StateBridge::new();
        bridge.activate(engine.as_ref());
        info!(policy = ?config.commit_policy, "proof view mounted");
        Self {
            translator: Translator::new(engine, config.commit_policy),
            bridge,
            gestures: GestureRecognizer::new(config.to_gesture_config()),
            config,
            on_finish: Some(on_finish),
            dnd: DndManager::new(),
            menu: None,
            finished: Cell::new(false),
            drawn: RefCell::new(Drawn::default()),
            last_outcome: None,
        }
    }

    /// Drop the subscription and any gesture in flight. Idempotent.
    pub fn unmount(&mut self) {
        if !self.bridge.is_active() {
            return;
        }
        self.dnd.cancel();
        self.gestures.reset();
        self.menu = None;
        self.bridge.deactivate();
        info!("proof view unmounted");
    }

    #[must_use]
    pub fn is_mounted(&self) -> bool {
        self.bridge.is_active()
    }

    /// Current session state. Latches Finished.
    #[must_use]
    pub fn session(&self) -> Session {
        if self.finished.get() {
            return Session::Finished;
        }
        match self.bridge.snapshot() {
            None => Session::Loading,
            Some(state) if state.is_finished => {
                self.finished.set(true);
                Session::Finished
            }
            Some(state) => Session::Active(state),
        }
    }

    #[must_use]
    pub fn translator(&self) -> &Translator {
        &self.translator
    }

    #[must_use]
    pub fn menu(&self) -> Option<&ContextMenu> {
        self.menu.as_ref()
    }

    #[must_use]
    pub fn is_dragging(&self) -> bool {
        self.dnd.is_active()
    }

    /// Hovered drop target and its latest accept result.
    #[must_use]
    pub fn hover(&self) -> Option<(Entity, bool)> {
        self.dnd.hovered().map(|(e, ok)| (e.clone(), ok))
    }

    /// Result of the most recent menu pick, default action or undo.
    #[must_use]
    pub fn last_outcome(&self) -> Option<&CommitOutcome> {
        self.last_outcome.as_ref()
    }

    // -- pointer resolution ----------------------------------------------

    fn hit_at(&self, pos: Position) -> Option<(HitId, HitRegion, HitData)> {
        self.drawn
            .borrow()
            .hits
            .as_ref()
            .and_then(|grid| grid.hit_test(pos.x, pos.y))
    }

    /// The hypothesis or current goal drawn at `pos`.
    fn entity_at(&self, pos: Position) -> Option<Entity> {
        let (id, _, data) = self.hit_at(pos)?;
        match id {
            HYP_HIT => {
                let drawn = self.drawn.borrow();
                let state = drawn.state.as_ref()?;
                let hyp = state.monitor.hyps.get(usize::try_from(data).ok()?)?;
                Some(Entity::hyp(hyp.name.clone()))
            }
            GOAL_HIT => Some(Entity::Goal),
            _ => None,
        }
    }

    // -- update helpers --------------------------------------------------

    fn finish(&mut self) {
        if let Some(on_finish) = self.on_finish.take() {
            info!("session acknowledged");
            on_finish();
        }
    }

    fn handle_menu_key(&mut self, key: &KeyEvent) -> bool {
        let Some(menu) = self.menu.as_mut() else {
            return false;
        };
        match key.code {
            KeyCode::Up => menu.select_prev(),
            KeyCode::Down => menu.select_next(),
            KeyCode::Escape => self.menu = None,
            KeyCode::Enter => {
                if let Some(index) = menu.selected_index() {
                    self.run_menu_item(index);
                }
            }
            _ => {}
        }
        true
    }

    fn run_menu_item(&mut self, index: usize) {
        let Some(menu) = self.menu.take() else {
            return;
        };
        if let Some(item) = menu.item(index) {
            let outcome = self.translator.run_suggestion(menu.entity(), &item.fragment);
            self.last_outcome = Some(outcome);
        }
    }

    fn open_menu(&mut self, pos: Position) {
        self.menu = None;
        let Some(entity) = self.entity_at(pos) else {
            return;
        };
        let items = self.translator.suggestions_for(&entity);
        debug!(entity = %entity, items = items.len(), "menu opened");
        self.menu = Some(ContextMenu::open(entity, pos, items));
    }

    fn handle_key(&mut self, key: &KeyEvent) {
        if key.kind == KeyEventKind::Release {
            return;
        }
        if matches!(self.session(), Session::Finished) {
            if key.code == KeyCode::Enter {
                self.finish();
            }
            return;
        }
        if self.handle_menu_key(key) {
            return;
        }
        let active = matches!(self.session(), Session::Active(_));
        if active && key.ctrl() && key.is_char('z') && !self.dnd.is_active() {
            let undo = self.config.undo_tactic.clone();
            self.last_outcome = Some(self.translator.run_command(&undo));
        }
    }

    fn handle_semantic(&mut self, event: SemanticEvent) {
        match event {
            SemanticEvent::Click {
                pos,
                button: MouseButton::Left,
            } => self.handle_click(pos),
            SemanticEvent::Click { .. } => {}
            SemanticEvent::DoubleClick { pos } => {
                if self.menu.is_some() {
                    self.handle_click(pos);
                    return;
                }
                if let Some(entity) = self.entity_at(pos) {
                    self.last_outcome = Some(self.translator.run_default_action(&entity));
                }
            }
            // No menu over a live drag.
            SemanticEvent::ContextMenu { .. } if self.dnd.is_active() => {}
            SemanticEvent::ContextMenu { pos } => self.open_menu(pos),
            SemanticEvent::DragStart {
                pos,
                button: MouseButton::Left,
            } => {
                self.menu = None;
                if let Some(Entity::Hypothesis(name)) = self.entity_at(pos) {
                    self.dnd.begin(&HypSource(&name));
                }
            }
            SemanticEvent::DragStart { .. } => {}
            SemanticEvent::DragMove { current, .. } => {
                if self.dnd.is_active() {
                    let target = EntityTarget::resolve(self.entity_at(current), &self.translator);
                    self.dnd.hover(target.as_ref());
                }
            }
            SemanticEvent::DragEnd { end, .. } => {
                if self.dnd.is_active() {
                    let target = EntityTarget::resolve(self.entity_at(end), &self.translator);
                    if let DropOutcome::Rejected(entity) = self.dnd.release(target.as_ref()) {
                        debug!(target = %entity, "drop refused in view");
                    }
                }
            }
            SemanticEvent::DragCancel => {
                self.dnd.cancel();
            }
        }
    }

    fn handle_click(&mut self, pos: Position) {
        if self.menu.is_some() {
            // The click belongs to the menu; it must not pair into a double click.
            self.gestures.forget_clicks();
            match self.hit_at(pos) {
                Some((MENU_HIT, HitRegion::MenuItem, data)) => {
                    if let Ok(index) = usize::try_from(data) {
                        self.run_menu_item(index);
                    }
                }
                Some((MENU_HIT, _, _)) => {}
                _ => self.menu = None,
            }
            return;
        }
        if matches!(self.hit_at(pos), Some((EXIT_HIT, _, _)))
            && matches!(self.session(), Session::Finished)
        {
            self.finish();
        }
    }

    // -- view helpers ----------------------------------------------------

    fn affordance_for(&self, entity: &Entity) -> Affordance {
        if let Some(payload) = self.dnd.payload()
            && entity.hyp_name() == Some(payload.source.as_str())
        {
            return Affordance::Source;
        }
        match self.dnd.hovered() {
            Some((hovered, true)) if hovered == entity => Affordance::Accepting,
            Some((hovered, false)) if hovered == entity => Affordance::Rejecting,
            _ => Affordance::Idle,
        }
    }

    fn render_active(&self, state: &ProofState, frame: &mut Frame) {
        let width = frame.width();
        let mut y = 0u16;
        let next_row = |y: &mut u16| {
            let row = Rect::new(0, *y, width, 1);
            *y = y.saturating_add(1);
            row
        };

        for (i, hyp) in state.monitor.hyps.iter().enumerate() {
            let entity = Entity::hyp(hyp.name.clone());
            HypothesisRow::new(hyp)
                .affordance(self.affordance_for(&entity))
                .hit(HYP_HIT, i as HitData)
                .render(next_row(&mut y), frame);
        }

        let total = state.monitor.goals.len();
        for (display, (stack_index, goal)) in
            state.monitor.goals.iter().enumerate().rev().enumerate()
        {
            GoalSeparator {
                index: display + 1,
                total,
            }
            .render(next_row(&mut y), frame);
            let mut row = GoalRow::new(goal);
            if stack_index == 0 {
                row = row
                    .current(true)
                    .affordance(self.affordance_for(&Entity::Goal))
                    .hit(GOAL_HIT, 0);
            }
            row.render(next_row(&mut y), frame);
        }
    }

    fn render_finished(&self, frame: &mut Frame) {
        let labels = &self.config.labels;
        let width = frame.width();
        frame
            .buffer
            .set_string(0, 0, &labels.finished, CellFlags::BOLD, width);
        Button::new(&labels.exit, EXIT_HIT).render(Rect::new(0, 2, width, 1), frame);
    }
}

impl Drop for ProofView {
    fn drop(&mut self) {
        self.unmount();
    }
}

impl std::fmt::Debug for ProofView {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProofView")
            .field("mounted", &self.is_mounted())
            .field("version", &self.bridge.version())
            .field("dragging", &self.dnd.is_active())
            .field("menu", &self.menu.is_some())
            .finish_non_exhaustive()
    }
}

impl Model for ProofView {
    type Message = Msg;

    fn update(&mut self, msg: Msg) -> Cmd<Msg> {
        let (event, now) = match msg {
            Msg::Unmount => {
                self.unmount();
                return Cmd::none();
            }
            Msg::Input(event, now) => (event, now),
        };
        if !self.is_mounted() {
            return Cmd::none();
        }
        if matches!(self.session(), Session::Finished)
            && (self.menu.is_some() || self.dnd.is_active())
        {
            self.menu = None;
            self.dnd.cancel();
        }

        if let Event::Key(ref key) = event {
            let menu_open = self.menu.is_some();
            self.handle_key(key);
            // Escape outside a menu also reaches the recognizer to cancel a drag.
            if menu_open || key.code != KeyCode::Escape {
                return Cmd::none();
            }
        }

        if matches!(self.session(), Session::Loading) {
            return Cmd::none();
        }
        for semantic in self.gestures.process(&event, now) {
            self.handle_semantic(semantic);
        }
        Cmd::none()
    }

    fn view(&self, frame: &mut Frame) {
        let session = self.session();
        let mut drawn = Drawn::default();
        match session {
            Session::Loading => {
                let width = frame.width();
                frame
                    .buffer
                    .set_string(0, 0, &self.config.labels.loading, CellFlags::DIM, width);
            }
            Session::Finished => self.render_finished(frame),
            Session::Active(ref state) => {
                self.render_active(state, frame);
                if let Some(ref menu) = self.menu {
                    menu.render(frame, MENU_HIT, &self.config.labels.default_marker);
                }
                drawn.state = Some(Arc::clone(state));
            }
        }
        drawn.hits = frame.hit_grid.clone();
        *self.drawn.borrow_mut() = drawn;
    }

    fn data_version(&self) -> u64 {
        self.bridge.version()
    }
}
