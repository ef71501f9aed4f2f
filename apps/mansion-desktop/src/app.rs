use glam::Vec2;
use mansion_author::{FixedStep, Notice, Session, Stores, Walker};
use mansion_common::Theme;
use mansion_input::{Action, MoveKey};
use mansion_kernel::Ray;
use mansion_persist::DirStorage;
use mansion_render::screen_to_ndc;
use std::time::{Duration, Instant};
use winit::event::TouchPhase;
use winit::keyboard::KeyCode;

/// How long a notice stays on screen.
const NOTICE_TTL: Duration = Duration::from_millis(2500);

/// Which layout the window shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum View {
    /// First-person 3D scene.
    Scene,
    /// 2D floor-plan grid.
    Grid,
}

impl View {
    pub fn reset_action(self) -> Action {
        match self {
            Self::Scene => Action::ResetScene,
            Self::Grid => Action::ResetGrid,
        }
    }

    pub fn save_action(self) -> Action {
        match self {
            Self::Scene => Action::SaveScene,
            Self::Grid => Action::SaveGrid,
        }
    }

    pub fn load_action(self) -> Action {
        match self {
            Self::Scene => Action::LoadScene,
            Self::Grid => Action::LoadGrid,
        }
    }
}

/// WASD walks, space lifts.
pub fn move_key(code: KeyCode) -> Option<MoveKey> {
    match code {
        KeyCode::KeyW => Some(MoveKey::Forward),
        KeyCode::KeyS => Some(MoveKey::Back),
        KeyCode::KeyA => Some(MoveKey::Left),
        KeyCode::KeyD => Some(MoveKey::Right),
        KeyCode::Space => Some(MoveKey::Up),
        _ => None,
    }
}

/// Whether a touch phase lets go of the screen.
pub fn touch_released(phase: TouchPhase) -> bool {
    matches!(phase, TouchPhase::Ended | TouchPhase::Cancelled)
}

/// Which pick a pointer press performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pick {
    Place,
    Remove,
}

/// Application state, independent of the GPU plumbing.
pub struct AppState {
    pub session: Session,
    pub stores: Stores<DirStorage>,
    pub walker: Walker,
    pub view: View,
    pub cursor_captured: bool,
    /// Last cursor position, physical pixels.
    pub cursor: Option<Vec2>,
    /// Window size, physical pixels.
    pub surface_size: Vec2,
    pub scale_factor: f32,
    pub last_frame: Instant,
    clock: FixedStep,
    notice: Option<(Notice, Instant)>,
}

impl AppState {
    pub fn new(stores: Stores<DirStorage>, view: View, theme: Theme) -> Self {
        Self {
            session: Session::new().with_theme(theme),
            stores,
            walker: Walker::new(),
            view,
            cursor_captured: false,
            cursor: None,
            surface_size: Vec2::new(1280.0, 720.0),
            scale_factor: 1.0,
            last_frame: Instant::now(),
            clock: FixedStep::default(),
            notice: None,
        }
    }

    pub fn update(&mut self, dt: f32) {
        let steps = self.clock.advance(dt);
        if self.view == View::Scene {
            for _ in 0..steps {
                self.walker.step(self.session.layout());
            }
        }
        for event in self.session.drain_events() {
            tracing::trace!(?event, "layout changed");
        }
        if self
            .notice
            .as_ref()
            .is_some_and(|(_, shown)| shown.elapsed() > NOTICE_TTL)
        {
            self.notice = None;
        }
    }

    pub fn handle_key(&mut self, key: KeyCode, pressed: bool) {
        if let Some(key) = move_key(key) {
            if pressed {
                self.walker.keys.press(key);
            } else {
                self.walker.keys.release(key);
            }
            return;
        }
        if !pressed {
            return;
        }
        match key {
            KeyCode::Tab if self.view == View::Scene => {
                self.cursor_captured = !self.cursor_captured;
            }
            KeyCode::Escape => self.cursor_captured = false,
            KeyCode::KeyR => self.act(Action::Rotate),
            _ => {}
        }
    }

    /// Ray through the screen center.
    pub fn center_ray(&self) -> Ray {
        self.walker.camera.ray_through(Vec2::ZERO)
    }

    /// Ray through the cursor, or the screen center while the cursor is
    /// captured.
    pub fn pointer_ray(&self) -> Ray {
        match self.cursor {
            Some(cursor) if !self.cursor_captured => {
                let ndc = screen_to_ndc(cursor.x, cursor.y, self.surface_size.x, self.surface_size.y);
                self.walker.camera.ray_through(ndc)
            }
            _ => self.center_ray(),
        }
    }

    /// Place or remove where `ray` points in the scene.
    pub fn pick(&mut self, pick: Pick, ray: &Ray) {
        if self.view != View::Scene {
            return;
        }
        let action = match pick {
            Pick::Place => self.session.place_target(ray).map(Action::PlaceAt),
            Pick::Remove => self.session.remove_target(ray).map(Action::RemoveAt),
        };
        if let Some(action) = action {
            self.act(action);
        }
    }

    /// Feed a touch event to the joystick. Positions are physical pixels.
    pub fn touch(&mut self, id: u64, phase: TouchPhase, location: Vec2) {
        let pos = location / self.scale_factor;
        let width = self.surface_size.x / self.scale_factor;
        match phase {
            TouchPhase::Started => {
                self.walker.joystick.touch_start(id, pos, width);
            }
            TouchPhase::Moved => self.walker.joystick.touch_move(id, pos),
            TouchPhase::Ended | TouchPhase::Cancelled => self.walker.joystick.touch_end(id),
        }
    }

    /// Drop every held key, the joystick and the cursor capture.
    pub fn release_input(&mut self) {
        self.walker.keys.clear();
        self.walker.joystick.release();
        self.cursor_captured = false;
    }

    /// Run an action through the session and show whatever it reports.
    pub fn act(&mut self, action: Action) {
        if let Some(notice) = self.session.apply(action, &mut self.stores) {
            tracing::info!("{notice}");
            self.notice = Some((notice, Instant::now()));
        }
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref().map(|(notice, _)| notice)
    }

    pub fn theme(&self) -> Theme {
        self.session.theme()
    }
}
