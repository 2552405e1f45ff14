//! Host front end for the ZX48 machine layer.
//!
//! Provides the window, frame pacing, audio output, and pad input around
//! a [`Zx48`] machine. The embedder supplies the instruction engine and
//! the file bytes; `run` owns the loop from there. File-set convention:
//! an optional raw screen dump is shown as a splash before the snapshot
//! starts, skipped by pressing any pad button.

use std::sync::Arc;
use std::time::{Duration, Instant};

use emu_core::{CpuCore, InputSource};
use emu_zx48::{
    ControlScheme, DEFAULT_MAX_FRAMESKIP, FramePacer, KeyLayout, Renderer, Zx48, load_scr,
    load_z80,
};
use format_z80::Z80Snapshot;
use pixels::{Pixels, SurfaceTexture};
use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::{ElementState, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowId};

mod audio;
mod display;
mod input;

pub use audio::AudioOutput;
pub use display::FrameStore;
pub use input::HostPad;

use emu_zx48::{DISPLAY_HEIGHT, DISPLAY_WIDTH};

/// How long the splash screen stays up without input.
const SPLASH_DURATION: Duration = Duration::from_secs(3);

/// Configuration for the runner.
pub struct RunnerConfig {
    /// Window title.
    pub title: String,
    /// Integer scale factor for sharp pixels.
    pub scale: u32,
    /// Active control scheme.
    pub scheme: ControlScheme,
    /// Catch-up bound per pacer tick.
    pub max_frameskip: u32,
    /// Raw 6912-byte screen dump shown before the snapshot starts.
    pub splash: Option<Vec<u8>>,
    /// Snapshot applied after the splash (or immediately without one).
    pub snapshot: Option<Vec<u8>>,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            title: "ZX48".to_string(),
            scale: 4,
            scheme: ControlScheme::Keyboard(KeyLayout::default_keys()),
            max_frameskip: DEFAULT_MAX_FRAMESKIP,
            splash: None,
            snapshot: None,
        }
    }
}

/// Run the machine until the window closes.
///
/// # Errors
///
/// Returns an error when the snapshot bytes are malformed or the event
/// loop cannot be created.
pub fn run<C: CpuCore + 'static>(machine: Zx48<C>, config: RunnerConfig) -> Result<(), String> {
    // Surface snapshot problems before a window ever opens.
    if let Some(bytes) = &config.snapshot {
        Z80Snapshot::parse(bytes).map_err(|e| e.to_string())?;
    }

    let event_loop = EventLoop::new().map_err(|e| e.to_string())?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut runner = Runner::new(machine, config);
    event_loop.run_app(&mut runner).map_err(|e| e.to_string())
}

enum Phase {
    /// Showing the splash screen until the deadline or any button.
    Splash { until: Instant },
    Running,
}

struct Runner<C: CpuCore> {
    machine: Zx48<C>,
    config: RunnerConfig,
    phase: Phase,
    window: Option<Arc<Window>>,
    pixels: Option<Pixels<'static>>,
    frame: FrameStore,
    renderer: Renderer,
    audio: Option<AudioOutput>,
    pad: HostPad,
    pacer: FramePacer,
    start: Instant,
}

impl<C: CpuCore> Runner<C> {
    fn new(mut machine: Zx48<C>, mut config: RunnerConfig) -> Self {
        let phase = match config.splash.take() {
            Some(dump) => match load_scr(&mut machine, &dump) {
                Ok(()) => Phase::Splash {
                    until: Instant::now() + SPLASH_DURATION,
                },
                Err(err) => {
                    // Degrade: no preview, straight into the snapshot.
                    eprintln!("Skipping splash: {err}");
                    Phase::Running
                }
            },
            None => Phase::Running,
        };

        let mut runner = Self {
            machine,
            phase,
            window: None,
            pixels: None,
            frame: FrameStore::new(),
            renderer: Renderer::new(),
            audio: None,
            pad: HostPad::new(),
            pacer: FramePacer::new(config.max_frameskip, 0),
            start: Instant::now(),
            config,
        };

        if matches!(runner.phase, Phase::Running) {
            runner.start_snapshot();
        }
        runner
    }

    /// Apply the configured snapshot, replacing the splash contents.
    fn start_snapshot(&mut self) {
        if let Some(bytes) = self.config.snapshot.take() {
            // Validated in `run`, so a failure here means the bytes
            // changed under us; report and keep the reset machine.
            if let Err(err) = load_z80(&mut self.machine, &bytes) {
                eprintln!("Snapshot load failed: {err}");
            }
        }
    }

    fn now_micros(&self) -> u64 {
        self.start.elapsed().as_micros() as u64
    }

    fn present(&mut self) {
        self.renderer
            .render_frame(self.machine.bus_mut(), &mut self.frame);
        if let Some(pixels) = &mut self.pixels {
            self.frame.blit_rgba(pixels.frame_mut());
        }
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}

impl<C: CpuCore> ApplicationHandler for Runner<C> {
    #[allow(unsafe_code)]
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let scaled_width = DISPLAY_WIDTH as u32 * self.config.scale;
        let scaled_height = DISPLAY_HEIGHT as u32 * self.config.scale;

        let window = Arc::new(
            event_loop
                .create_window(
                    Window::default_attributes()
                        .with_title(self.config.title.clone())
                        .with_inner_size(LogicalSize::new(scaled_width, scaled_height)),
                )
                .expect("Failed to create window"),
        );

        let size = window.inner_size();
        let surface = SurfaceTexture::new(size.width, size.height, Arc::clone(&window));
        let pixels = Pixels::new(DISPLAY_WIDTH as u32, DISPLAY_HEIGHT as u32, surface)
            .expect("Failed to create pixels");

        let audio = AudioOutput::new(self.machine.sound());
        if audio.is_none() {
            eprintln!("Warning: No audio device available, sound disabled");
        }

        self.window = Some(window);
        // SAFETY: pixels borrows the window, which lives for the program
        // duration behind the Arc stored above.
        self.pixels = Some(unsafe { std::mem::transmute(pixels) });
        self.audio = audio;
        self.start = Instant::now();
        self.pacer = FramePacer::new(self.config.max_frameskip, 0);
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }

            WindowEvent::Resized(size) => {
                if size.width > 0 && size.height > 0 {
                    if let Some(pixels) = &mut self.pixels {
                        pixels.resize_surface(size.width, size.height).ok();
                    }
                }
            }

            WindowEvent::KeyboardInput { event, .. } => {
                if let PhysicalKey::Code(keycode) = event.physical_key {
                    match event.state {
                        ElementState::Pressed => {
                            if keycode == KeyCode::Escape {
                                event_loop.exit();
                                return;
                            }
                            self.pad.key_down(keycode);
                        }
                        ElementState::Released => {
                            self.pad.key_up(keycode);
                        }
                    }
                }
            }

            WindowEvent::RedrawRequested => {
                if let Some(pixels) = &mut self.pixels {
                    if pixels.render().is_err() {
                        event_loop.exit();
                    }
                }
            }

            _ => {}
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if self.window.is_none() {
            return;
        }

        let pad = self.pad.poll();

        match self.phase {
            Phase::Splash { until } => {
                // Any button skips the preview.
                if pad.pressed != 0 || Instant::now() >= until {
                    self.start_snapshot();
                    self.phase = Phase::Running;
                    self.pacer = FramePacer::new(self.config.max_frameskip, self.now_micros());
                }
            }
            Phase::Running => {
                self.config.scheme.apply(pad, self.machine.bus_mut());

                let frames = self.pacer.frames_due(self.now_micros());
                for _ in 0..frames {
                    self.machine.run_frame();
                }
            }
        }

        self.present();
    }
}
