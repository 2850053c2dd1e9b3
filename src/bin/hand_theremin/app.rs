//! App - owns the theremin, the audio output and the UI loop

use std::time::{Duration, Instant};

use color_eyre::eyre::Result as EyreResult;
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use ratatui::DefaultTerminal;
use rtrb::Consumer;

use hand_theremin::{
    engine::{AudioOutput, EngineHandle},
    HandReading, Theremin, ThereminConfig,
};

use super::input::SimulatedHands;
use super::ui::{self, SpectrumAnalyzer, View, VIS_BUFFER_SIZE};

pub struct App {
    config: ThereminConfig,
    theremin: Theremin<EngineHandle>,
    /// Keeps the stream alive; dropped on quit.
    output: Option<AudioOutput>,
    hands: SimulatedHands,
    readings: Vec<HandReading>,
    /// Whether frames are being fed to the theremin
    running: bool,
    status: String,
    scope_rx: Option<Consumer<f32>>,
    audio_buffer: Vec<f32>,
    spectrum: Option<SpectrumAnalyzer>,
    should_quit: bool,
}

impl App {
    pub fn new(config: ThereminConfig) -> Self {
        Self {
            theremin: Theremin::new(&config),
            config,
            output: None,
            hands: SimulatedHands::new(),
            readings: Vec::new(),
            running: false,
            status: String::from("Press Space to start"),
            scope_rx: None,
            audio_buffer: vec![0.0; VIS_BUFFER_SIZE],
            spectrum: None,
            should_quit: false,
        }
    }

    /// Run the UI event loop; one detection frame per redraw
    pub fn run(mut self, terminal: &mut DefaultTerminal) -> EyreResult<()> {
        while !self.should_quit {
            self.poll_audio();

            if self.running {
                let frame = self.hands.frame();
                match self.theremin.process_frame(&frame, Instant::now()) {
                    Ok(readings) => self.readings = readings,
                    Err(err) => {
                        tracing::warn!(error = %err, "frame dropped");
                        self.status = err.to_string();
                    }
                }
            }

            terminal.draw(|frame| ui::render(frame, &self.view()))?;

            // Handle keyboard input (non-blocking, ~60fps)
            if event::poll(Duration::from_millis(16))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key(key.code);
                    }
                }
            }
        }

        self.theremin.stop();
        Ok(())
    }

    fn handle_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
                self.should_quit = true;
            }
            KeyCode::Char(' ') => self.start(),
            KeyCode::Char('s') | KeyCode::Char('S') => self.stop(),
            other => {
                self.hands.handle_key(other);
            }
        }
    }

    fn start(&mut self) {
        self.running = true;

        let engine = self.config.engine;
        let mut opened = None;
        let result = self.theremin.initialize_audio(|| {
            let (output, handle) = AudioOutput::open(&engine)?;
            opened = Some(output);
            Ok(handle)
        });

        if let Some(mut output) = opened {
            self.scope_rx = output.take_scope();
            self.spectrum = Some(SpectrumAnalyzer::new(VIS_BUFFER_SIZE, output.sample_rate()));
            self.output = Some(output);
        }

        self.status = match result {
            Ok(()) => String::from("Playing"),
            Err(err) => format!("No audio ({err}), display only"),
        };
    }

    fn stop(&mut self) {
        self.running = false;
        self.theremin.stop();
        self.readings.clear();
        self.status = String::from("Stopped. Press Space to start");
    }

    /// Drain the scope tap, keeping the last VIS_BUFFER_SIZE samples
    fn poll_audio(&mut self) {
        let Some(rx) = self.scope_rx.as_mut() else {
            return;
        };

        let mut received = false;
        while let Ok(sample) = rx.pop() {
            self.audio_buffer.push(sample);
            received = true;
        }

        if received {
            if self.audio_buffer.len() > VIS_BUFFER_SIZE {
                let excess = self.audio_buffer.len() - VIS_BUFFER_SIZE;
                self.audio_buffer.drain(0..excess);
            }
            if let Some(spectrum) = self.spectrum.as_mut() {
                spectrum.update(&self.audio_buffer);
            }
        }
    }

    fn view(&self) -> View<'_> {
        View {
            readings: &self.readings,
            running: self.running,
            audio_ready: self.theremin.is_audio_ready(),
            hand_count: self.theremin.active_hands().len(),
            active_voices: self
                .theremin
                .voices()
                .map_or(0, |voices| voices.active_count()),
            fading_voices: self.theremin.voices().map_or(0, |voices| {
                voices.len() - voices.active_count()
            }),
            max_volume: self.theremin.mapper().max_volume(),
            status: &self.status,
            audio_buffer: &self.audio_buffer,
            spectrum: self.spectrum.as_ref().map(SpectrumAnalyzer::data),
            sample_rate: self.output.as_ref().map(AudioOutput::sample_rate),
        }
    }
}
