use std::thread;

use bevy::log::LogPlugin;
use bevy::prelude::*;
use bevy::window::WindowCloseRequested;
use crossbeam_channel::{bounded, Receiver, Sender};
use rlc_charge_loop::prelude::{
    integrate_current, Animator, ChargeTransport, CircuitModel, ComponentKind, Frame, LoopConfig,
    Playback, RenderSurface, RlcLoopError, SampleStore, Scalar, SceneLayout, StopSignal, R2,
};

const MARGIN: Scalar = 50.0;
const MARKER_SIZE: f32 = 8.0;
const COMPONENT_SIZE: f32 = 50.0;
const WIRE_WIDTH: f32 = 8.0;

/// Sends every presented frame to the bevy world; stops playback once the window is gone.
struct ChannelSurface {
    frames: Sender<Frame>,
    stop: StopSignal,
}

impl RenderSurface for ChannelSurface {
    fn present(&mut self, _scene: &SceneLayout, frame: &Frame) {
        if self.frames.send(frame.clone()).is_err() {
            self.stop.stop();
        }
    }
}

#[derive(Resource)]
struct ReplayLink {
    frames: Receiver<Frame>,
    stop: StopSignal,
    centre: Vec2,
    markers: usize,
}

#[derive(Resource)]
struct Layout(SceneLayout);

#[derive(Component)]
struct MarkerDisplay(usize);

fn to_world(p: R2, centre: Vec2) -> Vec2 {
    Vec2::new(p.x as f32, p.y as f32) - centre
}

fn build_store(config: &LoopConfig) -> Result<SampleStore, RlcLoopError> {
    let model = CircuitModel::from_config(config)?;
    let series = integrate_current(&model, config.time_step, config.duration)?;
    Ok(ChargeTransport::from_config(config)?.sample(&series, config.data_increment)?)
}

pub fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let config = LoopConfig::default();
    let store = build_store(&config).unwrap_or_else(|e| {
        eprintln!("Simulation error: {}", e);
        std::process::exit(1);
    });
    let mut animator = Animator::from_config(store, &config).unwrap_or_else(|e| {
        eprintln!("Replay error: {}", e);
        std::process::exit(1);
    });
    let scene = SceneLayout::new(animator.geometry(), MARGIN);
    let markers = animator.store().marker_count();
    let extent = scene.extent();
    let centre = Vec2::new(
        (animator.geometry().width() / 2.0) as f32,
        (animator.geometry().height() / 2.0) as f32,
    );

    let (tx, rx) = bounded(4);
    let stop = StopSignal::new();
    let worker = {
        let stop = stop.clone();
        let scene = scene.clone();
        let playback = Playback::from_config(&config);
        thread::spawn(move || {
            let mut surface = ChannelSurface {
                frames: tx,
                stop: stop.clone(),
            };
            playback.run(&mut animator, &scene, &mut surface, &stop)
        })
    };

    let mut app = App::new();
    app.insert_resource(ClearColor(Color::WHITE))
        .insert_resource(ReplayLink {
            frames: rx,
            stop: stop.clone(),
            centre,
            markers,
        })
        .insert_resource(Layout(scene))
        .add_plugins(
            DefaultPlugins.build().disable::<LogPlugin>().set(WindowPlugin {
                primary_window: Some(Window {
                    title: "RLC circuit: alternating current".into(),
                    resolution: (extent.x as f32, extent.y as f32).into(),
                    resizable: false,
                    ..default()
                }),
                ..default()
            }),
        )
        .add_systems(Startup, setup)
        .add_systems(Update, (handle_input, apply_frames));
    app.run();

    stop.stop();
    drop(app);
    match worker.join() {
        Ok(report) => {
            tracing::info!(frames = report.frames, outcome = ?report.outcome, "replay finished")
        }
        Err(_) => eprintln!("Playback thread panicked"),
    }
}

fn setup(mut commands: Commands, layout: Res<Layout>, link: Res<ReplayLink>) {
    commands.spawn(Camera2dBundle::default());
    let scene = &layout.0;
    let centre = link.centre;

    // Axes through the loop centre
    for axis in &scene.axes {
        let start = to_world(axis.start, centre);
        let end = to_world(axis.end, centre);
        let size = (end - start).abs().max(Vec2::splat(1.0));
        commands.spawn(SpriteBundle {
            sprite: Sprite {
                color: Color::BLACK,
                custom_size: Some(size),
                ..default()
            },
            transform: Transform::from_translation(((start + end) * 0.5).extend(0.0)),
            ..default()
        });
    }

    // Loop outline
    for (i, corner) in scene.outline.iter().enumerate() {
        let next = scene.outline[(i + 1) % scene.outline.len()];
        let start = to_world(*corner, centre);
        let end = to_world(next, centre);
        let size = (end - start).abs().max(Vec2::splat(WIRE_WIDTH));
        commands.spawn(SpriteBundle {
            sprite: Sprite {
                color: Color::BLACK,
                custom_size: Some(size),
                ..default()
            },
            transform: Transform::from_translation(((start + end) * 0.5).extend(0.5)),
            ..default()
        });
    }

    // Source, resistor, inductor and capacitor
    for marker in &scene.components {
        let color = match marker.kind {
            ComponentKind::Source => Color::ORANGE,
            ComponentKind::Resistor => Color::CYAN,
            ComponentKind::Inductor => Color::GREEN,
            ComponentKind::Capacitor => Color::RED,
        };
        let at = to_world(marker.anchor, centre);
        commands.spawn(SpriteBundle {
            sprite: Sprite {
                color,
                custom_size: Some(Vec2::splat(COMPONENT_SIZE)),
                ..default()
            },
            transform: Transform::from_translation(at.extend(1.0)),
            ..default()
        });
        commands.spawn(Text2dBundle {
            text: Text::from_section(
                marker.kind.label(),
                TextStyle {
                    font_size: 40.0,
                    color: Color::BLACK,
                    ..default()
                },
            ),
            transform: Transform::from_translation(at.extend(2.0)),
            ..default()
        });
    }

    // Charges, parked off-screen until the first frame arrives
    let parked = Vec3::new(0.0, 0.0, -10.0);
    for j in 0..link.markers {
        commands.spawn((
            MarkerDisplay(j),
            SpriteBundle {
                sprite: Sprite {
                    color: Color::YELLOW,
                    custom_size: Some(Vec2::splat(MARKER_SIZE)),
                    ..default()
                },
                transform: Transform::from_translation(parked),
                ..default()
            },
        ));
    }
}

fn handle_input(
    keys: Res<ButtonInput<KeyCode>>,
    mut closed: EventReader<WindowCloseRequested>,
    link: Res<ReplayLink>,
    mut exit: EventWriter<bevy::app::AppExit>,
) {
    let close_requested = closed.read().count() > 0;
    if keys.just_pressed(KeyCode::Escape) || close_requested {
        link.stop.stop();
        exit.send(bevy::app::AppExit);
    }
}

fn apply_frames(link: Res<ReplayLink>, mut markers: Query<(&MarkerDisplay, &mut Transform)>) {
    // Only the newest frame matters; older ones were superseded while this tick waited.
    let Some(frame) = link.frames.try_iter().last() else {
        return;
    };
    for (MarkerDisplay(j), mut transform) in markers.iter_mut() {
        if let Some(p) = frame.positions.get(*j) {
            transform.translation = to_world(*p, link.centre).extend(3.0);
        }
    }
}
