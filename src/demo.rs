//! Headless demo scene
//!
//! Builds a small scene on one display: a spinning hub frame carrying orbiting
//! spheres and a nested arm frame with an arrow, plus a helix standing on the
//! display root. Each tick spins the hub, and now and then hops the arrow
//! between frames or tries (and fails) to hang the hub inside its own arm.

use std::f32::consts::TAU;

use visgraph_core::{
    color, Attachment, Color, DisplayKey, Helix, HelixParams, InvariantViolation, ObjectKey,
    ObjectTemplate, SceneError, SceneGraph, ShapeTemplate, Transform3D, Vec3,
};

use crate::config::AppConfig;

/// Ticks between arrow hops
const HOP_INTERVAL: u64 = 30;
/// Ticks between cyclic reparent attempts
const CYCLE_CHECK_INTERVAL: u64 = 60;
/// Ticks between helix coil changes
const COIL_INTERVAL: u64 = 45;

const ORBIT_RADIUS: f32 = 2.0;
const PALETTE: [Color; 5] = [color::RED, color::GREEN, color::BLUE, color::YELLOW, color::CYAN];

/// Demo error
#[derive(Debug)]
pub enum DemoError {
    /// A scene graph operation failed unexpectedly
    Scene(SceneError),
    /// The audit after a tick found broken invariants
    Invariant(Vec<InvariantViolation>),
}

impl std::fmt::Display for DemoError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DemoError::Scene(e) => write!(f, "Scene error: {}", e),
            DemoError::Invariant(violations) => {
                write!(f, "{} invariant violations", violations.len())?;
                if let Some(first) = violations.first() {
                    write!(f, " (first: {})", first)?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for DemoError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DemoError::Scene(e) => Some(e),
            DemoError::Invariant(_) => None,
        }
    }
}

impl From<SceneError> for DemoError {
    fn from(e: SceneError) -> Self {
        DemoError::Scene(e)
    }
}

/// The demo scene and its tick state
pub struct Demo {
    graph: SceneGraph,
    display: DisplayKey,
    hub: ObjectKey,
    arm: ObjectKey,
    arrow: ObjectKey,
    helix: Helix,
    spin_rate: f32,
    validate: bool,
    tick: u64,
    rejected: u32,
}

impl Demo {
    /// Build the demo scene from configuration
    pub fn build(config: &AppConfig) -> Result<Self, DemoError> {
        let mut graph = SceneGraph::new();
        let display = graph.add_display(config.display.to_display_settings());

        let hub = graph.spawn(
            Attachment::on_display(display),
            ObjectTemplate::new(ShapeTemplate::frame()).with_name("hub"),
        )?;

        for i in 0..config.demo.orbiters {
            let angle = TAU * i as f32 / config.demo.orbiters as f32;
            let position = Vec3::new(ORBIT_RADIUS * angle.cos(), 0.0, ORBIT_RADIUS * angle.sin());
            graph.spawn(
                Attachment::in_frame(hub),
                ObjectTemplate::new(ShapeTemplate::sphere(0.25))
                    .with_name(format!("orbiter-{}", i))
                    .with_transform(Transform3D::from_position(position))
                    .with_color(PALETTE[i as usize % PALETTE.len()]),
            )?;
        }

        let arm = graph.spawn(
            Attachment::in_frame(hub),
            ObjectTemplate::new(ShapeTemplate::frame())
                .with_name("arm")
                .with_transform(Transform3D::from_position(Vec3::new(0.0, 1.0, 0.0))),
        )?;
        let arrow = graph.spawn(
            Attachment::in_frame(arm),
            ObjectTemplate::new(ShapeTemplate::arrow(1.0))
                .with_name("arrow")
                .with_transform(Transform3D::identity().with_axis(Vec3::Y))
                .with_color(color::ORANGE),
        )?;

        let helix = graph.spawn_helix(
            Attachment::on_display(display),
            HelixParams {
                pos: Vec3::new(-4.0, 0.0, 0.0),
                axis: Vec3::new(0.0, 3.0, 0.0),
                up: Vec3::X,
                radius: 0.4,
                color: Some(color::MAGENTA),
                ..HelixParams::default()
            },
        )?;

        log::info!(
            "Built demo scene on '{}' with {} objects",
            config.display.title,
            graph.len()
        );

        Ok(Self {
            graph,
            display,
            hub,
            arm,
            arrow,
            helix,
            spin_rate: config.demo.spin_rate,
            validate: config.debug.validate_each_tick,
            tick: 0,
            rejected: 0,
        })
    }

    /// The scene graph
    pub fn graph(&self) -> &SceneGraph {
        &self.graph
    }

    /// The demo display
    pub fn display(&self) -> DisplayKey {
        self.display
    }

    /// The helix handle
    pub fn helix(&self) -> &Helix {
        &self.helix
    }

    /// The arrow that hops between frames
    pub fn arrow(&self) -> ObjectKey {
        self.arrow
    }

    /// Ticks run so far
    pub fn tick_count(&self) -> u64 {
        self.tick
    }

    /// Number of cyclic reparents the graph refused
    pub fn rejected(&self) -> u32 {
        self.rejected
    }

    /// Advance one tick
    pub fn step(&mut self) -> Result<(), DemoError> {
        self.tick += 1;

        let hub = self.graph.get_mut(self.hub).ok_or(SceneError::NotFound(self.hub))?;
        hub.transform.axis = hub.transform.axis.rotate_about(Vec3::Y, self.spin_rate);
        hub.transform.up = hub.transform.up.rotate_about(Vec3::Y, self.spin_rate);

        if self.tick % HOP_INTERVAL == 0 {
            let current = self.graph.get(self.arrow).and_then(|obj| obj.frame());
            let target = if current == Some(self.arm) { self.hub } else { self.arm };
            self.graph.set_frame(self.arrow, Some(target))?;
        }

        if self.tick % CYCLE_CHECK_INTERVAL == 0 {
            match self.graph.set_frame(self.hub, Some(self.arm)) {
                Err(SceneError::Cycle(_)) => self.rejected += 1,
                Err(e) => return Err(e.into()),
                Ok(()) => log::error!("Hub was placed inside its own arm"),
            }
        }

        if self.tick % COIL_INTERVAL == 0 {
            let coils = 3 + (self.tick / COIL_INTERVAL % 4) as u32;
            self.helix.set_coils(&mut self.graph, coils)?;
        }

        if self.validate {
            let violations = self.graph.validate();
            if !violations.is_empty() {
                return Err(DemoError::Invariant(violations));
            }
        }
        Ok(())
    }

    /// Run `ticks` ticks
    pub fn run(&mut self, ticks: u32) -> Result<(), DemoError> {
        for _ in 0..ticks {
            self.step()?;
        }
        log::info!(
            "Ran {} ticks: {} objects drawn, {} cyclic reparents refused",
            self.tick,
            self.graph.renderer().len(),
            self.rejected
        );
        Ok(())
    }
}
