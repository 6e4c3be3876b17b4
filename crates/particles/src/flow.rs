//! `FlowEngine`: a vector field, a particle population and a color map,
//! driven through the core [`Engine`] trait.

use flowfield_core::bounds::FieldBounds;
use flowfield_core::config::{check_dimensions, SimulationConfig};
use flowfield_core::engine::{Engine, TickReport};
use flowfield_core::error::EngineError;
use flowfield_core::field_source::VectorField;
use flowfield_core::scheme::{ColorMap, ColorScheme};
use flowfield_core::snapshot::{Snapshot, Sprite};
use serde_json::{json, Value};

use crate::engine::ParticleEngine;
use crate::params::ParticleParams;

pub struct FlowEngine {
    field: VectorField,
    particles: ParticleEngine,
    scheme: ColorScheme,
    colors: Box<dyn ColorMap>,
    snapshot: Snapshot,
}

impl FlowEngine {
    /// Builds the field, spawns the population and seeds traces if enabled.
    pub fn from_config(config: &SimulationConfig) -> Result<Self, EngineError> {
        config.validate()?;
        let params = ParticleParams::from_json(&config.params)?;
        let mut particles = ParticleEngine::new(config.bounds, params, config.seed)?;
        if config.trace {
            particles.set_trace(true);
        }
        Ok(Self {
            field: VectorField::new(&config.dx, &config.dy, config.a, config.b),
            particles,
            scheme: config.scheme,
            colors: Box::new(config.scheme),
            snapshot: Snapshot::empty(config.width, config.height, config.background),
        })
    }

    /// Replaces the built-in scheme with a custom color map.
    pub fn with_color_map(mut self, colors: impl ColorMap + 'static) -> Self {
        self.colors = Box::new(colors);
        self
    }

    pub fn field(&self) -> &VectorField {
        &self.field
    }

    pub fn particles(&self) -> &ParticleEngine {
        &self.particles
    }

    pub fn bounds(&self) -> &FieldBounds {
        self.particles.bounds()
    }

    fn refresh_snapshot(&mut self) {
        let bounds = *self.particles.bounds();
        let colors = &self.colors;
        let snapshot = &mut self.snapshot;
        let (width, height) = (snapshot.width, snapshot.height);

        snapshot.tick = self.particles.tick();
        snapshot.sprites.clear();
        snapshot
            .sprites
            .extend(self.particles.samples().iter().map(|s| Sprite {
                pos: bounds.to_pixel(s.pos, width, height),
                alpha: s.alpha,
                color: colors.color(s.velocity.angle(), s.alpha, s.velocity.magnitude()),
            }));

        snapshot.traces.clear();
        snapshot.traces.extend(self.particles.traced().iter().map(|t| {
            t.history()
                .iter()
                .map(|&p| bounds.to_pixel(p, width, height))
                .collect()
        }));
    }
}

impl Engine for FlowEngine {
    fn step(&mut self) -> TickReport {
        let report = self.particles.step(&self.field);
        self.refresh_snapshot();
        report
    }

    fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }

    fn resize(&mut self, width: usize, height: usize) -> Result<(), EngineError> {
        check_dimensions(width, height)?;
        self.snapshot.width = width;
        self.snapshot.height = height;
        self.refresh_snapshot();
        Ok(())
    }

    fn params(&self) -> Value {
        let mut params = self.particles.params().to_json();
        if let Some(obj) = params.as_object_mut() {
            obj.insert("dx".into(), json!(self.field.dx().source()));
            obj.insert("dy".into(), json!(self.field.dy().source()));
            obj.insert("scheme".into(), json!(self.scheme.name()));
            obj.insert("trace".into(), json!(self.particles.trace_enabled()));
        }
        params
    }

    fn param_schema(&self) -> Value {
        let mut schema = ParticleParams::schema();
        if let Some(obj) = schema.as_object_mut() {
            obj.insert(
                "scheme".into(),
                json!({
                    "type": "string",
                    "default": ColorScheme::default().name(),
                    "enum": ColorScheme::list_names(),
                    "description": "Built-in particle color scheme"
                }),
            );
        }
        schema
    }

    fn clear_traces(&mut self) {
        self.particles.clear_traces();
        self.refresh_snapshot();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flowfield_core::color::{Rgba, Srgb};
    use flowfield_core::error::FieldError;

    fn config() -> SimulationConfig {
        SimulationConfig {
            dx: "-y".into(),
            dy: "x".into(),
            width: 200,
            height: 100,
            params: json!({"particle_count": 300}),
            ..SimulationConfig::default()
        }
    }

    #[test]
    fn from_config_spawns_configured_population() {
        let engine = FlowEngine::from_config(&config()).unwrap();
        assert_eq!(engine.particles().particles().len(), 300);
        assert_eq!(engine.snapshot().width, 200);
        assert!(engine.snapshot().sprites.is_empty());
    }

    #[test]
    fn from_config_rejects_bad_config() {
        let bad_size = SimulationConfig {
            width: 0,
            ..config()
        };
        assert!(FlowEngine::from_config(&bad_size).is_err());
        let bad_params = SimulationConfig {
            params: json!({"recycle_stride": 0}),
            ..config()
        };
        assert!(matches!(
            FlowEngine::from_config(&bad_params),
            Err(EngineError::InvalidParameter { .. })
        ));
        let huge_trace = SimulationConfig {
            trace: true,
            params: json!({"trace_length": u64::MAX}),
            ..config()
        };
        assert!(matches!(
            FlowEngine::from_config(&huge_trace),
            Err(EngineError::InvalidParameter { .. })
        ));
    }

    #[test]
    fn step_fills_snapshot_in_pixel_space() {
        let mut engine = FlowEngine::from_config(&config()).unwrap();
        let report = engine.step();
        assert!(report.is_clean());
        let snap = engine.snapshot();
        assert_eq!(snap.tick, 1);
        assert_eq!(snap.sprites.len(), 300);
        for s in &snap.sprites {
            assert!((0.0..=1.0).contains(&s.alpha));
            assert_eq!(s.color.a, s.alpha);
        }
        // particles start inside, one small step cannot leave the canvas by much
        assert!(snap
            .sprites
            .iter()
            .all(|s| s.pos.x > -5.0 && s.pos.x < 205.0 && s.pos.y > -5.0 && s.pos.y < 105.0));
    }

    #[test]
    fn broken_equation_reports_field_invalid() {
        let mut engine = FlowEngine::from_config(&SimulationConfig {
            dx: "x +".into(),
            ..config()
        })
        .unwrap();
        let report = engine.step();
        assert!(report.field_invalid());
        assert!(engine.snapshot().sprites.is_empty());
        let msg = report.status_message().unwrap();
        assert!(msg.contains("no valid particles") && msg.contains("dx/dt"), "got: {msg}");
        assert!(matches!(report.error(), Some(FieldError::FieldInvalid)));
    }

    #[test]
    fn resize_remaps_without_touching_particles() {
        let mut engine = FlowEngine::from_config(&config()).unwrap();
        engine.step();
        let before = engine.particles().particles().to_vec();
        let first = engine.snapshot().sprites[0].pos;
        engine.resize(400, 200).unwrap();
        assert_eq!(engine.particles().particles(), &before[..]);
        let after = engine.snapshot().sprites[0].pos;
        assert!((after - first * 2.0).length() < 1e-9);
        assert!(engine.resize(0, 10).is_err());
        assert!(matches!(
            engine.resize(usize::MAX, 2),
            Err(EngineError::InvalidDimensions { .. })
        ));
        assert_eq!(engine.snapshot().width, 400);
    }

    #[test]
    fn traces_appear_in_snapshot_when_enabled() {
        let mut engine = FlowEngine::from_config(&SimulationConfig {
            trace: true,
            ..config()
        })
        .unwrap();
        for _ in 0..3 {
            engine.step();
        }
        let snap = engine.snapshot();
        assert_eq!(snap.traces.len(), 20);
        assert!(snap.traces.iter().all(|t| t.len() == 3));
        engine.clear_traces();
        assert!(engine.snapshot().traces.iter().all(|t| t.is_empty()));
    }

    #[test]
    fn custom_color_map_is_used() {
        let white = |_angle: f64, alpha: f64, _mag: f64| -> Rgba { Srgb::WHITE.with_alpha(alpha) };
        let mut engine = FlowEngine::from_config(&config()).unwrap().with_color_map(white);
        engine.step();
        assert!(engine
            .snapshot()
            .sprites
            .iter()
            .all(|s| s.color.rgb() == Srgb::WHITE));
    }

    #[test]
    fn params_include_equations_and_lifecycle() {
        let engine = FlowEngine::from_config(&config()).unwrap();
        let params = engine.params();
        assert_eq!(params["dx"], "-y");
        assert_eq!(params["particle_count"], 300);
        assert_eq!(params["scheme"], "rainbow");
        let schema = engine.param_schema();
        assert_eq!(schema["scheme"]["enum"].as_array().unwrap().len(), 5);
        assert!(schema.get("max_age").is_some());
    }
}
