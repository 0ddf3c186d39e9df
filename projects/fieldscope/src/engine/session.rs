use crate::engine::boundary::{Boundary, CaptureSession};
use crate::engine::geometry::Ring;
use crate::engine::measure::Measurement;
use crate::engine::types::Point;
use crate::error::EngineError;
use serde::{Deserialize, Serialize};

/// What a completed shape on the map stands for
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum DrawMode {
    #[default]
    Boundary,
    Measure,
}

impl DrawMode {
    pub fn toggled(self) -> Self {
        match self {
            DrawMode::Boundary => DrawMode::Measure,
            DrawMode::Measure => DrawMode::Boundary,
        }
    }
}

#[derive(Debug)]
pub enum DrawOutcome<'a> {
    Boundary(&'a Boundary),
    Measurement(&'a Measurement),
}

/// Drawing state owned by one map view: the interaction mode, the boundary
/// candidate and the last measurement.
#[derive(Debug, Default)]
pub struct DrawSession {
    mode: DrawMode,
    capture: CaptureSession,
    measurement: Option<Measurement>,
}

impl DrawSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(&self) -> DrawMode {
        self.mode
    }

    /// Switches mode. The previous measurement is dropped; the boundary
    /// candidate survives.
    pub fn toggle_mode(&mut self) -> DrawMode {
        self.mode = self.mode.toggled();
        self.measurement = None;
        self.mode
    }

    /// Routes a completed shape to boundary capture or measurement.
    pub fn on_shape(&mut self, points: Vec<Point>) -> Result<DrawOutcome<'_>, EngineError> {
        match self.mode {
            DrawMode::Boundary => {
                let boundary = self.capture.submit(Ring::new(points))?;
                Ok(DrawOutcome::Boundary(boundary))
            }
            DrawMode::Measure => {
                let measurement = self.measurement.insert(Measurement::checked(points)?);
                tracing::debug!("Measured path: {}", measurement.label());
                Ok(DrawOutcome::Measurement(measurement))
            }
        }
    }

    pub fn capture(&mut self) -> &mut CaptureSession {
        &mut self.capture
    }

    pub fn measurement(&self) -> Option<&Measurement> {
        self.measurement.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn path() -> Vec<Point> {
        vec![
            Point::new(0.0, 0.0),
            Point::new(0.0, 1.0),
            Point::new(1.0, 1.0),
        ]
    }

    #[test]
    fn test_boundary_mode_captures_ring() {
        let mut session = DrawSession::new();
        assert_eq!(session.mode(), DrawMode::Boundary);
        match session.on_shape(path()).unwrap() {
            DrawOutcome::Boundary(b) => assert_eq!(b.vertex_count(), 3),
            other => panic!("unexpected outcome {:?}", other),
        }
        assert!(session.capture().candidate().is_some());
        assert!(session.measurement().is_none());
    }

    #[test]
    fn test_measure_mode_replaces_previous_measurement() {
        let mut session = DrawSession::new();
        assert_eq!(session.toggle_mode(), DrawMode::Measure);

        session.on_shape(path()).unwrap();
        let second = vec![Point::new(0.0, 0.0), Point::new(1.0, 0.0)];
        match session.on_shape(second.clone()).unwrap() {
            DrawOutcome::Measurement(m) => assert_eq!(m.points(), second.as_slice()),
            other => panic!("unexpected outcome {:?}", other),
        }
        // A two point path is never treated as a boundary in measure mode
        assert!(session.capture().candidate().is_none());

        let broken = vec![Point::new(f64::NAN, 0.0), Point::new(1.0, 0.0)];
        assert!(session.on_shape(broken).is_err());
        assert_eq!(session.measurement().unwrap().points(), second.as_slice());
    }

    #[test]
    fn test_toggle_keeps_candidate_and_drops_measurement() {
        let mut session = DrawSession::new();
        session.on_shape(path()).unwrap();
        session.toggle_mode();
        session.on_shape(path()).unwrap();
        assert!(session.measurement().is_some());

        assert_eq!(session.toggle_mode(), DrawMode::Boundary);
        assert!(session.measurement().is_none());
        assert!(session.capture().candidate().is_some());
    }
}
