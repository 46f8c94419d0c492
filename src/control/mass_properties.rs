use crate::constants::MASS_EPSILON;
use crate::errors::SimulationError;
use crate::utils::vector2d::Vector2D;

/// A rigid sub-part of the rocket, positioned in the body frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MassComponent {
    pub mass: f64,                // kg
    pub local_position: Vector2D, // m
    pub local_inertia: f64,       // kg⋅m², about the component's own centre
}

impl MassComponent {
    pub fn new(mass: f64, local_position: Vector2D, local_inertia: f64) -> Self {
        MassComponent {
            mass,
            local_position,
            local_inertia,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct MassProperties {
    pub total_mass: f64,
    pub center_of_mass: Vector2D, // body frame
    pub inertia: f64,             // about the centre of mass
}

impl MassProperties {
    pub fn has_mass(&self) -> bool {
        self.total_mass > MASS_EPSILON
    }

    pub fn has_inertia(&self) -> bool {
        self.inertia > MASS_EPSILON
    }

    pub fn inverse_mass(&self) -> f64 {
        if self.has_mass() {
            1.0 / self.total_mass
        } else {
            0.0
        }
    }

    pub fn inverse_inertia(&self) -> f64 {
        if self.has_inertia() {
            1.0 / self.inertia
        } else {
            0.0
        }
    }
}

/// Owns the rocket's mass components. The last component added is the
/// fuel tank and is the only one whose mass changes after configuration.
#[derive(Debug, Clone, Default)]
pub struct MassPropertiesModel {
    components: Vec<MassComponent>,
    properties: MassProperties,
}

impl MassPropertiesModel {
    pub fn new() -> Self {
        MassPropertiesModel::default()
    }

    pub fn add_component(&mut self, component: MassComponent) -> Result<(), SimulationError> {
        if !(component.mass > 0.0 && component.mass.is_finite()) {
            return Err(SimulationError::InitializationError(format!(
                "component mass must be positive, got {}",
                component.mass
            )));
        }
        if !(component.local_inertia >= 0.0 && component.local_inertia.is_finite()) {
            return Err(SimulationError::InitializationError(format!(
                "component inertia must be non-negative, got {}",
                component.local_inertia
            )));
        }
        if !component.local_position.is_finite() {
            return Err(SimulationError::InitializationError(
                "component position must be finite".to_string(),
            ));
        }

        self.components.push(component);
        self.properties.total_mass += component.mass;
        self.recompute();
        Ok(())
    }

    /// Drains `flow · dt` kilograms from the fuel tank, clamped at empty.
    /// Returns the mass actually removed.
    pub fn consume_fuel(&mut self, flow: f64, delta_time: f64) -> f64 {
        if !(flow > 0.0 && flow.is_finite()) || !(delta_time > 0.0) {
            return 0.0;
        }
        let Some(tank) = self.components.last_mut() else {
            return 0.0;
        };

        let consumed = (flow * delta_time).min(tank.mass);
        if consumed <= 0.0 {
            return 0.0;
        }
        tank.mass -= consumed;
        self.properties.total_mass = (self.properties.total_mass - consumed).max(0.0);
        self.recompute();
        consumed
    }

    /// Re-derives centre of mass and inertia (parallel-axis theorem) from the
    /// components. Both are zero when the total mass is degenerate.
    pub fn recompute(&mut self) {
        let total_mass = self.properties.total_mass;
        if total_mass <= MASS_EPSILON {
            self.properties.center_of_mass = Vector2D::ZERO;
            self.properties.inertia = 0.0;
            return;
        }

        let center_of_mass = self
            .components
            .iter()
            .map(|c| c.local_position * c.mass)
            .sum::<Vector2D>()
            / total_mass;

        let inertia = self
            .components
            .iter()
            .map(|c| {
                c.local_inertia + c.mass * (c.local_position - center_of_mass).magnitude_squared()
            })
            .sum();

        self.properties.center_of_mass = center_of_mass;
        self.properties.inertia = inertia;
    }

    /// Current mass properties. Asking before any component has been added is
    /// a configuration mistake.
    pub fn properties(&self) -> Result<MassProperties, SimulationError> {
        if self.components.is_empty() {
            return Err(SimulationError::InitializationError(
                "mass properties requested before any component was added".to_string(),
            ));
        }
        Ok(self.properties)
    }

    /// Cached properties without the configuration check; zeroed when empty.
    pub fn current(&self) -> MassProperties {
        self.properties
    }

    pub fn components(&self) -> &[MassComponent] {
        &self.components
    }

    pub fn total_mass(&self) -> f64 {
        self.properties.total_mass
    }

    pub fn center_of_mass(&self) -> Vector2D {
        self.properties.center_of_mass
    }

    pub fn inertia(&self) -> f64 {
        self.properties.inertia
    }

    pub fn fuel_mass(&self) -> f64 {
        self.components.last().map_or(0.0, |tank| tank.mass)
    }

    pub fn is_fuel_exhausted(&self) -> bool {
        self.fuel_mass() <= 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::{assert_abs_diff_eq, assert_relative_eq};
    use rand::{rngs::StdRng, Rng, SeedableRng};

    fn create_reference_model() -> MassPropertiesModel {
        let mut model = MassPropertiesModel::new();
        model
            .add_component(MassComponent::new(100.0, Vector2D::new(20.0, 70.0), 0.0))
            .unwrap();
        model
            .add_component(MassComponent::new(100.0, Vector2D::new(20.0, -20.0), 0.0))
            .unwrap();
        model
            .add_component(MassComponent::new(80.0, Vector2D::new(20.0, 110.0), 0.0))
            .unwrap();
        model
    }

    fn random_model(rng: &mut StdRng) -> MassPropertiesModel {
        let mut model = MassPropertiesModel::new();
        for _ in 0..rng.gen_range(1..8) {
            let component = MassComponent::new(
                rng.gen_range(0.5..500.0),
                Vector2D::new(rng.gen_range(-5.0..5.0), rng.gen_range(-5.0..5.0)),
                rng.gen_range(0.0..50.0),
            );
            model.add_component(component).unwrap();
        }
        model
    }

    fn expected_center_of_mass(components: &[MassComponent]) -> Vector2D {
        let mass: f64 = components.iter().map(|c| c.mass).sum();
        components
            .iter()
            .map(|c| c.local_position * c.mass)
            .sum::<Vector2D>()
            / mass
    }

    #[test]
    fn test_reference_mass_properties() {
        let model = create_reference_model();
        let props = model.properties().unwrap();

        assert_eq!(props.total_mass, 280.0);
        assert_relative_eq!(props.center_of_mass.x, 20.0, epsilon = 1e-9);
        assert_relative_eq!(props.center_of_mass.y, 13_800.0 / 280.0, epsilon = 1e-9);

        let cm_y: f64 = 13_800.0 / 280.0;
        let expected_inertia = 100.0 * (70.0 - cm_y).powi(2)
            + 100.0 * (-20.0 - cm_y).powi(2)
            + 80.0 * (110.0 - cm_y).powi(2);
        assert_relative_eq!(props.inertia, expected_inertia, epsilon = 1e-6);
        assert_eq!(model.fuel_mass(), 80.0);
    }

    #[test]
    fn test_single_component_at_center_has_no_inertia() {
        let mut model = MassPropertiesModel::new();
        model
            .add_component(MassComponent::new(42.0, Vector2D::new(3.0, -1.0), 0.0))
            .unwrap();
        assert_eq!(model.center_of_mass(), Vector2D::new(3.0, -1.0));
        assert_eq!(model.inertia(), 0.0);
    }

    #[test]
    fn test_local_inertia_is_added() {
        let mut model = MassPropertiesModel::new();
        model
            .add_component(MassComponent::new(2.0, Vector2D::new(-1.0, 0.0), 0.5))
            .unwrap();
        model
            .add_component(MassComponent::new(2.0, Vector2D::new(1.0, 0.0), 0.5))
            .unwrap();
        // 0.5 + 0.5 + 2·1² + 2·1²
        assert_relative_eq!(model.inertia(), 5.0, epsilon = 1e-12);
    }

    #[test]
    fn test_random_component_sets_keep_invariants() {
        let mut rng = StdRng::seed_from_u64(0x5eed);
        for _ in 0..200 {
            let mut model = random_model(&mut rng);
            if rng.gen_bool(0.5) {
                model.consume_fuel(rng.gen_range(0.0..20.0), rng.gen_range(0.0..2.0));
            }

            let components = model.components().to_vec();
            let sum: f64 = components.iter().map(|c| c.mass).sum();
            assert_relative_eq!(model.total_mass(), sum, epsilon = 1e-9, max_relative = 1e-12);

            if model.total_mass() > MASS_EPSILON {
                let cm = expected_center_of_mass(&components);
                assert_abs_diff_eq!(model.center_of_mass().x, cm.x, epsilon = 1e-5);
                assert_abs_diff_eq!(model.center_of_mass().y, cm.y, epsilon = 1e-5);
            }
        }
    }

    #[test]
    fn test_consume_fuel_with_zero_flow_is_noop() {
        let mut model = create_reference_model();
        let before = model.properties().unwrap();
        assert_eq!(model.consume_fuel(0.0, 1.0 / 60.0), 0.0);
        assert_eq!(model.properties().unwrap(), before);
        assert_eq!(model.fuel_mass(), 80.0);
    }

    #[test]
    fn test_consume_fuel_drains_tank_only() {
        let mut model = create_reference_model();
        let consumed = model.consume_fuel(5.0, 2.0);

        assert_eq!(consumed, 10.0);
        assert_eq!(model.fuel_mass(), 70.0);
        assert_eq!(model.total_mass(), 270.0);
        assert_eq!(model.components()[0].mass, 100.0);
        assert_eq!(model.components()[1].mass, 100.0);
        // Tank sits above the centre of mass, so burning it lowers the CM
        assert!(model.center_of_mass().y < 13_800.0 / 280.0);
    }

    #[test]
    fn test_consume_fuel_clamps_at_empty() {
        let mut model = create_reference_model();
        let consumed = model.consume_fuel(50.0, 10.0);

        assert_eq!(consumed, 80.0);
        assert_eq!(model.fuel_mass(), 0.0);
        assert!(model.is_fuel_exhausted());
        assert_eq!(model.total_mass(), 200.0);

        assert_eq!(model.consume_fuel(50.0, 10.0), 0.0);
        assert_eq!(model.total_mass(), 200.0);
    }

    #[test]
    fn test_fully_drained_single_tank_is_degenerate() {
        let mut model = MassPropertiesModel::new();
        model
            .add_component(MassComponent::new(1.0, Vector2D::new(2.0, 2.0), 0.1))
            .unwrap();
        model.consume_fuel(1.0, 1.0);

        let props = model.properties().unwrap();
        assert_eq!(props.total_mass, 0.0);
        assert_eq!(props.center_of_mass, Vector2D::ZERO);
        assert_eq!(props.inertia, 0.0);
        assert!(!props.has_mass());
        assert_eq!(props.inverse_mass(), 0.0);
    }

    #[test]
    fn test_properties_before_components_is_an_error() {
        let model = MassPropertiesModel::new();
        assert!(matches!(
            model.properties(),
            Err(SimulationError::InitializationError(_))
        ));
    }

    #[test]
    fn test_invalid_components_are_rejected() {
        let mut model = MassPropertiesModel::new();
        assert!(model
            .add_component(MassComponent::new(0.0, Vector2D::ZERO, 0.0))
            .is_err());
        assert!(model
            .add_component(MassComponent::new(1.0, Vector2D::ZERO, -1.0))
            .is_err());
        assert!(model
            .add_component(MassComponent::new(1.0, Vector2D::new(f64::NAN, 0.0), 0.0))
            .is_err());
        assert!(model.components().is_empty());
    }

    #[test]
    fn test_consume_fuel_with_non_finite_flow_is_noop() {
        let mut model = create_reference_model();
        assert_eq!(model.consume_fuel(f64::NAN, 1.0 / 60.0), 0.0);
        assert_eq!(model.consume_fuel(f64::INFINITY, 1.0 / 60.0), 0.0);
        assert_eq!(model.fuel_mass(), 80.0);
        assert_eq!(model.total_mass(), 280.0);
    }
}
