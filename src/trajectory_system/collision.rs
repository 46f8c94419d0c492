use crate::{
    config::CollisionConfig,
    control::mass_properties::MassProperties,
    utils::vector2d::Vector2D,
};

use super::kinematics::Kinematics;

/// World-space axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub min: Vector2D,
    pub max: Vector2D,
}

impl BoundingBox {
    pub fn new(min: Vector2D, max: Vector2D) -> Self {
        BoundingBox {
            min: Vector2D::new(min.x.min(max.x), min.y.min(max.y)),
            max: Vector2D::new(min.x.max(max.x), min.y.max(max.y)),
        }
    }

    /// Smallest box containing all `points`; `None` for an empty iterator.
    pub fn from_points<I: IntoIterator<Item = Vector2D>>(points: I) -> Option<Self> {
        let mut points = points.into_iter();
        let first = points.next()?;
        Some(points.fold(BoundingBox::new(first, first), |bbox, p| bbox.including(p)))
    }

    pub fn including(&self, point: Vector2D) -> Self {
        BoundingBox {
            min: Vector2D::new(self.min.x.min(point.x), self.min.y.min(point.y)),
            max: Vector2D::new(self.max.x.max(point.x), self.max.y.max(point.y)),
        }
    }

    pub fn bottom_center(&self) -> Vector2D {
        Vector2D::new((self.min.x + self.max.x) * 0.5, self.min.y)
    }
}

/// Single-point contact against static geometry. Rebuilt every frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContactManifold {
    pub contact_point: Vector2D,
    pub normal: Vector2D,
    pub tangent: Vector2D,
    pub penetration: f64,
}

impl ContactManifold {
    /// Contact between a body's bounding box and flat ground at
    /// `ground_height`, taken at the bottom centre of the box.
    pub fn against_ground(bbox: &BoundingBox, ground_height: f64) -> Option<Self> {
        if bbox.min.y > ground_height {
            return None;
        }
        Some(ContactManifold {
            contact_point: bbox.bottom_center(),
            normal: Vector2D::new(0.0, 1.0),
            tangent: Vector2D::new(1.0, 0.0),
            penetration: ground_height - bbox.min.y,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ContactReport {
    /// Magnitude of the contact-point velocity before any impulse.
    pub impact_speed: f64,
    /// Normal component of that velocity; negative when approaching.
    pub normal_speed: f64,
    pub normal_impulse: f64,
    pub tangent_impulse: f64,
    pub destroyed: bool,
}

impl ContactReport {
    pub fn impulse_applied(&self) -> bool {
        self.normal_impulse > 0.0
    }
}

/// Impulse-based response of a rigid body against static ground.
#[derive(Debug, Clone, PartialEq)]
pub struct CollisionResolver {
    pub restitution: f64,
    /// Approach speeds below this bounce with zero restitution.
    pub restitution_threshold: f64,
    pub friction: f64,
    pub angular_rest_threshold: f64,
    pub angular_damping: f64,
    pub penetration_slop: f64,
    pub correction_factor: f64,
    pub destruction_speed: f64,
}

impl Default for CollisionResolver {
    fn default() -> Self {
        CollisionResolver::from_config(&CollisionConfig::default())
    }
}

impl CollisionResolver {
    pub fn from_config(config: &CollisionConfig) -> Self {
        CollisionResolver {
            restitution: config.restitution,
            restitution_threshold: config.restitution_threshold,
            friction: config.friction,
            angular_rest_threshold: config.angular_rest_threshold,
            angular_damping: config.angular_damping,
            penetration_slop: config.penetration_slop,
            correction_factor: config.correction_factor,
            destruction_speed: config.destruction_speed,
        }
    }

    pub fn resolve(
        &self,
        body: &mut Kinematics,
        mass: &MassProperties,
        contact: &ContactManifold,
    ) -> ContactReport {
        let mut report = ContactReport::default();
        let inverse_mass = mass.inverse_mass();
        if inverse_mass == 0.0 {
            return report;
        }
        let inverse_inertia = mass.inverse_inertia();

        let lever = contact.contact_point - body.position;
        let normal = contact.normal;
        let tangent = contact.tangent;

        let relative_velocity = contact_velocity(body, lever);
        report.impact_speed = relative_velocity.magnitude();
        report.normal_speed = relative_velocity.dot(&normal);

        if report.normal_speed < 0.0 {
            let restitution = if -report.normal_speed < self.restitution_threshold {
                0.0
            } else {
                self.restitution
            };

            let normal_stiffness = impulse_denominator(inverse_mass, inverse_inertia, lever, normal);
            let mut normal_impulse = -(1.0 + restitution) * report.normal_speed / normal_stiffness;
            apply_impulse(body, normal * normal_impulse, lever, inverse_mass, inverse_inertia);

            let tangent_speed = contact_velocity(body, lever).dot(&tangent);
            let tangent_stiffness =
                impulse_denominator(inverse_mass, inverse_inertia, lever, tangent);
            let friction_limit = self.friction * normal_impulse;
            let tangent_impulse =
                (-tangent_speed / tangent_stiffness).clamp(-friction_limit, friction_limit);
            apply_impulse(body, tangent * tangent_impulse, lever, inverse_mass, inverse_inertia);

            if body.angular_velocity.abs() < self.angular_rest_threshold {
                body.angular_velocity = 0.0;
            } else {
                body.angular_velocity *= self.angular_damping;
            }

            // Friction and damping act through the lever arm and can turn the
            // contact point back into the ground.
            let residual = contact_velocity(body, lever).dot(&normal);
            if residual < 0.0 {
                let correction = -residual / normal_stiffness;
                apply_impulse(body, normal * correction, lever, inverse_mass, inverse_inertia);
                normal_impulse += correction;
            }

            report.normal_impulse = normal_impulse;
            report.tangent_impulse = tangent_impulse;
            report.destroyed = report.impact_speed > self.destruction_speed;
        }

        let depth = (contact.penetration - self.penetration_slop).max(0.0);
        body.position += normal * (depth * self.correction_factor);

        report
    }
}

fn contact_velocity(body: &Kinematics, lever: Vector2D) -> Vector2D {
    body.velocity + Vector2D::cross_scalar(body.angular_velocity, &lever)
}

fn impulse_denominator(
    inverse_mass: f64,
    inverse_inertia: f64,
    lever: Vector2D,
    direction: Vector2D,
) -> f64 {
    let arm = lever.cross(&direction);
    inverse_mass + arm * arm * inverse_inertia
}

fn apply_impulse(
    body: &mut Kinematics,
    impulse: Vector2D,
    lever: Vector2D,
    inverse_mass: f64,
    inverse_inertia: f64,
) {
    body.velocity += impulse * inverse_mass;
    body.angular_velocity += lever.cross(&impulse) * inverse_inertia;
}
