use crate::track::TrackParticle;

/// What the boundary handler did to a particle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoundaryOutcome {
    /// The particle stayed inside [0, 1]
    Inside,

    /// The particle was clamped to an end and its velocity reversed
    Reflected,

    /// The particle was clamped to an end that it was already leaving backwards
    Clamped,

    /// Reflection is disabled and the particle is outside [0, 1]
    PassedThrough,
}

/// Shared post-step boundary handling for track riders.
///
/// With reflection enabled, alpha is clamped to [0, 1] and the velocity is
/// negated only while it still points out of the range, so one crossing
/// gives exactly one flip. With reflection disabled the state is left alone.
pub fn handle_boundary(particle: &mut TrackParticle) -> BoundaryOutcome {
    let alpha = particle.get_alpha();
    let inside = (0.0..=1.0).contains(&alpha);

    if !particle.is_reflecting() {
        return if inside { BoundaryOutcome::Inside } else { BoundaryOutcome::PassedThrough };
    }

    let velocity = particle.get_velocity();
    if alpha <= 0.0 {
        particle.set_alpha(0.0);
        if velocity < 0.0 {
            particle.set_velocity(-velocity);
            return BoundaryOutcome::Reflected;
        }
        return if inside { BoundaryOutcome::Inside } else { BoundaryOutcome::Clamped };
    }
    if alpha >= 1.0 {
        particle.set_alpha(1.0);
        if velocity > 0.0 {
            particle.set_velocity(-velocity);
            return BoundaryOutcome::Reflected;
        }
        return if inside { BoundaryOutcome::Inside } else { BoundaryOutcome::Clamped };
    }
    BoundaryOutcome::Inside
}
