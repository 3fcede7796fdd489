//! Engine contract - the per-tick computation a cube delegates to.

use crate::runtime::Faces;

use super::{AerodynamicsEngine, EcosystemEngine, FactionWarEngine, HeatmapEngine, OceanEngine};

/// One discrete simulation step over a cube's faces.
///
/// Implementations run at interactive rates over up to 10^6 cells, so
/// `compute` must not allocate: scratch storage lives in faces or in member
/// state sized at construction.
pub trait Engine {
    /// Human-readable engine identifier.
    fn name(&self) -> &str;

    /// Minimum number of faces the cube must provide.
    fn required_channels(&self) -> usize;

    /// Advance the faces by one tick. Every face is a row-major N x N raster.
    fn compute(&mut self, faces: &mut Faces<'_>);
}

/// Closed set of engines a session can host, dispatched statically.
#[derive(Debug)]
pub enum AnyEngine {
    Ecosystem(EcosystemEngine),
    FactionWar(FactionWarEngine),
    Heatmap(HeatmapEngine),
    Aerodynamics(AerodynamicsEngine),
    Ocean(OceanEngine),
}

macro_rules! dispatch {
    ($self:expr, $engine:ident => $body:expr) => {
        match $self {
            AnyEngine::Ecosystem($engine) => $body,
            AnyEngine::FactionWar($engine) => $body,
            AnyEngine::Heatmap($engine) => $body,
            AnyEngine::Aerodynamics($engine) => $body,
            AnyEngine::Ocean($engine) => $body,
        }
    };
}

impl Engine for AnyEngine {
    fn name(&self) -> &str {
        dispatch!(self, e => e.name())
    }

    fn required_channels(&self) -> usize {
        dispatch!(self, e => e.required_channels())
    }

    #[inline]
    fn compute(&mut self, faces: &mut Faces<'_>) {
        dispatch!(self, e => e.compute(faces))
    }
}

macro_rules! variant_access {
    ($variant:ident, $ty:ty, $as_ref:ident, $as_mut:ident) => {
        impl From<$ty> for AnyEngine {
            fn from(engine: $ty) -> Self {
                AnyEngine::$variant(engine)
            }
        }

        impl AnyEngine {
            pub fn $as_ref(&self) -> Option<&$ty> {
                match self {
                    AnyEngine::$variant(e) => Some(e),
                    _ => None,
                }
            }

            pub fn $as_mut(&mut self) -> Option<&mut $ty> {
                match self {
                    AnyEngine::$variant(e) => Some(e),
                    _ => None,
                }
            }
        }
    };
}

variant_access!(Ecosystem, EcosystemEngine, as_ecosystem, as_ecosystem_mut);
variant_access!(FactionWar, FactionWarEngine, as_faction_war, as_faction_war_mut);
variant_access!(Heatmap, HeatmapEngine, as_heatmap, as_heatmap_mut);
variant_access!(Aerodynamics, AerodynamicsEngine, as_aerodynamics, as_aerodynamics_mut);
variant_access!(Ocean, OceanEngine, as_ocean, as_ocean_mut);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dispatch_forwards_metadata() {
        let engine = AnyEngine::from(HeatmapEngine::new(3, 2.0));
        assert_eq!(engine.required_channels(), 5);
        assert!(engine.as_heatmap().is_some());
        assert!(engine.as_ocean().is_none());

        let engine = AnyEngine::from(OceanEngine::default());
        assert_eq!(engine.required_channels(), 24);
        assert_eq!(engine.name(), "OceanEngine");
    }
}
