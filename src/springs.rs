//! Spring evaluator - attaches soil springs to mesh nodes and converts
//! displacements into secant stiffnesses

use serde::{Deserialize, Serialize};

use crate::error::PileResult;
use crate::mesh::{Mesh, DOF_PER_NODE};
use crate::soil::{Curve, SoilProfile, SpringKind};

/// A nonlinear soil spring attached to one node
///
/// `scale` folds the depth multiplier and, for distributed springs, the
/// node's tributary length, so the curve output becomes a nodal force.
/// Springs are immutable; the secant stiffness is a pure query.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Spring {
    /// Owning node index
    pub node: usize,
    /// Spring kind
    pub kind: SpringKind,
    /// Depth below the pile head in m
    pub depth: f64,
    /// Resistance curve from the soil model
    pub curve: Curve,
    /// Multiplier x tributary length applied to curve output
    pub scale: f64,
}

impl Spring {
    /// Global DOF index this spring acts on
    pub fn dof(&self) -> usize {
        let offset = match self.kind {
            SpringKind::Lateral | SpringKind::BaseShear => 1,
            SpringKind::Rotational | SpringKind::BaseMoment => 2,
        };
        self.node * DOF_PER_NODE + offset
    }

    /// Nodal resisting force (or moment) at the given displacement
    pub fn resistance(&self, u: f64) -> f64 {
        self.scale * self.curve.resistance(u)
    }

    /// Secant stiffness at the given displacement; the curve's initial
    /// tangent at `u == 0`. Always non-negative.
    pub fn secant_stiffness(&self, u: f64) -> f64 {
        self.scale * self.curve.secant_stiffness(u)
    }

    /// Fraction of ultimate capacity engaged at the given displacement
    pub fn mobilization(&self, u: f64) -> f64 {
        self.curve.mobilization(u)
    }
}

/// Build the spring set for a mesh embedded in a soil profile
///
/// Every node inside the profile gets a lateral p-y spring; nodes whose
/// layer model provides a rotational curve get an m-t spring; the toe node
/// gets Hb/Mb base springs where the model provides them.
pub fn build_springs(mesh: &Mesh, profile: &SoilProfile) -> PileResult<Vec<Spring>> {
    let mut springs = Vec::new();
    let surface = profile.top();

    for node in &mesh.nodes {
        if node.depth < surface - 1e-9 {
            continue;
        }
        let layer = profile.layer_at(node.depth)?;
        let z = node.depth - surface;
        let diameter = mesh.diameter_at(node.index);
        let tributary = mesh.tributary_length(node.index);

        let py = layer.model.py_curve(z, diameter)?;
        springs.push(Spring {
            node: node.index,
            kind: SpringKind::Lateral,
            depth: node.depth,
            curve: py,
            scale: layer.p_multiplier_at(node.depth) * tributary,
        });

        if let Some(mt) = layer.model.mt_curve(z, diameter)? {
            springs.push(Spring {
                node: node.index,
                kind: SpringKind::Rotational,
                depth: node.depth,
                curve: mt,
                scale: layer.m_multiplier_at(node.depth) * tributary,
            });
        }

        if node.index == mesh.toe() {
            if let Some(hb) = layer.model.base_shear_curve(z, diameter)? {
                springs.push(Spring {
                    node: node.index,
                    kind: SpringKind::BaseShear,
                    depth: node.depth,
                    curve: hb,
                    scale: 1.0,
                });
            }
            if let Some(mb) = layer.model.base_moment_curve(z, diameter)? {
                springs.push(Spring {
                    node: node.index,
                    kind: SpringKind::BaseMoment,
                    depth: node.depth,
                    curve: mb,
                    scale: 1.0,
                });
            }
        }
    }

    log::debug!("built {} soil springs", springs.len());
    Ok(springs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::Mesh;
    use crate::pile::{Material, Pile};
    use crate::soil::{SoilLayer, SoilModel, SoilProfile};
    use approx::assert_relative_eq;

    fn meshed_pile() -> (Mesh, SoilProfile) {
        let pile = Pile::circular("P1", 10.0, 1.0, 0.02, Material::steel()).unwrap();
        let profile = SoilProfile::new(
            "site",
            vec![SoilLayer::new(
                "clay",
                0.0,
                12.0,
                SoilModel::Elastic {
                    lateral_subgrade: 2000.0,
                    rotational_subgrade: None,
                    base_shear_stiffness: Some(5.0e4),
                    base_moment_stiffness: Some(1.0e5),
                },
            )],
        )
        .unwrap();
        let mesh = Mesh::build(&pile, Some(&profile), &[], 2.0).unwrap();
        (mesh, profile)
    }

    #[test]
    fn test_lateral_spring_at_every_node_plus_base() {
        let (mesh, profile) = meshed_pile();
        let springs = build_springs(&mesh, &profile).unwrap();

        let lateral = springs
            .iter()
            .filter(|s| s.kind == SpringKind::Lateral)
            .count();
        assert_eq!(lateral, mesh.nodes.len());
        assert!(springs.iter().any(|s| s.kind == SpringKind::BaseShear));
        assert!(springs.iter().any(|s| s.kind == SpringKind::BaseMoment));
        assert!(!springs.iter().any(|s| s.kind == SpringKind::Rotational));
    }

    #[test]
    fn test_secant_scales_with_tributary_length() {
        let (mesh, profile) = meshed_pile();
        let springs = build_springs(&mesh, &profile).unwrap();

        let interior = springs
            .iter()
            .find(|s| s.kind == SpringKind::Lateral && s.node == 1)
            .unwrap();
        // 2000 kN/m² subgrade x 2 m tributary
        assert_relative_eq!(interior.secant_stiffness(0.0), 4000.0);
        assert_relative_eq!(interior.secant_stiffness(0.1), 4000.0);
    }

    #[test]
    fn test_multiplier_applied_to_resistance() {
        let pile = Pile::circular("P1", 10.0, 1.0, 0.02, Material::steel()).unwrap();
        let profile = SoilProfile::new(
            "site",
            vec![
                SoilLayer::new("clay", 0.0, 12.0, SoilModel::elastic(2000.0))
                    .with_p_multiplier(|_| 0.5),
            ],
        )
        .unwrap();
        let mesh = Mesh::build(&pile, Some(&profile), &[], 2.0).unwrap();
        let springs = build_springs(&mesh, &profile).unwrap();

        let interior = springs
            .iter()
            .find(|s| s.kind == SpringKind::Lateral && s.node == 1)
            .unwrap();
        assert_relative_eq!(interior.secant_stiffness(0.0), 2000.0);
    }

    #[test]
    fn test_spring_dof_mapping() {
        let spring = Spring {
            node: 3,
            kind: SpringKind::Rotational,
            depth: 6.0,
            curve: Curve::Linear { stiffness: 1.0 },
            scale: 1.0,
        };
        assert_eq!(spring.dof(), 3 * DOF_PER_NODE + 2);
    }
}
