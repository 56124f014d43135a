//! Worked example: laterally loaded offshore monopile in layered soil

use anyhow::Result;
use pile_solver::prelude::*;

fn main() -> Result<()> {
    env_logger::init();

    // 30 m steel monopile, 2 m diameter, heavier wall over the top third
    let material = Material::steel();
    let pile = Pile::new(
        "monopile",
        vec![
            PileSegment::circular(10.0, 2.0, 0.05, material),
            PileSegment::circular(20.0, 2.0, 0.035, material),
        ],
    )?;

    let profile = SoilProfile::new(
        "north-sea",
        vec![
            SoilLayer::new(
                "dense sand",
                0.0,
                12.0,
                SoilModel::ApiSand {
                    friction_angle: 38.0,
                    effective_unit_weight: 10.0,
                    initial_modulus: 40_000.0,
                },
            ),
            SoilLayer::new(
                "stiff clay",
                12.0,
                40.0,
                SoilModel::ApiClay {
                    undrained_strength: 120.0,
                    effective_unit_weight: 9.0,
                    strain_at_half: 0.005,
                },
            ),
        ],
    )?;

    let mut model = Model::new("example", pile, profile);
    model.add_point_load(0.0, PointLoad::new(0.0, 1500.0, 20_000.0))?;
    model.add_support(30.0, Support::axial_only())?;
    model.set_self_weight(true);
    model.set_element_size(0.5)?;

    let report = model.analyze(&SolverOptions::default())?;

    println!("converged in {} iterations (residual {:.2e})", report.iterations, report.residual);
    println!();
    println!("{:>8} {:>14} {:>12}", "depth", "deflection", "rotation");
    println!("{:>8} {:>14} {:>12}", "[m]", "[mm]", "[mrad]");
    for node in report.nodes.iter().step_by(4) {
        println!(
            "{:>8.2} {:>14.3} {:>12.3}",
            node.depth,
            node.deflection * 1000.0,
            node.rotation * 1000.0
        );
    }

    println!();
    println!("{:>8} {:>12} {:>12} {:>12}", "depth", "N [kN]", "V [kN]", "M [kNm]");
    for forces in report.forces.iter().step_by(4) {
        println!(
            "{:>8.2} {:>12.1} {:>12.1} {:>12.1}",
            forces.depth_top, forces.axial_top, forces.shear_top, forces.moment_top
        );
    }

    println!();
    println!("head deflection : {:.1} mm", report.head_deflection() * 1000.0);
    println!("head rotation   : {:.2} mrad", report.head_rotation() * 1000.0);
    println!("max |M|         : {:.0} kNm", report.max_abs_moment());
    println!("max mobilization: {:.0} %", report.max_mobilization() * 100.0);

    for warning in &report.warnings {
        println!("warning: {}", warning);
    }

    Ok(())
}
