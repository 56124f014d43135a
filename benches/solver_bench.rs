use criterion::{black_box, criterion_group, criterion_main, Criterion};
use pile_solver::prelude::*;

fn elastic_model() -> Model {
    let pile = Pile::circular("bench", 30.0, 2.0, 0.04, Material::steel()).unwrap();
    let profile = SoilProfile::new(
        "elastic",
        vec![SoilLayer::new("sand", 0.0, 35.0, SoilModel::elastic(10_000.0))],
    )
    .unwrap();
    let mut model = Model::new("bench-elastic", pile, profile);
    model.add_point_load(0.0, PointLoad::lateral(1000.0)).unwrap();
    model.set_element_size(0.25).unwrap();
    model
}

fn nonlinear_model() -> Model {
    let pile = Pile::circular("bench", 30.0, 2.0, 0.04, Material::steel()).unwrap();
    let profile = SoilProfile::new(
        "clay",
        vec![SoilLayer::new(
            "soft clay",
            0.0,
            35.0,
            SoilModel::ApiClay {
                undrained_strength: 60.0,
                effective_unit_weight: 8.5,
                strain_at_half: 0.01,
            },
        )],
    )
    .unwrap();
    let mut model = Model::new("bench-nonlinear", pile, profile);
    model.add_point_load(0.0, PointLoad::lateral(2000.0)).unwrap();
    model.set_element_size(0.25).unwrap();
    model
}

fn bench_elastic(c: &mut Criterion) {
    let model = elastic_model();
    let options = SolverOptions::default();
    c.bench_function("elastic monopile", |b| {
        b.iter(|| black_box(&model).analyze(&options).unwrap())
    });
}

fn bench_nonlinear(c: &mut Criterion) {
    let model = nonlinear_model();
    let options = SolverOptions::default();
    c.bench_function("nonlinear clay monopile", |b| {
        b.iter(|| black_box(&model).analyze(&options).unwrap())
    });
}

criterion_group!(benches, bench_elastic, bench_nonlinear);
criterion_main!(benches);
