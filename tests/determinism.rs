use catena::{Integrator, Simulation, SimulationConfig, Vec3};

fn run(integrator: Integrator<f64>) -> Vec<Vec3<f64>> {
    let config = SimulationConfig::new()
        .with_gravity(Vec3::new(0.0, 0.0, -9.81))
        .with_iterations(8)
        .with_integrator(integrator);
    let mut sim = Simulation::chain(Vec3::new(0.0, 0.0, 5.0), 10, 0.4, 1.0, config).unwrap();
    sim.enable_ground(2.5, 0.3);
    sim.add_collision_sphere(Vec3::new(0.3, 0.0, 3.5), 0.5);
    sim.apply_impulse(Vec3::new(25.0, 10.0, 0.0));
    for _ in 0..60 {
        sim.update(1.0 / 60.0);
    }
    sim.positions()
}

#[test]
fn verlet_chain_deterministic() {
    let results: Vec<_> = (0..5).map(|_| run(Integrator::Verlet)).collect();
    for r in &results[1..] {
        assert_eq!(&results[0], r);
    }
}

#[test]
fn spring_chain_deterministic() {
    let results: Vec<_> = (0..5).map(|_| run(Integrator::spring_damper())).collect();
    for r in &results[1..] {
        assert_eq!(&results[0], r);
    }
}
