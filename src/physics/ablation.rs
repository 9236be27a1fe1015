// ---------------------------------------------------------------------------
// Ablation mass-loss rates
// ---------------------------------------------------------------------------

/// Parameters for the simplified empirical ablation model.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimpleAblationParams {
    pub k_ab: f64, // empirical coefficient, kg·m^3·s^3
}

/// Parameters for the classical single-body ablation model.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClassicalAblationParams {
    pub sigma: f64,           // heat transfer coefficient
    pub q_star_j_per_kg: f64, // heat of ablation
}

/// dm/dt (kg/s) from the simplified model: -k_ab * rho * |v_rel|^3.
pub fn simple_ablation_rate(
    density_kg_m3: f64,
    rel_speed_mps: f64,
    params: SimpleAblationParams,
) -> f64 {
    -params.k_ab * density_kg_m3 * rel_speed_mps.powi(3)
}

/// dm/dt (kg/s) from the classical single-body approximation:
/// -(sigma * A * 1/2 rho |v_rel|^3) / Q*.
pub fn classical_ablation_rate(
    area_m2: f64,
    density_kg_m3: f64,
    rel_speed_mps: f64,
    params: ClassicalAblationParams,
) -> f64 {
    let convective_term = 0.5 * density_kg_m3 * rel_speed_mps.powi(3);
    -(params.sigma * area_m2 * convective_term) / params.q_star_j_per_kg
}
