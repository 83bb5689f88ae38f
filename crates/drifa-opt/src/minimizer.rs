//! Classical minimizers for the variational loop.
//!
//! Three methods cover the common regimes:
//!
//! - [`GradientDescent`] — plain shift-rule gradients with optional
//!   momentum; the baseline for exact (shot-free) objectives.
//! - [`Adam`] — per-component adaptive steps; robust default.
//! - [`Spsa`] — simultaneous-perturbation stochastic approximation;
//!   two objective evaluations per step regardless of dimension, suited
//!   to sampled noisy objectives where shift-rule gradients are
//!   expensive or drowned in shot noise.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use drifa_ir::Bindings;
use drifa_noise::NoiseSource;
use drifa_sim::Simulator;

use crate::error::{OptError, OptResult};
use crate::gradient::gradient;
use crate::objective::Objective;

/// One evaluated iteration of a minimization run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IterationRecord {
    /// Iteration index (0-based).
    pub iteration: usize,
    /// Objective value at these parameters.
    pub energy: f64,
    /// Parameter values, aligned with the run's variable order.
    pub params: Vec<f64>,
}

/// The outcome of a minimization run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimizeResult {
    /// Variable names, sorted; `params` entries align with this order.
    pub variables: Vec<String>,
    /// Best objective value seen.
    pub best_energy: f64,
    /// Bindings achieving `best_energy`.
    pub best_params: Bindings,
    /// Energy trajectory, one record per iteration.
    pub history: Vec<IterationRecord>,
    /// Number of iterations executed.
    pub iterations: usize,
    /// True if the energy change fell below tolerance before the
    /// iteration cap.
    pub converged: bool,
}

/// A classical optimizer minimizing an [`Objective`].
pub trait Minimizer {
    /// Minimize the objective starting from `initial` bindings.
    ///
    /// `shots = None` evaluates objectives exactly; `Some(n)` samples
    /// them with `n` shots per expectation value.
    fn minimize(
        &self,
        objective: &Objective,
        initial: &Bindings,
        simulator: &Simulator,
        shots: Option<u64>,
        noise: &NoiseSource,
    ) -> OptResult<OptimizeResult>;
}

/// Shared run bookkeeping: variable ordering, history, best tracking.
struct Run {
    variables: Vec<String>,
    history: Vec<IterationRecord>,
    best_energy: f64,
    best_params: Vec<f64>,
    previous_energy: Option<f64>,
}

impl Run {
    fn start(objective: &Objective, initial: &Bindings) -> OptResult<(Self, Vec<f64>)> {
        let mut variables: Vec<String> = objective.variables().into_iter().collect();
        variables.sort();
        if variables.is_empty() {
            return Err(OptError::NoVariables);
        }
        let params: Vec<f64> = variables
            .iter()
            .map(|v| initial.get(v).copied().unwrap_or(0.0))
            .collect();
        Ok((
            Self {
                variables,
                history: vec![],
                best_energy: f64::INFINITY,
                best_params: params.clone(),
                previous_energy: None,
            },
            params,
        ))
    }

    fn bindings(&self, params: &[f64]) -> Bindings {
        self.variables
            .iter()
            .cloned()
            .zip(params.iter().copied())
            .collect()
    }

    /// Record an iteration; returns true when the energy change fell
    /// below `tolerance`.
    fn record(
        &mut self,
        iteration: usize,
        energy: f64,
        params: &[f64],
        tolerance: f64,
    ) -> OptResult<bool> {
        if !energy.is_finite() {
            return Err(OptError::NonFiniteEnergy { iteration });
        }
        if energy < self.best_energy {
            self.best_energy = energy;
            self.best_params = params.to_vec();
        }
        self.history.push(IterationRecord {
            iteration,
            energy,
            params: params.to_vec(),
        });
        debug!(iteration, energy, "minimizer step");

        let converged = self
            .previous_energy
            .is_some_and(|prev| (prev - energy).abs() < tolerance);
        self.previous_energy = Some(energy);
        Ok(converged)
    }

    fn finish(self, converged: bool) -> OptimizeResult {
        let iterations = self.history.len();
        info!(
            best_energy = self.best_energy,
            iterations, converged, "minimization finished"
        );
        let best_params = self
            .variables
            .iter()
            .cloned()
            .zip(self.best_params.iter().copied())
            .collect();
        OptimizeResult {
            variables: self.variables,
            best_energy: self.best_energy,
            best_params,
            history: self.history,
            iterations,
            converged,
        }
    }
}

/// Plain gradient descent with optional momentum.
#[derive(Debug, Clone)]
pub struct GradientDescent {
    learning_rate: f64,
    momentum: f64,
    max_iterations: usize,
    tolerance: f64,
}

impl Default for GradientDescent {
    fn default() -> Self {
        Self {
            learning_rate: 0.1,
            momentum: 0.0,
            max_iterations: 100,
            tolerance: 1e-6,
        }
    }
}

impl GradientDescent {
    /// Create with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the learning rate.
    #[must_use]
    pub fn with_learning_rate(mut self, learning_rate: f64) -> Self {
        self.learning_rate = learning_rate;
        self
    }

    /// Set the momentum coefficient (0.0 disables momentum).
    #[must_use]
    pub fn with_momentum(mut self, momentum: f64) -> Self {
        self.momentum = momentum;
        self
    }

    /// Set the iteration cap.
    #[must_use]
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Set the convergence tolerance on the energy change.
    #[must_use]
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }
}

impl Minimizer for GradientDescent {
    fn minimize(
        &self,
        objective: &Objective,
        initial: &Bindings,
        simulator: &Simulator,
        shots: Option<u64>,
        noise: &NoiseSource,
    ) -> OptResult<OptimizeResult> {
        let (mut run, mut params) = Run::start(objective, initial)?;
        let mut velocity = vec![0.0; params.len()];

        for iteration in 0..self.max_iterations {
            let bindings = run.bindings(&params);
            let energy = objective.evaluate(simulator, &bindings, shots, noise)?;
            if run.record(iteration, energy, &params, self.tolerance)? {
                return Ok(run.finish(true));
            }

            let grad = gradient(objective, &run.variables, simulator, &bindings, shots, noise)?;
            for ((p, v), g) in params.iter_mut().zip(&mut velocity).zip(&grad) {
                *v = self.momentum * *v - self.learning_rate * g;
                *p += *v;
            }
        }
        Ok(run.finish(false))
    }
}

/// Adam: adaptive moment estimation.
#[derive(Debug, Clone)]
pub struct Adam {
    learning_rate: f64,
    beta1: f64,
    beta2: f64,
    epsilon: f64,
    max_iterations: usize,
    tolerance: f64,
}

impl Default for Adam {
    fn default() -> Self {
        Self {
            learning_rate: 0.05,
            beta1: 0.9,
            beta2: 0.999,
            epsilon: 1e-8,
            max_iterations: 200,
            tolerance: 1e-6,
        }
    }
}

impl Adam {
    /// Create with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the learning rate.
    #[must_use]
    pub fn with_learning_rate(mut self, learning_rate: f64) -> Self {
        self.learning_rate = learning_rate;
        self
    }

    /// Set the iteration cap.
    #[must_use]
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Set the convergence tolerance on the energy change.
    #[must_use]
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }
}

impl Minimizer for Adam {
    fn minimize(
        &self,
        objective: &Objective,
        initial: &Bindings,
        simulator: &Simulator,
        shots: Option<u64>,
        noise: &NoiseSource,
    ) -> OptResult<OptimizeResult> {
        let (mut run, mut params) = Run::start(objective, initial)?;
        let mut m = vec![0.0; params.len()];
        let mut v = vec![0.0; params.len()];

        for iteration in 0..self.max_iterations {
            let bindings = run.bindings(&params);
            let energy = objective.evaluate(simulator, &bindings, shots, noise)?;
            if run.record(iteration, energy, &params, self.tolerance)? {
                return Ok(run.finish(true));
            }

            let grad = gradient(objective, &run.variables, simulator, &bindings, shots, noise)?;
            let t = (iteration + 1) as f64;
            for k in 0..params.len() {
                m[k] = self.beta1 * m[k] + (1.0 - self.beta1) * grad[k];
                v[k] = self.beta2 * v[k] + (1.0 - self.beta2) * grad[k] * grad[k];
                let m_hat = m[k] / (1.0 - self.beta1.powf(t));
                let v_hat = v[k] / (1.0 - self.beta2.powf(t));
                params[k] -= self.learning_rate * m_hat / (v_hat.sqrt() + self.epsilon);
            }
        }
        Ok(run.finish(false))
    }
}

/// Simultaneous-perturbation stochastic approximation.
///
/// Estimates the gradient from two objective evaluations at randomly
/// perturbed parameter vectors, making the per-step cost independent of
/// the parameter count.
#[derive(Debug, Clone)]
pub struct Spsa {
    step_size: f64,
    perturbation: f64,
    max_iterations: usize,
    tolerance: f64,
    seed: u64,
}

impl Default for Spsa {
    fn default() -> Self {
        Self {
            step_size: 0.2,
            perturbation: 0.1,
            max_iterations: 200,
            tolerance: 1e-6,
            seed: 0,
        }
    }
}

impl Spsa {
    /// Create with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the base step size `a`.
    #[must_use]
    pub fn with_step_size(mut self, step_size: f64) -> Self {
        self.step_size = step_size;
        self
    }

    /// Set the base perturbation size `c`.
    #[must_use]
    pub fn with_perturbation(mut self, perturbation: f64) -> Self {
        self.perturbation = perturbation;
        self
    }

    /// Set the iteration cap.
    #[must_use]
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Set the convergence tolerance on the energy change.
    #[must_use]
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Seed the perturbation sampler.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }
}

impl Minimizer for Spsa {
    fn minimize(
        &self,
        objective: &Objective,
        initial: &Bindings,
        simulator: &Simulator,
        shots: Option<u64>,
        noise: &NoiseSource,
    ) -> OptResult<OptimizeResult> {
        let (mut run, mut params) = Run::start(objective, initial)?;
        let mut rng = StdRng::seed_from_u64(self.seed);

        for iteration in 0..self.max_iterations {
            let bindings = run.bindings(&params);
            let energy = objective.evaluate(simulator, &bindings, shots, noise)?;
            if run.record(iteration, energy, &params, self.tolerance)? {
                return Ok(run.finish(true));
            }

            // Decaying gains (standard SPSA schedules).
            let k = iteration as f64;
            let ak = self.step_size / (k + 1.0).powf(0.602);
            let ck = self.perturbation / (k + 1.0).powf(0.101);

            let delta: Vec<f64> = (0..params.len())
                .map(|_| if rng.r#gen::<bool>() { 1.0 } else { -1.0 })
                .collect();

            let shifted = |sign: f64| -> Vec<f64> {
                params
                    .iter()
                    .zip(&delta)
                    .map(|(p, d)| p + sign * ck * d)
                    .collect()
            };
            let e_plus =
                objective.evaluate(simulator, &run.bindings(&shifted(1.0)), shots, noise)?;
            let e_minus =
                objective.evaluate(simulator, &run.bindings(&shifted(-1.0)), shots, noise)?;

            for (p, d) in params.iter_mut().zip(&delta) {
                *p -= ak * (e_plus - e_minus) / (2.0 * ck * d);
            }
        }
        Ok(run.finish(false))
    }
}

/// Method selector for [`minimize`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Method {
    /// [`GradientDescent`] with defaults.
    GradientDescent,
    /// [`Adam`] with defaults.
    Adam,
    /// [`Spsa`] with defaults.
    Spsa,
}

/// Minimize an objective with a method's default configuration.
pub fn minimize(
    objective: &Objective,
    method: Method,
    initial: &Bindings,
    simulator: &Simulator,
    shots: Option<u64>,
    noise: &NoiseSource,
) -> OptResult<OptimizeResult> {
    match method {
        Method::GradientDescent => {
            GradientDescent::new().minimize(objective, initial, simulator, shots, noise)
        }
        Method::Adam => Adam::new().minimize(objective, initial, simulator, shots, noise),
        Method::Spsa => Spsa::new().minimize(objective, initial, simulator, shots, noise),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::objective::ExpectationValue;
    use drifa_ir::{Circuit, Hamiltonian, HamiltonianTerm, QubitId};

    fn cos_objective() -> Objective {
        // E(θ) = cos θ, minimum -1 at θ = π.
        let mut circuit = Circuit::with_size("ry", 1);
        circuit.ry("theta", QubitId(0)).unwrap();
        Objective::from(ExpectationValue::new(
            circuit,
            Hamiltonian::from(HamiltonianTerm::z(0, 1.0)),
        ))
    }

    fn initial(theta: f64) -> Bindings {
        let mut b = Bindings::default();
        b.insert("theta".to_string(), theta);
        b
    }

    #[test]
    fn test_gradient_descent_reaches_minimum() {
        let result = GradientDescent::new()
            .with_learning_rate(0.3)
            .with_max_iterations(150)
            .minimize(
                &cos_objective(),
                &initial(0.5),
                &Simulator::new(),
                None,
                &NoiseSource::Ideal,
            )
            .unwrap();

        assert!(result.best_energy < -0.999);
        let theta = result.best_params["theta"];
        assert!((theta - std::f64::consts::PI).abs() < 0.05);
    }

    #[test]
    fn test_adam_reaches_minimum() {
        let result = Adam::new()
            .with_learning_rate(0.2)
            .with_max_iterations(300)
            .minimize(
                &cos_objective(),
                &initial(0.4),
                &Simulator::new(),
                None,
                &NoiseSource::Ideal,
            )
            .unwrap();

        assert!(result.best_energy < -0.99);
    }

    #[test]
    fn test_spsa_improves_energy() {
        let result = Spsa::new()
            .with_seed(17)
            .with_max_iterations(300)
            .minimize(
                &cos_objective(),
                &initial(0.4),
                &Simulator::new(),
                None,
                &NoiseSource::Ideal,
            )
            .unwrap();

        // SPSA is stochastic; require a clear improvement over the start.
        assert!(result.best_energy < -0.8);
    }

    #[test]
    fn test_history_is_recorded() {
        let result = GradientDescent::new()
            .with_max_iterations(10)
            .with_tolerance(0.0)
            .minimize(
                &cos_objective(),
                &initial(1.0),
                &Simulator::new(),
                None,
                &NoiseSource::Ideal,
            )
            .unwrap();

        assert_eq!(result.iterations, 10);
        assert_eq!(result.history.len(), 10);
        assert!(!result.converged);
        assert!(result.history[0].energy >= result.best_energy);
    }

    #[test]
    fn test_no_variables_rejected() {
        let objective = Objective::constant(1.0);
        let result = GradientDescent::new().minimize(
            &objective,
            &Bindings::default(),
            &Simulator::new(),
            None,
            &NoiseSource::Ideal,
        );
        assert!(matches!(result, Err(OptError::NoVariables)));
    }

    #[test]
    fn test_convenience_entry_point() {
        let result = minimize(
            &cos_objective(),
            Method::Adam,
            &initial(0.7),
            &Simulator::new(),
            None,
            &NoiseSource::Ideal,
        )
        .unwrap();
        assert!(result.best_energy < -0.9);
    }
}
