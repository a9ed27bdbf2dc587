//! Butcher tableaux of the supported Runge-Kutta schemes

use crate::config::IntegratorType;

/// Coefficients of a Runge-Kutta method
#[derive(Debug, Clone, PartialEq)]
pub struct ButcherTableau {
    /// Stage coefficient matrix, row-major
    pub a: Vec<Vec<f64>>,
    /// Weights
    pub b: Vec<f64>,
    /// Nodes
    pub c: Vec<f64>,
}

impl ButcherTableau {
    /// Tableau of `scheme`
    pub fn for_scheme(scheme: IntegratorType) -> Self {
        match scheme {
            IntegratorType::ExplicitEuler => Self {
                a: vec![vec![0.0]],
                b: vec![1.0],
                c: vec![0.0],
            },
            IntegratorType::Rk2 => Self {
                a: vec![vec![0.0, 0.0], vec![0.5, 0.0]],
                b: vec![0.0, 1.0],
                c: vec![0.0, 0.5],
            },
            IntegratorType::Rk3 => Self {
                a: vec![
                    vec![0.0, 0.0, 0.0],
                    vec![0.5, 0.0, 0.0],
                    vec![-1.0, 2.0, 0.0],
                ],
                b: vec![1.0 / 6.0, 2.0 / 3.0, 1.0 / 6.0],
                c: vec![0.0, 0.5, 1.0],
            },
            IntegratorType::Rk4 => Self {
                a: vec![
                    vec![0.0, 0.0, 0.0, 0.0],
                    vec![0.5, 0.0, 0.0, 0.0],
                    vec![0.0, 0.5, 0.0, 0.0],
                    vec![0.0, 0.0, 1.0, 0.0],
                ],
                b: vec![1.0 / 6.0, 1.0 / 3.0, 1.0 / 3.0, 1.0 / 6.0],
                c: vec![0.0, 0.5, 0.5, 1.0],
            },
            IntegratorType::IrkGl2 => Self {
                a: vec![vec![0.5]],
                b: vec![1.0],
                c: vec![0.5],
            },
            IntegratorType::IrkGl4 => {
                let s = 3f64.sqrt() / 6.0;
                Self {
                    a: vec![vec![0.25, 0.25 - s], vec![0.25 + s, 0.25]],
                    b: vec![0.5, 0.5],
                    c: vec![0.5 - s, 0.5 + s],
                }
            }
            IntegratorType::IrkGl6 => {
                let r = 15f64.sqrt();
                Self {
                    a: vec![
                        vec![5.0 / 36.0, 2.0 / 9.0 - r / 15.0, 5.0 / 36.0 - r / 30.0],
                        vec![5.0 / 36.0 + r / 24.0, 2.0 / 9.0, 5.0 / 36.0 - r / 24.0],
                        vec![5.0 / 36.0 + r / 30.0, 2.0 / 9.0 + r / 15.0, 5.0 / 36.0],
                    ],
                    b: vec![5.0 / 18.0, 4.0 / 9.0, 5.0 / 18.0],
                    c: vec![0.5 - r / 10.0, 0.5, 0.5 + r / 10.0],
                }
            }
            IntegratorType::IrkRiia1 => Self {
                a: vec![vec![1.0]],
                b: vec![1.0],
                c: vec![1.0],
            },
            IntegratorType::IrkRiia3 => Self {
                a: vec![vec![5.0 / 12.0, -1.0 / 12.0], vec![0.75, 0.25]],
                b: vec![0.75, 0.25],
                c: vec![1.0 / 3.0, 1.0],
            },
            IntegratorType::IrkRiia5 => {
                let q = 6f64.sqrt();
                let last = vec![(16.0 - q) / 36.0, (16.0 + q) / 36.0, 1.0 / 9.0];
                Self {
                    a: vec![
                        vec![
                            (88.0 - 7.0 * q) / 360.0,
                            (296.0 - 169.0 * q) / 1800.0,
                            (-2.0 + 3.0 * q) / 225.0,
                        ],
                        vec![
                            (296.0 + 169.0 * q) / 1800.0,
                            (88.0 + 7.0 * q) / 360.0,
                            (-2.0 - 3.0 * q) / 225.0,
                        ],
                        last.clone(),
                    ],
                    b: last,
                    c: vec![(4.0 - q) / 10.0, (4.0 + q) / 10.0, 1.0],
                }
            }
        }
    }

    /// Number of stages
    pub fn stages(&self) -> usize {
        self.b.len()
    }

    /// Whether the stage matrix is strictly lower triangular
    pub fn is_explicit(&self) -> bool {
        self.a
            .iter()
            .enumerate()
            .all(|(i, row)| row.iter().skip(i).all(|v| *v == 0.0))
    }
}
