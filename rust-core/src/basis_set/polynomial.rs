use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// One term of a polynomial: `coefficient * Π x_v^exponents[v]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Term {
    pub exponents: Vec<u32>,
    pub coefficient: f64,
}

impl Term {
    pub fn degree(&self) -> u32 {
        self.exponents.iter().sum()
    }
}

/// Sparse polynomial over a fixed number of variables.
///
/// Terms are kept sorted by exponent vector with no negligible coefficients,
/// so two polynomials built from the same terms compare equal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Polynomial {
    num_variables: usize,
    terms: Vec<Term>,
}

/// Image of each variable as a linear combination `Σ coefficient * x_index`.
pub type LinearMap = Vec<Vec<(usize, f64)>>;

impl Polynomial {
    pub fn zero(num_variables: usize) -> Self {
        Self {
            num_variables,
            terms: Vec::new(),
        }
    }

    /// The monomial with unit coefficient.
    pub fn monomial(exponents: Vec<u32>) -> Self {
        Self {
            num_variables: exponents.len(),
            terms: vec![Term {
                exponents,
                coefficient: 1.0,
            }],
        }
    }

    /// Sum of terms, merging equal monomials and dropping coefficients with |c| <= `tol`.
    pub fn from_terms<I>(num_variables: usize, terms: I, tol: f64) -> Self
    where
        I: IntoIterator<Item = (Vec<u32>, f64)>,
    {
        let mut merged: BTreeMap<Vec<u32>, f64> = BTreeMap::new();
        for (exponents, coefficient) in terms {
            *merged.entry(exponents).or_insert(0.0) += coefficient;
        }
        Self {
            num_variables,
            terms: merged
                .into_iter()
                .filter(|(_, c)| c.abs() > tol)
                .map(|(exponents, coefficient)| Term {
                    exponents,
                    coefficient,
                })
                .collect(),
        }
    }

    pub fn num_variables(&self) -> usize {
        self.num_variables
    }

    pub fn terms(&self) -> &[Term] {
        &self.terms
    }

    pub fn is_zero(&self) -> bool {
        self.terms.is_empty()
    }

    /// Highest total degree of any term (0 for the zero polynomial).
    pub fn degree(&self) -> u32 {
        self.terms.iter().map(Term::degree).max().unwrap_or(0)
    }

    pub fn evaluate(&self, values: &[f64]) -> f64 {
        self.terms
            .iter()
            .map(|term| {
                term.exponents
                    .iter()
                    .zip(values)
                    .fold(term.coefficient, |acc, (&e, &x)| acc * x.powi(e as i32))
            })
            .sum()
    }

    /// Inner product of coefficient vectors.
    pub fn dot(&self, other: &Polynomial) -> f64 {
        let (mut i, mut j) = (0, 0);
        let mut sum = 0.0;
        while i < self.terms.len() && j < other.terms.len() {
            match self.terms[i].exponents.cmp(&other.terms[j].exponents) {
                std::cmp::Ordering::Less => i += 1,
                std::cmp::Ordering::Greater => j += 1,
                std::cmp::Ordering::Equal => {
                    sum += self.terms[i].coefficient * other.terms[j].coefficient;
                    i += 1;
                    j += 1;
                }
            }
        }
        sum
    }

    pub fn norm(&self) -> f64 {
        self.dot(self).sqrt()
    }

    pub fn max_abs_coefficient(&self) -> f64 {
        self.terms
            .iter()
            .map(|t| t.coefficient.abs())
            .fold(0.0, f64::max)
    }

    pub fn scaled(&self, factor: f64) -> Polynomial {
        Polynomial {
            num_variables: self.num_variables,
            terms: self
                .terms
                .iter()
                .map(|t| Term {
                    exponents: t.exponents.clone(),
                    coefficient: t.coefficient * factor,
                })
                .collect(),
        }
    }

    /// `self + factor * other`.
    pub fn add_scaled(&self, other: &Polynomial, factor: f64, tol: f64) -> Polynomial {
        let terms = self
            .terms
            .iter()
            .map(|t| (t.exponents.clone(), t.coefficient))
            .chain(
                other
                    .terms
                    .iter()
                    .map(|t| (t.exponents.clone(), t.coefficient * factor)),
            );
        Polynomial::from_terms(self.num_variables, terms, tol)
    }

    /// Replace every variable `x_v` by the linear form `map[v]` and expand.
    pub fn substitute(&self, map: &LinearMap, tol: f64) -> Polynomial {
        let mut expanded: Vec<(Vec<u32>, f64)> = Vec::new();
        for term in &self.terms {
            let mut partial: BTreeMap<Vec<u32>, f64> = BTreeMap::new();
            partial.insert(vec![0; self.num_variables], term.coefficient);
            for (v, &exponent) in term.exponents.iter().enumerate() {
                for _ in 0..exponent {
                    let mut next: BTreeMap<Vec<u32>, f64> = BTreeMap::new();
                    for (exponents, c) in &partial {
                        for &(w, a) in &map[v] {
                            let mut product = exponents.clone();
                            product[w] += 1;
                            *next.entry(product).or_insert(0.0) += c * a;
                        }
                    }
                    partial = next;
                }
            }
            expanded.extend(partial);
        }
        Polynomial::from_terms(self.num_variables, expanded, tol)
    }
}
