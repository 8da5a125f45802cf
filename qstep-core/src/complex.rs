//! Aritmética complexa mínima para amplitudes

use serde::{Deserialize, Serialize};
use std::fmt;

/// Número complexo simples (amplitude)
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Complex {
    pub re: f64,
    pub im: f64,
}

impl Complex {
    /// Zero complexo
    pub const ZERO: Self = Self { re: 0.0, im: 0.0 };

    /// Um complexo
    pub const ONE: Self = Self { re: 1.0, im: 0.0 };

    /// Unidade imaginária
    pub const I: Self = Self { re: 0.0, im: 1.0 };

    /// Cria número complexo
    pub const fn new(re: f64, im: f64) -> Self {
        Self { re, im }
    }

    /// Cria número puramente real
    pub const fn real(re: f64) -> Self {
        Self { re, im: 0.0 }
    }

    /// Exponencial complexa: e^(i*theta)
    pub fn from_polar(theta: f64) -> Self {
        Self {
            re: theta.cos(),
            im: theta.sin(),
        }
    }

    /// Conjugado
    pub fn conj(self) -> Self {
        Self { re: self.re, im: -self.im }
    }

    /// Módulo ao quadrado
    pub fn norm_sq(self) -> f64 {
        self.re * self.re + self.im * self.im
    }

    /// Módulo
    pub fn abs(self) -> f64 {
        self.norm_sq().sqrt()
    }

    /// Fase (argumento)
    pub fn arg(self) -> f64 {
        self.im.atan2(self.re)
    }

    /// Adição
    pub fn add(self, other: Self) -> Self {
        Self {
            re: self.re + other.re,
            im: self.im + other.im,
        }
    }

    /// Multiplicação
    pub fn mul(self, other: Self) -> Self {
        Self {
            re: self.re * other.re - self.im * other.im,
            im: self.re * other.im + self.im * other.re,
        }
    }

    /// Multiplicação por escalar
    pub fn scale(self, s: f64) -> Self {
        Self {
            re: self.re * s,
            im: self.im * s,
        }
    }

    /// Compara com tolerância absoluta por componente
    pub fn approx_eq(self, other: Self, epsilon: f64) -> bool {
        (self.re - other.re).abs() < epsilon && (self.im - other.im).abs() < epsilon
    }
}

impl fmt::Display for Complex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let precision = f.precision().unwrap_or(3);
        let tiny = 1e-10;
        if self.im.abs() < tiny {
            write!(f, "{:.*}", precision, self.re)
        } else if self.re.abs() < tiny {
            write!(f, "{:.*}i", precision, self.im)
        } else if self.im < 0.0 {
            write!(f, "{:.*}-{:.*}i", precision, self.re, precision, -self.im)
        } else {
            write!(f, "{:.*}+{:.*}i", precision, self.re, precision, self.im)
        }
    }
}
