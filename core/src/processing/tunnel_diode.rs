use once_cell::sync::Lazy;

use crate::prelude::{AntennaError, AntennaResult, ProcessingStage, ValueType, Waveform};

/// Length of the diode impulse response in seconds.
pub const KERNEL_DURATION: f64 = 1e-7;

/// Gaussian lobe `amplitude * exp(-(t - center)^2 / (2 width^2))`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GaussianLobe {
    pub amplitude: f64,
    pub center: f64,
    pub width: f64,
}

impl GaussianLobe {
    pub fn eval(&self, t: f64) -> f64 {
        let x = t - self.center;
        self.amplitude * (-(x * x) / (2.0 * self.width * self.width)).exp()
    }
}

/// Delayed rise `amplitude * (scale (t - start))^2 * exp(-(t - start) / width)`.
///
/// Zero up to and including `start`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RiseLobe {
    pub amplitude: f64,
    pub start: f64,
    pub width: f64,
    pub scale: f64,
}

impl RiseLobe {
    pub fn eval(&self, t: f64) -> f64 {
        if t <= self.start {
            return 0.0;
        }
        let x = t - self.start;
        let scaled = self.scale * x;
        self.amplitude * scaled * scaled * (-x / self.width).exp()
    }
}

/// Tunnel diode impulse response: two negative Gaussians and a balancing rise.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DiodeCoefficients {
    pub down1: GaussianLobe,
    pub down2: GaussianLobe,
    pub up: RiseLobe,
}

impl DiodeCoefficients {
    /// Coefficients of the ARA tunnel diode as tuned in AraSim.
    pub fn arasim() -> Self {
        let down1 = GaussianLobe {
            amplitude: -0.8,
            center: 15e-9,
            width: 2.3e-9,
        };
        let down2 = GaussianLobe {
            amplitude: -0.2,
            center: 15e-9,
            width: 4e-9,
        };
        let (start, width, scale) = (18e-9, 7e-9, 1e9);
        Self {
            down1,
            down2,
            up: RiseLobe {
                amplitude: balanced_rise_amplitude(&down1, &down2, width, scale),
                start,
                width,
                scale,
            },
        }
    }

    pub fn eval(&self, t: f64) -> f64 {
        self.down1.eval(t) + self.down2.eval(t) + self.up.eval(t)
    }

    /// Kernel sampled on `floor(duration / dt) + 1` evenly spaced points over `[0, 100 ns]`.
    pub fn kernel(&self, dt: f64) -> Vec<f64> {
        let intervals = (KERNEL_DURATION / dt) as usize;
        if intervals == 0 {
            return vec![self.eval(0.0)];
        }
        let step = KERNEL_DURATION / intervals as f64;
        (0..=intervals).map(|i| self.eval(i as f64 * step)).collect()
    }
}

/// Rise amplitude making the kernel integrate to zero.
///
/// The Gaussians integrate to `sqrt(2 pi) A sigma`; the rise integrates to
/// `2 A3 scale^2 width^3`.
pub fn balanced_rise_amplitude(
    down1: &GaussianLobe,
    down2: &GaussianLobe,
    width: f64,
    scale: f64,
) -> f64 {
    -(2.0 * std::f64::consts::PI).sqrt()
        * (down1.amplitude * down1.width + down2.amplitude * down2.width)
        / (2.0 * scale * scale * width.powi(3))
}

/// Process-wide diode coefficients.
pub static DIODE_COEFFICIENTS: Lazy<DiodeCoefficients> = Lazy::new(DiodeCoefficients::arasim);

/// Power-envelope detector: squared voltage over resistance convolved with the diode kernel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TunnelDiodeEnvelope {
    resistance: f64,
}

impl TunnelDiodeEnvelope {
    pub fn new(resistance: f64) -> AntennaResult<Self> {
        if !(resistance > 0.0) {
            return Err(AntennaError::InvalidInput(format!(
                "resistance must be positive, got {}",
                resistance
            )));
        }
        Ok(Self { resistance })
    }

    pub fn resistance(&self) -> f64 {
        self.resistance
    }

    /// Convolves `values^2 / R` with the kernel, keeps the first `len` samples
    /// and multiplies by `dt` so the amplitude does not depend on the step.
    pub fn tunnel_diode(&self, signal: &Waveform) -> AntennaResult<Waveform> {
        if signal.value_type() != ValueType::Voltage {
            return Err(AntennaError::ValueType {
                expected: "voltage",
                found: signal.value_type(),
            });
        }
        let dt = signal.dt();
        let kernel = DIODE_COEFFICIENTS.kernel(dt);
        let power: Vec<f64> = signal
            .values()
            .iter()
            .map(|v| v * v / self.resistance)
            .collect();

        let mut output = vec![0.0; power.len()];
        for (i, out) in output.iter_mut().enumerate() {
            let taps = kernel.len().min(i + 1);
            let acc: f64 = (0..taps).map(|j| power[i - j] * kernel[j]).sum();
            *out = acc * dt;
        }

        Ok(signal.with_values(output.into(), ValueType::Power))
    }
}

impl ProcessingStage for TunnelDiodeEnvelope {
    fn name(&self) -> &'static str {
        "tunnel_diode"
    }

    fn execute(&self, input: &Waveform) -> AntennaResult<Waveform> {
        self.tunnel_diode(input)
    }
}
