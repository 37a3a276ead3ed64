use std::collections::HashMap;

/// Measured gain and phase at one grid point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridPoint {
    pub gain: f64,
    pub phase: f64,
}

/// Hashable `(frequency, theta, phi)` key; the frequency is stored by bit pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ResponseKey {
    frequency_bits: u64,
    pub theta: i32,
    pub phi: i32,
}

impl ResponseKey {
    pub fn new(frequency: f64, theta: i32, phi: i32) -> Self {
        Self {
            frequency_bits: frequency.to_bits(),
            theta,
            phi,
        }
    }

    pub fn frequency(&self) -> f64 {
        f64::from_bits(self.frequency_bits)
    }
}

/// Raw contents of a response file: every parsed grid point plus the frequency blocks seen.
#[derive(Debug, Clone, Default)]
pub struct ResponseData {
    entries: HashMap<ResponseKey, GridPoint>,
    frequencies: Vec<f64>,
    swr: Vec<(f64, f64)>,
}

impl ResponseData {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a frequency block; repeated frequencies are kept once.
    pub fn add_frequency(&mut self, frequency: f64) {
        if !self.contains_frequency(frequency) {
            self.frequencies.push(frequency);
        }
    }

    pub fn insert(&mut self, frequency: f64, theta: i32, phi: i32, point: GridPoint) {
        self.entries
            .insert(ResponseKey::new(frequency, theta, phi), point);
    }

    pub fn set_swr(&mut self, frequency: f64, swr: f64) {
        match self.swr.iter_mut().find(|(f, _)| f.to_bits() == frequency.to_bits()) {
            Some(entry) => entry.1 = swr,
            None => self.swr.push((frequency, swr)),
        }
    }

    pub fn get(&self, frequency: f64, theta: i32, phi: i32) -> Option<GridPoint> {
        self.entries
            .get(&ResponseKey::new(frequency, theta, phi))
            .copied()
    }

    /// Standing wave ratio recorded for a frequency block, if the file gave one.
    pub fn swr(&self, frequency: f64) -> Option<f64> {
        self.swr
            .iter()
            .find(|(f, _)| f.to_bits() == frequency.to_bits())
            .map(|(_, swr)| *swr)
    }

    pub fn contains_frequency(&self, frequency: f64) -> bool {
        self.frequencies
            .iter()
            .any(|f| f.to_bits() == frequency.to_bits())
    }

    /// Frequencies in the order their blocks appeared.
    pub fn frequencies(&self) -> &[f64] {
        &self.frequencies
    }

    pub fn entries(&self) -> impl Iterator<Item = (&ResponseKey, &GridPoint)> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
