//! Random background sequences with a given length range and GC content.
use crate::error::{Result, SimulationError};
use rand::Rng;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SequenceConfig {
    min_len: usize,
    max_len: usize,
    /// Probability of G or C at each base.
    gc_content: f64,
}

impl Default for SequenceConfig {
    fn default() -> Self {
        Self {
            min_len: 200,
            max_len: 200,
            gc_content: 0.5,
        }
    }
}

impl SequenceConfig {
    pub fn new(min_len: usize, max_len: usize, gc_content: f64) -> Result<Self> {
        let mut config = Self::default();
        config.set_length_range(min_len, max_len)?;
        config.set_gc_content(gc_content)?;
        Ok(config)
    }
    pub fn min_len(&self) -> usize {
        self.min_len
    }
    pub fn max_len(&self) -> usize {
        self.max_len
    }
    pub fn gc_content(&self) -> f64 {
        self.gc_content
    }
    pub fn set_length_range(&mut self, min_len: usize, max_len: usize) -> Result<()> {
        if max_len < min_len {
            let reason = format!("min length {} > max length {}", min_len, max_len);
            return Err(SimulationError::InvalidConfig(reason));
        }
        self.min_len = min_len;
        self.max_len = max_len;
        Ok(())
    }
    pub fn set_length(&mut self, len: usize) -> Result<()> {
        self.set_length_range(len, len)
    }
    pub fn set_gc_content(&mut self, gc_content: f64) -> Result<()> {
        if !(0f64..=1f64).contains(&gc_content) {
            let reason = format!("GC content {} is not in [0,1]", gc_content);
            return Err(SimulationError::InvalidConfig(reason));
        }
        self.gc_content = gc_content;
        Ok(())
    }
    /// Deserialized configurations bypass the setters.
    pub fn validate(&self) -> Result<()> {
        Self::new(self.min_len, self.max_len, self.gc_content).map(|_| ())
    }
}

/// Emit i.i.d. random nucleotide sequences.
#[derive(Debug, Clone)]
pub struct RandomSequenceEmitter<R: Rng> {
    config: SequenceConfig,
    rng: R,
}

impl<R: Rng> RandomSequenceEmitter<R> {
    pub fn new(rng: R) -> Self {
        Self::with_config(SequenceConfig::default(), rng)
    }
    pub fn with_config(config: SequenceConfig, rng: R) -> Self {
        Self { config, rng }
    }
    pub fn config(&self) -> &SequenceConfig {
        &self.config
    }
    pub fn config_mut(&mut self) -> &mut SequenceConfig {
        &mut self.config
    }
    pub fn emit(&mut self) -> String {
        let (min, max) = (self.config.min_len, self.config.max_len);
        let len = self.rng.gen_range(min..=max);
        let gc = self.config.gc_content;
        (0..len)
            .map(|_| random_base(gc, &mut self.rng) as char)
            .collect()
    }
}

fn random_base<R: Rng>(gc_content: f64, rng: &mut R) -> u8 {
    let bases = if rng.gen_bool(gc_content) {
        b"GC"
    } else {
        b"AT"
    };
    bases[rng.gen_bool(0.5) as usize]
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_xoshiro::Xoshiro256PlusPlus;
    fn emitter(seed: u64) -> RandomSequenceEmitter<Xoshiro256PlusPlus> {
        RandomSequenceEmitter::new(SeedableRng::seed_from_u64(seed))
    }
    #[test]
    fn default_config() {
        let mut em = emitter(0);
        assert_eq!(em.config(), &SequenceConfig::default());
        let seq = em.emit();
        assert_eq!(seq.len(), 200);
        assert!(seq.bytes().all(|b| b"ACGT".contains(&b)));
    }
    #[test]
    fn gc_only() {
        let mut em = emitter(1);
        em.config_mut().set_length(50).unwrap();
        em.config_mut().set_gc_content(1f64).unwrap();
        for _ in 0..100 {
            let seq = em.emit();
            assert_eq!(seq.len(), 50);
            assert!(seq.bytes().all(|b| b == b'G' || b == b'C'));
        }
    }
    #[test]
    fn at_only() {
        let mut em = emitter(2);
        em.config_mut().set_gc_content(0f64).unwrap();
        for _ in 0..100 {
            assert!(em.emit().bytes().all(|b| b == b'A' || b == b'T'));
        }
    }
    #[test]
    fn gc_fraction() {
        let config = SequenceConfig::new(10_000, 10_000, 0.3).unwrap();
        let mut em = RandomSequenceEmitter::with_config(config, Xoshiro256PlusPlus::seed_from_u64(3));
        let seq = em.emit();
        let gc = seq.bytes().filter(|b| b"GC".contains(b)).count();
        let frac = gc as f64 / seq.len() as f64;
        assert!((frac - 0.3).abs() < 0.03, "{}", frac);
        let g = seq.bytes().filter(|&b| b == b'G').count();
        assert!((g as f64 / gc as f64 - 0.5).abs() < 0.05);
    }
    #[test]
    fn length_range() {
        let mut em = emitter(4);
        em.config_mut().set_length_range(5, 8).unwrap();
        let lens: std::collections::HashSet<_> = (0..500).map(|_| em.emit().len()).collect();
        let mut lens: Vec<_> = lens.into_iter().collect();
        lens.sort();
        assert_eq!(lens, vec![5, 6, 7, 8]);
    }
    #[test]
    fn invalid_config() {
        let mut config = SequenceConfig::default();
        assert!(config.set_length_range(10, 5).is_err());
        assert!(config.set_gc_content(1.2).is_err());
        assert!(config.set_gc_content(-0.1).is_err());
        assert_eq!(config, SequenceConfig::default());
        assert!(config.validate().is_ok());
        assert!(SequenceConfig::new(3, 2, 0.5).is_err());
    }
}
