//! Emit reads from a diploid transcriptome with allele specific expression.
//!
//! Which transcript is sequenced is decided by the expression model of one haplotype, the
//! "expression reference" (haplotype 1 by default). Which haplotype the sequence is taken from
//! is decided afterwards by rho, the per-transcript probability of haplotype 1.
use crate::error::{Result, SimulationError};
use crate::seq::{random_flip, random_fragment};
use crate::transcriptome::Transcriptome;
use crate::transcriptome_emitter::{RandomTranscriptomeEmitter, ReadEmitter};
use definitions::{EmittedRead, Haplotype, ReadMode};
use rand::Rng;
use std::collections::HashMap;
use std::sync::Arc;

pub const DEFAULT_RHO: f64 = 0.5;

#[derive(Debug, Clone)]
pub struct RandomBiallelicTranscriptomeEmitter<R: Rng> {
    /// Bound to the expression reference haplotype.
    emitter: RandomTranscriptomeEmitter<R>,
    /// The other haplotype. It should share the unique names with the reference.
    other: Arc<Transcriptome>,
    expression_reference: Haplotype,
    /// unique name -> probability of haplotype 1.
    rho: Arc<HashMap<String, f64>>,
}

impl<R: Rng> RandomBiallelicTranscriptomeEmitter<R> {
    pub fn new(hap1: Transcriptome, hap2: Transcriptome, rng: R) -> Self {
        Self::with_expression_reference(hap1, hap2, Haplotype::First, rng)
    }
    pub fn with_expression_reference(
        hap1: Transcriptome,
        hap2: Transcriptome,
        expression_reference: Haplotype,
        rng: R,
    ) -> Self {
        let (reference, other) = match expression_reference {
            Haplotype::First => (hap1, hap2),
            Haplotype::Second => (hap2, hap1),
        };
        let rho: HashMap<_, _> = reference
            .names()
            .map(|name| (name.to_string(), DEFAULT_RHO))
            .collect();
        debug!(
            "BIALLELIC\t{}\t{}\t{}",
            reference.len(),
            other.len(),
            expression_reference
        );
        Self {
            emitter: RandomTranscriptomeEmitter::new(reference, rng),
            other: Arc::new(other),
            expression_reference,
            rho: Arc::new(rho),
        }
    }
    /// The same emitter driven by another random number generator. Both haplotypes and rho are shared.
    pub fn with_rng<S: Rng>(&self, rng: S) -> RandomBiallelicTranscriptomeEmitter<S> {
        RandomBiallelicTranscriptomeEmitter {
            emitter: self.emitter.with_rng(rng),
            other: Arc::clone(&self.other),
            expression_reference: self.expression_reference,
            rho: Arc::clone(&self.rho),
        }
    }
    pub fn expression_reference(&self) -> Haplotype {
        self.expression_reference
    }
    pub fn transcriptome(&self, hap: Haplotype) -> &Transcriptome {
        if hap == self.expression_reference {
            self.emitter.transcriptome()
        } else {
            self.other.as_ref()
        }
    }
    pub fn set_force_uniform_random(&mut self, force: bool) {
        self.emitter.set_force_uniform_random(force);
    }
    pub fn rho(&self, unique_name: &str) -> Option<f64> {
        self.rho.get(unique_name).copied()
    }
    pub fn set_rho(&mut self, unique_name: &str, rho: f64) -> Result<()> {
        if !(0f64..=1f64).contains(&rho) {
            let name = unique_name.to_string();
            return Err(SimulationError::InvalidRho { name, rho });
        }
        if !self.rho.contains_key(unique_name) {
            return Err(SimulationError::UnknownTranscript(unique_name.to_string()));
        }
        match Arc::make_mut(&mut self.rho).get_mut(unique_name) {
            Some(slot) => {
                *slot = rho;
                Ok(())
            }
            None => Err(SimulationError::UnknownTranscript(unique_name.to_string())),
        }
    }
    fn draw_origin(&mut self, unique_name: &str) -> Result<Haplotype> {
        let rho = self
            .rho(unique_name)
            .ok_or_else(|| SimulationError::UnknownTranscript(unique_name.to_string()))?;
        if self.emitter.rng_mut().gen::<f64>() < rho {
            Ok(Haplotype::First)
        } else {
            Ok(Haplotype::Second)
        }
    }
    fn missing(&self, unique_name: &str) -> SimulationError {
        SimulationError::MissingTranscript {
            name: unique_name.to_string(),
            haplotype: self.expression_reference.other(),
        }
    }
    fn other_seq(&self, unique_name: &str) -> Result<&str> {
        match self.other.get(unique_name) {
            Some(t) => Ok(&t.seq),
            None => Err(self.missing(unique_name)),
        }
    }
    /// Choose a transcript and return the sequence of the drawn haplotype as is.
    pub fn emit(&mut self) -> Result<EmittedRead> {
        let mut read = self.emitter.emit()?;
        let origin = self.draw_origin(&read.unique_name)?;
        if origin != self.expression_reference {
            read.seq = self.other_seq(&read.unique_name)?.to_string();
        }
        read.origin = Some(origin);
        Ok(read)
    }
    /// Choose a transcript and return the full length sequence of the drawn haplotype in a random strand.
    pub fn emit_long_read(&mut self) -> Result<EmittedRead> {
        let mut read = self.emitter.emit_long_read()?;
        let origin = self.draw_origin(&read.unique_name)?;
        if origin != self.expression_reference {
            let seq = self.other_seq(&read.unique_name)?.to_string();
            read.seq = random_flip(seq, self.emitter.rng_mut());
        }
        read.origin = Some(origin);
        Ok(read)
    }
    /// Choose a transcript and return a fragment of the drawn haplotype in a random strand.
    /// Return None if either the reference transcript or the drawn one is shorter than `read_length`.
    pub fn emit_short_read(&mut self, read_length: usize) -> Result<Option<EmittedRead>> {
        let mut read = match self.emitter.emit_short_read(read_length)? {
            Some(read) => read,
            None => return Ok(None),
        };
        let origin = self.draw_origin(&read.unique_name)?;
        if origin != self.expression_reference {
            let seq = match self.other.get(&read.unique_name) {
                Some(t) => t.seq.as_bytes(),
                None => return Err(self.missing(&read.unique_name)),
            };
            let rng = self.emitter.rng_mut();
            let fragment = match random_fragment(seq, read_length, rng) {
                Some(frag) => String::from_utf8_lossy(frag).to_string(),
                None => return Ok(None),
            };
            read.seq = random_flip(fragment, rng);
        }
        read.origin = Some(origin);
        Ok(Some(read))
    }
}

impl<R: Rng> ReadEmitter for RandomBiallelicTranscriptomeEmitter<R> {
    fn emit_read(&mut self, mode: ReadMode) -> Result<Option<EmittedRead>> {
        match mode {
            ReadMode::Full => self.emit().map(Some),
            ReadMode::Long => self.emit_long_read().map(Some),
            ReadMode::Short(len) => self.emit_short_read(len),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seq::revcmp_str;
    use definitions::Transcript;
    use rand::SeedableRng;
    use rand_xoshiro::Xoshiro256PlusPlus;
    type Emitter = RandomBiallelicTranscriptomeEmitter<Xoshiro256PlusPlus>;
    const HAP1: [&str; 2] = ["AAAAAAAAAAAAAAAAAAAA", "CCCCCCCCCCCCCCCCCCCC"];
    const HAP2: [&str; 2] = ["GGGGGGGGGGGGGGGGGGGG", "TTTTTTTTTTTTTTTTTTTT"];
    fn transcriptome(seqs: &[&str], weights: Option<[f64; 2]>) -> Transcriptome {
        let transcripts = ["tx0", "tx1"]
            .iter()
            .zip(seqs.iter())
            .enumerate()
            .map(|(i, (name, seq))| {
                let t = Transcript::new(name, "gene", seq);
                match weights {
                    Some(ws) => t.with_expression(ws[i]),
                    None => t,
                }
            })
            .collect();
        Transcriptome::new(transcripts).unwrap()
    }
    fn emitter(seed: u64) -> Emitter {
        let hap1 = transcriptome(&HAP1, Some([1f64, 0f64]));
        let hap2 = transcriptome(&HAP2, None);
        RandomBiallelicTranscriptomeEmitter::new(hap1, hap2, SeedableRng::seed_from_u64(seed))
    }
    #[test]
    fn default_rho() {
        let em = emitter(1);
        assert_eq!(em.rho("tx0"), Some(0.5));
        assert_eq!(em.rho("tx1"), Some(0.5));
        assert_eq!(em.rho("tx2"), None);
    }
    #[test]
    fn set_rho() {
        let mut em = emitter(1);
        assert!(em.set_rho("tx0", 0.9).is_ok());
        assert_eq!(em.rho("tx0"), Some(0.9));
        assert!(matches!(
            em.set_rho("tx0", 1.5),
            Err(SimulationError::InvalidRho { .. })
        ));
        assert!(matches!(
            em.set_rho("tx9", 0.1),
            Err(SimulationError::UnknownTranscript(_))
        ));
        assert_eq!(em.rho("tx0"), Some(0.9));
    }
    #[test]
    fn emit_mixes_haplotypes() {
        let mut em = emitter(42);
        let trials = 4_000;
        let mut first = 0;
        for _ in 0..trials {
            let read = em.emit().unwrap();
            // The choice follows haplotype 1's expression.
            assert_eq!(read.unique_name, "tx0");
            match read.origin {
                Some(Haplotype::First) => {
                    first += 1;
                    assert_eq!(read.seq, HAP1[0]);
                }
                Some(Haplotype::Second) => assert_eq!(read.seq, HAP2[0]),
                None => panic!(),
            }
        }
        let frac = first as f64 / trials as f64;
        assert!((frac - 0.5).abs() < 0.05, "{}", frac);
    }
    #[test]
    fn rho_extremes() {
        let mut em = emitter(7);
        em.set_rho("tx0", 1f64).unwrap();
        assert!((0..500).all(|_| em.emit().unwrap().origin == Some(Haplotype::First)));
        em.set_rho("tx0", 0f64).unwrap();
        assert!((0..500).all(|_| em.emit().unwrap().seq == HAP2[0]));
    }
    #[test]
    fn long_reads_are_strand_randomized() {
        let mut em = emitter(3);
        em.set_rho("tx0", 0f64).unwrap();
        let forward = HAP2[0].to_string();
        let reverse = revcmp_str(&forward);
        let reads: Vec<_> = (0..1_000).map(|_| em.emit_long_read().unwrap()).collect();
        assert!(reads.iter().all(|r| r.seq == forward || r.seq == reverse));
        let fwd = reads.iter().filter(|r| r.seq == forward).count();
        assert!(400 < fwd && fwd < 600, "{}", fwd);
    }
    #[test]
    fn short_reads() {
        let mut em = emitter(5);
        for _ in 0..500 {
            let read = em.emit_short_read(7).unwrap().unwrap();
            assert_eq!(read.seq.len(), 7);
            let base = read.seq.as_bytes()[0];
            let expected: &[u8] = match read.origin {
                Some(Haplotype::First) => b"AT",
                _ => b"CG",
            };
            assert!(expected.contains(&base));
            assert!(read.seq.bytes().all(|b| b == base));
        }
        assert!(em.emit_short_read(21).unwrap().is_none());
    }
    #[test]
    fn short_read_longer_than_second_haplotype() {
        let hap1 = transcriptome(&HAP1, Some([1f64, 0f64]));
        let hap2 = transcriptome(&["GGGGG", "TTTTT"], None);
        let rng: Xoshiro256PlusPlus = SeedableRng::seed_from_u64(13);
        let mut em = Emitter::new(hap1, hap2, rng);
        em.set_rho("tx0", 0f64).unwrap();
        assert!((0..200).all(|_| em.emit_short_read(10).unwrap().is_none()));
        em.set_rho("tx0", 1f64).unwrap();
        for _ in 0..200 {
            let read = em.emit_short_read(10).unwrap().unwrap();
            assert_eq!(read.origin, Some(Haplotype::First));
            assert_eq!(read.seq.len(), 10);
        }
    }
    #[test]
    fn copies_share_haplotypes() {
        let em = emitter(1);
        let mut copy = em.with_rng(Xoshiro256PlusPlus::seed_from_u64(2));
        assert!(Arc::ptr_eq(&em.other, &copy.other));
        assert!(Arc::ptr_eq(&em.rho, &copy.rho));
        copy.set_rho("tx0", 0.2).unwrap();
        assert_eq!(copy.rho("tx0"), Some(0.2));
        assert_eq!(em.rho("tx0"), Some(0.5));
    }
    #[test]
    fn second_haplotype_as_expression_reference() {
        let hap1 = transcriptome(&HAP1, None);
        let hap2 = transcriptome(&HAP2, Some([0f64, 1f64]));
        let rng: Xoshiro256PlusPlus = SeedableRng::seed_from_u64(9);
        let mut em = Emitter::with_expression_reference(hap1, hap2, Haplotype::Second, rng);
        em.set_rho("tx1", 1f64).unwrap();
        for _ in 0..200 {
            let read = em.emit().unwrap();
            assert_eq!(read.unique_name, "tx1");
            assert_eq!(read.seq, HAP1[1]);
            assert_eq!(read.origin, Some(Haplotype::First));
        }
        assert_eq!(em.transcriptome(Haplotype::Second).len(), 2);
    }
    #[test]
    fn missing_counterpart() {
        let hap1 = transcriptome(&HAP1, None);
        let hap2 = Transcriptome::new(vec![Transcript::new("tx0", "gene", HAP2[0])]).unwrap();
        let rng: Xoshiro256PlusPlus = SeedableRng::seed_from_u64(2);
        let mut em = Emitter::new(hap1, hap2, rng);
        em.set_rho("tx1", 0f64).unwrap();
        em.set_rho("tx0", 0f64).unwrap();
        let errors = (0..100)
            .filter_map(|_| em.emit_long_read().err())
            .filter(|e| matches!(e, SimulationError::MissingTranscript { .. }))
            .count();
        assert!(0 < errors && errors < 100);
    }
    #[test]
    fn reproducible() {
        let mut em1 = emitter(11);
        let mut em2 = em1.with_rng(Xoshiro256PlusPlus::seed_from_u64(11));
        for _ in 0..100 {
            let mode = ReadMode::Short(6);
            assert_eq!(em1.emit_read(mode).unwrap(), em2.emit_read(mode).unwrap());
        }
    }
}
