use crate::error::{Result, SimulationError};
use crate::seq::{random_flip, random_fragment};
use crate::transcriptome::Transcriptome;
use definitions::{EmittedRead, ReadMode, Transcript};
use rand::Rng;
use std::sync::Arc;

pub trait ReadEmitter {
    /// Emit one read in the given mode. `Ok(None)` means the chosen transcript could not yield a read.
    fn emit_read(&mut self, mode: ReadMode) -> Result<Option<EmittedRead>>;
}

/// Emit transcripts, full length reads and fragments from a transcriptome.
#[derive(Debug, Clone)]
pub struct RandomTranscriptomeEmitter<R: Rng> {
    /// Shared by the copies made by `with_rng`.
    transcriptome: Arc<Transcriptome>,
    /// If true, transcripts are drawn uniformly even if expression data is available.
    force_uniform_random: bool,
    rng: R,
}

impl<R: Rng> RandomTranscriptomeEmitter<R> {
    pub fn new(transcriptome: Transcriptome, rng: R) -> Self {
        Self {
            transcriptome: Arc::new(transcriptome),
            force_uniform_random: false,
            rng,
        }
    }
    /// The same emitter driven by another random number generator. The transcriptome is shared, not copied.
    pub fn with_rng<S: Rng>(&self, rng: S) -> RandomTranscriptomeEmitter<S> {
        RandomTranscriptomeEmitter {
            transcriptome: Arc::clone(&self.transcriptome),
            force_uniform_random: self.force_uniform_random,
            rng,
        }
    }
    pub fn transcriptome(&self) -> &Transcriptome {
        &self.transcriptome
    }
    pub fn force_uniform_random(&self) -> bool {
        self.force_uniform_random
    }
    pub fn set_force_uniform_random(&mut self, force: bool) {
        self.force_uniform_random = force;
    }
    pub(crate) fn rng_mut(&mut self) -> &mut R {
        &mut self.rng
    }
    fn choose(&mut self) -> Result<&Transcript> {
        let tr = self.transcriptome.as_ref();
        let name = if tr.has_expression() && !self.force_uniform_random {
            tr.draw_by_expression(&mut self.rng)?
        } else {
            tr.draw_uniform(&mut self.rng)?
        };
        tr.get(name)
            .ok_or_else(|| SimulationError::UnknownTranscript(name.to_string()))
    }
    /// Choose a transcript and return it as is.
    pub fn emit(&mut self) -> Result<EmittedRead> {
        let t = self.choose()?;
        let (unique_name, name) = (t.unique_name.clone(), t.name.clone());
        Ok(EmittedRead::new(unique_name, name, t.seq.clone()))
    }
    /// Choose a transcript and return it in a random strand.
    pub fn emit_long_read(&mut self) -> Result<EmittedRead> {
        let mut read = self.emit()?;
        read.seq = random_flip(read.seq, &mut self.rng);
        Ok(read)
    }
    /// Choose a transcript and return a `read_length`-long fragment of it in a random strand.
    /// If the transcript is shorter than `read_length`, return None. Callers may retry.
    pub fn emit_short_read(&mut self, read_length: usize) -> Result<Option<EmittedRead>> {
        let read = self.emit()?;
        let fragment = match random_fragment(read.seq(), read_length, &mut self.rng) {
            Some(frag) => String::from_utf8_lossy(frag).to_string(),
            None => return Ok(None),
        };
        let seq = random_flip(fragment, &mut self.rng);
        Ok(Some(EmittedRead { seq, ..read }))
    }
}

impl<R: Rng> ReadEmitter for RandomTranscriptomeEmitter<R> {
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
    use rand::SeedableRng;
    use rand_xoshiro::Xoshiro256PlusPlus;
    fn emitter(weights: Option<[f64; 3]>, seed: u64) -> RandomTranscriptomeEmitter<Xoshiro256PlusPlus> {
        let seqs = ["AAAAAAAAAA", "CCCCGGGG", "ACGTTGCAAGT"];
        let transcripts: Vec<_> = ["A", "B", "C"]
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
        let transcriptome = Transcriptome::new(transcripts).unwrap();
        RandomTranscriptomeEmitter::new(transcriptome, SeedableRng::seed_from_u64(seed))
    }
    #[test]
    fn emit_by_expression() {
        let mut em = emitter(Some([0f64, 0f64, 5f64]), 4);
        for _ in 0..2_000 {
            let read = em.emit().unwrap();
            assert_eq!(read.unique_name, "C");
            assert_eq!(read.seq, "ACGTTGCAAGT");
        }
        em.set_force_uniform_random(true);
        let drawn: std::collections::HashSet<_> =
            (0..300).map(|_| em.emit().unwrap().unique_name).collect();
        assert_eq!(drawn.len(), 3);
    }
    #[test]
    fn long_read_strand() {
        let mut em = emitter(Some([0f64, 0f64, 1f64]), 32);
        let forward = "ACGTTGCAAGT".to_string();
        let reverse = revcmp_str(&forward);
        let reads: Vec<_> = (0..500).map(|_| em.emit_long_read().unwrap()).collect();
        assert!(reads.iter().all(|r| r.seq == forward || r.seq == reverse));
        let fwd = reads.iter().filter(|r| r.seq == forward).count();
        assert!(150 < fwd && fwd < 350, "{}", fwd);
    }
    #[test]
    fn short_read() {
        let mut em = emitter(None, 11);
        let (mut found, mut none) = (0, 0);
        for _ in 0..1_000 {
            match em.emit_short_read(9).unwrap() {
                Some(read) => {
                    found += 1;
                    assert_eq!(read.seq.len(), 9);
                    let t = em.transcriptome().get(&read.unique_name).unwrap();
                    let rev = revcmp_str(&t.seq);
                    assert!(t.seq.contains(&read.seq) || rev.contains(&read.seq));
                }
                None => none += 1,
            }
        }
        // Only "B" (8bp) is shorter than 9bp.
        assert!(200 < none && none < 470, "{}", none);
        assert_eq!(found + none, 1_000);
        assert!(em.emit_short_read(100).unwrap().is_none());
    }
    #[test]
    fn seeded_is_reproducible() {
        let mut em1 = emitter(Some([1f64, 2f64, 3f64]), 99);
        let mut em2 = em1.with_rng(Xoshiro256PlusPlus::seed_from_u64(99));
        for _ in 0..100 {
            assert_eq!(em1.emit_short_read(5).unwrap(), em2.emit_short_read(5).unwrap());
        }
        assert!(Arc::ptr_eq(&em1.transcriptome, &em2.transcriptome));
    }
    #[test]
    fn empty() {
        let transcriptome = Transcriptome::new(vec![]).unwrap();
        let rng: Xoshiro256PlusPlus = SeedableRng::seed_from_u64(1);
        let mut em = RandomTranscriptomeEmitter::new(transcriptome, rng);
        assert!(matches!(em.emit(), Err(SimulationError::EmptyTranscriptome)));
        assert!(em.emit_short_read(10).is_err());
    }
}
