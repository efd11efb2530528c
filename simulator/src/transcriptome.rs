//! Expression weighted transcriptome.
use crate::error::{Result, SimulationError};
use definitions::Transcript;
use rand::distributions::{Distribution, WeightedIndex};
use rand::Rng;
use std::collections::HashMap;

#[derive(Debug, Clone)]
pub struct Transcriptome {
    /// Transcripts in the loaded order.
    transcripts: Vec<Transcript>,
    /// unique name -> index of `transcripts`.
    index: HashMap<String, usize>,
    /// Present if and only if every transcript has an expression weight.
    expression: Option<WeightedIndex<f64>>,
}

impl Transcriptome {
    /// Either all the transcripts have expression weights or none of them have.
    /// The weights should be non-negative and finite, and at least one of them should be positive.
    pub fn new(transcripts: Vec<Transcript>) -> Result<Self> {
        let mut index = HashMap::with_capacity(transcripts.len());
        for (idx, t) in transcripts.iter().enumerate() {
            if index.insert(t.unique_name.clone(), idx).is_some() {
                return Err(SimulationError::DuplicateTranscript(t.unique_name.clone()));
            }
        }
        let with_expression = transcripts.iter().filter(|t| t.expression.is_some());
        let expression = match with_expression.count() {
            0 => None,
            x if x == transcripts.len() => Some(Self::weights(&transcripts)?),
            x => {
                let reason = format!("{} out of {} have weights", x, transcripts.len());
                return Err(SimulationError::InvalidExpression(reason));
            }
        };
        debug!(
            "TRANSCRIPTOME\t{}\t{}",
            transcripts.len(),
            expression.is_some()
        );
        Ok(Self {
            transcripts,
            index,
            expression,
        })
    }
    fn weights(transcripts: &[Transcript]) -> Result<WeightedIndex<f64>> {
        let mut weights = Vec::with_capacity(transcripts.len());
        for t in transcripts {
            match t.expression {
                Some(w) if w.is_finite() && 0f64 <= w => weights.push(w),
                w => {
                    let reason = format!("{} has weight {:?}", t.unique_name, w);
                    return Err(SimulationError::InvalidExpression(reason));
                }
            }
        }
        WeightedIndex::new(&weights)
            .map_err(|why| SimulationError::InvalidExpression(why.to_string()))
    }
    pub fn len(&self) -> usize {
        self.transcripts.len()
    }
    pub fn is_empty(&self) -> bool {
        self.transcripts.is_empty()
    }
    pub fn has_expression(&self) -> bool {
        self.expression.is_some()
    }
    pub fn get(&self, unique_name: &str) -> Option<&Transcript> {
        self.index.get(unique_name).map(|&i| &self.transcripts[i])
    }
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.transcripts.iter().map(|t| t.unique_name.as_str())
    }
    pub fn transcripts(&self) -> &[Transcript] {
        &self.transcripts
    }
    /// Draw a transcript uniformly at random.
    pub fn draw_uniform<R: Rng>(&self, rng: &mut R) -> Result<&str> {
        if self.transcripts.is_empty() {
            return Err(SimulationError::EmptyTranscriptome);
        }
        let idx = rng.gen_range(0..self.transcripts.len());
        Ok(&self.transcripts[idx].unique_name)
    }
    /// Draw a transcript with probability proportional to its expression weight.
    pub fn draw_by_expression<R: Rng>(&self, rng: &mut R) -> Result<&str> {
        match self.expression.as_ref() {
            Some(weights) => Ok(&self.transcripts[weights.sample(rng)].unique_name),
            None => Err(SimulationError::NoExpressionData),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_xoshiro::Xoshiro256PlusPlus;
    fn three(weights: Option<[f64; 3]>) -> Vec<Transcript> {
        ["A", "B", "C"]
            .iter()
            .enumerate()
            .map(|(i, name)| {
                let t = Transcript::new(name, &format!("gene{}", i), "ACGTACGT");
                match weights {
                    Some(ws) => t.with_expression(ws[i]),
                    None => t,
                }
            })
            .collect()
    }
    #[test]
    fn zero_weights_never_drawn() {
        let transcriptome = Transcriptome::new(three(Some([0f64, 0f64, 5f64]))).unwrap();
        assert!(transcriptome.has_expression());
        let mut rng: Xoshiro256PlusPlus = SeedableRng::seed_from_u64(392);
        for _ in 0..5_000 {
            assert_eq!(transcriptome.draw_by_expression(&mut rng).unwrap(), "C");
        }
    }
    #[test]
    fn proportional_to_weights() {
        let transcriptome = Transcriptome::new(three(Some([1f64, 3f64, 0f64]))).unwrap();
        let mut rng: Xoshiro256PlusPlus = SeedableRng::seed_from_u64(42);
        let trials = 20_000;
        let count_b = (0..trials)
            .filter(|_| transcriptome.draw_by_expression(&mut rng).unwrap() == "B")
            .count();
        let frac = count_b as f64 / trials as f64;
        assert!((frac - 0.75).abs() < 0.02, "{}", frac);
    }
    #[test]
    fn uniform_draw() {
        let transcriptome = Transcriptome::new(three(Some([0f64, 0f64, 5f64]))).unwrap();
        let mut rng: Xoshiro256PlusPlus = SeedableRng::seed_from_u64(9);
        let mut counts: HashMap<&str, usize> = HashMap::new();
        for _ in 0..9_000 {
            *counts
                .entry(transcriptome.draw_uniform(&mut rng).unwrap())
                .or_default() += 1;
        }
        assert_eq!(counts.len(), 3);
        assert!(counts.values().all(|&c| 2_700 < c && c < 3_300), "{:?}", counts);
    }
    #[test]
    fn errors() {
        let mut rng: Xoshiro256PlusPlus = SeedableRng::seed_from_u64(1);
        let empty = Transcriptome::new(vec![]).unwrap();
        assert!(matches!(
            empty.draw_uniform(&mut rng),
            Err(SimulationError::EmptyTranscriptome)
        ));
        let plain = Transcriptome::new(three(None)).unwrap();
        assert!(!plain.has_expression());
        assert!(matches!(
            plain.draw_by_expression(&mut rng),
            Err(SimulationError::NoExpressionData)
        ));
        let all_zero = Transcriptome::new(three(Some([0f64; 3])));
        assert!(matches!(all_zero, Err(SimulationError::InvalidExpression(_))));
        let negative = Transcriptome::new(three(Some([1f64, -1f64, 0f64])));
        assert!(matches!(negative, Err(SimulationError::InvalidExpression(_))));
        let mut partial = three(None);
        partial[0].expression = Some(1f64);
        assert!(matches!(
            Transcriptome::new(partial),
            Err(SimulationError::InvalidExpression(_))
        ));
        let mut dup = three(None);
        dup[2].unique_name = "A".to_string();
        assert!(matches!(
            Transcriptome::new(dup),
            Err(SimulationError::DuplicateTranscript(_))
        ));
    }
    #[test]
    fn lookup() {
        let transcriptome = Transcriptome::new(three(None)).unwrap();
        assert_eq!(transcriptome.len(), 3);
        assert_eq!(transcriptome.get("B").unwrap().name, "gene1");
        assert!(transcriptome.get("D").is_none());
        let names: Vec<_> = transcriptome.names().collect();
        assert_eq!(names, vec!["A", "B", "C"]);
    }
}
