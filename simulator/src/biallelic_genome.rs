//! Diploid genome from a reference and heterozygous variants.
//!
//! Each variant site is phased independently: with probability 1/2 the reference allele goes to
//! haplotype 1 and the alternate allele to haplotype 2, otherwise the other way around.
//! Chromosomes are processed in sorted order and sites in ascending position, so a seeded
//! generator reproduces the output.
use crate::error::{Result, SimulationError};
use crate::loader::{load_genome, Genome};
use crate::variants::{parse_variants, VariantSet};
use definitions::{DiploidGenome, PhasedSite, Variant};
use rand::Rng;
use std::path::Path;

#[derive(Debug, Clone)]
pub struct RandomBiallelicGenomeEmitter<R: Rng> {
    reference: Genome,
    variants: VariantSet,
    rng: R,
}

impl<R: Rng> RandomBiallelicGenomeEmitter<R> {
    pub fn new(mut reference: Genome, variants: VariantSet, rng: R) -> Self {
        reference
            .values_mut()
            .for_each(|seq| seq.make_ascii_uppercase());
        Self {
            reference,
            variants,
            rng,
        }
    }
    pub fn from_reader<G: std::io::Read, V: std::io::BufRead>(
        genome: G,
        variants: V,
        rng: R,
    ) -> Result<Self> {
        let variants = parse_variants(variants)?;
        let reference = load_genome(genome)?;
        Ok(Self::new(reference, variants, rng))
    }
    pub fn from_files<P: AsRef<Path>, Q: AsRef<Path>>(genome: P, variants: Q, rng: R) -> Result<Self> {
        let variants = std::fs::File::open(variants).map(std::io::BufReader::new)?;
        let genome = std::fs::File::open(genome).map(std::io::BufReader::new)?;
        Self::from_reader(genome, variants, rng)
    }
    pub fn reference(&self) -> &Genome {
        &self.reference
    }
    pub fn variants(&self) -> &VariantSet {
        &self.variants
    }
    /// Chromosomes having variants but no reference sequence. They are skipped by `emit_genomes`.
    pub fn missing_chromosomes(&self) -> Vec<String> {
        self.variants
            .keys()
            .filter(|chrom| !self.reference.contains_key(*chrom))
            .cloned()
            .collect()
    }
    pub fn emit_genomes(&mut self) -> Result<DiploidGenome> {
        let mut diploid = DiploidGenome::default();
        let mut multi_base = 0;
        for (chrom, sites) in self.variants.iter() {
            let seq = match self.reference.get(chrom) {
                Some(seq) => seq,
                None => {
                    warn!("SKIP\t{}\t{}\tNotInReference", chrom, sites.len());
                    diploid.skipped.push(chrom.clone());
                    continue;
                }
            };
            multi_base += sites.values().filter(|v| !v.is_snv()).count();
            let (hap1, hap2, phased) = phase_chromosome(seq, sites.values(), &mut self.rng)?;
            debug!("PHASED\t{}\t{}\t{}", chrom, seq.len(), phased.len());
            diploid.haplotype1.chromosomes.push((chrom.clone(), hap1));
            diploid.haplotype2.chromosomes.push((chrom.clone(), hap2));
            diploid.phase.sites.extend(phased);
        }
        if 0 < multi_base {
            warn!("MULTIBASE\t{}\tSubstitutedWithoutShift", multi_base);
        }
        Ok(diploid)
    }
}

// The base at each site is replaced by the allele. Multi-base alleles do not shift later positions.
fn phase_chromosome<'a, I, R>(seq: &[u8], sites: I, rng: &mut R) -> Result<(String, String, Vec<PhasedSite>)>
where
    I: Iterator<Item = &'a Variant>,
    R: Rng,
{
    let mut hap1 = Vec::with_capacity(seq.len());
    let mut hap2 = Vec::with_capacity(seq.len());
    let mut phased = vec![];
    let mut last = 0;
    for variant in sites {
        let idx = variant.pos.wrapping_sub(1) as usize;
        if variant.pos == 0 || seq.len() <= idx || idx < last {
            return Err(SimulationError::VariantOutOfRange {
                chrom: variant.chrom.clone(),
                pos: variant.pos,
                len: seq.len(),
            });
        }
        let (allele1, allele2) = if rng.gen_bool(0.5) {
            (&variant.reference, &variant.alternate)
        } else {
            (&variant.alternate, &variant.reference)
        };
        hap1.extend_from_slice(&seq[last..idx]);
        hap1.extend_from_slice(allele1.as_bytes());
        hap2.extend_from_slice(&seq[last..idx]);
        hap2.extend_from_slice(allele2.as_bytes());
        last = idx + 1;
        phased.push(PhasedSite {
            chrom: variant.chrom.clone(),
            pos: variant.pos,
            allele1: allele1.clone(),
            allele2: allele2.clone(),
        });
    }
    hap1.extend_from_slice(&seq[last..]);
    hap2.extend_from_slice(&seq[last..]);
    let hap1 = String::from_utf8_lossy(&hap1).to_string();
    let hap2 = String::from_utf8_lossy(&hap2).to_string();
    Ok((hap1, hap2, phased))
}
