//! Definitions -- A tiny interface for read simulation.
//! The simulator and the command line tools pass transcripts, emitted reads, variants and diploid genomes around as the plain structures defined here. All of them can be serialized into JSON.

use serde::{Deserialize, Serialize};

/// One transcript of a transcriptome.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Transcript {
    /// Stable key. Unique within a transcriptome.
    pub unique_name: String,
    /// Display name. It can be shared by several transcripts.
    pub name: String,
    /// Sequence. It is a string on an alphabet of A,C,G,T, possibly with ambiguity codes.
    pub seq: String,
    /// Relative abundance. Non-negative.
    pub expression: Option<f64>,
}

impl Transcript {
    pub fn new(unique_name: &str, name: &str, seq: &str) -> Self {
        Self {
            unique_name: unique_name.to_string(),
            name: name.to_string(),
            seq: seq.to_string(),
            expression: None,
        }
    }
    pub fn with_expression(mut self, expression: f64) -> Self {
        self.expression = Some(expression);
        self
    }
    pub fn seq(&self) -> &[u8] {
        self.seq.as_bytes()
    }
}

/// A simulated read.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct EmittedRead {
    pub unique_name: String,
    pub name: String,
    pub seq: String,
    /// The haplotype the sequence was taken from, if the source is diploid.
    #[serde(default)]
    pub origin: Option<Haplotype>,
}

impl EmittedRead {
    pub fn new(unique_name: String, name: String, seq: String) -> Self {
        Self {
            unique_name,
            name,
            seq,
            origin: None,
        }
    }
    pub fn seq(&self) -> &[u8] {
        self.seq.as_bytes()
    }
    /// The header line without the leading `>` or `@`.
    pub fn header(&self) -> String {
        match self.origin {
            Some(hap) => format!("{} {} haplotype={}", self.unique_name, self.name, hap),
            None => format!("{} {}", self.unique_name, self.name),
        }
    }
}

impl std::fmt::Display for EmittedRead {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, ">{}\n{}", self.header(), self.seq)
    }
}

/// How a read is cut out of the chosen transcript.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ReadMode {
    /// The transcript as is.
    Full,
    /// The whole transcript in a random strand.
    Long,
    /// A fixed length fragment in a random strand.
    Short(usize),
}

/// Output formats of emitted reads.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ReadFormat {
    Fasta,
    Fastq,
    Json,
}

impl std::str::FromStr for ReadFormat {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "fasta" | "fa" => Ok(ReadFormat::Fasta),
            "fastq" | "fq" => Ok(ReadFormat::Fastq),
            "json" => Ok(ReadFormat::Json),
            _ => Err(format!("{} is not a read format", s)),
        }
    }
}

/// One of the two haplotypes of a diploid.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Haplotype {
    First,
    Second,
}

impl Haplotype {
    pub fn other(&self) -> Self {
        match self {
            Haplotype::First => Haplotype::Second,
            Haplotype::Second => Haplotype::First,
        }
    }
}

impl Default for Haplotype {
    fn default() -> Self {
        Haplotype::First
    }
}

impl std::fmt::Display for Haplotype {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Haplotype::First => write!(f, "1"),
            Haplotype::Second => write!(f, "2"),
        }
    }
}

/// A heterozygous variant site.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Variant {
    pub chrom: String,
    /// 1-index.
    pub pos: u64,
    pub reference: String,
    pub alternate: String,
}

impl Variant {
    pub fn new(chrom: &str, pos: u64, reference: &str, alternate: &str) -> Self {
        Self {
            chrom: chrom.to_string(),
            pos,
            reference: reference.to_string(),
            alternate: alternate.to_string(),
        }
    }
    pub fn is_snv(&self) -> bool {
        self.reference.len() == 1 && self.alternate.len() == 1
    }
}

/// The alleles a variant site received on each haplotype.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PhasedSite {
    pub chrom: String,
    /// 1-index.
    pub pos: u64,
    pub allele1: String,
    pub allele2: String,
}

impl std::fmt::Display for PhasedSite {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let (chrom, pos) = (&self.chrom, self.pos);
        write!(f, "{chrom}\t{pos}\t{}\t{}", self.allele1, self.allele2)
    }
}

pub const PHASE_HEADER: &str = "#Chromosome  Genome1Allele  Genome2Allele";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct PhaseRecord {
    pub sites: Vec<PhasedSite>,
}

impl std::fmt::Display for PhaseRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        writeln!(f, "{}", PHASE_HEADER)?;
        for site in self.sites.iter() {
            writeln!(f, "{}", site)?;
        }
        Ok(())
    }
}

/// A genome of one haplotype, in the order the chromosomes were processed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct HaplotypeGenome {
    pub chromosomes: Vec<(String, String)>,
}

impl HaplotypeGenome {
    pub fn get(&self, chrom: &str) -> Option<&str> {
        self.chromosomes
            .iter()
            .find(|(name, _)| name == chrom)
            .map(|(_, seq)| seq.as_str())
    }
}

impl std::fmt::Display for HaplotypeGenome {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        for (chrom, seq) in self.chromosomes.iter() {
            writeln!(f, ">{chrom}\n{seq}")?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct DiploidGenome {
    pub haplotype1: HaplotypeGenome,
    pub haplotype2: HaplotypeGenome,
    pub phase: PhaseRecord,
    /// Chromosomes having variants but absent from the reference.
    pub skipped: Vec<String>,
}
