//! Simulator -- stochastic emitters of synthetic sequencing data.
//!
//! Reads are drawn from transcriptomes (optionally two haplotypes with allele-specific
//! expression), diploid genomes are drawn from a reference and heterozygous variants, and
//! random background sequences are drawn at a given GC content.
//! Every emitter owns its random number generator, so a seeded generator reproduces its output.
pub mod biallelic_genome;
pub mod biallelic_transcriptome;
pub mod error;
pub mod loader;
pub mod seq;
pub mod sequence_emitter;
pub mod transcriptome;
pub mod transcriptome_emitter;
pub mod variants;
#[macro_use]
extern crate log;

pub use biallelic_genome::RandomBiallelicGenomeEmitter;
pub use biallelic_transcriptome::RandomBiallelicTranscriptomeEmitter;
pub use error::{Result, SimulationError};
pub use sequence_emitter::{RandomSequenceEmitter, SequenceConfig};
pub use transcriptome::Transcriptome;
pub use transcriptome_emitter::RandomTranscriptomeEmitter;
