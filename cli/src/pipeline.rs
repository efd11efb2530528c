//! Pipelines -- run a whole simulation from one TOML profile.
//!
//! A profile may contain any of the `[genome]`, `[transcriptome]`, and `[random]` sections.
//! Each section writes its outputs under `out_dir` with the file stem `prefix`.
use crate::emission::*;
use definitions::{Haplotype, ReadFormat, ReadMode};
use log::*;
use serde::{Deserialize, Serialize};
use simulator::{RandomBiallelicGenomeEmitter, RandomBiallelicTranscriptomeEmitter};
use simulator::{RandomTranscriptomeEmitter, SequenceConfig};
use std::path::{Path, PathBuf};

/// The configuration of the pipeline.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct PipelineConfig {
    /// The path to the output directory.
    out_dir: PathBuf,
    prefix: String,
    #[serde(default)]
    verbose: usize,
    #[serde(default = "default_threads")]
    threads: usize,
    #[serde(default = "default_seed")]
    seed: u64,
    /// Skip sections whose outputs already exist.
    #[serde(default)]
    resume: bool,
    genome: Option<GenomeProfile>,
    transcriptome: Option<TranscriptomeProfile>,
    random: Option<RandomProfile>,
}

fn default_threads() -> usize {
    1
}

fn default_seed() -> u64 {
    42
}

fn default_format() -> ReadFormat {
    ReadFormat::Fasta
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct GenomeProfile {
    reference: PathBuf,
    variants: PathBuf,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct TranscriptomeProfile {
    hap1: PathBuf,
    /// If given, reads are drawn from the diploid transcriptome.
    hap2: Option<PathBuf>,
    expression: Option<PathBuf>,
    rho: Option<PathBuf>,
    #[serde(default)]
    reference_haplotype: Haplotype,
    #[serde(default)]
    uniform: bool,
    /// Number of reads. SI suffixes are allowed, e.g., "10k".
    num: String,
    mode: ReadMode,
    #[serde(default = "default_format")]
    format: ReadFormat,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct RandomProfile {
    num: String,
    #[serde(default)]
    config: SequenceConfig,
    #[serde(default = "default_format")]
    format: ReadFormat,
}

fn invalid(why: String) -> std::io::Error {
    std::io::Error::new(std::io::ErrorKind::InvalidInput, why)
}

pub fn run_pipeline(config: &PipelineConfig) -> std::io::Result<()> {
    let level = match config.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
    if let Err(why) = rayon::ThreadPoolBuilder::new()
        .num_threads(config.threads)
        .build_global()
    {
        debug!("{:?}", why);
    }
    std::fs::create_dir_all(&config.out_dir)?;
    let file_stem = config.out_dir.join(&config.prefix);
    let stem = file_stem.to_string_lossy().to_string();
    if let Some(profile) = config.genome.as_ref() {
        let phase = PathBuf::from(format!("{stem}.phase.tsv"));
        if config.resume && matches!(phase.try_exists(), Ok(true)) {
            info!("RESUME\t{:?}\tSkipped", phase);
        } else {
            run_genome(profile, &stem, config.seed)?;
        }
    }
    if let Some(profile) = config.transcriptome.as_ref() {
        let path = PathBuf::from(format!("{stem}.reads.{}", extension(profile.format)));
        if config.resume && matches!(path.try_exists(), Ok(true)) {
            info!("RESUME\t{:?}\tSkipped", path);
        } else {
            run_transcriptome(profile, &path, config.seed)?;
        }
    }
    if let Some(profile) = config.random.as_ref() {
        let path = PathBuf::from(format!("{stem}.random.{}", extension(profile.format)));
        if config.resume && matches!(path.try_exists(), Ok(true)) {
            info!("RESUME\t{:?}\tSkipped", path);
        } else {
            let num = parse_si(&profile.num).map_err(invalid)?;
            let reads = emit_random(&profile.config, num, config.seed)?;
            write_reads_to(Some(&path), &reads, profile.format)?;
        }
    }
    Ok(())
}

fn run_genome(profile: &GenomeProfile, stem: &str, seed: u64) -> std::io::Result<()> {
    debug!("START\tGenome");
    let rng = batch_rng(seed, 0);
    let mut emitter = RandomBiallelicGenomeEmitter::from_files(&profile.reference, &profile.variants, rng)?;
    let diploid = emitter.emit_genomes()?;
    write_diploid(stem, &diploid)
}

fn run_transcriptome(profile: &TranscriptomeProfile, path: &Path, seed: u64) -> std::io::Result<()> {
    debug!("START\tTranscriptome");
    let num = parse_si(&profile.num).map_err(invalid)?;
    let expression = profile.expression.as_deref();
    let rng = batch_rng(seed, 0);
    let reads = match profile.hap2.as_ref() {
        Some(hap2) => {
            let (hap1, hap2) = match profile.reference_haplotype {
                Haplotype::First => (
                    load_transcriptome(&profile.hap1, expression)?,
                    load_transcriptome(hap2, None)?,
                ),
                Haplotype::Second => (
                    load_transcriptome(&profile.hap1, None)?,
                    load_transcriptome(hap2, expression)?,
                ),
            };
            let reference = profile.reference_haplotype;
            let mut emitter = RandomBiallelicTranscriptomeEmitter::with_expression_reference(
                hap1, hap2, reference, rng,
            );
            emitter.set_force_uniform_random(profile.uniform);
            if let Some(rho) = profile.rho.as_ref() {
                let table = simulator::loader::load_table_from_file(rho)?;
                simulator::loader::apply_rho(&mut emitter, &table)?;
            }
            let reseed = |em: &RandomBiallelicTranscriptomeEmitter<SimRng>, rng: SimRng| em.with_rng(rng);
            emit_reads(&emitter, reseed, num, profile.mode, seed)?
        }
        None => {
            let transcriptome = load_transcriptome(&profile.hap1, expression)?;
            let mut emitter = RandomTranscriptomeEmitter::new(transcriptome, rng);
            emitter.set_force_uniform_random(profile.uniform);
            let reseed = |em: &RandomTranscriptomeEmitter<SimRng>, rng: SimRng| em.with_rng(rng);
            emit_reads(&emitter, reseed, num, profile.mode, seed)?
        }
    };
    write_reads_to(Some(path), &reads, profile.format)
}
