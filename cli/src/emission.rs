//! Emission drivers shared by the subcommands and the pipeline.
//!
//! Reads are produced in fixed-size batches. Batch `i` is generated by a copy of the emitter
//! seeded with `seed + i`, so the output does not depend on the number of threads.
use definitions::{DiploidGenome, EmittedRead, ReadFormat, ReadMode};
use log::*;
use rand::SeedableRng;
use rand_xoshiro::Xoshiro256PlusPlus;
use rayon::prelude::*;
use simulator::loader;
use simulator::transcriptome_emitter::ReadEmitter;
use simulator::{SequenceConfig, Transcriptome};
use std::io::{BufWriter, Write};
use std::path::Path;

pub type SimRng = Xoshiro256PlusPlus;
pub const BATCH_SIZE: usize = 1_000;
/// How many times a "no fragment" draw is retried for one requested read.
pub const MAX_ATTEMPTS: usize = 100;

pub fn batch_rng(seed: u64, batch: usize) -> SimRng {
    SeedableRng::seed_from_u64(seed.wrapping_add(batch as u64))
}

pub fn load_transcriptome(path: &Path, expression: Option<&Path>) -> std::io::Result<Transcriptome> {
    debug!("Opening {:?}", path);
    let mut transcripts = loader::load_transcripts_from_file(path)?;
    if let Some(expression) = expression {
        debug!("Opening {:?}", expression);
        let weights = loader::load_table_from_file(expression)?;
        loader::attach_expression(&mut transcripts, &weights);
    }
    Ok(Transcriptome::new(transcripts)?)
}

fn emit_batch<E: ReadEmitter>(
    emitter: &mut E,
    size: usize,
    mode: ReadMode,
) -> simulator::Result<Vec<EmittedRead>> {
    let mut reads = Vec::with_capacity(size);
    let mut gave_up = 0;
    for _ in 0..size {
        let read = (0..MAX_ATTEMPTS).find_map(|_| emitter.emit_read(mode).transpose());
        match read {
            Some(read) => reads.push(read?),
            None => gave_up += 1,
        }
    }
    if 0 < gave_up {
        warn!("GIVEUP\t{}\t{:?}", gave_up, mode);
    }
    Ok(reads)
}

/// Emit `num` reads. `reseed` should return a copy of `prototype` driven by the given generator.
pub fn emit_reads<E, F>(
    prototype: &E,
    reseed: F,
    num: usize,
    mode: ReadMode,
    seed: u64,
) -> std::io::Result<Vec<EmittedRead>>
where
    E: ReadEmitter + Sync,
    F: Fn(&E, SimRng) -> E + Sync,
{
    let batches = num.div_ceil(BATCH_SIZE);
    debug!("EMIT\t{}\t{}\t{:?}", num, batches, mode);
    let reads: Vec<Vec<EmittedRead>> = (0..batches)
        .into_par_iter()
        .map(|batch| {
            let size = BATCH_SIZE.min(num - batch * BATCH_SIZE);
            let mut emitter = reseed(prototype, batch_rng(seed, batch));
            emit_batch(&mut emitter, size, mode)
        })
        .collect::<simulator::Result<_>>()?;
    let reads = reads.concat();
    info!("EMIT\t{}\tReads", reads.len());
    Ok(reads)
}

/// Emit `num` random sequences, named `random_{index}`.
pub fn emit_random(config: &SequenceConfig, num: usize, seed: u64) -> std::io::Result<Vec<EmittedRead>> {
    config.validate()?;
    let batches = num.div_ceil(BATCH_SIZE);
    let seqs: Vec<Vec<String>> = (0..batches)
        .into_par_iter()
        .map(|batch| {
            let size = BATCH_SIZE.min(num - batch * BATCH_SIZE);
            let rng = batch_rng(seed, batch);
            let mut emitter = simulator::RandomSequenceEmitter::with_config(*config, rng);
            (0..size).map(|_| emitter.emit()).collect()
        })
        .collect();
    let name = format!("gc={}", config.gc_content());
    let reads: Vec<_> = seqs
        .into_iter()
        .flatten()
        .enumerate()
        .map(|(i, seq)| EmittedRead::new(format!("random_{}", i), name.clone(), seq))
        .collect();
    info!("RANDOM\t{}\tSequences", reads.len());
    Ok(reads)
}

pub fn write_reads<W: Write>(wtr: &mut W, reads: &[EmittedRead], format: ReadFormat) -> std::io::Result<()> {
    for read in reads.iter() {
        match format {
            ReadFormat::Fasta => writeln!(wtr, "{}", read)?,
            ReadFormat::Fastq => {
                let quality = "I".repeat(read.seq.len());
                writeln!(wtr, "@{}\n{}\n+\n{}", read.header(), read.seq, quality)?;
            }
            ReadFormat::Json => {
                serde_json::ser::to_writer(&mut *wtr, read)?;
                writeln!(wtr)?;
            }
        }
    }
    wtr.flush()
}

/// Write to the file if given, or to the STDOUT.
pub fn write_reads_to(path: Option<&Path>, reads: &[EmittedRead], format: ReadFormat) -> std::io::Result<()> {
    match path {
        Some(path) => {
            let mut wtr = std::fs::File::create(path).map(BufWriter::new)?;
            write_reads(&mut wtr, reads, format)
        }
        None => {
            let stdout = std::io::stdout();
            let mut wtr = BufWriter::new(stdout.lock());
            write_reads(&mut wtr, reads, format)
        }
    }
}

pub fn extension(format: ReadFormat) -> &'static str {
    match format {
        ReadFormat::Fasta => "fa",
        ReadFormat::Fastq => "fq",
        ReadFormat::Json => "jsonl",
    }
}

/// Write `{prefix}.hap1.fa`, `{prefix}.hap2.fa`, and `{prefix}.phase.tsv`.
pub fn write_diploid(prefix: &str, diploid: &DiploidGenome) -> std::io::Result<()> {
    let outputs = [
        (format!("{prefix}.hap1.fa"), diploid.haplotype1.to_string()),
        (format!("{prefix}.hap2.fa"), diploid.haplotype2.to_string()),
        (format!("{prefix}.phase.tsv"), diploid.phase.to_string()),
    ];
    for (path, content) in outputs.iter() {
        debug!("Writing {}", path);
        let mut wtr = std::fs::File::create(path).map(BufWriter::new)?;
        wtr.write_all(content.as_bytes())?;
        wtr.flush()?;
    }
    for chrom in diploid.skipped.iter() {
        warn!("Variants on {} were skipped: not in the reference", chrom);
    }
    info!(
        "GENOME\t{}\t{}\t{}",
        diploid.haplotype1.chromosomes.len(),
        diploid.phase.sites.len(),
        diploid.skipped.len()
    );
    Ok(())
}

/// Parse a number with an optional SI suffix (k, m, g).
pub fn parse_si(input: &str) -> Result<usize, String> {
    let last = match input.chars().last() {
        Some(last) => last,
        None => return Err("empty number".to_string()),
    };
    let mult = match last {
        'k' | 'K' => 1_000,
        'm' | 'M' => 1_000_000,
        'g' | 'G' => 1_000_000_000,
        '0'..='9' => 1,
        _ => return Err(format!("si prefix {} is not supported yet.", last)),
    };
    let number = match last.is_ascii_alphabetic() {
        true => &input[..input.len() - 1],
        false => input,
    };
    let value = number
        .parse::<f64>()
        .map(|x| (x * mult as f64).round())
        .map_err(|why| format!("{}:{}", input, why))?;
    if !value.is_finite() || value < 0f64 || (usize::MAX as f64) <= value {
        return Err(format!("{} is not a valid count", input));
    }
    Ok(value as usize)
}
